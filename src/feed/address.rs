use solana_sdk::pubkey::Pubkey;

/// Seeds used by the on-chain price program for feed accounts.
const PRICE_FEED_SEED: &[u8] = b"price_feed";
const PROVIDER_SEED: &[u8] = b"pyth-lazer";

/// Derive the program address of a feed account from its numeric Lazer id.
///
/// The on-chain program stores each feed under a PDA of
/// `["price_feed", "pyth-lazer", <id as decimal string>]`, so the address is
/// a pure function of the feed id and the program id.
pub fn derive_feed_address(program_id: &Pubkey, feed_id: u32) -> Pubkey {
    let id_str = feed_id.to_string();
    let (address, _bump) = Pubkey::find_program_address(
        &[PRICE_FEED_SEED, PROVIDER_SEED, id_str.as_bytes()],
        program_id,
    );
    address
}
