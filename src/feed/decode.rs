/// Read the raw integer price out of a feed account payload.
///
/// The price sits at a fixed byte offset as a little-endian u64. The offset
/// follows the on-chain account layout and is passed in from configuration
/// (`rpc.price_offset`); a payload too short to contain it yields `None`
/// rather than an error so a layout drift degrades to "no price" instead of
/// taking the UI down.
pub fn decode_raw_price(data: &[u8], offset: usize) -> Option<u64> {
    let end = offset.checked_add(8)?;
    let bytes: [u8; 8] = data.get(offset..end)?.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Scale a raw integer price into its display value using the feed exponent.
pub fn scale_price(raw: u64, exponent: i32) -> f64 {
    raw as f64 / 10f64.powi(exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_u64_at_offset() {
        let mut data = vec![0u8; 81];
        data[73..81].copy_from_slice(&50_000u64.to_le_bytes());
        assert_eq!(decode_raw_price(&data, 73), Some(50_000));
    }

    #[test]
    fn short_payload_yields_none() {
        let data = vec![0u8; 80];
        assert_eq!(decode_raw_price(&data, 73), None);
        assert_eq!(decode_raw_price(&[], 73), None);
    }

    #[test]
    fn offset_overflow_yields_none() {
        let data = vec![0u8; 16];
        assert_eq!(decode_raw_price(&data, usize::MAX - 3), None);
    }

    #[test]
    fn scales_by_abs_exponent() {
        assert!((scale_price(50_000, -8) - 0.0005).abs() < 1e-12);
        assert!((scale_price(6_412_345_678_900, -8) - 64_123.456789).abs() < 1e-6);
    }
}
