use lazer_watch::catalog::FeedCatalog;

#[test]
/// A term that only exists in one entry's symbol field must return exactly
/// that entry.
fn symbol_only_match_returns_single_entry() {
    let json = r#"[
        {
            "pyth_lazer_id": 1,
            "name": "BTCUSD",
            "symbol": "Crypto.BTC/USD",
            "description": "BITCOIN / US DOLLAR",
            "asset_type": "crypto",
            "exponent": -8,
            "cmc_id": 1,
            "interval": null,
            "min_publishers": 3,
            "min_channel": "real_time",
            "state": "stable"
        },
        {
            "pyth_lazer_id": 2,
            "name": "ETHUSD",
            "symbol": "Crypto.XYZZY/USD",
            "description": "ETHEREUM / US DOLLAR",
            "asset_type": "crypto",
            "exponent": -8,
            "cmc_id": 1027,
            "interval": null,
            "min_publishers": 3,
            "min_channel": "real_time",
            "state": "stable"
        }
    ]"#;
    let catalog = FeedCatalog::from_json(json).unwrap();
    let hits = catalog.filter("xyzzy");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "ETHUSD");
}

#[test]
fn filter_searches_name_symbol_and_description() {
    let catalog = FeedCatalog::bundled().unwrap();
    assert!(!catalog.filter("btc").is_empty()); // name
    assert!(!catalog.filter("crypto.sol").is_empty()); // symbol
    assert!(!catalog.filter("dollar").is_empty()); // description
}

#[test]
fn no_match_returns_empty() {
    let catalog = FeedCatalog::bundled().unwrap();
    assert!(catalog.filter("definitely-not-a-feed").is_empty());
}

#[test]
fn default_btc_feed_is_present() {
    let catalog = FeedCatalog::bundled().unwrap();
    let btc = catalog.by_name("BTCUSD").expect("BTCUSD in bundled list");
    assert_eq!(btc.pyth_lazer_id, 1);
    assert!(btc.exponent < 0);
}
