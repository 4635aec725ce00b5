use lazer_watch::config::Config;

#[test]
fn shipped_default_config_is_valid() {
    let config_str = std::fs::read_to_string("config/default.toml").unwrap();
    let config: Config = toml::from_str(&config_str).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.rpc.price_offset, 73);
    assert_eq!(config.rpc.commitment, "confirmed");
    assert_eq!(config.ui.default_feed, "BTCUSD");
}

#[test]
fn program_id_parses_to_a_pubkey() {
    let config_str = std::fs::read_to_string("config/default.toml").unwrap();
    let config: Config = toml::from_str(&config_str).unwrap();
    let pubkey = config.rpc.program_pubkey().unwrap();
    assert_eq!(pubkey.to_string(), config.rpc.program_id);
}

#[test]
fn missing_section_is_rejected() {
    let broken = r#"
[rpc]
http_url = "https://devnet.magicblock.app"
ws_url = "wss://devnet.magicblock.app"
program_id = "PriCems5tHihc6UDXDjzjeawomAwBduWMGAi8ZUjppd"
commitment = "confirmed"
price_offset = 73
"#;
    assert!(toml::from_str::<Config>(broken).is_err());
}
