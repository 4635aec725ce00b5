use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("RPC error (code {code}): {msg}")]
    Rpc { code: i64, msg: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("address derivation error: {0}")]
    AddressDerivation(String),

    #[error("account decode error: {0}")]
    AccountDecode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
