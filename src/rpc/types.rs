use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;

/// Outgoing JSON-RPC request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

impl RpcRequest {
    pub fn account_subscribe(id: u64, address: &str, commitment: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "accountSubscribe",
            params: json!([
                address,
                { "encoding": "base64", "commitment": commitment }
            ]),
        }
    }

    pub fn account_unsubscribe(id: u64, subscription: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "accountUnsubscribe",
            params: json!([subscription]),
        }
    }

    pub fn get_account_info(id: u64, address: &str, commitment: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: "getAccountInfo",
            params: json!([
                address,
                { "encoding": "base64", "commitment": commitment }
            ]),
        }
    }

    pub fn to_text(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// Account value as returned with base64 encoding: `data` is a
/// `[payload, encoding]` pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAccount {
    pub data: (String, String),
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
    #[serde(default)]
    pub rent_epoch: u64,
}

impl UiAccount {
    pub fn decode_data(&self) -> Result<Vec<u8>, AppError> {
        let (payload, encoding) = (&self.data.0, &self.data.1);
        if encoding != "base64" {
            return Err(AppError::AccountDecode(format!(
                "unexpected account encoding '{}'",
                encoding
            )));
        }
        BASE64
            .decode(payload)
            .map_err(|e| AppError::AccountDecode(format!("invalid base64 payload: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResult {
    pub context: RpcContext,
    pub value: Option<UiAccount>,
}

/// Response envelope for one-shot HTTP calls.
#[derive(Debug, Deserialize)]
pub struct HttpRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
    #[allow(dead_code)]
    pub id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct NotificationParams {
    subscription: u64,
    result: AccountInfoResult,
}

#[derive(Debug, Deserialize)]
struct WsEnvelope {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<RpcErrorObject>,
    method: Option<String>,
    params: Option<NotificationParams>,
}

/// A classified message from the subscription socket.
#[derive(Debug)]
pub enum WsIncoming {
    /// Ack carrying the server-assigned subscription id.
    SubscribeAck { id: u64, subscription: u64 },
    /// Ack for an unsubscribe call.
    UnsubscribeAck { id: u64, ok: bool },
    /// Push notification with the updated account (None if it vanished).
    AccountNotification {
        subscription: u64,
        slot: u64,
        account: Option<UiAccount>,
    },
    /// Error reply to one of our requests.
    ErrorReply {
        id: Option<u64>,
        code: i64,
        message: String,
    },
    /// Anything we don't care about.
    Other,
}

/// Classify a text frame from the RPC WebSocket.
pub fn classify_message(text: &str) -> Result<WsIncoming, AppError> {
    let envelope: WsEnvelope = serde_json::from_str(text)?;

    if let Some(error) = envelope.error {
        return Ok(WsIncoming::ErrorReply {
            id: envelope.id,
            code: error.code,
            message: error.message,
        });
    }

    if envelope.method.as_deref() == Some("accountNotification") {
        let params = envelope.params.ok_or_else(|| {
            AppError::WebSocket("accountNotification without params".to_string())
        })?;
        return Ok(WsIncoming::AccountNotification {
            subscription: params.subscription,
            slot: params.result.context.slot,
            account: params.result.value,
        });
    }

    if let (Some(id), Some(result)) = (envelope.id, envelope.result) {
        if let Some(subscription) = result.as_u64() {
            return Ok(WsIncoming::SubscribeAck { id, subscription });
        }
        if let Some(ok) = result.as_bool() {
            return Ok(WsIncoming::UnsubscribeAck { id, ok });
        }
    }

    Ok(WsIncoming::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_request_shape() {
        let req = RpcRequest::account_subscribe(1, "SomeAddress", "confirmed");
        let text = req.to_text().unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["method"], "accountSubscribe");
        assert_eq!(v["params"][0], "SomeAddress");
        assert_eq!(v["params"][1]["encoding"], "base64");
        assert_eq!(v["params"][1]["commitment"], "confirmed");
    }

    #[test]
    fn classify_subscribe_ack() {
        let msg = r#"{"jsonrpc":"2.0","result":23784,"id":1}"#;
        match classify_message(msg).unwrap() {
            WsIncoming::SubscribeAck { id, subscription } => {
                assert_eq!(id, 1);
                assert_eq!(subscription, 23784);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn classify_unsubscribe_ack() {
        let msg = r#"{"jsonrpc":"2.0","result":true,"id":2}"#;
        match classify_message(msg).unwrap() {
            WsIncoming::UnsubscribeAck { id, ok } => {
                assert_eq!(id, 2);
                assert!(ok);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn classify_account_notification() {
        let msg = r#"{
            "jsonrpc": "2.0",
            "method": "accountNotification",
            "params": {
                "result": {
                    "context": { "slot": 5199307 },
                    "value": {
                        "data": ["AAAA", "base64"],
                        "executable": false,
                        "lamports": 33594,
                        "owner": "PriCems5tHihc6UDXDjzjeawomAwBduWMGAi8ZUjppd",
                        "rentEpoch": 635
                    }
                },
                "subscription": 23784
            }
        }"#;
        match classify_message(msg).unwrap() {
            WsIncoming::AccountNotification {
                subscription,
                slot,
                account,
            } => {
                assert_eq!(subscription, 23784);
                assert_eq!(slot, 5199307);
                let account = account.unwrap();
                assert_eq!(account.lamports, 33594);
                assert_eq!(account.decode_data().unwrap(), vec![0, 0, 0]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn classify_error_reply() {
        let msg = r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params"},"id":1}"#;
        match classify_message(msg).unwrap() {
            WsIncoming::ErrorReply { code, message, .. } => {
                assert_eq!(code, -32602);
                assert!(message.contains("Invalid"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_non_base64_encoding() {
        let account = UiAccount {
            data: ("AAAA".to_string(), "base58".to_string()),
            lamports: 0,
            owner: String::new(),
            executable: false,
            rent_epoch: 0,
        };
        assert!(account.decode_data().is_err());
    }
}
