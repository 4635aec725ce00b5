use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use lazer_watch::feed::decode::decode_raw_price;
use lazer_watch::rpc::types::{classify_message, RpcRequest, WsIncoming};

/// Build a notification frame whose account payload carries `price` at the
/// given offset, the way the price program lays accounts out.
fn notification_with_price(subscription: u64, price: u64, offset: usize) -> String {
    let mut data = vec![0u8; offset + 8];
    data[offset..offset + 8].copy_from_slice(&price.to_le_bytes());
    let encoded = BASE64.encode(&data);
    format!(
        r#"{{
            "jsonrpc": "2.0",
            "method": "accountNotification",
            "params": {{
                "result": {{
                    "context": {{ "slot": 100 }},
                    "value": {{
                        "data": ["{}", "base64"],
                        "executable": false,
                        "lamports": 1000,
                        "owner": "PriCems5tHihc6UDXDjzjeawomAwBduWMGAi8ZUjppd",
                        "rentEpoch": 0
                    }}
                }},
                "subscription": {}
            }}
        }}"#,
        encoded, subscription
    )
}

#[test]
/// End-to-end decode path: notification -> base64 payload -> fixed-offset
/// little-endian u64.
fn notification_payload_decodes_to_price() {
    let msg = notification_with_price(7, 6_412_345_678_900, 73);
    let WsIncoming::AccountNotification {
        subscription,
        account,
        ..
    } = classify_message(&msg).unwrap()
    else {
        panic!("expected notification");
    };
    assert_eq!(subscription, 7);
    let bytes = account.unwrap().decode_data().unwrap();
    assert_eq!(decode_raw_price(&bytes, 73), Some(6_412_345_678_900));
}

#[test]
fn truncated_account_yields_no_price() {
    let mut short = notification_with_price(7, 0, 73);
    // replace the payload with something too short for offset 73
    short = short.replace(
        &BASE64.encode(vec![0u8; 81].as_slice()),
        &BASE64.encode([0u8; 8].as_slice()),
    );
    let WsIncoming::AccountNotification { account, .. } = classify_message(&short).unwrap() else {
        panic!("expected notification");
    };
    let bytes = account.unwrap().decode_data().unwrap();
    assert_eq!(decode_raw_price(&bytes, 73), None);
}

#[test]
fn vanished_account_is_none() {
    let msg = r#"{
        "jsonrpc": "2.0",
        "method": "accountNotification",
        "params": {
            "result": { "context": { "slot": 1 }, "value": null },
            "subscription": 3
        }
    }"#;
    let WsIncoming::AccountNotification { account, .. } = classify_message(msg).unwrap() else {
        panic!("expected notification");
    };
    assert!(account.is_none());
}

#[test]
fn unsubscribe_request_carries_subscription_id() {
    let req = RpcRequest::account_unsubscribe(5, 1234);
    let text = req.to_text().unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["method"], "accountUnsubscribe");
    assert_eq!(v["params"][0], 1234);
    assert_eq!(v["id"], 5);
}
