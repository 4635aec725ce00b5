use anyhow::{bail, Context, Result};
use solana_sdk::pubkey::Pubkey;

use super::types::{AccountInfoResult, HttpRpcResponse, RpcRequest};

/// One-shot JSON-RPC calls over HTTP. Only `getAccountInfo` is needed: the
/// initial snapshot before the subscription starts delivering changes.
pub struct RpcHttpClient {
    http: reqwest::Client,
    url: String,
    commitment: String,
}

impl RpcHttpClient {
    pub fn new(url: &str, commitment: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            commitment: commitment.to_string(),
        }
    }

    /// Fetch the current bytes of an account. `Ok(None)` means the account
    /// does not exist at the configured commitment.
    pub async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let request = RpcRequest::get_account_info(1, &address.to_string(), &self.commitment);
        let response: HttpRpcResponse<AccountInfoResult> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("getAccountInfo request failed")?
            .error_for_status()
            .context("getAccountInfo returned error status")?
            .json()
            .await
            .context("getAccountInfo response is not valid JSON")?;

        if let Some(error) = response.error {
            bail!("getAccountInfo failed (code {}): {}", error.code, error.message);
        }
        let result = response
            .result
            .context("getAccountInfo response missing result")?;
        match result.value {
            Some(account) => {
                let data = account
                    .decode_data()
                    .context("failed to decode account data")?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }
}
