//! JSON-RPC implementation of the receipt client.
//!
//! The tokenization network speaks JSON-RPC 2.0 over HTTPS. Server-side
//! calls authenticate with an `X-Auth` header carrying
//! `{merchant_id}:{secret_key}`; the secret never reaches payer-facing code.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use crate::config::{ProviderConfig, SecretKey};
use crate::token::client::{Receipt, ReceiptClient, ReceiptError};
use crate::token::methods::Method;

const AUTH_HEADER: &str = "X-Auth";

/// Receipt client backed by [`reqwest`], speaking JSON-RPC 2.0.
#[derive(Debug)]
pub struct HttpReceiptClient {
    http: reqwest::Client,
    api_url: Url,
    merchant_id: String,
    secret_key: SecretKey,
    next_id: AtomicU64,
}

impl HttpReceiptClient {
    pub fn new(config: &ProviderConfig) -> Self {
        HttpReceiptClient {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            merchant_id: config.merchant_id.clone(),
            secret_key: config.secret_key.clone(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, method: Method, params: Value) -> Result<Value, ReceiptError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method.as_str(),
            "params": params,
        });
        let auth = format!("{}:{}", self.merchant_id, self.secret_key.expose());
        let response: Value = self
            .http
            .post(self.api_url.clone())
            .header(AUTH_HEADER, auth)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(ReceiptError::Rpc { code, message });
        }
        response
            .get("result")
            .cloned()
            .ok_or_else(|| ReceiptError::Malformed("missing result".to_string()))
    }

    fn receipt_from_result(result: Value) -> Result<Receipt, ReceiptError> {
        let receipt = result
            .get("receipt")
            .cloned()
            .ok_or_else(|| ReceiptError::Malformed("missing receipt object".to_string()))?;
        Receipt::from_value(receipt)
    }
}

#[async_trait]
impl ReceiptClient for HttpReceiptClient {
    async fn create_receipt(&self, amount: i64, reference: &str) -> Result<Receipt, ReceiptError> {
        let result = self
            .call(
                Method::CreateReceipt,
                json!({
                    "amount": amount,
                    "account": { "order_id": reference },
                }),
            )
            .await?;
        Self::receipt_from_result(result)
    }

    async fn pay_receipt(&self, receipt_id: &str, token: &str) -> Result<Receipt, ReceiptError> {
        let result = self
            .call(
                Method::PayReceipt,
                json!({ "id": receipt_id, "token": token }),
            )
            .await?;
        Self::receipt_from_result(result)
    }

    async fn check_receipt(&self, receipt_id: &str) -> Result<Receipt, ReceiptError> {
        let result = self
            .call(Method::CheckReceipt, json!({ "id": receipt_id }))
            .await?;
        Self::receipt_from_result(result)
    }

    async fn cancel_receipt(&self, receipt_id: &str) -> Result<Receipt, ReceiptError> {
        let result = self
            .call(Method::CancelReceipt, json!({ "id": receipt_id }))
            .await?;
        Self::receipt_from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unwraps_receipt_from_rpc_result() {
        let receipt = HttpReceiptClient::receipt_from_result(json!({
            "receipt": { "_id": "rcpt_1", "amount": 1999, "state": 0 }
        }))
        .unwrap();
        assert_eq!(receipt.id, "rcpt_1");
    }

    #[test]
    fn result_without_receipt_is_malformed() {
        let err = HttpReceiptClient::receipt_from_result(json!({"ok": true})).unwrap_err();
        assert!(matches!(err, ReceiptError::Malformed(_)));
    }
}
