//! HTTP implementation of the charge-network client.
//!
//! JSON over HTTPS against the configured `api_url`, authenticated with the
//! merchant secret key as a bearer token. Invalid-state rejections (HTTP 400
//! and 402 with an `invalid_request_error` body) are mapped to
//! [`ChargeError::InvalidRequest`], the condition the capture path treats as
//! "already refunded".

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use url::Url;

use crate::charge::client::{CardDetails, Charge, ChargeClient, ChargeError};
use crate::config::{ProviderConfig, SecretKey};

/// Charge-network client backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpChargeClient {
    http: reqwest::Client,
    api_url: Url,
    secret_key: SecretKey,
}

impl HttpChargeClient {
    pub fn new(config: &ProviderConfig) -> Self {
        HttpChargeClient {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            secret_key: config.secret_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ChargeError> {
        self.api_url
            .join(path)
            .map_err(|e| ChargeError::Malformed(format!("bad endpoint {path}: {e}")))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Charge, ChargeError> {
        let response = request
            .bearer_auth(self.secret_key.expose())
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await?;
        if status.is_success() {
            return Charge::from_value(body);
        }
        Err(error_from_body(status, &body))
    }
}

/// Maps a non-2xx response body to a [`ChargeError`].
fn error_from_body(status: StatusCode, body: &Value) -> ChargeError {
    let error = body.get("error");
    let kind = error
        .and_then(|e| e.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("api_error");
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let invalid_status =
        status == StatusCode::BAD_REQUEST || status == StatusCode::PAYMENT_REQUIRED;
    if invalid_status && kind == "invalid_request_error" {
        ChargeError::InvalidRequest { message }
    } else {
        ChargeError::Api {
            code: status.as_u16().to_string(),
            message,
        }
    }
}

#[async_trait]
impl ChargeClient for HttpChargeClient {
    async fn retrieve(&self, charge_id: &str) -> Result<Charge, ChargeError> {
        let url = self.endpoint(&format!("charges/{charge_id}"))?;
        self.execute(self.http.get(url)).await
    }

    async fn capture(&self, charge_id: &str, amount: i64) -> Result<Charge, ChargeError> {
        let url = self.endpoint(&format!("charges/{charge_id}/capture"))?;
        self.execute(self.http.post(url).json(&json!({ "amount": amount })))
            .await
    }

    async fn refund(&self, charge_id: &str, amount: Option<i64>) -> Result<Charge, ChargeError> {
        let url = self.endpoint("refunds")?;
        let mut body = json!({ "charge": charge_id });
        if let Some(amount) = amount {
            body["amount"] = json!(amount);
        }
        self.execute(self.http.post(url).json(&body)).await
    }

    async fn authorize(
        &self,
        card: &CardDetails,
        amount: i64,
        reference: &str,
    ) -> Result<Charge, ChargeError> {
        let url = self.endpoint("charges")?;
        let body = json!({
            "amount": amount,
            "capture": false,
            "reference": reference,
            "card": {
                "number": card.number,
                "exp_month": card.exp_month,
                "exp_year": card.exp_year,
                "cvc": card.cvv,
            },
        });
        self.execute(self.http.post(url).json(&body)).await
    }
}
