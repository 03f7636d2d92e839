use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::charge::{ChargeRequest, PayableReference};
use crate::domain::errors::GatewayError;
use crate::domain::ports::PaymentGateway;

pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.midtrans.com";
pub const PRODUCTION_BASE_URL: &str = "https://api.midtrans.com";

const PAYMENT_TYPE: &str = "qris";
const QR_ACTION: &str = "generate-qr-code";

#[derive(Clone)]
pub struct MidtransConfig {
    pub base_url: String,
    pub server_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for MidtransConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidtransConfig")
            .field("base_url", &self.base_url)
            .field("server_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChargeBody<'a> {
    payment_type: &'static str,
    transaction_details: TransactionDetails<'a>,
    item_details: Vec<ItemDetail<'a>>,
}

#[derive(Debug, Serialize)]
struct TransactionDetails<'a> {
    order_id: &'a str,
    gross_amount: i64,
}

#[derive(Debug, Serialize)]
struct ItemDetail<'a> {
    id: &'a str,
    price: i64,
    quantity: i32,
    name: &'a str,
}

impl<'a> From<&'a ChargeRequest> for ChargeBody<'a> {
    fn from(request: &'a ChargeRequest) -> Self {
        Self {
            payment_type: PAYMENT_TYPE,
            transaction_details: TransactionDetails {
                order_id: &request.order_id,
                gross_amount: request.gross_amount,
            },
            item_details: request
                .items
                .iter()
                .map(|i| ItemDetail {
                    id: &i.id,
                    price: i.price,
                    quantity: i.quantity,
                    name: &i.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    status_code: Option<String>,
    status_message: Option<String>,
    #[serde(default)]
    actions: Vec<ChargeAction>,
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChargeAction {
    name: String,
    url: String,
}

/// The provider reports business failures in the body's `status_code`,
/// sometimes with HTTP 200.
fn parse_charge_response(text: &str) -> Result<PayableReference, GatewayError> {
    let response: ChargeResponse =
        serde_json::from_str(text).map_err(|e| GatewayError::Decode(e.to_string()))?;

    if let Some(code) = response.status_code.as_deref() {
        if !code.starts_with('2') {
            return Err(GatewayError::Rejected {
                status_code: code.to_string(),
                message: response.status_message.unwrap_or_default(),
            });
        }
    }

    Ok(PayableReference {
        qr_url: response
            .actions
            .into_iter()
            .find(|a| a.name == QR_ACTION)
            .map(|a| a.url),
        redirect_url: response.redirect_url,
    })
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────────

pub struct MidtransGateway {
    client: Client,
    base_url: String,
    server_key: String,
}

impl MidtransGateway {
    pub fn new(config: MidtransConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            server_key: config.server_key,
        })
    }
}

#[async_trait]
impl PaymentGateway for MidtransGateway {
    async fn create_charge(
        &self,
        request: &ChargeRequest,
    ) -> Result<PayableReference, GatewayError> {
        let response = self
            .client
            .post(format!("{}/v2/charge", self.base_url))
            .basic_auth(&self.server_key, None::<&str>)
            .header(ACCEPT, "application/json")
            .json(&ChargeBody::from(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status_code: status.as_str().to_string(),
                message: text.chars().take(200).collect(),
            });
        }

        let reference = parse_charge_response(&text)?;
        log::debug!(
            "charge created for order {} (qr: {}, redirect: {})",
            request.order_id,
            reference.qr_url.is_some(),
            reference.redirect_url.is_some()
        );
        Ok(reference)
    }
}
