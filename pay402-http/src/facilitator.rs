//! HTTP client for a remote x402 facilitator service.
//!
//! The facilitator verifies payment payloads against requirements and
//! settles them on chain. This client covers its five endpoints:
//! `GET /health`, `GET /supported`, `GET /stats`, `POST /verify`, and
//! `POST /settle`. Some deployments wrap responses in a
//! `{ success, data }` envelope and some return the body directly; both
//! shapes are accepted transparently.
//!
//! Settlement is not idempotent. A failed settle may or may not have
//! moved funds, so the client never retries on its own.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use pay402::error::PaymentError;
use pay402::proto::{PaymentPayload, PaymentRequirements};

use crate::types::{SettleOutcome, SupportedResponse, VerifyOutcome};

/// Default public facilitator endpoint.
pub const DEFAULT_FACILITATOR_URL: &str = "https://x402.org/facilitator";

/// Configuration for [`FacilitatorClient`].
pub struct FacilitatorConfig {
    /// Facilitator service base URL (without trailing slash).
    pub url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Optional pre-configured reqwest client. If `None`, a new client
    /// is created with the configured timeout.
    pub http_client: Option<reqwest::Client>,
}

impl Default for FacilitatorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FACILITATOR_URL.to_owned(),
            timeout: Duration::from_secs(30),
            http_client: None,
        }
    }
}

impl FacilitatorConfig {
    /// Creates a config with the given facilitator URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for FacilitatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacilitatorConfig")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Wire format for verify/settle request bodies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FacilitatorRequestBody<'a> {
    payment_payload: &'a PaymentPayload,
    payment_requirements: &'a PaymentRequirements,
}

/// Async HTTP client for a remote facilitator service.
#[derive(Debug, Clone)]
pub struct FacilitatorClient {
    url: String,
    client: reqwest::Client,
}

impl FacilitatorClient {
    /// Creates a client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying TLS backend fails to initialize.
    #[must_use]
    pub fn new(config: FacilitatorConfig) -> Self {
        let url = config.url.trim_end_matches('/').to_owned();
        let client = config.http_client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(config.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .expect("failed to build reqwest::Client")
        });
        Self { url, client }
    }

    /// Returns the facilitator base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Checks facilitator liveness.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Facilitator`] on transport failure,
    /// non-2xx status, or an unparseable body.
    pub async fn health(&self) -> Result<Value, PaymentError> {
        self.get_json("health").await
    }

    /// Fetches the scheme/network pairs the facilitator can settle.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Facilitator`] on transport failure,
    /// non-2xx status, or an unparseable body.
    pub async fn supported(&self) -> Result<SupportedResponse, PaymentError> {
        self.get_json("supported").await
    }

    /// Fetches facilitator operational statistics. The shape is
    /// deployment-defined, so the body is returned as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Facilitator`] on transport failure,
    /// non-2xx status, or an unparseable body.
    pub async fn stats(&self) -> Result<Value, PaymentError> {
        self.get_json("stats").await
    }

    /// Asks the facilitator to verify a payment against requirements.
    ///
    /// Verification is a read-only check; it can be repeated freely.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Facilitator`] on transport failure,
    /// non-2xx status, an unparseable body, or a `success: false`
    /// envelope.
    pub async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyOutcome, PaymentError> {
        self.post_json("verify", payload, requirements).await
    }

    /// Asks the facilitator to settle a payment on chain.
    ///
    /// Not idempotent: on failure the caller decides whether to retry,
    /// knowing funds may already have moved.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Facilitator`] on transport failure,
    /// non-2xx status, an unparseable body, or a `success: false`
    /// envelope.
    pub async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<SettleOutcome, PaymentError> {
        self.post_json("settle", payload, requirements).await
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, PaymentError> {
        let response = self
            .client
            .get(format!("{}/{endpoint}", self.url))
            .headers(Self::json_headers())
            .send()
            .await
            .map_err(|e| PaymentError::facilitator(format!("{endpoint} request failed: {e}")))?;
        Self::read_body(endpoint, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<T, PaymentError> {
        let body = FacilitatorRequestBody {
            payment_payload: payload,
            payment_requirements: requirements,
        };
        tracing::debug!(endpoint, network = %payload.network, "facilitator request");
        let response = self
            .client
            .post(format!("{}/{endpoint}", self.url))
            .headers(Self::json_headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::facilitator(format!("{endpoint} request failed: {e}")))?;
        Self::read_body(endpoint, response).await
    }

    async fn read_body<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PaymentError::facilitator(format!(
                "{endpoint} failed ({status}): {text}"
            )));
        }
        let value: Value = response.json().await.map_err(|e| {
            PaymentError::facilitator(format!("{endpoint} response parse error: {e}"))
        })?;
        let value = unwrap_envelope(endpoint, value)?;
        serde_json::from_value(value).map_err(|e| {
            PaymentError::facilitator(format!("{endpoint} response parse error: {e}"))
        })
    }
}

/// Unwraps an optional `{ success, data }` response envelope.
///
/// A body is treated as enveloped only when it carries BOTH keys; a
/// direct settle response has `success` but no `data` and passes through
/// untouched.
fn unwrap_envelope(endpoint: &str, value: Value) -> Result<Value, PaymentError> {
    match value {
        Value::Object(mut object)
            if object.contains_key("success") && object.contains_key("data") =>
        {
            if object.get("success").and_then(Value::as_bool) == Some(false) {
                let reason = object
                    .get("error")
                    .or_else(|| object.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unspecified failure")
                    .to_owned();
                return Err(PaymentError::facilitator(format!("{endpoint}: {reason}")));
            }
            Ok(object.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay402::proto::{ExactPayload, ExactScheme, ExactSvmPayload, V1};
    use pay402::requirements::PaymentRequirementsBuilder;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture() -> (PaymentPayload, PaymentRequirements) {
        let registry = pay402::networks::NetworkRegistry::builtin();
        let requirements = PaymentRequirementsBuilder::new(&registry)
            .build(
                "solana",
                "1000000",
                "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU",
                "https://api.example.com/report.csv",
                "Daily report",
                None,
            )
            .unwrap();
        let payload = PaymentPayload {
            x402_version: V1,
            scheme: ExactScheme,
            network: "solana".to_owned(),
            payload: ExactPayload::Svm(ExactSvmPayload {
                transaction: "AQID".to_owned(),
            }),
        };
        (payload, requirements)
    }

    async fn client_for(server: &MockServer) -> FacilitatorClient {
        FacilitatorClient::new(FacilitatorConfig::new(server.uri()))
    }

    #[tokio::test]
    async fn verify_accepts_a_direct_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .and(body_partial_json(json!({
                "paymentPayload": { "x402Version": 1, "network": "solana" },
                "paymentRequirements": { "maxAmountRequired": "1000000" },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "isValid": true,
                "payer": "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU",
            })))
            .mount(&server)
            .await;

        let (payload, requirements) = fixture();
        let outcome = client_for(&server)
            .await
            .verify(&payload, &requirements)
            .await
            .unwrap();
        assert!(outcome.is_valid);
        assert!(outcome.invalid_reason.is_none());
        assert_eq!(
            outcome.payer.as_deref(),
            Some("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU")
        );
    }

    #[tokio::test]
    async fn verify_accepts_an_enveloped_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "isValid": false, "invalidReason": "insufficient_funds" },
            })))
            .mount(&server)
            .await;

        let (payload, requirements) = fixture();
        let outcome = client_for(&server)
            .await
            .verify(&payload, &requirements)
            .await
            .unwrap();
        assert!(!outcome.is_valid);
        assert_eq!(outcome.invalid_reason.as_deref(), Some("insufficient_funds"));
    }

    #[tokio::test]
    async fn settle_reference_covers_both_chain_families() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/settle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "success": true,
                    "signature": "5Ej8...solana-sig",
                    "network": "solana",
                },
            })))
            .mount(&server)
            .await;

        let (payload, requirements) = fixture();
        let outcome = client_for(&server)
            .await
            .settle(&payload, &requirements)
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.reference(), Some("5Ej8...solana-sig"));

        let evm = SettleOutcome {
            success: true,
            error_reason: None,
            transaction: Some("0xabc".to_owned()),
            signature: None,
            network: Some("base".to_owned()),
            payer: None,
        };
        assert_eq!(evm.reference(), Some("0xabc"));
    }

    #[tokio::test]
    async fn direct_settle_response_is_not_mistaken_for_an_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/settle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "transaction": "0xdeadbeef",
                "network": "base",
            })))
            .mount(&server)
            .await;

        let (payload, requirements) = fixture();
        let outcome = client_for(&server)
            .await
            .settle(&payload, &requirements)
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.reference(), Some("0xdeadbeef"));
    }

    #[tokio::test]
    async fn failed_envelope_surfaces_the_reason_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/settle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "data": null,
                "error": "authorization expired",
            })))
            .mount(&server)
            .await;

        let (payload, requirements) = fixture();
        let err = client_for(&server)
            .await
            .settle(&payload, &requirements)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "facilitator");
        assert!(err.to_string().contains("authorization expired"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn non_success_status_is_a_facilitator_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let (payload, requirements) = fixture();
        let err = client_for(&server)
            .await
            .verify(&payload, &requirements)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "facilitator");
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn supported_lists_scheme_network_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/supported"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kinds": [
                    { "x402Version": 1, "scheme": "exact", "network": "base" },
                    { "x402Version": 1, "scheme": "exact", "network": "solana" },
                ],
            })))
            .mount(&server)
            .await;

        let supported = client_for(&server).await.supported().await.unwrap();
        assert_eq!(supported.kinds.len(), 2);
        assert_eq!(supported.kinds[0].scheme, "exact");
        assert_eq!(supported.kinds[1].network, "solana");
    }

    #[tokio::test]
    async fn health_and_stats_pass_bodies_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "settled": 42 },
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let health = client.health().await.unwrap();
        assert_eq!(health["status"], "ok");
        // stats comes back unwrapped when enveloped.
        let stats = client.stats().await.unwrap();
        assert_eq!(stats["settled"], 42);
    }
}
