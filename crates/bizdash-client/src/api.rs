//! # Invoice API
//!
//! CRUD calls against the REST backend.
//!
//! ## Request Flow
//! ```text
//! ┌───────────────┐  build   ┌──────────────────────────────────────────────┐
//! │ InvoiceApi    │ ───────► │ GET/POST/PUT/DELETE {base}/invoices[/{id}]   │
//! │   list()      │          │ Authorization: Bearer <provider.token()>     │
//! │   get(id)     │          │ X-Request-Id: <uuid v4>                      │
//! │   create(inv) │          │ timeout: [api].timeout_secs                  │
//! │   update(inv) │          └───────────────────────┬──────────────────────┘
//! │   delete(id)  │                                  │
//! └───────┬───────┘                                  ▼
//!         │            2xx ──► bizdash_core::ingest (coerce, never fails)
//!         │            401/403 ──► Unauthorized
//!         │            404 ──► NotFound
//!         └──────────  other ──► Status { status, message }
//! ```
//!
//! Updates are full replacements. There is no version check, so the last
//! write wins.

use std::sync::Arc;
use std::time::Instant;

use bizdash_core::ingest::{invoice_from_response, invoice_to_wire, invoices_from_response};
use bizdash_core::types::Invoice;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{ClientError, ClientResult};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Banner text when the list cannot be fetched.
pub const FETCH_FAILED_NOTICE: &str = "Could not load invoices. Showing an empty list.";

const INVOICES_PATH: &str = "invoices";
const MAX_ERROR_BODY: usize = 200;

/// Result of [`InvoiceApi::list_or_fallback`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListOutcome {
    pub invoices: Vec<Invoice>,
    /// Set when the fetch failed and `invoices` is the empty fallback.
    pub notice: Option<String>,
}

/// Typed client for the `/invoices` resource.
#[derive(Clone)]
pub struct InvoiceApi {
    http: Client,
    base_url: Url,
    timeout_secs: u64,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for InvoiceApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceApi")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl InvoiceApi {
    /// Builds a client from validated configuration.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ClientResult<Self> {
        config.validate()?;
        Self::with_base_url(config.base_url(), config.api.timeout_secs, credentials)
    }

    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url.trim()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(InvoiceApi {
            http,
            base_url,
            timeout_secs,
            credentials,
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// `GET /invoices`. Array and envelope responses are both accepted.
    pub async fn list(&self) -> ClientResult<Vec<Invoice>> {
        let body = self.call(Method::GET, None, None).await?;
        let invoices = invoices_from_response(&body.unwrap_or(Value::Null));
        debug!(count = invoices.len(), "Invoices fetched");
        Ok(invoices)
    }

    /// Like [`list`](Self::list) but never fails: errors become an empty list
    /// plus a notice for the banner.
    pub async fn list_or_fallback(&self) -> ListOutcome {
        match self.list().await {
            Ok(invoices) => ListOutcome {
                invoices,
                notice: None,
            },
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Invoice fetch failed");
                ListOutcome {
                    invoices: Vec::new(),
                    notice: Some(FETCH_FAILED_NOTICE.to_string()),
                }
            }
        }
    }

    /// `GET /invoices/{id}`.
    pub async fn get(&self, id: &str) -> ClientResult<Invoice> {
        let body = self.call(Method::GET, Some(id), None).await?;
        Ok(invoice_from_response(&body.unwrap_or(Value::Null)))
    }

    /// `POST /invoices`. Returns the stored invoice as echoed by the API, or
    /// the submitted one when the response has no body.
    pub async fn create(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        let body = self
            .call(Method::POST, None, Some(invoice_to_wire(invoice)))
            .await?;
        Ok(echoed_or(body, invoice))
    }

    /// `PUT /invoices/{id}`, a full replace.
    pub async fn update(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        let id = invoice
            .id
            .as_deref()
            .ok_or_else(|| ClientError::MissingId(invoice.invoice_no.clone()))?;
        let body = self
            .call(Method::PUT, Some(id), Some(invoice_to_wire(invoice)))
            .await?;

        let mut stored = echoed_or(body, invoice);
        if stored.id.is_none() {
            stored.id = Some(id.to_string());
        }
        Ok(stored)
    }

    /// `DELETE /invoices/{id}`.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.call(Method::DELETE, Some(id), None).await?;
        Ok(())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// `{base}/invoices` or `{base}/invoices/{id}` with the id percent-encoded.
    pub fn endpoint(&self, id: Option<&str>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(INVOICES_PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, request_id: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id);

        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends one request and returns the parsed body (`None` when empty).
    async fn call(
        &self,
        method: Method,
        id: Option<&str>,
        payload: Option<Value>,
    ) -> ClientResult<Option<Value>> {
        let url = self.endpoint(id)?;
        let request_id = Uuid::new_v4().to_string();
        debug!(%method, %url, %request_id, "API request");

        let mut builder = self.request(method.clone(), url, &request_id);
        if let Some(payload) = &payload {
            builder = builder.json(payload);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        debug!(
            %method,
            %request_id,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API response"
        );

        let response = check_status(response, id).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, self.timeout_secs))?;

        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

/// Maps non-2xx statuses to errors.
async fn check_status(response: Response, id: Option<&str>) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized {
            status: status.as_u16(),
        }),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(
            id.unwrap_or(INVOICES_PATH).to_string(),
        )),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&body, status),
            })
        }
    }
}

/// Prefers a JSON `message`/`error` field, then the raw body, then the reason.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        return status.canonical_reason().unwrap_or("error").to_string();
    }
    message.chars().take(MAX_ERROR_BODY).collect()
}

fn echoed_or(body: Option<Value>, submitted: &Invoice) -> Invoice {
    match body {
        Some(value) if value.is_object() => {
            let echoed = invoice_from_response(&value);
            if echoed.invoice_no.is_empty() && echoed.products.is_empty() {
                // Acknowledgement-only body such as {"_id": "..."}
                Invoice {
                    id: echoed.id.or_else(|| submitted.id.clone()),
                    ..submitted.clone()
                }
            } else {
                echoed
            }
        }
        _ => submitted.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Anonymous, StaticToken};
    use bizdash_core::money::Money;
    use bizdash_core::types::LineItem;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer) -> InvoiceApi {
        InvoiceApi::with_base_url(&server.uri(), 5, Arc::new(StaticToken::new("t0k3n"))).unwrap()
    }

    fn wire_invoice(id: &str, no: &str) -> Value {
        json!({
            "_id": id,
            "invoiceNo": no,
            "date": "15/03/2025",
            "customerDetails": { "name": "John Doe", "phone": "9876543210" },
            "gst": "true",
            "products": [
                { "productName": "Laptop", "productQuantity": "1", "productPrice": 25000 }
            ],
            "paymentStatus": "paid"
        })
    }

    #[tokio::test]
    async fn test_list_sends_auth_and_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .and(header("authorization", "Bearer t0k3n"))
            .and(header_exists("x-request-id"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([wire_invoice("a1", "INV-1"), wire_invoice("a2", "INV-2")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let invoices = api(&server).list().await.unwrap();

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].id.as_deref(), Some("a1"));
        assert!(invoices[0].gst);
        assert_eq!(invoices[0].customer.phone, 9_876_543_210);
        assert_eq!(invoices[1].products[0].unit_price, Money::from_rupees(25_000));
    }

    #[tokio::test]
    async fn test_list_accepts_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/invoices"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": [wire_invoice("a1", "INV-1")] })),
            )
            .mount(&server)
            .await;

        let base = format!("{}/api/", server.uri());
        let api = InvoiceApi::with_base_url(&base, 5, Arc::new(Anonymous)).unwrap();

        assert_eq!(api.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_empty_with_notice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let api = api(&server);
        let err = api.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, ref message } if message == "database down"));

        let outcome = api.list_or_fallback().await;
        assert!(outcome.invoices.is_empty());
        assert_eq!(outcome.notice.as_deref(), Some(FETCH_FAILED_NOTICE));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/invoices/secret"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = api(&server);
        assert!(matches!(api.get("missing").await, Err(ClientError::NotFound(id)) if id == "missing"));
        assert!(api.get("secret").await.unwrap_err().is_auth_error());
    }

    #[tokio::test]
    async fn test_create_posts_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invoices"))
            .and(body_partial_json(json!({
                "invoiceNo": "INV-9",
                "gst": true,
                "customerDetails": { "name": "Asha" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "new-id" })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = Invoice {
            invoice_no: "INV-9".to_string(),
            date: "01/04/2025".to_string(),
            gst: true,
            customer: bizdash_core::types::CustomerDetails {
                name: "Asha".to_string(),
                ..Default::default()
            },
            products: vec![LineItem::new("Pen", 2, Money::from_rupees(10))],
            ..Invoice::default()
        };

        let stored = api(&server).create(&draft).await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("new-id"));
        assert_eq!(stored.invoice_no, "INV-9");
        assert_eq!(stored.products.len(), 1);
    }

    #[tokio::test]
    async fn test_update_is_full_replace_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/invoices/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": wire_invoice("a1", "INV-1-REV")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut invoice = invoice_from_response(&wire_invoice("a1", "INV-1"));
        invoice.invoice_no = "INV-1-REV".to_string();

        let stored = api(&server).update(&invoice).await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("a1"));
        assert_eq!(stored.invoice_no, "INV-1-REV");
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected_locally() {
        let server = MockServer::start().await;
        let unsaved = Invoice {
            invoice_no: "INV-DRAFT".to_string(),
            ..Invoice::default()
        };

        let err = api(&server).update(&unsaved).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingId(no) if no == "INV-DRAFT"));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/invoices/a1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        api(&server).delete("a1").await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_is_reported_with_configured_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let api = InvoiceApi::with_base_url(&server.uri(), 1, Arc::new(Anonymous)).unwrap();
        let err = api.list().await.unwrap_err();

        assert!(matches!(err, ClientError::Timeout(1)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_endpoint_encodes_id() {
        let api = InvoiceApi::with_base_url("https://api.example.com/v1", 5, Arc::new(Anonymous))
            .unwrap();

        assert_eq!(
            api.endpoint(None).unwrap().as_str(),
            "https://api.example.com/v1/invoices"
        );
        assert_eq!(
            api.endpoint(Some("a/b")).unwrap().as_str(),
            "https://api.example.com/v1/invoices/a%2Fb"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"invoiceNo taken"}"#, StatusCode::CONFLICT),
            "invoiceNo taken"
        );
        assert_eq!(error_message("", StatusCode::BAD_GATEWAY), "Bad Gateway");
    }
}
