//! REST client for the host's whitelisted printing methods.
//!
//! Every method answers with a `{"message": ...}` envelope; resources
//! answer with `{"data": ...}`. Requests authenticate with an API key pair
//! (`Authorization: token <key>:<secret>`) when one is configured.
//!
//! A method answering `null` is treated as "not provided by this site":
//! the print config is then resolved from the settings document, and the
//! receipt is rendered here from the POS Invoice document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{HostApi, TrustProvider};
use crate::config::HostConfig;
use crate::error::NextposError;
use crate::payload::PrintPayload;
use crate::printer::{PosSettings, PrintConfig};
use crate::receipt::{PosInvoice, ReceiptContext, render_invoice};

pub const PRINT_PAYLOAD_METHOD: &str = "nextpos_printing.api.print.get_print_payload";
pub const PRINTER_FOR_POS_METHOD: &str = "nextpos_printing.api.settings.get_printer_for_pos";
pub const CERTIFICATE_METHOD: &str = "nextpos_printing.api.qz.qz_get_certificate";
pub const SIGN_METHOD: &str = "nextpos_printing.api.qz.qz_sign";

const POS_INVOICE_DOCTYPE: &str = "POS Invoice";
const SETTINGS_DOCTYPE: &str = "NextPOS Settings";

#[derive(Deserialize)]
struct MethodEnvelope<T> {
    message: Option<T>,
}

#[derive(Deserialize)]
struct ResourceEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct DocEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct NameRow {
    name: String,
}

/// Host API client.
#[derive(Clone)]
pub struct FrappeClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl FrappeClient {
    pub fn new(config: &HostConfig) -> Result<Self, NextposError> {
        let http = Client::builder()
            .user_agent(concat!("nextpos/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NextposError::Host(format!("HTTP client error: {}", e)))?;

        let token = match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) => Some(format!("token {}:{}", key, secret)),
            _ => None,
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/api/method/{}", self.base_url, method)
    }

    /// `/api/resource/<segments...>`, each segment percent-encoded.
    fn resource_url(&self, segments: &[&str]) -> Result<Url, NextposError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| NextposError::Config(format!("bad host base_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| NextposError::Config("host base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["api", "resource"])
            .extend(segments);
        Ok(url)
    }

    async fn document<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, NextposError> {
        let response = self.authorized(self.http.get(url)).send().await?;
        document_data(response, what).await
    }

    /// The settings document. A site that has never saved it gets the
    /// setup-wizard defaults.
    pub async fn settings(&self) -> Result<PosSettings, NextposError> {
        let url = self.resource_url(&[SETTINGS_DOCTYPE, SETTINGS_DOCTYPE])?;
        let response = self.authorized(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            let mut settings = PosSettings::initial();
            let filled = settings.apply_wizard_defaults();
            debug!(?filled, "settings document missing, using wizard defaults");
            return Ok(settings);
        }
        document_data(response, "settings").await
    }

    /// Render the receipt from the invoice document and the settings.
    async fn render_locally(&self, invoice: &str) -> Result<PrintPayload, NextposError> {
        let url = self.resource_url(&[POS_INVOICE_DOCTYPE, invoice])?;
        let doc: PosInvoice = self.document(url, "invoice").await?;
        let settings = self.settings().await?;
        Ok(render_invoice(&doc, &settings.receipt, &ReceiptContext::default()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token),
            None => request,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<Option<T>, NextposError> {
        let response = checked(self.authorized(request).send().await?, what).await?;
        let envelope: MethodEnvelope<T> = response
            .json()
            .await
            .map_err(|e| NextposError::Host(format!("{}: malformed response: {}", what, e)))?;
        Ok(envelope.message)
    }
}

/// Turn non-2xx responses into errors carrying a snippet of the body.
async fn checked(response: Response, what: &str) -> Result<Response, NextposError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();
    Err(NextposError::Host(format!("{}: HTTP {}: {}", what, status, snippet)))
}

/// Unwrap the `{"data": ...}` envelope of a single document.
async fn document_data<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, NextposError> {
    let envelope: DocEnvelope<T> = checked(response, what)
        .await?
        .json()
        .await
        .map_err(|e| NextposError::Host(format!("{}: malformed response: {}", what, e)))?;
    Ok(envelope.data)
}

#[async_trait]
impl TrustProvider for FrappeClient {
    async fn certificate(&self) -> Result<String, NextposError> {
        let request = self.http.get(self.method_url(CERTIFICATE_METHOD));
        let cert: Option<String> = self.call(request, "certificate").await.map_err(|e| {
            NextposError::SigningFailed(format!("certificate request failed: {}", e))
        })?;
        cert.filter(|c| !c.trim().is_empty())
            .ok_or_else(|| NextposError::SigningFailed("No certificate returned".to_string()))
    }

    async fn sign(&self, to_sign: &str) -> Result<String, NextposError> {
        let request = self
            .http
            .post(self.method_url(SIGN_METHOD))
            .json(&serde_json::json!({ "toSign": to_sign }));
        let signature: Option<String> = self
            .call(request, "sign")
            .await
            .map_err(|e| NextposError::SigningFailed(format!("Error while signing: {}", e)))?;
        signature.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
            NextposError::SigningFailed(
                "Could not sign request; check that the signing key is set in the site config"
                    .to_string(),
            )
        })
    }
}

#[async_trait]
impl HostApi for FrappeClient {
    async fn print_payload(&self, invoice: &str) -> Result<PrintPayload, NextposError> {
        debug!(invoice, "fetching print payload");
        let request = self
            .http
            .get(self.method_url(PRINT_PAYLOAD_METHOD))
            .query(&[("pos_invoice_name", invoice)]);
        match self.call(request, "print payload").await? {
            Some(payload) => Ok(payload),
            None => {
                debug!(invoice, "host returned no payload, rendering locally");
                self.render_locally(invoice).await
            }
        }
    }

    async fn print_config(&self, pos_profile: Option<&str>) -> Result<PrintConfig, NextposError> {
        debug!(pos_profile, "fetching print config");
        let mut request = self.http.get(self.method_url(PRINTER_FOR_POS_METHOD));
        if let Some(profile) = pos_profile {
            request = request.query(&[("pos_profile", profile)]);
        }
        match self.call(request, "print config").await? {
            Some(config) => Ok(config),
            None => Ok(self.settings().await?.printer_for_profile(pos_profile)),
        }
    }

    async fn last_submitted_invoice(&self) -> Result<Option<String>, NextposError> {
        let url = self.resource_url(&[POS_INVOICE_DOCTYPE])?;
        let request = self.http.get(url).query(&[
            ("fields", r#"["name"]"#),
            ("filters", r#"[["docstatus","=",1]]"#),
            ("order_by", "creation desc"),
            ("limit_page_length", "1"),
        ]);
        let response = checked(self.authorized(request).send().await?, "last invoice").await?;
        let envelope: ResourceEnvelope<NameRow> = response
            .json()
            .await
            .map_err(|e| NextposError::Host(format!("last invoice: malformed response: {}", e)))?;
        Ok(envelope.data.into_iter().next().map(|row| row.name))
    }
}
