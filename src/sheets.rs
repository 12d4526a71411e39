//! Order log in an external Google Sheet.
//!
//! Finalized orders are appended as `(timestamp, pen, trinket labels)` rows.
//! Auth is a service-account flow: sign an RS256 assertion, exchange it for
//! a short-lived bearer token, cache the token until close to expiry.

use async_trait::async_trait;
use chrono::Utc;
use jwt_simple::prelude::*;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{joined_labels, TrinketRef};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Refresh the cached token this many seconds before it actually expires.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[async_trait]
pub trait OrderLog: Send + Sync {
    /// Append one row for a finalized order.
    async fn append(&self, pen: &str, trinkets: &[TrinketRef]) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct GoogleClaims {
    scope: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: String,
    expires_at: i64,
}

/// Order log over the Google Sheets `values.append` API.
pub struct SheetsLog {
    client: Client,
    sheet_id: String,
    range: String,
    service_email: String,
    key_pair: RS256KeyPair,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsLog {
    pub fn new(config: &Config) -> Result<Self> {
        let key_pair = RS256KeyPair::from_pem(&config.service_key)
            .map_err(|e| AppError::Internal(format!("invalid service account key: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            sheet_id: config.sheet_id.clone(),
            range: config.sheet_range.clone(),
            service_email: config.service_email.clone(),
            key_pair,
            token: Mutex::new(None),
        })
    }

    fn sign_assertion(&self) -> Result<String> {
        let claims = Claims::with_custom_claims(
            GoogleClaims {
                scope: SHEETS_SCOPE.to_string(),
            },
            Duration::from_hours(1),
        )
        .with_issuer(&self.service_email)
        .with_audience(TOKEN_URL);

        self.key_pair
            .sign(claims)
            .map_err(|e| AppError::Internal(format!("failed to sign Google assertion: {}", e)))
    }

    /// Returns a valid bearer token, exchanging a fresh assertion when the
    /// cached one is missing or about to expire.
    async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if now + TOKEN_EXPIRY_MARGIN_SECS < token.expires_at {
                return Ok(token.token.clone());
            }
        }

        let assertion = self.sign_assertion()?;
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Collaborator(format!(
                "Google token exchange failed: {} {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let bearer = token.access_token.clone();
        *cached = Some(CachedToken {
            token: token.access_token,
            expires_at: now + token.expires_in,
        });

        Ok(bearer)
    }
}

#[async_trait]
impl OrderLog for SheetsLog {
    async fn append(&self, pen: &str, trinkets: &[TrinketRef]) -> Result<()> {
        let bearer = self.bearer_token().await?;

        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}:append",
            self.sheet_id, self.range
        );
        let body = serde_json::json!({
            "values": [[Utc::now().to_rfc3339(), pen, joined_labels(trinkets)]],
        });

        let response = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Collaborator(format!(
                "sheet append failed: {} {}",
                status, text
            )));
        }

        Ok(())
    }
}
