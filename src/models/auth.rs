//! Authentication-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// Entry in the revocation deny-list, keyed by the exact token string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationRecord {
    pub revoked_at: DateTime<Utc>,
    /// The revoked token's own expiry; past-expiry records are prunable
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Polka webhook payload
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}
