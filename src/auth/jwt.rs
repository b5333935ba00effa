//! JWT token generation and validation
//! Implements the access token + refresh token pattern; the role is encoded
//! in the issuer claim ("chirpy-access" / "chirpy-refresh")

use crate::{config::AppConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Token role, encoded via the issuer claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Access,
    Refresh,
}

impl TokenRole {
    pub fn as_issuer(self) -> &'static str {
        match self {
            TokenRole::Access => "chirpy-access",
            TokenRole::Refresh => "chirpy-refresh",
        }
    }

    /// Exactly two literal values are accepted; everything else is rejected
    pub fn from_issuer(iss: &str) -> Option<Self> {
        match iss {
            "chirpy-access" => Some(TokenRole::Access),
            "chirpy-refresh" => Some(TokenRole::Refresh),
            _ => None,
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Role encoding
    pub iss: String,

    /// Subject (string-encoded user ID)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user ID
    pub fn subject_id(&self) -> Result<u64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }
}

/// Token failures
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token")]
    Malformed,

    #[error("Wrong token role")]
    WrongRole,
}

/// Token pair issued on login
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
}

impl JwtService {
    /// Create JWT service from a raw secret and token lifetimes
    pub fn new(
        secret: &str,
        access_token_exp_secs: u64,
        refresh_token_exp_secs: u64,
    ) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_exp_secs,
            refresh_token_exp_secs,
        })
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Self::new(
            secret,
            config.security.access_token_exp_secs,
            config.security.refresh_token_exp_secs,
        )
        .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Issue a signed token for the given role
    pub fn issue(&self, user_id: u64, role: TokenRole) -> Result<String, TokenError> {
        let lifetime_secs = match role {
            TokenRole::Access => self.access_token_exp_secs,
            TokenRole::Refresh => self.refresh_token_exp_secs,
        };

        let now = Utc::now();
        let expiration = now + Duration::seconds(lifetime_secs as i64);

        let claims = Claims {
            iss: role.as_issuer().to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            TokenError::Signing(e.to_string())
        })
    }

    /// Issue an access + refresh pair
    pub fn issue_pair(&self, user_id: u64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenRole::Access)?,
            refresh_token: self.issue(user_id, TokenRole::Refresh)?,
        })
    }

    /// Validate signature and expiry, returning the claims
    ///
    /// Role and revocation are not checked here; callers decide.
    pub fn parse_and_verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!("Token validation failed: {:?}", e);
                    TokenError::Malformed
                }
            })
    }

    /// Strict equality check on the role claim
    pub fn require_role(&self, claims: Claims, expected: TokenRole) -> Result<Claims, TokenError> {
        match TokenRole::from_issuer(&claims.iss) {
            Some(role) if role == expected => Ok(claims),
            _ => Err(TokenError::WrongRole),
        }
    }

    /// Validate a token and require the access role in one step
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.parse_and_verify(token)?;
        self.require_role(claims, TokenRole::Access)
    }

    /// Validate a token and require the refresh role in one step
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.parse_and_verify(token)?;
        self.require_role(claims, TokenRole::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new("test_secret_key_32_characters_long!", 3600, 5_184_000).unwrap()
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let service = test_service();

        let token = service.issue(42, TokenRole::Access).unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.iss, "chirpy-access");
        assert_eq!(claims.subject_id().unwrap(), 42);
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let service = test_service();

        let token = service.issue(7, TokenRole::Refresh).unwrap();
        let claims = service.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.iss, "chirpy-refresh");
        assert_eq!(claims.subject_id().unwrap(), 7);
    }

    #[test]
    fn test_role_mismatch_is_rejected() {
        let service = test_service();

        let access = service.issue(1, TokenRole::Access).unwrap();
        assert!(matches!(
            service.verify_refresh_token(&access),
            Err(TokenError::WrongRole)
        ));

        let refresh = service.issue(1, TokenRole::Refresh).unwrap();
        assert!(matches!(
            service.verify_access_token(&refresh),
            Err(TokenError::WrongRole)
        ));
    }

    #[test]
    fn test_wrong_secret_fails_with_invalid_signature() {
        let service = test_service();
        let other = JwtService::new("another_secret_key_32_characters_xx", 3600, 5_184_000).unwrap();

        let token = service.issue(1, TokenRole::Access).unwrap();
        assert!(matches!(
            other.parse_and_verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new("test_secret_key_32_characters_long!", 0, 0).unwrap();

        let token = service.issue(1, TokenRole::Access).unwrap();
        // exp == iat, so the token is already past its expiry with zero leeway
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(matches!(
            service.parse_and_verify(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service = test_service();
        assert!(matches!(
            service.parse_and_verify("not-a-token"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(
            JwtService::new("", 3600, 5_184_000),
            Err(TokenError::Signing(_))
        ));
    }
}
