//! Firebase identity verifier.
//!
//! Verifies Firebase ID tokens (RS256 JWTs) against Google's published JWKS
//! for the secure-token service, then maps the claims into a
//! `VerifiedIdentity`. Keys are cached and refreshed on expiry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::Role;
use crate::ports::{IdentityError, IdentityVerifier, VerifiedIdentity};

/// Google's JWKS endpoint for Firebase secure tokens.
const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// How long fetched keys are trusted before a refresh.
const KEY_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Claims carried by a Firebase ID token that we consume.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    /// Custom role claim set by the admin backend.
    #[serde(default)]
    role: Option<String>,
}

impl FirebaseClaims {
    fn into_identity(self) -> Result<VerifiedIdentity, IdentityError> {
        let email = self.email.ok_or_else(|| {
            IdentityError::InvalidCredential("token carries no email claim".to_string())
        })?;
        Ok(VerifiedIdentity {
            subject: self.sub,
            display_name: self.name.unwrap_or_else(|| "Unnamed User".to_string()),
            email,
            role: Role::normalize(self.role.as_deref()),
        })
    }
}

/// Verifier for Firebase-issued bearer tokens.
pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    http_client: reqwest::Client,
    cached_keys: RwLock<Option<(Instant, JwkSet)>>,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: JWKS_URL.to_string(),
            http_client: reqwest::Client::new(),
            cached_keys: RwLock::new(None),
        }
    }

    /// Set a custom JWKS endpoint (for testing).
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);
        validation
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        if let Some(key) = self.cached_key(kid).await? {
            return Ok(key);
        }

        // Cache miss or rotated key: refresh and retry once.
        self.refresh_keys().await?;
        self.cached_key(kid)
            .await?
            .ok_or_else(|| IdentityError::InvalidCredential(format!("unknown key id '{kid}'")))
    }

    async fn cached_key(&self, kid: &str) -> Result<Option<DecodingKey>, IdentityError> {
        let cached = self.cached_keys.read().await;
        let Some((fetched_at, keys)) = cached.as_ref() else {
            return Ok(None);
        };
        if fetched_at.elapsed() > KEY_CACHE_TTL {
            return Ok(None);
        }
        keys.keys
            .iter()
            .find(|k| k.kid == kid)
            .map(|k| {
                DecodingKey::from_rsa_components(&k.n, &k.e)
                    .map_err(|e| IdentityError::Unavailable(format!("bad JWKS key: {e}")))
            })
            .transpose()
    }

    async fn refresh_keys(&self) -> Result<(), IdentityError> {
        let keys: JwkSet = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("bad JWKS response: {e}")))?;

        *self.cached_keys.write().await = Some((Instant::now(), keys));
        Ok(())
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header = decode_header(bearer_token)
            .map_err(|e| IdentityError::InvalidCredential(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidCredential("token has no key id".to_string()))?;

        let key = self.key_for(&kid).await?;

        let token_data = decode::<FirebaseClaims>(bearer_token, &key, &self.validation())
            .map_err(|e| IdentityError::InvalidCredential(e.to_string()))?;

        token_data.claims.into_identity()
    }
}
