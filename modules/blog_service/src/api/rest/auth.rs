//! Bearer token verification for admin routes
//!
//! Tokens are issued by an external identity provider; this module only
//! verifies them and turns the claims into an [`AuthContext`].

use super::error::{map_domain_error, Problem};
use crate::config::AuthConfig;
use crate::contract::{AuthContext, BlogError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;

/// Claims read from admin tokens
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

/// HS256 token verifier built from [`AuthConfig`]
pub struct TokenVerifier {
    enabled: bool,
    key: DecodingKey,
    validation: Validation,
    required_role: Option<String>,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> anyhow::Result<Self> {
        if config.enabled && config.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret must be set when auth is enabled");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            enabled: config.enabled,
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            required_role: config.required_role.clone(),
        })
    }

    /// Accepts every request with an anonymous context
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            key: DecodingKey::from_secret(&[]),
            validation: Validation::new(Algorithm::HS256),
            required_role: None,
        }
    }

    /// Verify the `Authorization: Bearer` header
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, BlogError> {
        if !self.enabled {
            return Ok(AuthContext::default());
        }

        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| BlogError::Unauthorized {
                reason: "missing bearer token".to_string(),
            })?;

        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            BlogError::Unauthorized {
                reason: "invalid or expired token".to_string(),
            }
        })?;

        let context = AuthContext {
            subject: data.claims.sub,
            roles: data.claims.roles,
        };

        if let Some(role) = &self.required_role {
            if !context.has_role(role) {
                return Err(BlogError::Forbidden {
                    reason: format!("role '{}' is required", role),
                });
            }
        }

        Ok(context)
    }
}

/// Middleware guarding the admin router
///
/// Inserts the caller's [`AuthContext`] as a request extension.
pub async fn require_auth(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Problem> {
    let context = verifier
        .authenticate(request.headers())
        .map_err(map_domain_error)?;
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            enabled: true,
            jwt_secret: SECRET.to_string(),
            issuer: Some("https://id.example.com".to_string()),
            audience: None,
            required_role: Some("editor".to_string()),
        }
    }

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_valid_token_with_role() {
        let verifier = TokenVerifier::new(&config()).unwrap();
        let token = token(json!({
            "sub": "alice",
            "roles": ["editor"],
            "iss": "https://id.example.com",
            "exp": exp(),
        }));

        let ctx = verifier.authenticate(&bearer(&token)).unwrap();
        assert_eq!(ctx.subject.as_deref(), Some("alice"));
        assert!(ctx.has_role("editor"));
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let verifier = TokenVerifier::new(&config()).unwrap();
        let err = verifier.authenticate(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, BlogError::Unauthorized { .. }));
    }

    #[test]
    fn wrong_issuer_is_unauthorized() {
        let verifier = TokenVerifier::new(&config()).unwrap();
        let token = token(json!({
            "sub": "alice",
            "roles": ["editor"],
            "iss": "https://elsewhere.example.com",
            "exp": exp(),
        }));
        let err = verifier.authenticate(&bearer(&token)).unwrap_err();
        assert!(matches!(err, BlogError::Unauthorized { .. }));
    }

    #[test]
    fn missing_role_is_forbidden() {
        let verifier = TokenVerifier::new(&config()).unwrap();
        let token = token(json!({
            "sub": "bob",
            "roles": ["reader"],
            "iss": "https://id.example.com",
            "exp": exp(),
        }));
        let err = verifier.authenticate(&bearer(&token)).unwrap_err();
        assert!(matches!(err, BlogError::Forbidden { .. }));
    }

    #[test]
    fn enabled_without_secret_is_rejected() {
        let mut cfg = config();
        cfg.jwt_secret.clear();
        assert!(TokenVerifier::new(&cfg).is_err());
    }

    #[test]
    fn disabled_verifier_accepts_anything() {
        let verifier = TokenVerifier::disabled();
        let ctx = verifier.authenticate(&HeaderMap::new()).unwrap();
        assert_eq!(ctx, AuthContext::default());
    }
}
