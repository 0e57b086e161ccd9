//! Search token issuance and validation.
//!
//! A search token is a signed credential binding a session to one or more
//! namespaces, each with a fixed filter set. When token scoping is enabled,
//! the filters embedded in the token override whatever filters the client
//! supplies, so a token holder can never widen its scope.
//!
//! Wire format is compact `payload.signature`: the JSON payload and an
//! HMAC-SHA256 over its encoded form, both base64url without padding. The
//! payload carries no expiry claim; the binding is namespace + filters only.
//! Validation fails closed: every failure mode is an invalid-token error and
//! denies the search.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::TokenizingOptions;
use crate::error::{Result, SearchgateError};
use crate::request::FilterRef;

type HmacSha256 = Hmac<Sha256>;

/// Filter scope of one namespace inside a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceScope {
    /// The namespace name.
    pub name: String,
    /// Filters force-applied to every search under this namespace.
    #[serde(default)]
    pub filters: Vec<FilterRef>,
}

/// Token issuance request: the namespaces a session may search, with the
/// filter set imposed on each.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRequest {
    /// The scoped namespaces.
    pub namespaces: Vec<NamespaceScope>,
}

impl TokenRequest {
    /// Create a request scoping a single namespace.
    pub fn single<S: Into<String>>(namespace: S, filters: Vec<FilterRef>) -> Self {
        TokenRequest {
            namespaces: vec![NamespaceScope {
                name: namespace.into(),
                filters,
            }],
        }
    }
}

/// Token issuance and validation service.
///
/// Without a configured signing key the service is disabled: `is_enabled()`
/// is false and the request processor bypasses all token checks.
pub struct TokenService {
    sign_key: Option<Vec<u8>>,
}

impl TokenService {
    /// Create a service from the tokenizing options; `None` or an empty
    /// sign key disables token scoping.
    pub fn new(options: Option<&TokenizingOptions>) -> Self {
        let sign_key = options
            .filter(|o| !o.sign_key.is_empty())
            .map(|o| o.sign_key.as_bytes().to_vec());

        TokenService { sign_key }
    }

    /// Create a disabled service.
    pub fn disabled() -> Self {
        TokenService { sign_key: None }
    }

    /// Check if token scoping is active.
    pub fn is_enabled(&self) -> bool {
        self.sign_key.is_some()
    }

    /// Serialize and sign a token payload; returns the opaque token string.
    pub fn create_token(&self, request: &TokenRequest) -> Result<String> {
        let key = self
            .sign_key
            .as_deref()
            .ok_or_else(|| SearchgateError::config("token scoping is disabled: no sign key"))?;

        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(request)?);

        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| SearchgateError::config(format!("bad sign key: {e}")))?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token and extract the filter set bound to the namespace.
    ///
    /// Fails with an invalid-token error when the token is malformed, the
    /// signature does not verify, or the namespace is not among the token's
    /// scopes. The returned filters must be force-applied to the search.
    pub fn validate_and_extract(&self, token: &str, namespace: &str) -> Result<Vec<FilterRef>> {
        let key = self
            .sign_key
            .as_deref()
            .ok_or_else(|| SearchgateError::invalid_token("token scoping is disabled"))?;

        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| SearchgateError::invalid_token("malformed token"))?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SearchgateError::invalid_token("malformed signature"))?;

        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| SearchgateError::config(format!("bad sign key: {e}")))?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SearchgateError::invalid_token("signature mismatch"))?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SearchgateError::invalid_token("malformed payload"))?;
        let request: TokenRequest = serde_json::from_slice(&payload)
            .map_err(|_| SearchgateError::invalid_token("malformed payload"))?;

        request
            .namespaces
            .into_iter()
            .find(|scope| scope.name == namespace)
            .map(|scope| scope.filters)
            .ok_or_else(|| {
                SearchgateError::invalid_token(format!(
                    "token is not bound to namespace '{namespace}'"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_service(key: &str) -> TokenService {
        TokenService::new(Some(&TokenizingOptions {
            sign_key: key.to_string(),
        }))
    }

    #[test]
    fn test_disabled_without_key() {
        assert!(!TokenService::disabled().is_enabled());
        assert!(!TokenService::new(None).is_enabled());
        assert!(!enabled_service("").is_enabled());
        assert!(enabled_service("secret").is_enabled());
    }

    #[test]
    fn test_round_trip() {
        let service = enabled_service("secret");
        let request =
            TokenRequest::single("test", vec![FilterRef::new("from5to15")]);

        let token = service.create_token(&request).unwrap();
        let filters = service.validate_and_extract(&token, "test").unwrap();

        assert_eq!(filters, vec![FilterRef::new("from5to15")]);
    }

    #[test]
    fn test_namespace_mismatch_fails() {
        let service = enabled_service("secret");
        let token = service
            .create_token(&TokenRequest::single("test", vec![]))
            .unwrap();

        let result = service.validate_and_extract(&token, "other");
        assert!(matches!(result, Err(SearchgateError::InvalidToken(_))));
    }

    #[test]
    fn test_multi_namespace_token() {
        let service = enabled_service("secret");
        let request = TokenRequest {
            namespaces: vec![
                NamespaceScope {
                    name: "a".to_string(),
                    filters: vec![FilterRef::new("fa")],
                },
                NamespaceScope {
                    name: "b".to_string(),
                    filters: vec![FilterRef::new("fb")],
                },
            ],
        };
        let token = service.create_token(&request).unwrap();

        assert_eq!(
            service.validate_and_extract(&token, "b").unwrap(),
            vec![FilterRef::new("fb")]
        );
    }

    #[test]
    fn test_tampered_payload_fails() {
        let service = enabled_service("secret");
        let token = service
            .create_token(&TokenRequest::single("test", vec![]))
            .unwrap();

        let (payload, signature) = token.split_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&TokenRequest::single("admin", vec![])).unwrap(),
        );
        assert_ne!(forged_payload, payload);

        let forged = format!("{forged_payload}.{signature}");
        let result = service.validate_and_extract(&forged, "admin");
        assert!(matches!(result, Err(SearchgateError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let issuer = enabled_service("secret-a");
        let verifier = enabled_service("secret-b");

        let token = issuer
            .create_token(&TokenRequest::single("test", vec![]))
            .unwrap();

        let result = verifier.validate_and_extract(&token, "test");
        assert!(matches!(result, Err(SearchgateError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_token_fails() {
        let service = enabled_service("secret");

        for garbage in ["", "no-dot-here", "a.b", "!!!.???"] {
            let result = service.validate_and_extract(garbage, "test");
            assert!(
                matches!(result, Err(SearchgateError::InvalidToken(_))),
                "expected invalid token for {garbage:?}"
            );
        }
    }

    #[test]
    fn test_create_fails_when_disabled() {
        let service = TokenService::disabled();
        let result = service.create_token(&TokenRequest::single("test", vec![]));
        assert!(matches!(result, Err(SearchgateError::Config(_))));
    }
}
