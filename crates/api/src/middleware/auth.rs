//! Authentication of webhook deliveries.
//!
//! When `INGRESS_AUTH_TOKEN` is set, the webhook is created with that value as its
//! `authHeader`, and Helius echoes it in the `Authorization` header of every delivery.
//! `IngressAuth` rejects deliveries that do not carry it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;

use fundsentry_common::error::AppError;

use crate::state::AppState;

/// Marker extractor: present on a handler means the delivery was authenticated.
#[derive(Debug, Clone, Copy)]
pub struct IngressAuth;

/// Compare the provided header against the expected token in constant time.
pub fn token_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

impl FromRequestParts<AppState> for IngressAuth {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let expected = state.config.ingress_auth_token.clone();

        let provided = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        async move {
            let Some(expected) = expected else {
                return Ok(IngressAuth);
            };

            match provided {
                Some(provided) if token_matches(&expected, &provided) => Ok(IngressAuth),
                _ => {
                    tracing::warn!("Rejected webhook delivery with missing or wrong auth header");
                    Err(AppError::Auth(
                        "Missing or invalid Authorization header".to_string(),
                    ))
                }
            }
        }
    }
}
