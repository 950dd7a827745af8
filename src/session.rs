//! Session gate: verifies the auth provider's bearer tokens.

use actix_web::{HttpRequest, HttpResponse};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde_json::json;

use crate::config::Config;
use crate::error::SessionError;
use crate::models::Claims;

pub const SIGN_IN_PATH: &str = "/auth";

/// The signed-in user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

pub fn decode_session(req: &HttpRequest, config: &Config) -> Result<Session, SessionError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or(SessionError::MissingHeader)?;

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(SessionError::MalformedHeader)?;

    let mut validation = Validation::new(Algorithm::HS256);
    match &config.jwt_audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(Session {
        user_id: token_data.claims.sub,
        email: token_data.claims.email,
    })
}

/// Like [`decode_session`], but answers with the sign-in redirect the page shows
/// when there is no usable session.
pub fn require_session(
    req: &HttpRequest,
    config: &Config,
    message: &str,
) -> Result<Session, HttpResponse> {
    decode_session(req, config).map_err(|e| {
        debug!("Session rejected: {}", e);
        HttpResponse::Unauthorized().json(json!({ "error": message, "redirect": SIGN_IN_PATH }))
    })
}

/// Mints a token the way the auth provider does. Used by tests and local tooling.
pub fn issue_token(
    secret: &str,
    user_id: &str,
    email: Option<&str>,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.map(str::to_string),
        role: Some("authenticated".to_string()),
        exp: (chrono::Utc::now() + ttl).timestamp().max(0) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    const SECRET: &str = "test-secret";

    fn config() -> Config {
        Config::for_testing(SECRET)
    }

    #[test]
    fn accepts_a_valid_token() {
        let token = issue_token(SECRET, "user-42", Some("u@example.com"), Duration::hours(1)).unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        let session = decode_session(&req, &config()).unwrap();
        assert_eq!(session.user_id, "user-42");
        assert_eq!(session.email.as_deref(), Some("u@example.com"));
    }

    #[test]
    fn missing_header_is_rejected() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(decode_session(&req, &config()), Err(SessionError::MissingHeader)));
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(matches!(decode_session(&req, &config()), Err(SessionError::MalformedHeader)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(SECRET, "user-42", None, Duration::hours(-2)).unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        assert!(matches!(decode_session(&req, &config()), Err(SessionError::InvalidToken(_))));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token("other-secret", "user-42", None, Duration::hours(1)).unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        assert!(matches!(decode_session(&req, &config()), Err(SessionError::InvalidToken(_))));
    }

    #[test]
    fn rejection_carries_the_page_message_and_redirect() {
        let req = TestRequest::default().to_http_request();
        let resp = require_session(&req, &config(), "Please sign in to view bookings").unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
