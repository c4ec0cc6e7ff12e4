use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::{validate_token, Claims};
use crate::config;

/// Authenticated user context resolved from the request's token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub onboarding_completed: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            onboarding_completed: claims.onboarding_completed,
        }
    }
}

/// Resolve the caller from either an Authorization bearer header or the
/// session cookie. None means "no session present"; an invalid or expired
/// token is treated the same way at the gate.
pub fn resolve_auth(headers: &HeaderMap) -> Option<AuthUser> {
    let token = bearer_token(headers).or_else(|| session_cookie(headers))?;
    match validate_token(&token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!("rejected session token: {}", e);
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_name = &config::config().security.session_cookie_name;
    let cookies = headers.get("cookie")?.to_str().ok()?;
    for pair in cookies.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if name == cookie_name && !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

/// Set-Cookie value establishing the session.
pub fn session_cookie_header(token: &str) -> String {
    let security = &config::config().security;
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        security.session_cookie_name,
        token,
        security.jwt_expiry_hours * 3600
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value clearing the session (logout).
pub fn clear_session_cookie_header() -> String {
    let security = &config::config().security;
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        security.session_cookie_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    use crate::auth::{generate_token, Claims};

    fn headers_with(name: &str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            name.parse::<HeaderName>().unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn resolves_bearer_token() {
        let claims = Claims::new(Uuid::new_v4(), "a@x.com".into(), false);
        let token = generate_token(&claims).unwrap();

        let headers = headers_with("authorization", &format!("Bearer {}", token));
        let user = resolve_auth(&headers).unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(!user.onboarding_completed);
    }

    #[test]
    fn resolves_session_cookie() {
        let claims = Claims::new(Uuid::new_v4(), "b@x.com".into(), true);
        let token = generate_token(&claims).unwrap();
        let cookie_name = &crate::config::config().security.session_cookie_name;

        let headers = headers_with("cookie", &format!("other=1; {}={}", cookie_name, token));
        let user = resolve_auth(&headers).unwrap();
        assert_eq!(user.email, "b@x.com");
    }

    #[test]
    fn missing_or_bad_tokens_resolve_to_none() {
        assert!(resolve_auth(&HeaderMap::new()).is_none());
        assert!(resolve_auth(&headers_with("authorization", "Bearer garbage")).is_none());
        assert!(resolve_auth(&headers_with("authorization", "Basic abc")).is_none());
        assert!(resolve_auth(&headers_with("authorization", "Bearer ")).is_none());
    }
}
