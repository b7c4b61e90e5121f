use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::PrivateCookieJar;
use time::Duration;

use super::types::Session;

pub(crate) const SESSION_COOKIE_NAME: &str = "__stayfinder_session";

/// Store the session in the jar.
///
/// The cookie has no max-age: it lives for the browser session only.
pub(crate) fn write_session(
    jar: PrivateCookieJar,
    session: &Session,
    secure: bool,
) -> Result<PrivateCookieJar, serde_json::Error> {
    let value = serde_json::to_string(session)?;
    let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    Ok(jar.add(cookie))
}

/// Read the session back from the jar.
///
/// A missing, tampered, or undecodable cookie reads as an anonymous visitor.
pub(crate) fn read_session(jar: &PrivateCookieJar) -> Option<Session> {
    let cookie = jar.get(SESSION_COOKIE_NAME)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Remove the session cookie.
pub(crate) fn clear_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();
    jar.remove(cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};
    use axum_extra::extract::cookie::Key;
    use crate::types::UserId;

    fn session() -> Session {
        Session {
            user_id: UserId::from("u1".to_string()),
            email: Some("a@b.com".to_string()),
            access_token: "T1".to_string(),
            refresh_token: "T2".to_string(),
        }
    }

    fn empty_jar() -> PrivateCookieJar {
        PrivateCookieJar::from_headers(&HeaderMap::new(), Key::generate())
    }

    #[test]
    fn session_roundtrips_through_jar() {
        let jar = write_session(empty_jar(), &session(), true).unwrap();

        let read = read_session(&jar).unwrap();
        assert_eq!(read.user_id.as_str(), "u1");
        assert_eq!(read.email.as_deref(), Some("a@b.com"));
        assert_eq!(read.access_token, "T1");
        assert_eq!(read.refresh_token, "T2");
    }

    #[test]
    fn tampered_cookie_reads_as_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("__stayfinder_session=garbage"),
        );
        let jar = PrivateCookieJar::from_headers(&headers, Key::generate());

        assert!(read_session(&jar).is_none());
    }

    #[test]
    fn clear_removes_the_session() {
        let jar = write_session(empty_jar(), &session(), true).unwrap();
        let jar = clear_session(jar);

        assert!(read_session(&jar).is_none());
    }
}
