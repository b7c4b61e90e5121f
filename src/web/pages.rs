use axum::response::Html;
use serde_json::Value;

use super::types::Session;
use crate::listings::Listing;

/// Visitor-facing copy for the fixed notice/error codes carried in redirect
/// query strings. Unknown codes render nothing.
fn flash_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "link_sent" => {
            "If an account exists for this address, a magic link has been sent. \
             Please check your email to continue."
        }
        "logged_in" => "Logged in successfully!",
        "logged_out" => "You have been logged out.",
        "invalid_link" => "Invalid or expired magic link. Please try logging in again.",
        "auth_failed" => "Authentication failed. Please request a new magic link.",
        "link_delivery_failed" => {
            "We could not send a magic link right now. Please try again later."
        }
        "email_required" => "Please provide a valid email address.",
        _ => return None,
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_banner(notice: Option<&str>, error: Option<&str>) -> String {
    let mut html = String::new();
    if let Some(message) = notice.and_then(flash_message) {
        html.push_str(&format!(r#"<p class="flash notice">{message}</p>"#));
    }
    if let Some(message) = error.and_then(flash_message) {
        html.push_str(&format!(r#"<p class="flash error">{message}</p>"#));
    }
    html
}

fn nav(session: Option<&Session>) -> String {
    match session {
        Some(session) => {
            let who = session
                .email
                .as_deref()
                .map(escape)
                .unwrap_or_else(|| session.user_id.to_string());
            format!(r#"<nav><span>Signed in as {who}</span> <a href="/logout">Log out</a></nav>"#)
        }
        None => r#"<nav><a href="/login">Log in</a></nav>"#.to_string(),
    }
}

fn listing_card(listing: &Listing) -> String {
    let text = |key: &str| {
        listing
            .get(key)
            .and_then(Value::as_str)
            .map(escape)
    };

    let name = text("name").unwrap_or_else(|| "Listing".to_string());
    let place = [text("address"), text("city")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    let price = listing
        .get("price_per_night")
        .and_then(Value::as_f64)
        .map(|p| format!("<p class=\"price\">£{p:.0} / night</p>"))
        .unwrap_or_default();
    let image = text("image_url")
        .map(|src| format!(r#"<img src="{src}" alt="{name}">"#))
        .unwrap_or_default();

    format!(
        r#"<article class="listing">{image}<h2>{name}</h2><p>{place}</p>{price}</article>"#
    )
}

fn page(title: &str, body: String) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>{title} · stayfinder</title></head><body>{body}</body></html>"
    ))
}

pub(super) fn index(
    listings: &[Listing],
    session: Option<&Session>,
    maps_api_key: Option<&str>,
    notice: Option<&str>,
    error: Option<&str>,
) -> Html<String> {
    let cards: String = listings.iter().map(listing_card).collect();
    let maps = maps_api_key
        .map(|key| {
            format!(
                r#"<script async src="https://maps.googleapis.com/maps/api/js?key={}"></script>"#,
                escape(key)
            )
        })
        .unwrap_or_default();

    page(
        "Listings",
        format!(
            "{nav}{flash}<h1>Places to stay</h1><section class=\"listings\">{cards}</section>{maps}",
            nav = nav(session),
            flash = flash_banner(notice, error),
        ),
    )
}

pub(super) fn login(notice: Option<&str>, error: Option<&str>) -> Html<String> {
    page(
        "Log in",
        format!(
            "{flash}<h1>Log in</h1>\
             <p>Enter your email and we will send you a magic link.</p>\
             <form method=\"post\" action=\"/login\">\
             <input type=\"email\" name=\"email\" placeholder=\"you@example.com\">\
             <button type=\"submit\">Send magic link</button>\
             </form>\
             <p><a href=\"/\">Back to listings</a></p>",
            flash = flash_banner(notice, error),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_messages() {
        assert!(flash_message("link_sent").is_some());
        assert!(flash_message("invalid_link").is_some());
        assert!(flash_message("auth_failed").is_some());
    }

    #[test]
    fn unknown_codes_render_nothing() {
        assert_eq!(flash_message("nonsense"), None);
        assert_eq!(flash_banner(Some("nonsense"), None), "");
    }

    #[test]
    fn maps_script_included_only_when_configured() {
        let html = index(&[], None, Some("maps-key"), None, None).0;
        assert!(html.contains("maps.googleapis.com"));

        let html = index(&[], None, None, None, None).0;
        assert!(!html.contains("maps.googleapis.com"));
    }

    #[test]
    fn remote_text_is_escaped() {
        let mut row = Listing::new();
        row.insert(
            "name".into(),
            Value::String("<script>alert(1)</script>".into()),
        );
        let card = listing_card(&row);
        assert!(!card.contains("<script>"));
        assert!(card.contains("&lt;script&gt;"));
    }
}
