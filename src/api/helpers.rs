use std::time::Duration;

use poem::web::cookie::{Cookie, SameSite};
use validator::{ValidateEmail, ValidateUrl};

pub const REFRESH_COOKIE_NAME: &str = "refreshToken";
pub const REFRESH_COOKIE_PATH: &str = "/api/auth";
const REFRESH_COOKIE_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

fn refresh_cookie(value: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = Cookie::new_with_str(REFRESH_COOKIE_NAME, value);
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_path(REFRESH_COOKIE_PATH);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_max_age(max_age);
    cookie.to_string()
}

/// `Set-Cookie` value carrying a freshly issued refresh token
pub fn set_refresh_cookie(token: &str, secure: bool) -> String {
    refresh_cookie(token, REFRESH_COOKIE_MAX_AGE, secure)
}

/// `Set-Cookie` value that makes the browser drop the refresh token
pub fn clear_refresh_cookie(secure: bool) -> String {
    refresh_cookie("", Duration::ZERO, secure)
}

/// Format check for the optional contact fields
///
/// Returns the name of the first field that is present and malformed.
pub fn invalid_contact_field(
    email_primary: Option<&str>,
    website_url: Option<&str>,
) -> Option<&'static str> {
    if email_primary.is_some_and(|email| !email.validate_email()) {
        return Some("email_primary");
    }
    if website_url.is_some_and(|url| !url.validate_url()) {
        return Some("website_url");
    }
    None
}
