use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration as TimeDuration;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// HttpOnly session cookie scoped to the whole site. `secure` toggles with
/// the deployment environment so local HTTP setups keep working.
pub fn session_cookie(
    name: &'static str,
    value: String,
    max_age: TimeDuration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Cookie with the same attributes and a max-age of zero, which makes the
/// browser drop the stored one.
pub fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(TimeDuration::ZERO)
        .build()
}
