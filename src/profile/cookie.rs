//! Stores the active profile in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::Duration;

use crate::{Error, profile::UserID};

pub(crate) const COOKIE_PROFILE_ID: &str = "profile_id";
/// How long the browser remembers the selected profile.
pub(crate) const PROFILE_COOKIE_DURATION: Duration = Duration::days(365);

/// Add a cookie to the jar that marks `user_id` as the active profile.
pub(crate) fn set_active_profile_cookie(jar: PrivateCookieJar, user_id: UserID) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_PROFILE_ID, user_id.as_i64().to_string()))
            .max_age(PROFILE_COOKIE_DURATION)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the active profile from the cookie jar.
///
/// # Errors
///
/// Returns [Error::NoActiveProfile] if the cookie is missing or does not hold
/// a valid ID.
pub(crate) fn get_active_profile_id(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    let cookie = jar.get(COOKIE_PROFILE_ID).ok_or(Error::NoActiveProfile)?;

    cookie
        .value_trimmed()
        .parse::<i64>()
        .map(UserID::new)
        .map_err(|_| Error::NoActiveProfile)
}
