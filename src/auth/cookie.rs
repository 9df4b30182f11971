//! Reading and writing the auth cookie.
//!
//! The cookie is private (encrypted and signed) and holds a JSON [Token].

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, auth::token::Token, user::UserID};

/// The name of the cookie holding the auth token.
pub(crate) const COOKIE_TOKEN: &str = "econo_token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie to the cookie jar, indicating that a user is logged in.
///
/// The token expires `duration` from now, expressed in `local_offset`.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token could not be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc().to_offset(local_offset) + duration;

    set_token(
        jar,
        Token {
            user_id,
            expires_at,
        },
    )
}

fn set_token(jar: PrivateCookieJar, token: Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the token from the auth cookie if it has not expired.
///
/// # Errors
///
/// Returns [Error::CookieMissing] if there is no auth cookie, or
/// [Error::InvalidToken] if the token cannot be parsed or has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidToken(error.to_string()))?;

    if !token.is_valid_at(OffsetDateTime::now_utc()) {
        return Err(Error::InvalidToken(format!(
            "token expired at {}",
            token.expires_at
        )));
    }

    Ok(token)
}

/// Set the expiry of the auth cookie in `jar` to the latest of now plus
/// `duration` and the token's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] or [Error::InvalidToken] if there is no valid token in `jar`.
/// - [Error::InvalidToken] if extending the expiry by `duration` would overflow.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidToken("expiry overflowed".to_owned()))?;

    set_token(
        jar,
        Token {
            user_id: token.user_id,
            expires_at: max(token.expires_at, new_expiry),
        },
    )
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{Error, auth::token::Token, user::UserID};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
        get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie, set_token,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"feijoada-com-farofa");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    fn sao_paulo() -> UtcOffset {
        UtcOffset::from_hms(-3, 0, 0).unwrap()
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_succeeds() {
        let user_id = UserID::new(42);

        let jar = set_auth_cookie(get_jar(), user_id, DEFAULT_COOKIE_DURATION, sao_paulo()).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_eq!(token.user_id, user_id);
        assert_eq!(token.expires_at.offset(), sao_paulo());
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );

        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::CookieMissing));
    }

    #[test]
    fn garbage_cookie_is_an_invalid_token() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "not json"));

        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jar = set_token(
            get_jar(),
            Token {
                user_id: UserID::new(1),
                expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
            },
        )
        .unwrap();

        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidToken(_))
        ));
    }

    #[test]
    fn invalidated_cookie_has_no_token() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION, sao_paulo()).unwrap();

        let jar = invalidate_auth_cookie(jar);

        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(get_token_from_cookies(&jar).is_err());
    }

    #[test]
    fn extend_pushes_short_expiry_forward() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(5), sao_paulo()).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), sao_paulo()).unwrap();

        assert_date_time_close(
            get_token_from_cookies(&jar).unwrap().expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
    }

    #[test]
    fn extend_keeps_longer_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), sao_paulo()).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), sao_paulo()).unwrap();

        assert_date_time_close(
            get_token_from_cookies(&jar).unwrap().expires_at,
            OffsetDateTime::now_utc() + Duration::days(7),
        );
    }

    #[test]
    fn extend_fails_without_cookie() {
        assert_eq!(
            extend_auth_cookie_duration_if_needed(get_jar(), Duration::minutes(5), sao_paulo())
                .err(),
            Some(Error::CookieMissing)
        );
    }
}
