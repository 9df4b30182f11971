//! The log-in page and the handler for log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    alert::NoticeQuery,
    auth::{
        cookie::{invalidate_auth_cookie, set_auth_cookie},
        failure::AuthFailure,
        redirect::normalize_redirect_url,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, LINK_STYLE, email_input, loading_spinner,
        log_in_register, page, password_input,
    },
    preferences::Preferences,
    timezone::get_local_offset,
    user::get_user_by_email,
};

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class=(FORM_CHECKBOX_STYLE);

                label
                    for="remember_me"
                    class="block text-sm font-bold text-slate-600 dark:text-slate-300"
                {
                    "Manter conectado por uma semana"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Acessar conta"
            }

            p class="text-sm text-center"
            {
                a href=(endpoints::FORGOT_PASSWORD_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Esqueceu sua senha?"
                }
            }

            p class="text-sm text-center text-slate-500 dark:text-slate-400" {
                "Novo por aqui? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Crie sua conta"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(
    Query(query): Query<RedirectQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Bem-vindo", &log_in_form);

    page(
        "Entrar",
        &[],
        &content,
        Preferences::default(),
        notice.alerta.map(|notice| notice.into_alert()),
    )
    .into_response()
}

/// How long the auth cookie should last if the user selects "remember me" at log-in.
pub(crate) const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    pub email: String,

    /// Compared against the stored hash, so it is not validated here.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set.
    /// `Some` means checked, whatever the string is.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

fn check_credentials(state: &LoginState, user_data: &LogInData) -> Result<crate::user::User, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = get_user_by_email(&user_data.email, &connection)?;

    if user.password_hash.verify(&user_data.password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// requested page or the dashboard. Otherwise the form is returned with an
/// error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let user = match check_credentials(&state, &user_data) {
        Ok(user) => user,
        Err(error) => {
            let failure = AuthFailure::from(&error);
            if failure == AuthFailure::Other {
                tracing::error!("Unhandled error while verifying credentials: {error}");
            }

            return log_in_form(&user_data.email, Some(failure.message()), redirect_url)
                .into_response();
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    tracing::info!("User {} logged in", user.id);

    set_auth_cookie(jar.clone(), user.id, cookie_duration, local_offset)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}


#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{StatusCode, header::SET_COOKIE},
        response::Response,
    };
    use axum_extra::extract::{Form, PrivateCookieJar};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::Duration;

    use crate::{
        app_state::create_cookie_key,
        auth::DEFAULT_COOKIE_DURATION,
        db::initialize,
        endpoints,
        test_utils::{
            TEST_PASSWORD, assert_hx_redirect, create_test_user, parse_html_fragment,
        },
    };

    use super::{LogInData, LoginState, REMEMBER_ME_COOKIE_DURATION, post_log_in};

    fn get_test_state() -> LoginState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_test_user(&connection);

        LoginState {
            cookie_key: create_cookie_key("pao-de-queijo"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: "America/Sao_Paulo".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    async fn new_log_in_request(state: LoginState, form: LogInData) -> Response {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, Form(form)).await
    }

    fn log_in_data(email: &str, password: &str) -> LogInData {
        LogInData {
            email: email.to_owned(),
            password: password.to_owned(),
            remember_me: None,
            redirect_url: None,
        }
    }

    fn get_cookie_max_age(response: &Response) -> Duration {
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("Set-Cookie header missing")
            .to_str()
            .unwrap();
        let cookie = axum_extra::extract::cookie::Cookie::parse(set_cookie.to_owned()).unwrap();
        let expires = cookie.expires_datetime().expect("cookie has no expiry");

        expires - time::OffsetDateTime::now_utc()
    }

    #[track_caller]
    fn assert_form_error(document: &scraper::Html, want: &str) {
        let error = document
            .select(&Selector::parse("input#password + p.text-rose-500").unwrap())
            .next()
            .expect("No password error message");

        assert_eq!(error.text().collect::<String>(), want);
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = get_test_state();

        let response =
            new_log_in_request(state, log_in_data("teste@econo.app", TEST_PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!((get_cookie_max_age(&response) - DEFAULT_COOKIE_DURATION).abs() < Duration::seconds(2));
    }

    #[tokio::test]
    async fn log_in_email_ignores_case() {
        let state = get_test_state();

        let response =
            new_log_in_request(state, log_in_data("Teste@Econo.app", TEST_PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn remember_me_extends_cookie_to_a_week() {
        let state = get_test_state();
        let mut form = log_in_data("teste@econo.app", TEST_PASSWORD);
        form.remember_me = Some("on".to_owned());

        let response = new_log_in_request(state, form).await;

        assert!(
            (get_cookie_max_age(&response) - REMEMBER_ME_COOKIE_DURATION).abs()
                < Duration::seconds(2)
        );
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_page() {
        let state = get_test_state();
        let mut form = log_in_data("teste@econo.app", TEST_PASSWORD);
        form.redirect_url = Some("/analytics".to_owned());

        let response = new_log_in_request(state, form).await;

        assert_hx_redirect(&response, endpoints::ANALYTICS_VIEW);
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let state = get_test_state();

        let response =
            new_log_in_request(state, log_in_data("teste@econo.app", "senha-errada")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_fragment(response).await;
        assert_form_error(&document, "E-mail ou senha incorretos.");
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email_and_keeps_email() {
        let state = get_test_state();

        let response =
            new_log_in_request(state, log_in_data("ninguem@econo.app", TEST_PASSWORD)).await;

        let document = parse_html_fragment(response).await;
        assert_form_error(&document, "E-mail ou senha incorretos.");
        let email = document
            .select(&Selector::parse("input#email").unwrap())
            .next()
            .unwrap();
        assert_eq!(email.value().attr("value"), Some("ninguem@econo.app"));
    }
}
