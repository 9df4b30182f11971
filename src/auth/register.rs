//! The registration page and the handler that creates new users.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    alert::Notice,
    auth::{cookie::set_auth_cookie, failure::AuthFailure},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        email_input, loading_spinner, log_in_register, password_input,
    },
    timezone::get_local_offset,
    user::{NewUser, create_user},
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 8;

fn name_input(name: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="display_name" class=(FORM_LABEL_STYLE) { "Nome completo" }

            input
                type="text"
                name="display_name"
                id="display_name"
                placeholder="Seu nome"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(name);

            @if let Some(error_message) = error_message
            {
                p class="text-rose-500 text-base" { (error_message) }
            }
        }
    }
}

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirmar senha" }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()];

            @if let Some(error_message) = error_message
            {
                p class="text-rose-500 text-base" { (error_message) }
            }
        }
    }
}

/// Which field an error message belongs under.
#[derive(Debug, Default)]
struct RegistrationErrors<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(name: &str, email: &str, errors: RegistrationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (name_input(name, errors.name))
            (email_input(email, errors.email))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Cadastrar agora"
            }

            p class="text-sm text-center text-slate-500 dark:text-slate-400"
            {
                "Já é cadastrado? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Faça login"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", RegistrationErrors::default());
    let content = log_in_register("Criar conta", &registration_form);
    base("Cadastro", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
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
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create a user, log them in and send them to the profile setup page.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let name = user_data.display_name.trim();
    let raw_email = user_data.email.trim();
    let render_error = |errors: RegistrationErrors| {
        registration_form(name, raw_email, errors).into_response()
    };

    if name.is_empty() {
        return render_error(RegistrationErrors {
            name: Some("Informe seu nome."),
            ..Default::default()
        });
    }

    let Ok(email) = EmailAddress::from_str(raw_email) else {
        return render_error(RegistrationErrors {
            email: Some("Informe um e-mail válido."),
            ..Default::default()
        });
    };

    let validated_password =
        match ValidatedPassword::new(&user_data.password, &[raw_email, name]) {
            Ok(password) => password,
            Err(Error::TooWeak(message)) => {
                return render_error(RegistrationErrors {
                    password: Some(&message),
                    ..Default::default()
                });
            }
            Err(error) => {
                tracing::error!("Unexpected error validating a password: {error}");
                return render_error(RegistrationErrors {
                    password: Some(AuthFailure::Other.message()),
                    ..Default::default()
                });
            }
        };

    if user_data.password != user_data.confirm_password {
        return render_error(RegistrationErrors {
            confirm_password: Some("As senhas não coincidem."),
            ..Default::default()
        });
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return render_error(RegistrationErrors {
                password: Some(AuthFailure::Other.message()),
                ..Default::default()
            });
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let new_user = NewUser {
        email,
        display_name: name.to_owned(),
        password_hash,
    };
    let user = match state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| create_user(new_user, &connection))
    {
        Ok(user) => user,
        Err(error) => {
            let failure = AuthFailure::from(&error);
            if failure == AuthFailure::Other {
                tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            }

            return render_error(RegistrationErrors {
                email: Some(failure.message()),
                ..Default::default()
            });
        }
    };

    tracing::info!("Registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(Notice::CadastroRealizado.append_to(endpoints::PROFILE_SETUP_VIEW)),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            error.into_alert_response()
        }
    }
}
