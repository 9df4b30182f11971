//! The profile setup page shown once after registration.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error,
    alert::{Notice, NoticeQuery},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
        log_in_register, page,
    },
    preferences::get_preferences,
    profile::{ProfileState, form::ProfileSetupForm},
    user::{User, UserID, complete_profile, get_user_by_id},
};

fn setup_form(user: &User) -> Markup {
    html! {
        form
            hx-post=(endpoints::PROFILE_SETUP_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            p class="text-sm text-slate-500 dark:text-slate-400"
            {
                "Olá, " (user.display_name) "! Conte um pouco mais sobre você."
            }

            div
            {
                label for="age" class=(FORM_LABEL_STYLE) { "Idade" }
                input
                    type="number"
                    name="age"
                    id="age"
                    min="1"
                    max="120"
                    inputmode="numeric"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="birth_date" class=(FORM_LABEL_STYLE) { "Data de nascimento" }
                input
                    type="date"
                    name="birth_date"
                    id="birth_date"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="photo_url" class=(FORM_LABEL_STYLE) { "Foto (URL)" }
                input
                    type="url"
                    name="photo_url"
                    id="photo_url"
                    placeholder="https://"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Concluir"
            }
        }
    }
}

/// Display the profile setup page.
///
/// Users that already completed their profile are sent to the dashboard.
pub async fn get_profile_setup_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;
    if user.profile_completed {
        return Ok(Redirect::to(endpoints::DASHBOARD_VIEW).into_response());
    }
    let preferences = get_preferences(user_id, &connection)?;

    let content = log_in_register("Complete seu perfil", &setup_form(&user));

    Ok(page(
        "Complete seu perfil",
        &[],
        &content,
        preferences,
        notice.alerta.map(|notice| notice.into_alert()),
    )
    .into_response())
}

/// Save the setup fields, mark the profile as completed and go to the dashboard.
pub async fn complete_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ProfileSetupForm>,
) -> Response {
    let setup = match form.into_setup() {
        Ok(setup) => setup,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match complete_profile(user_id, setup, &connection) {
        Ok(_) => {
            tracing::info!("User {user_id} completed their profile");
            (
                HxRedirect(Notice::PerfilConcluido.append_to(endpoints::DASHBOARD_VIEW)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not complete the profile of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
