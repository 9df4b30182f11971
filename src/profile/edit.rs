//! The Perfil tab: the profile form, the display preferences, the feedback
//! card and the app version.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    feedback::feedback_form,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, format_date, page,
    },
    navigation::NavBar,
    preferences::{FontSize, Preferences, Theme, get_preferences},
    profile::form::ProfileForm,
    user::{Gender, User, UserID, get_user_by_id, update_profile},
};

/// The state needed for the profile pages and the profile guard.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn profile_form(user: &User) -> Markup {
    let birth_date = user.birth_date.map(|date| date.to_string());

    html! {
        form
            id="profile-form"
            hx-post=(endpoints::PROFILE_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " space-y-6" }
        {
            div class="flex items-center gap-4"
            {
                @if let Some(photo_url) = &user.photo_url {
                    img
                        src=(photo_url)
                        alt="Foto de perfil"
                        class="w-16 h-16 rounded-2xl object-cover";
                } @else {
                    div class="w-16 h-16 rounded-2xl bg-indigo-600 text-white flex items-center justify-center text-2xl font-black"
                    {
                        (initial(&user.display_name))
                    }
                }

                div
                {
                    h3 class="text-lg font-black uppercase tracking-tight" { (user.display_name) }
                    p class="text-xs font-bold text-slate-400" { (user.email) }
                    p class="text-xs font-bold text-slate-400"
                    {
                        "Membro desde " (format_date(user.created_at.date()))
                    }
                }
            }

            div
            {
                label for="display_name" class=(FORM_LABEL_STYLE) { "Nome" }
                input
                    type="text"
                    name="display_name"
                    id="display_name"
                    required
                    value=(user.display_name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-6"
            {
                div
                {
                    label for="birth_date" class=(FORM_LABEL_STYLE) { "Data de nascimento" }
                    input
                        type="date"
                        name="birth_date"
                        id="birth_date"
                        value=[birth_date]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="gender" class=(FORM_LABEL_STYLE) { "Gênero" }
                    select name="gender" id="gender" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for gender in Gender::ALL {
                            option value=(gender.as_str()) selected[gender == user.gender]
                            {
                                (gender.as_str())
                            }
                        }
                    }
                }
            }

            div
            {
                label for="photo_url" class=(FORM_LABEL_STYLE) { "Foto (URL)" }
                input
                    type="url"
                    name="photo_url"
                    id="photo_url"
                    placeholder="https://"
                    value=[user.photo_url.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="bio" class=(FORM_LABEL_STYLE) { "Bio" }
                textarea
                    name="bio"
                    id="bio"
                    rows="3"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (user.bio.as_deref().unwrap_or_default())
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Salvar Perfil" }
        }
    }
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|first| first.to_uppercase().collect())
        .unwrap_or_default()
}

fn preferences_card(preferences: Preferences) -> Markup {
    let theme_label = match preferences.theme {
        Theme::Light => "Modo Escuro",
        Theme::Dark => "Modo Claro",
    };

    html! {
        section id="preferences" class={ (CARD_STYLE) " space-y-6" }
        {
            h3 class="text-sm font-black uppercase tracking-[0.2em]" { "Aparência" }

            button
                type="button"
                hx-post=(endpoints::THEME_API)
                hx-target-error="#alert-container"
                class="w-full px-4 py-3 rounded-2xl border border-slate-200 dark:border-slate-700 \
                    text-xs font-black uppercase tracking-widest"
            {
                (theme_label)
            }

            div class="flex gap-3" role="group" aria-label="Tamanho da fonte"
            {
                @for font_size in FontSize::ALL {
                    button
                        type="button"
                        name="font_size"
                        value=(font_size.as_str())
                        hx-post=(endpoints::FONT_SIZE_API)
                        hx-target-error="#alert-container"
                        aria-pressed=(font_size == preferences.font_size)
                        class=(font_size_style(font_size == preferences.font_size))
                    {
                        (font_size.label())
                    }
                }
            }
        }
    }
}

fn font_size_style(is_current: bool) -> &'static str {
    if is_current {
        "flex-1 py-2 rounded-xl bg-indigo-600 text-white font-black"
    } else {
        "flex-1 py-2 rounded-xl bg-slate-100 dark:bg-slate-800 text-slate-500 font-black"
    }
}

fn version_card() -> Markup {
    html! {
        section id="version" class={ (CARD_STYLE) " text-center" }
        {
            p class="text-2xl font-black uppercase tracking-tighter text-indigo-600" { "Econo" }
            p class="text-xs font-bold text-slate-400" { "Versão " (env!("CARGO_PKG_VERSION")) }
        }
    }
}

/// Display the Perfil tab.
pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let preferences = get_preferences(user_id, &connection)?;

    let content = html! {
        (NavBar::new(endpoints::PROFILE_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl mx-auto grid grid-cols-1 lg:grid-cols-3 gap-8 pb-28 lg:pb-8"
            {
                div class="lg:col-span-2" { (profile_form(&user)) }

                div class="space-y-8"
                {
                    (preferences_card(preferences))
                    (feedback_form())
                    (version_card())
                }
            }
        }
    };

    Ok(page("Perfil", &[], &content, preferences, None).into_response())
}

/// Save the profile tab and answer with the updated form.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let update = match form.into_update() {
        Ok(update) => update,
        Err(Error::InvalidForm(reason)) => {
            return (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Erro ao atualizar perfil.".to_owned(),
                    details: reason,
                }
                .into_html(),
            )
                .into_response();
        }
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_profile(user_id, update, &connection) {
        Ok(user) => {
            let alert = Alert::SuccessSimple {
                message: "Perfil atualizado!".to_owned(),
            };

            html! {
                (profile_form(&user))
                (PreEscaped(alert.into_html().0))
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not update the profile of user {user_id}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::ErrorSimple {
                    message: "Erro ao atualizar perfil.".to_owned(),
                }
                .into_html(),
            )
                .into_response()
        }
    }
}
