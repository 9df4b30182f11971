//! Feedback that users send from the profile tab, and the functions used by
//! the `manage_feedback` binary to review it.

use std::{
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, PreEscaped, html};
use rusqlite::{Connection, Row, types::Type};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    alert::Alert,
    database_id::FeedbackId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    user::UserID,
};

/// What the feedback is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Bug,
    #[default]
    Sugestao,
    Elogio,
    Outro,
}

impl FeedbackKind {
    /// All kinds in the order they are listed in the form.
    pub const ALL: [FeedbackKind; 4] = [
        FeedbackKind::Sugestao,
        FeedbackKind::Bug,
        FeedbackKind::Elogio,
        FeedbackKind::Outro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Bug => "bug",
            FeedbackKind::Sugestao => "sugestao",
            FeedbackKind::Elogio => "elogio",
            FeedbackKind::Outro => "outro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackKind::Bug => "Bug",
            FeedbackKind::Sugestao => "Sugestão",
            FeedbackKind::Elogio => "Elogio",
            FeedbackKind::Outro => "Outro",
        }
    }
}

impl FromStr for FeedbackKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidForm(format!("tipo de feedback desconhecido \"{s}\"")))
    }
}

/// Where the feedback is in the review process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Pendente,
    Lido,
    Resolvido,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pendente => "pendente",
            FeedbackStatus::Lido => "lido",
            FeedbackStatus::Resolvido => "resolvido",
        }
    }
}

impl Display for FeedbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(FeedbackStatus::Pendente),
            "lido" => Ok(FeedbackStatus::Lido),
            "resolvido" => Ok(FeedbackStatus::Resolvido),
            other => Err(Error::InvalidForm(format!(
                "status de feedback desconhecido \"{other}\""
            ))),
        }
    }
}

/// A message a user sent about the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserID,
    /// The display name of the user when the feedback was sent.
    pub user_name: String,
    pub kind: FeedbackKind,
    pub message: String,
    pub created_at: OffsetDateTime,
    pub status: FeedbackStatus,
}

/// The feedback a user wants to send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewFeedback {
    #[serde(default)]
    pub kind: FeedbackKind,
    pub message: String,
}

/// The name stored for users that never set a display name.
const FALLBACK_USER_NAME: &str = "Usuário";

pub fn create_feedback_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            user_name TEXT NOT NULL,
            kind TEXT NOT NULL,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL,
            status TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

const FEEDBACK_COLUMNS: &str = "id, user_id, user_name, kind, message, created_at, status";

fn map_feedback_row(row: &Row) -> Result<Feedback, rusqlite::Error> {
    let raw_kind: String = row.get(3)?;
    let raw_status: String = row.get(6)?;

    Ok(Feedback {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        user_name: row.get(2)?,
        kind: raw_kind.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
        })?,
        message: row.get(4)?,
        created_at: row.get(5)?,
        status: raw_status.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(error))
        })?,
    })
}

/// Save feedback from `user_id` with the status "pendente".
///
/// The user's current display name is copied onto the feedback.
///
/// # Errors
/// Returns [Error::EmptyFeedback] if the message is blank, or
/// [Error::SqlError] if the insert fails.
pub fn create_feedback(
    user_id: UserID,
    new_feedback: NewFeedback,
    connection: &Connection,
) -> Result<Feedback, Error> {
    let message = new_feedback.message.trim();

    if message.is_empty() {
        return Err(Error::EmptyFeedback);
    }

    connection
        .prepare(&format!(
            "INSERT INTO feedback (user_id, user_name, kind, message, created_at, status)
             VALUES (
                ?1,
                COALESCE(
                    (SELECT NULLIF(TRIM(display_name), '') FROM user WHERE id = ?1),
                    ?2
                ),
                ?3, ?4, ?5, ?6
             )
             RETURNING {FEEDBACK_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                FALLBACK_USER_NAME,
                new_feedback.kind.as_str(),
                message,
                OffsetDateTime::now_utc(),
                FeedbackStatus::Pendente.as_str(),
            ),
            map_feedback_row,
        )
        .map_err(|error| error.into())
}

/// List feedback newest first, optionally only the feedback with `status`.
pub fn list_feedback(
    status: Option<FeedbackStatus>,
    connection: &Connection,
) -> Result<Vec<Feedback>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback
         WHERE ?1 IS NULL OR status = ?1
         ORDER BY created_at DESC, id DESC"
    ))?;

    statement
        .query_map([status.map(|status| status.as_str())], map_feedback_row)?
        .map(|maybe_feedback| maybe_feedback.map_err(Error::from))
        .collect()
}

/// Move the feedback with `id` to `status`.
///
/// # Errors
/// Returns [Error::UpdateMissingFeedback] if there is no feedback with `id`.
pub fn set_feedback_status(
    id: FeedbackId,
    status: FeedbackStatus,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE feedback SET status = ?1 WHERE id = ?2",
        (status.as_str(), id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingFeedback);
    }

    Ok(())
}

/// The state needed to send feedback.
#[derive(Debug, Clone)]
pub struct FeedbackState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FeedbackState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Save the feedback and answer with an empty form and a success alert.
pub async fn send_feedback_endpoint(
    State(state): State<FeedbackState>,
    Extension(user_id): Extension<UserID>,
    Form(new_feedback): Form<NewFeedback>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_feedback(user_id, new_feedback, &connection) {
        Ok(feedback) => {
            tracing::info!("User {user_id} sent feedback {}", feedback.id);
            let alert = Alert::SuccessSimple {
                message: "Feedback enviado com sucesso!".to_owned(),
            };

            html! {
                (feedback_form())
                (PreEscaped(alert.into_html().0))
            }
            .into_response()
        }
        Err(Error::EmptyFeedback) => Error::EmptyFeedback.into_alert_response(),
        Err(error) => {
            tracing::error!("could not save feedback from user {user_id}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::ErrorSimple {
                    message: "Erro ao enviar feedback.".to_owned(),
                }
                .into_html(),
            )
                .into_response()
        }
    }
}

/// The feedback card on the profile tab.
pub fn feedback_form() -> Markup {
    html! {
        form
            id="feedback-form"
            hx-post=(endpoints::FEEDBACK_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="p-8 rounded-3xl border border-indigo-100 bg-indigo-50 \
                dark:bg-indigo-950/20 dark:border-indigo-900/30 space-y-4"
        {
            h3 class="text-xs font-black uppercase tracking-[0.2em] dark:text-white" { "Feedback" }

            div
            {
                label for="feedback-kind" class=(FORM_LABEL_STYLE) { "Tipo" }

                select id="feedback-kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for kind in FeedbackKind::ALL {
                        option
                            value=(kind.as_str())
                            selected[kind == FeedbackKind::default()]
                        {
                            (kind.label())
                        }
                    }
                }
            }

            textarea
                name="message"
                placeholder="Sua sugestão..."
                required
                rows="6"
                class=(FORM_TEXT_INPUT_STYLE)
            {}

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Enviar Sugestão" }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use email_address::EmailAddress;

    use crate::{
        Error, PasswordHash,
        test_utils::{
            create_test_user, get_alert_message, get_test_connection, parse_html_fragment,
        },
        user::{NewUser, create_user},
    };

    use super::{
        FeedbackKind, FeedbackState, FeedbackStatus, NewFeedback, create_feedback, list_feedback,
        send_feedback_endpoint, set_feedback_status,
    };

    fn new_feedback(kind: FeedbackKind, message: &str) -> NewFeedback {
        NewFeedback {
            kind,
            message: message.to_owned(),
        }
    }

    #[test]
    fn create_feedback_starts_pending() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);

        let feedback = create_feedback(
            user.id,
            new_feedback(FeedbackKind::Bug, "  O gráfico não carrega.  "),
            &connection,
        )
        .unwrap();

        assert_eq!(feedback.user_id, user.id);
        assert_eq!(feedback.user_name, "Maria Teste");
        assert_eq!(feedback.kind, FeedbackKind::Bug);
        assert_eq!(feedback.message, "O gráfico não carrega.");
        assert_eq!(feedback.status, FeedbackStatus::Pendente);
    }

    #[test]
    fn blank_message_is_rejected() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);

        let result = create_feedback(user.id, new_feedback(FeedbackKind::Outro, " \n "), &connection);

        assert_eq!(result, Err(Error::EmptyFeedback));
        assert!(list_feedback(None, &connection).unwrap().is_empty());
    }

    #[test]
    fn blank_display_name_falls_back_to_usuario() {
        let connection = get_test_connection();
        let user = create_user(
            NewUser {
                email: EmailAddress::new_unchecked("anonimo@econo.app"),
                display_name: "   ".to_owned(),
                password_hash: PasswordHash::new_unchecked("hash"),
            },
            &connection,
        )
        .unwrap();

        let feedback =
            create_feedback(user.id, new_feedback(FeedbackKind::Elogio, "Ótimo!"), &connection)
                .unwrap();

        assert_eq!(feedback.user_name, "Usuário");
    }

    #[test]
    fn list_feedback_filters_by_status_newest_first() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let first =
            create_feedback(user.id, new_feedback(FeedbackKind::Bug, "primeiro"), &connection)
                .unwrap();
        let second = create_feedback(
            user.id,
            new_feedback(FeedbackKind::Sugestao, "segundo"),
            &connection,
        )
        .unwrap();

        set_feedback_status(first.id, FeedbackStatus::Resolvido, &connection).unwrap();

        let all = list_feedback(None, &connection).unwrap();
        assert_eq!(
            all.iter().map(|feedback| feedback.id).collect::<Vec<_>>(),
            [second.id, first.id]
        );
        let pending = list_feedback(Some(FeedbackStatus::Pendente), &connection).unwrap();
        assert_eq!(pending, [second]);
        let resolved = list_feedback(Some(FeedbackStatus::Resolvido), &connection).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].status, FeedbackStatus::Resolvido);
    }

    #[test]
    fn set_status_of_missing_feedback_fails() {
        let connection = get_test_connection();

        assert_eq!(
            set_feedback_status(42, FeedbackStatus::Lido, &connection),
            Err(Error::UpdateMissingFeedback)
        );
    }

    #[test]
    fn parses_status_and_kind() {
        assert_eq!("lido".parse(), Ok(FeedbackStatus::Lido));
        assert!("fechado".parse::<FeedbackStatus>().is_err());
        assert_eq!("elogio".parse(), Ok(FeedbackKind::Elogio));
    }

    #[tokio::test]
    async fn send_feedback_shows_success_and_clears_form() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let state = FeedbackState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = send_feedback_endpoint(
            State(state.clone()),
            Extension(user.id),
            Form(new_feedback(FeedbackKind::Sugestao, "Modo escuro no PDF")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            get_alert_message(&html).as_deref(),
            Some("Feedback enviado com sucesso!")
        );
        let textarea = html
            .select(&scraper::Selector::parse("#feedback-form textarea").unwrap())
            .next()
            .unwrap();
        assert_eq!(textarea.text().collect::<String>(), "");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(list_feedback(None, &connection).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn send_empty_feedback_is_rejected() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let state = FeedbackState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = send_feedback_endpoint(
            State(state),
            Extension(user.id),
            Form(new_feedback(FeedbackKind::Bug, "   ")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            get_alert_message(&html).as_deref(),
            Some("Escreva uma mensagem antes de enviar.")
        );
    }
}
