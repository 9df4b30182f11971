//! The forgot password page.
//!
//! There is no mail transport, so the form only acknowledges the request and
//! logs it. Passwords are reset by the server operator with the
//! `reset_password` binary.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    alert::Alert,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, base, email_input, loading_spinner, log_in_register},
};

fn forgot_password_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::FORGOT_PASSWORD_API)
            hx-swap="none"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            p class="text-sm text-slate-500 dark:text-slate-400"
            {
                "Informe o e-mail da sua conta para receber as instruções de recuperação."
            }

            (email_input("", None))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Enviar link"
            }

            p class="text-sm text-center text-slate-500 dark:text-slate-400"
            {
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Voltar para o login"
                }
            }
        }
    }
}

/// Renders the page where users can ask for a password reset.
pub async fn get_forgot_password_page() -> Response {
    let content = log_in_register("Recuperar senha", &forgot_password_form());

    base("Recuperar senha", &[], &content).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Acknowledge a password reset request.
///
/// The answer is the same whether or not the e-mail is registered.
pub async fn post_forgot_password(Form(form): Form<ForgotPasswordForm>) -> Response {
    tracing::info!(
        "Password reset requested for \"{}\". Run the reset_password binary to set a new password.",
        form.email.trim()
    );

    Alert::SuccessSimple {
        message: "E-mail de recuperação enviado!".to_owned(),
    }
    .into_response()
}
