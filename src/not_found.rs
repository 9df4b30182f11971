//! The page shown for unknown routes and missing resources.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The 404 page.
pub struct NotFoundPage;

impl IntoResponse for NotFoundPage {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Html(
                error_view(
                    "Página não encontrada",
                    "404",
                    "Página não encontrada.",
                    "Verifique o endereço ou volte para o início.",
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    NotFoundPage.into_response()
}
