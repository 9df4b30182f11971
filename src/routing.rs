//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_forgot_password, post_log_in, register_user,
    },
    dashboard::{get_analytics_page, get_dashboard_page},
    endpoints,
    export::export_csv_endpoint,
    feedback::send_feedback_endpoint,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    preferences::{set_font_size_endpoint, toggle_theme_endpoint},
    profile::{
        complete_profile_endpoint, get_profile_page, get_profile_setup_page, profile_guard,
        update_profile_endpoint,
    },
    transaction::{
        add_item_endpoint, create_transaction_endpoint, delete_transaction_endpoint,
        edit_transaction_endpoint, get_edit_transaction_page, get_new_transaction_page,
        refresh_form_endpoint, scan_receipt_endpoint,
    },
};

/// The largest request body accepted by the routes that take a receipt photo.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::FORGOT_PASSWORD_API, post(post_forgot_password))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // Layers run bottom to top, so the profile guard sees the user ID set by the auth guard.
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::PROFILE_VIEW, get(get_profile_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), profile_guard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let setup_page = Router::new()
        .route(endpoints::PROFILE_SETUP_VIEW, get(get_profile_setup_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let uploads = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::SCAN_RECEIPT, post(scan_receipt_endpoint))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    // These routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let api = Router::new()
        .merge(uploads)
        .route(endpoints::TRANSACTION_ITEM, post(add_item_endpoint))
        .route(endpoints::TRANSACTION_FORM, post(refresh_form_endpoint))
        .route(endpoints::FEEDBACK_API, post(send_feedback_endpoint))
        .route(endpoints::THEME_API, post(toggle_theme_endpoint))
        .route(endpoints::FONT_SIZE_API, post(set_font_size_endpoint))
        .route(endpoints::PROFILE_API, post(update_profile_endpoint))
        .route(endpoints::PROFILE_SETUP_API, post(complete_profile_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    pages
        .merge(setup_page)
        .merge(api)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, UnavailableReceiptScanner, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open in-memory database"),
            "moqueca-capixaba",
            "America/Sao_Paulo",
            Arc::new(UnavailableReceiptScanner),
        )
        .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_cookie() {
        let server = get_test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::ANALYTICS_VIEW,
            endpoints::PROFILE_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status_see_other();
            let location = response.header("location");
            let location = location.to_str().unwrap();
            assert!(
                location.starts_with(endpoints::LOG_IN_VIEW),
                "{page} redirected to {location}"
            );
        }
    }

    #[tokio::test]
    async fn api_routes_use_hx_redirect_without_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::FEEDBACK_API)
            .add_header("hx-request", "true")
            .add_header("hx-current-url", "http://localhost/profile")
            .form(&[("message", "Muito bom!")])
            .await;

        response.assert_status_ok();
        let location = response.header("hx-redirect");
        assert!(location.to_str().unwrap().starts_with(endpoints::LOG_IN_VIEW));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/nao-existe")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn new_user_completes_profile_before_dashboard() {
        let server = get_test_server();

        let response = server
            .post(endpoints::USERS)
            .form(&[
                ("display_name", "Joana Lima"),
                ("email", "joana@econo.app"),
                ("password", "moqueca-capixaba-com-pirao"),
                ("confirm_password", "moqueca-capixaba-com-pirao"),
            ])
            .await;
        response.assert_status_see_other();
        assert_eq!(
            response.header("hx-redirect"),
            "/profile/setup?alerta=cadastro_realizado"
        );
        let jar = response.cookies();

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookies(jar.clone())
            .await;
        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::PROFILE_SETUP_VIEW);

        let response = server
            .post(endpoints::PROFILE_SETUP_API)
            .add_header("hx-request", "true")
            .add_cookies(jar.clone())
            .form(&[("age", "31"), ("birth_date", "1994-05-20"), ("photo_url", "")])
            .await;
        response.assert_status_see_other();
        assert_eq!(
            response.header("hx-redirect"),
            "/dashboard?alerta=perfil_concluido"
        );

        server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookies(jar.clone())
            .await
            .assert_status_ok();

        server
            .get("/dashboard?tipo=foo&status=bar&inicio=ontem&alerta=foo&categoria=Casa")
            .add_cookies(jar)
            .await
            .assert_status_ok();
    }
}
