//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users, the "Início" tab.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The charts page, the "Análise" tab.
pub const ANALYTICS_VIEW: &str = "/analytics";
/// The profile page, the "Perfil" tab.
pub const PROFILE_VIEW: &str = "/profile";
/// The page shown until the user completes their profile.
pub const PROFILE_SETUP_VIEW: &str = "/profile/setup";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for requesting a password reset.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route for submitting a password recovery request.
pub const FORGOT_PASSWORD_API: &str = "/api/forgot_password";
/// The route to complete the profile after registering.
pub const PROFILE_SETUP_API: &str = "/api/profile/setup";
/// The route to update the profile.
pub const PROFILE_API: &str = "/api/profile";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route that renders one item row of the transaction form.
pub const TRANSACTION_ITEM: &str = "/api/transactions/item";
/// The route that reads a receipt photo into the transaction form.
pub const SCAN_RECEIPT: &str = "/api/transactions/scan";
/// The route that re-renders the transaction form fields after the type,
/// boleto flag or payment type changes.
pub const TRANSACTION_FORM: &str = "/api/transactions/form";
/// The route to download transactions of one type as CSV.
pub const EXPORT_CSV: &str = "/api/export/{transaction_type}";
/// The route to send feedback.
pub const FEEDBACK_API: &str = "/api/feedback";
/// The route to toggle between the light and dark theme.
pub const THEME_API: &str = "/api/preferences/theme";
/// The route to set the base font size.
pub const FONT_SIZE_API: &str = "/api/preferences/font_size";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
