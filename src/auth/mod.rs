//! Cookie-based sessions, the log-in and registration pages and the guards
//! protecting the rest of the app.

mod cookie;
mod failure;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod token;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use forgot_password::{get_forgot_password_page, post_forgot_password};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use register::{get_register_page, register_user};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, set_auth_cookie};

#[cfg(test)]
pub use middleware::AuthState;
