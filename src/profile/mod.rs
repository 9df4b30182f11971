//! The profile setup page, the Perfil tab and the guard that sends users with
//! an incomplete profile to the setup page.

mod edit;
mod form;
mod guard;
mod setup;

pub use edit::{ProfileState, get_profile_page, update_profile_endpoint};
pub use guard::profile_guard;
pub use setup::{complete_profile_endpoint, get_profile_setup_page};
