//! The messages shown when logging in or registering fails.

use crate::Error;

/// Why an authentication attempt failed, as far as the user needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Unknown e-mail, wrong password or otherwise invalid credentials.
    InvalidCredentials,
    /// Someone already registered with the e-mail address.
    EmailInUse,
    /// Anything else. The details are only logged.
    Other,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::InvalidCredentials => "E-mail ou senha incorretos.",
            AuthFailure::EmailInUse => "Este e-mail já está em uso.",
            AuthFailure::Other => "Ocorreu um erro ao processar sua solicitação.",
        }
    }
}

impl From<&Error> for AuthFailure {
    fn from(error: &Error) -> Self {
        match error {
            Error::InvalidCredentials | Error::NotFound => AuthFailure::InvalidCredentials,
            Error::DuplicateEmail => AuthFailure::EmailInUse,
            _ => AuthFailure::Other,
        }
    }
}
