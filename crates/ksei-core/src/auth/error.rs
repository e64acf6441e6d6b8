use thiserror::Error;

use crate::api::ApiError;

/// Failure of a login attempt. Nothing is cached when this is returned.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Password challenge failed: {0}")]
    Challenge(#[source] ApiError),

    #[error("Login failed: {0}")]
    Login(#[source] ApiError),
}
