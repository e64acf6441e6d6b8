use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Duplicate fetch task name: {0}")]
    DuplicateTask(String),
}

pub type Result<T> = std::result::Result<T, Error>;
