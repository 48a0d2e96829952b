use crate::api::{Error as ApiError, GENERIC_ERROR_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl Error {
    /// Text of the alert shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(err) => err.message(),
            Error::Transport(_) => String::from(GENERIC_ERROR_MESSAGE),
        }
    }
}
