use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentityStoreError {
    #[error("identity not found")]
    NotFound,
    #[error("identity already exists")]
    AlreadyExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}
