use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlacklistStoreError {
    #[error("token already blacklisted")]
    AlreadyBlacklisted,
    #[error("blacklist store unavailable: {0}")]
    Unavailable(String),
}
