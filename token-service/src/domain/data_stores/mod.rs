pub mod blacklist_store;
pub mod blacklist_store_err;
pub mod identity_store;
pub mod identity_store_err;

pub use blacklist_store::*;
pub use blacklist_store_err::*;
pub use identity_store::IdentityStore;
pub use identity_store_err::IdentityStoreError;
