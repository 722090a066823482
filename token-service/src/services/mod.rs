pub mod authentication;
pub mod codec;
pub mod hashmap_identity_store;
pub mod hashset_blacklist_store;
pub mod signer;
pub mod token_service;

pub use authentication::*;
pub use hashmap_identity_store::*;
pub use hashset_blacklist_store::*;
pub use signer::Signer;
pub use token_service::*;
