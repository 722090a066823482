pub mod auth_error;
pub mod claims;
pub mod data_stores;
pub mod identity;
pub mod issued_tokens;
pub mod token;
pub mod token_error;
pub mod token_requests;
mod token_type;

pub use auth_error::*;
pub use claims::*;
pub use data_stores::*;
pub use identity::*;
pub use issued_tokens::*;
pub use token::{Header, Token, Validation};
pub use token_error::*;
pub use token_requests::*;
pub use token_type::*;
