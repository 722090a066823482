mod obtain_token;
mod token_endpoint;
mod unauthorized;

pub use obtain_token::*;
pub use token_endpoint::*;
pub use unauthorized::*;
