pub(crate) mod blacklist;
pub(crate) mod obtain_pair;
pub(crate) mod refresh;
pub(crate) mod sliding;
pub(crate) mod verify_token;
pub(crate) mod whoami;

// re-export items from sub-modules
pub use blacklist::*;
pub use obtain_pair::*;
pub use refresh::*;
pub use sliding::*;
pub use verify_token::*;
pub use whoami::*;
