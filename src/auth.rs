//! Auth-domain models: scope sets, access tokens, and redacted secrets.

pub mod scope;
pub mod token;

pub use scope::*;
pub use token::{access::*, secret::*};
