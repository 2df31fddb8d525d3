//! Auth-domain identifiers, app credentials, and ticket records.

pub mod credentials;
pub mod id;
pub mod token;

pub use credentials::*;
pub use id::*;
pub use token::{record::*, secret::*};
