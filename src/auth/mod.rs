pub mod identity;

pub use identity::{CallerIdentity, CALLER_ID_HEADER};
