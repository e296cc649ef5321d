pub mod password;
pub mod policy;
pub mod token;

pub use policy::{authorize, Action, Decision, Ownership, Scope};
pub use token::{AuthError, Claims, Identity, Role, TokenVerifier};
