//! Stored credentials, token refresh and cold-start session validation.

pub mod credentials;
pub mod refresh;
pub mod validate;

pub use credentials::CredentialStore;
pub use refresh::{AuthenticatedCaller, RefreshPolicy};
pub use validate::ValidateSession;
