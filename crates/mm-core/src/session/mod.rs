pub mod credentials;
pub mod profile;
pub mod secret;
pub mod state;

pub use credentials::RefreshedTokens;
pub use profile::{Referral, UserProfile};
pub use secret::SecretString;
pub use state::{SessionState, SessionValidation};
