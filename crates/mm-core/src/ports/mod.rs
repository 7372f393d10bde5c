//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `mm-app` and the adapters in
//! `mm-infra` or the shell. Vendor SDKs, the backend API, durable storage, dialogs and
//! the clock are all reached through these traits.

pub mod backend;
mod clock;
pub mod dialog;
pub mod errors;
pub mod sdk;
pub mod storage;

pub use backend::{ApiError, BackendPort, Endpoint, HttpMethod};
pub use clock::ClockPort;
pub use dialog::DialogPort;
pub use errors::StorageError;
pub use sdk::{
    CrashReporterPort, FontLoaderPort, MapsPort, PurchasesPort, PushNotificationsPort,
    SplashScreenPort,
};
pub use storage::KeyValueStorePort;
