pub mod crash;
pub mod fonts;
pub mod http;
pub mod storage;
pub mod time;

pub use crash::SentryCrashReporter;
pub use fonts::FileFontLoader;
pub use http::{HttpBackend, HttpBackendConfig};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use time::SystemClock;
