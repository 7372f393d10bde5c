pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_app_config, load_config, load_dotenv};
pub use run::run_app;
pub use wiring::{wire_dependencies, AppServices, WiringError, WiringResult};
