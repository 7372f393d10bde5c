//! MacroMeals Library
//!
//! Desktop shell: configuration, tracing and dependency wiring around the `mm-app` use cases.

pub mod adapters;
pub mod bootstrap;

pub use bootstrap::{load_app_config, load_dotenv, run_app, wire_dependencies, AppServices};
