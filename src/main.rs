use macromeals_lib::bootstrap::tracing::init_tracing_subscriber;
use macromeals_lib::{load_app_config, load_dotenv, run_app, wire_dependencies};
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    // Reported once tracing is up.
    let dotenv = load_dotenv();

    let config = load_app_config()?;
    init_tracing_subscriber(&config.environment, &config.sentry_dsn, &config.data_dir)?;
    if let Err(err) = dotenv {
        warn!(error = %err, "Ignoring unreadable .env file");
    }
    info!(environment = %config.environment, "Starting MacroMeals");

    let services = wire_dependencies(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(run_app(&services)) {
        Ok(result) => {
            info!(route = ?result.flags.route(), "MacroMeals ready");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "MacroMeals failed to start");
            Err(err)
        }
    }
}
