//! Sentry-backed crash reporter.

use std::sync::OnceLock;

use async_trait::async_trait;
use mm_core::ports::CrashReporterPort;
use tracing::{debug, info};

static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

pub struct SentryCrashReporter {
    dsn: String,
    environment: String,
}

impl SentryCrashReporter {
    pub fn new(dsn: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            environment: environment.into(),
        }
    }

    /// Binds the process-wide Sentry client.
    ///
    /// Returns `Ok(false)` when no DSN is configured. Calling again after a successful
    /// init is a no-op.
    pub fn init_client(&self) -> anyhow::Result<bool> {
        if SENTRY_GUARD.get().is_some() {
            return Ok(true);
        }
        if self.dsn.trim().is_empty() {
            info!("Sentry DSN not set, crash reporting disabled");
            return Ok(false);
        }

        let dsn: sentry::types::Dsn = self
            .dsn
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid Sentry DSN: {e}"))?;

        let environment = if self.environment.is_empty() {
            None
        } else {
            Some(self.environment.clone().into())
        };

        // Only one caller ever builds the client. Racing callers share it.
        let mut bound_here = false;
        SENTRY_GUARD.get_or_init(|| {
            bound_here = true;
            sentry::init(sentry::ClientOptions {
                dsn: Some(dsn),
                release: sentry::release_name!(),
                environment,
                traces_sample_rate: 1.0,
                ..Default::default()
            })
        });
        if bound_here {
            info!("Sentry crash reporting initialized");
        } else {
            debug!("Sentry client already bound by another caller");
        }
        Ok(true)
    }
}

#[async_trait]
impl CrashReporterPort for SentryCrashReporter {
    fn is_initialized(&self) -> bool {
        SENTRY_GUARD.get().is_some_and(|guard| guard.is_enabled())
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        self.init_client().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the process-wide client so the steps run in order.
    #[tokio::test]
    async fn initialization_lifecycle() {
        let invalid = SentryCrashReporter::new("not a dsn", "development");
        assert!(invalid.init_client().is_err());
        assert!(!invalid.is_initialized());

        let blank = SentryCrashReporter::new("  ", "development");
        assert!(!blank.init_client().unwrap());
        assert!(!blank.is_initialized());

        let reporter =
            SentryCrashReporter::new("https://public@sentry.example.test/1", "development");
        reporter.initialize().await.unwrap();
        assert!(reporter.is_initialized());

        // Already bound, so a reporter without a DSN sees the existing client.
        assert!(blank.init_client().unwrap());
        assert!(blank.is_initialized());

        // Concurrent callers all end up on the single bound client.
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    SentryCrashReporter::new("https://other@sentry.example.test/2", "development")
                        .init_client()
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(reporter.is_initialized());
    }
}
