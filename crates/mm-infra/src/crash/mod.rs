mod sentry_reporter;

pub use sentry_reporter::SentryCrashReporter;
