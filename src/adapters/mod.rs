//! # Shell Adapters / 外壳适配器
//!
//! Port implementations owned by the desktop shell rather than `mm-infra`.

pub mod platform;

pub use platform::{
    HeadlessPush, LoggingDialog, LoggingSplash, SdkUnavailable, UnavailableMaps,
    UnavailablePurchases,
};
