//! Cold-start bootstrap.
//!
//! 冷启动流程：SDK 初始化 → 会话校验 → 权益 → 写入会话状态 → 隐藏启动页。

mod sequencer;

pub use sequencer::{BootstrapDeps, BootstrapSequencer, BootstrapSettings, DEFAULT_SPLASH_GRACE};
