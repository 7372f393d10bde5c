//! Business logic use cases
//!
//! 冷启动 → 会话校验 → 权益判断 → 目标设置向导

pub mod bootstrap;
pub mod entitlement;
pub mod goals;
pub mod referral;
pub mod session;
