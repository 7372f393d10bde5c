use async_trait::async_trait;

/// Blocking prompts shown to the user.
#[async_trait]
pub trait DialogPort: Send + Sync {
    /// Ask a yes/no question. `true` when the user accepts.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Show a message the user must dismiss.
    async fn alert(&self, title: &str, message: &str);
}
