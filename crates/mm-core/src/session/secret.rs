use std::fmt;
use std::ops::Deref;
use zeroize::Zeroize;

/// A session token that must never be logged, cloned, or serialized.
///
/// 会话令牌：
/// - 不可 Clone
/// - Debug / Display 只输出 [REDACTED]
/// - Drop 时清零内存
pub struct SecretString {
    inner: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Borrow the raw token, e.g. to build an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Consume and return the raw token.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.inner)
    }

    /// `None` for blank values, which storage treats as "no token".
    pub fn non_blank(value: impl Into<String>) -> Option<Self> {
        let secret = Self::new(value);
        if secret.inner.trim().is_empty() {
            None
        } else {
            Some(secret)
        }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Deref for SecretString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.expose()
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SecretString {}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_never_reveals_token() {
        let token = SecretString::new("eyJhbGciOi.payload.sig");
        assert_eq!(format!("{token:?}"), "[REDACTED]");
        assert_eq!(format!("{token}"), "[REDACTED]");
        assert_eq!(token.expose(), "eyJhbGciOi.payload.sig");
    }

    #[test]
    fn blank_values_are_not_tokens() {
        assert!(SecretString::non_blank("   ").is_none());
        assert_eq!(
            SecretString::non_blank("abc").map(SecretString::into_inner),
            Some("abc".to_string())
        );
    }
}
