use std::time::Duration;

use moka::future::Cache;
use rand::Rng;
use subtle::ConstantTimeEq;

/// Outstanding one-time codes, keyed by email. Codes live for five
/// minutes and a successful verification consumes them.
#[derive(Clone)]
pub struct OtpCache {
    cache: Cache<String, String>,
}

impl OtpCache {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(300))
            .max_capacity(10_000)
            .build();
        Self { cache }
    }

    /// Issue a fresh 6-digit code for the address, replacing any
    /// outstanding one.
    pub async fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.cache.insert(email.to_lowercase(), code.clone()).await;
        code
    }

    /// Constant-time comparison against the outstanding code; a match
    /// invalidates it.
    pub async fn verify(&self, email: &str, code: &str) -> bool {
        let key = email.to_lowercase();
        let Some(expected) = self.cache.get(&key).await else {
            return false;
        };
        if expected.as_bytes().ct_eq(code.trim().as_bytes()).into() {
            self.cache.invalidate(&key).await;
            true
        } else {
            false
        }
    }
}

impl Default for OtpCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_verify() {
        let otp = OtpCache::new();
        let code = otp.issue("user@example.com").await;
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        assert!(otp.verify("USER@example.com", &code).await);

        // Consumed on success.
        assert!(!otp.verify("user@example.com", &code).await);
    }

    #[tokio::test]
    async fn test_unknown_email_fails() {
        let otp = OtpCache::new();
        assert!(!otp.verify("nobody@example.com", "123456").await);
    }
}
