//! Mock mail sender for development and testing.
//!
//! Prints the OTP message to the console instead of delivering it, so the
//! full enrollment flow can be exercised without an SMTP relay.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use itsp_core::services::MailSenderTrait;

use super::{otp_body, otp_subject};

/// Mock mail sender
///
/// This implementation:
/// - Logs messages to console
/// - Generates mock message IDs
/// - Tracks message count for testing
#[derive(Clone)]
pub struct MockMailSender {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Create a mock sender with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockMailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailSenderTrait for MockMailSender {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        expiry_minutes: i64,
        resent: bool,
    ) -> Result<String, String> {
        if self.simulate_failure {
            warn!("Mock mail sender simulating failure for: {}", to);
            return Err("Simulated mail delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK MAIL SENDER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", to);
            println!("Subject: {}", otp_subject(resent));
            println!("Message ID: {}", message_id);
            println!("Body: {}", otp_body(code, expiry_minutes));
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "mail_service",
            provider = "mock",
            recipient = %to,
            message_id = %message_id,
            resent = resent,
            "OTP mail sent (mock)"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sender_counts_messages() {
        let sender = MockMailSender::with_options(false, false);
        sender
            .send_otp("a@x.com", "123456", 10, false)
            .await
            .unwrap();
        sender
            .send_otp("a@x.com", "654321", 10, true)
            .await
            .unwrap();
        assert_eq!(sender.get_message_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_sender_simulated_failure() {
        let sender = MockMailSender::with_options(false, true);
        let result = sender.send_otp("a@x.com", "123456", 10, false).await;
        assert!(result.is_err());
        assert_eq!(sender.get_message_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_message_ids_are_unique() {
        let sender = MockMailSender::with_options(false, false);
        let first = sender
            .send_otp("a@x.com", "123456", 10, false)
            .await
            .unwrap();
        let second = sender
            .send_otp("a@x.com", "123456", 10, false)
            .await
            .unwrap();
        assert_ne!(first, second);
    }
}
