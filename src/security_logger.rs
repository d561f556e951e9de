//! Security-focused logging module to track authentication events
//!
//! Wire responses for enumeration-prone paths are deliberately generic;
//! this log is the one place the distinguishing reason is recorded.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::auth::role::Role;

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // Login path
    LoginFailed { email: String },
    LoginSucceeded { account_id: String },

    // Bearer token validation
    TokenRejected { reason: &'static str },

    // Authorization
    AccessDenied { account_id: String, required: Vec<Role> },

    // Password reset lifecycle
    ResetRequested { known_account: bool },
    ResetRedeemed { account_id: String },
    ResetRejected,
}

/// Security event with timestamp
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

/// Tracks security events and alerts when failure counts cross thresholds
pub struct SecurityLogger {
    events: Arc<RwLock<Vec<TimestampedEvent>>>,
    event_counts: Arc<RwLock<HashMap<&'static str, usize>>>,
    max_events: usize,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl SecurityLogger {
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("login_failed", 5);
        alert_thresholds.insert("token_rejected", 10);
        alert_thresholds.insert("access_denied", 20);
        alert_thresholds.insert("reset_rejected", 5);

        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            event_counts: Arc::new(RwLock::new(HashMap::new())),
            max_events: 10000,
            alert_thresholds,
        }
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let event_key = Self::event_key(&event);

        {
            let mut events = self.events.write().await;
            events.push(TimestampedEvent {
                event: event.clone(),
                timestamp: Instant::now(),
            });

            // Limit memory usage
            if events.len() > self.max_events {
                let overflow = events.len() - self.max_events;
                events.drain(0..overflow);
            }
        }

        {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(event_key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(event_key) {
                if *count >= threshold {
                    log::error!(
                        "SECURITY ALERT: {} events of type '{}' detected",
                        count,
                        event_key
                    );
                    *count = 0;
                }
            }
        }

        match event {
            SecurityEvent::LoginFailed { email } => {
                log::warn!("SECURITY: Login failed - Email: {}", email);
            }
            SecurityEvent::LoginSucceeded { account_id } => {
                log::info!("SECURITY: Login success - Account: {}", account_id);
            }
            SecurityEvent::TokenRejected { reason } => {
                log::warn!("SECURITY: Token rejected - Reason: {}", reason);
            }
            SecurityEvent::AccessDenied {
                account_id,
                required,
            } => {
                log::warn!(
                    "SECURITY: Access denied - Account: {}, Required roles: {:?}",
                    account_id,
                    required
                );
            }
            SecurityEvent::ResetRequested { known_account } => {
                log::info!(
                    "SECURITY: Password reset requested - Known account: {}",
                    known_account
                );
            }
            SecurityEvent::ResetRedeemed { account_id } => {
                log::info!("SECURITY: Password reset redeemed - Account: {}", account_id);
            }
            SecurityEvent::ResetRejected => {
                log::warn!("SECURITY: Password reset redemption rejected");
            }
        }
    }

    fn event_key(event: &SecurityEvent) -> &'static str {
        match event {
            SecurityEvent::LoginFailed { .. } => "login_failed",
            SecurityEvent::LoginSucceeded { .. } => "login_succeeded",
            SecurityEvent::TokenRejected { .. } => "token_rejected",
            SecurityEvent::AccessDenied { .. } => "access_denied",
            SecurityEvent::ResetRequested { .. } => "reset_requested",
            SecurityEvent::ResetRedeemed { .. } => "reset_redeemed",
            SecurityEvent::ResetRejected => "reset_rejected",
        }
    }

    /// Get recent security events
    pub async fn get_recent_events(&self, duration: Duration) -> Vec<SecurityEvent> {
        let events = self.events.read().await;
        let cutoff = Instant::now() - duration;

        events
            .iter()
            .filter(|event| event.timestamp > cutoff)
            .map(|event| event.event.clone())
            .collect()
    }

    /// Get event statistics
    pub async fn get_event_stats(&self) -> HashMap<&'static str, usize> {
        self.event_counts.read().await.clone()
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Global security logger instance - thread-safe singleton
static SECURITY_LOGGER: OnceLock<Arc<SecurityLogger>> = OnceLock::new();

/// Initialize the global security logger
pub fn init_security_logger() {
    SECURITY_LOGGER.get_or_init(|| Arc::new(SecurityLogger::new()));
}

/// Get the global security logger
pub fn get_security_logger() -> Option<Arc<SecurityLogger>> {
    SECURITY_LOGGER.get().cloned()
}

/// Log a security event using the global logger
pub async fn log_security_event(event: SecurityEvent) {
    if let Some(logger) = get_security_logger() {
        logger.log_event(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_are_recorded_and_counted() {
        let logger = SecurityLogger::new();
        logger
            .log_event(SecurityEvent::LoginFailed {
                email: "x@example.com".to_string(),
            })
            .await;
        logger
            .log_event(SecurityEvent::TokenRejected {
                reason: "expired token",
            })
            .await;

        let stats = logger.get_event_stats().await;
        assert_eq!(stats.get("login_failed"), Some(&1));
        assert_eq!(stats.get("token_rejected"), Some(&1));

        let recent = logger.get_recent_events(Duration::from_secs(60)).await;
        assert_eq!(recent.len(), 2);
    }
}
