//! Outbound notification interface
//!
//! Mail transport is an external collaborator; the auth core only needs a
//! seam to hand the raw reset token through. Failures are logged by callers
//! and never change the wire response of a reset request.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Development notifier that records the dispatch without the body.
///
/// The body of a reset mail contains the raw token, which must never reach
/// the logs; only recipient and subject are written.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        log::info!("notification dispatched to {} (subject: {})", to, subject);
        Ok(())
    }
}
