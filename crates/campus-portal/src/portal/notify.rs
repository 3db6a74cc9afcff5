use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::MailConfig;

/// What triggered an email; used for log fields and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Welcome,
    PlacementConfirmation,
    EventConfirmation,
    PlacementReminder,
    EventReminder,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::Welcome => "welcome",
            NotificationKind::PlacementConfirmation => "placement_confirmation",
            NotificationKind::EventConfirmation => "event_confirmation",
            NotificationKind::PlacementReminder => "placement_reminder",
            NotificationKind::EventReminder => "event_reminder",
        }
    }
}

/// A rendered message ready for the transport. One email may address many recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub kind: NotificationKind,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("mail transport rejected message: {0}")]
    Rejected(String),
    #[error("mail send timed out after {0:?}")]
    TimedOut(Duration),
}

/// Outbound mail transport.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutboundEmail) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Result of a best-effort delivery. Never turned into an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Wraps a [`Mailer`] with the portal's single notification failure policy:
/// every send is bounded by a timeout, and every failure is logged with
/// structured fields, counted, and returned as a [`DeliveryOutcome`].
pub struct Notifier<M> {
    mailer: Arc<M>,
    from_address: String,
    send_timeout: Duration,
}

impl<M> Clone for Notifier<M> {
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
            from_address: self.from_address.clone(),
            send_timeout: self.send_timeout,
        }
    }
}

impl<M: Mailer> Notifier<M> {
    pub fn new(mailer: Arc<M>, config: &MailConfig) -> Self {
        Self {
            mailer,
            from_address: config.from_address.clone(),
            send_timeout: config.send_timeout,
        }
    }

    pub fn compose(
        &self,
        kind: NotificationKind,
        to: Vec<String>,
        subject: String,
        body: String,
    ) -> OutboundEmail {
        OutboundEmail {
            kind,
            from: self.from_address.clone(),
            to,
            subject,
            body,
        }
    }

    pub async fn deliver(&self, email: OutboundEmail) -> DeliveryOutcome {
        let kind = email.kind.label();
        let recipients = email.to.len();

        let result = match tokio::time::timeout(self.send_timeout, self.mailer.send(&email)).await
        {
            Ok(result) => result,
            Err(_) => Err(MailError::TimedOut(self.send_timeout)),
        };

        match result {
            Ok(()) => {
                metrics::counter!(
                    "campus_notifications_total",
                    "kind" => kind,
                    "outcome" => "delivered"
                )
                .increment(1);
                info!(kind, recipients, subject = %email.subject, "notification delivered");
                DeliveryOutcome::Delivered
            }
            Err(err) => {
                metrics::counter!(
                    "campus_notifications_total",
                    "kind" => kind,
                    "outcome" => "failed"
                )
                .increment(1);
                warn!(kind, recipients, error = %err, "notification failed");
                DeliveryOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Records every message in memory. Used by the demo and by tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryMailer {
    outbox: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl MemoryMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    pub fn sent_of(&self, kind: NotificationKind) -> Vec<OutboundEmail> {
        self.sent()
            .into_iter()
            .filter(|email| email.kind == kind)
            .collect()
    }
}

impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| MailError::Transport("outbox lock poisoned".to_string()))?;
        outbox.push(email.clone());
        Ok(())
    }
}

/// Development transport that writes each message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        info!(
            kind = email.kind.label(),
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            "outbound email (log transport)"
        );
        Ok(())
    }
}
