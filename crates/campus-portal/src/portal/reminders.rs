use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{Event, EventId, Placement, PlacementId, StudentId};
use super::notify::{DeliveryOutcome, Mailer, NotificationKind, Notifier};
use super::store::{PortalStore, StoreError};
use super::templates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderTarget {
    Placement { id: PlacementId, company_name: String },
    Event { id: EventId, event_name: String },
}

/// One reminder email sent (or attempted) for one placement or event.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderDispatch {
    pub target: ReminderTarget,
    pub recipients: Vec<String>,
    pub outcome: DeliveryOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderReport {
    pub reminder_date: NaiveDate,
    pub dispatches: Vec<ReminderDispatch>,
    /// Items skipped because their registrations could not be loaded.
    pub errors: Vec<String>,
}

impl ReminderReport {
    pub fn delivered(&self) -> usize {
        self.dispatches
            .iter()
            .filter(|dispatch| dispatch.outcome.is_delivered())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.dispatches.len() - self.delivered()
    }
}

/// Day-before reminders for placement drives and events.
///
/// Runs once per call; scheduling belongs to whoever calls it.
pub struct ReminderJob<S, M> {
    store: Arc<S>,
    notifier: Notifier<M>,
}

impl<S, M> ReminderJob<S, M>
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, notifier: Notifier<M>) -> Self {
        Self { store, notifier }
    }

    pub async fn run_for_today(&self) -> Result<ReminderReport, StoreError> {
        self.run(Local::now().date_naive()).await
    }

    /// Sends reminders for everything scheduled on `today + 1`.
    ///
    /// Only failing to list the day's placements or events aborts the run.
    /// Per-item failures are recorded in the report and the run moves on.
    pub async fn run(&self, today: NaiveDate) -> Result<ReminderReport, StoreError> {
        let reminder_date = today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| StoreError::Unavailable(format!("no day after {today}")))?;
        let mut report = ReminderReport {
            reminder_date,
            dispatches: Vec::new(),
            errors: Vec::new(),
        };

        for placement in self.store.placements_on(reminder_date)? {
            self.remind_placement(placement, &mut report).await;
        }
        for event in self.store.events_on(reminder_date)? {
            self.remind_event(event, &mut report).await;
        }

        info!(
            reminder_date = %reminder_date,
            dispatched = report.dispatches.len(),
            delivered = report.delivered(),
            failed = report.failed(),
            errors = report.errors.len(),
            "reminder run finished"
        );
        Ok(report)
    }

    async fn remind_placement(&self, placement: Placement, report: &mut ReminderReport) {
        let students = match self.store.placement_registrations_for_placement(placement.id) {
            Ok(registrations) => registrations.into_iter().map(|r| r.student),
            Err(err) => {
                warn!(placement_id = %placement.id, error = %err, "skipping placement reminder");
                report
                    .errors
                    .push(format!("placement {}: {err}", placement.id));
                return;
            }
        };
        let recipients = match self.addresses(students) {
            Ok(recipients) => recipients,
            Err(err) => {
                report
                    .errors
                    .push(format!("placement {}: {err}", placement.id));
                return;
            }
        };
        if recipients.is_empty() {
            return;
        }

        let rendered =
            templates::placement_reminder(&placement.details.company_name, placement.details.date);
        let outcome = self
            .send(NotificationKind::PlacementReminder, &recipients, rendered)
            .await;
        report.dispatches.push(ReminderDispatch {
            target: ReminderTarget::Placement {
                id: placement.id,
                company_name: placement.details.company_name,
            },
            recipients,
            outcome,
        });
    }

    async fn remind_event(&self, event: Event, report: &mut ReminderReport) {
        let students = match self.store.event_registrations_for_event(event.id) {
            Ok(registrations) => registrations.into_iter().map(|r| r.student),
            Err(err) => {
                warn!(event_id = %event.id, error = %err, "skipping event reminder");
                report.errors.push(format!("event {}: {err}", event.id));
                return;
            }
        };
        let recipients = match self.addresses(students) {
            Ok(recipients) => recipients,
            Err(err) => {
                report.errors.push(format!("event {}: {err}", event.id));
                return;
            }
        };
        if recipients.is_empty() {
            return;
        }

        let rendered = templates::event_reminder(
            &event.details.event_name,
            event.details.date,
            &event.details.venue,
        );
        let outcome = self
            .send(NotificationKind::EventReminder, &recipients, rendered)
            .await;
        report.dispatches.push(ReminderDispatch {
            target: ReminderTarget::Event {
                id: event.id,
                event_name: event.details.event_name,
            },
            recipients,
            outcome,
        });
    }

    /// Distinct, non-empty addresses of the given students in sorted order.
    fn addresses(
        &self,
        students: impl Iterator<Item = StudentId>,
    ) -> Result<Vec<String>, StoreError> {
        let ids: BTreeSet<StudentId> = students.collect();
        let mut addresses = BTreeSet::new();
        for id in ids {
            // a student deleted mid-run simply drops out
            if let Some(student) = self.store.student(id)? {
                let email = student.profile.email.trim();
                if !email.is_empty() {
                    addresses.insert(email.to_string());
                }
            }
        }
        Ok(addresses.into_iter().collect())
    }

    async fn send(
        &self,
        kind: NotificationKind,
        recipients: &[String],
        rendered: templates::Rendered,
    ) -> DeliveryOutcome {
        let email = self.notifier.compose(
            kind,
            recipients.to_vec(),
            rendered.subject,
            rendered.body,
        );
        self.notifier.deliver(email).await
    }
}
