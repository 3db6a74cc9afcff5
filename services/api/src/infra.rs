use campus_portal::config::MailConfig;
use campus_portal::portal::{Credentials, Mailer, MemoryStore, Notifier, PortalServices};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires every portal service to a fresh in-memory store and the given transport.
pub(crate) fn in_memory_portal<M>(
    mailer: Arc<M>,
    mail: &MailConfig,
) -> Arc<PortalServices<MemoryStore, M>>
where
    M: Mailer + 'static,
{
    let store = Arc::new(MemoryStore::new());
    let notifier = Notifier::new(mailer, mail);
    Arc::new(PortalServices::new(store, notifier, Credentials::default()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
