use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Bytes;
use tracing::warn;

use super::domain::PlacementRegistration;

/// An uploaded resume as held by a [`ResumeStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResumeError {
    #[error("resume upload is empty")]
    Empty,
    #[error("resume storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage for resume attachments on placement registrations.
///
/// `save` returns the key recorded on the registration (`resumes/<n>-<name>`).
pub trait ResumeStore: Send + Sync {
    fn save(&self, file: ResumeFile) -> Result<String, ResumeError>;
    fn load(&self, key: &str) -> Result<Option<ResumeFile>, ResumeError>;
    fn remove(&self, key: &str) -> Result<(), ResumeError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryResumeStore {
    inner: Arc<Mutex<Files>>,
}

#[derive(Debug, Default)]
struct Files {
    next_id: u64,
    by_key: BTreeMap<String, ResumeFile>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files().map(|files| files.by_key.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn files(&self) -> Result<MutexGuard<'_, Files>, ResumeError> {
        self.inner
            .lock()
            .map_err(|_| ResumeError::Unavailable("resume store lock poisoned".to_string()))
    }
}

impl ResumeStore for MemoryResumeStore {
    fn save(&self, mut file: ResumeFile) -> Result<String, ResumeError> {
        if file.bytes.is_empty() {
            return Err(ResumeError::Empty);
        }
        file.file_name = sanitize_file_name(&file.file_name);

        let mut files = self.files()?;
        files.next_id += 1;
        let key = format!("resumes/{}-{}", files.next_id, file.file_name);
        files.by_key.insert(key.clone(), file);
        Ok(key)
    }

    fn load(&self, key: &str) -> Result<Option<ResumeFile>, ResumeError> {
        Ok(self.files()?.by_key.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), ResumeError> {
        self.files()?.by_key.remove(key);
        Ok(())
    }
}

/// Storage keys attached to `registrations`.
pub(crate) fn attached<I>(registrations: I) -> Vec<String>
where
    I: IntoIterator<Item = PlacementRegistration>,
{
    registrations
        .into_iter()
        .filter_map(|registration| registration.resume)
        .collect()
}

/// Removes the files behind `keys`. Failures are logged and skipped.
pub(crate) fn discard<I>(resumes: &dyn ResumeStore, keys: I)
where
    I: IntoIterator<Item = String>,
{
    for key in keys {
        if let Err(err) = resumes.remove(&key) {
            warn!(resume = %key, error = %err, "failed to remove stored resume");
        }
    }
}

/// Keeps the final path segment and replaces anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(['.', '_']).is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}
