use super::domain::{
    CompetitionDetails, EventDetails, PlacementDetails, StudentProfile,
};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Malformed input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Required { field: &'static str },
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("role '{role}' is not offered by {company}")]
    UnknownRole { role: String, company: String },
    #[error("placement must list at least one role")]
    NoRoles,
    #[error("competition {competition} does not belong to event {event}")]
    CompetitionEventMismatch { competition: u64, event: u64 },
    #[error("register number '{0}' is already in use")]
    RegisterNumberTaken(String),
    #[error("email '{0}' is already in use")]
    EmailTaken(String),
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

/// Accepts `local@domain.tld` shapes; delivery is the mailer's problem.
pub(crate) fn check_email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(trimmed.to_string()))
    }
}

pub(crate) fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(ValidationError::WeakPassword)
    } else {
        Ok(())
    }
}

pub(crate) fn check_profile(profile: &StudentProfile) -> Result<(), ValidationError> {
    require("register_number", &profile.register_number)?;
    require("name", &profile.name)?;
    require("department", &profile.department)?;
    require("college", &profile.college)?;
    check_email(&profile.email)
}

pub(crate) fn check_placement(details: &PlacementDetails) -> Result<(), ValidationError> {
    require("company_name", &details.company_name)?;
    require("venue", &details.venue)?;
    if details.role_names().next().is_none() {
        return Err(ValidationError::NoRoles);
    }
    Ok(())
}

pub(crate) fn check_event(details: &EventDetails) -> Result<(), ValidationError> {
    require("event_name", &details.event_name)?;
    require("venue", &details.venue)
}

pub(crate) fn check_competition(details: &CompetitionDetails) -> Result<(), ValidationError> {
    require("name", &details.name)
}

/// Trims identity fields so uniqueness checks compare like with like.
pub(crate) fn normalize_profile(profile: &mut StudentProfile) {
    profile.register_number = profile.register_number.trim().to_string();
    profile.email = profile.email.trim().to_ascii_lowercase();
    profile.name = profile.name.trim().to_string();
}
