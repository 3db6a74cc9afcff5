use crate::infra::in_memory_portal;
use axum::body::Bytes;
use campus_portal::config::MailConfig;
use campus_portal::error::AppError;
use campus_portal::portal::domain::{
    EventRegistrationRequest, LoginRequest, PlacementRegistrationRequest, StudentDraft,
    StudentProfile,
};
use campus_portal::portal::seed::{DEMO_PASSWORD, DEMO_REGISTER_NUMBER};
use campus_portal::portal::{
    MemoryMailer, MemoryStore, PortalServices, PortalStore, ReminderTarget, ResumeFile,
};
use chrono::{Days, NaiveDate};
use clap::Args;
use std::sync::Arc;

const DEMO_COMPANY: &str = "TechCorp Solutions";
const DEMO_COMPETITION: &str = "Hackathon";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the reminder run treats as today (YYYY-MM-DD). Defaults to the day before the demo drive.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mailer = MemoryMailer::default();
    let portal = in_memory_portal(Arc::new(mailer.clone()), &MailConfig::default());

    println!("Campus Connect demo");
    let summary = portal.seed_demo()?;
    println!(
        "Seeded {} student, {} placement drives, {} events with {} competitions",
        summary.students, summary.placements, summary.events, summary.competitions
    );

    println!("\nSign-up");
    match portal.accounts.sign_up(new_student()).await {
        Ok((student, outcome)) => println!(
            "  Created {} ({}) - welcome email: {}",
            student.profile.name,
            student.profile.register_number,
            delivery_label(outcome.is_delivered())
        ),
        Err(err) => println!("  Sign-up rejected: {}", err),
    }

    println!("\nLogin");
    let login = |password: &str| LoginRequest {
        register_number: DEMO_REGISTER_NUMBER.to_string(),
        password: password.to_string(),
    };
    if let Err(err) = portal.accounts.login(&login("not-the-password")) {
        println!("  Wrong password: {}", err);
    }
    let student = match portal.accounts.login(&login(DEMO_PASSWORD)) {
        Ok(student) => {
            println!(
                "  Logged in as {} <{}>",
                student.profile.name, student.profile.email
            );
            student
        }
        Err(err) => {
            println!("  Login failed: {}", err);
            return Ok(());
        }
    };

    println!("\nPlacement registrations");
    let Some(drive) = find_placement(&portal, DEMO_COMPANY) else {
        println!("  {} is not in the catalog", DEMO_COMPANY);
        return Ok(());
    };
    for role in ["Software Engineer", "Software Engineer", "Data Analyst"] {
        let request = PlacementRegistrationRequest {
            student: student.id,
            placement: drive.id,
            role_name: role.to_string(),
            resume: None,
            resume_name: None,
        };
        let resume = ResumeFile {
            file_name: "resume.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.7 demo resume"),
        };
        match portal
            .registrations
            .register_with_resume(request, resume)
            .await
        {
            Ok(registered) => println!(
                "  {} / {}: {} as {} (confirmation {})",
                DEMO_COMPANY,
                registered.registration.role_name,
                registered.registration.status.label(),
                registered.registration.resume.as_deref().unwrap_or("no resume"),
                delivery_label(registered.notification.is_delivered())
            ),
            Err(err) => println!("  {} / {}: {}", DEMO_COMPANY, role, err),
        }
    }

    println!("\nEvent registrations");
    let competition = portal
        .store
        .competitions()
        .ok()
        .and_then(|all| {
            all.into_iter()
                .find(|competition| competition.details.name == DEMO_COMPETITION)
        });
    if let Some(competition) = competition {
        for attempt in 0..2 {
            let request = EventRegistrationRequest {
                student: student.id,
                competition: competition.id,
                event: None,
            };
            match portal.registrations.register_for_event(request).await {
                Ok(registered) => println!(
                    "  {} registration #{} recorded",
                    competition.details.name, registered.registration.id
                ),
                Err(err) => println!("  Attempt {}: {}", attempt + 1, err),
            }
        }
    }

    let today = args
        .today
        .or_else(|| drive.details.date.checked_sub_days(Days::new(1)))
        .unwrap_or(drive.details.date);
    println!("\nReminder run for {}", today);
    match portal.reminders.run(today).await {
        Ok(report) => {
            if report.dispatches.is_empty() {
                println!("  Nothing scheduled for {}", report.reminder_date);
            }
            for dispatch in &report.dispatches {
                let target = match &dispatch.target {
                    ReminderTarget::Placement { company_name, .. } => company_name,
                    ReminderTarget::Event { event_name, .. } => event_name,
                };
                println!(
                    "  {} -> {} recipient(s), {}",
                    target,
                    dispatch.recipients.len(),
                    delivery_label(dispatch.outcome.is_delivered())
                );
            }
            for error in &report.errors {
                println!("  Skipped: {}", error);
            }
        }
        Err(err) => println!("  Reminder run failed: {}", err),
    }

    let outbox = mailer.sent();
    println!("\nCaptured emails ({})", outbox.len());
    for email in outbox {
        println!("- [{}] to {}", email.kind.label(), email.to.join(", "));
        println!("  Subject: {}", email.subject);
        for line in email.body.lines().filter(|line| !line.trim().is_empty()) {
            println!("    {}", line);
        }
    }

    Ok(())
}

fn find_placement(
    portal: &PortalServices<MemoryStore, MemoryMailer>,
    company: &str,
) -> Option<campus_portal::portal::domain::Placement> {
    portal
        .store
        .placements()
        .ok()?
        .into_iter()
        .find(|placement| placement.details.company_name == company)
}

fn delivery_label(delivered: bool) -> &'static str {
    if delivered {
        "sent"
    } else {
        "failed"
    }
}

fn new_student() -> StudentDraft {
    StudentDraft {
        profile: StudentProfile {
            register_number: "2026001".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha.rao@college.edu".to_string(),
            phone: "9000000001".to_string(),
            student_class: "B.E.".to_string(),
            department: "ECE".to_string(),
            year: "3".to_string(),
            college: "Engineering College".to_string(),
            cgpa: Some("8.6".to_string()),
            backlogs: Some("0".to_string()),
            history_of_arrears: None,
            tenth_marks: Some("92".to_string()),
            twelfth_marks: Some("89".to_string()),
        },
        password: "correct-horse-battery".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_runs_end_to_end() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date");
        run_demo(DemoArgs { today: Some(today) })
            .await
            .expect("demo completes");
    }
}
