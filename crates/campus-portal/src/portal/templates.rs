//! Subject and body text for every email the portal sends.

use chrono::NaiveDate;

const SIGNATURE: &str = "Best regards,\nCampus Connect Team\n";

pub struct Rendered {
    pub subject: String,
    pub body: String,
}

pub fn welcome(student_name: &str) -> Rendered {
    Rendered {
        subject: "Welcome to Campus Connect!".to_string(),
        body: format!(
            "Hi {student_name},\n\n\
             Welcome to Campus Connect! Your account has been successfully created.\n\
             You can now log in to view upcoming placement drives and campus events.\n\n\
             {SIGNATURE}"
        ),
    }
}

pub fn placement_confirmation(company_name: &str, date: NaiveDate, role_name: &str) -> Rendered {
    Rendered {
        subject: format!("Placement Drive Registration: {company_name}"),
        body: format!(
            "You have successfully applied for the {company_name} placement drive.\n\n\
             Role: {role_name}\n\
             Date: {date}\n\n\
             Prepare well and good luck!\n\n\
             {SIGNATURE}"
        ),
    }
}

/// `event_title` is "<event> - <competition>".
pub fn event_confirmation(event_title: &str, date: NaiveDate) -> Rendered {
    Rendered {
        subject: format!("Registration Confirmed: {event_title}"),
        body: format!(
            "You have successfully registered for the event: {event_title}.\n\n\
             Date: {date}\n\n\
             We look forward to seeing you there!\n\n\
             {SIGNATURE}"
        ),
    }
}

pub fn placement_reminder(company_name: &str, date: NaiveDate) -> Rendered {
    Rendered {
        subject: format!("Reminder: Placement Drive - {company_name}"),
        body: format!(
            "Hi there,\n\n\
             This is a reminder for the Placement Drive by {company_name} scheduled for tomorrow, {date}.\n\n\
             Good luck!\n\n\
             {SIGNATURE}"
        ),
    }
}

pub fn event_reminder(event_name: &str, date: NaiveDate, venue: &str) -> Rendered {
    Rendered {
        subject: format!("Reminder: Upcoming Event - {event_name}"),
        body: format!(
            "Hi there,\n\n\
             This is a reminder that the event '{event_name}' is scheduled for tomorrow, {date}.\n\
             Location: {venue}\n\n\
             Don't miss out!\n\n\
             {SIGNATURE}"
        ),
    }
}
