//! Demo dataset: one student, five placement drives, five events.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::info;

use super::credentials::{CredentialError, Credentials};
use super::domain::CompetitionKind::{self, Individual, IndividualOrTeam, Team};
use super::domain::{CompetitionDetails, EventDetails, PlacementDetails, StudentProfile};
use super::store::{PortalStore, StoreError};

pub const DEMO_REGISTER_NUMBER: &str = "12345";
pub const DEMO_EMAIL: &str = "student@test.com";
pub const DEMO_PASSWORD: &str = "password123";

struct PlacementFixture {
    company_name: &'static str,
    logo: &'static str,
    description: &'static str,
    date: &'static str,
    time: &'static str,
    venue: &'static str,
    roles: &'static str,
    eligibility: &'static str,
    package: &'static str,
}

struct CompetitionFixture {
    name: &'static str,
    description: &'static str,
    prize: &'static str,
    team_size: &'static str,
    kind: CompetitionKind,
}

struct EventFixture {
    event_name: &'static str,
    image: &'static str,
    description: &'static str,
    date: &'static str,
    time: &'static str,
    venue: &'static str,
    rules: &'static str,
    contact_person: &'static str,
    contact_number: &'static str,
    competitions: [CompetitionFixture; 5],
}

const fn competition(
    name: &'static str,
    description: &'static str,
    prize: &'static str,
    team_size: &'static str,
    kind: CompetitionKind,
) -> CompetitionFixture {
    CompetitionFixture {
        name,
        description,
        prize,
        team_size,
        kind,
    }
}

const PLACEMENTS: [PlacementFixture; 5] = [
    PlacementFixture {
        company_name: "TechCorp Solutions",
        logo: "https://images.unsplash.com/photo-1549421263-5ec394a5ad4c?auto=format&fit=crop&w=400&q=80",
        description: "Leading technology company specializing in cloud computing and AI solutions.",
        date: "2026-03-15",
        time: "10:00:00",
        venue: "Main Auditorium",
        roles: "Software Engineer,Data Analyst,Cloud Architect,AI/ML Engineer,DevOps Engineer,Frontend Developer,Backend Developer,Full Stack Developer",
        eligibility: "B.E./B.Tech in CS/IT with 7.0+ CGPA",
        package: "₹8-15 LPA",
    },
    PlacementFixture {
        company_name: "InnovateTech",
        logo: "https://images.unsplash.com/photo-1560179707-f14e90ef3623?auto=format&fit=crop&w=400&q=80",
        description: "Innovative startup focused on mobile applications and web development.",
        date: "2026-03-20",
        time: "14:00:00",
        venue: "Conference Hall A",
        roles: "Mobile App Developer,UI/UX Designer,React Developer,Node.js Developer,Product Manager,QA Engineer",
        eligibility: "Any engineering branch with coding skills",
        package: "₹6-12 LPA",
    },
    PlacementFixture {
        company_name: "DataMinds Analytics",
        logo: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&w=400&q=80",
        description: "Data analytics and business intelligence company.",
        date: "2026-03-25",
        time: "11:00:00",
        venue: "Seminar Hall B",
        roles: "Data Scientist,Business Analyst,Data Engineer,BI Developer,Statistical Analyst,Machine Learning Engineer",
        eligibility: "B.Sc/B.Tech in CS/Statistics/Mathematics",
        package: "₹7-14 LPA",
    },
    PlacementFixture {
        company_name: "CyberSecure Inc",
        logo: "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?auto=format&fit=crop&w=400&q=80",
        description: "Cybersecurity solutions and consulting firm.",
        date: "2026-04-01",
        time: "09:00:00",
        venue: "Lab Complex",
        roles: "Security Analyst,Penetration Tester,Security Engineer,SOC Analyst,Cryptographer,Network Security Specialist",
        eligibility: "B.Tech in CS/IT with security certifications preferred",
        package: "₹9-18 LPA",
    },
    PlacementFixture {
        company_name: "CloudNine Technologies",
        logo: "https://images.unsplash.com/photo-1451187580459-43490279c0fa?auto=format&fit=crop&w=400&q=80",
        description: "Cloud infrastructure and DevOps services provider.",
        date: "2026-04-05",
        time: "13:00:00",
        venue: "Main Auditorium",
        roles: "Cloud Engineer,DevOps Engineer,Site Reliability Engineer,AWS Specialist,Azure Developer,Kubernetes Administrator",
        eligibility: "B.E./B.Tech with cloud certifications",
        package: "₹10-20 LPA",
    },
];

const EVENTS: [EventFixture; 5] = [
    EventFixture {
        event_name: "Cultural Fest 2026",
        image: "https://images.unsplash.com/photo-1492684223066-81342ee5ff30?auto=format&fit=crop&w=1200&q=80",
        description: "Annual cultural celebration featuring various artistic competitions.",
        date: "2026-03-18",
        time: "18:00:00",
        venue: "College Ground",
        rules: "General rules apply. Specific rules for each competition will be provided at registration.",
        contact_person: "Cultural Committee Head",
        contact_number: "9876543210",
        competitions: [
            competition("Singing Competition", "Solo and group singing performances", "₹10,000", "1-5", IndividualOrTeam),
            competition("Dance Competition", "Classical, contemporary, and folk dance", "₹15,000", "1-10", IndividualOrTeam),
            competition("Box Cricket", "5-a-side cricket tournament", "₹20,000", "5", Team),
            competition("Drama/Theatre", "Short play competition", "₹12,000", "3-15", Team),
            competition("Fashion Show", "Traditional and modern fashion", "₹8,000", "1-10", IndividualOrTeam),
        ],
    },
    EventFixture {
        event_name: "Tech Symposium 2026",
        image: "https://images.unsplash.com/photo-1515879218367-8466d910aaa4?auto=format&fit=crop&w=1200&q=80",
        description: "Technical event showcasing innovation and creativity.",
        date: "2026-03-22",
        time: "09:00:00",
        venue: "Computer Lab",
        rules: "Participants must bring their own laptops. Internet access will be provided.",
        contact_person: "Technical Committee Head",
        contact_number: "9876543211",
        competitions: [
            competition("Hackathon", "24-hour coding challenge", "₹50,000", "2-4", Team),
            competition("Coding Contest", "Algorithmic problem solving", "₹25,000", "1", Individual),
            competition("Robotics Challenge", "Build and compete with robots", "₹30,000", "2-3", Team),
            competition("Web Design", "Creative website development", "₹15,000", "1-2", IndividualOrTeam),
            competition("AI Challenge", "Machine learning project", "₹35,000", "1-3", IndividualOrTeam),
        ],
    },
    EventFixture {
        event_name: "Sports Meet 2026",
        image: "https://images.unsplash.com/photo-1517649763962-0c623066013b?auto=format&fit=crop&w=1200&q=80",
        description: "Annual sports competition with various athletic events.",
        date: "2026-04-10",
        time: "07:00:00",
        venue: "Sports Ground",
        rules: "Standard sports rules apply. Referees decision is final.",
        contact_person: "Sports Secretary",
        contact_number: "9876543212",
        competitions: [
            competition("Football Tournament", "Inter-department football", "₹25,000", "11-15", Team),
            competition("Basketball", "5v5 basketball tournament", "₹20,000", "5-8", Team),
            competition("Athletics", "Track and field events", "₹15,000", "1", Individual),
            competition("Badminton", "Singles and doubles", "₹10,000", "1-2", IndividualOrTeam),
            competition("Volleyball", "Team volleyball competition", "₹18,000", "6-10", Team),
        ],
    },
    EventFixture {
        event_name: "Art & Literature Fest 2026",
        image: "https://images.unsplash.com/photo-1456513080510-7bf3a84b82f8?auto=format&fit=crop&w=1200&q=80",
        description: "Celebrating creativity through art and literary competitions.",
        date: "2026-04-15",
        time: "10:00:00",
        venue: "Art Gallery",
        rules: "Original work only. Plagiarism will lead to disqualification.",
        contact_person: "Literary Club Head",
        contact_number: "9876543213",
        competitions: [
            competition("Painting", "Canvas painting competition", "₹12,000", "1", Individual),
            competition("Poetry Slam", "Spoken word poetry", "₹8,000", "1", Individual),
            competition("Photography", "Photo contest", "₹10,000", "1", Individual),
            competition("Essay Writing", "Creative essay competition", "₹6,000", "1", Individual),
            competition("Debate", "Parliamentary debate", "₹9,000", "2", Team),
        ],
    },
    EventFixture {
        event_name: "Entrepreneurship Summit 2026",
        image: "https://images.unsplash.com/photo-1556761175-b413da4baf72?auto=format&fit=crop&w=1200&q=80",
        description: "Platform for budding entrepreneurs to showcase ideas.",
        date: "2026-04-20",
        time: "14:00:00",
        venue: "Business School",
        rules: "Formal attire mandatory. Presentations must be submitted beforehand.",
        contact_person: "E-Cell President",
        contact_number: "9876543214",
        competitions: [
            competition("Pitch Competition", "Startup pitch presentation", "₹1,00,000", "1-4", Team),
            competition("Business Plan", "Comprehensive business plan", "₹50,000", "2-5", Team),
            competition("Innovation Challenge", "Novel product ideas", "₹40,000", "2-4", Team),
            competition("Marketing Strategy", "Marketing campaign design", "₹25,000", "2-3", Team),
            competition("Case Study", "Business case analysis", "₹20,000", "2-3", Team),
        ],
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub students: usize,
    pub placements: usize,
    pub events: usize,
    pub competitions: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("invalid fixture date or time: {0}")]
    Fixture(#[from] chrono::ParseError),
}

pub fn demo_student_profile() -> StudentProfile {
    StudentProfile {
        register_number: DEMO_REGISTER_NUMBER.to_string(),
        name: "Test Student".to_string(),
        email: DEMO_EMAIL.to_string(),
        phone: "9876543210".to_string(),
        student_class: "B.Tech".to_string(),
        department: "CS".to_string(),
        year: "4".to_string(),
        college: "Engineering College".to_string(),
        cgpa: None,
        backlogs: None,
        history_of_arrears: None,
        tenth_marks: None,
        twelfth_marks: None,
    }
}

/// Replace the catalog and demo student with the fixture set.
///
/// Every placement and event is deleted first, which cascades to competitions
/// and registrations, so running this twice yields the same dataset.
pub fn seed_demo_data<S>(store: &S, credentials: &Credentials) -> Result<SeedSummary, SeedError>
where
    S: PortalStore + ?Sized,
{
    let password_hash = credentials.hash(DEMO_PASSWORD)?;

    for placement in store.placements()? {
        store.delete_placement(placement.id)?;
    }
    for event in store.events()? {
        store.delete_event(event.id)?;
    }
    if let Some(student) = store.student_by_register_number(DEMO_REGISTER_NUMBER)? {
        store.delete_student(student.id)?;
    }
    if let Some(student) = store.student_by_email(DEMO_EMAIL)? {
        store.delete_student(student.id)?;
    }

    let mut summary = SeedSummary::default();
    store.insert_student(demo_student_profile(), password_hash)?;
    summary.students += 1;

    for fixture in &PLACEMENTS {
        store.insert_placement(PlacementDetails {
            company_name: fixture.company_name.to_string(),
            logo: Some(fixture.logo.to_string()),
            description: fixture.description.to_string(),
            date: date(fixture.date)?,
            time: time(fixture.time)?,
            venue: fixture.venue.to_string(),
            roles: fixture.roles.to_string(),
            eligibility: fixture.eligibility.to_string(),
            package: fixture.package.to_string(),
        })?;
        summary.placements += 1;
    }

    for fixture in &EVENTS {
        let details = EventDetails {
            event_name: fixture.event_name.to_string(),
            image: Some(fixture.image.to_string()),
            description: fixture.description.to_string(),
            date: date(fixture.date)?,
            time: time(fixture.time)?,
            venue: fixture.venue.to_string(),
            rules: Some(fixture.rules.to_string()),
            contact_person: Some(fixture.contact_person.to_string()),
            contact_number: Some(fixture.contact_number.to_string()),
        };
        let competitions = fixture
            .competitions
            .iter()
            .map(|competition| CompetitionDetails {
                name: competition.name.to_string(),
                image: None,
                description: competition.description.to_string(),
                prize: competition.prize.to_string(),
                team_size: Some(competition.team_size.to_string()),
                kind: Some(competition.kind),
            })
            .collect();

        let (_, competitions) = store.insert_event_with_competitions(details, competitions)?;
        summary.events += 1;
        summary.competitions += competitions.len();
    }

    info!(
        students = summary.students,
        placements = summary.placements,
        events = summary.events,
        competitions = summary.competitions,
        "demo data seeded"
    );
    Ok(summary)
}

fn date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

fn time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_parse_and_list_roles() {
        for fixture in &PLACEMENTS {
            assert!(date(fixture.date).is_ok(), "{}", fixture.company_name);
            assert!(time(fixture.time).is_ok(), "{}", fixture.company_name);
            assert!(fixture.roles.split(',').count() >= 6);
        }
        for fixture in &EVENTS {
            assert!(date(fixture.date).is_ok(), "{}", fixture.event_name);
        }
    }
}
