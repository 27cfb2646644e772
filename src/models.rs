use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Anything stored in a fixture collection and addressed by its id.
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(Company, Student, Hr, TestResult, Vacancy, Application, Message, Test);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub level: u8, // 1-5, not enforced
    #[serde(default)]
    pub tests: Vec<TestResult>,
    pub bio: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hr {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub test_id: String,
    pub test_name: String,
    pub skill_area: String,
    pub score: u32,
    pub max_score: u32,
    pub level: u8,
    pub passed: bool,
    pub completed_at: NaiveDate,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: String,
    pub title: String,
    pub company_id: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub required_level: u8,
    pub skill_area: String,
    pub posted_at: NaiveDate,
    /// Display counter seeded with the vacancy; never recomputed from applications.
    pub applications: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Interview,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "New",
            Self::Reviewing => "Under review",
            Self::Interview => "Invited",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
        }
    }

    /// Extra action offered for an application in this status, besides
    /// the profile and message buttons every application gets.
    pub fn next_action(&self) -> Option<&'static str> {
        match self {
            Self::Reviewing => Some("Invite to interview"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub vacancy_id: String,
    pub student_id: String,
    pub status: ApplicationStatus,
    pub applied_at: NaiveDate,
}

/// Carried for fixture fidelity. Nothing reads it beyond counting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub text: String,
    pub sent_at: NaiveDateTime,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub id: String,
    pub name: String,
    pub skill_area: String,
    pub level: u8,
    pub duration_minutes: u32,
    pub description: String,
    pub questions: u32,
}

/// Dates are always shown day first, e.g. `18.12.2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Shortens to `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(format_date(date), "01.12.2024");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Стажёр Frontend", 9), "Стажёр...");
        assert_eq!(truncate("short", 9), "short");
    }

    #[test]
    fn only_reviewing_offers_an_interview_invite() {
        assert_eq!(
            ApplicationStatus::Reviewing.next_action(),
            Some("Invite to interview")
        );
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Interview,
            ApplicationStatus::Rejected,
            ApplicationStatus::Accepted,
        ] {
            assert_eq!(status.next_action(), None);
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Interview).unwrap();
        assert_eq!(json, "\"interview\"");
    }
}
