//! Pure derivations from the fixture store to what a dashboard shows.
//!
//! Nothing here fails: a reference that does not resolve drops the one
//! record it belongs to, and an empty result is just an empty list.

use std::collections::HashSet;

use crate::models::{Application, ApplicationStatus, Student, Test, TestResult, Vacancy};
use crate::selection::LevelFilter;
use crate::store::FixtureStore;

/// An application joined with the student and vacancy it points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicationView<'a> {
    pub application: &'a Application,
    pub student: &'a Student,
    pub vacancy: &'a Vacancy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestEntry<'a> {
    pub test: &'a Test,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentStats {
    pub tests_taken: usize,
    pub available_vacancies: usize,
    pub average_score: u32,
    pub messages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompanyStats {
    pub active_vacancies: usize,
    /// Sum of the vacancies' display counters, not a count of applications.
    pub total_applications: u64,
    pub under_review: usize,
    pub messages: usize,
}

pub fn vacancies_for_company<'a>(store: &'a FixtureStore, company_id: &str) -> Vec<&'a Vacancy> {
    store
        .vacancies()
        .iter()
        .filter(|v| v.company_id == company_id)
        .collect()
}

pub fn applications_for_company<'a>(
    store: &'a FixtureStore,
    company_id: &str,
) -> Vec<ApplicationView<'a>> {
    store
        .applications()
        .iter()
        .filter_map(|application| {
            let student = store.student(&application.student_id)?;
            let vacancy = store.vacancy(&application.vacancy_id)?;
            Some(ApplicationView {
                application,
                student,
                vacancy,
            })
        })
        .filter(|view| view.vacancy.company_id == company_id)
        .collect()
}

pub fn students_by_level(store: &FixtureStore, filter: LevelFilter) -> Vec<&Student> {
    store
        .students()
        .iter()
        .filter(|s| filter.matches(s.level))
        .collect()
}

/// Vacancies at or below the given level.
pub fn vacancies_available_to_student(store: &FixtureStore, level: u8) -> Vec<&Vacancy> {
    store
        .vacancies()
        .iter()
        .filter(|v| v.required_level <= level)
        .collect()
}

pub fn has_completed_test(student: &Student, test_id: &str) -> bool {
    student.tests.iter().any(|t| t.test_id == test_id)
}

pub fn score_percent(result: &TestResult) -> u32 {
    round_half_up(raw_percent(result))
}

/// Unweighted mean of the student's result percentages; 0 with no results.
pub fn average_score_percent(student: &Student) -> u32 {
    if student.tests.is_empty() {
        return 0;
    }
    let total: f64 = student.tests.iter().map(raw_percent).sum();
    round_half_up(total / student.tests.len() as f64)
}

fn raw_percent(result: &TestResult) -> f64 {
    if result.max_score == 0 {
        return 0.0;
    }
    result.score as f64 / result.max_score as f64 * 100.0
}

fn round_half_up(value: f64) -> u32 {
    // Trim float noise first so 88.4999999 from 85% and 92% still lands on .5
    let trimmed = (value * 1e6).round() / 1e6;
    (trimmed + 0.5).floor().max(0.0) as u32
}

/// The test catalog with each entry marked done or not for this student.
pub fn test_catalog_for<'a>(store: &'a FixtureStore, student: &Student) -> Vec<TestEntry<'a>> {
    store
        .tests()
        .iter()
        .map(|test| TestEntry {
            test,
            completed: has_completed_test(student, &test.id),
        })
        .collect()
}

/// Messages sent or received by any of the given users.
pub fn message_count(store: &FixtureStore, user_ids: &[&str]) -> usize {
    store
        .messages()
        .iter()
        .filter(|m| user_ids.contains(&m.from_id.as_str()) || user_ids.contains(&m.to_id.as_str()))
        .count()
}

pub fn student_stats(store: &FixtureStore, student: &Student) -> StudentStats {
    StudentStats {
        tests_taken: student.tests.len(),
        available_vacancies: vacancies_available_to_student(store, student.level).len(),
        average_score: average_score_percent(student),
        messages: message_count(store, &[student.id.as_str()]),
    }
}

pub fn company_stats(store: &FixtureStore, company_id: &str) -> CompanyStats {
    let vacancies = vacancies_for_company(store, company_id);
    let under_review = applications_for_company(store, company_id)
        .iter()
        .filter(|view| view.application.status == ApplicationStatus::Reviewing)
        .count();
    let hr_ids: Vec<&str> = store
        .hr_users()
        .iter()
        .filter(|hr| hr.company_id == company_id)
        .map(|hr| hr.id.as_str())
        .collect();

    CompanyStats {
        active_vacancies: vacancies.len(),
        total_applications: vacancies.iter().map(|v| u64::from(v.applications)).sum(),
        under_review,
        messages: message_count(store, &hr_ids),
    }
}

/// Candidate-bank skill search. An empty query keeps everyone; otherwise a
/// student stays if any skill contains the query or is a close spelling of it.
pub fn students_with_skill<'a>(
    students: impl IntoIterator<Item = &'a Student>,
    query: &str,
) -> Vec<&'a Student> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return students.into_iter().collect();
    }
    students
        .into_iter()
        .filter(|s| s.skills.iter().any(|skill| skill_matches(skill, &query)))
        .collect()
}

fn skill_matches(skill: &str, query: &str) -> bool {
    let skill = skill.to_lowercase();
    skill.contains(query) || strsim::jaro_winkler(&skill, query) >= 0.9
}

/// Skill areas a student has passed a test in, in the order first seen.
pub fn confirmed_skill_areas(student: &Student) -> Vec<&str> {
    let mut seen = HashSet::new();
    student
        .tests
        .iter()
        .filter(|t| t.passed)
        .map(|t| t.skill_area.as_str())
        .filter(|area| seen.insert(*area))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, Hr, Message};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn student(id: &str, level: u8, skills: &[&str]) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {}", id),
            email: format!("{}@example.com", id),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            level,
            tests: Vec::new(),
            bio: None,
            portfolio: None,
        }
    }

    fn result(id: &str, test_id: &str, score: u32, max_score: u32) -> TestResult {
        TestResult {
            id: id.to_string(),
            test_id: test_id.to_string(),
            test_name: test_id.to_string(),
            skill_area: "Frontend Development".to_string(),
            score,
            max_score,
            level: 3,
            passed: true,
            completed_at: day(1),
            feedback: None,
        }
    }

    fn vacancy(id: &str, company_id: &str, required_level: u8, applications: u32) -> Vacancy {
        Vacancy {
            id: id.to_string(),
            title: format!("Vacancy {}", id),
            company_id: company_id.to_string(),
            description: String::new(),
            requirements: Vec::new(),
            required_level,
            skill_area: "Backend Development".to_string(),
            posted_at: day(10),
            applications,
        }
    }

    fn application(
        id: &str,
        vacancy_id: &str,
        student_id: &str,
        status: ApplicationStatus,
    ) -> Application {
        Application {
            id: id.to_string(),
            vacancy_id: vacancy_id.to_string(),
            student_id: student_id.to_string(),
            status,
            applied_at: day(18),
        }
    }

    fn company(id: &str) -> Company {
        Company {
            id: id.to_string(),
            name: format!("Company {}", id),
            description: String::new(),
        }
    }

    fn store_with(
        students: Vec<Student>,
        vacancies: Vec<Vacancy>,
        applications: Vec<Application>,
    ) -> FixtureStore {
        FixtureStore::new(
            vec![company("c1"), company("c2")],
            students,
            Vec::new(),
            vacancies,
            applications,
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn all_filter_returns_every_student_in_order() {
        let store = store_with(
            vec![student("a", 4, &[]), student("b", 2, &[]), student("c", 4, &[])],
            Vec::new(),
            Vec::new(),
        );
        let ids: Vec<&str> = students_by_level(&store, LevelFilter::All)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn level_filter_is_exact() {
        let store = store_with(
            vec![
                student("a", 4, &[]),
                student("b", 3, &[]),
                student("c", 4, &[]),
                student("d", 5, &[]),
            ],
            Vec::new(),
            Vec::new(),
        );
        for level in 1..=5 {
            let matched = students_by_level(&store, LevelFilter::Level(level));
            assert!(matched.iter().all(|s| s.level == level));
            let expected = store.students().iter().filter(|s| s.level == level).count();
            assert_eq!(matched.len(), expected);
        }
        let ids: Vec<&str> = students_by_level(&store, LevelFilter::Level(4))
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn vacancies_at_the_students_level_are_included() {
        let store = store_with(
            vec![student("s", 3, &[])],
            vec![vacancy("v1", "c1", 3, 0), vacancy("v2", "c1", 4, 0)],
            Vec::new(),
        );
        let ids: Vec<&str> = vacancies_available_to_student(&store, 3)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, ["v1"]);
    }

    #[test]
    fn available_vacancies_split_on_required_level() {
        let store = store_with(
            Vec::new(),
            (1..=5).map(|l| vacancy(&format!("v{}", l), "c1", l, 0)).collect(),
            Vec::new(),
        );
        for level in 1..=5 {
            let available = vacancies_available_to_student(&store, level);
            assert_eq!(available.len(), level as usize);
            assert!(available.iter().all(|v| v.required_level <= level));
        }
    }

    #[test]
    fn company_vacancies_keep_insertion_order() {
        let store = store_with(
            Vec::new(),
            vec![
                vacancy("v3", "c1", 2, 0),
                vacancy("v1", "c2", 2, 0),
                vacancy("v2", "c1", 5, 0),
                vacancy("v0", "c1", 1, 0),
            ],
            Vec::new(),
        );
        let ids: Vec<&str> = vacancies_for_company(&store, "c1")
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, ["v3", "v2", "v0"]);
        assert!(vacancies_for_company(&store, "c9").is_empty());
    }

    #[test]
    fn company_applications_drop_orphans() {
        let store = store_with(
            vec![student("s1", 3, &[]), student("s2", 4, &[])],
            vec![vacancy("v1", "c1", 3, 0), vacancy("v2", "c2", 4, 0)],
            vec![
                application("a1", "v1", "s1", ApplicationStatus::Reviewing),
                application("a2", "v-gone", "s1", ApplicationStatus::Pending),
                application("a3", "v1", "s-gone", ApplicationStatus::Pending),
                application("a4", "v2", "s2", ApplicationStatus::Interview),
                application("a5", "v1", "s2", ApplicationStatus::Accepted),
            ],
        );
        let views = applications_for_company(&store, "c1");
        let ids: Vec<&str> = views.iter().map(|v| v.application.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a5"]);
        assert_eq!(views[1].student.id, "s2");
        assert_eq!(views[1].vacancy.id, "v1");
    }

    #[test]
    fn average_without_results_is_zero() {
        assert_eq!(average_score_percent(&student("s", 1, &[])), 0);
    }

    #[test]
    fn average_rounds_half_up() {
        let mut s = student("s", 3, &[]);
        s.tests = vec![result("r1", "t1", 85, 100), result("r2", "t2", 92, 100)];
        assert_eq!(average_score_percent(&s), 89);
    }

    #[test]
    fn average_uses_percentages_not_raw_scores() {
        let mut s = student("s", 3, &[]);
        s.tests = vec![result("r1", "t1", 1, 2), result("r2", "t2", 90, 100)];
        assert_eq!(average_score_percent(&s), 70);
    }

    #[test]
    fn zero_max_score_counts_as_zero_percent() {
        let r = result("r1", "t1", 5, 0);
        assert_eq!(score_percent(&r), 0);
        let mut s = student("s", 3, &[]);
        s.tests = vec![r, result("r2", "t2", 50, 100)];
        assert_eq!(average_score_percent(&s), 25);
    }

    #[test]
    fn completed_tests_are_matched_by_test_id() {
        let mut s = student("s", 3, &[]);
        s.tests = vec![result("r1", "test1", 85, 100)];
        assert!(has_completed_test(&s, "test1"));
        assert!(!has_completed_test(&s, "r1"));
        assert!(!has_completed_test(&s, "test2"));
    }

    #[test]
    fn seed_catalog_marks_completed_tests() {
        let store = FixtureStore::seed();
        let anna = store.student("s1").unwrap();
        let done: Vec<(&str, bool)> = test_catalog_for(&store, anna)
            .iter()
            .map(|e| (e.test.id.as_str(), e.completed))
            .collect();
        assert_eq!(done, [("test1", true), ("test2", false), ("test3", false)]);
    }

    #[test]
    fn seed_stats_match_the_dashboards() {
        let store = FixtureStore::seed();
        let anna = store.student("s1").unwrap();
        assert_eq!(
            student_stats(&store, anna),
            StudentStats {
                tests_taken: 1,
                available_vacancies: 2,
                average_score: 85,
                messages: 2,
            }
        );
        assert_eq!(
            company_stats(&store, "1"),
            CompanyStats {
                active_vacancies: 1,
                total_applications: 12,
                under_review: 1,
                messages: 2,
            }
        );
    }

    #[test]
    fn total_applications_ignores_the_application_records() {
        let store = store_with(
            vec![student("s1", 3, &[])],
            vec![vacancy("v1", "c1", 3, 7), vacancy("v2", "c1", 2, 5)],
            vec![application("a1", "v1", "s1", ApplicationStatus::Pending)],
        );
        let stats = company_stats(&store, "c1");
        assert_eq!(stats.total_applications, 12);
        assert_eq!(stats.under_review, 0);
    }

    #[test]
    fn total_applications_does_not_overflow_the_counters() {
        let store = store_with(
            Vec::new(),
            vec![
                vacancy("v1", "c1", 3, 4_000_000_000),
                vacancy("v2", "c1", 2, 4_000_000_000),
            ],
            Vec::new(),
        );
        assert_eq!(company_stats(&store, "c1").total_applications, 8_000_000_000);
    }

    #[test]
    fn company_messages_count_every_hr_of_the_company() {
        let store = FixtureStore::new(
            vec![company("c1")],
            Vec::new(),
            vec![
                Hr {
                    id: "h1".to_string(),
                    name: "One".to_string(),
                    email: "one@c1".to_string(),
                    company_id: "c1".to_string(),
                },
                Hr {
                    id: "h2".to_string(),
                    name: "Two".to_string(),
                    email: "two@c1".to_string(),
                    company_id: "c1".to_string(),
                },
            ],
            Vec::new(),
            Vec::new(),
            ["h1", "h2", "x"]
                .iter()
                .enumerate()
                .map(|(i, from)| Message {
                    id: format!("m{}", i),
                    from_id: from.to_string(),
                    to_id: "s1".to_string(),
                    text: String::new(),
                    sent_at: day(20).and_hms_opt(10, 0, 0).unwrap(),
                    read: false,
                })
                .collect(),
            Vec::new(),
        );
        assert_eq!(company_stats(&store, "c1").messages, 2);
    }

    #[test]
    fn skill_search_is_case_insensitive_and_forgiving() {
        let students = vec![
            student("a", 3, &["React", "TypeScript"]),
            student("b", 4, &["Python", "PostgreSQL"]),
        ];
        let ids = |query: &str| -> Vec<String> {
            students_with_skill(&students, query)
                .iter()
                .map(|s| s.id.clone())
                .collect()
        };
        assert_eq!(ids(""), ["a", "b"]);
        assert_eq!(ids("typescript"), ["a"]);
        assert_eq!(ids("postgres"), ["b"]);
        assert_eq!(ids("Pyhton"), ["b"]);
        assert!(ids("Haskell").is_empty());
    }

    #[test]
    fn confirmed_areas_skip_failed_and_repeated_results() {
        let mut s = student("s", 3, &[]);
        let mut failed = result("r2", "t2", 10, 100);
        failed.passed = false;
        failed.skill_area = "Data Science".to_string();
        s.tests = vec![result("r1", "t1", 85, 100), failed, result("r3", "t3", 70, 100)];
        assert_eq!(confirmed_skill_areas(&s), ["Frontend Development"]);
    }
}
