use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::{
    Application, ApplicationStatus, Company, Hr, Identified, Message, Student, Test, TestResult,
    Vacancy,
};

/// The fixed sample data every dashboard reads from. Built once at startup,
/// never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureStore {
    #[serde(default)]
    companies: Vec<Company>,
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    hr_users: Vec<Hr>,
    #[serde(default)]
    vacancies: Vec<Vacancy>,
    #[serde(default)]
    applications: Vec<Application>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    tests: Vec<Test>,
}

/// Finds a record by id. A miss is an ordinary outcome, not an error.
pub fn find_by_id<'a, T: Identified>(collection: &'a [T], id: &str) -> Option<&'a T> {
    let found = collection.iter().find(|item| item.id() == id);
    if found.is_none() {
        tracing::debug!(id, "fixture lookup miss");
    }
    found
}

impl FixtureStore {
    pub fn new(
        companies: Vec<Company>,
        students: Vec<Student>,
        hr_users: Vec<Hr>,
        vacancies: Vec<Vacancy>,
        applications: Vec<Application>,
        messages: Vec<Message>,
        tests: Vec<Test>,
    ) -> Self {
        Self {
            companies,
            students,
            hr_users,
            vacancies,
            applications,
            messages,
            tests,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse fixture JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
        let store = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            students = store.students.len(),
            vacancies = store.vacancies.len(),
            "loaded fixtures"
        );
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize fixtures")
    }

    // --- Collections ---

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn hr_users(&self) -> &[Hr] {
        &self.hr_users
    }

    pub fn vacancies(&self) -> &[Vacancy] {
        &self.vacancies
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    // --- Lookups ---

    pub fn company(&self, id: &str) -> Option<&Company> {
        find_by_id(&self.companies, id)
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        find_by_id(&self.students, id)
    }

    pub fn hr(&self, id: &str) -> Option<&Hr> {
        find_by_id(&self.hr_users, id)
    }

    pub fn vacancy(&self, id: &str) -> Option<&Vacancy> {
        find_by_id(&self.vacancies, id)
    }

    pub fn test(&self, id: &str) -> Option<&Test> {
        find_by_id(&self.tests, id)
    }

    /// The company a vacancy was posted by, if it resolves.
    pub fn vacancy_company(&self, vacancy: &Vacancy) -> Option<&Company> {
        self.company(&vacancy.company_id)
    }

    // --- Integrity ---

    /// Lists everything that breaks the assumed fixture invariants. The
    /// store keeps working regardless: dashboards skip what does not resolve.
    pub fn check(&self) -> Vec<FixtureIssue> {
        let mut issues = Vec::new();

        duplicates("company", &self.companies, &mut issues);
        duplicates("student", &self.students, &mut issues);
        duplicates("hr", &self.hr_users, &mut issues);
        duplicates("vacancy", &self.vacancies, &mut issues);
        duplicates("application", &self.applications, &mut issues);
        duplicates("message", &self.messages, &mut issues);
        duplicates("test", &self.tests, &mut issues);

        for student in &self.students {
            level_in_range("student", &student.id, student.level, &mut issues);
            for result in &student.tests {
                level_in_range("result", &result.id, result.level, &mut issues);
                if self.test(&result.test_id).is_none() {
                    issues.push(FixtureIssue::dangling(
                        "result",
                        &result.id,
                        "test",
                        &result.test_id,
                    ));
                }
                if result.score > result.max_score {
                    issues.push(FixtureIssue::ScoreAboveMax {
                        id: result.id.clone(),
                        score: result.score,
                        max_score: result.max_score,
                    });
                }
            }
        }

        for hr in &self.hr_users {
            if self.company(&hr.company_id).is_none() {
                issues.push(FixtureIssue::dangling("hr", &hr.id, "company", &hr.company_id));
            }
        }

        for vacancy in &self.vacancies {
            level_in_range("vacancy", &vacancy.id, vacancy.required_level, &mut issues);
            if self.company(&vacancy.company_id).is_none() {
                issues.push(FixtureIssue::dangling(
                    "vacancy",
                    &vacancy.id,
                    "company",
                    &vacancy.company_id,
                ));
            }
        }

        for test in &self.tests {
            level_in_range("test", &test.id, test.level, &mut issues);
        }

        for app in &self.applications {
            if self.vacancy(&app.vacancy_id).is_none() {
                issues.push(FixtureIssue::dangling(
                    "application",
                    &app.id,
                    "vacancy",
                    &app.vacancy_id,
                ));
            }
            if self.student(&app.student_id).is_none() {
                issues.push(FixtureIssue::dangling(
                    "application",
                    &app.id,
                    "student",
                    &app.student_id,
                ));
            }
        }

        for msg in &self.messages {
            for user_id in [&msg.from_id, &msg.to_id] {
                if !self.is_user(user_id) {
                    issues.push(FixtureIssue::dangling("message", &msg.id, "user", user_id));
                }
            }
        }

        issues
    }

    fn is_user(&self, id: &str) -> bool {
        self.students.iter().any(|s| s.id == id) || self.hr_users.iter().any(|h| h.id == id)
    }

    /// The sample data the demo ships with.
    pub fn seed() -> Self {
        let companies = vec![
            Company {
                id: "1".to_string(),
                name: "СКБ Контур".to_string(),
                description: "Разрабатываем облачные сервисы для бизнеса".to_string(),
            },
            Company {
                id: "2".to_string(),
                name: "Яндекс".to_string(),
                description: "Интернет-компания".to_string(),
            },
            Company {
                id: "3".to_string(),
                name: "VK".to_string(),
                description: "Социальные сети и технологии".to_string(),
            },
        ];

        let students = vec![
            Student {
                id: "s1".to_string(),
                name: "Анна Иванова".to_string(),
                email: "anna@example.com".to_string(),
                skills: strings(&["React", "TypeScript", "Node.js"]),
                level: 3,
                bio: Some("Фронтенд-разработчик, 3 курс МГУ".to_string()),
                portfolio: None,
                tests: vec![TestResult {
                    id: "t1".to_string(),
                    test_id: "test1".to_string(),
                    test_name: "Frontend базовый".to_string(),
                    skill_area: "Frontend Development".to_string(),
                    score: 85,
                    max_score: 100,
                    level: 3,
                    passed: true,
                    completed_at: day(2024, 12, 1),
                    feedback: Some("Отличное знание React и TypeScript".to_string()),
                }],
            },
            Student {
                id: "s2".to_string(),
                name: "Дмитрий Петров".to_string(),
                email: "dmitry@example.com".to_string(),
                skills: strings(&["Python", "Django", "PostgreSQL"]),
                level: 4,
                bio: Some("Backend-разработчик, 4 курс СПбГУ".to_string()),
                portfolio: None,
                tests: vec![TestResult {
                    id: "t2".to_string(),
                    test_id: "test2".to_string(),
                    test_name: "Backend продвинутый".to_string(),
                    skill_area: "Backend Development".to_string(),
                    score: 92,
                    max_score: 100,
                    level: 4,
                    passed: true,
                    completed_at: day(2024, 12, 5),
                    feedback: Some("Превосходное владение Python и базами данных".to_string()),
                }],
            },
        ];

        let hr_users = vec![Hr {
            id: "hr1".to_string(),
            name: "Елена Смирнова".to_string(),
            email: "elena@skbkontur.ru".to_string(),
            company_id: "1".to_string(),
        }];

        let vacancies = vec![
            Vacancy {
                id: "v1".to_string(),
                title: "Стажёр Frontend-разработчик".to_string(),
                company_id: "1".to_string(),
                description: "Ищем талантливого студента для работы над веб-приложениями"
                    .to_string(),
                requirements: strings(&["React", "TypeScript", "Git"]),
                required_level: 3,
                skill_area: "Frontend Development".to_string(),
                posted_at: day(2024, 12, 10),
                applications: 12,
            },
            Vacancy {
                id: "v2".to_string(),
                title: "Стажёр Backend-разработчик".to_string(),
                company_id: "2".to_string(),
                description: "Разработка серверной части высоконагруженных систем".to_string(),
                requirements: strings(&["Python", "Django", "SQL"]),
                required_level: 4,
                skill_area: "Backend Development".to_string(),
                posted_at: day(2024, 12, 12),
                applications: 8,
            },
            Vacancy {
                id: "v3".to_string(),
                title: "Стажёр Data Analyst".to_string(),
                company_id: "3".to_string(),
                description: "Анализ данных и построение моделей".to_string(),
                requirements: strings(&["Python", "Pandas", "SQL"]),
                required_level: 2,
                skill_area: "Data Science".to_string(),
                posted_at: day(2024, 12, 15),
                applications: 15,
            },
        ];

        let applications = vec![
            Application {
                id: "a1".to_string(),
                vacancy_id: "v1".to_string(),
                student_id: "s1".to_string(),
                status: ApplicationStatus::Reviewing,
                applied_at: day(2024, 12, 18),
            },
            Application {
                id: "a2".to_string(),
                vacancy_id: "v2".to_string(),
                student_id: "s2".to_string(),
                status: ApplicationStatus::Interview,
                applied_at: day(2024, 12, 19),
            },
        ];

        let messages = vec![
            Message {
                id: "m1".to_string(),
                from_id: "hr1".to_string(),
                to_id: "s1".to_string(),
                text: "Здравствуйте! Мы рассмотрели ваш профиль и хотели бы пригласить вас на собеседование."
                    .to_string(),
                sent_at: at(day(2024, 12, 20), 10, 0),
                read: true,
            },
            Message {
                id: "m2".to_string(),
                from_id: "s1".to_string(),
                to_id: "hr1".to_string(),
                text: "Добрый день! Спасибо за приглашение, я с удовольствием приду.".to_string(),
                sent_at: at(day(2024, 12, 20), 14, 30),
                read: true,
            },
        ];

        let tests = vec![
            Test {
                id: "test1".to_string(),
                name: "Frontend базовый".to_string(),
                skill_area: "Frontend Development".to_string(),
                level: 3,
                duration_minutes: 60,
                description: "Тестирование знаний React, TypeScript, HTML/CSS".to_string(),
                questions: 25,
            },
            Test {
                id: "test2".to_string(),
                name: "Backend продвинутый".to_string(),
                skill_area: "Backend Development".to_string(),
                level: 4,
                duration_minutes: 90,
                description: "Тестирование знаний Python, Django, PostgreSQL, архитектуры"
                    .to_string(),
                questions: 30,
            },
            Test {
                id: "test3".to_string(),
                name: "Data Science начальный".to_string(),
                skill_area: "Data Science".to_string(),
                level: 2,
                duration_minutes: 45,
                description: "Основы Python, Pandas, визуализация данных".to_string(),
                questions: 20,
            },
        ];

        Self::new(
            companies,
            students,
            hr_users,
            vacancies,
            applications,
            messages,
            tests,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureIssue {
    #[error("duplicate {collection} id '{id}'")]
    DuplicateId { collection: &'static str, id: String },

    #[error("{collection} '{id}' has level {level}, expected 1-5")]
    LevelOutOfRange {
        collection: &'static str,
        id: String,
        level: u8,
    },

    #[error("{collection} '{id}' references missing {target} '{target_id}'")]
    DanglingReference {
        collection: &'static str,
        id: String,
        target: &'static str,
        target_id: String,
    },

    #[error("result '{id}' scores {score} out of {max_score}")]
    ScoreAboveMax { id: String, score: u32, max_score: u32 },
}

impl FixtureIssue {
    fn dangling(collection: &'static str, id: &str, target: &'static str, target_id: &str) -> Self {
        Self::DanglingReference {
            collection,
            id: id.to_string(),
            target,
            target_id: target_id.to_string(),
        }
    }
}

fn duplicates<T: Identified>(
    collection: &'static str,
    items: &[T],
    issues: &mut Vec<FixtureIssue>,
) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            issues.push(FixtureIssue::DuplicateId {
                collection,
                id: item.id().to_string(),
            });
        }
    }
}

fn level_in_range(collection: &'static str, id: &str, level: u8, issues: &mut Vec<FixtureIssue>) {
    if !(1..=5).contains(&level) {
        issues.push(FixtureIssue::LevelOutOfRange {
            collection,
            id: id.to_string(),
            level,
        });
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap_or_default()
}
