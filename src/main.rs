mod config;
mod models;
mod selection;
mod store;
mod tui;
mod views;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use models::{format_date, truncate};
use selection::{LevelFilter, Role};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kstart")]
#[command(about = "Kontur.Start demo - match students and recruiters by verified skills")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Browse {
        /// Open directly on a role's dashboard
        #[arg(short, long, value_enum)]
        role: Option<Role>,
    },

    /// List the candidate bank
    Students {
        /// Filter by level (all, 2, 3, 4, 5)
        #[arg(short, long, default_value = "all")]
        level: LevelFilter,

        /// Search by skill
        #[arg(short, long)]
        skill: Option<String>,
    },

    /// List vacancies
    Vacancies {
        /// Only vacancies posted by this company
        #[arg(short, long, conflicts_with = "level")]
        company: Option<String>,

        /// Only vacancies open to a student of this level
        #[arg(short, long)]
        level: Option<u8>,
    },

    /// List applications to a company's vacancies
    Applications {
        /// Company ID
        #[arg(short, long)]
        company: String,
    },

    /// Show the test catalog
    Tests {
        /// Mark tests this student has completed
        #[arg(short, long)]
        student: Option<String>,
    },

    /// Show dashboard statistics
    Stats {
        /// Student ID
        #[arg(short, long, conflicts_with = "company", required_unless_present = "company")]
        student: Option<String>,

        /// Company ID
        #[arg(short, long)]
        company: Option<String>,
    },

    /// Check the fixture data for broken references and out-of-range values
    Check,

    /// Write the fixture data as JSON
    Export {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse { role: None });

    // The dashboard owns the terminal, so its log goes to a file
    let log_file = matches!(command, Commands::Browse { .. }).then(Config::log_path);
    init_tracing(log_file)?;

    let config = Config::load()?;
    let store = config.open_store()?;
    tracing::debug!(?config, "configuration loaded");

    match command {
        Commands::Browse { role } => {
            tui::run_browse(
                &store,
                config.current_student(&store),
                config.current_hr(&store),
                role,
            )?;
        }

        Commands::Students { level, skill } => {
            let by_level = views::students_by_level(&store, level);
            let students = views::students_with_skill(by_level, skill.as_deref().unwrap_or(""));
            if students.is_empty() {
                println!("No students found.");
            } else {
                println!("{:<6} {:<20} {:<6} {:>6} {:<30}", "ID", "NAME", "LEVEL", "AVG", "SKILLS");
                println!("{}", "-".repeat(72));
                for student in students {
                    println!(
                        "{:<6} {:<20} {:<6} {:>5}% {:<30}",
                        student.id,
                        truncate(&student.name, 18),
                        student.level,
                        views::average_score_percent(student),
                        truncate(&student.skills.join(", "), 30)
                    );
                }
            }
        }

        Commands::Vacancies { company, level } => {
            let vacancies = match (&company, level) {
                (Some(company_id), _) => views::vacancies_for_company(&store, company_id),
                (None, Some(level)) => views::vacancies_available_to_student(&store, level),
                (None, None) => store.vacancies().iter().collect(),
            };
            if vacancies.is_empty() {
                println!("No vacancies found.");
            } else {
                println!(
                    "{:<6} {:<30} {:<16} {:<6} {:>5} {:<10}",
                    "ID", "TITLE", "COMPANY", "LEVEL", "APPS", "POSTED"
                );
                println!("{}", "-".repeat(78));
                for vacancy in vacancies {
                    let company_name = store
                        .vacancy_company(vacancy)
                        .map(|c| c.name.as_str())
                        .unwrap_or("-");
                    println!(
                        "{:<6} {:<30} {:<16} {:<6} {:>5} {:<10}",
                        vacancy.id,
                        truncate(&vacancy.title, 28),
                        truncate(company_name, 14),
                        vacancy.required_level,
                        vacancy.applications,
                        format_date(vacancy.posted_at)
                    );
                }
            }
        }

        Commands::Applications { company } => {
            let applications = views::applications_for_company(&store, &company);
            if applications.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<6} {:<20} {:<28} {:<14} {:<10}",
                    "ID", "STUDENT", "VACANCY", "STATUS", "APPLIED"
                );
                println!("{}", "-".repeat(82));
                for view in applications {
                    println!(
                        "{:<6} {:<20} {:<28} {:<14} {:<10}",
                        view.application.id,
                        truncate(&view.student.name, 18),
                        truncate(&view.vacancy.title, 26),
                        view.application.status.label(),
                        format_date(view.application.applied_at)
                    );
                }
            }
        }

        Commands::Tests { student } => {
            let student = match &student {
                Some(id) => Some(
                    store
                        .student(id)
                        .ok_or_else(|| anyhow!("Student '{}' not found", id))?,
                ),
                None => None,
            };
            println!(
                "{:<8} {:<26} {:<22} {:<6} {:>5} {:>10} {:<6}",
                "ID", "NAME", "AREA", "LEVEL", "MIN", "QUESTIONS", "DONE"
            );
            println!("{}", "-".repeat(90));
            for test in store.tests() {
                let done = match student {
                    Some(s) if views::has_completed_test(s, &test.id) => "yes",
                    Some(_) => "no",
                    None => "-",
                };
                println!(
                    "{:<8} {:<26} {:<22} {:<6} {:>5} {:>10} {:<6}",
                    test.id,
                    truncate(&test.name, 24),
                    truncate(&test.skill_area, 20),
                    test.level,
                    test.duration_minutes,
                    test.questions,
                    done
                );
            }
        }

        Commands::Stats { student, company } => {
            if let Some(id) = student {
                let student = store
                    .student(&id)
                    .ok_or_else(|| anyhow!("Student '{}' not found", id))?;
                let stats = views::student_stats(&store, student);
                println!("{} (level {})", student.name, student.level);
                println!("  Tests taken:         {}", stats.tests_taken);
                println!("  Vacancies available: {}", stats.available_vacancies);
                println!("  Average score:       {}%", stats.average_score);
                println!("  Messages:            {}", stats.messages);
            } else if let Some(id) = company {
                let name = store
                    .company(&id)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| anyhow!("Company '{}' not found", id))?;
                let stats = views::company_stats(&store, &id);
                println!("{}", name);
                println!("  Active vacancies:   {}", stats.active_vacancies);
                println!("  Total applications: {}", stats.total_applications);
                println!("  Under review:       {}", stats.under_review);
                println!("  Messages:           {}", stats.messages);
            }
        }

        Commands::Check => {
            let issues = store.check();
            if issues.is_empty() {
                println!("Fixtures OK.");
            } else {
                for issue in &issues {
                    tracing::warn!(%issue, "fixture issue");
                    println!("  {}", issue);
                }
                println!("\n{} issue(s) found", issues.len());
            }
        }

        Commands::Export { output } => {
            let json = store.to_json()?;
            if let Some(out_path) = output {
                std::fs::write(&out_path, &json)
                    .with_context(|| format!("Failed to write to {}", out_path.display()))?;
                println!("Fixtures saved to: {}", out_path.display());
            } else {
                println!("{}", json);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_browse() {
        let cli = Cli::try_parse_from(["kstart"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_level_filter_argument() {
        let cli = Cli::try_parse_from(["kstart", "students", "--level", "4"]).unwrap();
        match cli.command {
            Some(Commands::Students { level, skill }) => {
                assert_eq!(level, LevelFilter::Level(4));
                assert!(skill.is_none());
            }
            _ => panic!("expected students command"),
        }
        assert!(Cli::try_parse_from(["kstart", "students", "--level", "many"]).is_err());
    }

    #[test]
    fn stats_needs_exactly_one_target() {
        assert!(Cli::try_parse_from(["kstart", "stats"]).is_err());
        assert!(Cli::try_parse_from(["kstart", "stats", "-s", "s1", "-c", "1"]).is_err());
        assert!(Cli::try_parse_from(["kstart", "stats", "--company", "1"]).is_ok());
    }

    #[test]
    fn browse_accepts_role() {
        let cli = Cli::try_parse_from(["kstart", "browse", "--role", "hr"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Browse { role: Some(Role::Hr) })
        ));
    }
}
