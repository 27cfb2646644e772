use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::stdout;

use crate::models::{format_date, truncate, ApplicationStatus, Hr, Student, TestResult, Vacancy};
use crate::selection::{HrTab, LevelFilter, Role, Screen, Selection, StudentTab};
use crate::store::FixtureStore;
use crate::views::{self, ApplicationView, TestEntry};

/// One selectable line in the left panel of a dashboard tab.
#[derive(Debug, Clone, Copy)]
enum Row<'a> {
    Test(TestEntry<'a>),
    Vacancy(&'a Vacancy),
    Result(&'a TestResult),
    Candidate(&'a Student),
    Application(ApplicationView<'a>),
}

struct App<'a> {
    store: &'a FixtureStore,
    student: Option<&'a Student>,
    hr: Option<&'a Hr>,
    selection: Selection,
    selected: usize,
    scroll_offset: u16,
    skill_query: String,
    searching: bool,
    notice: Option<String>,
}

impl<'a> App<'a> {
    fn new(store: &'a FixtureStore, student: Option<&'a Student>, hr: Option<&'a Hr>) -> Self {
        Self {
            store,
            student,
            hr,
            selection: Selection::new(),
            selected: 0,
            scroll_offset: 0,
            skill_query: String::new(),
            searching: false,
            notice: None,
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        if selection.screen() != self.selection.screen() {
            self.selected = 0;
            self.scroll_offset = 0;
            self.searching = false;
        }
        self.selection = selection;
    }

    fn choose_role(&mut self, role: Role) {
        let available = match role {
            Role::Student => self.student.is_some(),
            Role::Hr => self.hr.is_some(),
        };
        if !available {
            tracing::warn!(?role, "no user for role in fixtures");
            self.notice = Some(format!("No {:?} profile in the sample data", role));
            return;
        }
        self.notice = None;
        self.set_selection(self.selection.choose_role(role));
    }

    fn rows(&self) -> Vec<Row<'a>> {
        let store = self.store;
        match self.selection.screen() {
            Screen::Landing | Screen::Student(StudentTab::Profile) => Vec::new(),
            Screen::Student(tab) => {
                let Some(student) = self.student else {
                    return Vec::new();
                };
                match tab {
                    StudentTab::Tests => views::test_catalog_for(store, student)
                        .into_iter()
                        .map(Row::Test)
                        .collect(),
                    StudentTab::Vacancies => {
                        views::vacancies_available_to_student(store, student.level)
                            .into_iter()
                            .map(Row::Vacancy)
                            .collect()
                    }
                    StudentTab::Results => student.tests.iter().map(Row::Result).collect(),
                    StudentTab::Profile => Vec::new(),
                }
            }
            Screen::Hr(tab) => {
                let Some(hr) = self.hr else {
                    return Vec::new();
                };
                match tab {
                    HrTab::Vacancies => views::vacancies_for_company(store, &hr.company_id)
                        .into_iter()
                        .map(Row::Vacancy)
                        .collect(),
                    HrTab::Candidates => {
                        let by_level =
                            views::students_by_level(store, self.selection.level_filter());
                        views::students_with_skill(by_level, &self.skill_query)
                            .into_iter()
                            .map(Row::Candidate)
                            .collect()
                    }
                    HrTab::Applications => views::applications_for_company(store, &hr.company_id)
                        .into_iter()
                        .map(Row::Application)
                        .collect(),
                }
            }
        }
    }

    fn current_row(&self) -> Option<Row<'a>> {
        self.rows().get(self.selected).copied()
    }

    fn next(&mut self) {
        let len = self.rows().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn clamp_selected(&mut self) {
        let len = self.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// The dashboards' buttons do nothing beyond acknowledging the press.
    fn affordance(&mut self, action: &str, subject: &str) {
        tracing::info!(action, subject, "demo action pressed");
        self.notice = Some(format!("{}: {} (not available in the demo)", action, subject));
    }

    fn primary_action(&mut self) {
        let Some(row) = self.current_row() else { return };
        match (row, self.selection.screen()) {
            (Row::Test(entry), _) if entry.completed => {
                self.notice = Some(format!("{} already completed", entry.test.name));
            }
            (Row::Test(entry), _) => self.affordance("Start test", &entry.test.name),
            (Row::Vacancy(v), Screen::Student(_)) => self.affordance("Apply", &v.title),
            (Row::Vacancy(v), _) => self.affordance("View applications", &v.title),
            (Row::Candidate(s), _) => self.affordance("Invite", &s.name),
            (Row::Application(view), _) => match view.application.status.next_action() {
                Some(action) => self.affordance(action, &view.student.name),
                None => self.affordance("Write message", &view.student.name),
            },
            (Row::Result(_), _) => {}
        }
    }

    /// Returns false when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.searching {
            match code {
                KeyCode::Enter | KeyCode::Esc => self.searching = false,
                KeyCode::Backspace => {
                    self.skill_query.pop();
                }
                KeyCode::Char(c) => self.skill_query.push(c),
                _ => {}
            }
            self.clamp_selected();
            return true;
        }

        let screen = self.selection.screen();
        if screen == Screen::Landing {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => return false,
                KeyCode::Char('s') => self.choose_role(Role::Student),
                KeyCode::Char('h') => self.choose_role(Role::Hr),
                _ => {}
            }
            return true;
        }

        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => {
                self.notice = None;
                self.skill_query.clear();
                self.set_selection(self.selection.go_back());
            }
            KeyCode::Tab | KeyCode::Right => self.set_selection(self.selection.next_tab()),
            KeyCode::BackTab | KeyCode::Left => self.set_selection(self.selection.prev_tab()),
            KeyCode::Char(c @ '1'..='4') => self.select_tab_number(c as usize - '1' as usize),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(3)
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3)
            }
            KeyCode::Enter => self.primary_action(),
            KeyCode::Char('f') if screen == Screen::Hr(HrTab::Candidates) => {
                self.set_selection(self.selection.cycle_level_filter());
                self.clamp_selected();
            }
            KeyCode::Char('/') if screen == Screen::Hr(HrTab::Candidates) => {
                self.searching = true;
            }
            KeyCode::Char('e') if screen == Screen::Student(StudentTab::Profile) => {
                if let Some(student) = self.student {
                    self.affordance("Edit profile", &student.name);
                }
            }
            KeyCode::Char('e') if screen == Screen::Hr(HrTab::Vacancies) => {
                if let Some(Row::Vacancy(v)) = self.current_row() {
                    self.affordance("Edit vacancy", &v.title);
                }
            }
            KeyCode::Char('n') if matches!(screen, Screen::Hr(_)) => {
                self.affordance("Create vacancy", "new");
            }
            KeyCode::Char('p') => match self.current_row() {
                Some(Row::Candidate(s)) => self.affordance("View profile", &s.name),
                Some(Row::Application(view)) => self.affordance("View profile", &view.student.name),
                _ => {}
            },
            KeyCode::Char('m') => {
                if let Some(Row::Application(view)) = self.current_row() {
                    self.affordance("Write message", &view.student.name);
                }
            }
            _ => {}
        }
        true
    }

    fn select_tab_number(&mut self, index: usize) {
        let next = match self.selection.screen() {
            Screen::Landing => return,
            Screen::Student(_) => match StudentTab::ALL.get(index) {
                Some(tab) => self.selection.select_tab(*tab),
                None => return,
            },
            Screen::Hr(_) => match HrTab::ALL.get(index) {
                Some(tab) => self.selection.select_tab(*tab),
                None => return,
            },
        };
        self.set_selection(next);
    }
}

pub fn run_browse(
    store: &FixtureStore,
    student: Option<&Student>,
    hr: Option<&Hr>,
    role: Option<Role>,
) -> Result<()> {
    let mut app = App::new(store, student, hr);
    if let Some(role) = role {
        app.choose_role(role);
    }

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code) {
                break;
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    match app.selection.screen() {
        Screen::Landing => draw_landing(frame, app),
        _ => draw_dashboard(frame, app),
    }
}

fn draw_landing(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Kontur.Start",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        Line::from("Skills-based hiring: students prove what they can do, recruiters see it"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let students = bullet_card(
        " For students [s] ",
        &[
            "Honest, detailed review of your work",
            "One test, many opportunities",
            "Valuable feedback for professional growth",
        ],
        Color::Blue,
    );
    frame.render_widget(students, columns[0]);

    let hr = bullet_card(
        " For HR [h] ",
        &[
            "Objective, proctored testing",
            "Filtering by skill level",
            "A short queue of motivated candidates",
        ],
        Color::Green,
    );
    frame.render_widget(hr, columns[1]);

    let transparency = bullet_card(
        " Transparency ",
        &[
            "Students see exactly which level each vacancy requires",
            "Recruiters see verified test results instead of self-assessment",
        ],
        Color::Magenta,
    );
    frame.render_widget(transparency, rows[2]);

    draw_footer(frame, rows[3], app, " s:student  h:HR  q:quit");
}

fn bullet_card<'a>(title: &'a str, bullets: &[&'a str], color: Color) -> Paragraph<'a> {
    let lines: Vec<Line> = bullets
        .iter()
        .map(|b| Line::from(vec![Span::styled("  + ", Style::default().fg(color)), Span::raw(*b)]))
        .collect();
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        )
}

fn draw_dashboard(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let (header, stats, help) = match app.selection.screen() {
        Screen::Hr(tab) => (hr_header(app), hr_stats(app), hr_help(tab)),
        _ => (student_header(app), student_stats(app), student_help()),
    };

    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::BOTTOM)),
        rows[0],
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[1]);
    for (area, (label, value)) in cards.iter().zip(stats) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", label)));
        frame.render_widget(card, *area);
    }

    frame.render_widget(tab_bar(app.selection.screen()), rows[2]);

    if app.selection.screen() == Screen::Student(StudentTab::Profile) {
        let profile = Paragraph::new(Text::from(profile_lines(app)))
            .block(Block::default().borders(Borders::ALL).title(" My profile "))
            .wrap(Wrap { trim: false })
            .scroll((app.scroll_offset, 0));
        frame.render_widget(profile, rows[3]);
    } else {
        draw_rows(frame, rows[3], app);
    }

    draw_footer(frame, rows[4], app, help);
}

fn tab_bar(screen: Screen) -> Tabs<'static> {
    let (titles, selected): (Vec<&str>, usize) = match screen {
        Screen::Hr(tab) => (
            HrTab::ALL.iter().map(|t| t.title()).collect(),
            HrTab::ALL.iter().position(|t| *t == tab).unwrap_or(0),
        ),
        Screen::Student(tab) => (
            StudentTab::ALL.iter().map(|t| t.title()).collect(),
            StudentTab::ALL.iter().position(|t| *t == tab).unwrap_or(0),
        ),
        Screen::Landing => (Vec::new(), 0),
    };
    Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
}

fn draw_rows(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let rows = app.rows();
    let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_label(row))).collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(list_title(app, rows.len())))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    let detail = match rows.get(app.selected) {
        Some(row) => row_detail(app, row),
        None => Vec::new(),
    };
    let detail_widget = Paragraph::new(Text::from(detail))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(detail_widget, chunks[1]);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App, help: &str) {
    let text = match (&app.notice, app.searching) {
        (_, true) => format!(" skill search: {}_  (Enter/Esc to finish)", app.skill_query),
        (Some(notice), false) => format!(" {}", notice),
        (None, false) => help.to_string(),
    };
    let style = if app.notice.is_some() && !app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn student_help() -> &'static str {
    " tab/1-4:tabs  j/k:navigate  J/K:scroll  enter:start/apply  e:edit profile  b:back  q:quit"
}

fn hr_help(tab: HrTab) -> &'static str {
    match tab {
        HrTab::Vacancies => {
            " tab/1-3:tabs  j/k:navigate  enter:applications  e:edit  n:new vacancy  b:back  q:quit"
        }
        HrTab::Candidates => {
            " tab/1-3:tabs  j/k:navigate  f:level  /:skill search  p:profile  enter:invite  b:back  q:quit"
        }
        HrTab::Applications => {
            " tab/1-3:tabs  j/k:navigate  p:profile  m:message  enter:action  b:back  q:quit"
        }
    }
}

fn initials(name: &str) -> String {
    name.chars().take(2).collect::<String>().to_uppercase()
}

fn student_header(app: &App) -> Vec<Line<'static>> {
    let Some(student) = app.student else {
        return Vec::new();
    };
    let subtitle = student.bio.clone().unwrap_or_else(|| student.email.clone());
    vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", initials(&student.name)),
                Style::default().fg(Color::Blue),
            ),
            Span::styled(student.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled(format!("Level {}", student.level), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
    ]
}

fn hr_header(app: &App) -> Vec<Line<'static>> {
    let Some(hr) = app.hr else {
        return Vec::new();
    };
    let company = app
        .store
        .company(&hr.company_id)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", initials(&company)), Style::default().fg(Color::Green)),
            Span::styled(hr.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(company, Style::default().fg(Color::DarkGray))),
    ]
}

fn student_stats(app: &App) -> Vec<(&'static str, String)> {
    let stats = app
        .student
        .map(|s| views::student_stats(app.store, s))
        .unwrap_or_default();
    vec![
        ("Tests taken", stats.tests_taken.to_string()),
        ("Vacancies available", stats.available_vacancies.to_string()),
        ("Average score", format!("{}%", stats.average_score)),
        ("Messages", stats.messages.to_string()),
    ]
}

fn hr_stats(app: &App) -> Vec<(&'static str, String)> {
    let stats = app
        .hr
        .map(|hr| views::company_stats(app.store, &hr.company_id))
        .unwrap_or_default();
    vec![
        ("Active vacancies", stats.active_vacancies.to_string()),
        ("Total applications", stats.total_applications.to_string()),
        ("Under review", stats.under_review.to_string()),
        ("Messages", stats.messages.to_string()),
    ]
}

fn list_title(app: &App, count: usize) -> String {
    match app.selection.screen() {
        Screen::Student(StudentTab::Tests) => format!(" Available tests ({}) ", count),
        Screen::Student(StudentTab::Vacancies) => format!(" Vacancies for your level ({}) ", count),
        Screen::Student(StudentTab::Results) => format!(" Test results ({}) ", count),
        Screen::Hr(HrTab::Vacancies) => format!(" My vacancies ({}) ", count),
        Screen::Hr(HrTab::Candidates) => {
            let level = match app.selection.level_filter() {
                LevelFilter::All => "all levels".to_string(),
                LevelFilter::Level(l) => format!("level {}", l),
            };
            if app.skill_query.is_empty() {
                format!(" Candidates ({}) [{}] ", count, level)
            } else {
                format!(" Candidates ({}) [{}, skill: {}] ", count, level, app.skill_query)
            }
        }
        Screen::Hr(HrTab::Applications) => format!(" Applications ({}) ", count),
        _ => String::new(),
    }
}

fn row_label(row: &Row) -> String {
    match row {
        Row::Test(entry) => {
            let mark = if entry.completed { "+" } else { " " };
            format!("{} {} | L{}", mark, entry.test.name, entry.test.level)
        }
        Row::Vacancy(v) => format!("{} | L{}", truncate(&v.title, 32), v.required_level),
        Row::Result(r) => {
            let mark = if r.passed { "+" } else { "x" };
            format!("{} {} | {}/{}", mark, r.test_name, r.score, r.max_score)
        }
        Row::Candidate(s) => format!("{} | L{}", s.name, s.level),
        Row::Application(view) => format!(
            "{} | {} | {}",
            view.student.name,
            truncate(&view.vacancy.title, 24),
            view.application.status.label()
        ),
    }
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().add_modifier(Modifier::BOLD)))
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn action(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::Cyan)))
}

fn wrapped(text: &str, lines: &mut Vec<Line<'static>>) {
    for line in textwrap::fill(text, 60).lines() {
        lines.push(Line::from(line.to_string()));
    }
}

fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(width - filled), percent)
}

fn result_lines(result: &TestResult, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(format!(
        "  {}  {}/{}",
        result.test_name, result.score, result.max_score
    )));
    lines.push(Line::from(format!(
        "  {}",
        progress_bar(views::score_percent(result), 20)
    )));
}

fn row_detail(app: &App, row: &Row) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match row {
        Row::Test(entry) => {
            let test = entry.test;
            lines.push(heading(test.name.clone()));
            lines.push(dim(test.skill_area.clone()));
            lines.push(Line::from(format!("Level {}", test.level)));
            lines.push(Line::from(""));
            wrapped(&test.description, &mut lines);
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "{} min   {} questions",
                test.duration_minutes, test.questions
            )));
            lines.push(Line::from(""));
            if entry.completed {
                lines.push(Line::from(Span::styled(
                    "Completed",
                    Style::default().fg(Color::Green),
                )));
            } else {
                lines.push(action("[enter] Start test"));
            }
        }
        Row::Vacancy(v) => {
            lines.push(heading(v.title.clone()));
            if let Some(company) = app.store.vacancy_company(v) {
                lines.push(dim(company.name.clone()));
            }
            lines.push(Line::from(Span::styled(
                format!("Required level {}", v.required_level),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(""));
            wrapped(&v.description, &mut lines);
            lines.push(Line::from(""));
            lines.push(heading("Requirements"));
            lines.push(Line::from(format!("  {}", v.requirements.join(", "))));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Applications: {}", v.applications)));
            if matches!(app.selection.screen(), Screen::Hr(_)) {
                lines.push(Line::from(format!("Posted: {}", format_date(v.posted_at))));
                lines.push(Line::from(""));
                lines.push(action("[e] Edit   [enter] View applications"));
            } else {
                lines.push(Line::from(""));
                lines.push(action("[enter] Apply"));
            }
        }
        Row::Result(r) => {
            lines.push(heading(r.test_name.clone()));
            lines.push(dim(r.skill_area.clone()));
            let (label, color) = if r.passed {
                ("Passed", Color::Green)
            } else {
                ("Not passed", Color::Red)
            };
            lines.push(Line::from(Span::styled(label, Style::default().fg(color))));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Result  {} / {}", r.score, r.max_score)));
            lines.push(Line::from(progress_bar(views::score_percent(r), 30)));
            if let Some(feedback) = &r.feedback {
                lines.push(Line::from(""));
                lines.push(heading("Feedback"));
                wrapped(feedback, &mut lines);
            }
            lines.push(Line::from(""));
            lines.push(dim(format!("Completed: {}", format_date(r.completed_at))));
        }
        Row::Candidate(s) => {
            lines.push(heading(format!("[{}] {}", initials(&s.name), s.name)));
            lines.push(dim(s.email.clone()));
            lines.push(Line::from(Span::styled(
                format!("Level {}", s.level),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(""));
            lines.push(heading("Skills"));
            lines.push(Line::from(format!("  {}", s.skills.join(", "))));
            lines.push(Line::from(""));
            lines.push(heading("Completed tests"));
            for t in &s.tests {
                lines.push(Line::from(format!(
                    "  + {}  {}%",
                    t.test_name,
                    views::score_percent(t)
                )));
            }
            lines.push(Line::from(""));
            lines.push(action("[p] View profile   [enter] Invite"));
        }
        Row::Application(view) => {
            let status = view.application.status;
            lines.push(heading(format!(
                "[{}] {}",
                initials(&view.student.name),
                view.student.name
            )));
            lines.push(dim(view.vacancy.title.clone()));
            lines.push(Line::from(Span::styled(
                status.label(),
                Style::default().fg(status_color(status)),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Candidate level: {}", view.student.level)));
            lines.push(Line::from(format!(
                "Applied: {}",
                format_date(view.application.applied_at)
            )));
            lines.push(Line::from(""));
            lines.push(heading("Skills"));
            lines.push(Line::from(format!("  {}", view.student.skills.join(", "))));
            lines.push(Line::from(""));
            lines.push(heading("Test results"));
            for t in &view.student.tests {
                result_lines(t, &mut lines);
            }
            lines.push(Line::from(""));
            let mut actions = "[p] Profile   [m] Write message".to_string();
            if let Some(next) = status.next_action() {
                actions.push_str(&format!("   [enter] {}", next));
            }
            lines.push(action(actions));
        }
    }
    lines
}

fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Pending => Color::Gray,
        ApplicationStatus::Reviewing => Color::Blue,
        ApplicationStatus::Interview | ApplicationStatus::Accepted => Color::Green,
        ApplicationStatus::Rejected => Color::Red,
    }
}

fn profile_lines(app: &App) -> Vec<Line<'static>> {
    let Some(student) = app.student else {
        return Vec::new();
    };
    let mut lines = vec![
        heading("Name"),
        dim(format!("  {}", student.name)),
        heading("Email"),
        dim(format!("  {}", student.email)),
        heading("About"),
        dim(format!(
            "  {}",
            student.bio.as_deref().unwrap_or("Not filled in")
        )),
    ];
    if let Some(portfolio) = &student.portfolio {
        lines.push(heading("Portfolio"));
        lines.push(dim(format!("  {}", portfolio)));
    }
    lines.push(heading("Skills"));
    lines.push(Line::from(format!("  {}", student.skills.join(", "))));
    lines.push(heading("Current level"));
    lines.push(Line::from(Span::styled(
        format!("  Level {}", student.level),
        Style::default().fg(Color::Yellow),
    )));
    let areas = views::confirmed_skill_areas(student);
    if !areas.is_empty() {
        lines.push(heading("Confirmed by tests"));
        lines.push(Line::from(format!("  {}", areas.join(", "))));
    }
    lines.push(Line::from(""));
    lines.push(action("[e] Edit profile"));
    lines
}
