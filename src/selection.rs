use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Student,
    Hr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentTab {
    Tests,
    Vacancies,
    Results,
    Profile,
}

impl StudentTab {
    pub const ALL: [StudentTab; 4] = [Self::Tests, Self::Vacancies, Self::Results, Self::Profile];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Tests => "Tests",
            Self::Vacancies => "Vacancies",
            Self::Results => "Results",
            Self::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrTab {
    Vacancies,
    Candidates,
    Applications,
}

impl HrTab {
    pub const ALL: [HrTab; 3] = [Self::Vacancies, Self::Candidates, Self::Applications];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Vacancies => "My vacancies",
            Self::Candidates => "Candidate bank",
            Self::Applications => "Applications",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Student(StudentTab),
    Hr(HrTab),
}

impl From<StudentTab> for Tab {
    fn from(tab: StudentTab) -> Self {
        Tab::Student(tab)
    }
}

impl From<HrTab> for Tab {
    fn from(tab: HrTab) -> Self {
        Tab::Hr(tab)
    }
}

/// What is on screen. A tab only exists inside the role it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    Student(StudentTab),
    Hr(HrTab),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Level(u8),
}

impl LevelFilter {
    /// The choices the candidate bank offers, in display order.
    pub const OPTIONS: [LevelFilter; 5] = [
        Self::All,
        Self::Level(2),
        Self::Level(3),
        Self::Level(4),
        Self::Level(5),
    ];

    pub fn matches(&self, level: u8) -> bool {
        match self {
            Self::All => true,
            Self::Level(wanted) => *wanted == level,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Level(level) => write!(f, "{}", level),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<u8>()
            .map(Self::Level)
            .map_err(|_| format!("invalid level filter '{}': expected 'all' or a level number", s))
    }
}

/// UI-local selection: which role, which tab, which level filter.
/// Every transition consumes the current value and returns the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    screen: Screen,
    level_filter: LevelFilter,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn role(&self) -> Option<Role> {
        match self.screen {
            Screen::Landing => None,
            Screen::Student(_) => Some(Role::Student),
            Screen::Hr(_) => Some(Role::Hr),
        }
    }

    pub fn tab(&self) -> Option<Tab> {
        match self.screen {
            Screen::Landing => None,
            Screen::Student(tab) => Some(Tab::Student(tab)),
            Screen::Hr(tab) => Some(Tab::Hr(tab)),
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.level_filter
    }

    pub fn choose_role(self, role: Role) -> Self {
        let screen = match role {
            Role::Student => Screen::Student(StudentTab::ALL[0]),
            Role::Hr => Screen::Hr(HrTab::ALL[0]),
        };
        Self { screen, ..self }
    }

    /// Leaving a dashboard drops its filter along with the role.
    pub fn go_back(self) -> Self {
        Self {
            screen: Screen::Landing,
            level_filter: LevelFilter::All,
        }
    }

    /// Switches tab within the current role. Asking for another role's tab
    /// is a caller bug; the selection is left as it was.
    pub fn select_tab(self, tab: impl Into<Tab>) -> Self {
        let screen = match (self.screen, tab.into()) {
            (Screen::Student(_), Tab::Student(tab)) => Screen::Student(tab),
            (Screen::Hr(_), Tab::Hr(tab)) => Screen::Hr(tab),
            (screen, tab) => {
                debug_assert!(false, "tab {:?} is not valid on {:?}", tab, screen);
                screen
            }
        };
        Self { screen, ..self }
    }

    /// Kept across tab switches until the user goes back; only the
    /// candidate bank reads it.
    pub fn set_level_filter(self, level_filter: LevelFilter) -> Self {
        Self {
            level_filter,
            ..self
        }
    }

    pub fn next_tab(self) -> Self {
        self.step_tab(1)
    }

    pub fn prev_tab(self) -> Self {
        self.step_tab(-1)
    }

    fn step_tab(self, delta: isize) -> Self {
        match self.screen {
            Screen::Landing => self,
            Screen::Student(tab) => self.select_tab(cycle(&StudentTab::ALL, tab, delta)),
            Screen::Hr(tab) => self.select_tab(cycle(&HrTab::ALL, tab, delta)),
        }
    }

    pub fn cycle_level_filter(self) -> Self {
        let next = match self.level_filter {
            LevelFilter::All => LevelFilter::Level(2),
            LevelFilter::Level(level) if level < 5 => LevelFilter::Level(level.max(1) + 1),
            LevelFilter::Level(_) => LevelFilter::All,
        };
        self.set_level_filter(next)
    }
}

fn cycle<T: Copy + PartialEq>(items: &[T], current: T, delta: isize) -> T {
    let len = items.len() as isize;
    let idx = items.iter().position(|t| *t == current).unwrap_or(0) as isize;
    items[(idx + delta).rem_euclid(len) as usize]
}
