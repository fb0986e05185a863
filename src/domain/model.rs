use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

/// 學期，例如 "Spring 2026"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Term {
    pub year: u16,
    pub season: Season,
}

impl Term {
    pub fn new(season: Season, year: u16) -> Self {
        Self { year, season }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.season, self.year)
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(season), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected '<Season> <Year>', got '{}'", s));
        };

        let season = match season.to_ascii_lowercase().as_str() {
            "spring" => Season::Spring,
            "summer" => Season::Summer,
            "fall" | "autumn" => Season::Fall,
            other => return Err(format!("unknown season '{}'", other)),
        };
        let year = year
            .parse::<u16>()
            .map_err(|e| format!("invalid year '{}': {}", year, e))?;

        Ok(Term::new(season, year))
    }
}

impl TryFrom<String> for Term {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 由課程時間字串解析而來，不會被儲存。時間以午夜起算的分鐘數表示。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSchedule {
    pub days: BTreeSet<Weekday>,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl ParsedSchedule {
    pub fn shares_weekday(&self, other: &ParsedSchedule) -> bool {
        !self.days.is_disjoint(&other.days)
    }

    /// Half-open: a class ending at 11:15 does not clash with one starting at 11:15.
    pub fn intervals_overlap(&self, other: &ParsedSchedule) -> bool {
        self.start_minute < other.end_minute && self.end_minute > other.start_minute
    }

    pub fn conflicts_with(&self, other: &ParsedSchedule) -> bool {
        self.shares_weekday(other) && self.intervals_overlap(other)
    }
}

/// 課程目錄中的唯讀課程資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub professor: String,
    pub schedule: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "availableSpots")]
    pub available_spots: u32,
    #[serde(default, alias = "totalSpots")]
    pub total_spots: u32,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub description: String,
    pub term: Term,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl AsRef<Course> for Course {
    fn as_ref(&self) -> &Course {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCourse {
    #[serde(flatten)]
    pub course: Course,
    #[serde(alias = "pendingAt")]
    pub pending_at: DateTime<Utc>,
}

impl AsRef<Course> for PendingCourse {
    fn as_ref(&self) -> &Course {
        &self.course
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredCourse {
    #[serde(flatten)]
    pub course: Course,
    #[serde(alias = "registeredAt")]
    pub registered_at: DateTime<Utc>,
}

impl AsRef<Course> for RegisteredCourse {
    fn as_ref(&self) -> &Course {
        &self.course
    }
}

/// 已修課程紀錄，包含目前目錄中已不再開設的課程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedCourse {
    pub id: String,
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub professor: String,
}

impl From<&Course> for CompletedCourse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            code: course.code.clone(),
            title: course.title.clone(),
            credits: course.credits,
            professor: course.professor.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub counselor: String,
    /// Course ids, resolved against the catalogue and the history table.
    #[serde(default)]
    pub completed_courses: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreditTotals {
    pub registered: u32,
    pub pending: u32,
    pub combined: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionState {
    NotSelected,
    Pending,
    Registered,
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SelectionState::NotSelected => "not selected",
            SelectionState::Pending => "pending",
            SelectionState::Registered => "registered",
        };
        f.write_str(label)
    }
}

/// Result of `confirm_pending`. A discarded course never surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfirmOutcome {
    Registered,
    Discarded { conflicting_course_id: String },
    NotPending,
}
