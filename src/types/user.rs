use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered borrower. The name doubles as the lookup key, so seeded
/// data must keep names unique. Penalty points go down on late returns
/// and have no floor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub penalty_points: i32,
    #[serde(default)]
    pub loans: Vec<LoanRecord>,
}

/// One borrowing event in a user's history. Closed records (return date
/// set) are kept forever; only open ones count as "currently borrowed".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanRecord {
    pub book_id: u32,
    pub title: String,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
}

impl User {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            penalty_points: 0,
            loans: Vec::new(),
        }
    }

    pub fn with_penalty_points(mut self, points: i32) -> Self {
        self.penalty_points = points;
        self
    }

    /// Loan records that have not been returned yet.
    pub fn open_loans(&self) -> impl Iterator<Item = &LoanRecord> {
        self.loans.iter().filter(|loan| loan.is_open())
    }
}

impl LoanRecord {
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_on < today
    }

    /// Whole days past the due date; zero or negative means not yet late.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.due_on).num_days()
    }
}
