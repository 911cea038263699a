use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single catalog entry. The library runs a single-copy model: one
/// record is one physical book, so at most one loan can be active at a
/// time, and holding the loan dates inside `active_loan` means a book can
/// never be "borrowed" with a missing due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    #[serde(default)]
    pub active_loan: Option<ActiveLoan>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub borrow_count: u32,
}

/// The outstanding loan on a book, if any.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveLoan {
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// Caller-supplied fields for a new catalog entry; the store assigns the
/// identifier and zeroes the bookkeeping fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

impl Book {
    pub fn new(id: u32, title: &str, author: &str, genre: &str, year: i32) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year,
            active_loan: None,
            rating: 0.0,
            borrow_count: 0,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_borrow_count(mut self, count: u32) -> Self {
        self.borrow_count = count;
        self
    }

    pub fn is_borrowed(&self) -> bool {
        self.active_loan.is_some()
    }
}
