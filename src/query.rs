//! Read-only queries over the catalog: search, ranking, recommendations.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{LibraryError, LibraryResult};
use crate::storage::Library;
use crate::types::Book;

/// Typed search input. The substring criteria match case-insensitively;
/// the year range is inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCriterion {
    Author(String),
    Genre(String),
    MinRating(f64),
    YearRange { from: i32, to: i32 },
}

impl SearchCriterion {
    /// Build a criterion from a loosely-typed (field, value) pair, the
    /// shape JSON-driven callers hand over. Unknown fields and malformed
    /// values are rejected here so the search itself only ever sees
    /// validated input.
    pub fn from_args(field: &str, value: &Value) -> LibraryResult<Self> {
        match field {
            "author" => value
                .as_str()
                .map(|s| Self::Author(s.to_string()))
                .ok_or_else(|| LibraryError::InvalidCriterion("author must be a string".into())),
            "genre" => value
                .as_str()
                .map(|s| Self::Genre(s.to_string()))
                .ok_or_else(|| LibraryError::InvalidCriterion("genre must be a string".into())),
            "rating" => value
                .as_f64()
                .map(Self::MinRating)
                .ok_or_else(|| LibraryError::InvalidCriterion("rating must be a number".into())),
            "year" => {
                let from = value.get("from").and_then(Value::as_i64);
                let to = value.get("to").and_then(Value::as_i64);
                match (from, to) {
                    (Some(from), Some(to)) => Ok(Self::YearRange {
                        from: from as i32,
                        to: to as i32,
                    }),
                    _ => Err(LibraryError::InvalidCriterion(
                        "year needs a range like {\"from\": 1900, \"to\": 2000}".into(),
                    )),
                }
            }
            other => {
                warn!("invalid search field \"{}\"", other);
                Err(LibraryError::InvalidField(other.to_string()))
            }
        }
    }

    fn matches(&self, book: &Book) -> bool {
        match self {
            Self::Author(needle) => contains_ignore_case(&book.author, needle),
            Self::Genre(needle) => contains_ignore_case(&book.genre, needle),
            Self::MinRating(threshold) => book.rating >= *threshold,
            Self::YearRange { from, to } => book.year >= *from && book.year <= *to,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn by_rating_desc(a: &Book, b: &Book) -> Ordering {
    b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
}

impl Library {
    /// Filter the catalog by one criterion, preserving catalog order.
    pub fn search_by(&self, criterion: &SearchCriterion) -> Vec<&Book> {
        let results: Vec<&Book> = self
            .books()
            .iter()
            .filter(|book| criterion.matches(book))
            .collect();
        if results.is_empty() {
            info!("no books found for {:?}", criterion);
        }
        results
    }

    /// The `limit` highest-rated books; ties keep catalog order.
    pub fn top_rated(&self, limit: usize) -> LibraryResult<Vec<Book>> {
        self.ranked(limit, by_rating_desc)
    }

    /// The `limit` most-borrowed books; ties keep catalog order.
    pub fn most_popular(&self, limit: usize) -> LibraryResult<Vec<Book>> {
        self.ranked(limit, |a, b| b.borrow_count.cmp(&a.borrow_count))
    }

    fn ranked(
        &self,
        limit: usize,
        compare: impl FnMut(&Book, &Book) -> Ordering,
    ) -> LibraryResult<Vec<Book>> {
        if limit == 0 {
            warn!("invalid limit");
            return Err(LibraryError::InvalidLimit);
        }
        // Stable sort on a copy keeps the catalog itself untouched and
        // leaves tied entries in their original relative order.
        let mut sorted = self.books().to_vec();
        sorted.sort_by(compare);
        sorted.truncate(limit);
        Ok(sorted)
    }

    /// Books in the genres a user has borrowed from, minus everything the
    /// user has ever borrowed, best-rated first. Returns the full
    /// sequence; callers typically show the first five. User lookup is
    /// case-insensitive.
    pub fn recommend(&self, user_name: &str) -> LibraryResult<Vec<&Book>> {
        let user = self.user_ignore_case(user_name).ok_or_else(|| {
            warn!("user not found: {}", user_name);
            LibraryError::UserNotFound(user_name.to_string())
        })?;

        // Every loan record counts, open or closed: once read, a book
        // shapes the profile and is excluded from the results for good.
        let borrowed_ids: HashSet<u32> = user.loans.iter().map(|loan| loan.book_id).collect();
        let genres: HashSet<&str> = self
            .books()
            .iter()
            .filter(|book| borrowed_ids.contains(&book.id))
            .map(|book| book.genre.as_str())
            .collect();

        let mut recommended: Vec<&Book> = self
            .books()
            .iter()
            .filter(|book| {
                genres.contains(book.genre.as_str()) && !borrowed_ids.contains(&book.id)
            })
            .collect();
        recommended.sort_by(|a, b| by_rating_desc(a, b));

        if recommended.is_empty() {
            info!("no new books to recommend for {}", user.name);
        }
        Ok(recommended)
    }
}
