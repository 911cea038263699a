//! Derived reports over the loan state: the overdue scan and per-user
//! summaries. Output depends only on stored state plus the injected
//! clock, so a frozen clock makes every report reproducible.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{LibraryError, LibraryResult};
use crate::storage::Library;

/// One overdue loan inside a user's group.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OverdueEntry {
    pub book_id: u32,
    pub title: String,
    pub due_on: NaiveDate,
    pub days_overdue: i64,
}

/// All overdue loans held by one user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OverdueGroup {
    pub user_name: String,
    pub entries: Vec<OverdueEntry>,
}

/// Where an open loan stands relative to today.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LoanStanding {
    Overdue { days: i64 },
    OnTime { due_on: NaiveDate },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryLine {
    pub book_id: u32,
    pub title: String,
    pub standing: LoanStanding,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub user_name: String,
    pub penalty_points: i32,
    pub open_loans: Vec<SummaryLine>,
}

impl Library {
    /// Scan every user's open loans for records strictly past due. Users
    /// with nothing overdue are left out of the result entirely.
    pub fn overdue_report(&self) -> Vec<OverdueGroup> {
        let today = self.today();
        let groups: Vec<OverdueGroup> = self
            .users()
            .iter()
            .filter_map(|user| {
                let entries: Vec<OverdueEntry> = user
                    .open_loans()
                    .filter(|loan| loan.is_overdue(today))
                    .map(|loan| OverdueEntry {
                        book_id: loan.book_id,
                        title: loan.title.clone(),
                        due_on: loan.due_on,
                        days_overdue: loan.days_overdue(today),
                    })
                    .collect();
                if entries.is_empty() {
                    None
                } else {
                    Some(OverdueGroup {
                        user_name: user.name.clone(),
                        entries,
                    })
                }
            })
            .collect();

        if groups.is_empty() {
            info!("no overdue books found");
        } else {
            for group in &groups {
                for entry in &group.entries {
                    warn!(
                        "{}: \"{}\" was due on {} ({} days overdue)",
                        group.user_name, entry.title, entry.due_on, entry.days_overdue
                    );
                }
            }
        }
        groups
    }

    /// One user's open loans, each marked overdue or on time, plus the
    /// penalty balance. Lookup is case-insensitive.
    pub fn user_summary(&self, user_name: &str) -> LibraryResult<UserSummary> {
        let user = self.user_ignore_case(user_name).ok_or_else(|| {
            warn!("user not found: {}", user_name);
            LibraryError::UserNotFound(user_name.to_string())
        })?;

        let today = self.today();
        let open_loans: Vec<SummaryLine> = user
            .open_loans()
            .map(|loan| SummaryLine {
                book_id: loan.book_id,
                title: loan.title.clone(),
                standing: if loan.is_overdue(today) {
                    LoanStanding::Overdue {
                        days: loan.days_overdue(today),
                    }
                } else {
                    LoanStanding::OnTime { due_on: loan.due_on }
                },
            })
            .collect();

        info!(
            "summary for {}: {} open loans, {} penalty points",
            user.name,
            open_loans.len(),
            user.penalty_points
        );
        Ok(UserSummary {
            user_name: user.name.clone(),
            penalty_points: user.penalty_points,
            open_loans,
        })
    }
}
