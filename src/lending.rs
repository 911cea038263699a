//! Borrow/return lifecycle. Each operation validates everything up front
//! and only then mutates, so a failed call leaves both stores untouched.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{LibraryError, LibraryResult};
use crate::storage::Library;
use crate::types::{ActiveLoan, LoanRecord};

/// Standard loan period, borrow date inclusive.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Points deducted for each late return. No floor on the balance.
pub const LATE_RETURN_PENALTY: i32 = 5;

/// What a successful borrow did.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BorrowReceipt {
    pub book_id: u32,
    pub title: String,
    pub borrowed_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// What a successful return did, including any penalty assessed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReturnReceipt {
    pub book_id: u32,
    pub title: String,
    pub returned_on: NaiveDate,
    pub penalty: Option<PenaltyNotice>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PenaltyNotice {
    pub points_deducted: i32,
    pub balance: i32,
}

impl Library {
    /// Check a book out to a user. The due date lands `LOAN_PERIOD_DAYS`
    /// after today, the book's borrow count goes up by one, and an open
    /// loan record is appended to the user's history.
    ///
    /// Checks run in a fixed order: unknown book, unknown user, already
    /// borrowed. User lookup is exact-match.
    pub fn borrow_book(&mut self, user_name: &str, book_id: u32) -> LibraryResult<BorrowReceipt> {
        let today = self.today();

        let book_index = self.book_position(book_id).ok_or_else(|| {
            warn!("book not found: {}", book_id);
            LibraryError::BookNotFound(book_id)
        })?;
        let user_index = self.user_position(user_name).ok_or_else(|| {
            warn!("invalid user: {}", user_name);
            LibraryError::UserNotFound(user_name.to_string())
        })?;
        if self.books()[book_index].is_borrowed() {
            warn!("book {} is already borrowed", book_id);
            return Err(LibraryError::AlreadyBorrowed(book_id));
        }

        let due_on = today + Duration::days(LOAN_PERIOD_DAYS);
        let book = self.book_at_mut(book_index);
        book.active_loan = Some(ActiveLoan {
            borrowed_on: today,
            due_on,
        });
        book.borrow_count += 1;
        let title = book.title.clone();

        self.user_at_mut(user_index).loans.push(LoanRecord {
            book_id,
            title: title.clone(),
            borrowed_on: today,
            due_on,
            returned_on: None,
        });

        info!("\"{}\" has been borrowed by {}", title, user_name);
        Ok(BorrowReceipt {
            book_id,
            title,
            borrowed_on: today,
            due_on,
        })
    }

    /// Return a borrowed book. The user's open loan record for the book
    /// is closed with today's date and the book becomes available again;
    /// a return past the due date costs `LATE_RETURN_PENALTY` points.
    ///
    /// Only an *open* record satisfies the lookup: returning a book the
    /// user once held but already gave back fails like any other
    /// mismatched return.
    pub fn return_book(&mut self, user_name: &str, book_id: u32) -> LibraryResult<ReturnReceipt> {
        let today = self.today();

        let book_index = self.book_position(book_id).ok_or_else(|| {
            warn!("book not found: {}", book_id);
            LibraryError::BookNotFound(book_id)
        })?;
        let user_index = self.user_position(user_name).ok_or_else(|| {
            warn!("invalid user: {}", user_name);
            LibraryError::UserNotFound(user_name.to_string())
        })?;

        let title = self.books()[book_index].title.clone();
        let loan_index = self.users()[user_index]
            .loans
            .iter()
            .position(|loan| loan.book_id == book_id && loan.is_open())
            .ok_or_else(|| {
                warn!("{} did not borrow \"{}\"", user_name, title);
                LibraryError::NotBorrowedByUser {
                    user: user_name.to_string(),
                    title: title.clone(),
                }
            })?;

        let due_on = self.users()[user_index].loans[loan_index].due_on;
        let penalty = if today > due_on {
            let user = self.user_at_mut(user_index);
            user.penalty_points -= LATE_RETURN_PENALTY;
            let balance = user.penalty_points;
            warn!(
                "{} returned \"{}\" late and lost {} points, current penalty balance: {}",
                user_name, title, LATE_RETURN_PENALTY, balance
            );
            Some(PenaltyNotice {
                points_deducted: LATE_RETURN_PENALTY,
                balance,
            })
        } else {
            None
        };

        self.user_at_mut(user_index).loans[loan_index].returned_on = Some(today);
        self.book_at_mut(book_index).active_loan = None;

        info!("thank you for returning \"{}\"", title);
        Ok(ReturnReceipt {
            book_id,
            title,
            returned_on: today,
            penalty,
        })
    }
}
