use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{LibraryError, LibraryResult};
use crate::types::{Book, NewBook, User};

/// Snapshot of store-level counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LibraryStats {
    pub total_books: usize,
    pub total_users: usize,
    pub borrowed_books: usize,
    pub open_loans: usize,
}

/// The in-memory store: the book catalog, the borrower registry, and the
/// id counter for new catalog entries. Every operation in the crate is a
/// method on this type, so each caller owns its own isolated instance.
///
/// Identifiers come from a monotonic counter rather than the catalog
/// length; removing a book never frees its id for reuse.
#[derive(Clone)]
pub struct Library {
    books: Vec<Book>,
    users: Vec<User>,
    next_book_id: u32,
    clock: Arc<dyn Clock>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            users: Vec::new(),
            next_book_id: 1,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the date source. Operations that touch due dates or
    /// overdue math read "today" from here.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the catalog with a pre-loaded collection. The id counter
    /// resumes above the highest seeded id.
    pub fn load_books(&mut self, books: Vec<Book>) {
        self.next_book_id = books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        self.books = books;
        info!("loaded {} books into the catalog", self.books.len());
    }

    /// Replace the borrower registry with a pre-loaded collection.
    pub fn load_users(&mut self, users: Vec<User>) {
        self.users = users;
        info!("loaded {} users", self.users.len());
    }

    /// Add a book to the catalog and return the stored record.
    pub fn add_book(&mut self, fields: NewBook) -> &Book {
        let book = Book::new(
            self.next_book_id,
            &fields.title,
            &fields.author,
            &fields.genre,
            fields.year,
        );
        self.next_book_id += 1;
        info!("book added: \"{}\" (id {})", book.title, book.id);
        self.books.push(book);
        self.books.last().expect("book was just pushed")
    }

    /// Remove a book from the catalog, preserving the order of the rest.
    /// A book that is out on loan stays put.
    pub fn remove_book(&mut self, id: u32) -> LibraryResult<Book> {
        let index = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(LibraryError::BookNotFound(id))?;
        if self.books[index].is_borrowed() {
            let title = self.books[index].title.clone();
            warn!("cannot delete \"{}\": the book is currently borrowed", title);
            return Err(LibraryError::BookCurrentlyBorrowed(title));
        }
        let book = self.books.remove(index);
        info!("book \"{}\" has been deleted from the library", book.title);
        Ok(book)
    }

    pub fn book(&self, id: u32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Exact-name lookup.
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Case-insensitive name lookup, used by the reporting side.
    pub fn user_ignore_case(&self, name: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.name.eq_ignore_ascii_case(name))
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            total_books: self.books.len(),
            total_users: self.users.len(),
            borrowed_books: self.books.iter().filter(|b| b.is_borrowed()).count(),
            open_loans: self.users.iter().map(|u| u.open_loans().count()).sum(),
        }
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn book_position(&self, id: u32) -> Option<usize> {
        self.books.iter().position(|b| b.id == id)
    }

    pub(crate) fn user_position(&self, name: &str) -> Option<usize> {
        self.users.iter().position(|u| u.name == name)
    }

    pub(crate) fn book_at_mut(&mut self, index: usize) -> &mut Book {
        &mut self.books[index]
    }

    pub(crate) fn user_at_mut(&mut self, index: usize) -> &mut User {
        &mut self.users[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActiveLoan;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            genre: "Fiction".to_string(),
            year: 2000,
        }
    }

    #[test]
    fn add_book_assigns_sequential_ids() {
        let mut library = Library::new();
        assert_eq!(library.add_book(new_book("First")).id, 1);
        assert_eq!(library.add_book(new_book("Second")).id, 2);
        assert_eq!(library.book_count(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut library = Library::new();
        library.add_book(new_book("First"));
        let second = library.add_book(new_book("Second")).id;
        library.remove_book(second).unwrap();
        let third = library.add_book(new_book("Third")).id;
        assert_eq!(third, 3);
        assert!(library.book(second).is_none());
    }

    #[test]
    fn load_books_resumes_counter_above_seeded_ids() {
        let mut library = Library::new();
        library.load_books(vec![
            Book::new(3, "C", "x", "g", 1990),
            Book::new(9, "I", "x", "g", 1991),
        ]);
        assert_eq!(library.add_book(new_book("Next")).id, 10);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut library = Library::new();
        for title in ["A", "B", "C", "D"] {
            library.add_book(new_book(title));
        }
        library.remove_book(2).unwrap();
        let titles: Vec<_> = library.books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["A", "C", "D"]);
    }

    #[test]
    fn remove_missing_book_fails() {
        let mut library = Library::new();
        assert_eq!(library.remove_book(42), Err(LibraryError::BookNotFound(42)));
    }

    #[test]
    fn remove_borrowed_book_fails_and_keeps_catalog() {
        let mut library = Library::new();
        let mut book = Book::new(1, "Held", "x", "g", 2001);
        book.active_loan = Some(ActiveLoan {
            borrowed_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        });
        library.load_books(vec![book]);

        let result = library.remove_book(1);
        assert_eq!(
            result,
            Err(LibraryError::BookCurrentlyBorrowed("Held".to_string()))
        );
        assert_eq!(library.book_count(), 1);
    }

    #[test]
    fn user_lookup_is_exact_unless_asked_otherwise() {
        let mut library = Library::new();
        library.load_users(vec![User::new("Ana")]);
        assert!(library.user("ana").is_none());
        assert!(library.user_ignore_case("ANA").is_some());
    }

    #[test]
    fn stats_count_borrowed_and_open_loans() {
        let mut library = Library::new();
        let mut book = Book::new(1, "Out", "x", "g", 2001);
        book.active_loan = Some(ActiveLoan {
            borrowed_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        });
        library.load_books(vec![book, Book::new(2, "In", "x", "g", 2002)]);
        let mut ana = User::new("Ana");
        ana.loans.push(crate::types::LoanRecord {
            book_id: 1,
            title: "Out".to_string(),
            borrowed_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            returned_on: None,
        });
        library.load_users(vec![ana]);

        let stats = library.stats();
        assert_eq!(stats.total_books, 2);
        assert_eq!(stats.borrowed_books, 1);
        assert_eq!(stats.open_loans, 1);
    }
}
