pub mod book;
pub mod user;

pub use book::{ActiveLoan, Book, NewBook};
pub use user::{LoanRecord, User};
