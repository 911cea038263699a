use thiserror::Error;

/// Everything that can go wrong inside the library. All variants are
/// non-fatal: the failed operation leaves the store untouched and the
/// caller decides what to do next.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("book {0} not found")]
    BookNotFound(u32),
    #[error("user \"{0}\" not found")]
    UserNotFound(String),
    #[error("book {0} is already borrowed")]
    AlreadyBorrowed(u32),
    #[error("\"{title}\" is not currently borrowed by {user}")]
    NotBorrowedByUser { user: String, title: String },
    #[error("invalid search criterion: {0}")]
    InvalidCriterion(String),
    #[error("invalid search field \"{0}\"")]
    InvalidField(String),
    #[error("limit must be a positive number")]
    InvalidLimit,
    #[error("\"{0}\" is currently borrowed and cannot be removed")]
    BookCurrentlyBorrowed(String),
}

pub type LibraryResult<T> = Result<T, LibraryError>;
