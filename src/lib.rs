pub mod clock;
pub mod error;
pub mod lending;
pub mod query;
pub mod reports;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LibraryError, LibraryResult};
pub use lending::{BorrowReceipt, PenaltyNotice, ReturnReceipt, LATE_RETURN_PENALTY, LOAN_PERIOD_DAYS};
pub use query::SearchCriterion;
pub use reports::{LoanStanding, OverdueEntry, OverdueGroup, SummaryLine, UserSummary};
pub use storage::{Library, LibraryStats};
pub use types::{ActiveLoan, Book, LoanRecord, NewBook, User};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
