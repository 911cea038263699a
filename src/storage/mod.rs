pub mod memory;

pub use memory::{Library, LibraryStats};
