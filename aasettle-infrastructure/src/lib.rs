#![warn(clippy::uninlined_format_args)]

pub mod parser;
pub mod store;
pub mod system;

pub use parser::AaCommandParser;
pub use store::JsonFileStore;
pub use system::{SystemClock, UuidBillIdGenerator};
