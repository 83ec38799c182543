pub mod split_calculator;

pub use split_calculator::{RoundingMode, Split, SplitCalculator, SplitError};
