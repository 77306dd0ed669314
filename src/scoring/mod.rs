pub mod config;
pub mod engine;
pub mod token;
pub mod validation;

#[cfg(test)]
mod tests_props;

pub use config::*;
pub use engine::{compare_entries, compare_tie_break, race_count, rank, rank_with, RankedEntry};
pub use token::{ScoreToken, StatusCode};
pub use validation::{validate_class, validate_scoring};
