//! Text matching: similarity scoring and the strategy cascade that maps an
//! intent's target text onto a paragraph.

mod options;
mod resolver;
pub mod similarity;

pub use options::{MatchOptions, MatchThresholds, Profile, Strategy};
pub use resolver::{match_text, Resolution, TextResolver};
pub use similarity::similarity;
