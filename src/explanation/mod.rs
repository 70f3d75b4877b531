//! Human-readable explanations
//!
//! Stateless formatter from a `ScoreResult` to structured prose: an overall
//! verdict, notable risk and benefit cards, pass-through warnings and, for
//! high-risk factors, product suggestions. A vetoed result short-circuits to
//! a veto explanation with no percentile content.

mod generator;
mod types;

pub use generator::generate_explanation;
pub use types::{
    BenefitCard, Explanation, OverallExplanation, ProductSuggestion, RiskCard, WarningCard,
};
