//! Explanation payload types

use serde::{Deserialize, Serialize};

/// Complete human-readable explanation for a scored (or vetoed) guild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub overall: OverallExplanation,
    pub risks: Vec<RiskCard>,
    pub benefits: Vec<BenefitCard>,
    pub warnings: Vec<WarningCard>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub products: Vec<ProductSuggestion>,
}

/// Overall verdict: qualitative label, star rating and a one-line call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallExplanation {
    pub label: String,
    /// Star rating, e.g. "★★★★☆".
    pub rating: String,
    pub message: String,
    pub advice: String,
}

/// A risk factor whose display score crossed the notable threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCard {
    pub title: String,
    pub message: String,
    /// Present only for high-risk factors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

/// A benefit factor whose display score crossed the notable threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitCard {
    pub title: String,
    pub message: String,
}

/// Advisory or climate warning passed through to the reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningCard {
    pub message: String,
}

/// Product pointer for a detected vulnerability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub name: String,
    pub urgency: String,
}
