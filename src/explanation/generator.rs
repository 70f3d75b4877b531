//! Explanation generator

use crate::explanation::types::*;
use crate::metrics::Metric;
use crate::scorer::ScoreResult;

/// Display score below which a risk metric becomes a notable risk.
const RISK_NOTABLE: f64 = 40.0;
/// Display score below which a risk is high enough to carry a mitigation.
const RISK_HIGH: f64 = 25.0;
/// Display score at which a benefit metric becomes a notable benefit.
const BENEFIT_NOTABLE: f64 = 70.0;

/// Build the explanation for a scored or vetoed guild. Stateless; derives
/// everything from the result payload.
pub fn generate_explanation(result: &ScoreResult) -> Explanation {
    if result.veto {
        return veto_explanation(result);
    }

    let overall_score = result.overall_score.unwrap_or(0.0);
    let overall = overall_explanation(overall_score);

    let mut risks = Vec::new();
    let mut benefits = Vec::new();

    if let Some(metrics) = &result.metrics {
        for (&metric, &score) in metrics {
            if metric.is_risk() && score < RISK_NOTABLE {
                risks.push(risk_card(metric, score));
            } else if !metric.is_risk() && score >= BENEFIT_NOTABLE {
                benefits.push(benefit_card(metric, score));
            }
        }
    }

    let mut warnings: Vec<WarningCard> = result
        .flags
        .values()
        .map(|message| WarningCard {
            message: message.clone(),
        })
        .collect();
    if let Some(climate) = &result.climate {
        warnings.extend(climate.warnings.iter().map(|message| WarningCard {
            message: message.clone(),
        }));
    }

    let products = recommend_products(result);

    Explanation {
        overall,
        risks,
        benefits,
        warnings,
        products,
    }
}

/// Veto explanation: no percentile content, just the reason and what to do.
fn veto_explanation(result: &ScoreResult) -> Explanation {
    let reason = result
        .veto_reason
        .clone()
        .unwrap_or_else(|| "Guild cannot be scored".to_string());
    let detail = result.veto_detail.clone().unwrap_or_default();

    Explanation {
        overall: OverallExplanation {
            label: "Not Plantable".to_string(),
            rating: "☆☆☆☆☆".to_string(),
            message: reason,
            advice: "Choose species that share at least one climate tier".to_string(),
        },
        risks: Vec::new(),
        benefits: Vec::new(),
        warnings: if detail.is_empty() {
            Vec::new()
        } else {
            vec![WarningCard { message: detail }]
        },
        products: Vec::new(),
    }
}

fn overall_explanation(score: f64) -> OverallExplanation {
    let (rating, label, advice) = match score {
        s if s >= 90.0 => (
            "★★★★★",
            "Exceptional",
            "Plant with confidence; this combination reinforces itself",
        ),
        s if s >= 80.0 => (
            "★★★★☆",
            "Excellent",
            "A strong combination; minor tweaks could push it further",
        ),
        s if s >= 70.0 => (
            "★★★☆☆",
            "Good",
            "Solid foundation; review the noted risks before planting",
        ),
        s if s >= 60.0 => (
            "★★☆☆☆",
            "Fair",
            "Workable, but consider swapping the weakest member",
        ),
        s if s >= 50.0 => (
            "★☆☆☆☆",
            "Poor",
            "Several factors work against each other; rethink the lineup",
        ),
        _ => (
            "☆☆☆☆☆",
            "Unsuitable",
            "This combination is unlikely to thrive; start from a different core",
        ),
    };

    OverallExplanation {
        label: label.to_string(),
        rating: rating.to_string(),
        message: format!("Overall guild compatibility: {score:.1}/100"),
        advice: advice.to_string(),
    }
}

fn risk_card(metric: Metric, score: f64) -> RiskCard {
    let message = match metric {
        Metric::PathogenOverlap => format!(
            "Members share pathogenic fungi far more than comparable plantings \
             ({score:.0}/100); one outbreak could spread through the guild"
        ),
        Metric::HerbivoreOverlap => format!(
            "Members attract the same pest species ({score:.0}/100); \
             pest pressure will concentrate instead of diluting"
        ),
        Metric::CsrConflict => format!(
            "Growth strategies clash ({score:.0}/100); \
             aggressive members will crowd out the rest"
        ),
        _ => format!("{} scored {score:.0}/100", metric.display_name()),
    };

    let mitigation = (score < RISK_HIGH).then(|| match metric {
        Metric::PathogenOverlap => {
            "Space plants widely, keep air moving, and watch for early symptoms".to_string()
        }
        Metric::HerbivoreOverlap => {
            "Interplant pest-repelling companions or introduce biological controls".to_string()
        }
        Metric::CsrConflict => {
            "Give competitive members room, or swap one for a gentler grower".to_string()
        }
        _ => "Review this factor before planting".to_string(),
    });

    RiskCard {
        title: metric.display_name().to_string(),
        message,
        mitigation,
    }
}

fn benefit_card(metric: Metric, score: f64) -> BenefitCard {
    let message = match metric {
        Metric::Biocontrol => format!(
            "Members host natural enemies of each other's pests ({score:.0}/100)"
        ),
        Metric::PathogenControl => format!(
            "Antagonistic fungi on some members suppress others' diseases ({score:.0}/100)"
        ),
        Metric::BeneficialFungi => format!(
            "A shared beneficial fungal network links the planting ({score:.0}/100)"
        ),
        Metric::PhyloDiversity => format!(
            "Members are evolutionarily distant, diluting specialist pests ({score:.0}/100)"
        ),
        Metric::Stratification => format!(
            "Heights and growth forms layer into distinct canopy levels ({score:.0}/100)"
        ),
        Metric::PollinatorSharing => format!(
            "Members support a common pollinator community ({score:.0}/100)"
        ),
        _ => format!("{} scored {score:.0}/100", metric.display_name()),
    };

    BenefitCard {
        title: metric.display_name().to_string(),
        message,
    }
}

/// Product pointers for detected vulnerabilities; ordered by urgency.
fn recommend_products(result: &ScoreResult) -> Vec<ProductSuggestion> {
    let Some(metrics) = &result.metrics else {
        return Vec::new();
    };
    let mut products = Vec::new();

    if metrics
        .get(&Metric::PathogenOverlap)
        .is_some_and(|&s| s < RISK_HIGH)
    {
        products.push(ProductSuggestion {
            name: "Trichoderma soil drench".to_string(),
            urgency: "Highly Recommended".to_string(),
        });
    }
    if metrics
        .get(&Metric::HerbivoreOverlap)
        .is_some_and(|&s| s < RISK_HIGH)
    {
        products.push(ProductSuggestion {
            name: "Bacillus thuringiensis spray".to_string(),
            urgency: "Recommended".to_string(),
        });
    }
    if metrics
        .get(&Metric::BeneficialFungi)
        .is_some_and(|&s| s < 30.0)
    {
        products.push(ProductSuggestion {
            name: "Mycorrhizal inoculant".to_string(),
            urgency: "Optional".to_string(),
        });
    }

    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{ClimateSummary, ScoreResult};
    use crate::species::ClimateTier;
    use std::collections::BTreeMap;

    fn scored_result(scores: &[(Metric, f64)]) -> ScoreResult {
        let metrics: BTreeMap<Metric, f64> = Metric::ALL
            .iter()
            .map(|&m| {
                let score = scores
                    .iter()
                    .find(|(metric, _)| *metric == m)
                    .map(|(_, s)| *s)
                    .unwrap_or(50.0);
                (m, score)
            })
            .collect();
        let overall = metrics.values().sum::<f64>() / metrics.len() as f64;

        ScoreResult {
            veto: false,
            veto_reason: None,
            veto_detail: None,
            overall_score: Some(overall),
            metrics: Some(metrics),
            raw_scores: None,
            flags: BTreeMap::new(),
            climate: Some(ClimateSummary {
                tier: ClimateTier::HumidTemperate,
                warnings: Vec::new(),
            }),
        }
    }

    #[test]
    fn veto_short_circuits_without_percentiles() {
        let result = ScoreResult {
            veto: true,
            veto_reason: Some("Incompatible climate tiers".to_string()),
            veto_detail: Some("A and B share no climate tier".to_string()),
            overall_score: None,
            metrics: None,
            raw_scores: None,
            flags: BTreeMap::new(),
            climate: None,
        };

        let explanation = generate_explanation(&result);
        assert_eq!(explanation.overall.label, "Not Plantable");
        assert!(explanation.risks.is_empty());
        assert!(explanation.benefits.is_empty());
        assert!(explanation.products.is_empty());
        assert_eq!(explanation.warnings.len(), 1);
    }

    #[test]
    fn labels_follow_thresholds() {
        for (score, label) in [
            (95.0, "Exceptional"),
            (85.0, "Excellent"),
            (75.0, "Good"),
            (65.0, "Fair"),
            (55.0, "Poor"),
            (30.0, "Unsuitable"),
        ] {
            assert_eq!(overall_explanation(score).label, label);
        }
    }

    #[test]
    fn notable_risk_gets_card_and_high_risk_gets_mitigation() {
        let result = scored_result(&[
            (Metric::PathogenOverlap, 20.0),
            (Metric::HerbivoreOverlap, 35.0),
        ]);
        let explanation = generate_explanation(&result);

        assert_eq!(explanation.risks.len(), 2);
        let pathogen = explanation
            .risks
            .iter()
            .find(|r| r.title == Metric::PathogenOverlap.display_name())
            .unwrap();
        assert!(pathogen.mitigation.is_some());

        let herbivore = explanation
            .risks
            .iter()
            .find(|r| r.title == Metric::HerbivoreOverlap.display_name())
            .unwrap();
        assert!(herbivore.mitigation.is_none());
    }

    #[test]
    fn notable_benefits_get_cards() {
        let result = scored_result(&[
            (Metric::PhyloDiversity, 85.0),
            (Metric::PollinatorSharing, 72.0),
        ]);
        let explanation = generate_explanation(&result);
        assert_eq!(explanation.benefits.len(), 2);
    }

    #[test]
    fn high_pathogen_risk_recommends_a_product() {
        let result = scored_result(&[(Metric::PathogenOverlap, 10.0)]);
        let explanation = generate_explanation(&result);
        assert!(explanation
            .products
            .iter()
            .any(|p| p.name.contains("Trichoderma") && p.urgency == "Highly Recommended"));
    }

    #[test]
    fn mid_scores_produce_quiet_explanation() {
        let result = scored_result(&[]);
        let explanation = generate_explanation(&result);
        assert!(explanation.risks.is_empty());
        assert!(explanation.benefits.is_empty());
        assert!(explanation.products.is_empty());
    }
}
