use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog;
use crate::models::{Product, User};
use crate::services::bmi_service::{self, BmiCategory};
use crate::utils::{AppError, AppResult};

/// BMI assumed when a profile carries goals but no measurement
const FALLBACK_BMI: f64 = 22.0;
const POPULAR_LIMIT: usize = 6;
const RECOMMENDATION_LIMIT: usize = 12;
const MIN_SCORE: f64 = 20.0;

const BMI_MATCH_POINTS: f64 = 40.0;
const GOAL_MATCH_POINTS: f64 = 25.0;
const POPULARITY_WEIGHT: f64 = 0.2;
const LIKED_POINTS: f64 = 15.0;
const DISLIKED_POINTS: f64 = -30.0;
const CONTEXT_POINTS: f64 = 20.0;
const AI_FLAG_POINTS: f64 = 10.0;
const AI_FLAG_THRESHOLD: f64 = 30.0;

/// Inputs of the scorer, extracted from a user document
#[derive(Debug, Clone, Default)]
pub struct ScoringProfile {
    pub bmi: Option<f64>,
    pub goals: Vec<String>,
    pub feedback: HashMap<String, bool>,
}

impl From<&User> for ScoringProfile {
    fn from(user: &User) -> Self {
        ScoringProfile {
            bmi: user.fitness_metrics.bmi,
            goals: user.fitness_metrics.goals.clone(),
            feedback: user.product_feedback.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationTier {
    Primary,
    Secondary,
    Complementary,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Recommendation {
    pub product: Product,
    pub score: f64,
    pub rationale: String,
    pub category: RecommendationTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShoppingContext {
    PostWorkout,
    Morning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Tip,
    Recommendation,
    Warning,
    Achievement,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorReply {
    pub message: String,
    pub products: Vec<Product>,
    pub rationales: Vec<String>,
}

fn tier_for(score: f64) -> RecommendationTier {
    if score > 60.0 {
        RecommendationTier::Primary
    } else if score > 40.0 {
        RecommendationTier::Secondary
    } else {
        RecommendationTier::Complementary
    }
}

fn popular_picks() -> Vec<Recommendation> {
    let mut products: Vec<&Product> = catalog::all().iter().collect();
    products.sort_by(|a, b| b.popularity_or_default().cmp(&a.popularity_or_default()));

    products
        .into_iter()
        .take(POPULAR_LIMIT)
        .map(|product| Recommendation {
            product: product.clone(),
            score: product.popularity_or_default() as f64,
            rationale: "Popular choice among Vital Box users".to_string(),
            category: RecommendationTier::Secondary,
        })
        .collect()
}

fn score_product(
    product: &Product,
    profile: &ScoringProfile,
    bmi: f64,
    bmi_category: BmiCategory,
    context: Option<ShoppingContext>,
) -> (f64, String) {
    let mut score = 0.0;
    let mut rationale = String::new();

    if product.targets_bmi(bmi_category.label()) {
        score += BMI_MATCH_POINTS;
        rationale = format!("Recommended for {} BMI ({})", bmi_category.label(), bmi);
    }

    let matching: Vec<&str> = product
        .goal_tags
        .iter()
        .filter(|tag| profile.goals.contains(tag))
        .map(String::as_str)
        .collect();
    if !matching.is_empty() {
        score += matching.len() as f64 * GOAL_MATCH_POINTS;
        if rationale.is_empty() {
            rationale = format!("Matches your {} goals", matching.join(", "));
        } else {
            rationale.push_str(&format!(" and aligns with your {} goals", matching.join(", ")));
        }
    }

    score += product.popularity_or_default() as f64 * POPULARITY_WEIGHT;

    match profile.feedback.get(&product.id) {
        Some(true) => score += LIKED_POINTS,
        Some(false) => score += DISLIKED_POINTS,
        None => {}
    }

    match context {
        Some(ShoppingContext::PostWorkout) if product.category == "recovery" => {
            score += CONTEXT_POINTS;
            rationale.push_str(" (perfect for post-workout recovery)");
        }
        Some(ShoppingContext::Morning) if product.category == "wellness" => {
            score += CONTEXT_POINTS;
            rationale.push_str(" (great for your morning routine)");
        }
        _ => {}
    }

    if product.ai_recommended && score > AI_FLAG_THRESHOLD {
        score += AI_FLAG_POINTS;
    }

    (score, rationale)
}

/// Ranks the catalog for a profile. Profiles with neither BMI nor goals get the popular picks.
pub fn recommend(profile: &ScoringProfile, context: Option<ShoppingContext>) -> Vec<Recommendation> {
    if profile.bmi.is_none() && profile.goals.is_empty() {
        return popular_picks();
    }

    let bmi = profile.bmi.unwrap_or(FALLBACK_BMI);
    let bmi_category = bmi_service::category_for(bmi);

    let mut recommendations: Vec<Recommendation> = catalog::all()
        .iter()
        .filter_map(|product| {
            let (score, rationale) = score_product(product, profile, bmi, bmi_category, context);
            if score <= MIN_SCORE {
                return None;
            }
            Some(Recommendation {
                product: product.clone(),
                score,
                rationale: if rationale.is_empty() {
                    "Quality supplement for your fitness journey".to_string()
                } else {
                    rationale
                },
                category: tier_for(score),
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations.truncate(RECOMMENDATION_LIMIT);
    recommendations
}

pub fn insights(profile: &ScoringProfile) -> Vec<Insight> {
    let Some(bmi) = profile.bmi else {
        return vec![Insight {
            message: "Calculate your BMI to get personalized supplement recommendations tailored to your body composition.".into(),
            kind: InsightKind::Tip,
            products: None,
        }];
    };

    let first_two = |category: &str| -> Vec<Product> {
        catalog::by_category(category)
            .into_iter()
            .take(2)
            .cloned()
            .collect()
    };

    let mut insights = Vec::new();

    match bmi_service::category_for(bmi) {
        BmiCategory::Underweight => insights.push(Insight {
            message: "Your BMI suggests you could benefit from mass gainers and protein supplements to support healthy weight gain.".into(),
            kind: InsightKind::Recommendation,
            products: Some(first_two("weight-gain")),
        }),
        BmiCategory::Overweight | BmiCategory::Obese => insights.push(Insight {
            message: "Based on your BMI, metabolism-boosting supplements and lean protein can support your wellness journey.".into(),
            kind: InsightKind::Recommendation,
            products: Some(first_two("weight-loss")),
        }),
        BmiCategory::NormalWeight => insights.push(Insight {
            message: "Your BMI is in the healthy range! Maintain it with balanced nutrition and quality supplements.".into(),
            kind: InsightKind::Achievement,
            products: None,
        }),
    }

    if profile.goals.iter().any(|g| g == "muscle-gain") {
        insights.push(Insight {
            message: "For muscle gain, combine protein supplements with creatine and ensure adequate calorie intake.".into(),
            kind: InsightKind::Tip,
            products: None,
        });
    }

    if profile.goals.iter().any(|g| g == "weight-loss") {
        insights.push(Insight {
            message: "Focus on a slight calorie deficit, high protein intake, and thermogenic supplements for best fat loss results.".into(),
            kind: InsightKind::Tip,
            products: None,
        });
    }

    insights.push(Insight {
        message: "Don't forget your daily multivitamin and omega-3 for overall health and recovery support.".into(),
        kind: InsightKind::Tip,
        products: None,
    });

    insights
}

fn reply_from(message: &str, recommendations: Vec<Recommendation>, limit: usize) -> AdvisorReply {
    let picked: Vec<Recommendation> = recommendations.into_iter().take(limit).collect();
    AdvisorReply {
        message: message.to_string(),
        rationales: picked.iter().map(|r| r.rationale.clone()).collect(),
        products: picked.into_iter().map(|r| r.product).collect(),
    }
}

/// Keyword-routed answer for the advisor chat
pub fn advise(profile: &ScoringProfile, message: &str) -> AppResult<AdvisorReply> {
    let query = message.trim().to_lowercase();
    if query.is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }

    let has = |words: &[&str]| words.iter().any(|w| query.contains(w));
    let with_goal = |tags: &[&str]| {
        recommend(profile, None)
            .into_iter()
            .filter(|r| r.product.goal_tags.iter().any(|t| tags.contains(&t.as_str())))
            .collect::<Vec<_>>()
    };

    let reply = if has(&["muscle", "gain", "build"]) {
        reply_from(
            "For muscle building and strength gains, I recommend these supplements based on your profile:",
            with_goal(&["muscle-gain", "strength", "performance"]),
            4,
        )
    } else if has(&["weight loss", "fat", "lose"]) {
        reply_from(
            "For effective weight management, here are my top recommendations:",
            with_goal(&["weight-loss", "fat-loss"]),
            4,
        )
    } else if has(&["energy", "workout", "pre"]) {
        let recs = recommend(profile, None)
            .into_iter()
            .filter(|r| r.product.category == "performance" || r.product.has_goal("energy"))
            .collect();
        reply_from("To boost your energy and workout performance, consider these:", recs, 4)
    } else if has(&["recover", "sore", "rest"]) {
        let recs = recommend(profile, None)
            .into_iter()
            .filter(|r| r.product.category == "recovery" || r.product.has_goal("recovery"))
            .collect();
        reply_from("For optimal recovery and reducing soreness, I suggest:", recs, 4)
    } else if has(&["health", "vitamin", "wellness"]) {
        let recs = recommend(profile, None)
            .into_iter()
            .filter(|r| r.product.category == "wellness")
            .collect();
        reply_from("For overall health and wellness, these are essential:", recs, 4)
    } else if has(&["recommend", "suggest", "what"]) {
        reply_from(
            "Based on your current profile and goals, here are my top recommendations:",
            recommend(profile, None),
            5,
        )
    } else if query.contains("protein") {
        let products: Vec<Product> = catalog::by_category("protein")
            .into_iter()
            .take(4)
            .cloned()
            .collect();
        AdvisorReply {
            message: "Here are the best protein supplements for you:".into(),
            rationales: products
                .iter()
                .map(|_| "High-quality protein source for muscle growth and recovery".to_string())
                .collect(),
            products,
        }
    } else {
        reply_from(
            "I understand you're looking for guidance. Here are some personalized recommendations based on your profile:",
            recommend(profile, None),
            4,
        )
    };

    Ok(reply)
}
