use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{Measurement, MetricsEntry, Unit};
use crate::utils::{AppError, AppResult};

/// Imperial BMI conversion factor (lb/in² → kg/m²)
const IMPERIAL_FACTOR: f64 = 703.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal Weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Label as it appears in product `bmiCategory` tags
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Guidance shown next to a BMI result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiGuidance {
    pub category: BmiCategory,
    pub health_note: &'static str,
    pub ai_recommendation: &'static str,
    pub health_risks: Vec<&'static str>,
    pub action_items: Vec<&'static str>,
    pub lifestyle_tips: Vec<&'static str>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BmiInput {
    /// cm for metric, inches for imperial
    pub height: f64,
    /// kg for metric, pounds for imperial
    pub weight: f64,
    #[serde(default)]
    pub unit: Unit,
    /// Replaces the stored goals when present
    #[serde(default)]
    pub goals: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
    pub guidance: BmiGuidance,
    pub suggested_goals: Vec<&'static str>,
}

pub fn compute_bmi(height: f64, weight: f64, unit: Unit) -> AppResult<f64> {
    if !height.is_finite() || !weight.is_finite() || height <= 0.0 || weight <= 0.0 {
        return Err(AppError::Validation("Height and weight must be positive numbers".into()));
    }

    let raw = match unit {
        Unit::Metric => {
            let meters = height / 100.0;
            weight / (meters * meters)
        }
        Unit::Imperial => IMPERIAL_FACTOR * weight / (height * height),
    };

    Ok((raw * 10.0).round() / 10.0)
}

pub fn category_for(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn goals_for_bmi(bmi: f64) -> Vec<&'static str> {
    if bmi < 18.5 {
        vec!["weight-gain", "muscle-gain"]
    } else if bmi >= 25.0 {
        vec!["weight-loss", "wellness"]
    } else {
        vec!["general-fitness", "wellness"]
    }
}

pub fn category_data(bmi: f64) -> BmiGuidance {
    let category = category_for(bmi);
    match category {
        BmiCategory::Underweight => BmiGuidance {
            category,
            health_note: "Consider gaining healthy weight",
            ai_recommendation: "Your BMI indicates you're underweight. Focus on nutrient-dense foods and strength training to build healthy muscle mass.",
            health_risks: vec![
                "Weakened immune system",
                "Nutritional deficiencies",
                "Decreased bone density",
            ],
            action_items: vec![
                "Increase caloric intake with nutrient-rich foods",
                "Consider strength training exercises",
                "Consult a nutritionist for a personalized meal plan",
            ],
            lifestyle_tips: vec![
                "Eat 5-6 smaller meals throughout the day",
                "Include protein in every meal",
                "Add healthy fats like nuts and avocados",
            ],
        },
        BmiCategory::NormalWeight => BmiGuidance {
            category,
            health_note: "You're in the healthy range!",
            ai_recommendation: "Excellent! Your BMI is in the healthy range. Maintain this with balanced nutrition and regular exercise.",
            health_risks: vec![
                "Minimal health risks at this BMI",
                "Continue monitoring your health metrics",
            ],
            action_items: vec![
                "Maintain current healthy habits",
                "Stay active with 150+ minutes of exercise weekly",
                "Keep a balanced diet rich in whole foods",
            ],
            lifestyle_tips: vec![
                "Mix cardio and strength training",
                "Stay hydrated with 8+ glasses of water daily",
                "Get 7-9 hours of quality sleep",
            ],
        },
        BmiCategory::Overweight => BmiGuidance {
            category,
            health_note: "Focus on balanced nutrition",
            ai_recommendation: "Your BMI suggests you're in the overweight category. Small lifestyle changes can make a big difference.",
            health_risks: vec![
                "Increased risk of cardiovascular disease",
                "Higher likelihood of type 2 diabetes",
                "Joint stress and mobility issues",
            ],
            action_items: vec![
                "Create a sustainable calorie deficit",
                "Increase physical activity gradually",
                "Focus on whole foods and reduce processed foods",
            ],
            lifestyle_tips: vec![
                "Aim for 30-60 minutes of daily activity",
                "Practice portion control",
                "Track your food intake and progress",
            ],
        },
        BmiCategory::Obese => BmiGuidance {
            category,
            health_note: "Consult a health professional",
            ai_recommendation: "Your BMI indicates obesity. We strongly recommend consulting with a healthcare provider to create a comprehensive health plan.",
            health_risks: vec![
                "Significantly increased cardiovascular risk",
                "Higher risk of type 2 diabetes and metabolic syndrome",
                "Increased likelihood of sleep apnea",
            ],
            action_items: vec![
                "Schedule a consultation with your doctor",
                "Work with a registered dietitian",
                "Start with low-impact exercises like walking",
            ],
            lifestyle_tips: vec![
                "Set small, achievable goals",
                "Build a support system",
                "Focus on gradual, sustainable changes",
            ],
        },
    }
}

pub fn evaluate(input: &BmiInput) -> AppResult<BmiResult> {
    let bmi = compute_bmi(input.height, input.weight, input.unit)?;
    Ok(BmiResult {
        bmi,
        category: category_for(bmi),
        guidance: category_data(bmi),
        suggested_goals: goals_for_bmi(bmi),
    })
}

/// Builds a reading from the input. Goals, when sent, are normalized and replace the stored ones.
pub fn record_metrics(input: &BmiInput) -> AppResult<Measurement> {
    let bmi = compute_bmi(input.height, input.weight, input.unit)?;
    Ok(Measurement {
        entry: MetricsEntry {
            bmi,
            height: input.height,
            weight: input.weight,
            unit: input.unit,
            recorded_at: Utc::now(),
        },
        goals: input.goals.as_deref().map(super::user_service::normalize_goals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(category_for(17.0), BmiCategory::Underweight);
        assert_eq!(category_for(18.4), BmiCategory::Underweight);
        assert_eq!(category_for(18.5), BmiCategory::NormalWeight);
        assert_eq!(category_for(24.9), BmiCategory::NormalWeight);
        assert_eq!(category_for(25.0), BmiCategory::Overweight);
        assert_eq!(category_for(30.0), BmiCategory::Obese);
        assert_eq!(category_for(42.0), BmiCategory::Obese);
    }

    #[test]
    fn test_metric_and_imperial() {
        // 70 kg at 175 cm → 22.857
        assert_eq!(compute_bmi(175.0, 70.0, Unit::Metric).unwrap(), 22.9);
        // 150 lb at 65 in → 24.96
        assert_eq!(compute_bmi(65.0, 150.0, Unit::Imperial).unwrap(), 25.0);
    }

    #[test]
    fn test_rejects_non_positive_input() {
        assert!(compute_bmi(0.0, 70.0, Unit::Metric).is_err());
        assert!(compute_bmi(175.0, -1.0, Unit::Metric).is_err());
        assert!(compute_bmi(f64::NAN, 70.0, Unit::Metric).is_err());
    }

    #[test]
    fn test_goals_for_bmi() {
        assert_eq!(goals_for_bmi(17.0), vec!["weight-gain", "muscle-gain"]);
        assert_eq!(goals_for_bmi(22.0), vec!["general-fitness", "wellness"]);
        assert_eq!(goals_for_bmi(25.0), vec!["weight-loss", "wellness"]);
    }

    #[test]
    fn test_category_serializes_as_product_label() {
        let json = serde_json::to_string(&BmiCategory::NormalWeight).unwrap();
        assert_eq!(json, format!("\"{}\"", BmiCategory::NormalWeight.label()));
    }

    #[test]
    fn test_record_metrics_appends_history_and_keeps_goals() {
        let mut metrics = crate::models::FitnessMetrics {
            goals: vec!["energy".into()],
            ..Default::default()
        };
        let input = BmiInput { height: 180.0, weight: 60.0, unit: Unit::Metric, goals: None };

        record_metrics(&input).unwrap().apply_to(&mut metrics);
        assert_eq!(metrics.bmi, Some(18.5));
        assert_eq!(metrics.goals, vec!["energy".to_string()]);
        assert_eq!(metrics.history.len(), 1);

        let input = BmiInput {
            height: 180.0,
            weight: 55.0,
            unit: Unit::Metric,
            goals: Some(vec![" Weight-Gain ".into()]),
        };
        let reading = record_metrics(&input).unwrap();
        assert_eq!(reading.goals, Some(vec!["weight-gain".to_string()]));
        reading.apply_to(&mut metrics);
        assert_eq!(metrics.bmi, Some(17.0));
        assert_eq!(metrics.goals, vec!["weight-gain".to_string()]);
        assert_eq!(metrics.history.len(), 2);
        assert_eq!(metrics.history[1].bmi, 17.0);
    }
}
