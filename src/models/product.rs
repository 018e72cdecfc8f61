use serde::Serialize;

/// Popularity assumed for products that do not carry one
pub const DEFAULT_POPULARITY: u32 = 50;

/// Catalog product. Hardcoded, never persisted.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub benefits: Vec<String>,
    pub image: String,
    pub ai_recommended: bool,
    /// BMI category labels this product targets (empty = no BMI targeting)
    pub bmi_category: Vec<String>,
    pub goal_tags: Vec<String>,
    pub health_impacts: Vec<String>,
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

impl Product {
    pub fn popularity_or_default(&self) -> u32 {
        self.popularity.unwrap_or(DEFAULT_POPULARITY)
    }

    pub fn has_goal(&self, tag: &str) -> bool {
        self.goal_tags.iter().any(|t| t == tag)
    }

    pub fn targets_bmi(&self, category: &str) -> bool {
        self.bmi_category.iter().any(|c| c == category)
    }
}
