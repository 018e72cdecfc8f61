use crate::models::Product;

lazy_static::lazy_static! {
    static ref PRODUCT_CATALOG: Vec<Product> = build_catalog();
}

/// Every product in catalog order. Ordering matters: ties in scoring keep it.
pub fn all() -> &'static [Product] {
    &PRODUCT_CATALOG
}

pub fn find(id: &str) -> Option<&'static Product> {
    PRODUCT_CATALOG.iter().find(|p| p.id == id)
}

pub fn by_category(category: &str) -> Vec<&'static Product> {
    PRODUCT_CATALOG.iter().filter(|p| p.category == category).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: &str,
    price: f64,
    description: &str,
    benefits: &[&str],
    image: &str,
    ai_recommended: bool,
    bmi_category: &[&str],
    goal_tags: &[&str],
    health_impacts: &[&str],
    ingredients: &[&str],
    popularity: u32,
) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        price,
        description: description.into(),
        benefits: strings(benefits),
        image: image.into(),
        ai_recommended,
        bmi_category: strings(bmi_category),
        goal_tags: strings(goal_tags),
        health_impacts: strings(health_impacts),
        ingredients: strings(ingredients),
        popularity: Some(popularity),
    }
}

fn build_catalog() -> Vec<Product> {
    vec![
        // ─────────────── Weight gain ───────────────
        product(
            "1", "Mass Gainer Pro", "weight-gain", 54.99,
            "High-calorie formula for healthy weight gain and muscle mass",
            &["1250 calories per serving", "50g protein", "Clean carbs"],
            "https://images.unsplash.com/photo-1680265158261-5fd6ba5d9959?w=400",
            true,
            &["Underweight"],
            &["muscle-gain", "weight-gain", "bulking"],
            &["muscle-growth", "calorie-surplus", "energy"],
            &["whey-protein", "maltodextrin", "creatine"],
            95,
        ),
        product(
            "2", "Lean Mass Builder", "weight-gain", 49.99,
            "Premium mass gainer with minimal fat for quality gains",
            &["800 calories", "40g protein", "Complex carbs"],
            "https://images.unsplash.com/photo-1693996045300-521e9d08cabc?w=400",
            false,
            &["Underweight", "Normal Weight"],
            &["muscle-gain", "weight-gain", "lean-bulk"],
            &["lean-muscle", "energy", "recovery"],
            &["whey-isolate", "oats", "mct-oil"],
            88,
        ),
        // ─────────────── Weight loss ───────────────
        product(
            "3", "Fat Burner Elite", "weight-loss", 39.99,
            "Advanced thermogenic formula to support metabolism",
            &["Boosts metabolism", "Increases energy", "Appetite control"],
            "https://images.unsplash.com/photo-1607962837359-5e7e89f86776?w=400",
            true,
            &["Overweight", "Obese"],
            &["weight-loss", "fat-loss", "energy"],
            &["metabolism", "thermogenesis", "appetite-control"],
            &["caffeine", "green-tea", "l-carnitine"],
            92,
        ),
        product(
            "4", "CLA Complex", "weight-loss", 32.99,
            "Conjugated linoleic acid for lean body composition",
            &["Supports fat loss", "Preserves muscle", "Natural ingredients"],
            "https://images.unsplash.com/photo-1608571423902-eed4a5ad8108?w=400",
            false,
            &["Overweight", "Obese"],
            &["weight-loss", "fat-loss", "lean-muscle"],
            &["fat-oxidation", "muscle-preservation"],
            &["cla", "safflower-oil"],
            85,
        ),
        product(
            "5", "Green Tea Extract", "weight-loss", 24.99,
            "Natural antioxidant with metabolism-boosting properties",
            &["Natural fat burning", "Antioxidants", "Energy boost"],
            "https://images.unsplash.com/photo-1556679343-c7306c1976bc?w=400",
            false,
            &["Overweight", "Obese", "Normal Weight"],
            &["weight-loss", "wellness", "energy"],
            &["antioxidants", "metabolism", "focus"],
            &["green-tea", "egcg"],
            90,
        ),
        // ─────────────── Protein ───────────────
        product(
            "6", "Premium Whey Isolate", "protein", 45.99,
            "Ultra-pure whey isolate for maximum protein absorption",
            &["25g protein", "Fast absorption", "Low carb & fat"],
            "https://images.unsplash.com/photo-1593095948071-474c5cc2989d?w=400",
            true,
            &["Normal Weight", "Underweight", "Overweight"],
            &["muscle-gain", "recovery", "general-fitness"],
            &["muscle-growth", "recovery", "protein-synthesis"],
            &["whey-isolate", "bcaa"],
            98,
        ),
        product(
            "7", "Plant Protein Blend", "protein", 42.99,
            "Complete vegan protein from multiple plant sources",
            &["20g plant protein", "Vegan friendly", "Easy digestion"],
            "https://images.unsplash.com/photo-1556679343-c7306c1976bc?w=400",
            false,
            &["Normal Weight", "Overweight"],
            &["muscle-gain", "vegan", "wellness"],
            &["muscle-growth", "digestion", "plant-based"],
            &["pea-protein", "rice-protein", "hemp-protein"],
            87,
        ),
        product(
            "8", "Casein Night Protein", "protein", 47.99,
            "Slow-release protein perfect for overnight recovery",
            &["Slow digestion", "24g protein", "Muscle recovery"],
            "https://images.unsplash.com/photo-1584308666744-24d5c474f2ae?w=400",
            false,
            &["Normal Weight", "Underweight"],
            &["muscle-gain", "recovery", "sleep"],
            &["overnight-recovery", "muscle-preservation", "protein-synthesis"],
            &["micellar-casein", "calcium"],
            84,
        ),
        // ─────────────── Performance ───────────────
        product(
            "9", "Pre-Workout Extreme", "performance", 39.99,
            "Maximum energy and focus for intense training sessions",
            &["Explosive energy", "Mental focus", "Endurance boost"],
            "https://images.unsplash.com/photo-1704650311298-4d6915d34c64?w=400",
            true,
            &[],
            &["performance", "energy", "endurance"],
            &["energy", "focus", "endurance", "blood-flow"],
            &["caffeine", "beta-alanine", "citrulline", "creatine"],
            96,
        ),
        product(
            "10", "Creatine Monohydrate", "performance", 29.99,
            "Pure micronized creatine for strength and power",
            &["Increases strength", "Improves performance", "5g per serving"],
            "https://images.unsplash.com/photo-1724160167780-1aef4db75030?w=400",
            true,
            &["Normal Weight", "Underweight"],
            &["strength", "performance", "muscle-gain"],
            &["strength", "power-output", "muscle-growth"],
            &["creatine-monohydrate"],
            99,
        ),
        product(
            "11", "Beta-Alanine", "performance", 27.99,
            "Delays muscle fatigue for extended training capacity",
            &["Reduces fatigue", "Increases endurance", "Better pumps"],
            "https://images.unsplash.com/photo-1607962837359-5e7e89f86776?w=400",
            false,
            &[],
            &["endurance", "performance", "cardio"],
            &["endurance", "fatigue-reduction", "muscular-endurance"],
            &["beta-alanine"],
            82,
        ),
        // ─────────────── Recovery ───────────────
        product(
            "12", "BCAA Complex", "recovery", 34.99,
            "Essential amino acids for optimal muscle recovery",
            &["Reduces soreness", "Supports recovery", "Hydration blend"],
            "https://images.unsplash.com/photo-1657244358898-d9e110504fd8?w=400",
            true,
            &[],
            &["recovery", "endurance", "muscle-gain"],
            &["recovery", "muscle-preservation", "hydration"],
            &["leucine", "isoleucine", "valine", "electrolytes"],
            91,
        ),
        product(
            "13", "Glutamine Powder", "recovery", 31.99,
            "Supports immune function and muscle recovery",
            &["Immune support", "Muscle recovery", "Gut health"],
            "https://images.unsplash.com/photo-1729701823810-79d8417053a4?w=400",
            false,
            &[],
            &["recovery", "wellness", "immunity"],
            &["immune-support", "recovery", "gut-health"],
            &["l-glutamine"],
            80,
        ),
        product(
            "14", "ZMA Sleep Formula", "recovery", 26.99,
            "Zinc, magnesium, and B6 for better sleep and recovery",
            &["Better sleep", "Hormone support", "Recovery aid"],
            "https://images.unsplash.com/photo-1584308666744-24d5c474f2ae?w=400",
            false,
            &[],
            &["sleep", "recovery", "wellness"],
            &["sleep-quality", "hormone-balance", "recovery"],
            &["zinc", "magnesium", "vitamin-b6"],
            86,
        ),
        // ─────────────── Wellness ───────────────
        product(
            "15", "Multivitamin Elite", "wellness", 24.99,
            "Complete daily nutrition with 25+ vitamins and minerals",
            &["Daily nutrition", "Immune support", "Energy boost"],
            "https://images.unsplash.com/photo-1640958898466-b4dd00872fc8?w=400",
            true,
            &["Normal Weight", "Underweight", "Overweight", "Obese"],
            &["wellness", "immunity", "general-fitness"],
            &["immune-support", "energy", "overall-health"],
            &["vitamins", "minerals", "antioxidants"],
            94,
        ),
        product(
            "16", "Omega-3 Fish Oil", "wellness", 27.99,
            "Ultra-pure omega-3 for heart, brain, and joint health",
            &["Heart health", "Joint support", "Brain function"],
            "https://images.unsplash.com/photo-1576437293196-fc3080b75964?w=400",
            false,
            &["Normal Weight", "Overweight", "Obese"],
            &["wellness", "heart-health", "joint-health"],
            &["cardiovascular", "brain-health", "joint-support", "inflammation"],
            &["epa", "dha", "omega-3"],
            93,
        ),
        product(
            "17", "Vitamin D3 + K2", "wellness", 19.99,
            "Essential vitamins for bone health and immunity",
            &["Bone strength", "Immune health", "Mood support"],
            "https://images.unsplash.com/photo-1587854692152-cbe660dbde88?w=400",
            false,
            &["Normal Weight", "Underweight", "Overweight", "Obese"],
            &["wellness", "immunity", "bone-health"],
            &["bone-health", "immune-support", "mood"],
            &["vitamin-d3", "vitamin-k2"],
            89,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_unique_ids() {
        let ids: HashSet<_> = all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(all().len(), 17);
        assert_eq!(ids.len(), 17);
    }

    #[test]
    fn test_find_and_category() {
        assert_eq!(find("10").unwrap().name, "Creatine Monohydrate");
        assert!(find("99").is_none());

        let weight_loss: Vec<_> = by_category("weight-loss").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(weight_loss, vec!["3", "4", "5"]);
        assert!(by_category("snacks").is_empty());
    }
}
