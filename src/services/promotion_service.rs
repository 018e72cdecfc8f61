use chrono::{NaiveDate, Utc};
use mongodb::bson::DateTime as BsonDateTime;

use crate::database::PromotionRepository;
use crate::models::{CreatePromotionRequest, DiscountType, Promotion, PromotionResponse, PromotionStatus};
use crate::utils::dates::{format_ymd, parse_ymd, today_utc};
use crate::utils::{AppError, AppResult};

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Status derived from the validity window. Unparseable dates keep the stored status.
pub fn effective_status(promo: &Promotion, today: NaiveDate) -> PromotionStatus {
    match (parse_ymd(&promo.start_date), parse_ymd(&promo.end_date)) {
        (Some(start), Some(end)) => {
            if today > end {
                PromotionStatus::Expired
            } else if today >= start {
                PromotionStatus::Active
            } else {
                PromotionStatus::Scheduled
            }
        }
        _ => promo.status,
    }
}

/// Accepts numbers and numeric strings, like the dashboard form sends
fn discount_value(raw: Option<&serde_json::Value>) -> Option<f64> {
    let value = match raw? {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn invalid() -> AppError {
    AppError::Validation("Invalid promotion data".into())
}

/// Validates a create request into a promotion ready to insert
pub fn build_promotion(request: &CreatePromotionRequest, today: NaiveDate) -> AppResult<Promotion> {
    let name = request.name.as_deref().unwrap_or("").trim().to_string();
    let code = normalize_code(request.code.as_deref().unwrap_or(""));
    let value = discount_value(request.discount_value.as_ref()).ok_or_else(invalid)?;
    let discount_type = request.discount_type.unwrap_or_default();

    if name.is_empty() || code.is_empty() || value <= 0.0 {
        return Err(invalid());
    }
    if discount_type == DiscountType::Percent && value > 100.0 {
        return Err(invalid());
    }

    let date_or_today = |raw: &Option<String>| -> AppResult<String> {
        match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => parse_ymd(s).map(format_ymd).ok_or_else(invalid),
            None => Ok(format_ymd(today)),
        }
    };
    let start_date = date_or_today(&request.start_date)?;
    let end_date = date_or_today(&request.end_date)?;
    if end_date < start_date {
        return Err(invalid());
    }

    let now = BsonDateTime::now();
    Ok(Promotion {
        object_id: None,
        id: format!("promo-{}", Utc::now().timestamp_millis()),
        name,
        code,
        discount_type,
        discount_value: value,
        start_date,
        end_date,
        status: PromotionStatus::Scheduled,
        created_at: Some(now),
        updated_at: Some(now),
    })
}

pub async fn list(promotions: &dyn PromotionRepository) -> AppResult<Vec<PromotionResponse>> {
    let today = today_utc();
    Ok(promotions
        .list_promotions()
        .await?
        .into_iter()
        .map(|p| {
            let status = effective_status(&p, today);
            PromotionResponse::with_status(p, status)
        })
        .collect())
}

pub async fn create(
    promotions: &dyn PromotionRepository,
    request: &CreatePromotionRequest,
) -> AppResult<PromotionResponse> {
    let promotion = build_promotion(request, today_utc())?;

    if promotions.find_promotion_by_code(&promotion.code).await?.is_some() {
        return Err(AppError::Conflict("Promo code already exists".into()));
    }

    promotions.insert_promotion(&promotion).await?;
    log::info!("🏷️  Promotion created: {} ({})", promotion.code, promotion.id);

    let status = promotion.status;
    Ok(PromotionResponse::with_status(promotion, status))
}

/// Looks up a code for checkout. Only promotions inside their window are usable.
pub async fn find_active(
    promotions: &dyn PromotionRepository,
    code: &str,
    today: NaiveDate,
) -> AppResult<Promotion> {
    let code = normalize_code(code);
    let promo = promotions
        .find_promotion_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Promo code not found".into()))?;

    if effective_status(&promo, today) != PromotionStatus::Active {
        return Err(AppError::Validation("Promo code is not active".into()));
    }
    Ok(promo)
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn apply_discount(amount: f64, promo: &Promotion) -> f64 {
    let discounted = match promo.discount_type {
        DiscountType::Percent => amount * (1.0 - promo.discount_value / 100.0),
        DiscountType::Flat => amount - promo.discount_value,
    };
    round_cents(discounted.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        parse_ymd(s).unwrap()
    }

    fn request(body: serde_json::Value) -> CreatePromotionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_build_normalizes_and_defaults() {
        let promo = build_promotion(
            &request(json!({ "name": " Spring Sale ", "code": " spring10 ", "discountValue": "10" })),
            date("2025-04-01"),
        )
        .unwrap();

        assert_eq!(promo.name, "Spring Sale");
        assert_eq!(promo.code, "SPRING10");
        assert_eq!(promo.discount_type, DiscountType::Percent);
        assert_eq!(promo.discount_value, 10.0);
        assert_eq!(promo.start_date, "2025-04-01");
        assert_eq!(promo.end_date, "2025-04-01");
        assert_eq!(promo.status, PromotionStatus::Scheduled);
        assert!(promo.id.starts_with("promo-"));
    }

    #[test]
    fn test_build_rejects_bad_input() {
        let today = date("2025-04-01");
        let bad = [
            json!({ "name": "", "code": "A", "discountValue": 5 }),
            json!({ "name": "A", "code": "  ", "discountValue": 5 }),
            json!({ "name": "A", "code": "A", "discountValue": 0 }),
            json!({ "name": "A", "code": "A", "discountValue": "abc" }),
            json!({ "name": "A", "code": "A" }),
            json!({ "name": "A", "code": "A", "discountValue": 150 }),
            json!({ "name": "A", "code": "A", "discountValue": 5, "startDate": "2025-05-01", "endDate": "2025-04-01" }),
            json!({ "name": "A", "code": "A", "discountValue": 5, "startDate": "May 1st" }),
        ];
        for body in bad {
            let err = build_promotion(&request(body.clone()), today).unwrap_err();
            assert_eq!(err, AppError::Validation("Invalid promotion data".into()), "{}", body);
        }

        let flat = build_promotion(
            &request(json!({ "name": "A", "code": "A", "discountType": "flat", "discountValue": 150 })),
            today,
        );
        assert!(flat.is_ok());
    }

    #[test]
    fn test_effective_status() {
        let promo = build_promotion(
            &request(json!({
                "name": "A", "code": "A", "discountValue": 5,
                "startDate": "2025-04-10", "endDate": "2025-04-20"
            })),
            date("2025-04-01"),
        )
        .unwrap();

        assert_eq!(effective_status(&promo, date("2025-04-09")), PromotionStatus::Scheduled);
        assert_eq!(effective_status(&promo, date("2025-04-10")), PromotionStatus::Active);
        assert_eq!(effective_status(&promo, date("2025-04-20")), PromotionStatus::Active);
        assert_eq!(effective_status(&promo, date("2025-04-21")), PromotionStatus::Expired);
    }

    #[test]
    fn test_apply_discount() {
        let mut promo = build_promotion(
            &request(json!({ "name": "A", "code": "A", "discountValue": 15 })),
            date("2025-04-01"),
        )
        .unwrap();
        assert_eq!(apply_discount(100.0, &promo), 85.0);
        assert_eq!(apply_discount(33.33, &promo), 28.33);

        promo.discount_type = DiscountType::Flat;
        promo.discount_value = 40.0;
        assert_eq!(apply_discount(100.0, &promo), 60.0);
        assert_eq!(apply_discount(25.0, &promo), 0.0);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict_and_not_inserted() {
        let store = MemoryStore::new();
        create(&store, &request(json!({ "name": "Launch", "code": "WELCOME", "discountValue": 10 })))
            .await
            .unwrap();

        let err = create(&store, &request(json!({ "name": "Again", "code": " welcome ", "discountValue": 5 })))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Conflict("Promo code already exists".into()));
        assert_eq!(store.promotion_count(), 1);
    }

    #[tokio::test]
    async fn test_created_promotion_is_stored_scheduled() {
        let store = MemoryStore::new();
        let created = create(&store, &request(json!({ "name": "Today", "code": "TODAY", "discountValue": 5 })))
            .await
            .unwrap();
        assert_eq!(created.status, PromotionStatus::Scheduled);

        let stored = store.find_promotion_by_code("TODAY").await.unwrap().unwrap();
        assert_eq!(stored.status, PromotionStatus::Scheduled);

        // Listing reports the live status for today's window
        let listed = list(&store).await.unwrap();
        assert_eq!(listed[0].status, PromotionStatus::Active);
    }

    #[tokio::test]
    async fn test_find_active() {
        let store = MemoryStore::new();
        create(
            &store,
            &request(json!({
                "name": "Summer", "code": "SUMMER", "discountValue": 10,
                "startDate": "2025-06-01", "endDate": "2025-08-31"
            })),
        )
        .await
        .unwrap();

        assert!(find_active(&store, "summer", date("2025-07-01")).await.is_ok());
        assert!(matches!(
            find_active(&store, "SUMMER", date("2025-09-01")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            find_active(&store, "WINTER", date("2025-07-01")).await,
            Err(AppError::NotFound(_))
        ));
    }
}
