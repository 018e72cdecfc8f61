use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::services::bmi_service::{self, BmiInput, BmiResult};
use crate::utils::AppResult;

pub(crate) fn bmi_body(result: &BmiResult) -> serde_json::Value {
    json!({
        "ok": true,
        "bmi": result.bmi,
        "category": result.category,
        "guidance": result.guidance,
        "suggestedGoals": result.suggested_goals,
    })
}

#[utoipa::path(
    post,
    path = "/api/bmi/calculate",
    tag = "BMI",
    request_body = BmiInput,
    responses(
        (status = 200, description = "BMI with category guidance and suggested goals"),
        (status = 400, description = "Height or weight not positive")
    )
)]
pub async fn calculate(input: web::Json<BmiInput>) -> AppResult<HttpResponse> {
    let result = bmi_service::evaluate(&input)?;
    log::debug!("⚖️  BMI calculated: {} ({})", result.bmi, result.category.label());
    Ok(HttpResponse::Ok().json(bmi_body(&result)))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{body_json, context, test_app};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_calculate() {
        let ctx = context();
        let app = test_app!(ctx.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/bmi/calculate")
            .set_json(json!({ "height": 170, "weight": 49 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["bmi"], 17.0);
        assert_eq!(body["category"], "Underweight");
        assert_eq!(body["suggestedGoals"], json!(["weight-gain", "muscle-gain"]));
        assert!(body["guidance"]["actionItems"].as_array().unwrap().len() >= 3);
    }

    #[actix_rt::test]
    async fn test_rejects_zero_height() {
        let ctx = context();
        let app = test_app!(ctx.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/bmi/calculate")
            .set_json(json!({ "height": 0, "weight": 70, "unit": "imperial" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
