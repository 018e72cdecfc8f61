use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::catalog;
use crate::models::Product;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// `weight-gain`, `weight-loss`, `protein`, `performance`, `recovery` or `wellness`
    pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(ProductQuery),
    responses((status = 200, description = "Products in catalog order", body = [Product]))
)]
pub async fn list_products(query: web::Query<ProductQuery>) -> HttpResponse {
    let products: Vec<&Product> = match query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => catalog::by_category(category),
        None => catalog::all().iter().collect(),
    };

    HttpResponse::Ok().json(json!({ "ok": true, "products": products }))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn get_product(path: web::Path<String>) -> AppResult<HttpResponse> {
    let product = catalog::find(&path).ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "product": product })))
}
