use mongodb::bson::oid::ObjectId;

use crate::catalog;
use crate::database::UserRepository;
use crate::models::{AdminUserView, User};
use crate::services::bmi_service::{self, BmiInput};
use crate::utils::{AppError, AppResult};

/// Trims, lower-cases and de-duplicates goal tags, keeping first-seen order
pub fn normalize_goals(goals: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for goal in goals {
        let tag = goal.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

pub fn parse_user_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id.trim()).map_err(|_| AppError::Validation("Invalid user id".into()))
}

pub async fn get_user(users: &dyn UserRepository, id: &ObjectId) -> AppResult<User> {
    users
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn update_goals(users: &dyn UserRepository, id: &ObjectId, goals: &[String]) -> AppResult<Vec<String>> {
    let goals = normalize_goals(goals);
    if !users.set_goals(id, &goals).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(goals)
}

/// Stores a BMI measurement on the user and returns the updated user
pub async fn record_fitness_metrics(users: &dyn UserRepository, id: &ObjectId, input: &BmiInput) -> AppResult<User> {
    let measurement = bmi_service::record_metrics(input)?;
    if !users.record_measurement(id, &measurement).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    get_user(users, id).await
}

pub async fn record_feedback(
    users: &dyn UserRepository,
    id: &ObjectId,
    product_id: &str,
    liked: bool,
) -> AppResult<()> {
    let product = catalog::find(product_id.trim())
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    if !users.set_product_feedback(id, &product.id, liked).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(())
}

pub async fn list_for_admin(users: &dyn UserRepository) -> AppResult<Vec<AdminUserView>> {
    Ok(users
        .list_users()
        .await?
        .into_iter()
        .map(AdminUserView::from)
        .collect())
}

pub async fn set_admin_note(users: &dyn UserRepository, id: &str, note: Option<&str>) -> AppResult<()> {
    let object_id = parse_user_id(id)?;
    let note = note.unwrap_or("").trim();

    if !users.set_admin_note(&object_id, note).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(())
}
