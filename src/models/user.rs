use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One BMI calculation kept in the user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEntry {
    pub bmi: f64,
    pub height: f64,
    pub weight: f64,
    pub unit: Unit,
    pub recorded_at: DateTime<Utc>,
}

/// A new BMI reading, plus the goals it replaces when the caller sent any
#[derive(Debug, Clone)]
pub struct Measurement {
    pub entry: MetricsEntry,
    pub goals: Option<Vec<String>>,
}

impl Measurement {
    /// Mirrors the field-level update the user store performs
    pub fn apply_to(&self, metrics: &mut FitnessMetrics) {
        metrics.bmi = Some(self.entry.bmi);
        metrics.height = Some(self.entry.height);
        metrics.weight = Some(self.entry.weight);
        metrics.unit = Some(self.entry.unit);
        metrics.last_calculated = Some(self.entry.recorded_at);
        if let Some(goals) = &self.goals {
            metrics.goals = goals.clone();
        }
        metrics.history.push(self.entry.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FitnessMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_calculated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<MetricsEntry>,
}

/// User document (`Users.userdata`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub email: String,
    /// None for Auth0 users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth0_user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default)]
    pub fitness_metrics: FitnessMetrics,
    #[serde(default)]
    pub product_feedback: HashMap<String, bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_note: String,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    pub fn new_local(name: String, email: String, password_hash: String) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            name,
            email,
            password_hash: Some(password_hash),
            auth0_user_id: None,
            role: Role::User,
            fitness_metrics: FitnessMetrics::default(),
            product_feedback: HashMap::new(),
            admin_note: String::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Public user shape returned by the auth endpoints
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub fitness_metrics: FitnessMetrics,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            fitness_metrics: user.fitness_metrics.clone(),
        }
    }
}

/// Row of the admin user table
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub fitness_metrics: FitnessMetrics,
    pub admin_note: String,
}

impl From<User> for AdminUserView {
    fn from(user: User) -> Self {
        AdminUserView {
            id: user.id_hex(),
            name: user.name,
            email: user.email,
            role: user.role,
            fitness_metrics: user.fitness_metrics,
            admin_note: user.admin_note,
        }
    }
}

/// Identity fields written when an Auth0 login is synced
#[derive(Debug, Clone)]
pub struct Auth0Profile {
    pub auth0_user_id: String,
    pub email: String,
    pub name: String,
}
