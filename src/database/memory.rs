//! In-process repositories used by the test suites.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::sync::RwLock;

use super::{OrderRepository, PromotionRepository, UserRepository};
use crate::models::{Auth0Profile, FitnessMetrics, Measurement, Order, OrderStatus, Promotion, User};
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    orders: RwLock<Vec<Order>>,
    promotions: RwLock<Vec<Promotion>>,
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("memory store lock poisoned".into())
}

fn newest_first<T>(items: &mut [T], created: impl Fn(&T) -> Option<BsonDateTime>) {
    items.sort_by(|a, b| created(b).cmp(&created(a)));
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn promotion_count(&self) -> usize {
        self.promotions.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn user_count(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }

    fn update_user<F>(&self, id: &ObjectId, apply: F) -> AppResult<bool>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().map_err(poisoned)?;
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                apply(user);
                user.updated_at = Some(BsonDateTime::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> AppResult<ObjectId> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let id = user.id.unwrap_or_else(ObjectId::new);
        let mut stored = user.clone();
        stored.id = Some(id);
        users.push(stored);
        Ok(id)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().map_err(poisoned)?.clone())
    }

    async fn set_admin_note(&self, id: &ObjectId, note: &str) -> AppResult<bool> {
        self.update_user(id, |u| u.admin_note = note.to_string())
    }

    async fn set_goals(&self, id: &ObjectId, goals: &[String]) -> AppResult<bool> {
        self.update_user(id, |u| u.fitness_metrics.goals = goals.to_vec())
    }

    async fn record_measurement(&self, id: &ObjectId, measurement: &Measurement) -> AppResult<bool> {
        self.update_user(id, |u| measurement.apply_to(&mut u.fitness_metrics))
    }

    async fn set_product_feedback(&self, id: &ObjectId, product_id: &str, liked: bool) -> AppResult<bool> {
        self.update_user(id, |u| {
            u.product_feedback.insert(product_id.to_string(), liked);
        })
    }

    async fn upsert_auth0_user(&self, profile: &Auth0Profile) -> AppResult<Option<User>> {
        let mut users = self.users.write().map_err(poisoned)?;
        let now = BsonDateTime::now();

        let existing = users.iter_mut().find(|u| {
            u.auth0_user_id.as_deref() == Some(profile.auth0_user_id.as_str()) || u.email == profile.email
        });

        let user = match existing {
            Some(user) => {
                user.name = profile.name.clone();
                user.email = profile.email.clone();
                user.auth0_user_id = Some(profile.auth0_user_id.clone());
                user.updated_at = Some(now);
                user.clone()
            }
            None => {
                let user = User {
                    id: Some(ObjectId::new()),
                    name: profile.name.clone(),
                    email: profile.email.clone(),
                    password_hash: None,
                    auth0_user_id: Some(profile.auth0_user_id.clone()),
                    role: Default::default(),
                    fitness_metrics: FitnessMetrics::default(),
                    product_feedback: Default::default(),
                    admin_note: String::new(),
                    created_at: Some(now),
                    updated_at: Some(now),
                };
                users.push(user.clone());
                user
            }
        };
        Ok(Some(user))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert_order(&self, order: &Order) -> AppResult<()> {
        self.orders.write().map_err(poisoned)?.push(order.clone());
        Ok(())
    }

    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let mut orders = self.orders.read().map_err(poisoned)?.clone();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders)
    }

    async fn list_orders_for_customer(&self, customer_id: &str) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|o| o.customer_id.as_deref() == Some(customer_id))
            .cloned()
            .collect();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders)
    }

    async fn find_order(&self, id: &str) -> AppResult<Option<Order>> {
        let orders = self.orders.read().map_err(poisoned)?;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> AppResult<bool> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                order.updated_at = Some(BsonDateTime::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PromotionRepository for MemoryStore {
    async fn list_promotions(&self) -> AppResult<Vec<Promotion>> {
        let mut promotions = self.promotions.read().map_err(poisoned)?.clone();
        newest_first(&mut promotions, |p| p.created_at);
        Ok(promotions)
    }

    async fn find_promotion_by_code(&self, code: &str) -> AppResult<Option<Promotion>> {
        let promotions = self.promotions.read().map_err(poisoned)?;
        Ok(promotions.iter().find(|p| p.code == code).cloned())
    }

    async fn insert_promotion(&self, promotion: &Promotion) -> AppResult<()> {
        let mut promotions = self.promotions.write().map_err(poisoned)?;
        if promotions.iter().any(|p| p.code == promotion.code) {
            return Err(AppError::Conflict("Promo code already exists".into()));
        }
        promotions.push(promotion.clone());
        Ok(())
    }
}
