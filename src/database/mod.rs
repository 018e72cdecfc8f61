pub mod repository;

#[cfg(test)]
pub mod memory;

pub use repository::*;

use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Cursor, Database, IndexModel};
use serde::de::DeserializeOwned;
use std::error::Error;

use crate::config::Config;
use crate::models::{Auth0Profile, Measurement, Order, OrderStatus, Promotion, User};
use crate::utils::{AppError, AppResult};

const USERS: &str = "userdata";
const ORDERS: &str = "orders";
const PROMOTIONS: &str = "promotions";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    users_db: Database,
    purchases_db: Database,
}

impl MongoDB {
    pub async fn new(config: &Config) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.mongo_uri).await?;

        client_options.app_name = Some("vitalbox-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let users_db = client.database(&config.users_db);
        let purchases_db = client.database(&config.purchases_db);

        let mongodb = Self { users_db, purchases_db };
        mongodb.ping().await?;
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the handlers rely on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique())
            .build();
        match self.users().create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: userdata(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create userdata(email) index: {}", e),
        }

        let auth0_index = IndexModel::builder()
            .keys(doc! { "auth0UserId": 1 })
            .options(IndexOptions::builder().sparse(true).build())
            .build();
        match self.users().create_index(auth0_index).await {
            Ok(_) => log::info!("   ✅ Index created: userdata(auth0UserId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(unique())
            .build();
        match self.promotions().create_index(code_index).await {
            Ok(_) => log::info!("   ✅ Index created: promotions(code) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create promotions(code) index: {}", e),
        }

        let orders_created_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .build();
        match self.orders().create_index(orders_created_index).await {
            Ok(_) => log::info!("   ✅ Index created: orders(createdAt)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let orders_customer_index = IndexModel::builder()
            .keys(doc! { "customerId": 1, "createdAt": -1 })
            .build();
        match self.orders().create_index(orders_customer_index).await {
            Ok(_) => log::info!("   ✅ Index created: orders(customerId, createdAt)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.users_db.collection(USERS)
    }

    fn orders(&self) -> Collection<Order> {
        self.purchases_db.collection(ORDERS)
    }

    fn promotions(&self) -> Collection<Promotion> {
        self.purchases_db.collection(PROMOTIONS)
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.users_db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

/// Drains a cursor, skipping documents that fail to decode
async fn collect<T>(mut cursor: Cursor<T>, what: &str) -> Vec<T>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut items = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(item) => items.push(item),
            Err(e) => log::warn!("⚠️  Skipping malformed {} document: {}", what, e),
        }
    }
    items
}

#[async_trait]
impl UserRepository for MongoDB {
    async fn find_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, user: &User) -> AppResult<ObjectId> {
        let result = self.users().insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict("Email already registered".into())
            } else {
                AppError::from(e)
            }
        })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Inserted user id is not an ObjectId".into()))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let cursor = self.users().find(doc! {}).await?;
        Ok(collect(cursor, "user").await)
    }

    async fn set_admin_note(&self, id: &ObjectId, note: &str) -> AppResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "adminNote": note, "updatedAt": BsonDateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn set_goals(&self, id: &ObjectId, goals: &[String]) -> AppResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "fitnessMetrics.goals": goals.to_vec(), "updatedAt": BsonDateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn record_measurement(&self, id: &ObjectId, measurement: &Measurement) -> AppResult<bool> {
        let entry = &measurement.entry;
        let mut set = doc! {
            "fitnessMetrics.bmi": entry.bmi,
            "fitnessMetrics.height": entry.height,
            "fitnessMetrics.weight": entry.weight,
            "fitnessMetrics.unit": mongodb::bson::to_bson(&entry.unit)?,
            "fitnessMetrics.lastCalculated": mongodb::bson::to_bson(&entry.recorded_at)?,
            "updatedAt": BsonDateTime::now(),
        };
        if let Some(goals) = &measurement.goals {
            set.insert("fitnessMetrics.goals", goals.clone());
        }

        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": set,
                    "$push": { "fitnessMetrics.history": mongodb::bson::to_bson(entry)? },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn set_product_feedback(&self, id: &ObjectId, product_id: &str, liked: bool) -> AppResult<bool> {
        let mut set = Document::new();
        set.insert(format!("productFeedback.{}", product_id), liked);
        set.insert("updatedAt", BsonDateTime::now());

        let result = self
            .users()
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn upsert_auth0_user(&self, profile: &Auth0Profile) -> AppResult<Option<User>> {
        let now = BsonDateTime::now();
        let user = self
            .users()
            .find_one_and_update(
                doc! {
                    "$or": [
                        { "auth0UserId": &profile.auth0_user_id },
                        { "email": &profile.email }
                    ]
                },
                doc! {
                    "$set": {
                        "name": &profile.name,
                        "email": &profile.email,
                        "auth0UserId": &profile.auth0_user_id,
                        "updatedAt": now,
                    },
                    "$setOnInsert": {
                        "createdAt": now,
                        "fitnessMetrics": {},
                    }
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl OrderRepository for MongoDB {
    async fn insert_order(&self, order: &Order) -> AppResult<()> {
        self.orders().insert_one(order).await?;
        Ok(())
    }

    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let cursor = self
            .orders()
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(collect(cursor, "order").await)
    }

    async fn list_orders_for_customer(&self, customer_id: &str) -> AppResult<Vec<Order>> {
        let cursor = self
            .orders()
            .find(doc! { "customerId": customer_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(collect(cursor, "order").await)
    }

    async fn find_order(&self, id: &str) -> AppResult<Option<Order>> {
        Ok(self.orders().find_one(doc! { "id": id }).await?)
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> AppResult<bool> {
        let result = self
            .orders()
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "status": status.to_string(), "updatedAt": BsonDateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl PromotionRepository for MongoDB {
    async fn list_promotions(&self) -> AppResult<Vec<Promotion>> {
        let cursor = self
            .promotions()
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(collect(cursor, "promotion").await)
    }

    async fn find_promotion_by_code(&self, code: &str) -> AppResult<Option<Promotion>> {
        Ok(self.promotions().find_one(doc! { "code": code }).await?)
    }

    async fn insert_promotion(&self, promotion: &Promotion) -> AppResult<()> {
        self.promotions().insert_one(promotion).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict("Promo code already exists".into())
            } else {
                AppError::from(e)
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let config = Config::from_env().expect("MONGO_URI must be set");

        let db = MongoDB::new(&config).await;
        assert!(db.is_ok());
        assert!(db.unwrap().ping().await.is_ok());
    }
}
