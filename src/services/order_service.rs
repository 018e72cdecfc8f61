use crate::database::OrderRepository;
use crate::models::{OrderResponse, OrderStatus};
use crate::utils::{AppError, AppResult};

/// All orders, newest first
pub async fn list(orders: &dyn OrderRepository) -> AppResult<Vec<OrderResponse>> {
    let orders = orders.list_orders().await?;
    log::debug!("[Orders] Listing {} orders", orders.len());
    Ok(orders.into_iter().map(OrderResponse::from).collect())
}

pub async fn update_status(orders: &dyn OrderRepository, id: &str, next: OrderStatus) -> AppResult<OrderResponse> {
    let mut order = orders
        .find_order(id.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    if order.status == next {
        return Ok(OrderResponse::from(order));
    }
    if !order.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Cannot move order from {} to {}",
            order.status, next
        )));
    }

    if !orders.update_order_status(&order.id, next).await? {
        return Err(AppError::NotFound("Order not found".into()));
    }

    log::info!("[Orders] {} {} → {}", order.id, order.status, next);
    order.status = next;
    Ok(OrderResponse::from(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::{Order, SubscriptionPlan};
    use mongodb::bson::DateTime as BsonDateTime;

    fn order(id: &str, status: OrderStatus, created_millis: i64) -> Order {
        Order {
            object_id: None,
            id: id.into(),
            customer: "Ana".into(),
            customer_id: None,
            subscription: SubscriptionPlan::ThreeMonth,
            status,
            amount: 99.0,
            start_date: None,
            order_date: "2025-01-10".into(),
            promo_code: None,
            items: vec!["1".into()],
            created_at: Some(BsonDateTime::from_millis(created_millis)),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        store.insert_order(&order("old", OrderStatus::Completed, 1_000)).await.unwrap();
        store.insert_order(&order("new", OrderStatus::Pending, 2_000)).await.unwrap();

        let ids: Vec<String> = list(&store).await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let store = MemoryStore::new();
        store.insert_order(&order("o1", OrderStatus::Pending, 1_000)).await.unwrap();

        let updated = update_status(&store, "o1", OrderStatus::Ongoing).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Ongoing);

        let err = update_status(&store, "o1", OrderStatus::Pending).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        update_status(&store, "o1", OrderStatus::Completed).await.unwrap();
        let err = update_status(&store, "o1", OrderStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = store.find_order("o1").await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let store = MemoryStore::new();
        let err = update_status(&store, "missing", OrderStatus::Ongoing).await.unwrap_err();
        assert_eq!(err, AppError::NotFound("Order not found".into()));
    }
}
