use chrono::Datelike;
use std::collections::BTreeMap;

use crate::database::{OrderRepository, UserRepository};
use crate::models::{
    AdminAnalytics, MembershipMonth, Order, OrderStatus, SignupMonth, SubscriptionMonth, SubscriptionPlan, User,
};
use crate::utils::dates::{bson_to_date, month_label, parse_ymd};
use crate::utils::AppResult;

/// (year, month) so the BTreeMap orders buckets chronologically
type MonthKey = (i32, u32);

#[derive(Default)]
struct PlanCounts {
    three_month: u32,
    six_month: u32,
    yearly: u32,
}

fn user_month(user: &User) -> Option<MonthKey> {
    let date = bson_to_date(user.created_at.as_ref()?)?;
    Some((date.year(), date.month()))
}

fn order_month(order: &Order) -> Option<MonthKey> {
    let date = parse_ymd(&order.order_date)?;
    Some((date.year(), date.month()))
}

/// Monthly signups, memberships and plan mix. Records without a usable date are skipped.
pub fn build(users: &[User], orders: &[Order]) -> AdminAnalytics {
    let mut signups: BTreeMap<MonthKey, u32> = BTreeMap::new();
    for key in users.iter().filter_map(user_month) {
        *signups.entry(key).or_default() += 1;
    }

    let mut memberships: BTreeMap<MonthKey, u32> = BTreeMap::new();
    let mut plans: BTreeMap<MonthKey, PlanCounts> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        let Some(key) = order_month(order) else {
            continue;
        };
        *memberships.entry(key).or_default() += 1;

        let counts = plans.entry(key).or_default();
        match order.subscription {
            SubscriptionPlan::ThreeMonth => counts.three_month += 1,
            SubscriptionPlan::SixMonth => counts.six_month += 1,
            SubscriptionPlan::Yearly => counts.yearly += 1,
        }
    }

    AdminAnalytics {
        signups: signups
            .into_iter()
            .map(|((year, month), signups)| SignupMonth {
                month: month_label(month).to_string(),
                year,
                signups,
            })
            .collect(),
        memberships: memberships
            .into_iter()
            .map(|((year, month), memberships)| MembershipMonth {
                month: month_label(month).to_string(),
                year,
                memberships,
            })
            .collect(),
        subscriptions: plans
            .into_iter()
            .map(|((year, month), c)| SubscriptionMonth {
                month: month_label(month).to_string(),
                year,
                three_month: c.three_month,
                six_month: c.six_month,
                yearly: c.yearly,
            })
            .collect(),
    }
}

pub async fn load(users: &dyn UserRepository, orders: &dyn OrderRepository) -> AppResult<AdminAnalytics> {
    let (users, orders) = futures::try_join!(users.list_users(), orders.list_orders())?;
    log::debug!("📈 Building analytics from {} users and {} orders", users.len(), orders.len());
    Ok(build(&users, &orders))
}
