use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SignupMonth {
    pub month: String,
    pub year: i32,
    pub signups: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct MembershipMonth {
    pub month: String,
    pub year: i32,
    pub memberships: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionMonth {
    pub month: String,
    pub year: i32,
    pub three_month: u32,
    pub six_month: u32,
    pub yearly: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct AdminAnalytics {
    pub signups: Vec<SignupMonth>,
    pub memberships: Vec<MembershipMonth>,
    pub subscriptions: Vec<SubscriptionMonth>,
}
