use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상품 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub description: String,
    pub current_bid: i64,
    pub category: String,
    pub image_url: String,
    pub active: bool,
    pub winner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub bid_time: DateTime<Utc>,
}
