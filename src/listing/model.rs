use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 고정 카테고리 목록(정렬 상태 유지)
pub const CATEGORIES: &[&str] = &[
    "Cosmetics",
    "Education",
    "Electronics",
    "Furniture",
    "No category",
    "Other",
    "Sports Equipment",
    "Toys",
    "Transport",
];

// 댓글 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
