// region:    --- Imports
use super::queries;
use crate::auth::model::User;
use crate::bidding::model::{Bid, Listing};
use crate::database::DatabaseManager;
use crate::listing::model::Comment;
use sqlx::Error as SqlxError;
use sqlx::Row;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 모든 상품 조회
pub async fn get_all_listings(db_manager: &DatabaseManager) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 상품 조회
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<Listing>, SqlxError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

/// 카테고리별 상품 조회
pub async fn get_listings_by_category(
    db_manager: &DatabaseManager,
    category: &str,
) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> 카테고리별 상품 조회: {}", "Query", category);
    let category = category.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_BY_CATEGORY)
                    .bind(category)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 입찰 이력 조회
pub async fn get_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, SqlxError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 최고 입찰가 조회
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<i64>, SqlxError> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let result = sqlx::query(queries::GET_HIGHEST_BID)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                Ok(result.get("highest_bid"))
            })
        })
        .await
}

/// 댓글 조회
pub async fn get_listing_comments(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Comment>, SqlxError> {
    info!("{:<12} --> 댓글 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 관심 목록 조회
pub async fn get_watchlist(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> 관심 목록 조회 사용자: {}", "Query", user_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_WATCHLIST)
                    .bind(user_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 사용자 이름으로 회원 조회
pub async fn get_user_by_username(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Option<User>, SqlxError> {
    info!("{:<12} --> 회원 조회: {}", "Query", username);
    let username = username.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
                    .bind(username)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

// endregion: --- Query Handlers
