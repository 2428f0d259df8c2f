/// 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 관심 목록 토글
/// 3. 댓글 작성
// region:    --- Imports
use crate::bidding::model::Listing;
use crate::database::DatabaseManager;
use crate::listing::model::Comment;
use crate::listing::validation;
use crate::query;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Commands
/// 상품 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub starting_bid: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
}

/// 관심 목록 토글 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToggleWatchlistCommand {
    pub listing_id: i64,
}

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub listing_id: i64,
    pub body: String,
}

/// 1. 상품 등록
/// 시작 가격이 곧 최초의 현재 가격이 된다.
pub async fn handle_create_listing(
    cmd: CreateListingCommand,
    seller_id: i64,
    db_manager: &DatabaseManager,
) -> Result<Listing, serde_json::Value> {
    info!(
        "{:<12} --> 상품 등록 요청 처리 시작: {:?}, 판매자: {}",
        "Command", cmd, seller_id
    );

    // 입력값 검증
    validate_listing_input(&cmd)?;

    let listing = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(
                    "INSERT INTO listings (seller_id, title, description, current_bid, category, image_url)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING id, seller_id, title, description, current_bid, category, image_url,
                               active, winner_id, created_at",
                )
                .bind(seller_id)
                .bind(&cmd.title)
                .bind(&cmd.description)
                .bind(cmd.starting_bid)
                .bind(&cmd.category)
                .bind(&cmd.image_url)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await
        .map_err(db_error)?;

    info!("{:<12} --> 상품 등록 성공: id {}", "Command", listing.id);
    Ok(listing)
}

/// 2. 관심 목록 토글
/// 등록되어 있으면 제거, 없으면 추가한다. 반환값은 토글 후 등록 여부.
pub async fn handle_toggle_watchlist(
    cmd: ToggleWatchlistCommand,
    user_id: i64,
    db_manager: &DatabaseManager,
) -> Result<bool, serde_json::Value> {
    info!(
        "{:<12} --> 관심 목록 토글 요청: 상품 {}, 사용자 {}",
        "Command", cmd.listing_id, user_id
    );

    ensure_listing_exists(db_manager, cmd.listing_id).await?;

    let listing_id = cmd.listing_id;
    let watched = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let removed = sqlx::query(
                    "DELETE FROM watchlist_entries WHERE user_id = $1 AND listing_id = $2",
                )
                .bind(user_id)
                .bind(listing_id)
                .execute(&mut **tx)
                .await?
                .rows_affected();

                if removed > 0 {
                    return Ok(false);
                }

                sqlx::query(
                    "INSERT INTO watchlist_entries (user_id, listing_id)
                     VALUES ($1, $2)
                     ON CONFLICT (user_id, listing_id) DO NOTHING",
                )
                .bind(user_id)
                .bind(listing_id)
                .execute(&mut **tx)
                .await?;

                Ok(true)
            })
        })
        .await
        .map_err(db_error)?;

    info!(
        "{:<12} --> 관심 목록 토글 완료: 상품 {}, 등록 여부 {}",
        "Command", cmd.listing_id, watched
    );
    Ok(watched)
}

/// 3. 댓글 작성
pub async fn handle_add_comment(
    cmd: AddCommentCommand,
    author_id: i64,
    db_manager: &DatabaseManager,
) -> Result<Comment, serde_json::Value> {
    info!(
        "{:<12} --> 댓글 작성 요청: 상품 {}, 작성자 {}",
        "Command", cmd.listing_id, author_id
    );

    // 입력값 검증
    if let Err(message) = validation::validate_comment_body(&cmd.body) {
        return Err(invalid_input(message));
    }

    ensure_listing_exists(db_manager, cmd.listing_id).await?;

    let comment = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Comment>(
                    "INSERT INTO comments (listing_id, author_id, body)
                     VALUES ($1, $2, $3)
                     RETURNING id, listing_id, author_id, body, created_at",
                )
                .bind(cmd.listing_id)
                .bind(author_id)
                .bind(&cmd.body)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await
        .map_err(db_error)?;

    info!("{:<12} --> 댓글 작성 성공: id {}", "Command", comment.id);
    Ok(comment)
}

/// 상품 등록 입력값 검증
fn validate_listing_input(cmd: &CreateListingCommand) -> Result<(), serde_json::Value> {
    validation::validate_title(&cmd.title)
        .and_then(|_| validation::validate_description(&cmd.description))
        .and_then(|_| validation::validate_starting_bid(cmd.starting_bid))
        .and_then(|_| validation::validate_category(&cmd.category))
        .and_then(|_| validation::validate_image_url(&cmd.image_url))
        .map_err(invalid_input)
}

/// 상품 존재 여부 확인
async fn ensure_listing_exists(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<(), serde_json::Value> {
    match query::handlers::get_listing(db_manager, listing_id)
        .await
        .map_err(db_error)?
    {
        Some(_) => Ok(()),
        None => Err(serde_json::json!({
            "error": "상품을 찾을 수 없습니다.",
            "code": "NOT_FOUND"
        })),
    }
}

/// 입력값 오류 변환
fn invalid_input(message: String) -> serde_json::Value {
    serde_json::json!({
        "error": message,
        "code": "INVALID_INPUT"
    })
}

/// 데이터베이스 오류 변환
fn db_error(e: sqlx::Error) -> serde_json::Value {
    error!("{:<12} --> 데이터베이스 오류: {:?}", "Command", e);
    serde_json::json!({
        "error": "데이터베이스 오류가 발생했습니다.",
        "code": "DB_ERROR"
    })
}
// endregion: --- Commands
