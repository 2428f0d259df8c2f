// region:    --- Imports
use crate::auth::commands::{
    handle_login as command_handle_login, handle_register as command_handle_register, LoginCommand,
    RegisterCommand,
};
use crate::auth::token::CurrentUser;
use crate::bidding::commands::{
    handle_close_listing as command_handle_close_listing,
    handle_place_bid as command_handle_place_bid, CloseListingCommand, PlaceBidCommand,
};
use crate::database::DatabaseManager;
use crate::listing::commands::{
    handle_add_comment as command_handle_add_comment,
    handle_create_listing as command_handle_create_listing,
    handle_toggle_watchlist as command_handle_toggle_watchlist, AddCommentCommand,
    CreateListingCommand, ToggleWatchlistCommand,
};
use crate::listing::model::CATEGORIES;
use crate::query;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Error Mapping

/// 오류 코드에 따라 HTTP 상태를 결정
fn error_response(err: serde_json::Value) -> Response {
    let status = match err["code"].as_str() {
        Some("INVALID_CREDENTIALS") | Some("UNAUTHORIZED") => StatusCode::UNAUTHORIZED,
        Some("NOT_OWNER") => StatusCode::FORBIDDEN,
        Some("NOT_FOUND") => StatusCode::NOT_FOUND,
        Some("DUPLICATE_USERNAME") => StatusCode::CONFLICT,
        Some("DB_ERROR") | Some("INTERNAL_ERROR") => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(err)).into_response()
}

// endregion: --- Error Mapping

// region:    --- Account Handlers

/// 회원가입 요청 처리
pub async fn handle_register(
    State(db_manager): State<Arc<DatabaseManager>>,
    Json(cmd): Json<RegisterCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 회원가입 요청: {}", "Auth", cmd.username);

    match command_handle_register(cmd, &db_manager).await {
        Ok(auth) => (StatusCode::CREATED, Json(serde_json::json!(auth))).into_response(),
        Err(e) => error_response(e),
    }
}

/// 로그인 요청 처리
pub async fn handle_login(
    State(db_manager): State<Arc<DatabaseManager>>,
    Json(cmd): Json<LoginCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 로그인 요청: {}", "Auth", cmd.username);

    match command_handle_login(cmd, &db_manager).await {
        Ok(auth) => Json(serde_json::json!(auth)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 로그아웃 요청 처리
/// 토큰 방식이라 서버에 세션 상태가 없다. 클라이언트가 토큰을 버리면 된다.
pub async fn handle_logout() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "로그아웃 되었습니다."
    }))
}

// endregion: --- Account Handlers

// region:    --- Command Handlers

/// 상품 등록 요청 처리
pub async fn handle_create_listing(
    State(db_manager): State<Arc<DatabaseManager>>,
    user: CurrentUser,
    Json(cmd): Json<CreateListingCommand>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 상품 등록 요청: {}, 판매자: {}",
        "Command", cmd.title, user.username
    );

    match command_handle_create_listing(cmd, user.user_id, &db_manager).await {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(db_manager): State<Arc<DatabaseManager>>,
    user: CurrentUser,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let bid_amount = cmd.amount;
    match command_handle_place_bid(cmd, user.user_id, &db_manager).await {
        Ok(current_bid) => Json(serde_json::json!({
            "message": "입찰이 성공적으로 처리되었습니다.",
            "current_bid": current_bid,
            "bid_amount": bid_amount
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// 경매 종료 요청 처리
pub async fn handle_close(
    State(db_manager): State<Arc<DatabaseManager>>,
    user: CurrentUser,
    Json(cmd): Json<CloseListingCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 종료 요청 처리 시작: {:?}", "Command", cmd);

    match command_handle_close_listing(cmd, user.user_id, &db_manager).await {
        Ok(winner_id) => Json(serde_json::json!({
            "message": "경매가 종료되었습니다.",
            "winner_id": winner_id
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// 관심 목록 토글 요청 처리
pub async fn handle_watchlist_toggle(
    State(db_manager): State<Arc<DatabaseManager>>,
    user: CurrentUser,
    Json(cmd): Json<ToggleWatchlistCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 관심 목록 토글 요청: {:?}", "Command", cmd);

    match command_handle_toggle_watchlist(cmd, user.user_id, &db_manager).await {
        Ok(watched) => Json(serde_json::json!({ "watched": watched })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 댓글 작성 요청 처리
pub async fn handle_comment(
    State(db_manager): State<Arc<DatabaseManager>>,
    user: CurrentUser,
    Json(cmd): Json<AddCommentCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 댓글 작성 요청: 상품 {}", "Command", cmd.listing_id);

    match command_handle_add_comment(cmd, user.user_id, &db_manager).await {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(e) => error_response(e),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 상품 조회
pub async fn handle_get_listings(
    State(db_manager): State<Arc<DatabaseManager>>,
) -> impl IntoResponse {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    match query::handlers::get_all_listings(&db_manager).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 상품 조회
pub async fn handle_get_listing(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    match query::handlers::get_listing(&db_manager, listing_id).await {
        Ok(Some(listing)) => Json(listing).into_response(),
        Ok(None) => error_response(serde_json::json!({
            "error": "상품을 찾을 수 없습니다.",
            "code": "NOT_FOUND"
        })),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_listing_bids(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    match query::handlers::get_listing_bids(&db_manager, listing_id).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 최고 입찰가 조회 id: {}",
        "HandlerQuery", listing_id
    );
    match query::handlers::get_highest_bid(&db_manager, listing_id).await {
        Ok(bid) => Json(bid).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 댓글 조회
pub async fn handle_get_listing_comments(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 댓글 조회 id: {}", "HandlerQuery", listing_id);
    match query::handlers::get_listing_comments(&db_manager, listing_id).await {
        Ok(comments) => Json(comments).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 카테고리 목록 조회
pub async fn handle_get_categories() -> impl IntoResponse {
    info!("{:<12} --> 카테고리 목록 조회", "HandlerQuery");
    Json(CATEGORIES)
}

/// 카테고리별 상품 조회
pub async fn handle_get_by_category(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 카테고리별 상품 조회: {}",
        "HandlerQuery", category
    );
    match query::handlers::get_listings_by_category(&db_manager, &category).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(db_manager): State<Arc<DatabaseManager>>,
    user: CurrentUser,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 관심 목록 조회 사용자: {}",
        "HandlerQuery", user.username
    );
    match query::handlers::get_watchlist(&db_manager, user.user_id).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// endregion: --- Query Handlers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    /// 오류 코드가 HTTP 상태로 올바르게 변환된다
    #[test]
    fn error_codes_map_to_statuses() {
        let cases = [
            ("INVALID_INPUT", StatusCode::BAD_REQUEST),
            ("LOW_BID", StatusCode::BAD_REQUEST),
            ("ALREADY_CLOSED", StatusCode::BAD_REQUEST),
            ("NO_BIDS", StatusCode::BAD_REQUEST),
            ("PASSWORD_MISMATCH", StatusCode::BAD_REQUEST),
            ("INVALID_CREDENTIALS", StatusCode::UNAUTHORIZED),
            ("NOT_OWNER", StatusCode::FORBIDDEN),
            ("NOT_FOUND", StatusCode::NOT_FOUND),
            ("DUPLICATE_USERNAME", StatusCode::CONFLICT),
            ("DB_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
            ("INTERNAL_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (code, status) in cases {
            let response = error_response(serde_json::json!({
                "error": "오류",
                "code": code
            }));
            assert_eq!(response.status(), status, "{}", code);
        }
    }
}
// endregion: --- Tests
