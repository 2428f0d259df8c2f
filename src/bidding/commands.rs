/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 종료(낙찰자 결정)
// region:    --- Imports
use crate::bidding::model::{Bid, Listing};
use crate::database::DatabaseManager;
use crate::query;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub amount: i64,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseListingCommand {
    pub listing_id: i64,
}

/// 1. 입찰
/// 현재 가격 확인과 갱신을 하나의 조건부 UPDATE로 처리한다.
/// 동시 입찰 시 낮은 쪽은 조건을 만족하지 못하고 실패한다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    bidder_id: i64,
    db_manager: &DatabaseManager,
) -> Result<i64, serde_json::Value> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: {:?}, 입찰자: {}",
        "Command", cmd, bidder_id
    );

    let listing_id = cmd.listing_id;
    let amount = cmd.amount;

    // 현재 가격 확인 및 업데이트, 입찰 기록 추가
    let updated: Option<i64> = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let row = sqlx::query(
                    "UPDATE listings SET current_bid = $1
                     WHERE id = $2 AND active = TRUE AND current_bid < $1
                     RETURNING current_bid",
                )
                .bind(amount)
                .bind(listing_id)
                .fetch_optional(&mut **tx)
                .await?;

                match row {
                    Some(row) => {
                        sqlx::query(
                            "INSERT INTO bids (listing_id, bidder_id, amount)
                             VALUES ($1, $2, $3)",
                        )
                        .bind(listing_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .execute(&mut **tx)
                        .await?;

                        Ok(Some(row.get("current_bid")))
                    }
                    None => Ok(None),
                }
            })
        })
        .await
        .map_err(db_error)?;

    match updated {
        Some(current_bid) => {
            info!("{:<12} --> 입찰 성공: 현재 가격 {}", "Command", current_bid);
            Ok(current_bid)
        }
        // 실패 원인 구분
        None => match query::handlers::get_listing(db_manager, listing_id)
            .await
            .map_err(db_error)?
        {
            None => Err(serde_json::json!({
                "error": "상품을 찾을 수 없습니다.",
                "code": "NOT_FOUND"
            })),
            Some(listing) if !listing.active => Err(serde_json::json!({
                "error": "경매가 이미 종료되었습니다.",
                "code": "ALREADY_CLOSED"
            })),
            Some(listing) => Err(serde_json::json!({
                "error": "입찰 금액이 현재 가격보다 낮습니다.",
                "code": "LOW_BID",
                "current_bid": listing.current_bid,
                "bid_amount": amount,
            })),
        },
    }
}

/// 2. 경매 종료(낙찰자 결정)
/// 판매자 본인만 종료할 수 있다. 입찰이 없으면 종료하지 않는다.
/// 상품 행을 잠근 상태에서 낙찰자를 결정하므로 종료와 입찰이 교차하지 않는다.
pub async fn handle_close_listing(
    cmd: CloseListingCommand,
    caller_id: i64,
    db_manager: &DatabaseManager,
) -> Result<i64, serde_json::Value> {
    info!(
        "{:<12} --> 경매 종료 요청 처리 시작: {:?}, 요청자: {}",
        "Command", cmd, caller_id
    );

    let pool = db_manager.get_pool();
    let mut tx = pool.begin().await.map_err(db_error)?;

    // 상품 조회(행 잠금). 실패 경로에서는 트랜잭션이 드롭되며 롤백된다.
    let listing = sqlx::query_as::<_, Listing>(
        "SELECT id, seller_id, title, description, current_bid, category, image_url,
                active, winner_id, created_at
         FROM listings WHERE id = $1 FOR UPDATE",
    )
    .bind(cmd.listing_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_error)?;

    let listing = match listing {
        Some(listing) => listing,
        None => {
            return Err(serde_json::json!({
                "error": "상품을 찾을 수 없습니다.",
                "code": "NOT_FOUND"
            }))
        }
    };

    if listing.seller_id != caller_id {
        return Err(serde_json::json!({
            "error": "판매자만 경매를 종료할 수 있습니다.",
            "code": "NOT_OWNER"
        }));
    }

    if !listing.active {
        return Err(serde_json::json!({
            "error": "경매가 이미 종료되었습니다.",
            "code": "ALREADY_CLOSED"
        }));
    }

    // 입찰 내역 조회(등록 순서대로)
    let bids = sqlx::query_as::<_, Bid>(
        "SELECT id, listing_id, bidder_id, amount, bid_time
         FROM bids WHERE listing_id = $1 ORDER BY id",
    )
    .bind(cmd.listing_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(db_error)?;

    // 낙찰자 결정
    let winner_id = match highest_bid(&bids) {
        Some(bid) => bid.bidder_id,
        None => {
            return Err(serde_json::json!({
                "error": "입찰이 없어 경매를 종료할 수 없습니다.",
                "code": "NO_BIDS"
            }))
        }
    };

    // 종료 처리. active -> false 전이는 단방향이며 되돌릴 수 없다.
    sqlx::query("UPDATE listings SET active = FALSE, winner_id = $1 WHERE id = $2")
        .bind(winner_id)
        .bind(cmd.listing_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    info!(
        "{:<12} --> 경매 종료 성공: 상품 {}, 낙찰자 {}",
        "Command", cmd.listing_id, winner_id
    );
    Ok(winner_id)
}

/// 최고 입찰 선택
/// 금액이 같으면 먼저 등록된 입찰이 우선한다.
pub fn highest_bid(bids: &[Bid]) -> Option<&Bid> {
    let mut winner: Option<&Bid> = None;
    for bid in bids {
        match winner {
            Some(current) if bid.amount <= current.amount => {}
            _ => winner = Some(bid),
        }
    }
    winner
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

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bid(id: i64, bidder_id: i64, amount: i64) -> Bid {
        Bid {
            id,
            listing_id: 1,
            bidder_id,
            amount,
            bid_time: Utc::now(),
        }
    }

    /// 입찰이 없으면 낙찰자도 없다
    #[test]
    fn highest_bid_empty() {
        assert!(highest_bid(&[]).is_none());
    }

    /// 최대 금액 입찰이 선택된다
    #[test]
    fn highest_bid_selects_maximum() {
        let bids = vec![bid(1, 10, 100), bid(2, 20, 150), bid(3, 30, 120)];
        let winner = highest_bid(&bids).unwrap();
        assert_eq!(winner.bidder_id, 20);
        assert_eq!(winner.amount, 150);
    }

    /// 동일 금액이면 먼저 등록된 입찰이 우선한다
    #[test]
    fn highest_bid_tie_keeps_first() {
        let bids = vec![bid(1, 10, 100), bid(2, 20, 150), bid(3, 30, 150)];
        let winner = highest_bid(&bids).unwrap();
        assert_eq!(winner.bidder_id, 20);
    }
}
// endregion: --- Tests
