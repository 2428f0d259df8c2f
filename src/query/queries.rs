/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str =
    "SELECT id, seller_id, title, description, current_bid, category, image_url, active, winner_id, created_at FROM listings ORDER BY created_at DESC";

/// 상품 조회
pub const GET_LISTING: &str =
    "SELECT id, seller_id, title, description, current_bid, category, image_url, active, winner_id, created_at FROM listings WHERE id = $1";

/// 카테고리별 상품 조회
pub const GET_LISTINGS_BY_CATEGORY: &str =
    "SELECT id, seller_id, title, description, current_bid, category, image_url, active, winner_id, created_at FROM listings WHERE category = $1 ORDER BY created_at DESC";

/// 입찰 이력 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, bid_time
    FROM bids
    WHERE listing_id = $1
    ORDER BY bid_time DESC
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) as highest_bid FROM bids WHERE listing_id = $1";

/// 댓글 조회(작성 순서대로)
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, body, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at
"#;

/// 관심 목록 조회
pub const GET_WATCHLIST: &str = r#"
    SELECT l.id, l.seller_id, l.title, l.description, l.current_bid, l.category, l.image_url, l.active, l.winner_id, l.created_at
    FROM listings l
    JOIN watchlist_entries w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY w.added_at DESC
"#;

/// 사용자 이름으로 회원 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";
