/// Bearer 토큰 발급과 검증
// region:    --- Imports
use crate::auth::model::Claims;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
// endregion: --- Imports

// region:    --- Token
/// 토큰 유효 기간(일)
const TOKEN_TTL_DAYS: i64 = 7;

fn secret() -> String {
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

/// 토큰 발급
pub fn issue_token(user_id: i64, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: expiration,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret().as_ref()),
    )
}

/// 토큰 해석
pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret().as_ref()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
// endregion: --- Token

// region:    --- Current User
/// 인증된 사용자
/// Authorization 헤더의 Bearer 토큰에서 추출한다.
/// 핸들러 매개변수로 선언하면 토큰이 없거나 유효하지 않을 때 401로 거절된다.
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| unauthorized("인증 정보가 없습니다."))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Authorization 헤더 형식이 올바르지 않습니다."))?;

        let claims =
            decode_token(token).map_err(|_| unauthorized("토큰이 유효하지 않거나 만료되었습니다."))?;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| unauthorized("토큰이 유효하지 않거나 만료되었습니다."))?;

        Ok(CurrentUser {
            user_id,
            username: claims.username,
        })
    }
}

fn unauthorized(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": "UNAUTHORIZED"
        })),
    )
}
// endregion: --- Current User

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    /// 발급한 토큰을 해석하면 원래의 사용자 정보가 나온다
    #[test]
    fn issue_then_decode() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let token = issue_token(42, "bidder42").unwrap();
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "bidder42");
        assert!(claims.exp > Utc::now().timestamp());
    }

    /// 손상된 토큰은 거부된다
    #[test]
    fn tampered_token_is_rejected() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let token = issue_token(7, "seller7").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(decode_token(&tampered).is_err());
    }
}
// endregion: --- Tests
