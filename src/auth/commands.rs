/// 계정 관련 커맨드 처리
/// 1. 회원가입
/// 2. 로그인
// region:    --- Imports
use crate::auth::model::{AuthResponse, User};
use crate::auth::password;
use crate::auth::token;
use crate::database::DatabaseManager;
use crate::query;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Commands
/// 회원가입 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// 로그인 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;

/// 1. 회원가입
/// 사용자 이름 중복은 저장 계층의 UNIQUE 제약으로 판정한다.
/// 가입에 성공하면 바로 로그인 상태가 되도록 토큰을 발급한다.
pub async fn handle_register(
    cmd: RegisterCommand,
    db_manager: &DatabaseManager,
) -> Result<AuthResponse, serde_json::Value> {
    info!("{:<12} --> 회원가입 처리 시작: {}", "Auth", cmd.username);

    // 비밀번호 확인 일치 검증
    if cmd.password != cmd.confirmation {
        return Err(serde_json::json!({
            "error": "비밀번호가 일치하지 않습니다.",
            "code": "PASSWORD_MISMATCH"
        }));
    }

    // 입력값 검증
    validate_register_input(&cmd)?;

    // 비밀번호 해시 생성
    let password_hash = password::hash_password(&cmd.password).map_err(|e| {
        error!("{:<12} --> 비밀번호 해시 생성 실패: {:?}", "Auth", e);
        serde_json::json!({
            "error": "비밀번호 처리 중 오류가 발생했습니다.",
            "code": "INTERNAL_ERROR"
        })
    })?;

    // 회원 생성
    let username = cmd.username.clone();
    let email = cmd.email.clone();
    let inserted: Result<User, sqlx::Error> = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, User>(
                    "INSERT INTO users (username, email, password_hash)
                     VALUES ($1, $2, $3)
                     RETURNING id, username, email, password_hash, created_at",
                )
                .bind(&username)
                .bind(&email)
                .bind(&password_hash)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await;

    let user = match inserted {
        Ok(user) => user,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(serde_json::json!({
                "error": "이미 사용 중인 사용자 이름입니다.",
                "code": "DUPLICATE_USERNAME"
            }))
        }
        Err(e) => return Err(db_error(e)),
    };

    let token = issue_token(&user)?;
    info!("{:<12} --> 회원가입 성공: id {}", "Auth", user.id);
    Ok(AuthResponse {
        token,
        username: user.username,
    })
}

/// 2. 로그인
/// 존재하지 않는 사용자와 잘못된 비밀번호는 같은 오류로 응답한다.
pub async fn handle_login(
    cmd: LoginCommand,
    db_manager: &DatabaseManager,
) -> Result<AuthResponse, serde_json::Value> {
    info!("{:<12} --> 로그인 처리 시작: {}", "Auth", cmd.username);

    let user = query::handlers::get_user_by_username(db_manager, &cmd.username)
        .await
        .map_err(db_error)?;

    let user = match user {
        Some(user) => user,
        None => return Err(invalid_credentials()),
    };

    // 비밀번호 검증
    match password::verify_password(&cmd.password, &user.password_hash) {
        Ok(true) => {}
        _ => return Err(invalid_credentials()),
    }

    let token = issue_token(&user)?;
    info!("{:<12} --> 로그인 성공: id {}", "Auth", user.id);
    Ok(AuthResponse {
        token,
        username: user.username,
    })
}

/// 회원가입 입력값 검증
fn validate_register_input(cmd: &RegisterCommand) -> Result<(), serde_json::Value> {
    let invalid = |message: &str| {
        serde_json::json!({
            "error": message,
            "code": "INVALID_INPUT"
        })
    };

    if cmd.username.trim().is_empty() {
        return Err(invalid("사용자 이름을 입력해 주세요."));
    }
    if cmd.username.chars().count() > MAX_USERNAME_LEN {
        return Err(invalid("사용자 이름이 너무 깁니다."));
    }
    if cmd.email.trim().is_empty() || !cmd.email.contains('@') {
        return Err(invalid("이메일 형식이 올바르지 않습니다."));
    }
    if cmd.email.chars().count() > MAX_EMAIL_LEN {
        return Err(invalid("이메일이 너무 깁니다."));
    }
    if cmd.password.is_empty() {
        return Err(invalid("비밀번호를 입력해 주세요."));
    }
    Ok(())
}

/// 토큰 발급(실패 시 사용자에게 일반 오류로 응답)
fn issue_token(user: &User) -> Result<String, serde_json::Value> {
    token::issue_token(user.id, &user.username).map_err(|e| {
        error!("{:<12} --> 토큰 발급 실패: {:?}", "Auth", e);
        serde_json::json!({
            "error": "토큰 발급 중 오류가 발생했습니다.",
            "code": "INTERNAL_ERROR"
        })
    })
}

fn invalid_credentials() -> serde_json::Value {
    serde_json::json!({
        "error": "사용자 이름 또는 비밀번호가 올바르지 않습니다.",
        "code": "INVALID_CREDENTIALS"
    })
}

/// 데이터베이스 오류 변환
fn db_error(e: sqlx::Error) -> serde_json::Value {
    error!("{:<12} --> 데이터베이스 오류: {:?}", "Auth", e);
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

    fn register_cmd(username: &str, email: &str, password: &str, confirmation: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn register_input_rules() {
        assert!(validate_register_input(&register_cmd("alice", "alice@example.com", "pw", "pw")).is_ok());
        assert!(validate_register_input(&register_cmd("", "alice@example.com", "pw", "pw")).is_err());
        assert!(validate_register_input(&register_cmd("alice", "not-an-email", "pw", "pw")).is_err());
        assert!(validate_register_input(&register_cmd("alice", "alice@example.com", "", "")).is_err());
        assert!(
            validate_register_input(&register_cmd(&"a".repeat(MAX_USERNAME_LEN + 1), "a@b.c", "pw", "pw"))
                .is_err()
        );
    }
}
// endregion: --- Tests
