/// 비밀번호 해시 처리(Argon2, PHC 문자열 형식)
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// 비밀번호 해시 생성
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// 비밀번호 검증
pub fn verify_password(
    password: &str,
    password_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(password_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    /// 해시한 비밀번호는 원본으로만 검증된다
    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    /// 같은 비밀번호라도 솔트가 달라 해시가 다르다
    #[test]
    fn hashes_are_salted() {
        let first = hash_password("비밀번호123").unwrap();
        let second = hash_password("비밀번호123").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("비밀번호123", &second).unwrap());
    }
}
// endregion: --- Tests
