//! JWT 令牌集成测试
//!
//! 签发/校验往返、角色约束与篡改检测

use chirpy::auth::jwt::{JwtService, TokenError, TokenRole};

fn test_service() -> JwtService {
    JwtService::new("test-secret-key-for-testing-only-min-32-chars", 3600, 5_184_000).unwrap()
}

#[test]
fn test_roundtrip_preserves_subject_and_role() {
    let service = test_service();

    let token = service.issue(42, TokenRole::Access).unwrap();
    let claims = service.verify_access_token(&token).unwrap();

    assert_eq!(claims.subject_id().unwrap(), 42);
    assert_eq!(claims.iss, "chirpy-access");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_access_and_refresh_are_not_interchangeable() {
    let service = test_service();

    let access = service.issue(1, TokenRole::Access).unwrap();
    let refresh = service.issue(1, TokenRole::Refresh).unwrap();

    assert!(matches!(
        service.verify_refresh_token(&access),
        Err(TokenError::WrongRole)
    ));
    assert!(matches!(
        service.verify_access_token(&refresh),
        Err(TokenError::WrongRole)
    ));
}

#[test]
fn test_tampered_signature_is_rejected() {
    let service = test_service();
    let token = service.issue(1, TokenRole::Access).unwrap();

    // 翻转签名段的最后一个字符
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert!(matches!(
        service.parse_and_verify(&tampered),
        Err(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_unknown_issuer_is_wrong_role() {
    let service = test_service();
    let token = service.issue(1, TokenRole::Access).unwrap();
    let claims = service.parse_and_verify(&token).unwrap();

    let mut forged = claims.clone();
    forged.iss = "chirpy-admin".to_string();

    assert!(matches!(
        service.require_role(forged, TokenRole::Access),
        Err(TokenError::WrongRole)
    ));
}

#[test]
fn test_subject_is_string_encoded_user_id() {
    let service = test_service();
    let token = service.issue(7, TokenRole::Refresh).unwrap();
    let claims = service.parse_and_verify(&token).unwrap();

    assert_eq!(claims.sub, "7");
    assert_eq!(claims.subject_id().unwrap(), 7);
}
