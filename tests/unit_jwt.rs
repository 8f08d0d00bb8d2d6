use edudesk::edudesk_auth::{
    create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
use edudesk::edudesk_config::JwtConfig;
use edudesk::edudesk_core::Role;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

#[test]
fn test_access_token_for_every_role() {
    let config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in Role::ALL {
        let token = create_access_token(user_id, "staff@school.test", role, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.role, role);
        assert_eq!(claims.user_id().unwrap(), user_id);
    }
}

#[test]
fn test_tampered_token_is_rejected() {
    let config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "a@school.test", Role::Student, &config).unwrap();

    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{}.{}{}", unsigned, flipped, &signature[1..]);

    assert!(verify_token(&tampered, &config).is_err());
}

#[test]
fn test_empty_token_is_rejected() {
    let err = verify_token("", &get_test_jwt_config()).unwrap_err();
    assert_eq!(err.status.as_u16(), 401);
}

#[test]
fn test_refresh_tokens_are_unique() {
    let config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let first = create_refresh_token(user_id, "p@school.test", &config).unwrap();
    let second = create_refresh_token(user_id, "p@school.test", &config).unwrap();
    assert_ne!(first, second);

    let claims = verify_refresh_token(&first, &config).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.exp - claims.iat, 604800);
}

#[test]
fn test_token_kinds_are_not_interchangeable() {
    let config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let access =
        create_access_token(user_id, "t@school.test", Role::ClassTeacher, &config).unwrap();
    let refresh = create_refresh_token(user_id, "t@school.test", &config).unwrap();

    assert!(verify_refresh_token(&access, &config).is_err());
    assert!(verify_token(&refresh, &config).is_err());
}
