use uuid::Uuid;

use movesmart::auth::password::{
    hash_password, is_valid_email, validate_password_strength, verify_password, PasswordPolicy,
};
use movesmart::auth::{extract_bearer_token, AuthError, JwtService, UserRole};

#[test]
fn test_access_token_round_trip() {
    let jwt = JwtService::new("integration-test-secret");
    let user_id = Uuid::new_v4();

    let token = jwt
        .create_access_token(user_id, "maria", "maria@example.com", UserRole::User)
        .unwrap();
    let session = jwt.extract_user_session(&token).unwrap();

    assert_eq!(session.user_id, user_id);
    assert_eq!(session.username, "maria");
    assert_eq!(session.email, "maria@example.com");
    assert_eq!(session.role, UserRole::User);
    assert!(!session.jti.is_empty());
}

#[test]
fn test_token_from_another_secret_is_rejected() {
    let issuer = JwtService::new("secret-one");
    let verifier = JwtService::new("secret-two");

    let token = issuer
        .create_access_token(Uuid::new_v4(), "eve", "eve@example.com", UserRole::Admin)
        .unwrap();

    assert!(matches!(
        verifier.validate_token(&token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn test_tampered_token_is_rejected() {
    let jwt = JwtService::new("integration-test-secret");
    let token = jwt
        .create_access_token(Uuid::new_v4(), "maria", "maria@example.com", UserRole::User)
        .unwrap();

    let mut tampered = token.clone();
    tampered.pop();
    assert!(jwt.validate_token(&tampered).is_err());
}

#[test]
fn test_bearer_header_parsing() {
    assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");

    assert!(extract_bearer_token("abc.def.ghi").is_err());
    assert!(extract_bearer_token("Basic dXNlcjpwdw==").is_err());
    assert!(extract_bearer_token("Bearer ").is_err());
}

#[test]
fn test_role_hierarchy_is_exhaustive() {
    // Admin outranks everyone, staff outranks plain users
    assert!(UserRole::Admin.can_access(&UserRole::Admin));
    assert!(UserRole::Admin.can_access(&UserRole::Staff));
    assert!(UserRole::Admin.can_access(&UserRole::User));

    assert!(!UserRole::Staff.can_access(&UserRole::Admin));
    assert!(UserRole::Staff.can_access(&UserRole::Staff));
    assert!(UserRole::Staff.can_access(&UserRole::User));

    assert!(!UserRole::User.can_access(&UserRole::Admin));
    assert!(!UserRole::User.can_access(&UserRole::Staff));
    assert!(UserRole::User.can_access(&UserRole::User));
}

#[test]
fn test_role_parsing_accepts_legacy_staff_name() {
    assert_eq!(UserRole::from_str("user"), Some(UserRole::User));
    assert_eq!(UserRole::from_str("staff"), Some(UserRole::Staff));
    assert_eq!(UserRole::from_str("mitarbeiter"), Some(UserRole::Staff));
    assert_eq!(UserRole::from_str("ADMIN"), Some(UserRole::Admin));
    assert_eq!(UserRole::from_str("superuser"), None);
}

#[test]
fn test_role_serialization_matches_the_api_contract() {
    assert_eq!(serde_json::to_string(&UserRole::Staff).unwrap(), "\"staff\"");

    let parsed: UserRole = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(parsed, UserRole::Admin);
}

#[test]
fn test_password_policy_rejects_weak_passwords() {
    let policy = PasswordPolicy::default();

    for weak in ["short", "password", "12345678", "Password1", "nouppercase1!"] {
        assert!(
            validate_password_strength(weak, &policy).is_err(),
            "should reject weak password: {weak}"
        );
    }

    assert!(validate_password_strength("CarSharing2024!", &policy).is_ok());
}

#[test]
fn test_password_hash_verification() {
    let hash = hash_password("CarSharing2024!").unwrap();

    assert!(verify_password("CarSharing2024!", &hash).unwrap());
    assert!(!verify_password("carsharing2024!", &hash).unwrap());
}

#[test]
fn test_email_format_validation() {
    assert!(is_valid_email("kunde@movesmart.de"));
    assert!(is_valid_email("first.last@example.co.uk"));

    assert!(!is_valid_email("kunde@movesmart"));
    assert!(!is_valid_email("not-an-email"));
    assert!(!is_valid_email("@movesmart.de"));
}
