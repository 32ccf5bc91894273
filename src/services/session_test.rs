use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_well_formed() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(is_well_formed_token(&token));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

#[test]
fn malformed_tokens_rejected() {
    assert!(!is_well_formed_token(""));
    assert!(!is_well_formed_token("abc"));
    assert!(!is_well_formed_token(&"z".repeat(64)));
}

// =============================================================================
// SessionContext transitions
// =============================================================================

#[test]
fn new_context_is_logged_out() {
    let ctx = SessionContext::new();
    assert_eq!(ctx.phase(), AuthPhase::LoggedOut);
    assert!(!ctx.authenticated());
    assert_eq!(ctx.username(), None);
}

#[test]
fn successful_login_walks_all_phases() {
    let mut ctx = SessionContext::new();
    ctx.begin_login();
    assert_eq!(ctx.phase(), AuthPhase::LoggingIn);
    assert!(!ctx.authenticated());

    ctx.complete_login("alice".into());
    assert_eq!(ctx.phase(), AuthPhase::LoggedIn);
    assert!(ctx.authenticated());
    assert_eq!(ctx.username(), Some("alice"));
}

#[test]
fn failed_login_returns_to_logged_out() {
    let mut ctx = SessionContext::new();
    ctx.begin_login();
    ctx.fail_login();
    assert_eq!(ctx, SessionContext::new());
}

#[test]
fn complete_without_begin_is_ignored() {
    let mut ctx = SessionContext::new();
    ctx.complete_login("mallory".into());
    assert!(!ctx.authenticated());
    assert_eq!(ctx.username(), None);
}

#[test]
fn empty_username_never_authenticates() {
    let mut ctx = SessionContext::new();
    ctx.begin_login();
    ctx.complete_login(String::new());
    assert_eq!(ctx.phase(), AuthPhase::LoggedOut);
    assert!(!ctx.authenticated());
}

#[test]
fn sign_out_clears_identity() {
    let mut ctx = SessionContext::new();
    ctx.begin_login();
    ctx.complete_login("bob".into());
    ctx.sign_out();
    assert_eq!(ctx.phase(), AuthPhase::LoggedOut);
    assert!(!ctx.authenticated());
    assert_eq!(ctx.username(), None);
}

#[test]
fn begin_login_while_logged_in_keeps_identity() {
    let mut ctx = SessionContext::new();
    ctx.begin_login();
    ctx.complete_login("carol".into());
    ctx.begin_login();
    assert_eq!(ctx.phase(), AuthPhase::LoggedIn);
    assert_eq!(ctx.username(), Some("carol"));
}
