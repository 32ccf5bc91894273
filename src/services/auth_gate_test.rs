use super::*;
use crate::services::credentials::JsonCredentialStore;
use crate::services::session::AuthPhase;
use tempfile::TempDir;

fn gate_in(temp: &TempDir) -> AuthGate {
    let store = Arc::new(JsonCredentialStore::new(temp.path().join("_secret_auth_.json")));
    AuthGate::new(AuthWidgetConfig::default(), store)
}

fn account(username: &str, password: &str) -> NewAccount {
    NewAccount {
        name: "Ada".into(),
        email: format!("{username}@usc.edu"),
        username: username.into(),
        password: password.into(),
    }
}

async fn registered_gate(temp: &TempDir) -> AuthGate {
    let gate = gate_in(temp);
    let mut page = Page::new();
    let mut ctx = SessionContext::new();
    gate.build_login_ui(&mut page, &mut ctx, &Interaction::register(account("ada", "engine")))
        .await
        .unwrap();
    gate
}

// =============================================================================
// status + identity
// =============================================================================

#[tokio::test]
async fn logged_out_before_any_login() {
    let temp = TempDir::new().unwrap();
    let gate = gate_in(&temp);
    let mut page = Page::new();
    let mut ctx = SessionContext::new();

    let logged_in = gate.build_login_ui(&mut page, &mut ctx, &Interaction::default()).await.unwrap();

    assert!(!logged_in);
    assert_eq!(gate.get_username(&ctx), None);
}

#[tokio::test]
async fn true_result_implies_non_empty_username() {
    let temp = TempDir::new().unwrap();
    let gate = registered_gate(&temp).await;
    let mut page = Page::new();
    let mut ctx = SessionContext::new();

    let logged_in = gate
        .build_login_ui(&mut page, &mut ctx, &Interaction::login("ada", "engine"))
        .await
        .unwrap();

    assert!(logged_in);
    assert!(ctx.authenticated());
    assert_eq!(gate.get_username(&ctx), Some("ada"));
}

#[tokio::test]
async fn wrong_password_returns_false() {
    let temp = TempDir::new().unwrap();
    let gate = registered_gate(&temp).await;
    let mut page = Page::new();
    let mut ctx = SessionContext::new();

    let logged_in = gate
        .build_login_ui(&mut page, &mut ctx, &Interaction::login("ada", "babbage"))
        .await
        .unwrap();

    assert!(!logged_in);
    assert_eq!(ctx.phase(), AuthPhase::LoggedOut);
    assert_eq!(gate.get_username(&ctx), None);
    assert!(page.main_html().contains(INVALID_CREDENTIALS));
}

#[tokio::test]
async fn login_while_logged_in_keeps_current_user() {
    let temp = TempDir::new().unwrap();
    let gate = registered_gate(&temp).await;
    let mut ctx = SessionContext::new();
    gate.build_login_ui(&mut Page::new(), &mut ctx, &Interaction::login("ada", "engine"))
        .await
        .unwrap();

    let logged_in = gate
        .build_login_ui(&mut Page::new(), &mut ctx, &Interaction::login("someone", "else"))
        .await
        .unwrap();

    assert!(logged_in);
    assert_eq!(gate.get_username(&ctx), Some("ada"));
}

#[tokio::test]
async fn logout_while_logged_out_is_harmless() {
    let temp = TempDir::new().unwrap();
    let gate = gate_in(&temp);
    let mut page = Page::new();
    let mut ctx = SessionContext::new();

    let logged_in = gate.build_login_ui(&mut page, &mut ctx, &Interaction::logout()).await.unwrap();

    assert!(!logged_in);
    assert!(page.main_html().contains(r#"action="/login""#));
}

// =============================================================================
// widget rendering
// =============================================================================

#[tokio::test]
async fn widget_uses_config_values() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonCredentialStore::new(temp.path().join("_secret_auth_.json")));
    let config = AuthWidgetConfig {
        company_name: "Acme".into(),
        width: 320,
        height: 180,
        lottie_url: "https://example.test/anim.json".into(),
        ..AuthWidgetConfig::default()
    };
    let gate = AuthGate::new(config, store);
    let mut page = Page::new();

    gate.build_login_ui(&mut page, &mut SessionContext::new(), &Interaction::default())
        .await
        .unwrap();

    let main = page.main_html();
    assert!(main.contains("Acme"));
    assert!(main.contains("width: 320px; height: 180px;"));
    assert!(main.contains(r#"src="https://example.test/anim.json""#));
    assert!(main.contains("<lottie-player"));
}

#[tokio::test]
async fn logout_button_uses_configured_label() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonCredentialStore::new(temp.path().join("_secret_auth_.json")));
    let config = AuthWidgetConfig { logout_button_name: "Sign out".into(), ..AuthWidgetConfig::default() };
    let gate = AuthGate::new(config, store);
    gate.build_login_ui(&mut Page::new(), &mut SessionContext::new(), &Interaction::register(account("ada", "pw")))
        .await
        .unwrap();

    let mut page = Page::new();
    gate.build_login_ui(&mut page, &mut SessionContext::new(), &Interaction::login("ada", "pw"))
        .await
        .unwrap();

    assert!(page.sidebar_html().contains(">Sign out</button>"));
}

#[tokio::test]
async fn menu_marks_active_item() {
    let temp = TempDir::new().unwrap();
    let gate = gate_in(&temp);
    let mut page = Page::new();

    gate.build_login_ui(&mut page, &mut SessionContext::new(), &Interaction::view(LoginMenu::CreateAccount))
        .await
        .unwrap();

    assert!(page.main_html().contains(r#"<a class="active" href="/?menu=create-account">"#));
}

#[tokio::test]
async fn rejected_input_is_escaped_when_echoed() {
    let temp = TempDir::new().unwrap();
    let gate = gate_in(&temp);
    let mut page = Page::new();

    gate.build_login_ui(&mut page, &mut SessionContext::new(), &Interaction::login("\"><script>", "x"))
        .await
        .unwrap();

    let main = page.main_html();
    assert!(!main.contains("<script>"));
    assert!(main.contains("&quot;&gt;&lt;script&gt;"));
}

#[tokio::test]
async fn rejected_registration_keeps_entered_fields() {
    let temp = TempDir::new().unwrap();
    let gate = gate_in(&temp);
    let mut page = Page::new();
    let mut bad = account("bad name", "pw");
    bad.email = "ada@usc.edu".into();

    gate.build_login_ui(&mut page, &mut SessionContext::new(), &Interaction::register(bad))
        .await
        .unwrap();

    let main = page.main_html();
    assert!(main.contains("Invalid Username! Please try again"));
    assert!(main.contains(r#"value="ada@usc.edu""#));
    assert!(main.contains(r#"value="bad name""#));
}

// =============================================================================
// interaction parsing
// =============================================================================

#[test]
fn login_menu_deserializes_kebab_case() {
    let menu: LoginMenu = serde_json::from_str(r#""create-account""#).unwrap();
    assert_eq!(menu, LoginMenu::CreateAccount);
    let menu: LoginMenu = serde_json::from_str(r#""login""#).unwrap();
    assert_eq!(menu, LoginMenu::Login);
}

#[test]
fn interaction_constructors_pick_menu() {
    assert_eq!(Interaction::login("a", "b").menu, LoginMenu::Login);
    assert_eq!(Interaction::register(NewAccount::default()).menu, LoginMenu::CreateAccount);
    assert_eq!(Interaction::logout().action, Some(AuthAction::Logout));
    assert_eq!(Interaction::default().action, None);
}
