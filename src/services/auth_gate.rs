//! Auth gate — login/registration widget and session status.
//!
//! ARCHITECTURE
//! ============
//! Each render cycle hands the gate the session context and the user's
//! interaction. The gate applies the interaction to the context
//! (`LoggedOut -> LoggingIn -> LoggedIn`, or back to `LoggedOut`), renders the
//! widget into the page, and reports whether the session is logged in. It
//! never waits for input: the next interaction arrives as the next cycle.
//!
//! Credential mistakes are shown inline and leave the session logged out.
//! Store failures abort the cycle with [`AuthError::Store`].

use std::sync::Arc;

use maud::{Markup, html};
use serde::Deserialize;

use super::credentials::{CredentialStore, NewAccount, RegisterError, StoreError};
use super::session::SessionContext;
use crate::config::AuthWidgetConfig;
use crate::page::Page;

pub const INVALID_CREDENTIALS: &str = "Invalid Username or Password!";
pub const REGISTRATION_SUCCESS: &str = "Registration Successful!";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// INTERACTION
// =============================================================================

/// Which widget form to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginMenu {
    #[default]
    Login,
    CreateAccount,
}

impl LoginMenu {
    fn href(self) -> &'static str {
        match self {
            Self::Login => "/?menu=login",
            Self::CreateAccount => "/?menu=create-account",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::CreateAccount => "Create Account",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Login { username: String, password: String },
    Register(NewAccount),
    Logout,
}

/// One user interaction: a page view, optionally carrying a form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interaction {
    pub menu: LoginMenu,
    pub action: Option<AuthAction>,
}

impl Interaction {
    #[must_use]
    pub fn view(menu: LoginMenu) -> Self {
        Self { menu, action: None }
    }

    #[must_use]
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            menu: LoginMenu::Login,
            action: Some(AuthAction::Login { username: username.into(), password: password.into() }),
        }
    }

    #[must_use]
    pub fn register(account: NewAccount) -> Self {
        Self { menu: LoginMenu::CreateAccount, action: Some(AuthAction::Register(account)) }
    }

    #[must_use]
    pub fn logout() -> Self {
        Self { menu: LoginMenu::Login, action: Some(AuthAction::Logout) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Error(String),
    Success(String),
}

/// Values echoed back into the form after a rejected submission.
#[derive(Debug, Default)]
struct Prefill<'a> {
    name: &'a str,
    email: &'a str,
    username: &'a str,
}

// =============================================================================
// AUTH GATE
// =============================================================================

#[derive(Clone)]
pub struct AuthGate {
    config: AuthWidgetConfig,
    store: Arc<dyn CredentialStore>,
}

impl AuthGate {
    #[must_use]
    pub fn new(config: AuthWidgetConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self { config, store }
    }

    #[must_use]
    pub fn config(&self) -> &AuthWidgetConfig {
        &self.config
    }

    /// Apply `interaction` to `ctx`, render the widget into `page`, and return
    /// whether the session is logged in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the credential store cannot be read or
    /// written. The session is left logged out in that case.
    pub async fn build_login_ui(
        &self,
        page: &mut Page,
        ctx: &mut SessionContext,
        interaction: &Interaction,
    ) -> Result<bool, AuthError> {
        let mut notice = None;
        let mut prefill = Prefill::default();

        match &interaction.action {
            Some(AuthAction::Logout) if ctx.authenticated() => {
                tracing::info!(username = ctx.username().unwrap_or_default(), "logged out");
                ctx.sign_out();
            }
            Some(AuthAction::Login { username, password }) if !ctx.authenticated() => {
                ctx.begin_login();
                match self.store.verify(username, password).await {
                    Ok(Some(verified)) => {
                        tracing::info!(username = %verified, "login succeeded");
                        ctx.complete_login(verified);
                    }
                    Ok(None) => {
                        tracing::warn!(username = %username, "login rejected");
                        ctx.fail_login();
                        notice = Some(Notice::Error(INVALID_CREDENTIALS.into()));
                        prefill.username = username.as_str();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "credential store failed during login");
                        ctx.fail_login();
                        return Err(e.into());
                    }
                }
            }
            Some(AuthAction::Register(account)) if !ctx.authenticated() => {
                match self.store.register(account.clone()).await {
                    Ok(()) => notice = Some(Notice::Success(REGISTRATION_SUCCESS.into())),
                    Err(RegisterError::Store(e)) => {
                        tracing::error!(error = %e, "credential store failed during registration");
                        return Err(e.into());
                    }
                    Err(rejected) => {
                        tracing::debug!(reason = %rejected, "registration rejected");
                        notice = Some(Notice::Error(rejected.to_string()));
                        prefill = Prefill { name: &account.name, email: &account.email, username: &account.username };
                    }
                }
            }
            _ => {}
        }

        tracing::trace!(phase = ?ctx.phase(), "auth gate evaluated");
        if ctx.authenticated() {
            page.push_sidebar(self.render_logout_button());
            return Ok(true);
        }

        page.push_main(self.render_widget(interaction.menu, notice.as_ref(), &prefill));
        Ok(false)
    }

    /// The session identity, present only while logged in.
    #[must_use]
    pub fn get_username<'a>(&self, ctx: &'a SessionContext) -> Option<&'a str> {
        ctx.username()
    }

    fn render_logout_button(&self) -> Markup {
        html! {
            form.logout method="post" action="/logout" {
                button type="submit" { (self.config.logout_button_name) }
            }
        }
    }

    fn render_widget(&self, menu: LoginMenu, notice: Option<&Notice>, prefill: &Prefill<'_>) -> Markup {
        let box_style = format!("width: {}px; height: {}px;", self.config.width, self.config.height);
        html! {
            section.auth-widget {
                nav.auth-menu {
                    @for item in [LoginMenu::Login, LoginMenu::CreateAccount] {
                        a.active[item == menu] href=(item.href()) { (item.label()) }
                    }
                }
                div.auth-body {
                    div.auth-animation style=(box_style) {
                        lottie-player src=(self.config.lottie_url) background="transparent" speed="1"
                            style=(box_style) loop autoplay {}
                    }
                    div.auth-form {
                        p.auth-company { (self.config.company_name) }
                        @match notice {
                            Some(Notice::Error(msg)) => { p.notice.error { (msg) } }
                            Some(Notice::Success(msg)) => { p.notice.success { (msg) } }
                            None => {}
                        }
                        @match menu {
                            LoginMenu::Login => { (render_login_form(prefill)) }
                            LoginMenu::CreateAccount => { (render_signup_form(prefill)) }
                        }
                    }
                }
            }
        }
    }
}

fn render_login_form(prefill: &Prefill<'_>) -> Markup {
    html! {
        form method="post" action="/login" {
            label { "Username" input type="text" name="username" value=(prefill.username) placeholder="Your unique username" required; }
            label { "Password" input type="password" name="password" placeholder="Your password" required; }
            button type="submit" { "Login" }
        }
    }
}

fn render_signup_form(prefill: &Prefill<'_>) -> Markup {
    html! {
        form method="post" action="/signup" {
            label { "Name" input type="text" name="name" value=(prefill.name) placeholder="Please enter your name" required; }
            label { "Email" input type="email" name="email" value=(prefill.email) placeholder="Please enter your email" required; }
            label { "Username" input type="text" name="username" value=(prefill.username) placeholder="Enter a unique username" required; }
            label { "Password" input type="password" name="password" placeholder="Create a strong password" required; }
            button type="submit" { "Register" }
        }
    }
}

#[cfg(test)]
#[path = "auth_gate_test.rs"]
mod tests;
