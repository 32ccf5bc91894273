//! Page controller: one render cycle per user interaction.
//!
//! DESIGN
//! ======
//! A cycle runs top to bottom against an explicit `SessionContext`:
//! branding into the sidebar, the auth gate, the session identity read-back,
//! then the authorized-users notice. The result is a `Page` (sidebar + main
//! regions) that the HTTP layer turns into a full document. Nothing after
//! the identity read-back is gated here; protected content would hang off
//! `RenderCycle::logged_in`.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::branding::{self, APP_TITLE};
use crate::config::AuthWidgetConfig;
use crate::services::auth_gate::{AuthError, Interaction};
use crate::services::session::SessionContext;
use crate::state::AppState;

const PAGE_CSS: &str = include_str!("../templates/page.css");

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

// =============================================================================
// PAGE
// =============================================================================

/// Visible page state for one cycle.
#[derive(Debug, Default)]
pub struct Page {
    sidebar: Vec<Markup>,
    main: Vec<Markup>,
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sidebar(&mut self, block: Markup) {
        self.sidebar.push(block);
    }

    pub fn push_main(&mut self, block: Markup) {
        self.main.push(block);
    }

    #[must_use]
    pub fn sidebar_html(&self) -> String {
        self.sidebar.iter().map(|m| m.0.as_str()).collect()
    }

    #[must_use]
    pub fn main_html(&self) -> String {
        self.main.iter().map(|m| m.0.as_str()).collect()
    }

    /// Full HTML document. The widget's chrome flags decide whether the top
    /// menu and footer are rendered.
    #[must_use]
    pub fn into_document(self, chrome: &AuthWidgetConfig) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (APP_TITLE) }
                    style { (PreEscaped(PAGE_CSS)) }
                    script src="https://unpkg.com/@lottiefiles/lottie-player@latest/dist/lottie-player.js" {}
                }
                body {
                    @if !chrome.hide_menu_bool {
                        header #main-menu {
                            a href="/" { (APP_TITLE) }
                        }
                    }
                    div.layout {
                        aside.sidebar { (PreEscaped(self.sidebar_html())) }
                        main.content { (PreEscaped(self.main_html())) }
                    }
                    @if !chrome.hide_footer_bool {
                        footer #page-footer { "Made by " (chrome.company_name) }
                    }
                }
            }
        }
    }
}

/// Error document shown in place of the page when a cycle aborts.
#[must_use]
pub fn render_error_document(message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (APP_TITLE) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main.content.error-page {
                    h1 { "Something went wrong" }
                    pre { (message) }
                    a href="/" { "Try again" }
                }
            }
        }
    }
}

// =============================================================================
// RENDER CYCLE
// =============================================================================

/// Outcome of one cycle.
#[derive(Debug)]
pub struct RenderCycle {
    pub page: Page,
    pub logged_in: bool,
    pub username: Option<String>,
}

/// Run one render cycle for `interaction` against `ctx`.
///
/// # Errors
///
/// Propagates auth-gate failures; the caller must discard `ctx` changes.
pub async fn render_cycle(
    state: &AppState,
    ctx: &mut SessionContext,
    interaction: Interaction,
) -> Result<RenderCycle, PageError> {
    let mut page = Page::new();
    page.push_sidebar(branding::render_sidebar_branding(&state.branding, &state.logo));

    let logged_in = state.gate.build_login_ui(&mut page, ctx, &interaction).await?;
    let username = state.gate.get_username(ctx).map(str::to_owned);

    page.push_sidebar(branding::render_authorized_notice(&state.branding));

    Ok(RenderCycle { page, logged_in, username })
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
