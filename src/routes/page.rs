//! Page routes — every request is one render cycle.
//!
//! The session cookie carries an opaque token; the matching context is
//! checked out, handed to the page controller, and written back only when
//! the cycle succeeds. Only logged-in contexts are kept server-side, and a
//! successful login always moves the session to a newly minted token.

use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::page;
use crate::services::auth_gate::{Interaction, LoginMenu};
use crate::services::credentials::NewAccount;
use crate::services::session;
use crate::state::{AppState, Checkout};

pub(crate) const COOKIE_NAME: &str = "session_token";

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    menu: LoginMenu,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

fn build_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    let max_age = i64::try_from(config.session_idle_ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Reuse the caller's session token or mint a new one. The cookie is
/// re-issued either way so its max-age tracks the idle TTL.
fn session_cookie(jar: CookieJar, config: &AppConfig) -> (CookieJar, String) {
    let token = jar
        .get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|t| session::is_well_formed_token(t))
        .map_or_else(session::generate_token, str::to_owned);

    (jar.add(build_cookie(token.clone(), config)), token)
}

async fn run_cycle(state: AppState, jar: CookieJar, interaction: Interaction) -> Response {
    let (jar, token) = session_cookie(jar, &state.config);
    let Checkout { context: mut ctx, generation } = state.sessions.checkout(&token).await;
    let was_authenticated = ctx.authenticated();

    match page::render_cycle(&state, &mut ctx, interaction).await {
        Ok(cycle) => {
            tracing::debug!(logged_in = cycle.logged_in, username = ?cycle.username, "render cycle complete");
            let jar = match (was_authenticated, ctx.authenticated()) {
                // Fresh login: never promote the token the client presented.
                (false, true) => {
                    let fresh = session::generate_token();
                    state.sessions.store(&fresh, ctx).await;
                    jar.add(build_cookie(fresh, &state.config))
                }
                (true, true) => {
                    state.sessions.refresh(&token, generation, ctx).await;
                    jar
                }
                (_, false) => {
                    state.sessions.remove(&token).await;
                    jar
                }
            };
            let doc = cycle.page.into_document(state.gate.config());
            (jar, Html(doc.into_string())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "render cycle failed");
            let doc = page::render_error_document(&e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Html(doc.into_string())).into_response()
        }
    }
}

/// `GET /` — render the page.
pub async fn view(State(state): State<AppState>, jar: CookieJar, Query(query): Query<ViewQuery>) -> Response {
    run_cycle(state, jar, Interaction::view(query.menu)).await
}

/// `POST /login` — submit credentials.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    run_cycle(state, jar, Interaction::login(form.username, form.password)).await
}

/// `POST /signup` — create an account.
pub async fn signup(State(state): State<AppState>, jar: CookieJar, Form(form): Form<NewAccount>) -> Response {
    run_cycle(state, jar, Interaction::register(form)).await
}

/// `POST /logout` — end the session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    run_cycle(state, jar, Interaction::logout()).await
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
