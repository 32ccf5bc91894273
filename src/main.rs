mod assets;
mod branding;
mod config;
mod page;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::credentials::JsonCredentialStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();

    // The logo is required; without it no page can be rendered.
    let logo = match assets::load_asset(&config.logo_path) {
        Ok(logo) => logo,
        Err(e) => {
            tracing::error!(error = %e, "logo load failed");
            std::process::exit(1);
        }
    };

    let store = Arc::new(JsonCredentialStore::new(config.credentials_path.clone()));
    tracing::info!(
        credentials = %store.path().display(),
        company = %config.widget.company_name,
        auth_token_set = !config.widget.auth_token.is_empty(),
        "auth gate configured"
    );

    let port = config.port;
    let state = state::AppState::new(config, logo, store);

    // Spawn background session expiry sweep.
    let _sweeper = state.sessions.spawn_sweeper();

    let app = routes::app(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %port, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, "impactlytics listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
