//! Service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every setting has a default matching the deployed page, so an empty
//! environment yields a working service. Unparseable values fall back to the
//! default instead of failing startup.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOGO_PATH: &str = "img/usc.png";
pub const DEFAULT_CREDENTIALS_PATH: &str = "_secret_auth_.json";
pub const DEFAULT_AUTH_TOKEN: &str = "courier_auth_token";
pub const DEFAULT_COMPANY_NAME: &str = "Shims";
pub const DEFAULT_LOGIN_BOX_WIDTH: u32 = 200;
pub const DEFAULT_LOGIN_BOX_HEIGHT: u32 = 250;
pub const DEFAULT_LOGOUT_BUTTON_NAME: &str = "Logout";
pub const DEFAULT_LOTTIE_URL: &str = "https://assets2.lottiefiles.com/packages/lf20_jcikwtux.json";
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

// =============================================================================
// AUTH WIDGET CONFIG
// =============================================================================

/// Construction parameters for the login widget. Pure pass-through: the gate
/// only displays or toggles on these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthWidgetConfig {
    /// Identifier of the external credential/notification service.
    pub auth_token: String,
    /// Branding string shown on the login box.
    pub company_name: String,
    /// Login box width in pixels.
    pub width: u32,
    /// Login box height in pixels.
    pub height: u32,
    pub logout_button_name: String,
    pub hide_menu_bool: bool,
    pub hide_footer_bool: bool,
    /// Animation asset shown beside the login form.
    pub lottie_url: String,
}

impl Default for AuthWidgetConfig {
    fn default() -> Self {
        Self {
            auth_token: DEFAULT_AUTH_TOKEN.into(),
            company_name: DEFAULT_COMPANY_NAME.into(),
            width: DEFAULT_LOGIN_BOX_WIDTH,
            height: DEFAULT_LOGIN_BOX_HEIGHT,
            logout_button_name: DEFAULT_LOGOUT_BUTTON_NAME.into(),
            hide_menu_bool: false,
            hide_footer_bool: false,
            lottie_url: DEFAULT_LOTTIE_URL.into(),
        }
    }
}

impl AuthWidgetConfig {
    /// Read widget parameters from the environment.
    ///
    /// Optional:
    /// - `AUTH_TOKEN`, `COMPANY_NAME`, `LOGOUT_BUTTON_NAME`, `LOTTIE_URL`
    /// - `LOGIN_BOX_WIDTH`, `LOGIN_BOX_HEIGHT`: pixels
    /// - `HIDE_MENU`, `HIDE_FOOTER`: `1/true/yes/on` or `0/false/no/off`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_token: env_string("AUTH_TOKEN", &defaults.auth_token),
            company_name: env_string("COMPANY_NAME", &defaults.company_name),
            width: env_parse("LOGIN_BOX_WIDTH", defaults.width),
            height: env_parse("LOGIN_BOX_HEIGHT", defaults.height),
            logout_button_name: env_string("LOGOUT_BUTTON_NAME", &defaults.logout_button_name),
            hide_menu_bool: env_bool("HIDE_MENU").unwrap_or(defaults.hide_menu_bool),
            hide_footer_bool: env_bool("HIDE_FOOTER").unwrap_or(defaults.hide_footer_bool),
            lottie_url: env_string("LOTTIE_URL", &defaults.lottie_url),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub logo_path: PathBuf,
    pub credentials_path: PathBuf,
    /// Sessions untouched for this long fall back to logged out.
    pub session_idle_ttl: Duration,
    pub cookie_secure: bool,
    pub widget: AuthWidgetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
            cookie_secure: false,
            widget: AuthWidgetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build the service config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `LOGO_PATH`: default `img/usc.png`
    /// - `CREDENTIALS_PATH`: default `_secret_auth_.json`
    /// - `SESSION_IDLE_TTL_SECS`: default 30 days
    /// - `COOKIE_SECURE`: default false
    /// - everything read by [`AuthWidgetConfig::from_env`]
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            logo_path: env_string("LOGO_PATH", DEFAULT_LOGO_PATH).into(),
            credentials_path: env_string("CREDENTIALS_PATH", DEFAULT_CREDENTIALS_PATH).into(),
            session_idle_ttl: Duration::from_secs(env_parse("SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS)),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            widget: AuthWidgetConfig::from_env(),
        }
    }
}

// =============================================================================
// ENV HELPERS
// =============================================================================

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
