//! Sidebar branding: logo, title, and descriptive text blocks.
//!
//! Text blocks are markdown. Inline HTML inside them is passed through
//! untouched; callers own the content.

use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as cmark_html};

use crate::assets::EncodedAsset;

pub const APP_TITLE: &str = "Impactlytics - Testing App";

const OVERVIEW: &str = "This research overcomes limitations of prior correlational studies by using a formal causal \
framework and experimental data from platform APIs. Impactlytics reveals true cause-effect links between content \
features and performance, bridging behavioral theory and practical optimization.";

const SPONSORSHIP: &str = "Sponsored by **USC Marshall**.";

const AUTHORIZED_NOTICE: &str = "only **Authorized** USC users can access this app.";

const LOGO_WIDTH: u32 = 250;
const LOGO_HEIGHT: u32 = 100;
const LOGO_STYLE: &str = "border-radius: 20px; box-shadow: 0px 4px 12px rgba(0,0,0,0.1);";

/// Static strings shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub title: String,
    /// Markdown.
    pub description: String,
    /// Markdown.
    pub sponsorship: String,
    /// Markdown, rendered after the auth widget.
    pub authorized_notice: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: APP_TITLE.into(),
            description: OVERVIEW.into(),
            sponsorship: SPONSORSHIP.into(),
            authorized_notice: AUTHORIZED_NOTICE.into(),
        }
    }
}

/// Logo (fixed box, rounded corners), then title, description and sponsorship.
#[must_use]
pub fn render_sidebar_branding(branding: &Branding, logo: &EncodedAsset) -> Markup {
    html! {
        div.logo style="text-align: center; padding-bottom: 1rem;" {
            img src=(logo.data_uri()) alt="Logo" width=(LOGO_WIDTH) height=(LOGO_HEIGHT) style=(LOGO_STYLE);
        }
        h1.sidebar-title { (branding.title) }
        div.sidebar-text { (render_markdown(&branding.description)) }
        div.sidebar-text { (render_markdown(&branding.sponsorship)) }
    }
}

#[must_use]
pub fn render_authorized_notice(branding: &Branding) -> Markup {
    html! {
        div.sidebar-text.authorized-notice { (render_markdown(&branding.authorized_notice)) }
    }
}

/// Render a markdown block to HTML. Raw HTML in the source is kept verbatim.
#[must_use]
pub fn render_markdown(source: &str) -> PreEscaped<String> {
    let parser = Parser::new(source.trim());
    let mut out = String::with_capacity(source.len() * 2);
    cmark_html::push_html(&mut out, parser);
    PreEscaped(out)
}

#[cfg(test)]
#[path = "branding_test.rs"]
mod tests;
