//! HTML injection
//!
//! Splices the cached favicon tags before the first `</head>` and the
//! registration script tag before the first `</body>`. Matching is
//! case-insensitive and only the first occurrence is touched. A document that
//! already carries the exact tags is left alone, so rewriting an output
//! directory twice does not duplicate them.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::host::{HtmlHooks, HtmlPluginData};

static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body>").unwrap());

/// Insert `insertion` immediately before the first match of `marker`.
///
/// Returns `false` and leaves `html` untouched when there is no match.
fn splice_before(html: &mut String, marker: &Regex, insertion: &str) -> bool {
    match marker.find(html) {
        Some(m) => {
            html.insert_str(m.start(), insertion);
            true
        }
        None => false,
    }
}

/// Splice `snippets` before the first `</head>`
pub fn inject_favicons(html: &mut String, snippets: &[String]) -> bool {
    if snippets.is_empty() {
        return false;
    }
    splice_before(html, &HEAD_CLOSE, &snippets.concat())
}

/// Splice `script` before the first `</body>`
pub fn inject_script(html: &mut String, script: &str) -> bool {
    splice_before(html, &BODY_CLOSE, script)
}

/// Script tag that loads `{public_path}{filename}`
pub fn script_tag(public_path: &str, filename: &str) -> String {
    format!("<script type=text/javascript src={public_path}{filename}></script>\n")
}

/// [`HtmlHooks`] implementation driven by the results of the make phase
#[derive(Debug, Clone, Default)]
pub struct HtmlInjector {
    favicon_html: Vec<String>,
    script_tag: Option<String>,
}

impl HtmlInjector {
    pub fn new(favicon_html: Vec<String>, script_tag: Option<String>) -> Self {
        Self {
            favicon_html,
            script_tag,
        }
    }
}

impl HtmlHooks for HtmlInjector {
    fn before_html_processing(&self, data: &mut HtmlPluginData) {
        if !data.favicons {
            debug!("favicon injection disabled for {}", data.output_name);
            return;
        }
        if !self.favicon_html.is_empty() && data.html.contains(&self.favicon_html.concat()) {
            debug!("favicon tags already present in {}", data.output_name);
            return;
        }
        if inject_favicons(&mut data.html, &self.favicon_html) {
            debug!("injected favicon tags into {}", data.output_name);
        }
    }

    fn after_html_processing(&self, data: &mut HtmlPluginData) {
        let Some(tag) = &self.script_tag else {
            return;
        };
        if data.html.contains(tag.as_str()) {
            debug!("registration script already present in {}", data.output_name);
            return;
        }
        if inject_script(&mut data.html, tag) {
            debug!("injected registration script into {}", data.output_name);
        }
    }
}
