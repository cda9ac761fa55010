//! Icon pipeline
//!
//! Runs the icon generator, rewrites the tags it returns and writes every
//! generated asset. Images and auxiliary files land in the icons directory,
//! except the web app manifest which goes to the output root so it is served
//! from a stable top-level URL.

use futures::future::try_join_all;
use std::path::PathBuf;
use tracing::info;

use crate::config::{OutputPaths, ICONS_PATH};
use crate::error::{PwaError, PwaResult};
use crate::generator::IconSet;
use crate::plugin::PwaBuild;
use crate::writer::{write_output, EmittedFile};

const MANIFEST_FILE: &str = "manifest.json";
const TRANSLUCENT_STATUS_BAR: &str = "black-translucent";
const DEFAULT_STATUS_BAR: &str = "default";

/// Result of the icon pipeline
#[derive(Debug, Clone, Default)]
pub struct IconOutput {
    /// Post-processed head tags, in generator order
    pub html: Vec<String>,
    /// Paths written, in completion order
    pub written: Vec<PathBuf>,
}

pub(crate) async fn make_icons(build: &PwaBuild) -> PwaResult<IconOutput> {
    let source = build
        .config
        .favicon_image
        .as_deref()
        .ok_or(PwaError::MissingFaviconImage)?;

    let mut favicon_config = build.config.favicon_config.clone();
    favicon_config.path = ICONS_PATH.to_string();

    let set = build
        .icon_generator()
        .generate(source, &favicon_config)
        .await
        .map_err(PwaError::IconGenerator)?;

    let html = process_snippets(&set.html, ICONS_PATH);
    let files = icon_files(set, &build.paths);
    let fs = build.fs();
    let written = try_join_all(files.iter().map(|file| write_output(fs, file))).await?;

    info!("generated {} icon assets", written.len());
    Ok(IconOutput { html, written })
}

/// Place every generated image and file in the output tree
pub fn icon_files(set: IconSet, paths: &OutputPaths) -> Vec<EmittedFile> {
    let icons_dir = paths.icons_dir();
    let images = set
        .images
        .into_iter()
        .map(|image| EmittedFile::new(&icons_dir, image.name, image.contents));
    let files = set.files.into_iter().map(|file| {
        let dir = if file.name.contains(MANIFEST_FILE) {
            &paths.dir
        } else {
            &icons_dir
        };
        EmittedFile::new(dir, file.name, file.contents)
    });
    images.chain(files).collect()
}

pub fn process_snippets(snippets: &[String], icons_path: &str) -> Vec<String> {
    snippets
        .iter()
        .map(|snippet| process_snippet(snippet, icons_path))
        .collect()
}

/// Rewrite one head tag.
///
/// A tag referencing the web app manifest loses the icons directory from its
/// URL. A translucent Apple status bar becomes the default style. Anything
/// else is returned unchanged.
pub fn process_snippet(snippet: &str, icons_path: &str) -> String {
    if let Some(idx) = snippet.find(MANIFEST_FILE) {
        return strip_icons_dir(snippet, idx, icons_path);
    }
    if snippet.contains(TRANSLUCENT_STATUS_BAR) {
        return snippet.replace(TRANSLUCENT_STATUS_BAR, DEFAULT_STATUS_BAR);
    }
    snippet.to_string()
}

fn strip_icons_dir(snippet: &str, manifest_idx: usize, icons_path: &str) -> String {
    let dir = icons_path.trim_matches('/');
    if dir.is_empty() {
        return snippet.to_string();
    }
    // "/icons/" preceding the file name; removing "icons/" keeps the leading slash
    let segment = format!("/{dir}/");
    let mut head = &snippet[..manifest_idx];
    while head.ends_with(&segment) {
        head = &head[..head.len() - (segment.len() - 1)];
    }
    format!("{head}{}", &snippet[manifest_idx..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputOptions;
    use crate::generator::{IconFile, IconImage};
    use proptest::prelude::*;

    #[test]
    fn test_manifest_link_loses_icons_dir() {
        assert_eq!(
            process_snippet(r#"<link rel="manifest" href="/icons/manifest.json">"#, "/icons"),
            r#"<link rel="manifest" href="/manifest.json">"#
        );
    }

    #[test]
    fn test_status_bar_rewritten() {
        assert_eq!(
            process_snippet("<meta name=x content=black-translucent>", "/icons"),
            "<meta name=x content=default>"
        );
    }

    #[test]
    fn test_unrelated_snippet_untouched() {
        let snippet = r#"<link rel="icon" type="image/png" sizes="32x32" href="/icons/favicon-32x32.png">"#;
        assert_eq!(process_snippet(snippet, "/icons"), snippet);
    }

    #[test]
    fn test_manifest_rule_takes_precedence() {
        let snippet = r#"<link href="/icons/manifest.json" data-x="black-translucent">"#;
        assert_eq!(
            process_snippet(snippet, "/icons"),
            r#"<link href="/manifest.json" data-x="black-translucent">"#
        );
    }

    #[test]
    fn test_repeated_icons_dir_collapses() {
        assert_eq!(
            process_snippet(r#"<link href="/icons/icons/manifest.json">"#, "/icons"),
            r#"<link href="/manifest.json">"#
        );
    }

    #[test]
    fn test_icon_files_routing() {
        let paths = OutputPaths::resolve(&OutputOptions::new("/out"));
        let set = IconSet {
            images: vec![IconImage {
                name: "favicon.ico".to_string(),
                contents: vec![1],
            }],
            files: vec![
                IconFile {
                    name: "manifest.json".to_string(),
                    contents: "{}".to_string(),
                },
                IconFile {
                    name: "browserconfig.xml".to_string(),
                    contents: "<x/>".to_string(),
                },
            ],
            html: vec![],
        };

        let placed: Vec<PathBuf> = icon_files(set, &paths).iter().map(|f| f.path()).collect();
        assert_eq!(
            placed,
            vec![
                PathBuf::from("/out/icons/favicon.ico"),
                PathBuf::from("/out/manifest.json"),
                PathBuf::from("/out/icons/browserconfig.xml"),
            ]
        );
    }

    fn snippet_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z<>=\" /-]{0,40}",
            "[a-z ]{0,10}".prop_map(|s| format!("<link {s} href=\"/icons/manifest.json\">")),
            "[a-z ]{0,10}".prop_map(|s| format!("<meta {s} content=black-translucent>")),
            Just("<link href=\"/icons/icons/manifest.json\">".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_processing_is_idempotent(snippet in snippet_strategy()) {
            let once = process_snippet(&snippet, "/icons");
            let twice = process_snippet(&once, "/icons");
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_processing_preserves_order(
            snippets in prop::collection::vec(snippet_strategy(), 0..12)
        ) {
            let processed = process_snippets(&snippets, "/icons");
            prop_assert_eq!(processed.len(), snippets.len());
            for (original, rewritten) in snippets.iter().zip(&processed) {
                prop_assert_eq!(rewritten, &process_snippet(original, "/icons"));
            }
        }
    }
}
