//! Service worker registration script

use std::path::PathBuf;
use tracing::info;

use crate::error::PwaResult;
use crate::plugin::PwaBuild;
use crate::writer::{write_output, EmittedFile};

/// Registration script filename, written at the output root
pub const REGISTRATION_FILENAME: &str = "service-worker-registration.js";

/// Service worker filename, written at the output root
pub const SERVICE_WORKER_FILENAME: &str = "service-worker.js";

const REGISTRATION_TEMPLATE: &str = r#"'use strict';

if ('serviceWorker' in navigator) {
  window.addEventListener('load', function() {
    navigator.serviceWorker.register(__SERVICE_WORKER_URL__).then(function(registration) {
      registration.onupdatefound = function() {
        var installingWorker = registration.installing;
        if (!installingWorker) {
          return;
        }
        installingWorker.onstatechange = function() {
          if (installingWorker.state !== 'installed') {
            return;
          }
          if (navigator.serviceWorker.controller) {
            console.log('New content is available; please refresh.');
          } else {
            console.log('Content is cached for offline use.');
          }
        };
      };
    }).catch(function(error) {
      console.error('Error during service worker registration:', error);
    });
  });
}
"#;

/// Build the script that registers `{public_path}service-worker.js`
pub fn build_registration_script(public_path: &str) -> String {
    let url = format!("{public_path}{SERVICE_WORKER_FILENAME}");
    // JSON string syntax is a valid JS string literal
    let literal = serde_json::Value::String(url).to_string();
    REGISTRATION_TEMPLATE.replace("__SERVICE_WORKER_URL__", &literal)
}

pub(crate) async fn write_registration(build: &PwaBuild) -> PwaResult<PathBuf> {
    let contents = match &build.config.registration_script {
        Some(script) => script.clone(),
        None => build_registration_script(&build.paths.public_path),
    };
    let file = EmittedFile::new(&build.paths.dir, REGISTRATION_FILENAME, contents);
    let written = write_output(build.fs(), &file).await?;
    info!("wrote {}", REGISTRATION_FILENAME);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_public_path_url() {
        let script = build_registration_script("/");
        assert!(script.contains(r#"navigator.serviceWorker.register("/service-worker.js")"#));
    }

    #[test]
    fn test_custom_public_path() {
        let script = build_registration_script("https://cdn.example.com/app/");
        assert!(script.contains(r#"register("https://cdn.example.com/app/service-worker.js")"#));
    }

    #[test]
    fn test_public_path_is_escaped() {
        let script = build_registration_script("/a\"b/");
        assert!(script.contains(r#"register("/a\"b/service-worker.js")"#));
    }
}
