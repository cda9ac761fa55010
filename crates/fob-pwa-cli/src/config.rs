//! CLI configuration loading.
//!
//! Sources, lowest to highest priority:
//!
//! 1. built-in defaults
//! 2. `pwa.config.json` in the working directory, or the file given with `--config`
//! 3. `FOB_PWA_*` environment variables (`FOB_PWA_PUBLIC_PATH`, `FOB_PWA_FAVICON_IMAGE`, ...)
//! 4. command-line flags
//!
//! Plugin options sit at the top level of the file next to the CLI's own
//! `outDir`, `context` and `publicPath` keys.

use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use fob_plugin_pwa::{OutputOptions, PwaOptions};
use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::PwaArgs;
use crate::error::{CliError, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "pwa.config.json";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FOB_PWA_";

const DEFAULT_OUT_DIR: &str = "dist";

/// Effective CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Output directory of the existing build (default: dist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Project root (default: the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    #[serde(flatten)]
    pub pwa: PwaOptions,
}

impl CliConfig {
    /// Load configuration from every source.
    /// Priority: CLI args > environment variables > config file > defaults
    pub fn load(args: &PwaArgs, cwd: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match &args.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(CliError::config(
                        format!("config file not found: {}", path.display()),
                        "Check the path passed to --config",
                    ));
                }
                Some(path)
            }
            None => Some(cwd.join(CONFIG_FILE)).filter(|p| p.is_file()),
        };

        if let Some(path) = config_file {
            tracing::debug!("loading config from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| camel_case(key.as_str()).into()),
        );

        figment = figment.merge(Serialized::defaults(Self::from_args(args)));

        let mut config: Self = figment.extract().map_err(|e| {
            CliError::config(
                e.to_string(),
                format!("Check {CONFIG_FILE} syntax and {ENV_PREFIX}* variables"),
            )
        })?;
        config.anchor(cwd);
        Ok(config)
    }

    /// Only the flags that were given, so unset flags never mask other sources
    fn from_args(args: &PwaArgs) -> Self {
        let mut pwa = PwaOptions::new();
        if let Some(image) = &args.favicon_image {
            pwa = pwa.with_favicon_image(image);
        }
        if args.no_favicon {
            pwa = pwa.with_favicon(false);
        }
        if args.no_service_worker {
            pwa = pwa.with_service_worker(false);
        }
        if args.no_inject {
            pwa = pwa.with_inject_html_tags(false);
        }

        Self {
            out_dir: args.dir.clone(),
            context: args.context.clone(),
            public_path: args.public_path.clone(),
            pwa,
        }
    }

    /// Resolve relative directories against `cwd`
    fn anchor(&mut self, cwd: &Path) {
        self.context = Some(match &self.context {
            Some(context) => cwd.join(context),
            None => cwd.to_path_buf(),
        });
        let out_dir = cwd.join(self.out_dir.as_deref().unwrap_or(Path::new(DEFAULT_OUT_DIR)));
        self.out_dir = Some(out_dir);
    }

    pub fn context_dir(&self) -> PathBuf {
        self.context.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn output(&self) -> OutputOptions {
        let dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
        let output = OutputOptions::new(dir);
        match &self.public_path {
            Some(public_path) => output.with_public_path(public_path),
            None => output,
        }
    }
}

/// `SHOULD_CREATE_FAVICON` → `shouldCreateFavicon`
fn camel_case(key: &str) -> String {
    key.to_lower_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("SHOULD_CREATE_FAVICON"), "shouldCreateFavicon");
        assert_eq!(camel_case("public_path"), "publicPath");
        assert_eq!(camel_case("CONTEXT"), "context");
        assert_eq!(camel_case("FAVICON_IMAGE"), "faviconImage");
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(&PwaArgs::default(), dir.path()).unwrap();

        assert_eq!(config.context_dir(), dir.path());
        assert_eq!(config.output().path, dir.path().join("dist"));
        assert_eq!(config.output().public_path, None);
        assert!(config.pwa.should_create_favicon.is_none());
    }

    #[test]
    fn test_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{
                "outDir": "public",
                "publicPath": "/app/",
                "shouldCreateFavicon": false,
                "faviconConfig": { "appName": "Notes" }
            }"#,
        )
        .unwrap();

        let config = CliConfig::load(&PwaArgs::default(), dir.path()).unwrap();
        assert_eq!(config.output().path, dir.path().join("public"));
        assert_eq!(config.public_path.as_deref(), Some("/app/"));
        assert_eq!(config.pwa.should_create_favicon, Some(false));
        assert_eq!(
            config.pwa.favicon_config,
            Some(serde_json::json!({ "appName": "Notes" }))
        );
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "outDir": "public", "publicPath": "/app/", "injectHtmlTags": true }"#,
        )
        .unwrap();
        let args = PwaArgs {
            dir: Some(PathBuf::from("site")),
            no_inject: true,
            ..PwaArgs::default()
        };

        let config = CliConfig::load(&args, dir.path()).unwrap();
        assert_eq!(config.output().path, dir.path().join("site"));
        assert_eq!(config.public_path.as_deref(), Some("/app/"));
        assert_eq!(config.pwa.inject_html_tags, Some(false));
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("custom.json"), r#"{ "outDir": "www" }"#).unwrap();
        let args = PwaArgs {
            config: Some(PathBuf::from("custom.json")),
            ..PwaArgs::default()
        };

        let config = CliConfig::load(&args, dir.path()).unwrap();
        assert_eq!(config.output().path, dir.path().join("www"));
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let args = PwaArgs {
            config: Some(PathBuf::from("nope.json")),
            ..PwaArgs::default()
        };
        assert!(matches!(
            CliConfig::load(&args, dir.path()),
            Err(CliError::Config { .. })
        ));
    }

    #[test]
    fn test_invalid_value() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "shouldCreateFavicon": "sometimes" }"#,
        )
        .unwrap();
        assert!(CliConfig::load(&PwaArgs::default(), dir.path()).is_err());
    }
}
