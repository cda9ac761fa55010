//! Host build lifecycle
//!
//! The plugin does not own a build. A [`BuildHost`] supplies the project
//! context, the output configuration and filesystem, and a compile step that
//! emits assets and pushes every generated HTML document through the
//! [`HtmlHooks`] it is handed. [`FobPwaPlugin::run`] drives the phases in
//! order around that compile step.
//!
//! [`FobPwaPlugin::run`]: crate::FobPwaPlugin::run

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{slash_path, OutputOptions};
use crate::error::{PwaError, PwaResult};
use crate::fs::{NativeFileSystem, OutputFileSystem};
use crate::writer::{write_output, EmittedFile};

/// Build lifecycle phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Build inputs are prepared; icons and the registration script are written
    Make,
    /// The host emits its assets and generates HTML
    Compilation,
    /// Every asset has been written; the service worker is generated
    AfterEmit,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Make => "make",
            Phase::Compilation => "compilation",
            Phase::AfterEmit => "after-emit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the host exposes to the plugin
#[derive(Debug, Clone)]
pub struct HostContext {
    /// Project root, used to locate package.json and relative source images
    pub context: PathBuf,
    pub output: OutputOptions,
    pub fs: Arc<dyn OutputFileSystem>,
}

impl HostContext {
    pub fn new(
        context: impl Into<PathBuf>,
        output: OutputOptions,
        fs: Arc<dyn OutputFileSystem>,
    ) -> Self {
        Self {
            context: context.into(),
            output,
            fs,
        }
    }
}

/// One HTML document passing through the host's HTML pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPluginData {
    pub html: String,
    /// Output filename of the document, relative to the output directory
    pub output_name: String,
    /// Set to `false` to keep favicon tags out of this document
    pub favicons: bool,
}

impl HtmlPluginData {
    pub fn new(html: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            output_name: output_name.into(),
            favicons: true,
        }
    }
}

/// Textual interception points of the HTML pipeline
pub trait HtmlHooks: Send + Sync {
    /// Runs before the document is serialized
    fn before_html_processing(&self, data: &mut HtmlPluginData);

    /// Runs after the document is serialized
    fn after_html_processing(&self, data: &mut HtmlPluginData);
}

/// A build the plugin attaches to
#[async_trait]
pub trait BuildHost: Send + Sync {
    fn context(&self) -> HostContext;

    /// Emit the host's assets, running `hooks` over every generated HTML document
    async fn compile(&self, hooks: Option<&dyn HtmlHooks>) -> PwaResult<()>;
}

/// Host over an output directory that has already been built
///
/// Compilation rewrites every `*.html` file below the output directory in
/// place. Documents are read from disk and written back through the host
/// filesystem. A relative output directory is taken from `context`.
#[derive(Debug, Clone)]
pub struct StaticDirHost {
    context: PathBuf,
    output: OutputOptions,
    fs: Arc<dyn OutputFileSystem>,
}

impl StaticDirHost {
    pub fn new(context: impl Into<PathBuf>, mut output: OutputOptions) -> Self {
        let context = context.into();
        if output.path.is_relative() {
            output.path = context.join(&output.path);
        }
        Self {
            context,
            output,
            fs: Arc::new(NativeFileSystem::new()),
        }
    }

    /// Route writes through `fs` instead of the disk
    pub fn with_fs(mut self, fs: Arc<dyn OutputFileSystem>) -> Self {
        self.fs = fs;
        self
    }
}

#[async_trait]
impl BuildHost for StaticDirHost {
    fn context(&self) -> HostContext {
        HostContext::new(&self.context, self.output.clone(), Arc::clone(&self.fs))
    }

    async fn compile(&self, hooks: Option<&dyn HtmlHooks>) -> PwaResult<()> {
        let Some(hooks) = hooks else {
            debug!("no html hooks registered, leaving documents untouched");
            return Ok(());
        };

        let root = self.output.path.clone();
        let documents = tokio::task::spawn_blocking(move || html_documents(&root))
            .await
            .map_err(|e| PwaError::Host(e.to_string()))??;

        for path in documents {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| PwaError::Host(format!("{}: {e}", path.display())))?;
            let name = path.strip_prefix(&self.output.path).unwrap_or(&path);
            let html = String::from_utf8(bytes)
                .map_err(|e| PwaError::Host(format!("{} is not valid UTF-8: {e}", path.display())))?;
            let mut data = HtmlPluginData::new(html, slash_path(name));

            hooks.before_html_processing(&mut data);
            hooks.after_html_processing(&mut data);

            let file = EmittedFile::new(&self.output.path, data.output_name, data.html);
            write_output(self.fs.as_ref(), &file).await?;
        }
        Ok(())
    }
}

/// Every `*.html` file below `root`, sorted
fn html_documents(root: &Path) -> PwaResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(PwaError::Host(format!(
            "output directory {} does not exist",
            root.display()
        )));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| PwaError::Host(e.to_string()))?;
        let is_html = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        if entry.file_type().is_file() && is_html {
            documents.push(entry.into_path());
        }
    }
    documents.sort();
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use std::fs;
    use tempfile::TempDir;

    struct Marker;

    impl HtmlHooks for Marker {
        fn before_html_processing(&self, data: &mut HtmlPluginData) {
            data.html.push_str("<!--before-->");
        }

        fn after_html_processing(&self, data: &mut HtmlPluginData) {
            data.html.push_str("<!--after-->");
        }
    }

    #[test]
    fn test_phase_order() {
        assert!(Phase::Make < Phase::Compilation);
        assert!(Phase::Compilation < Phase::AfterEmit);
        assert_eq!(Phase::AfterEmit.to_string(), "after-emit");
    }

    #[test]
    fn test_html_documents() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("index.html"), "").unwrap();
        fs::write(dir.path().join("docs/guide.HTML"), "").unwrap();
        fs::write(dir.path().join("app.js"), "").unwrap();

        let found = html_documents(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("docs/guide.HTML"), dir.path().join("index.html")]
        );
    }

    #[test]
    fn test_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let err = html_documents(&dir.path().join("dist")).unwrap_err();
        assert!(matches!(err, PwaError::Host(_)));
    }

    #[tokio::test]
    async fn test_compile_runs_hooks_in_place() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>").unwrap();

        let host = StaticDirHost::new(dir.path(), OutputOptions::new(dir.path()));
        host.compile(Some(&Marker)).await.unwrap();

        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(html, "<html><!--before--><!--after-->");
    }

    #[tokio::test]
    async fn test_compile_routes_writes_through_fs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>").unwrap();
        let memory = Arc::new(MemoryFileSystem::new());

        let host = StaticDirHost::new(dir.path(), OutputOptions::new(dir.path()))
            .with_fs(memory.clone());
        host.compile(Some(&Marker)).await.unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("index.html")).unwrap(),
            "<html>"
        );
        assert_eq!(
            memory.get_string(dir.path().join("index.html")).unwrap(),
            "<html><!--before--><!--after-->"
        );
    }

    #[tokio::test]
    async fn test_compile_without_hooks() {
        let dir = TempDir::new().unwrap();
        let host = StaticDirHost::new(dir.path(), OutputOptions::new(dir.path().join("missing")));
        host.compile(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_compile_rejects_non_utf8_documents() {
        let dir = TempDir::new().unwrap();
        let bytes = b"<html>\xff\xfe</html>";
        fs::write(dir.path().join("index.html"), bytes).unwrap();

        let host = StaticDirHost::new(dir.path(), OutputOptions::new(dir.path()));
        let err = host.compile(Some(&Marker)).await.unwrap_err();

        assert!(matches!(err, PwaError::Host(_)));
        assert_eq!(fs::read(dir.path().join("index.html")).unwrap(), bytes);
    }

    #[test]
    fn test_relative_output_is_taken_from_context() {
        let host = StaticDirHost::new("/project", OutputOptions::new("dist"));
        assert_eq!(host.context().output.path, Path::new("/project/dist"));

        let host = StaticDirHost::new("/project", OutputOptions::new("/srv/site"));
        assert_eq!(host.context().output.path, Path::new("/srv/site"));
    }
}
