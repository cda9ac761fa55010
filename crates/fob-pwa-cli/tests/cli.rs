//! End-to-end tests for the fob-pwa binary.

use assert_cmd::Command;
use image::{Rgba, RgbaImage};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INDEX: &str = "<!doctype html><html><head><title>site</title></head><body><h1>hi</h1></body></html>";

fn fob_pwa(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fob-pwa").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

/// A project with a built `dist/` and a source logo
fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("index.html"), INDEX).unwrap();
    fs::write(dist.join("app.js"), "console.log('app')").unwrap();
    fs::write(
        temp.path().join("package.json"),
        r#"{ "name": "field-notes", "description": "Notes from the field" }"#,
    )
    .unwrap();
    RgbaImage::from_pixel(64, 64, Rgba([20, 120, 200, 255]))
        .save(temp.path().join("logo.png"))
        .unwrap();
    temp
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    fob_pwa(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_build_generates_every_asset() {
    let temp = project();
    let dist = temp.path().join("dist");

    fob_pwa(temp.path())
        .args(["build", "--favicon-image", "logo.png"])
        .assert()
        .success()
        .stderr(predicate::str::contains("service-worker.js"));

    for file in [
        "icons/favicon.ico",
        "icons/favicon-16x16.png",
        "icons/favicon-32x32.png",
        "icons/android-chrome-192x192.png",
        "icons/apple-touch-icon.png",
        "manifest.json",
        "service-worker-registration.js",
        "service-worker.js",
    ] {
        assert!(dist.join(file).is_file(), "missing {file}");
    }
    assert!(!dist.join("icons/manifest.json").exists());

    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(html.contains(r#"<link rel="manifest" href="/manifest.json">"#));
    assert!(html.contains(r#"<link rel="shortcut icon" href="/icons/favicon.ico">"#));
    assert!(html.contains(r#"content="default""#));
    assert!(!html.contains("black-translucent"));
    assert!(html.contains(
        "<script type=text/javascript src=/service-worker-registration.js></script>\n</body>"
    ));

    let manifest = fs::read_to_string(dist.join("manifest.json")).unwrap();
    assert!(manifest.contains("field-notes"));

    let worker = fs::read_to_string(dist.join("service-worker.js")).unwrap();
    assert!(worker.contains(r#""app.js""#));
    assert!(worker.contains(r#""index.html""#));
}

#[test]
fn test_build_without_image_fails() {
    let temp = project();

    fob_pwa(temp.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Path to image file is required in options.faviconImage",
        ));

    let dist = temp.path().join("dist");
    assert!(!dist.join("service-worker-registration.js").exists());
    assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), INDEX);
}

#[test]
fn test_build_without_favicons() {
    let temp = project();
    let dist = temp.path().join("dist");

    fob_pwa(temp.path())
        .args(["build", "--no-favicon", "--public-path", "/app/"])
        .assert()
        .success();

    assert!(!dist.join("icons").exists());
    assert!(dist.join("service-worker.js").is_file());
    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(html.contains("<title>site</title></head>"));
    assert!(html.contains("src=/app/service-worker-registration.js"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = project();
    let dist = temp.path().join("dist");

    fob_pwa(temp.path())
        .args(["build", "--favicon-image", "logo.png", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dry run"))
        .stderr(predicate::str::contains("manifest.json"));

    assert!(!dist.join("icons").exists());
    assert!(!dist.join("service-worker.js").exists());
    assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), INDEX);
}

#[test]
fn test_missing_output_dir() {
    let temp = TempDir::new().unwrap();

    fob_pwa(temp.path())
        .args(["build", "out", "--no-favicon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output directory not found"));
}

#[test]
fn test_config_file_and_env() {
    let temp = project();
    fs::write(
        temp.path().join("pwa.config.json"),
        r#"{ "shouldCreateFavicon": false, "publicPath": "/from-file/" }"#,
    )
    .unwrap();

    fob_pwa(temp.path())
        .arg("build")
        .env("FOB_PWA_PUBLIC_PATH", "/from-env/")
        .assert()
        .success();

    let html = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
    assert!(html.contains("src=/from-env/service-worker-registration.js"));
}

#[test]
fn test_config_command_prints_effective_config() {
    let temp = project();

    fob_pwa(temp.path())
        .args(["config", "--favicon-image", "logo.png", "--no-inject"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""appName": "field-notes""#))
        .stdout(predicate::str::contains(r#""appDescription": "Notes from the field""#))
        .stdout(predicate::str::contains(r#""injectHtmlTags": false"#))
        .stdout(predicate::str::contains(r#""navigateFallback": "/index.html""#));
}
