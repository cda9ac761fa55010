//! Built-in icon generator backed by the `image` crate

use async_trait::async_trait;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use serde_json::json;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use super::{IconFile, IconGenerator, IconImage, IconSet};
use crate::config::FaviconConfig;
use crate::error::GeneratorError;

const FAVICON_SIZES: [u32; 2] = [16, 32];
const ICO_SIZES: [u32; 3] = [16, 32, 48];
const ANDROID_SIZES: [u32; 2] = [192, 512];
const APPLE_TOUCH_SIZE: u32 = 180;
const MSTILE_SIZE: u32 = 150;

/// Renders favicons, Android and Apple icons from a single raster image
///
/// Supports the `favicons`, `android`, `appleIcon` and `windows` targets. Any
/// other enabled target is skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct RasterIconGenerator;

impl RasterIconGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IconGenerator for RasterIconGenerator {
    async fn generate(
        &self,
        source: &Path,
        config: &FaviconConfig,
    ) -> Result<IconSet, GeneratorError> {
        let bytes = tokio::fs::read(source)
            .await
            .map_err(|e| GeneratorError::source_image(source, e))?;
        let config = config.clone();

        tokio::task::spawn_blocking(move || render(&bytes, &config))
            .await
            .map_err(|e| GeneratorError::Join(e.to_string()))?
    }
}

fn render(bytes: &[u8], config: &FaviconConfig) -> Result<IconSet, GeneratorError> {
    let img = image::load_from_memory(bytes).map_err(GeneratorError::image)?;
    let targets = config.icons;
    let mut set = IconSet::default();

    if targets.favicons {
        for size in FAVICON_SIZES.iter().rev() {
            let name = format!("favicon-{size}x{size}.png");
            set.html.push(format!(
                r#"<link rel="icon" type="image/png" sizes="{size}x{size}" href="{}">"#,
                href(config, &name)
            ));
            set.images.push(IconImage {
                contents: encode_png(&img, *size)?,
                name,
            });
        }
        set.images.push(IconImage {
            name: "favicon.ico".to_string(),
            contents: encode_ico(&img, &ICO_SIZES)?,
        });
        set.html.push(format!(
            r#"<link rel="shortcut icon" href="{}">"#,
            href(config, "favicon.ico")
        ));
    }

    if targets.android {
        for size in ANDROID_SIZES {
            set.images.push(IconImage {
                name: format!("android-chrome-{size}x{size}.png"),
                contents: encode_png(&img, size)?,
            });
        }
        set.files.push(IconFile {
            name: "manifest.json".to_string(),
            contents: web_app_manifest(config)?,
        });
        set.html.push(format!(
            r#"<link rel="manifest" href="{}">"#,
            href(config, "manifest.json")
        ));
        set.html
            .push(r#"<meta name="mobile-web-app-capable" content="yes">"#.to_string());
        set.html.push(format!(
            r#"<meta name="theme-color" content="{}">"#,
            escape_attr(&config.theme_color)
        ));
        set.html.push(format!(
            r#"<meta name="application-name" content="{}">"#,
            escape_attr(&config.app_name)
        ));
    }

    if targets.apple_icon {
        set.images.push(IconImage {
            name: "apple-touch-icon.png".to_string(),
            contents: encode_png(&img, APPLE_TOUCH_SIZE)?,
        });
        set.html.push(format!(
            r#"<link rel="apple-touch-icon" sizes="{APPLE_TOUCH_SIZE}x{APPLE_TOUCH_SIZE}" href="{}">"#,
            href(config, "apple-touch-icon.png")
        ));
        set.html
            .push(r#"<meta name="apple-mobile-web-app-capable" content="yes">"#.to_string());
        set.html.push(
            r#"<meta name="apple-mobile-web-app-status-bar-style" content="black-translucent">"#
                .to_string(),
        );
        set.html.push(format!(
            r#"<meta name="apple-mobile-web-app-title" content="{}">"#,
            escape_attr(&config.app_name)
        ));
    }

    if targets.windows {
        let tile = format!("mstile-{MSTILE_SIZE}x{MSTILE_SIZE}.png");
        set.files.push(IconFile {
            name: "browserconfig.xml".to_string(),
            contents: browserconfig(config, &tile),
        });
        set.images.push(IconImage {
            contents: encode_png(&img, MSTILE_SIZE)?,
            name: tile,
        });
        set.html.push(format!(
            r#"<meta name="msapplication-TileColor" content="{}">"#,
            escape_attr(&config.background)
        ));
        set.html.push(format!(
            r#"<meta name="msapplication-config" content="{}">"#,
            href(config, "browserconfig.xml")
        ));
    }

    for (enabled, target) in [
        (targets.apple_startup, "appleStartup"),
        (targets.coast, "coast"),
        (targets.firefox, "firefox"),
        (targets.yandex, "yandex"),
    ] {
        if enabled {
            warn!("icon target '{target}' is not supported by the built-in generator");
        }
    }

    debug!(
        "rendered {} images, {} files, {} tags",
        set.images.len(),
        set.files.len(),
        set.html.len()
    );
    Ok(set)
}

fn resize(img: &DynamicImage, size: u32) -> DynamicImage {
    img.resize_exact(size, size, FilterType::Lanczos3)
}

fn encode_png(img: &DynamicImage, size: u32) -> Result<Vec<u8>, GeneratorError> {
    let mut buffer = Vec::new();
    resize(img, size)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(GeneratorError::image)?;
    Ok(buffer)
}

fn encode_ico(img: &DynamicImage, sizes: &[u32]) -> Result<Vec<u8>, GeneratorError> {
    let frames = sizes
        .iter()
        .map(|&size| {
            let rgba = resize(img, size).to_rgba8();
            IcoFrame::as_png(rgba.as_raw(), size, size, ExtendedColorType::Rgba8)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(GeneratorError::image)?;

    let mut buffer = Vec::new();
    IcoEncoder::new(&mut buffer)
        .encode_images(&frames)
        .map_err(GeneratorError::image)?;
    Ok(buffer)
}

fn web_app_manifest(config: &FaviconConfig) -> Result<String, GeneratorError> {
    let icons: Vec<_> = ANDROID_SIZES
        .iter()
        .map(|size| {
            json!({
                "src": href(config, &format!("android-chrome-{size}x{size}.png")),
                "sizes": format!("{size}x{size}"),
                "type": "image/png",
            })
        })
        .collect();

    let manifest = json!({
        "name": config.app_name,
        "short_name": config.app_name,
        "description": config.app_description,
        "start_url": config.start_url,
        "display": config.display,
        "background_color": config.background,
        "theme_color": config.theme_color,
        "icons": icons,
    });
    serde_json::to_string_pretty(&manifest).map_err(|e| GeneratorError::Other(e.to_string()))
}

fn browserconfig(config: &FaviconConfig, tile: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<browserconfig>
  <msapplication>
    <tile>
      <square150x150logo src="{}"/>
      <TileColor>{}</TileColor>
    </tile>
  </msapplication>
</browserconfig>
"#,
        href(config, tile),
        escape_attr(&config.background)
    )
}

fn href(config: &FaviconConfig, name: &str) -> String {
    format!("{}/{}", config.path.trim_end_matches('/'), escape_attr(name))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
