//! Built-in service worker generator
//!
//! Scans the emitted output for files matching the configured globs, hashes
//! each one and renders a service worker that precaches them on install and
//! serves them cache-first afterwards.

use async_trait::async_trait;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::ManifestGenerator;
use crate::config::{slash_path, ServiceWorkerConfig};
use crate::error::GeneratorError;

const DEFAULT_CACHE_ID: &str = "fob-pwa";

const SCRIPT_TEMPLATE: &str = r#"'use strict';

var precacheConfig = __PRECACHE_CONFIG__;
var cacheName = 'sw-precache-v1-' + __CACHE_ID__ + '-' + (self.registration ? self.registration.scope : '');
var navigateFallback = __NAVIGATE_FALLBACK__;

function cacheKeyFor(url, hash) {
  var key = new URL(url, self.location);
  key.searchParams.set('_sw-precache', hash);
  return key.toString();
}

var urlsToCacheKeys = new Map(precacheConfig.map(function(item) {
  return [new URL(item[0], self.location).toString(), cacheKeyFor(item[0], item[1])];
}));

self.addEventListener('install', function(event) {
  event.waitUntil(
    caches.open(cacheName).then(function(cache) {
      return Promise.all(Array.from(urlsToCacheKeys.values()).map(function(cacheKey) {
        return cache.match(cacheKey).then(function(cached) {
          if (cached) {
            return;
          }
          return fetch(new Request(cacheKey, { credentials: 'same-origin' })).then(function(response) {
            if (!response.ok) {
              throw new Error('Request for ' + cacheKey + ' returned a response with status ' + response.status);
            }
            return cache.put(cacheKey, response);
          });
        });
      }));
    }).then(function() {
      return self.skipWaiting();
    })
  );
});

self.addEventListener('activate', function(event) {
  var expected = new Set(urlsToCacheKeys.values());
  event.waitUntil(
    caches.open(cacheName).then(function(cache) {
      return cache.keys().then(function(requests) {
        return Promise.all(requests.map(function(request) {
          if (!expected.has(request.url)) {
            return cache.delete(request);
          }
        }));
      });
    }).then(function() {
      return self.clients.claim();
    })
  );
});

self.addEventListener('fetch', function(event) {
  if (event.request.method !== 'GET') {
    return;
  }
  var url = new URL(event.request.url);
  url.hash = '';
  var cacheKey = urlsToCacheKeys.get(url.toString());
  if (!cacheKey && url.pathname.endsWith('/')) {
    cacheKey = urlsToCacheKeys.get(new URL('index.html', url).toString());
  }
  if (!cacheKey && navigateFallback && event.request.mode === 'navigate') {
    cacheKey = urlsToCacheKeys.get(new URL(navigateFallback, self.location).toString());
  }
  if (cacheKey) {
    event.respondWith(
      caches.open(cacheName).then(function(cache) {
        return cache.match(cacheKey).then(function(response) {
          return response || fetch(event.request);
        });
      }).catch(function() {
        return fetch(event.request);
      })
    );
  }
});
"#;

/// Generates a precaching service worker from the files on disk
#[derive(Debug, Clone, Default)]
pub struct PrecacheGenerator;

impl PrecacheGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ManifestGenerator for PrecacheGenerator {
    async fn generate(&self, config: &ServiceWorkerConfig) -> Result<String, GeneratorError> {
        let config = config.clone();
        tokio::task::spawn_blocking(move || {
            let entries = collect_entries(&config)?;
            render_script(&entries, &config)
        })
        .await
        .map_err(|e| GeneratorError::Join(e.to_string()))?
    }
}

/// URL to content hash for every matched file, ordered by URL
fn collect_entries(config: &ServiceWorkerConfig) -> Result<BTreeMap<String, String>, GeneratorError> {
    let globs = build_glob_set(&config.static_file_globs)?;
    let mut roots: Vec<PathBuf> = config
        .static_file_globs
        .iter()
        .map(|pattern| literal_base(pattern))
        .collect();
    roots.sort();
    roots.dedup();

    let mut entries = BTreeMap::new();
    for root in roots {
        if !root.exists() {
            debug!("precache root {} does not exist", root.display());
            continue;
        }
        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| GeneratorError::Walk(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = slash_path(entry.path());
            if !globs.is_match(&path) {
                continue;
            }
            let contents = std::fs::read(entry.path())
                .map_err(|e| GeneratorError::Walk(format!("{path}: {e}")))?;
            let hash = format!("{:x}", Sha256::digest(&contents));
            let relative = path.strip_prefix(config.strip_prefix.as_str()).unwrap_or(&path);
            entries.insert(format!("{}{}", config.replace_prefix, relative), hash);
        }
    }

    debug!("precaching {} files", entries.len());
    Ok(entries)
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, GeneratorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| GeneratorError::invalid_pattern(pattern, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| GeneratorError::invalid_pattern(patterns.join(", "), e))
}

/// Longest directory prefix of `pattern` without glob syntax
fn literal_base(pattern: &str) -> PathBuf {
    let literal_end = pattern
        .find(|c| matches!(c, '*' | '?' | '[' | '{'))
        .unwrap_or(pattern.len());
    let literal = &pattern[..literal_end];
    match literal.rfind('/') {
        Some(0) => PathBuf::from("/"),
        Some(idx) => PathBuf::from(&literal[..idx]),
        None => Path::new(".").to_path_buf(),
    }
}

fn render_script(
    entries: &BTreeMap<String, String>,
    config: &ServiceWorkerConfig,
) -> Result<String, GeneratorError> {
    let precache: Vec<[&str; 2]> = entries
        .iter()
        .map(|(url, hash)| [url.as_str(), hash.as_str()])
        .collect();
    let cache_id = config.cache_id.as_deref().unwrap_or(DEFAULT_CACHE_ID);

    let precache = to_json(&precache)?;
    let cache_id = to_json(&cache_id)?;
    let fallback = to_json(&config.navigate_fallback)?;

    Ok(SCRIPT_TEMPLATE
        .replace("__PRECACHE_CONFIG__", &precache)
        .replace("__CACHE_ID__", &cache_id)
        .replace("__NAVIGATE_FALLBACK__", &fallback))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, GeneratorError> {
    serde_json::to_string(value).map_err(|e| GeneratorError::Other(e.to_string()))
}
