//! Catalog sources: the embedded dataset, a JSON file, or an HTTP endpoint.
//!
//! Every source returns languages that already passed [`ingest`], so the
//! aggregators can assume percentages in `0..=100` and normalized country codes.
//!
//! ### Notes
//! - Documents are either `{ "languages": [...] }` or a bare array of languages.
//! - Counts (`totalSpeakers`, `population`, ...) may be numbers or numeric strings.
//! - HTTP fetches retry on 5xx and transport errors (100/300/700 ms backoff).
//!
//! Typical usage:
//! ```no_run
//! # use geolingua::source::{CatalogSource, HttpSource};
//! let source = HttpSource::new("https://example.org/data/languages.json")?;
//! let languages = source.fetch()?;
//! # Ok::<(), geolingua::LoadError>(())
//! ```

use crate::error::LoadError;
use crate::models::{Language, LanguageDocument};
use log::{debug, warn};
use regex::Regex;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

const BUILTIN_CATALOG: &str = include_str!("../data/languages.json");

static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}$").expect("static regex"));

/// Where a catalog comes from.
pub trait CatalogSource {
    fn fetch(&self) -> Result<Vec<Language>, LoadError>;

    /// Human-readable origin, for logs and CLI messages.
    fn describe(&self) -> String;
}

impl<T: CatalogSource + ?Sized> CatalogSource for Box<T> {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-memory fixtures.
impl CatalogSource for Vec<Language> {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        Ok(ingest(self.clone()))
    }

    fn describe(&self) -> String {
        format!("{} in-memory languages", self.len())
    }
}

/// The dataset compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl CatalogSource for BuiltinSource {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        parse_document(BUILTIN_CATALOG)
    }

    fn describe(&self) -> String {
        "built-in catalog".into()
    }
}

/// A catalog document on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogSource for FileSource {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        let text = read_text(&self.path)?;
        parse_document(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A catalog document served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    pub url: String,
    http: HttpClient,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("geolingua/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    fn get_text(&self) -> Result<String, LoadError> {
        let mut last_err: Option<String> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(&self.url).send() {
                Ok(r) if r.status().is_success() => return Ok(r.text()?),
                Ok(r) if r.status().is_server_error() => {
                    last_err = Some(format!("HTTP {}", r.status()));
                }
                Ok(r) => {
                    return Err(LoadError::Status {
                        url: self.url.clone(),
                        status: r.status().as_u16(),
                    });
                }
                Err(e) => last_err = Some(e.to_string()),
            }
            debug!("retrying {} in {} ms", self.url, backoff_ms);
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(LoadError::RetriesExhausted {
            url: self.url.clone(),
            message: last_err.unwrap_or_else(|| "unknown error".into()),
        })
    }
}

impl CatalogSource for HttpSource {
    fn fetch(&self) -> Result<Vec<Language>, LoadError> {
        let text = self.get_text()?;
        parse_document(&text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a catalog document and run it through [`ingest`].
pub fn parse_document(json: &str) -> Result<Vec<Language>, LoadError> {
    let doc: LanguageDocument = serde_json::from_str(json)?;
    Ok(ingest(doc.into_languages()))
}

/// Normalize raw languages at the loading boundary.
///
/// - language ids are trimmed; languages with a blank id are dropped
/// - country codes are trimmed and upper-cased
/// - `speaker_percentage` is clamped to `0..=100` (NaN becomes 0)
pub fn ingest(languages: Vec<Language>) -> Vec<Language> {
    languages
        .into_iter()
        .filter_map(|mut lang| {
            lang.id = lang.id.trim().to_string();
            if lang.id.is_empty() {
                warn!("dropping language {:?} with blank id", lang.name);
                return None;
            }
            for c in &mut lang.countries {
                c.country_code = c.country_code.trim().to_ascii_uppercase();
                if !COUNTRY_CODE.is_match(&c.country_code) {
                    warn!(
                        "{}: unusual country code {:?} for {}",
                        lang.id, c.country_code, c.country_name
                    );
                }
                let pct = c.speaker_percentage;
                let clamped = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
                if clamped != pct {
                    warn!(
                        "{}/{}: speaker percentage {} clamped to {}",
                        lang.id, c.country_code, pct, clamped
                    );
                    c.speaker_percentage = clamped;
                }
            }
            Some(lang)
        })
        .collect()
}
