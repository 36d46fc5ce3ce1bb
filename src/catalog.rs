//! Read-only language catalog and its load/invalidate lifecycle.
//!
//! A [`Catalog`] is immutable once built. [`CatalogStore`] owns a
//! [`CatalogSource`] and decides when to fetch from it; callers pass
//! `store.catalog()` into the aggregators explicitly.
//!
//! ```
//! use geolingua::catalog::CatalogStore;
//! use geolingua::source::BuiltinSource;
//!
//! let mut store = CatalogStore::new(BuiltinSource);
//! assert!(store.catalog().is_empty());
//! let catalog = store.load()?;
//! assert!(catalog.get_by_id("english").is_some());
//! assert!(catalog.get_by_id("klingon").is_none());
//! # Ok::<(), geolingua::LoadError>(())
//! ```

use crate::error::LoadError;
use crate::models::Language;
use crate::source::CatalogSource;
use ahash::AHashMap;
use log::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    languages: Vec<Language>,
    index: AHashMap<String, usize>,
    version: u64,
}

impl Catalog {
    /// An empty catalog; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog keeping input order. A repeated id keeps its first entry.
    pub fn from_languages(languages: Vec<Language>) -> Self {
        let mut kept = Vec::with_capacity(languages.len());
        let mut index = AHashMap::with_capacity(languages.len());
        for lang in languages {
            if index.contains_key(&lang.id) {
                warn!("duplicate language id {:?} in catalog, keeping first entry", lang.id);
                continue;
            }
            index.insert(lang.id.clone(), kept.len());
            kept.push(lang);
        }
        Self {
            languages: kept,
            index,
            version: 0,
        }
    }

    /// Tag this catalog with a version, used as part of memo keys.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Look up a language. Unknown ids return `None`; callers skip them.
    pub fn get_by_id(&self, id: &str) -> Option<&Language> {
        self.index.get(id).map(|&i| &self.languages[i])
    }

    /// All languages, in load order.
    pub fn all(&self) -> &[Language] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Case-insensitive substring match on language names, in catalog order.
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Language> {
        let needle = term.trim().to_lowercase();
        self.languages
            .iter()
            .filter(|l| needle.is_empty() || l.name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Owns a catalog source and the most recently loaded catalog.
#[derive(Debug)]
pub struct CatalogStore<S> {
    source: S,
    current: Catalog,
    loaded: bool,
    loads: u64,
}

impl<S: CatalogSource> CatalogStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: Catalog::empty(),
            loaded: false,
            loads: 0,
        }
    }

    /// Fetch from the source unless a catalog is already cached.
    pub fn load(&mut self) -> Result<&Catalog, LoadError> {
        if !self.loaded {
            self.fetch()?;
        }
        Ok(&self.current)
    }

    /// Fetch from the source even if a catalog is cached. On error the
    /// previously loaded catalog stays in place.
    pub fn reload(&mut self) -> Result<&Catalog, LoadError> {
        self.fetch()?;
        Ok(&self.current)
    }

    /// Drop the cached catalog. The next `load` fetches again.
    pub fn invalidate(&mut self) {
        debug!("invalidating catalog from {}", self.source.describe());
        self.current = Catalog::empty();
        self.loaded = false;
    }

    /// The loaded catalog, or an empty one before the first successful load.
    pub fn catalog(&self) -> &Catalog {
        &self.current
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch(&mut self) -> Result<(), LoadError> {
        let languages = self.source.fetch()?;
        self.loads += 1;
        debug!(
            "loaded {} languages from {} (version {})",
            languages.len(),
            self.source.describe(),
            self.loads
        );
        self.current = Catalog::from_languages(languages).with_version(self.loads);
        self.loaded = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CountryMembership;
    use std::cell::Cell;

    fn lang(id: &str, name: &str) -> Language {
        Language {
            id: id.into(),
            name: name.into(),
            color_token: format!("language-{id}"),
            total_speakers: 10,
            global_coverage_percent: 0.0,
            official_country_count: 1,
            countries: vec![CountryMembership {
                country_code: "XX".into(),
                country_name: "Xland".into(),
                speaker_percentage: 50.0,
                is_official: true,
                population: 100,
                cultural_notes: None,
            }],
        }
    }

    struct CountingSource {
        calls: Cell<u32>,
        fail: bool,
    }

    impl CatalogSource for CountingSource {
        fn fetch(&self) -> Result<Vec<Language>, LoadError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(LoadError::Status {
                    url: "test://catalog".into(),
                    status: 503,
                });
            }
            Ok(vec![lang("a", "Alpha"), lang("b", "Beta")])
        }

        fn describe(&self) -> String {
            "counting source".into()
        }
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let mut second = lang("a", "Alpha Two");
        second.total_speakers = 99;
        let cat = Catalog::from_languages(vec![lang("a", "Alpha"), second, lang("b", "Beta")]);
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.get_by_id("a").unwrap().name, "Alpha");
        let ids: Vec<_> = cat.all().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let cat = Catalog::from_languages(vec![lang("a", "Alpha"), lang("b", "Beta")]);
        let hits: Vec<_> = cat.search("ALP").iter().map(|l| l.id.clone()).collect();
        assert_eq!(hits, ["a"]);
        assert_eq!(cat.search("  ").len(), 2);
        assert!(cat.search("zeta").is_empty());
    }

    #[test]
    fn store_loads_once_until_invalidated() {
        let mut store = CatalogStore::new(CountingSource {
            calls: Cell::new(0),
            fail: false,
        });
        assert!(store.catalog().get_by_id("a").is_none());
        assert_eq!(store.load().unwrap().version(), 1);
        store.load().unwrap();
        assert_eq!(store.source().calls.get(), 1);

        store.invalidate();
        assert!(!store.is_loaded());
        assert!(store.catalog().is_empty());
        assert_eq!(store.load().unwrap().version(), 2);
        assert_eq!(store.source().calls.get(), 2);

        assert_eq!(store.reload().unwrap().version(), 3);
    }

    #[test]
    fn failed_load_leaves_empty_catalog() {
        let mut store = CatalogStore::new(CountingSource {
            calls: Cell::new(0),
            fail: true,
        });
        assert!(store.load().is_err());
        assert!(!store.is_loaded());
        assert!(store.catalog().is_empty());
    }
}
