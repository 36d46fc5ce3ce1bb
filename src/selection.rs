//! The user's language selection: an insertion-ordered set of ids.

use crate::catalog::Catalog;
use crate::models::Language;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present. Returns whether the id is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Append the id unless already selected. Returns whether it was added.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Returns whether the id was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|s| s == id) {
            Some(i) => {
                self.ids.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in the order they were added.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Order-independent key, for caching results that ignore selection order.
    pub fn sorted_key(&self) -> Vec<String> {
        let mut key = self.ids.clone();
        key.sort();
        key
    }

    /// Selected languages known to `catalog`, in selection order. Unknown ids
    /// are skipped.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Language> {
        self.ids
            .iter()
            .filter_map(|id| catalog.get_by_id(id))
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut sel = Selection::new();
        for id in iter {
            sel.insert(id.as_ref());
        }
        sel
    }
}

impl AsRef<[String]> for Selection {
    fn as_ref(&self) -> &[String] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = Selection::new();
        assert!(sel.toggle("english"));
        assert!(sel.toggle("french"));
        assert_eq!(sel.ids(), ["english", "french"]);
        assert!(!sel.toggle("english"));
        assert_eq!(sel.ids(), ["french"]);
        assert!(sel.toggle("english"));
        assert_eq!(sel.ids(), ["french", "english"]);
    }

    #[test]
    fn collecting_collapses_duplicates() {
        let sel: Selection = ["b", "a", "b", "c", "a"].into_iter().collect();
        assert_eq!(sel.ids(), ["b", "a", "c"]);
        assert_eq!(sel.sorted_key(), ["a", "b", "c"]);
        assert!(!sel.clone().insert("a"));
    }

    #[test]
    fn serializes_as_plain_array() {
        let sel: Selection = ["english", "arabic"].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&sel).unwrap(),
            r#"["english","arabic"]"#
        );
    }
}
