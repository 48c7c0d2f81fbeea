use std::collections::BTreeSet;

use serde::Serialize;

/// Set of category ids that have a durable local copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OfflineIndex {
    ids: BTreeSet<String>,
}

impl OfflineIndex {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }
}

impl<S: Into<String>> FromIterator<S> for OfflineIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut index = OfflineIndex::default();
        assert!(index.is_empty());
        assert!(index.insert("cpr".to_string()));
        assert!(!index.insert("cpr".to_string()));
        assert!(index.contains("cpr"));
        assert!(!index.contains("burns"));
        assert_eq!(index.len(), 1);
        assert!(index.remove("cpr"));
        assert!(!index.remove("cpr"));
    }

    #[test]
    fn test_iterates_sorted() {
        let index: OfflineIndex = ["nutrition", "burns", "cpr"].into_iter().collect();
        let ids: Vec<&str> = index.iter().collect();
        assert_eq!(ids, vec!["burns", "cpr", "nutrition"]);
    }
}
