use std::collections::HashSet;

use uyghurly_types::DictionaryEntry;

use crate::catalog::LessonCatalog;

/// Flat word list over the whole bundle, sorted by Uyghur headword
pub struct UyghurDictionary {
    entries: Vec<DictionaryEntry>,
}

impl UyghurDictionary {
    pub fn from_catalog(catalog: &LessonCatalog) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<DictionaryEntry> = catalog
            .vocabulary()
            .filter(|(_, item)| seen.insert((item.uyghur.to_lowercase(), item.english.to_lowercase())))
            .map(|(unit, item)| DictionaryEntry {
                uyghur: item.uyghur.clone(),
                english: item.english.clone(),
                definition: item.definition.clone(),
                unit: unit.to_string(),
            })
            .collect();

        entries.sort_by(|a, b| {
            a.uyghur
                .to_lowercase()
                .cmp(&b.uyghur.to_lowercase())
                .then_with(|| a.english.cmp(&b.english))
        });

        tracing::debug!("Dictionary built with {} entries", entries.len());
        Self { entries }
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Case-insensitive substring match on any field; a blank term matches everything
    pub fn search(&self, term: &str) -> Vec<&DictionaryEntry> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }

        self.entries
            .iter()
            .filter(|e| {
                [&e.uyghur, &e.english, &e.definition, &e.unit]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn lookup_exact(&self, uyghur: &str) -> Vec<&DictionaryEntry> {
        self.entries
            .iter()
            .filter(|e| e.uyghur.to_lowercase() == uyghur.trim().to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> UyghurDictionary {
        UyghurDictionary::from_catalog(&LessonCatalog::embedded(None).unwrap())
    }

    #[test]
    fn entries_are_sorted_by_uyghur() {
        let dict = dictionary();
        let keys: Vec<String> = dict.entries().iter().map(|e| e.uyghur.to_lowercase()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn search_covers_every_field() {
        let dict = dictionary();

        assert!(dict.search("ALMA").iter().any(|e| e.english == "apple"));
        assert!(dict.search("gratitude").iter().any(|e| e.uyghur == "Rehmet"));
        assert_eq!(
            dict.search("travel").len(),
            dict.entries().iter().filter(|e| e.unit == "Travel").count()
        );
        assert!(dict.search("zzzz-not-a-word").is_empty());
        assert_eq!(dict.search("   ").len(), dict.entry_count());
    }

    #[test]
    fn exact_lookup_ignores_case() {
        let dict = dictionary();
        let hits = dict.lookup_exact("salam");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].unit, "Basics");
    }
}
