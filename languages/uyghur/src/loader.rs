use std::path::Path;

use serde::Deserialize;
use uyghurly_types::Unit;

use crate::convert::RawVocabularyRow;
use crate::error::ContentError;

/// Unit files shipped inside the binary, keyed by unit id
const EMBEDDED_UNITS: &[(&str, &str)] = &[
    ("basics", include_str!("../data/basics.json")),
    ("people", include_str!("../data/people.json")),
    ("food", include_str!("../data/food.json")),
    ("travel", include_str!("../data/travel.json")),
    ("describing", include_str!("../data/describing.json")),
];

const EMBEDDED_MANIFEST: &str = include_str!("../data/units.json");

#[derive(Debug, Deserialize)]
struct Manifest {
    units: Vec<ManifestUnit>,
}

/// Manifest entry before validation; every field may be missing
#[derive(Debug, Deserialize)]
struct ManifestUnit {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    lessons: Option<Vec<String>>,
}

/// Manifest plus the raw vocabulary rows of every unit
#[derive(Debug, Clone, Default)]
pub struct ContentBundle {
    pub units: Vec<Unit>,
    pub rows: Vec<RawVocabularyRow>,
}

pub struct ContentLoader;

impl ContentLoader {
    /// Load the bundle compiled into the binary
    pub fn load_embedded() -> Result<ContentBundle, ContentError> {
        tracing::info!("Loading embedded lesson bundle...");

        let units = parse_manifest(EMBEDDED_MANIFEST, "units.json")?;
        let mut rows = Vec::new();
        for (id, json) in EMBEDDED_UNITS {
            rows.extend(parse_rows(json, &format!("{id}.json"))?);
        }

        tracing::info!("Loaded {} units, {} vocabulary rows", units.len(), rows.len());
        Ok(ContentBundle { units, rows })
    }

    /// Load `units.json` and one `<unit id>.json` per manifest unit from `dir`
    pub fn load_from_dir(dir: &Path) -> Result<ContentBundle, ContentError> {
        tracing::info!("Loading lesson bundle from {}", dir.display());

        let manifest_path = dir.join("units.json");
        if !manifest_path.exists() {
            return Err(ContentError::FileNotFound(manifest_path.display().to_string()));
        }
        let units = parse_manifest(&std::fs::read_to_string(&manifest_path)?, "units.json")?;

        let mut rows = Vec::new();
        for unit in &units {
            let file = format!("{}.json", unit.id);
            let path = dir.join(&file);
            if !path.exists() {
                tracing::warn!("Unit '{}' has no vocabulary file at {}", unit.id, path.display());
                continue;
            }
            rows.extend(parse_rows(&std::fs::read_to_string(&path)?, &file)?);
        }

        tracing::info!("Loaded {} units, {} vocabulary rows from disk", units.len(), rows.len());
        Ok(ContentBundle { units, rows })
    }
}

/// Parse and validate the unit manifest
pub fn parse_manifest(json: &str, file: &str) -> Result<Vec<Unit>, ContentError> {
    let manifest: Manifest = serde_json::from_str(json).map_err(|source| ContentError::Parse {
        file: file.to_string(),
        source,
    })?;

    let mut units: Vec<Unit> = Vec::with_capacity(manifest.units.len());
    for (position, entry) in manifest.units.into_iter().enumerate() {
        if entry.id.trim().is_empty() || entry.title.trim().is_empty() {
            return Err(ContentError::InvalidFormat(format!(
                "unit #{position} needs a non-empty id and title"
            )));
        }
        let Some(lessons) = entry.lessons else {
            return Err(ContentError::InvalidFormat(format!(
                "unit '{}' has no lessons array",
                entry.id
            )));
        };
        if units.iter().any(|u| u.id == entry.id) {
            return Err(ContentError::InvalidFormat(format!(
                "duplicate unit id '{}'",
                entry.id
            )));
        }

        units.push(Unit {
            id: entry.id,
            title: entry.title,
            lessons,
        });
    }

    Ok(units)
}

fn parse_rows(json: &str, file: &str) -> Result<Vec<RawVocabularyRow>, ContentError> {
    serde_json::from_str(json).map_err(|source| ContentError::Parse {
        file: file.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_bundle_loads() {
        let bundle = ContentLoader::load_embedded().unwrap();
        assert_eq!(bundle.units.len(), EMBEDDED_UNITS.len());
        assert!(!bundle.rows.is_empty());
    }

    #[test]
    fn manifest_requires_id_title_and_lessons() {
        let missing_title = r#"{"units": [{"id": "basics", "lessons": []}]}"#;
        assert!(matches!(
            parse_manifest(missing_title, "units.json"),
            Err(ContentError::InvalidFormat(_))
        ));

        let missing_lessons = r#"{"units": [{"id": "basics", "title": "Basics"}]}"#;
        assert!(matches!(
            parse_manifest(missing_lessons, "units.json"),
            Err(ContentError::InvalidFormat(_))
        ));

        let garbage = r#"{"units": 3}"#;
        assert!(matches!(
            parse_manifest(garbage, "units.json"),
            Err(ContentError::Parse { .. })
        ));
    }

    #[test]
    fn load_from_dir_reads_manifest_units() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("units.json"),
            r#"{"units": [{"id": "home", "title": "Home", "lessons": ["rooms"]}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("home.json"),
            r#"[{"Unit": "Home", "Lesson Title": "Rooms", "Uyghur": "Öy", "English": "house", "Definition": "A building to live in"}]"#,
        )
        .unwrap();

        let bundle = ContentLoader::load_from_dir(dir.path()).unwrap();
        assert_eq!(bundle.units[0].id, "home");
        assert_eq!(bundle.rows.len(), 1);
        assert_eq!(bundle.rows[0].lesson_title, "Rooms");
    }

    #[test]
    fn missing_manifest_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ContentLoader::load_from_dir(dir.path()),
            Err(ContentError::FileNotFound(_))
        ));
    }
}
