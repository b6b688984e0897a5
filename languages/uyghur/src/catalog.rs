use std::collections::HashMap;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use uyghurly_types::{LessonContent, Unit, VocabularyItem};

use crate::convert::convert_raw_lessons;
use crate::error::ContentError;
use crate::loader::{ContentBundle, ContentLoader};

/// Seed used for lesson exercises when none is configured
pub const DEFAULT_CONTENT_SEED: u64 = 0x5559_4748;

/// Converted lessons and the unit manifest, built once per process
pub struct LessonCatalog {
    units: Vec<Unit>,
    lessons: Vec<LessonContent>,
    by_slug: HashMap<String, usize>,
}

impl LessonCatalog {
    pub fn embedded(seed: Option<u64>) -> Result<Self, ContentError> {
        Ok(Self::from_bundle(ContentLoader::load_embedded()?, seed))
    }

    pub fn from_dir(dir: &Path, seed: Option<u64>) -> Result<Self, ContentError> {
        Ok(Self::from_bundle(ContentLoader::load_from_dir(dir)?, seed))
    }

    pub fn from_bundle(bundle: ContentBundle, seed: Option<u64>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(DEFAULT_CONTENT_SEED));

        let mut lessons = Vec::new();
        let mut by_slug = HashMap::new();
        for lesson in convert_raw_lessons(&bundle.rows, &mut rng) {
            if lesson.slug.is_empty() || lesson.title.trim().is_empty() {
                tracing::warn!("Skipping invalid lesson '{}' in unit {}", lesson.title, lesson.unit);
                continue;
            }
            if by_slug.contains_key(&lesson.slug) {
                tracing::warn!("Duplicate lesson slug '{}', keeping the first", lesson.slug);
                continue;
            }
            by_slug.insert(lesson.slug.clone(), lessons.len());
            lessons.push(lesson);
        }

        for unit in &bundle.units {
            for slug in unit.lessons.iter().filter(|s| !by_slug.contains_key(*s)) {
                tracing::warn!("Unit '{}' lists unknown lesson '{}'", unit.id, slug);
            }
        }

        tracing::info!(
            "Lesson catalog ready: {} units, {} lessons",
            bundle.units.len(),
            lessons.len()
        );

        Self {
            units: bundle.units,
            lessons,
            by_slug,
        }
    }

    pub fn get_lesson_by_slug(&self, slug: &str) -> Option<&LessonContent> {
        self.by_slug.get(slug).map(|&i| &self.lessons[i])
    }

    /// Unit titles in manifest order, without duplicates
    pub fn get_all_units(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            if !titles.contains(&unit.title) {
                titles.push(unit.title.clone());
            }
        }
        titles
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Resolve a unit by exact id, then by title ignoring case
    pub fn find_unit(&self, id_or_title: &str) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| u.id == id_or_title)
            .or_else(|| {
                self.units
                    .iter()
                    .find(|u| u.title.eq_ignore_ascii_case(id_or_title))
            })
    }

    /// Lessons the manifest lists for `unit_id`; unknown slugs are skipped
    pub fn get_lessons_by_unit(&self, unit_id: &str) -> Vec<&LessonContent> {
        let Some(unit) = self.units.iter().find(|u| u.id == unit_id) else {
            return Vec::new();
        };

        unit.lessons
            .iter()
            .filter_map(|slug| self.get_lesson_by_slug(slug))
            .collect()
    }

    /// Lessons whose `unit` field matches `title`, ignoring case
    pub fn lessons_in_unit_titled(&self, title: &str) -> Vec<&LessonContent> {
        self.lessons
            .iter()
            .filter(|l| l.unit.eq_ignore_ascii_case(title))
            .collect()
    }

    pub fn get_all_lessons(&self) -> &[LessonContent] {
        &self.lessons
    }

    /// Every vocabulary item together with the unit it belongs to
    pub fn vocabulary(&self) -> impl Iterator<Item = (&str, &VocabularyItem)> {
        self.lessons
            .iter()
            .flat_map(|l| l.vocabulary.iter().map(move |v| (l.unit.as_str(), v)))
    }
}
