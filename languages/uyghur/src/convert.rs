use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uyghurly_core::text::{remove_parentheses, slugify};
use uyghurly_types::{LessonContent, VocabularyItem};

use crate::exercises::{generate_exercises, generate_typing_questions};

/// One spreadsheet row of the content bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVocabularyRow {
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Lesson Title")]
    pub lesson_title: String,
    #[serde(rename = "Uyghur")]
    pub uyghur: String,
    #[serde(rename = "English")]
    pub english: String,
    #[serde(rename = "Definition", default)]
    pub definition: String,
}

struct LessonGroup {
    unit: String,
    title: String,
    vocabulary: Vec<VocabularyItem>,
}

/// Group rows into lessons by `(unit, lesson title)`, keeping first-seen order
pub fn convert_raw_lessons<R: Rng + ?Sized>(
    rows: &[RawVocabularyRow],
    rng: &mut R,
) -> Vec<LessonContent> {
    let mut groups: Vec<LessonGroup> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for row in rows {
        let uyghur = remove_parentheses(&row.uyghur);
        if uyghur.is_empty() || row.english.trim().is_empty() {
            tracing::debug!(
                "Skipping incomplete row in {}/{}",
                row.unit,
                row.lesson_title
            );
            continue;
        }

        let slot = *index
            .entry((row.unit.as_str(), row.lesson_title.as_str()))
            .or_insert_with(|| {
                groups.push(LessonGroup {
                    unit: row.unit.clone(),
                    title: row.lesson_title.clone(),
                    vocabulary: Vec::new(),
                });
                groups.len() - 1
            });

        groups[slot].vocabulary.push(VocabularyItem {
            uyghur,
            english: row.english.trim().to_string(),
            definition: row.definition.trim().to_string(),
        });
    }

    groups
        .into_iter()
        .map(|group| {
            let exercises = generate_exercises(&group.vocabulary, rng);
            let typing_questions = generate_typing_questions(&group.vocabulary, rng);

            LessonContent {
                slug: slugify(&group.title),
                description: format!("Learn {} in Uyghur", group.title.to_lowercase()),
                title: group.title,
                unit: group.unit,
                vocabulary: group.vocabulary,
                exercises,
                typing_questions,
            }
        })
        .collect()
}
