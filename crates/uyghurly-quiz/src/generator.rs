use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use uyghurly_config::quiz::QuizConfig;
use uyghurly_lang_uyghur::LessonCatalog;
use uyghurly_types::{QuestionKind, QuizQuestion, UnitQuiz, VocabularyItem};

use crate::error::QuizError;

const OPTION_COUNT: usize = 4;

const ENGLISH_FILLERS: [&str; 4] = ["I don't know", "Not sure", "Maybe", "Different word"];
const UYGHUR_FILLERS: [&str; 4] = ["يوق", "بىلمەيمەن", "شەكلى", "باشقا"];

#[derive(Clone, Copy)]
enum Side {
    English,
    Uyghur,
}

impl Side {
    fn of(self, item: &VocabularyItem) -> &str {
        match self {
            Side::English => &item.english,
            Side::Uyghur => &item.uyghur,
        }
    }

    fn fillers(self) -> &'static [&'static str] {
        match self {
            Side::English => &ENGLISH_FILLERS,
            Side::Uyghur => &UYGHUR_FILLERS,
        }
    }
}

/// Builds multiple-choice unit quizzes from the lesson catalog
#[derive(Clone)]
pub struct QuizGenerator {
    catalog: Arc<LessonCatalog>,
    config: QuizConfig,
}

impl QuizGenerator {
    pub fn new(catalog: Arc<LessonCatalog>, config: QuizConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &LessonCatalog {
        &self.catalog
    }

    /// Configured seed, or a fresh random one
    pub fn next_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }

    /// Quiz over every lesson whose unit matches `unit_title`, ignoring case
    pub fn generate_unit_quiz(
        &self,
        unit_id: &str,
        unit_title: &str,
        seed: u64,
    ) -> Result<UnitQuiz, QuizError> {
        let lessons = self.catalog.lessons_in_unit_titled(unit_title);
        if lessons.is_empty() {
            return Err(QuizError::UnitNotFound(unit_title.to_string()));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let pool: Vec<&VocabularyItem> = lessons.iter().flat_map(|l| &l.vocabulary).collect();

        let per_lesson_questions: Vec<Vec<QuizQuestion>> = lessons
            .iter()
            .map(|lesson| {
                let mut questions = Vec::with_capacity(lesson.vocabulary.len() * 2);
                for (i, item) in lesson.vocabulary.iter().enumerate() {
                    questions.push(QuizQuestion {
                        id: format!("{}_uyghur_to_english_{i}", lesson.slug),
                        question: format!("What does \"{}\" mean in English?", item.uyghur),
                        options: build_options(item, Side::English, &pool, &mut rng),
                        correct_answer: item.english.clone(),
                        explanation: Some(format!(
                            "\"{}\" means \"{}\" in Uyghur.",
                            item.uyghur, item.english
                        )),
                        kind: QuestionKind::MultipleChoice,
                    });
                }
                for (i, item) in lesson.vocabulary.iter().enumerate() {
                    questions.push(QuizQuestion {
                        id: format!("{}_english_to_uyghur_{i}", lesson.slug),
                        question: format!("What is the Uyghur word for \"{}\"?", item.english),
                        options: build_options(item, Side::Uyghur, &pool, &mut rng),
                        correct_answer: item.uyghur.clone(),
                        explanation: Some(format!(
                            "\"{}\" is \"{}\" in Uyghur.",
                            item.english, item.uyghur
                        )),
                        kind: QuestionKind::MultipleChoice,
                    });
                }
                questions
            })
            .collect();

        let max = self.config.max_questions;
        let per_lesson = (max / lessons.len()).max(1);

        let mut selected = Vec::new();
        let mut leftovers = Vec::new();
        for mut questions in per_lesson_questions {
            questions.shuffle(&mut rng);
            let rest = questions.split_off(per_lesson.min(questions.len()));
            selected.extend(questions);
            leftovers.extend(rest);
        }

        if selected.len() < max {
            leftovers.shuffle(&mut rng);
            let needed = max - selected.len();
            selected.extend(leftovers.into_iter().take(needed));
        }

        let mut seen = HashSet::new();
        selected.retain(|q| seen.insert(q.id.clone()));
        selected.shuffle(&mut rng);
        selected.truncate(max);

        tracing::debug!(
            "Generated {} questions for unit {} from {} lessons (seed {seed})",
            selected.len(),
            unit_id,
            lessons.len()
        );

        Ok(UnitQuiz {
            unit_id: unit_id.to_string(),
            unit_title: unit_title.to_string(),
            title: format!("{unit_title} Unit Quiz"),
            description: format!(
                "Test your knowledge of {} vocabulary and phrases",
                unit_title.to_lowercase()
            ),
            questions: selected,
            passing_score: self.config.passing_score,
            time_limit: self.config.time_limit,
            seed,
        })
    }
}

/// Correct answer, up to three distinct distractors from the unit, then fillers
fn build_options(
    item: &VocabularyItem,
    side: Side,
    pool: &[&VocabularyItem],
    rng: &mut StdRng,
) -> Vec<String> {
    let correct = side.of(item);

    let mut distractors: Vec<&str> = pool
        .iter()
        .map(|other| side.of(other))
        .filter(|answer| *answer != correct)
        .collect();
    distractors.sort_unstable();
    distractors.dedup();
    distractors.shuffle(rng);

    let mut options = vec![correct.to_string()];
    options.extend(
        distractors
            .into_iter()
            .take(OPTION_COUNT - 1)
            .map(str::to_string),
    );

    let mut fillers: Vec<&str> = side.fillers().to_vec();
    fillers.shuffle(rng);
    for filler in fillers {
        if options.len() >= OPTION_COUNT {
            break;
        }
        if !options.iter().any(|o| o == filler) {
            options.push(filler.to_string());
        }
    }

    options.shuffle(rng);
    options
}
