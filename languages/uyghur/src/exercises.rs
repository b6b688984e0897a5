use rand::Rng;
use rand::seq::SliceRandom;
use uyghurly_core::text::clean_text;
use uyghurly_types::{Exercise, TranslationDirection, TypingQuestion, VocabularyItem};

/// Wrong options offered next to the correct one
const DISTRACTORS: usize = 3;

fn pick_direction<R: Rng + ?Sized>(rng: &mut R) -> TranslationDirection {
    if rng.gen_bool(0.5) {
        TranslationDirection::UyghurToEnglish
    } else {
        TranslationDirection::EnglishToUyghur
    }
}

/// The side of `item` a learner has to produce
fn answer_side(item: &VocabularyItem, direction: TranslationDirection) -> &str {
    match direction {
        TranslationDirection::UyghurToEnglish => &item.english,
        TranslationDirection::EnglishToUyghur => &item.uyghur,
    }
}

/// One multiple-choice exercise per vocabulary item, direction chosen at random
pub fn generate_exercises<R: Rng + ?Sized>(
    vocabulary: &[VocabularyItem],
    rng: &mut R,
) -> Vec<Exercise> {
    vocabulary
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let direction = pick_direction(rng);

            let (question, correct_answer) = match direction {
                TranslationDirection::UyghurToEnglish => (
                    format!(
                        "What is the English translation of \"{}\"?",
                        clean_text(&item.uyghur)
                    ),
                    clean_text(&item.english),
                ),
                TranslationDirection::EnglishToUyghur => (
                    format!(
                        "What is the Uyghur translation of \"{}\"?",
                        clean_text(&item.english)
                    ),
                    clean_text(&item.uyghur),
                ),
            };

            let mut others: Vec<String> = vocabulary
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, other)| clean_text(answer_side(other, direction)))
                .filter(|text| !text.is_empty() && *text != correct_answer)
                .collect();
            others.sort();
            others.dedup();
            others.shuffle(rng);

            let mut options = vec![correct_answer.clone()];
            options.extend(others.into_iter().take(DISTRACTORS));
            options.shuffle(rng);

            Exercise {
                question,
                options,
                correct_answer,
            }
        })
        .collect()
}

/// One typing question per vocabulary item; the definition doubles as the hint
pub fn generate_typing_questions<R: Rng + ?Sized>(
    vocabulary: &[VocabularyItem],
    rng: &mut R,
) -> Vec<TypingQuestion> {
    vocabulary
        .iter()
        .map(|item| {
            let direction = pick_direction(rng);
            let (question, answer) = match direction {
                TranslationDirection::UyghurToEnglish => (
                    format!(
                        "Type the English translation of \"{}\":",
                        clean_text(&item.uyghur)
                    ),
                    clean_text(&item.english),
                ),
                TranslationDirection::EnglishToUyghur => (
                    format!(
                        "Type the Uyghur translation of \"{}\":",
                        clean_text(&item.english)
                    ),
                    clean_text(&item.uyghur),
                ),
            };

            let hint = (!item.definition.trim().is_empty()).then(|| item.definition.clone());

            TypingQuestion {
                question,
                correct_answer: answer.to_lowercase(),
                direction,
                hint,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn vocab() -> Vec<VocabularyItem> {
        [
            ("Salam", "hello (greeting)", "A greeting"),
            ("Rehmet", "thank you", "Gratitude"),
            ("Khosh", "goodbye", "Parting"),
            ("Ha", "yes", "Affirmative"),
            ("Yaq", "no", ""),
        ]
        .into_iter()
        .map(|(u, e, d)| VocabularyItem {
            uyghur: u.to_string(),
            english: e.to_string(),
            definition: d.to_string(),
        })
        .collect()
    }

    #[test]
    fn exercises_contain_correct_answer_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let exercises = generate_exercises(&vocab(), &mut rng);

        assert_eq!(exercises.len(), 5);
        for exercise in &exercises {
            assert_eq!(exercise.options.len(), 4);
            let hits = exercise
                .options
                .iter()
                .filter(|o| **o == exercise.correct_answer)
                .count();
            assert_eq!(hits, 1, "{exercise:?}");
            assert!(!exercise.correct_answer.contains('('));
        }
    }

    #[test]
    fn tiny_lessons_get_fewer_options() {
        let mut rng = StdRng::seed_from_u64(1);
        let exercises = generate_exercises(&vocab()[..2], &mut rng);
        assert!(exercises.iter().all(|e| e.options.len() == 2));

        let single = generate_exercises(&vocab()[..1], &mut rng);
        assert_eq!(single[0].options.len(), 1);
    }

    #[test]
    fn typing_answers_are_clean_and_lowercase() {
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_typing_questions(&vocab(), &mut rng);

        let salam = &questions[0];
        match salam.direction {
            TranslationDirection::UyghurToEnglish => {
                assert_eq!(salam.correct_answer, "hello");
                assert_eq!(salam.question, "Type the English translation of \"Salam\":");
            }
            TranslationDirection::EnglishToUyghur => {
                assert_eq!(salam.correct_answer, "salam");
                assert_eq!(salam.question, "Type the Uyghur translation of \"hello\":");
            }
        }
        assert_eq!(salam.hint.as_deref(), Some("A greeting"));
        assert_eq!(questions[4].hint, None);
    }

    #[test]
    fn same_seed_same_exercises() {
        let a = generate_exercises(&vocab(), &mut StdRng::seed_from_u64(42));
        let b = generate_exercises(&vocab(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
