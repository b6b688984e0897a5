use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use uyghurly_types::UnitQuiz;

use crate::error::QuizError;
use crate::generator::QuizGenerator;

#[derive(Default)]
struct Entries {
    quizzes: HashMap<String, Arc<UnitQuiz>>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
}

/// Bounded per-unit quiz cache shared across tasks
pub struct QuizCache {
    generator: QuizGenerator,
    capacity: usize,
    entries: RwLock<Entries>,
}

impl QuizCache {
    pub fn new(generator: QuizGenerator, capacity: usize) -> Self {
        Self {
            generator,
            capacity: capacity.max(1),
            entries: RwLock::new(Entries::default()),
        }
    }

    pub fn generator(&self) -> &QuizGenerator {
        &self.generator
    }

    /// Cached quiz for `unit_id`, generating it on first request.
    ///
    /// A miss is resolved while holding the write lock, so concurrent callers
    /// for the same unit all receive the same quiz.
    pub fn get_or_generate(
        &self,
        unit_id: &str,
        unit_title: &str,
    ) -> Result<Arc<UnitQuiz>, QuizError> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(quiz) = entries.quizzes.get(unit_id) {
                return Ok(Arc::clone(quiz));
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(quiz) = entries.quizzes.get(unit_id) {
            return Ok(Arc::clone(quiz));
        }

        let seed = self.generator.next_seed();
        let quiz = Arc::new(self.generator.generate_unit_quiz(unit_id, unit_title, seed)?);

        while entries.quizzes.len() >= self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.quizzes.remove(&oldest);
            tracing::debug!("Evicted cached quiz for unit {oldest}");
        }

        entries.quizzes.insert(unit_id.to_string(), Arc::clone(&quiz));
        entries.order.push_back(unit_id.to_string());
        Ok(quiz)
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.quizzes.clear();
        entries.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .quizzes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
