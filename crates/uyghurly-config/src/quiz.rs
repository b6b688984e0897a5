use serde::{Deserialize, Serialize};

fn default_max_questions() -> usize {
    20
}

fn default_passing_score() -> u32 {
    70
}

fn default_time_limit() -> Option<u32> {
    Some(20)
}

fn default_cache_capacity() -> usize {
    32
}

fn default_lives() -> u32 {
    3
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct QuizConfig {
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    /// Percentage
    #[serde(default = "default_passing_score")]
    pub passing_score: u32,
    /// Minutes
    #[serde(default = "default_time_limit")]
    pub time_limit: Option<u32>,
    /// Max cached unit quizzes, oldest evicted first
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Fixed seed for quiz generation, random per generation when unset
    pub seed: Option<u64>,
    /// Lives per practice session
    #[serde(default = "default_lives")]
    pub lives: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            passing_score: default_passing_score(),
            time_limit: default_time_limit(),
            cache_capacity: default_cache_capacity(),
            seed: None,
            lives: default_lives(),
        }
    }
}
