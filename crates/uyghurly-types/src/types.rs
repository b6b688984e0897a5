use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single word or phrase of the static content bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub uyghur: String,
    pub english: String,
    pub definition: String,
}

/// Lesson multiple-choice exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationDirection {
    UyghurToEnglish,
    EnglishToUyghur,
}

impl TranslationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationDirection::UyghurToEnglish => "uyghur-to-english",
            TranslationDirection::EnglishToUyghur => "english-to-uyghur",
        }
    }
}

/// Free-text question answered by typing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingQuestion {
    pub question: String,
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub direction: TranslationDirection,
    pub hint: Option<String>,
}

/// Lesson record derived from the raw vocabulary rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub unit: String,
    pub vocabulary: Vec<VocabularyItem>,
    pub exercises: Vec<Exercise>,
    pub typing_questions: Vec<TypingQuestion>,
}

/// Unit entry of the `units.json` manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    pub lessons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    Translation,
    FillInBlank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitQuiz {
    pub unit_id: String,
    pub unit_title: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    /// Minimum percentage required to pass
    pub passing_score: u32,
    /// Minutes
    pub time_limit: Option<u32>,
    /// Seed the quiz was generated from; regenerating with it yields the same quiz
    pub seed: u64,
}

/// `lesson-<slug>` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStatus {
    pub completed: bool,
    pub score: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
}

/// `quiz-<unitId>` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    /// Percentage, 0-100
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub completed_at: DateTime<Utc>,
    pub passed: bool,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

/// Per-unit entry of the user document's progress map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProgress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl UnitProgress {
    /// Overlay the fields set in `update`
    pub fn merge(&mut self, update: &UnitProgress) {
        if update.lesson_completed.is_some() {
            self.lesson_completed = update.lesson_completed;
        }
        if update.quiz_completed.is_some() {
            self.quiz_completed = update.quiz_completed;
        }
        if update.quiz_score.is_some() {
            self.quiz_score = update.quiz_score;
        }
        if update.completed_at.is_some() {
            self.completed_at = update.completed_at;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub level: String,
    pub lessons_completed: u32,
    /// Minutes
    pub total_study_time: u32,
    pub streak: u32,
    pub achievements: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            level: "Beginner".to_string(),
            lessons_completed: 0,
            total_study_time: 0,
            streak: 0,
            achievements: 0,
        }
    }
}

/// Document of the `users` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub progress: BTreeMap<String, UnitProgress>,
}

/// Fields supplied when creating a user document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub is_guest: bool,
}

/// The signed-in user as seen by the rest of the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub is_guest: bool,
}

impl From<&UserData> for SessionUser {
    fn from(user: &UserData) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_guest: user.is_guest,
        }
    }
}

/// Dictionary page entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub uyghur: String,
    pub english: String,
    pub definition: String,
    pub unit: String,
}
