pub mod storage;
pub mod text;
pub mod validation;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use text::{AnswerMatcher, DefaultMatcher, is_correct_answer, normalize_text};
