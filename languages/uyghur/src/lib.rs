pub mod catalog;
pub mod convert;
pub mod dictionary;
pub mod error;
pub mod exercises;
pub mod loader;

pub use catalog::LessonCatalog;
pub use convert::{RawVocabularyRow, convert_raw_lessons};
pub use dictionary::UyghurDictionary;
pub use error::ContentError;
pub use loader::{ContentBundle, ContentLoader};
