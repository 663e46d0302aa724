//! Amazon Translate commands

mod jobs;
mod terminology;
mod text;

pub use jobs::{ListTextTranslationJobs, ListTextTranslationJobsParams};
pub use terminology::{DeleteTerminology, DeleteTerminologyParams, ListTerminologies, ListTerminologiesParams};
pub use text::{ListLanguages, ListLanguagesParams, TranslateText, TranslateTextParams};
