use idiomaster_core::{Catalog, QuestionBank};
use std::fs;
use std::path::Path;

pub const BUNDLED_IDIOMS: &str = include_str!("../assets/idioms.json");
pub const BUNDLED_QUIZ_QUESTIONS: &str = include_str!("../assets/quiz_questions.json");

/// Loads the idiom catalog, falling back stage by stage: an explicit file
/// when given, then the bundled asset, then the in-code builtin set. The
/// caller always gets a catalog.
pub fn load_catalog(path: Option<&Path>) -> Catalog {
    if let Some(p) = path {
        match fs::read_to_string(p) {
            Ok(json) => match Catalog::parse(&json) {
                Ok(catalog) => return catalog,
                Err(err) => {
                    tracing::warn!(%err, path = %p.display(), "idiom file failed to parse, using bundled catalog")
                }
            },
            Err(err) => {
                tracing::warn!(%err, path = %p.display(), "idiom file unreadable, using bundled catalog")
            }
        }
    }
    match Catalog::parse(BUNDLED_IDIOMS) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(%err, "bundled catalog failed to parse, using builtin idioms");
            Catalog::builtin()
        }
    }
}

/// Loads the curated quiz question bank; a missing or broken source yields
/// the empty bank, which routes every quiz to generated questions.
pub fn load_question_bank(path: Option<&Path>) -> QuestionBank {
    let json = match path {
        Some(p) => match fs::read_to_string(p) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, path = %p.display(), "question file unreadable, using bundled bank");
                BUNDLED_QUIZ_QUESTIONS.to_string()
            }
        },
        None => BUNDLED_QUIZ_QUESTIONS.to_string(),
    };
    match QuestionBank::parse(&json) {
        Ok(bank) => bank,
        Err(err) => {
            tracing::warn!(%err, "question bank failed to decode, quizzes fall back to generated questions");
            QuestionBank::empty()
        }
    }
}
