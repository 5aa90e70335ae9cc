use crate::models::{Idiom, Level};

/// Case-insensitive substring match over title, meaning, nuance and tags.
/// Blank queries return everything.
pub fn filter_by_text(idioms: &[Idiom], query: &str) -> Vec<Idiom> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return idioms.to_vec();
    }
    idioms
        .iter()
        .filter(|idiom| {
            idiom.title.to_lowercase().contains(&q)
                || idiom.meaning.to_lowercase().contains(&q)
                || idiom.nuance.to_lowercase().contains(&q)
                || idiom.tags.iter().any(|tag| tag.to_lowercase().contains(&q))
        })
        .cloned()
        .collect()
}

pub fn filter_by_tag(idioms: &[Idiom], tag: &str) -> Vec<Idiom> {
    idioms
        .iter()
        .filter(|idiom| idiom.has_tag(tag))
        .cloned()
        .collect()
}

pub fn filter_by_level(idioms: &[Idiom], level: Level) -> Vec<Idiom> {
    idioms
        .iter()
        .filter(|idiom| idiom.level == level)
        .cloned()
        .collect()
}
