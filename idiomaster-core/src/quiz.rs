use crate::catalog::Catalog;
use crate::errors::CoreError;
use crate::models::{Idiom, Level};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quiz percentage at or above which an idiom counts as learned.
pub const PASS_PERCENT: f64 = 60.0;

/// Language the question prompts are shown in. Answer language is fixed per
/// question kind: meaning and context answer in the native language,
/// fill-in-the-blank answers with the English idiom itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lang {
    English,
    Native,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Meaning,
    FillBlank,
    Context,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub question: String,
    pub question_native: String,
    pub correct_answer: String,
    pub correct_answer_native: String,
    pub distractors: Vec<String>,
    pub distractors_native: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdiomQuestions {
    pub meaning: QuestionTemplate,
    pub fill_blank: QuestionTemplate,
    pub context: QuestionTemplate,
}

/// Curated question sets, keyed by level and then by idiom title.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub quiz_questions: HashMap<Level, HashMap<String, IdiomQuestions>>,
}

impl QuestionBank {
    pub fn parse(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|_| CoreError::Parse("quiz question bank"))
    }

    /// Bank with no entries; every idiom falls back to generated questions.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, level: Level, title: &str) -> Option<&IdiomQuestions> {
        self.quiz_questions.get(&level).and_then(|m| m.get(title))
    }

    pub fn available_levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self.quiz_questions.keys().copied().collect();
        levels.sort();
        levels
    }

    pub fn titles_for_level(&self, level: Level) -> Vec<&str> {
        let mut titles: Vec<&str> = self
            .quiz_questions
            .get(&level)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        titles.sort_unstable();
        titles
    }

    pub fn is_empty(&self) -> bool {
        self.quiz_questions.values().all(|m| m.is_empty())
    }
}

/// A ready-to-ask multiple-choice question. `answer` indexes into `options`.
#[derive(Clone, Debug)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: usize,
    pub kind: QuestionKind,
}

fn build_question(
    prompt: String,
    correct: String,
    distractors: Vec<String>,
    kind: QuestionKind,
    rng: &mut impl Rng,
) -> QuizQuestion {
    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(correct.clone());
    options.extend(distractors);
    options.shuffle(rng);
    let answer = options.iter().position(|opt| *opt == correct).unwrap_or(0);
    QuizQuestion {
        prompt,
        options,
        answer,
        kind,
    }
}

fn question_from_template(
    template: &QuestionTemplate,
    kind: QuestionKind,
    lang: Lang,
    rng: &mut impl Rng,
) -> QuizQuestion {
    let prompt = match lang {
        Lang::Native => template.question_native.clone(),
        Lang::English => template.question.clone(),
    };
    let (correct, distractors) = match kind {
        QuestionKind::FillBlank => (
            template.correct_answer.clone(),
            template.distractors.clone(),
        ),
        QuestionKind::Meaning | QuestionKind::Context => (
            template.correct_answer_native.clone(),
            template.distractors_native.clone(),
        ),
    };
    build_question(prompt, correct, distractors, kind, rng)
}

/// Questions for one idiom: the curated set when the bank has one, generated
/// questions otherwise. Question order is shuffled either way.
pub fn questions_for_idiom(
    bank: &QuestionBank,
    catalog: &Catalog,
    idiom: &Idiom,
    lang: Lang,
    rng: &mut impl Rng,
) -> Vec<QuizQuestion> {
    let mut questions = match bank.lookup(idiom.level, &idiom.title) {
        Some(set) => vec![
            question_from_template(&set.meaning, QuestionKind::Meaning, lang, rng),
            question_from_template(&set.fill_blank, QuestionKind::FillBlank, lang, rng),
            question_from_template(&set.context, QuestionKind::Context, lang, rng),
        ],
        None => fallback_questions(catalog, idiom, lang, rng),
    };
    questions.shuffle(rng);
    questions
}

fn fallback_questions(
    catalog: &Catalog,
    idiom: &Idiom,
    lang: Lang,
    rng: &mut impl Rng,
) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();

    let meaning_prompt = match lang {
        Lang::Native => format!("「{}」の意味は？", idiom.title),
        Lang::English => format!("What does '{}' mean?", idiom.title),
    };
    let distractors = sample_others(catalog, idiom, rng, |other| other.meaning.clone());
    questions.push(build_question(
        meaning_prompt,
        idiom.meaning.clone(),
        distractors,
        QuestionKind::Meaning,
        rng,
    ));

    // Needs an example sentence to blank the idiom out of. When the example
    // does not quote the title verbatim the question goes out blank-less.
    if let Some(example) = idiom.examples.first() {
        if !example.english.is_empty() {
            let blanked = example.english.replace(&idiom.title, "_____");
            let prompt = match lang {
                Lang::Native => format!("空欄を埋めてください：{blanked}"),
                Lang::English => format!("Fill in the blank: {blanked}"),
            };
            let distractors = sample_others(catalog, idiom, rng, |other| other.title.clone());
            questions.push(build_question(
                prompt,
                idiom.title.clone(),
                distractors,
                QuestionKind::FillBlank,
                rng,
            ));
        }
    }

    if let Some(question) = context_question(idiom, lang, rng) {
        questions.push(question);
    }

    questions
}

fn sample_others(
    catalog: &Catalog,
    idiom: &Idiom,
    rng: &mut impl Rng,
    pick: impl Fn(&Idiom) -> String,
) -> Vec<String> {
    let mut others: Vec<&Idiom> = catalog
        .iter()
        .filter(|other| other.id != idiom.id && other.title != idiom.title)
        .collect();
    others.shuffle(rng);
    others.into_iter().take(3).map(pick).collect()
}

// Primary-tag to usage-category table for generated context questions.
const TAG_CATEGORIES: &[(&str, &str)] = &[
    ("挨拶", "Greetings"),
    ("励まし", "Encouragement"),
    ("成功", "Success"),
    ("幸運", "Luck"),
    ("簡単", "Simplicity"),
    ("体調", "Health"),
    ("勉強", "Studying"),
    ("努力", "Effort"),
    ("秘密", "Secrecy"),
    ("覚悟", "Determination"),
    ("手抜き", "Shortcuts"),
    ("過労", "Overworking"),
    ("諦め", "Giving up"),
    ("能力", "Ability"),
    ("冷静", "Calmness"),
    ("開始", "Beginnings"),
    ("終了", "Endings"),
    ("問題", "Problems"),
    ("トラブル", "Trouble"),
    ("時間", "Time"),
    ("睡眠", "Sleep"),
    ("幸せ", "Happiness"),
    ("高価", "Expense"),
    ("稀", "Rarity"),
    ("利益", "Profit"),
    ("突然", "Suddenness"),
    ("理解", "Understanding"),
    ("冗談", "Jokes"),
    ("正確", "Accuracy"),
    ("緊張", "Nervousness"),
    ("規則", "Rules"),
    ("反対", "Opposition"),
    ("責任", "Responsibility"),
    ("機会", "Opportunity"),
    ("好み", "Preferences"),
    ("偶然", "Coincidence"),
    ("延期", "Postponement"),
    ("決定", "Decisions"),
    ("リスク", "Risk"),
    ("流行", "Trends"),
    ("習慣", "Habits"),
    ("危険", "Danger"),
    ("知識", "Knowledge"),
    ("回復", "Recovery"),
    ("誇張", "Exaggeration"),
    ("沈黙", "Silence"),
    ("支え", "Support"),
    ("後悔", "Regret"),
    ("慎重", "Caution"),
    ("継続", "Persistence"),
    ("迅速", "Speed"),
    ("無視", "Ignoring"),
    ("要点", "Key points"),
    ("感情", "Emotions"),
];

/// Usage-category question from the idiom's first tag. None when the tag has
/// no category mapping or fewer than three other categories exist.
fn context_question(idiom: &Idiom, lang: Lang, rng: &mut impl Rng) -> Option<QuizQuestion> {
    let primary = idiom.tags.first()?;
    let category = TAG_CATEGORIES
        .iter()
        .find(|(tag, _)| tag == primary)
        .map(|(_, category)| *category)?;
    let mut pool: Vec<&str> = TAG_CATEGORIES
        .iter()
        .map(|(_, c)| *c)
        .filter(|c| *c != category)
        .collect();
    pool.sort_unstable();
    pool.dedup();
    if pool.len() < 3 {
        return None;
    }
    pool.shuffle(rng);
    let distractors = pool[..3].iter().map(|c| c.to_string()).collect();
    let prompt = match lang {
        Lang::Native => "このイディオムは主にどんな場面で使われますか？".to_string(),
        Lang::English => "In what situation is this idiom mainly used?".to_string(),
    };
    Some(build_question(
        prompt,
        category.to_string(),
        distractors,
        QuestionKind::Context,
        rng,
    ))
}

/// Question count for a whole-level quiz.
pub fn level_question_count(level: Level) -> usize {
    match level {
        Level::A1 | Level::A2 => 3,
        Level::B1 | Level::B2 => 4,
        Level::C1 | Level::C2 => 5,
    }
}

/// Mixed quiz across every idiom of one level, truncated to the level's
/// question count after shuffling.
pub fn questions_for_level(
    bank: &QuestionBank,
    catalog: &Catalog,
    level: Level,
    lang: Lang,
    rng: &mut impl Rng,
) -> Vec<QuizQuestion> {
    let mut all = Vec::new();
    for idiom in catalog.by_level(level) {
        all.extend(questions_for_idiom(bank, catalog, idiom, lang, rng));
    }
    all.shuffle(rng);
    all.truncate(level_question_count(level));
    all
}

pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        score as f64 / total as f64 * 100.0
    }
}

pub fn passed(score: usize, total: usize) -> bool {
    percentage(score, total) >= PASS_PERCENT
}
