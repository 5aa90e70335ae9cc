use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type IdiomId = String;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::A1,
        Level::A2,
        Level::B1,
        Level::B2,
        Level::C1,
        Level::C2,
    ];

    pub fn index(&self) -> usize {
        match self {
            Level::A1 => 0,
            Level::A2 => 1,
            Level::B1 => 2,
            Level::B2 => 3,
            Level::C1 => 4,
            Level::C2 => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(Level::A1),
            "A2" => Ok(Level::A2),
            "B1" => Ok(Level::B1),
            "B2" => Ok(Level::B2),
            "C1" => Ok(Level::C1),
            "C2" => Ok(Level::C2),
            _ => Err(CoreError::Invalid("level")),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Formal,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Casual => f.write_str("casual"),
            Tone::Formal => f.write_str("formal"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Example {
    pub english: String,
    pub translated: String,
    pub tone: Tone,
}

impl Example {
    pub fn new(english: impl Into<String>, translated: impl Into<String>, tone: Tone) -> Self {
        Self {
            english: english.into(),
            translated: translated.into(),
            tone,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Idiom {
    #[serde(default)]
    pub id: IdiomId,
    pub title: String,
    pub meaning: String,
    pub nuance: String,
    pub examples: Vec<Example>,
    pub tags: Vec<String>,
    pub level: Level,
    pub is_premium: bool,
}

impl Idiom {
    pub fn new(
        id: impl Into<IdiomId>,
        title: impl Into<String>,
        meaning: impl Into<String>,
        level: Level,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            meaning: meaning.into(),
            nuance: String::new(),
            examples: Vec::new(),
            tags: Vec::new(),
            level,
            is_premium: false,
        }
    }

    pub fn with_nuance(mut self, nuance: impl Into<String>) -> Self {
        self.nuance = nuance.into();
        self
    }

    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = examples;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
