use crate::errors::CoreError;
use crate::models::{Example, Idiom, Level, Tone};
use serde::Deserialize;
use serde_json::Value;

/// Idiom collection backing daily selection and the library.
///
/// A catalog is never empty; construction fails rather than producing one.
#[derive(Clone, Debug)]
pub struct Catalog {
    idioms: Vec<Idiom>,
}

// Decoded per record so one bad entry does not sink the rest.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdiom {
    #[serde(default)]
    id: String,
    title: String,
    meaning: String,
    nuance: String,
    level: Level,
    is_premium: bool,
    examples: Vec<Value>,
    tags: Vec<String>,
}

impl RawIdiom {
    fn into_idiom(self) -> Idiom {
        let examples = self
            .examples
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Example>(entry) {
                Ok(example) => Some(example),
                Err(err) => {
                    tracing::warn!(%err, title = %self.title, "dropping malformed example");
                    None
                }
            })
            .collect();
        Idiom {
            id: self.id,
            title: self.title,
            meaning: self.meaning,
            nuance: self.nuance,
            examples,
            tags: self.tags,
            level: self.level,
            is_premium: self.is_premium,
        }
    }
}

impl Catalog {
    pub fn new(idioms: Vec<Idiom>) -> Result<Self, CoreError> {
        if idioms.is_empty() {
            return Err(CoreError::Invalid("empty catalog"));
        }
        Ok(Self { idioms })
    }

    /// Decodes a JSON array of idiom records, skipping records that fail to
    /// decode. Errors only when the input is not an array or nothing survives.
    pub fn parse(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<Value> =
            serde_json::from_str(json).map_err(|_| CoreError::Parse("idiom catalog"))?;
        let mut idioms = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<RawIdiom>(entry) {
                Ok(raw) => idioms.push(raw.into_idiom()),
                Err(err) => tracing::warn!(%err, "dropping malformed idiom record"),
            }
        }
        Self::new(idioms)
    }

    /// Minimal in-code catalog used when no usable idiom data can be loaded.
    pub fn builtin() -> Self {
        let idioms = vec![
            Idiom::new("B1-1", "Break a leg", "頑張って！成功を祈る！", Level::B1)
                .with_nuance("舞台や発表の前に使う励ましの言葉。直訳とは逆に幸運を祈る意味。")
                .with_examples(vec![
                    Example::new(
                        "Break a leg in your performance tonight!",
                        "今夜の公演、頑張ってね！",
                        Tone::Casual,
                    ),
                    Example::new(
                        "I wanted to wish you the best before your presentation. Break a leg!",
                        "プレゼンの前に応援したくて。成功を祈っています！",
                        Tone::Formal,
                    ),
                ])
                .with_tags(vec!["舞台".into(), "成功".into(), "励まし".into()]),
            Idiom::new("A2-1", "Piece of cake", "簡単だよ！朝飯前！", Level::A2)
                .with_nuance("とても簡単にできることを表すカジュアルな表現。")
                .with_examples(vec![
                    Example::new(
                        "That test was a piece of cake!",
                        "あのテスト、超簡単だった！",
                        Tone::Casual,
                    ),
                    Example::new(
                        "The assignment should be a piece of cake for someone with your experience.",
                        "あなたの経験があれば、その課題は簡単なはずです。",
                        Tone::Formal,
                    ),
                ])
                .with_tags(vec!["簡単".into(), "成功".into()]),
        ];
        Self { idioms }
    }

    pub fn get(&self, id: &str) -> Option<&Idiom> {
        self.idioms.iter().find(|idiom| idiom.id == id)
    }

    pub fn by_level(&self, level: Level) -> Vec<&Idiom> {
        self.idioms.iter().filter(|i| i.level == level).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Idiom> {
        self.idioms.iter()
    }

    pub fn idioms(&self) -> &[Idiom] {
        &self.idioms
    }

    pub fn len(&self) -> usize {
        self.idioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idioms.is_empty()
    }
}
