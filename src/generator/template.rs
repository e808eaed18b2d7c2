use super::pool::{fill_template, slot_names, TemplatePool};
use super::radix;
use crate::curriculum::{Difficulty, TieredBank};
use include_dir::{include_dir, Dir};
use log::trace;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/generator/templates");

/// One slot pattern bound to its pools in radix order
#[derive(Clone, Debug)]
pub struct TemplateVariant {
    pub name: String,
    pub pattern: String,
    pub slots: Vec<TemplatePool>,
}

impl TemplateVariant {
    /// Bind `slot_order` to the pools with the same names.
    /// Panics on a slot with no pool; templates are embedded content.
    fn bind(name: &str, pattern: &str, slot_order: &[String], pools: &[TemplatePool]) -> Self {
        let slots = slot_order
            .iter()
            .map(|slot| {
                pools
                    .iter()
                    .find(|p| &p.name == slot)
                    .cloned()
                    .unwrap_or_else(|| panic!("Template {name} uses unknown pool {slot}"))
            })
            .collect();

        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            slots,
        }
    }

    pub fn radices(&self) -> Vec<usize> {
        self.slots.iter().map(|p| p.size).collect()
    }

    /// Distinct token tuples before the variant starts repeating
    pub fn capacity(&self) -> Option<u64> {
        radix::capacity(&self.radices())
    }

    /// `(slot name, token)` pairs for a within-variant index
    pub fn tokens(&self, within: u64) -> Vec<(&str, &str)> {
        let digits = radix::decode(within, &self.radices());
        trace!(target: "drillgen::template", "{} #{within} -> {digits:?}", self.name);
        self.slots
            .iter()
            .zip(digits)
            .map(|(pool, digit)| (pool.name.as_str(), pool.token(digit)))
            .collect()
    }

    pub fn render(&self, within: u64) -> String {
        fill_template(&self.pattern, &self.tokens(within))
    }
}

/// Alternative variants for one (kind, difficulty)
#[derive(Clone, Debug)]
pub struct TemplateBucket<'a, V> {
    pub variants: &'a [V],
}

impl<'a, V> TemplateBucket<'a, V> {
    /// Variant for `index` and the index to decode within it.
    /// Panics on an empty bucket; every embedded tier has variants.
    pub fn pick(&self, index: u64) -> (&'a V, u64) {
        let (variant, within) = radix::split_variant(index, self.variants.len());
        (&self.variants[variant], within)
    }
}

#[derive(Deserialize, Clone, Debug)]
struct RawBucket<V> {
    pools: Vec<TemplatePool>,
    variants: Vec<V>,
}

#[derive(Deserialize, Clone, Debug)]
struct SentencePattern {
    name: String,
    pattern: String,
}

/// Per-word-type vocabulary template: the word list plus the definition and
/// example shapes built around it.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VocabularySpec {
    pub word_type: String,
    pub entries: TemplatePool,
    pub pronunciations: Vec<String>,
    pub glosses: Vec<String>,
    pub definition: String,
    pub example: String,
    pub question: String,
}

#[derive(Clone, Debug)]
pub struct VocabularyTemplate {
    pub spec: VocabularySpec,
    /// `word` first, then the example's context slots
    pub slots: TemplateVariant,
}

#[derive(Deserialize, Clone, Debug)]
pub struct QuestionSpec {
    pub prompt: String,
    pub slot: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ReadingSpec {
    pub name: String,
    pub title: String,
    pub sentences: Vec<String>,
    pub dictation: usize,
    pub questions: Vec<QuestionSpec>,
}

#[derive(Clone, Debug)]
pub struct ReadingTemplate {
    pub spec: ReadingSpec,
    pub slots: TemplateVariant,
}

#[derive(Clone, Debug)]
pub struct Templates {
    pub sentences: TieredBank<TemplateVariant>,
    pub vocabulary: TieredBank<VocabularyTemplate>,
    pub reading: TieredBank<ReadingTemplate>,
}

impl Templates {
    fn load() -> Self {
        let sentences = read_templates::<SentencePattern>("sentences.json");
        let vocabulary = read_templates::<VocabularySpec>("vocabulary.json");
        let reading = read_templates::<ReadingSpec>("reading.json");

        Self {
            sentences: into_tiers(sentences, |pools, v| {
                TemplateVariant::bind(&v.name, &v.pattern, &slot_names(&v.pattern), pools)
            }),
            vocabulary: into_tiers(vocabulary, |pools, spec| {
                let mut pools = pools.to_vec();
                let mut word_pool = spec.entries.clone();
                word_pool.name = "word".into();
                pools.push(word_pool);

                let mut order = vec!["word".to_string()];
                order.extend(slot_names(&spec.example).into_iter().filter(|s| s != "word"));
                let slots = TemplateVariant::bind(&spec.word_type, &spec.example, &order, &pools);
                VocabularyTemplate { spec, slots }
            }),
            reading: into_tiers(reading, |pools, spec| {
                let mut all_text = spec.title.clone();
                for s in &spec.sentences {
                    all_text.push(' ');
                    all_text.push_str(s);
                }
                let order = slot_names(&all_text);
                let slots = TemplateVariant::bind(&spec.name, &all_text, &order, pools);
                ReadingTemplate { spec, slots }
            }),
        }
    }

    pub fn sentence_bucket(&self, difficulty: Difficulty) -> TemplateBucket<'_, TemplateVariant> {
        TemplateBucket {
            variants: self.sentences.tier(difficulty),
        }
    }

    pub fn vocabulary_bucket(
        &self,
        difficulty: Difficulty,
    ) -> TemplateBucket<'_, VocabularyTemplate> {
        TemplateBucket {
            variants: self.vocabulary.tier(difficulty),
        }
    }

    pub fn reading_bucket(&self, difficulty: Difficulty) -> TemplateBucket<'_, ReadingTemplate> {
        TemplateBucket {
            variants: self.reading.tier(difficulty),
        }
    }
}

/// Shared, lazily parsed templates. Read-only after first use.
pub fn templates() -> &'static Templates {
    static TEMPLATES: OnceLock<Templates> = OnceLock::new();
    TEMPLATES.get_or_init(Templates::load)
}

fn read_templates<V: DeserializeOwned>(file_name: &str) -> TieredBank<RawBucket<V>> {
    let file = TEMPLATE_DIR
        .get_file(file_name)
        .unwrap_or_else(|| panic!("Template file {file_name} not embedded"));

    let contents = file
        .contents_utf8()
        .expect("Unable to interpret template file as a string");

    #[derive(Deserialize)]
    struct Tiers<V> {
        basic: RawBucket<V>,
        intermediate: RawBucket<V>,
        medium: RawBucket<V>,
    }

    let tiers: Tiers<V> = serde_json::from_str(contents)
        .unwrap_or_else(|e| panic!("Unable to deserialize template file {file_name}: {e}"));

    TieredBank {
        basic: vec![tiers.basic],
        intermediate: vec![tiers.intermediate],
        medium: vec![tiers.medium],
    }
}

fn into_tiers<V, T>(
    raw: TieredBank<RawBucket<V>>,
    mut build: impl FnMut(&[TemplatePool], V) -> T,
) -> TieredBank<T> {
    raw.map(|buckets| {
        buckets
            .into_iter()
            .flat_map(|bucket| {
                let pools = bucket.pools;
                bucket
                    .variants
                    .into_iter()
                    .map(|v| build(&pools, v))
                    .collect::<Vec<_>>()
            })
            .collect()
    })
}
