//! Settings read from a separate file and the environment.
//!
//! ```toml
//! [grammar]
//! code_open = "`"
//! code_close = "`"
//! escape = "\\"
//! binding_open = "("
//! binding_close = ")"
//!
//! [composition]
//! joiner = ""
//! binding_scope = "evaluator"
//! ```
//!
//! Every entry is optional. Environment variables prefixed with `TESSERA`
//! override the file, using `__` between table and key.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::composition::{BindingScope, Composition};
use crate::error::{Result, TesseraError};
use crate::template::{Grammar, Tokenizer};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GrammarSection {
    code_open: String,
    code_close: String,
    escape: String,
    binding_open: String,
    binding_close: String,
}
impl Default for GrammarSection {
    fn default() -> Self {
        Self {
            code_open: Grammar::CODE_OPEN.to_string(),
            code_close: Grammar::CODE_CLOSE.to_string(),
            escape: Grammar::ESCAPE.to_string(),
            binding_open: Grammar::BINDING_OPEN.to_string(),
            binding_close: Grammar::BINDING_CLOSE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CompositionSection {
    joiner: String,
    binding_scope: String,
}
impl Default for CompositionSection {
    fn default() -> Self {
        Self {
            joiner: String::new(),
            binding_scope: "evaluator".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    grammar: GrammarSection,
    composition: CompositionSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub grammar: Grammar,
    pub joiner: String,
    pub binding_scope: BindingScope,
}

impl Settings {
    /// Reads settings from the file at `path` (if it exists) and then from the environment.
    pub fn load(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TESSERA").separator("__"))
            .build()?;
        debug!(path, "loaded settings");
        Self::from_config(config)
    }
    /// Reads settings from TOML text only.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }
    fn from_config(config: Config) -> Result<Self> {
        let raw: RawSettings = config.try_deserialize()?;
        let grammar = Grammar {
            code_open: single_char("code_open", &raw.grammar.code_open)?,
            code_close: single_char("code_close", &raw.grammar.code_close)?,
            escape: single_char("escape", &raw.grammar.escape)?,
            binding_open: single_char("binding_open", &raw.grammar.binding_open)?,
            binding_close: single_char("binding_close", &raw.grammar.binding_close)?,
        };
        Ok(Self {
            grammar,
            joiner: raw.composition.joiner,
            binding_scope: raw.composition.binding_scope.parse()?,
        })
    }

    /// Tokenizes `source` with the configured grammar into a composition
    /// carrying the configured joiner and binding scope.
    pub fn compose(&self, source: &str) -> Result<Composition> {
        Ok(Tokenizer::with_grammar(source, self.grammar)?
            .compose()?
            .with_joiner(self.joiner.clone())
            .with_scope(self.binding_scope))
    }
}

fn single_char(key: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TesseraError::Config(format!(
            "grammar.{} must be exactly one character, got '{}'",
            key, value
        ))),
    }
}
