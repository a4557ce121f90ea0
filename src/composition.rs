// used for building compositions with published values kept per pass
use std::collections::HashMap;
// used to print out readable forms of tokens and compositions
use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice::Iter;
use std::str::FromStr;

use tracing::{debug, trace};

// our own stuff that we need
use crate::duration;
use crate::error::TesseraError;
use crate::interface::Evaluator;
use crate::template::Grammar;

// ------------- Code Fragment -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment {
    binding: Option<String>,
    code: String,
}

impl CodeFragment {
    pub fn new(binding: Option<String>, code: String) -> Self {
        Self { binding, code }
    }
    pub fn anonymous(code: impl Into<String>) -> Self {
        Self::new(None, code.into())
    }
    pub fn named(binding: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(Some(binding.into()), code.into())
    }
    pub fn code(&self) -> &str {
        &self.code
    }
    /// Name the resolved value is published under. Blank names are never
    /// published, although [`CodeFragment::resolve`] still looks them up.
    pub fn binding(&self) -> Option<&str> {
        self.binding.as_deref().filter(|name| !name.trim().is_empty())
    }
    /// Executes the code, rewriting duration literals first when the evaluator asks for it.
    pub fn evaluate<E: Evaluator>(&self, evaluator: &mut E) -> Result<E::Value, E::Error> {
        if evaluator.wants_duration_normalization() {
            let code = duration::normalize(&self.code);
            trace!(code = %self.code, normalized = %code, "normalized fragment code");
            evaluator.execute(&code)
        } else {
            evaluator.execute(&self.code)
        }
    }
    /// The value the evaluator already holds under the binding name, or else
    /// the result of [`CodeFragment::evaluate`]. Any name given, even a blank
    /// one, is looked up.
    pub fn resolve<E: Evaluator>(&self, evaluator: &mut E) -> Result<E::Value, E::Error> {
        if let Some(name) = self.binding.as_deref() {
            if let Some(value) = evaluator.get_named(name) {
                trace!(binding = name, "reusing published value");
                return Ok(value);
            }
        }
        self.evaluate(evaluator)
    }
    pub fn render(&self, grammar: &Grammar) -> String {
        let mut rendered = format!("{}{}{}", grammar.code_open, self.code, grammar.code_close);
        if let Some(binding) = &self.binding {
            rendered.push(grammar.binding_open);
            rendered.push_str(binding);
            rendered.push(grammar.binding_close);
        }
        rendered
    }
}
impl fmt::Display for CodeFragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(&Grammar::default()))
    }
}

// ------------- Token -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Code(CodeFragment),
}

/// A token resolved against an evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'t, V> {
    Text(&'t str),
    Value(V),
}
impl<V: fmt::Display> fmt::Display for Resolved<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resolved::Text(text) => write!(f, "{}", text),
            Resolved::Value(value) => write!(f, "{}", value),
        }
    }
}

impl Token {
    pub fn binding(&self) -> Option<&str> {
        match self {
            Token::Literal(_) => None,
            Token::Code(fragment) => fragment.binding(),
        }
    }
    pub fn resolve<'t, E: Evaluator>(
        &'t self,
        evaluator: &mut E,
    ) -> Result<Resolved<'t, E::Value>, E::Error> {
        match self {
            Token::Literal(text) => Ok(Resolved::Text(text)),
            Token::Code(fragment) => fragment.resolve(evaluator).map(Resolved::Value),
        }
    }
    pub fn render(&self, grammar: &Grammar) -> String {
        match self {
            Token::Literal(text) => text.clone(),
            Token::Code(fragment) => fragment.render(grammar),
        }
    }
}
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(&Grammar::default()))
    }
}
impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Literal(text.to_owned())
    }
}
impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Literal(text)
    }
}
impl From<CodeFragment> for Token {
    fn from(fragment: CodeFragment) -> Self {
        Token::Code(fragment)
    }
}

// ------------- Binding Scope -------------
/// Where a named fragment looks for a value published before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BindingScope {
    /// Only values published earlier in the same build are reused.
    Build,
    /// Anything the evaluator holds is reused, including values from earlier
    /// builds and values the host set before building.
    #[default]
    Evaluator,
}
impl FromStr for BindingScope {
    type Err = TesseraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "build" => Ok(BindingScope::Build),
            "evaluator" => Ok(BindingScope::Evaluator),
            other => Err(TesseraError::Config(format!("unknown binding scope '{}'", other))),
        }
    }
}

// ------------- Composition -------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    tokens: Vec<Token>,
    joiner: String,
    scope: BindingScope,
    grammar: Grammar,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = joiner.into();
        self
    }
    pub fn with_scope(mut self, scope: BindingScope) -> Self {
        self.scope = scope;
        self
    }
    /// Grammar used when rendering the composition back to template text.
    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }
    pub fn joiner(&self) -> &str {
        &self.joiner
    }
    pub fn set_joiner(&mut self, joiner: impl Into<String>) {
        self.joiner = joiner.into();
    }
    pub fn scope(&self) -> BindingScope {
        self.scope
    }
    pub fn set_scope(&mut self, scope: BindingScope) {
        self.scope = scope;
    }
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn push(&mut self, token: impl Into<Token>) {
        self.tokens.push(token.into());
    }
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&mut self, index: usize, token: impl Into<Token>) {
        self.tokens.insert(index, token.into());
    }
    pub fn remove(&mut self, index: usize) -> Option<Token> {
        if index < self.tokens.len() {
            Some(self.tokens.remove(index))
        } else {
            None
        }
    }
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.tokens.get_mut(index)
    }
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    pub fn iter(&self) -> Iter<'_, Token> {
        self.tokens.iter()
    }
    pub fn clear(&mut self) {
        self.tokens.clear();
    }
    pub fn contains(&self, token: &Token) -> bool {
        self.tokens.contains(token)
    }
    pub fn position(&self, token: &Token) -> Option<usize> {
        self.tokens.iter().position(|t| t == token)
    }

    /// Resolves every token in order and concatenates the results.
    ///
    /// Named fragments publish their value to the evaluator once resolved, so
    /// later fragments can refer to it. A named fragment whose name already
    /// holds a value (see [`BindingScope`]) reuses that value and its code is
    /// not executed. The first evaluator error aborts the build.
    pub fn build<E: Evaluator>(&self, evaluator: &mut E) -> Result<String, E::Error> {
        debug!(tokens = self.tokens.len(), scope = ?self.scope, "building composition");
        let mut built = String::new();
        let mut published: HashMap<&str, E::Value> = HashMap::new();
        for token in &self.tokens {
            let resolved = match self.scope {
                BindingScope::Evaluator => token.resolve(evaluator)?,
                BindingScope::Build => match token
                    .binding()
                    .and_then(|name| published.get_key_value(name))
                {
                    Some((name, value)) => {
                        trace!(binding = *name, "reusing value published in this build");
                        Resolved::Value(value.clone())
                    }
                    None => match token {
                        Token::Literal(text) => Resolved::Text(text.as_str()),
                        Token::Code(fragment) => Resolved::Value(fragment.evaluate(evaluator)?),
                    },
                },
            };
            built.push_str(&resolved.to_string());
            if let (Some(name), Resolved::Value(value)) = (token.binding(), resolved) {
                if self.scope == BindingScope::Build {
                    published.insert(name, value.clone());
                }
                evaluator.set_named(name, value);
            }
        }
        debug!(chars = built.len(), "built composition");
        Ok(built)
    }

    /// The unresolved tokens rendered as template text and joined with the joiner.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered: Vec<String> = self.tokens.iter().map(|t| t.render(&self.grammar)).collect();
        write!(f, "{}", rendered.join(&self.joiner))
    }
}

impl Index<usize> for Composition {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}
impl IndexMut<usize> for Composition {
    fn index_mut(&mut self, index: usize) -> &mut Token {
        &mut self.tokens[index]
    }
}

impl FromIterator<Token> for Composition {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}
impl Extend<Token> for Composition {
    fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
        self.tokens.extend(iter);
    }
}
impl IntoIterator for Composition {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
impl<'c> IntoIterator for &'c Composition {
    type Item = &'c Token;
    type IntoIter = Iter<'c, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
