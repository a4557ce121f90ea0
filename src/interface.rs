//! Interface between compositions and whatever executes their code fragments.
//!
//! A composition never runs code itself. It hands every fragment to an
//! [`Evaluator`], which executes code in its own language and stores values
//! published under binding names. [`MemoryEvaluator`] is a small evaluator
//! kept entirely in memory: code execution is delegated to a host closure,
//! which receives the values published so far.

use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;

use crate::error::Result;

pub type BindingHasher = BuildHasherDefault<SeaHasher>;
/// Values published under binding names.
pub type Bindings<V> = HashMap<String, V, BindingHasher>;

/// The capabilities a composition needs in order to be built.
pub trait Evaluator {
    /// Result of executing code. It only needs to render as text.
    type Value: Clone + fmt::Display;
    /// Error raised by failing code, passed on untouched by the build.
    type Error;

    fn execute(&mut self, code: &str) -> std::result::Result<Self::Value, Self::Error>;
    /// Value previously published under `name`, if any.
    fn get_named(&self, name: &str) -> Option<Self::Value>;
    /// Publishes `value` under `name`, replacing any earlier value.
    fn set_named(&mut self, name: &str, value: Self::Value);
    /// Whether duration literals in code are rewritten to milliseconds before execution.
    fn wants_duration_normalization(&self) -> bool {
        false
    }
}

/// An evaluator backed by a closure and an in-memory binding map.
pub struct MemoryEvaluator<F> {
    executor: F,
    bindings: Bindings<String>,
    normalize_durations: bool,
    executions: usize,
}

impl<F> MemoryEvaluator<F>
where
    F: FnMut(&str, &Bindings<String>) -> Result<String>,
{
    pub fn new(executor: F) -> Self {
        Self {
            executor,
            bindings: Bindings::default(),
            normalize_durations: false,
            executions: 0,
        }
    }
    pub fn with_duration_normalization(mut self, normalize: bool) -> Self {
        self.normalize_durations = normalize;
        self
    }
    pub fn bindings(&self) -> &Bindings<String> {
        &self.bindings
    }
    /// Number of times code has been handed to the executor.
    pub fn executions(&self) -> usize {
        self.executions
    }
    /// Forgets every published value.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

impl<F> Evaluator for MemoryEvaluator<F>
where
    F: FnMut(&str, &Bindings<String>) -> Result<String>,
{
    type Value = String;
    type Error = crate::error::TesseraError;

    fn execute(&mut self, code: &str) -> Result<String> {
        self.executions += 1;
        (self.executor)(code, &self.bindings)
    }
    fn get_named(&self, name: &str) -> Option<String> {
        self.bindings.get(name).cloned()
    }
    fn set_named(&mut self, name: &str, value: String) {
        self.bindings.insert(name.to_owned(), value);
    }
    fn wants_duration_normalization(&self) -> bool {
        self.normalize_durations
    }
}

impl<F> fmt::Debug for MemoryEvaluator<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MemoryEvaluator")
            .field("bindings", &self.bindings)
            .field("normalize_durations", &self.normalize_durations)
            .field("executions", &self.executions)
            .finish()
    }
}
