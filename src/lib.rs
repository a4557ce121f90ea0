//! Tessera – compiles text templates with embedded code into compositions.
//!
//! A template is literal text interleaved with code fragments:
//!
//! ```text
//! Have a `ri(1,100)`(chance)% chance of increasing armor by `ri(1,999)` for `randomt(1s,1d)`.
//! ```
//!
//! Parsing yields a [`composition::Composition`], an ordered sequence of
//! [`composition::Token`]s:
//! * A `Literal` is plain text with escapes already removed.
//! * A `Code` token holds a [`composition::CodeFragment`]: raw code plus an
//!   optional binding name given in parentheses right after the fragment.
//!
//! Building a composition hands every fragment to an
//! [`interface::Evaluator`], which executes the code in whatever language it
//! implements. A named fragment publishes its value to the evaluator so that
//! later fragments can use it, and a fragment whose name already holds a value
//! reuses it instead of running its code again.
//!
//! ## Modules
//! * [`scanner`] – Character cursor with backtracking and expectations.
//! * [`template`] – The [`template::Tokenizer`] and its configurable [`template::Grammar`].
//! * [`composition`] – Tokens, compositions and the build protocol.
//! * [`duration`] – Rewrites duration literals like `1d 2h` into milliseconds.
//! * [`interface`] – The evaluator contract and an in-memory evaluator.
//! * [`settings`] – Grammar, joiner and binding scope read through `config`.
//!
//! ## Quick Start
//! ```
//! use tessera::composition::Composition;
//! use tessera::interface::{Bindings, MemoryEvaluator};
//!
//! let composition: Composition = "`1+1`(x) and again `x`".parse().unwrap();
//! let mut evaluator = MemoryEvaluator::new(|code: &str, bindings: &Bindings<String>| {
//!     Ok(bindings.get(code).cloned().unwrap_or_else(|| "2".to_string()))
//! });
//! assert_eq!(composition.build(&mut evaluator).unwrap(), "2 and again 2");
//! ```

pub mod composition;
pub mod duration;
pub mod error;
pub mod interface;
pub mod scanner;
pub mod settings;
pub mod template;

pub use composition::{BindingScope, CodeFragment, Composition, Token};
pub use error::{Result, TesseraError};
pub use interface::{Evaluator, MemoryEvaluator};
pub use template::{Grammar, Tokenizer};
