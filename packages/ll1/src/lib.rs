//! LL(1) analysis of context-free grammars: immediate left recursion
//! elimination, FIRST and FOLLOW sets, and the prediction set of every
//! non-terminal.

pub mod analysis;
pub mod error;
pub mod grammar;
pub mod language;

pub use analysis::{analyze, analyze_without_elimination, Ll1Response, Ll1Sets};
pub use error::GrammarError;
pub use grammar::Grammar;
