use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::GrammarError,
    language::{contains_word, union, EPSILON},
};

mod left_recursion;
mod notation;
pub mod types;

pub use types::{NonTerminal, ProductionSymbol, ResolvedGrammar, Terminal, Word};

/// A grammar as it travels over the wire: productions are space separated
/// strings, and a symbol is a non-terminal only by virtue of having a
/// production set (or being listed in `order`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    #[serde(default)]
    order: Vec<String>,
    #[serde(default, rename = "productions_set")]
    productions: IndexMap<String, IndexSet<String>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(payload: &str) -> Result<Self, GrammarError> {
        let grammar: Grammar = serde_json::from_str(payload)?;

        if grammar
            .order
            .iter()
            .chain(grammar.productions.keys())
            .any(|name| name.trim().is_empty())
        {
            return Err(GrammarError::EmptyNonTerminal);
        }

        for (non_terminal, productions) in &grammar.productions {
            if productions.iter().any(|p| p.trim().is_empty()) {
                return Err(GrammarError::EmptyProduction {
                    non_terminal: non_terminal.clone(),
                });
            }
        }

        Ok(grammar)
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn productions(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.productions
    }

    pub fn productions_of(&self, non_terminal: &str) -> Option<&IndexSet<String>> {
        self.productions.get(non_terminal)
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Names listed in `order`, followed by production keys missing from it.
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .chain(
                self.productions
                    .keys()
                    .filter(move |key| !self.order.contains(key)),
            )
            .map(String::as_str)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.productions.contains_key(symbol) || self.index_of_non_terminal(symbol).is_some()
    }

    /// Whether some production, of any non-terminal, uses `non_terminal` as a token.
    pub fn is_referenced(&self, non_terminal: &str) -> bool {
        self.productions
            .values()
            .flatten()
            .any(|production| contains_word(production, non_terminal))
    }

    pub fn index_of_non_terminal(&self, non_terminal: &str) -> Option<usize> {
        self.order.iter().position(|nt| nt == non_terminal)
    }

    pub fn add_production_group<I, S>(&mut self, non_terminal: &str, productions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let non_terminal = non_terminal.trim();
        let productions = productions
            .into_iter()
            .map(Into::into)
            .collect::<IndexSet<_>>();

        if self.productions.contains_key(non_terminal)
            || self.index_of_non_terminal(non_terminal).is_some()
        {
            let existing = self
                .productions
                .entry(non_terminal.to_owned())
                .or_default();
            *existing = union(existing, &productions);
            return;
        }

        self.order.push(non_terminal.to_owned());
        self.productions
            .insert(non_terminal.to_owned(), productions);
    }

    pub fn definition(&self) -> String {
        let non_terminals = self.non_terminals().collect::<Vec<_>>();

        let mut terminals = self
            .productions
            .values()
            .flatten()
            .flat_map(|production| production.split_whitespace())
            .filter(|token| *token != EPSILON && !self.is_non_terminal(token))
            .unique()
            .collect::<Vec<_>>();
        terminals.sort_unstable();

        let mut definition = format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\n",
            non_terminals.iter().join(", "),
            terminals.iter().join(", "),
            self.start_symbol().unwrap_or("∅"),
        );

        definition += "P = {\n";

        for non_terminal in non_terminals {
            if let Some(productions) = self.productions.get(non_terminal) {
                definition += &format!("  {} → {}\n", non_terminal, productions.iter().join(" | "));
            }
        }

        definition += "}\n";

        definition
    }
}

/// Whether some production of `non_terminal` starts with its name.
///
/// The test is a plain string prefix: `A` counts as left recursive on `AB c`.
/// Left recursion elimination relies on the same prefix when splitting.
pub fn has_left_recursion(non_terminal: &str, productions: &IndexSet<String>) -> bool {
    productions
        .iter()
        .any(|production| production.starts_with(non_terminal))
}
