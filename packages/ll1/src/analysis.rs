use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tabled::{builder::Builder, settings::Style};
use tracing::{debug, warn};

use crate::{
    error::GrammarError,
    grammar::{Grammar, NonTerminal},
    language::Symbol,
};

mod first;
mod follow;
mod prediction;

pub use first::compute_first;
pub use follow::{compute_follow, find_occurrences, Occurrence};
pub use prediction::compute_prediction_set;

/// One set of symbols per non-terminal, in declaration order.
pub type SymbolSetTable = IndexMap<NonTerminal, IndexSet<Symbol>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ll1Sets {
    pub first: SymbolSetTable,
    pub follow: SymbolSetTable,
    pub prediction: SymbolSetTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ll1Response {
    pub grammar: Grammar,
    pub result: Ll1Sets,
}

impl Ll1Response {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Removes immediate left recursion, then computes the FIRST, FOLLOW and
/// prediction sets of the rewritten grammar.
pub fn analyze(mut grammar: Grammar) -> Result<Ll1Response, GrammarError> {
    grammar.remove_left_recursion();

    analyze_without_elimination(grammar)
}

pub fn analyze_without_elimination(grammar: Grammar) -> Result<Ll1Response, GrammarError> {
    debug!(
        non_terminals = grammar.order().len(),
        start_symbol = grammar.start_symbol().unwrap_or_default(),
        "analyzing grammar"
    );

    for non_terminal in grammar.order().iter().skip(1) {
        if !grammar.is_referenced(non_terminal) {
            warn!(%non_terminal, "non-terminal is never used by a production");
        }
    }

    let first = compute_first(&grammar)?;
    let follow = compute_follow(&grammar, &first)?;
    let prediction = compute_prediction_set(&grammar, &first, &follow);

    Ok(Ll1Response {
        grammar,
        result: Ll1Sets {
            first,
            follow,
            prediction,
        },
    })
}

fn format_set(set: Option<&IndexSet<Symbol>>) -> String {
    match set {
        Some(set) if !set.is_empty() => format!("{{{}}}", set.iter().join(", ")),
        _ => "∅".to_owned(),
    }
}

impl Display for Ll1Sets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = Builder::default();

        builder.push_record(["Non-terminal", "FIRST", "FOLLOW", "Prediction"].map(String::from));

        for (non_terminal, first) in &self.first {
            builder.push_record([
                non_terminal.to_string(),
                format_set(Some(first)),
                format_set(self.follow.get(non_terminal)),
                format_set(self.prediction.get(non_terminal)),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        writeln!(f, "{}", table)
    }
}
