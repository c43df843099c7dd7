use tracing::debug;

use crate::{
    analysis::SymbolSetTable,
    grammar::{Grammar, NonTerminal},
    language::Symbol,
};

/// The lookahead set selecting each non-terminal's expansion: its FIRST set,
/// or its FOLLOW set outright when the FIRST set holds `λ`.
///
/// Unlike the textbook construction, FOLLOW replaces FIRST instead of being
/// merged with FIRST minus `λ`.
pub fn compute_prediction_set(
    grammar: &Grammar,
    first: &SymbolSetTable,
    follow: &SymbolSetTable,
) -> SymbolSetTable {
    debug!(non_terminals = grammar.order().len(), "computing prediction sets");

    let epsilon = Symbol::epsilon();

    grammar
        .order()
        .iter()
        .map(|name| {
            let non_terminal = NonTerminal::new(name.as_str());
            let mut values = first.get(&non_terminal).cloned().unwrap_or_default();

            if values.contains(&epsilon) {
                values = follow.get(&non_terminal).cloned().unwrap_or_default();
            }

            (non_terminal, values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use indexmap::{indexmap, indexset};

    use super::*;

    #[test]
    fn follow_replaces_nullable_first() {
        let grammar = Grammar::from_productions(&["S -> A b", "A -> a | λ"]).unwrap();
        let first = indexmap! {
            NonTerminal::from("S") => indexset! {Symbol::from("a"), Symbol::from("b")},
            NonTerminal::from("A") => indexset! {Symbol::from("a"), Symbol::epsilon()},
        };
        let follow = indexmap! {
            NonTerminal::from("S") => indexset! {Symbol::end_of_input()},
            NonTerminal::from("A") => indexset! {Symbol::from("b")},
        };

        let prediction = compute_prediction_set(&grammar, &first, &follow);

        assert_eq!(prediction[&NonTerminal::from("S")], first[&NonTerminal::from("S")]);
        assert_eq!(prediction[&NonTerminal::from("A")], indexset! {Symbol::from("b")});
    }

    #[test]
    fn missing_entries_yield_empty_sets() {
        let grammar = Grammar::from_productions(&["S -> a"]).unwrap();

        let prediction = compute_prediction_set(&grammar, &indexmap! {}, &indexmap! {});

        assert!(prediction[&NonTerminal::from("S")].is_empty());
    }
}
