use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::{
    analysis::SymbolSetTable,
    error::GrammarError,
    grammar::{Grammar, NonTerminal, ProductionSymbol, ResolvedGrammar},
    language::{remove_element, union, Symbol},
};

pub fn compute_first(grammar: &Grammar) -> Result<SymbolSetTable, GrammarError> {
    let grammar = ResolvedGrammar::resolve(grammar)?;

    Ok(first_sets(&grammar))
}

pub(crate) fn first_sets(grammar: &ResolvedGrammar) -> SymbolSetTable {
    debug!(non_terminals = grammar.order().len(), "computing FIRST sets");

    grammar
        .order()
        .iter()
        .map(|nt| (nt.clone(), first_of(grammar, nt, &mut IndexMap::new())))
        .collect()
}

/// FIRST set of a single non-terminal, recomputed from scratch.
///
/// `visiting` maps every non-terminal whose computation is on the stack to
/// what it has gathered so far; reaching one of them again yields that
/// partial set, which is what keeps left recursive cycles finite.
pub(crate) fn first_of(
    grammar: &ResolvedGrammar,
    non_terminal: &NonTerminal,
    visiting: &mut IndexMap<NonTerminal, IndexSet<Symbol>>,
) -> IndexSet<Symbol> {
    if let Some(partial) = visiting.get(non_terminal) {
        trace!(%non_terminal, "FIRST recursion cut short");
        return partial.clone();
    }

    visiting.insert(non_terminal.clone(), IndexSet::new());

    let epsilon = Symbol::epsilon();
    let mut first = IndexSet::new();

    for word in grammar.productions_of(non_terminal) {
        if word.is_empty() {
            first.insert(epsilon.clone());
        }

        let last = word.0.len().saturating_sub(1);

        for (i, symbol) in word.0.iter().enumerate() {
            match symbol {
                ProductionSymbol::Terminal(t) => {
                    first.insert(t.0.clone());
                    break;
                }
                ProductionSymbol::NonTerminal(nt) => {
                    let found = first_of(grammar, nt, visiting);

                    if found.contains(&epsilon) && i < last {
                        first = union(&first, &remove_element(&found, &epsilon));
                        continue;
                    }

                    first = union(&first, &found);
                    break;
                }
            }
        }

        visiting.insert(non_terminal.clone(), first.clone());
    }

    visiting.shift_remove(non_terminal);

    first
}

#[cfg(test)]
mod tests {
    use indexmap::indexset;

    use super::*;

    fn set(symbols: &[&str]) -> IndexSet<Symbol> {
        symbols.iter().copied().map(Symbol::from).collect()
    }

    fn first(rules: &[&str]) -> SymbolSetTable {
        compute_first(&Grammar::from_productions(rules).unwrap()).unwrap()
    }

    #[test]
    fn leading_terminal_is_first() {
        let first = first(&["S -> a B | b", "B -> c"]);

        assert_eq!(first[&NonTerminal::from("S")], set(&["a", "b"]));
        assert_eq!(first[&NonTerminal::from("B")], set(&["c"]));
    }

    #[test]
    fn nullable_prefix_is_skipped() {
        let first = first(&["S -> A B c", "A -> a | λ", "B -> b | λ"]);

        assert_eq!(first[&NonTerminal::from("S")], set(&["a", "b", "c"]));
        assert_eq!(first[&NonTerminal::from("A")], set(&["a", "λ"]));
    }

    #[test]
    fn nullable_last_symbol_keeps_epsilon() {
        let first = first(&["S -> A B", "A -> a | λ", "B -> b | λ"]);

        assert_eq!(first[&NonTerminal::from("S")], set(&["a", "b", "λ"]));
    }

    #[test]
    fn table_follows_declaration_order() {
        let first = first(&["S -> A", "B -> b", "A -> B"]);

        assert_eq!(
            first.keys().map(NonTerminal::as_str).collect::<Vec<_>>(),
            ["S", "B", "A"]
        );
        assert_eq!(first[&NonTerminal::from("S")], indexset! {Symbol::from("b")});
    }

    #[test]
    fn left_recursive_cycle_terminates() {
        let first = first(&["E -> E + T | T", "T -> T * id | id"]);

        assert_eq!(first[&NonTerminal::from("E")], set(&["id"]));
        assert_eq!(first[&NonTerminal::from("T")], set(&["id"]));
    }

    #[test]
    fn indirect_cycle_terminates() {
        let first = first(&["A -> B x | a", "B -> A y | b"]);

        assert_eq!(first[&NonTerminal::from("A")], set(&["a", "b"]));
        assert_eq!(first[&NonTerminal::from("B")], set(&["a", "b"]));
    }

    #[test]
    fn missing_productions_set_is_an_error() {
        let grammar =
            Grammar::from_json(r#"{"order": ["S", "X"], "productions_set": {"S": ["X a"]}}"#)
                .unwrap();

        assert!(matches!(
            compute_first(&grammar),
            Err(GrammarError::ProductionsSetNotFound(name)) if name == "X"
        ));
    }
}
