use std::fmt::Display;

use indexmap::{indexset, IndexMap, IndexSet};
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    analysis::{first::first_of, SymbolSetTable},
    error::GrammarError,
    grammar::{Grammar, NonTerminal, ProductionSymbol, ResolvedGrammar},
    language::{remove_element, union, Symbol, EPSILON},
};

/// A place where a non-terminal is used: the non-terminal owning the
/// production, and the symbol right after the use (`None` at the end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub owner: NonTerminal,
    pub following: Option<ProductionSymbol>,
}

impl Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.following {
            Some(symbol) => write!(f, "{}: {}", self.owner, symbol),
            None => write!(f, "{}: {}", self.owner, EPSILON),
        }
    }
}

pub fn find_occurrences(grammar: &ResolvedGrammar, non_terminal: &NonTerminal) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for (owner, words) in grammar.productions() {
        for word in words {
            for (i, symbol) in word.0.iter().enumerate() {
                if matches!(symbol, ProductionSymbol::NonTerminal(nt) if nt == non_terminal) {
                    occurrences.push(Occurrence {
                        owner: owner.clone(),
                        following: word.0.get(i + 1).cloned(),
                    });
                }
            }
        }
    }

    occurrences
}

pub fn compute_follow(
    grammar: &Grammar,
    first: &SymbolSetTable,
) -> Result<SymbolSetTable, GrammarError> {
    let grammar = ResolvedGrammar::resolve(grammar)?;

    Ok(FollowCalculator::new(&grammar, first).run())
}

struct FollowCalculator<'g> {
    grammar: &'g ResolvedGrammar,
    first: &'g SymbolSetTable,
    follow: SymbolSetTable,
    in_progress: IndexSet<NonTerminal>,
}

impl<'g> FollowCalculator<'g> {
    fn new(grammar: &'g ResolvedGrammar, first: &'g SymbolSetTable) -> Self {
        Self {
            grammar,
            first,
            follow: IndexMap::new(),
            in_progress: IndexSet::new(),
        }
    }

    fn run(mut self) -> SymbolSetTable {
        debug!(
            non_terminals = self.grammar.order().len(),
            "computing FOLLOW sets"
        );

        if let Some(start) = self.grammar.start_symbol() {
            self.follow
                .insert(start.clone(), indexset! {Symbol::end_of_input()});
        }

        let grammar = self.grammar;
        for non_terminal in grammar.order() {
            self.follow_of(non_terminal);
        }

        grammar
            .order()
            .iter()
            .map(|nt| (nt.clone(), self.follow.get(nt).cloned().unwrap_or_default()))
            .collect()
    }

    fn follow_of(&mut self, non_terminal: &NonTerminal) -> IndexSet<Symbol> {
        self.in_progress.insert(non_terminal.clone());

        let epsilon = Symbol::epsilon();
        let mut follow = self.follow.get(non_terminal).cloned().unwrap_or_default();

        let occurrences = find_occurrences(self.grammar, non_terminal);
        trace!(
            %non_terminal,
            occurrences = %occurrences.iter().join(", "),
            "found occurrences"
        );

        for Occurrence { owner, following } in occurrences {
            match following {
                Some(ProductionSymbol::Terminal(t)) => {
                    follow.insert(t.0);
                }
                None => {
                    follow = union(&follow, &self.follow_of_owner(&owner));
                }
                Some(ProductionSymbol::NonTerminal(next)) => {
                    let first = self.first_of(&next);
                    follow = union(&follow, &remove_element(&first, &epsilon));

                    if first.contains(&epsilon) {
                        follow = union(&follow, &self.follow_of_owner(&owner));
                    }
                }
            }

            self.follow.insert(non_terminal.clone(), follow.clone());
        }

        self.follow.insert(non_terminal.clone(), follow.clone());
        self.in_progress.shift_remove(non_terminal);

        follow
    }

    /// FOLLOW of the non-terminal owning an occurrence. An entry that already
    /// exists is taken as is, even while its computation is still running.
    fn follow_of_owner(&mut self, owner: &NonTerminal) -> IndexSet<Symbol> {
        match self.follow.get(owner) {
            Some(follow) => follow.clone(),
            None if self.in_progress.contains(owner) => {
                trace!(%owner, "FOLLOW recursion cut short");
                IndexSet::new()
            }
            None => self.follow_of(owner),
        }
    }

    fn first_of(&self, non_terminal: &NonTerminal) -> IndexSet<Symbol> {
        match self.first.get(non_terminal) {
            Some(first) => first.clone(),
            None => first_of(self.grammar, non_terminal, &mut IndexMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_first;

    fn set(symbols: &[&str]) -> IndexSet<Symbol> {
        symbols.iter().copied().map(Symbol::from).collect()
    }

    fn follow(rules: &[&str]) -> SymbolSetTable {
        let grammar = Grammar::from_productions(rules).unwrap();
        let first = compute_first(&grammar).unwrap();

        compute_follow(&grammar, &first).unwrap()
    }

    #[test]
    fn occurrences_report_the_next_symbol() {
        let grammar = Grammar::from_productions(&["S -> A b A", "A -> a"]).unwrap();
        let grammar = ResolvedGrammar::resolve(&grammar).unwrap();

        let occurrences = find_occurrences(&grammar, &NonTerminal::from("A"));

        assert_eq!(
            occurrences.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["S: b", "S: λ"]
        );
    }

    #[test]
    fn start_symbol_is_followed_by_end_of_input() {
        let follow = follow(&["S -> a"]);

        assert_eq!(follow[&NonTerminal::from("S")], set(&["$"]));
    }

    #[test]
    fn expression_grammar() {
        let follow = follow(&[
            "E -> T E'",
            "T -> F T'",
            "E' -> + T E' | λ",
            "T' -> * F T' | λ",
            "F -> ( E ) | id",
        ]);

        assert_eq!(follow[&NonTerminal::from("E")], set(&["$", ")"]));
        assert_eq!(follow[&NonTerminal::from("E'")], set(&["$", ")"]));
        assert_eq!(follow[&NonTerminal::from("T")], set(&["+", "$", ")"]));
        assert_eq!(follow[&NonTerminal::from("T'")], set(&["+", "$", ")"]));
        assert_eq!(follow[&NonTerminal::from("F")], set(&["*", "+", "$", ")"]));
    }

    #[test]
    fn nullable_successor_passes_owner_follow() {
        let follow = follow(&["S -> A B", "A -> a", "B -> b | λ"]);

        assert_eq!(follow[&NonTerminal::from("A")], set(&["b", "$"]));
        assert_eq!(follow[&NonTerminal::from("B")], set(&["$"]));
    }

    #[test]
    fn unreferenced_non_terminal_has_an_empty_follow() {
        let follow = follow(&["S -> a", "X -> b"]);

        assert!(follow[&NonTerminal::from("X")].is_empty());
    }

    #[test]
    fn self_referencing_tail_terminates() {
        let follow = follow(&["S -> a S | b"]);

        assert_eq!(follow[&NonTerminal::from("S")], set(&["$"]));
    }
}
