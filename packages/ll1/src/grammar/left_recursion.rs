use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::{
    grammar::{has_left_recursion, Grammar},
    language::EPSILON,
};

impl Grammar {
    /// Rewrites every immediately left recursive non-terminal `A → A α | β`
    /// into `A → β A'` and `A' → α A' | λ`.
    ///
    /// Only immediate recursion is handled, in a single pass: `A → B x`,
    /// `B → A y` is left untouched. A `λ` alternative of a rewritten
    /// non-terminal is dropped rather than carried over to `A'`.
    pub fn remove_left_recursion(&mut self) {
        let recursive = self
            .non_terminals()
            .filter(|nt| {
                self.productions_of(nt)
                    .is_some_and(|productions| has_left_recursion(nt, productions))
            })
            .map(str::to_owned)
            .collect::<Vec<_>>();

        debug!(
            non_terminals = recursive.len(),
            "eliminating immediate left recursion"
        );

        let mut rewritten = IndexMap::with_capacity(recursive.len());
        let mut primed = Vec::new();

        for non_terminal in recursive {
            let prime = format!("{non_terminal}'");
            let mut betas = IndexSet::new();

            for production in self.productions_of(&non_terminal).into_iter().flatten() {
                if production == EPSILON {
                    trace!(%non_terminal, "dropping λ alternative of a left recursive non-terminal");
                    continue;
                }

                match production.strip_prefix(non_terminal.as_str()) {
                    None => {
                        betas.insert(format!("{production} {prime}").trim().to_owned());
                    }
                    Some(alpha) if alpha.trim().is_empty() => {
                        trace!(%non_terminal, "skipping unit cycle");
                    }
                    Some(alpha) => {
                        let alpha = format!("{alpha} {prime}").trim().to_owned();
                        trace!(%non_terminal, %prime, %alpha, "moving left recursive tail");
                        primed.push((prime.clone(), alpha));
                    }
                }
            }

            rewritten.insert(non_terminal, betas);
        }

        for (non_terminal, betas) in rewritten {
            self.productions.insert(non_terminal, betas);
        }

        for (prime, alpha) in primed {
            self.add_production_group(&prime, [alpha, EPSILON.to_owned()]);
        }
    }
}
