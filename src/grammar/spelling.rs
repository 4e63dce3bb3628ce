//! Literal spelling enumeration
//!
//! A token is *literal* when every path through its lexical rule spells one
//! fixed string: plain characters, single-character sets and caseless
//! characters only. Anything else (a real character set, a loop, too many
//! alternatives) makes it *patterned*.

use std::collections::HashSet;

use crate::network::{Chars, Network, RuleId, StateId, Transition};

/// Upper bound on spellings before a token counts as patterned
const MAX_SPELLINGS: usize = 256;

/// Upper bound on nested fragment calls while walking a token
const MAX_FRAGMENT_DEPTH: usize = 32;

struct Walk<'a> {
    network: &'a Network<Chars>,
    spellings: Vec<String>,
    on_path: HashSet<(StateId, Vec<StateId>)>,
}

/// Every spelling of the token rule `rule`, or `None` if it is patterned
pub(crate) fn literal_spellings(network: &Network<Chars>, rule: RuleId) -> Option<Vec<String>> {
    let mut walk = Walk {
        network,
        spellings: Vec::new(),
        on_path: HashSet::new(),
    };
    let mut text = String::new();
    let mut returns = Vec::new();
    walk.visit(network.rule(rule).start, &mut returns, &mut text)?;

    if walk.spellings.is_empty() {
        return None;
    }
    Some(walk.spellings)
}

impl Walk<'_> {
    fn visit(&mut self, state: StateId, returns: &mut Vec<StateId>, text: &mut String) -> Option<()> {
        // Revisiting a state with the same stack on the current path is a loop
        if !self.on_path.insert((state, returns.clone())) {
            return None;
        }

        let network = self.network;
        for transition in &network.state(state).transitions {
            match transition {
                Transition::Epsilon { target } => self.visit(*target, returns, text)?,
                Transition::Match { symbol, target } => {
                    text.push(*symbol);
                    self.visit(*target, returns, text)?;
                    text.pop();
                }
                Transition::MatchSet { set, target } => {
                    let c = set.literal()?;
                    text.push(c);
                    self.visit(*target, returns, text)?;
                    text.pop();
                }
                Transition::RuleCall { rule, follow } => {
                    if returns.len() >= MAX_FRAGMENT_DEPTH {
                        return None;
                    }
                    returns.push(*follow);
                    self.visit(network.rule(*rule).start, returns, text)?;
                    returns.pop();
                }
                Transition::RuleReturn => match returns.pop() {
                    Some(follow) => {
                        let result = self.visit(follow, returns, text);
                        returns.push(follow);
                        result?;
                    }
                    None => {
                        if !self.spellings.iter().any(|s| s == text) {
                            if self.spellings.len() >= MAX_SPELLINGS {
                                return None;
                            }
                            self.spellings.push(text.clone());
                        }
                    }
                },
            }
        }

        self.on_path.remove(&(state, returns.clone()));
        Some(())
    }
}
