use std::collections::{BTreeSet, HashMap};

use crate::fsm::{Fragment, Label, RegexNFA, State, Transition};

pub trait Matcher {
    /// Whether the whole of `text` is accepted.
    fn is_match(&self, text: &str) -> bool;
}

fn outgoing(fragment: &Fragment) -> HashMap<State, Vec<&Transition>> {
    let mut index: HashMap<State, Vec<&Transition>> = HashMap::new();
    for transition in fragment.transitions() {
        index.entry(transition.from).or_default().push(transition);
    }
    index
}

fn closure_with(
    index: &HashMap<State, Vec<&Transition>>,
    states: impl IntoIterator<Item = State>,
) -> BTreeSet<State> {
    let mut closure: BTreeSet<State> = BTreeSet::new();
    let mut stack: Vec<State> = states.into_iter().collect();
    while let Some(state) = stack.pop() {
        if !closure.insert(state) {
            continue;
        }
        for transition in index.get(&state).into_iter().flatten() {
            if transition.label == Label::Epsilon {
                stack.extend(transition.to.iter().copied());
            }
        }
    }
    closure
}

/// All states reachable from `states` through epsilon transitions alone, `states` included.
pub fn epsilon_closure(
    fragment: &Fragment,
    states: impl IntoIterator<Item = State>,
) -> BTreeSet<State> {
    closure_with(&outgoing(fragment), states)
}

impl Matcher for Fragment {
    fn is_match(&self, text: &str) -> bool {
        let index = outgoing(self);
        let mut current = closure_with(&index, [self.start()]);
        for c in text.chars() {
            let moved = current
                .iter()
                .filter_map(|state| index.get(state))
                .flatten()
                .filter(|transition| transition.label == Label::Symbol(c))
                .flat_map(|transition| transition.to.iter().copied());
            current = closure_with(&index, moved);
            if current.is_empty() {
                return false;
            }
        }
        self.accept().iter().any(|state| current.contains(state))
    }
}

impl Matcher for RegexNFA {
    fn is_match(&self, text: &str) -> bool {
        match self.fragment() {
            Ok(fragment) => fragment.is_match(text),
            Err(_) => false,
        }
    }
}
