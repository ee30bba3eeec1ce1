use std::{collections::BTreeSet, fmt::Display};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    lexer::{render, Token},
    parser::{run_parse, ParserError},
    utils::CompileFlags,
};

pub type State = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Symbol(char),
    Epsilon,
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Symbol(c) => write!(f, "{}", c),
            Label::Epsilon => write!(f, "Epsilon"),
        }
    }
}

/// One record of the transition list. Epsilon records may fan out to several
/// destinations; destinations keep the order they were emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: State,
    pub to: Vec<State>,
    pub label: Label,
}

impl Transition {
    pub fn new(from: State, to: Vec<State>, label: Label) -> Self {
        Self { from, to, label }
    }

    pub fn epsilon(from: State, to: Vec<State>) -> Self {
        Self::new(from, to, Label::Epsilon)
    }

    fn shifted(&self, offset: State) -> Self {
        Self {
            from: self.from + offset,
            to: self.to.iter().map(|s| s + offset).collect(),
            label: self.label,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReError {
    #[error("failed to parse pattern: {0}")]
    ParsingFailed(#[from] ParserError),
    #[error("operator '{token}' is missing an operand")]
    StackUnderflow { token: Token },
    #[error("expected a single automaton, found {0} fragments")]
    DanglingFragments(usize),
    #[error("unexpected '{0}' in postfix sequence")]
    UnexpectedToken(Token),
    #[error("fragment has {0} accept states, expected exactly one")]
    MultipleAcceptStates(usize),
    #[error("fragment is not a well-formed Thompson fragment")]
    MalformedFragment,
    #[error("pattern has not been compiled")]
    NotCompiled,
}

/// A Thompson fragment: one entry state, its exit states and the transitions
/// between them. Produced by [`Fragment::literal`] and consumed by the other
/// combinators, which always hand back a freshly numbered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    states: BTreeSet<State>,
    start: State,
    accept: Vec<State>,
    transitions: Vec<Transition>,
}

impl Fragment {
    /// Builds a fragment from raw parts, rejecting any that reference unknown states.
    pub fn from_parts(
        states: BTreeSet<State>,
        start: State,
        accept: Vec<State>,
        transitions: Vec<Transition>,
    ) -> Result<Fragment, ReError> {
        let fragment = Fragment {
            states,
            start,
            accept,
            transitions,
        };
        if fragment.is_well_formed() {
            Ok(fragment)
        } else {
            Err(ReError::MalformedFragment)
        }
    }

    pub fn literal(symbol: char) -> Fragment {
        Fragment {
            states: BTreeSet::from([0, 1]),
            start: 0,
            accept: vec![1],
            transitions: vec![Transition::new(0, vec![1], Label::Symbol(symbol))],
        }
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn start(&self) -> State {
        self.start
    }

    pub fn accept(&self) -> &[State] {
        &self.accept
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn max_state(&self) -> State {
        self.states.iter().next_back().copied().unwrap_or(0)
    }

    pub fn sole_accept(&self) -> Result<State, ReError> {
        match self.accept.as_slice() {
            [state] => Ok(*state),
            other => Err(ReError::MultipleAcceptStates(other.len())),
        }
    }

    /// Start, accept states and every transition endpoint belong to `states`.
    pub fn is_well_formed(&self) -> bool {
        self.states.contains(&self.start)
            && !self.accept.is_empty()
            && self.accept.iter().all(|s| self.states.contains(s))
            && self.transitions.iter().all(|t| {
                self.states.contains(&t.from) && t.to.iter().all(|s| self.states.contains(s))
            })
    }

    fn shifted(self, offset: State) -> Fragment {
        Fragment {
            states: self.states.iter().map(|s| s + offset).collect(),
            start: self.start + offset,
            accept: self.accept.iter().map(|s| s + offset).collect(),
            transitions: self
                .transitions
                .iter()
                .map(|t| t.shifted(offset))
                .collect(),
        }
    }

    /// Joins `self` and `right` without an epsilon edge: `right` is renumbered
    /// so that its start state lands on this fragment's accept state.
    pub fn concat(self, right: Fragment) -> Result<Fragment, ReError> {
        let left_accept = self.sole_accept()?;
        right.sole_accept()?;
        if left_accept != self.max_state() || right.start != 0 {
            return Err(ReError::MalformedFragment);
        }

        let right = right.shifted(left_accept);
        let mut states = self.states;
        states.extend(right.states.iter().copied());
        let mut transitions = self.transitions;
        transitions.extend(right.transitions);

        let fragment = Fragment {
            states,
            start: self.start,
            accept: right.accept,
            transitions,
        };
        trace!("concat -> {} states", fragment.states.len());
        debug_assert!(fragment.is_well_formed());
        Ok(fragment)
    }

    pub fn union(self, right: Fragment) -> Result<Fragment, ReError> {
        let left_max = self.max_state();
        let left = self.shifted(1);
        let right = right.shifted(left_max + 2);
        let left_accept = left.sole_accept()?;
        let right_accept = right.sole_accept()?;

        let start = 0;
        let accept = right.max_state() + 1;

        let mut states = BTreeSet::from([start, accept]);
        states.extend(left.states.iter().copied());
        states.extend(right.states.iter().copied());

        let mut transitions =
            Vec::with_capacity(left.transitions.len() + right.transitions.len() + 3);
        transitions.push(Transition::epsilon(start, vec![left.start, right.start]));
        transitions.extend(left.transitions);
        transitions.extend(right.transitions);
        transitions.push(Transition::epsilon(left_accept, vec![accept]));
        transitions.push(Transition::epsilon(right_accept, vec![accept]));

        let fragment = Fragment {
            states,
            start,
            accept: vec![accept],
            transitions,
        };
        trace!("union -> {} states", fragment.states.len());
        debug_assert!(fragment.is_well_formed());
        Ok(fragment)
    }

    pub fn star(self) -> Result<Fragment, ReError> {
        let inner = self.shifted(1);
        let inner_accept = inner.sole_accept()?;

        let start = 0;
        let accept = inner.max_state() + 1;

        let mut states = BTreeSet::from([start, accept]);
        states.extend(inner.states.iter().copied());

        let mut transitions = Vec::with_capacity(inner.transitions.len() + 2);
        transitions.push(Transition::epsilon(start, vec![inner.start, accept]));
        transitions.extend(inner.transitions);
        transitions.push(Transition::epsilon(inner_accept, vec![inner.start, accept]));

        let fragment = Fragment {
            states,
            start,
            accept: vec![accept],
            transitions,
        };
        trace!("star -> {} states", fragment.states.len());
        debug_assert!(fragment.is_well_formed());
        Ok(fragment)
    }

    /// Convert the automaton to GraphViz dot code for debugging purposes.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let opts = "[fillcolor=\"#EEEEEE\" fontcolor=\"#888888\"]";
        for state in self.states.iter() {
            if *state == self.start {
                out += &format!("node_{}[label=\"{}\"][fillcolor=green]\n", state, state);
            } else if self.accept.contains(state) {
                out += &format!("node_{}[label=\"{}\" shape=doublecircle]\n", state, state);
            } else {
                out += &format!("node_{}[label=\"{}\"]{}\n", state, state, opts);
            }
        }
        for transition in self.transitions.iter() {
            for end in transition.to.iter() {
                match transition.label {
                    Label::Epsilon => {
                        out += &format!(
                            "node_{} -> node_{}[style=dashed]\n",
                            transition.from, end
                        )
                    }
                    Label::Symbol(c) => {
                        out += &format!(
                            "node_{} -> node_{}[label=\"{}\"]\n",
                            transition.from, end, c
                        )
                    }
                }
            }
        }
        let opts = "node [shape=circle style=filled fillcolor=\"#4385f5\" fontcolor=\"#FFFFFF\" \
        color=white penwidth=5.0 margin=0.1 width=0.5 height=0.5 fixedsize=true]";
        format!(
            "digraph G {{  rankdir=\"LR\" graph [fontname = \"Courier New\"];
                node [fontname = \"verdana\", style = rounded];
                edge [fontname = \"verdana\"];
                {{\n{}\n{}\n}}}}",
            opts, out
        )
    }
}

fn pop(stack: &mut Vec<Fragment>, token: Token) -> Result<Fragment, ReError> {
    stack.pop().ok_or(ReError::StackUnderflow { token })
}

/// Interprets a postfix token sequence over a stack of fragments.
pub fn build(postfix: &[Token]) -> Result<Fragment, ReError> {
    let mut stack: Vec<Fragment> = Vec::new();
    for &token in postfix {
        let fragment = match token {
            Token::Symbol(c) => Fragment::literal(c),
            Token::Concat => {
                let right = pop(&mut stack, token)?;
                let left = pop(&mut stack, token)?;
                left.concat(right)?
            }
            Token::Union => {
                let right = pop(&mut stack, token)?;
                let left = pop(&mut stack, token)?;
                left.union(right)?
            }
            Token::Star => pop(&mut stack, token)?.star()?,
            Token::Open | Token::Close => return Err(ReError::UnexpectedToken(token)),
        };
        stack.push(fragment);
    }
    match (stack.pop(), stack.len()) {
        (Some(fragment), 0) => Ok(fragment),
        (None, _) => Err(ReError::DanglingFragments(0)),
        (Some(_), rest) => Err(ReError::DanglingFragments(rest + 1)),
    }
}

#[derive(Debug)]
pub struct RegexNFA {
    pattern: String,
    flags: CompileFlags,
    postfix: Vec<Token>,
    fragment: Option<Fragment>,
}

impl RegexNFA {
    pub fn new(pattern: &str) -> RegexNFA {
        RegexNFA::with_flags(pattern, CompileFlags::default())
    }

    pub fn with_flags(pattern: &str, flags: CompileFlags) -> RegexNFA {
        RegexNFA {
            pattern: String::from(pattern),
            flags,
            postfix: Vec::new(),
            fragment: None,
        }
    }

    pub fn get_flags(&self) -> CompileFlags {
        self.flags
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    pub fn compile(&mut self) -> Result<(), ReError> {
        let postfix = run_parse(&self.pattern, self.flags)?;
        let fragment = build(&postfix)?;
        debug!(
            "compiled {:?} ({}) into {} states, {} transitions",
            self.pattern,
            render(&postfix),
            fragment.states.len(),
            fragment.transitions.len()
        );
        self.postfix = postfix;
        self.fragment = Some(fragment);
        Ok(())
    }

    pub fn fragment(&self) -> Result<&Fragment, ReError> {
        self.fragment.as_ref().ok_or(ReError::NotCompiled)
    }

    pub fn into_fragment(self) -> Result<Fragment, ReError> {
        self.fragment.ok_or(ReError::NotCompiled)
    }
}
