//! Compiles infix regular expressions over letters and digits into Thompson
//! NFAs. The pattern is rewritten to postfix with a shunting-yard pass and the
//! automaton is assembled from literal, concatenation, union and star
//! fragments.
//!
//! ```
//! use reg_nfa::matching::Matcher;
//!
//! let nfa = reg_nfa::compile("a(a|b)ab*").unwrap();
//! assert!(nfa.is_match("abab"));
//! assert_eq!(reg_nfa::serialize(&nfa)["startingState"], "S0");
//! ```

pub mod document;
pub mod fsm;
pub mod lexer;
pub mod matching;
pub mod parser;
pub mod utils;

pub use document::serialize;
pub use fsm::{Fragment, ReError, RegexNFA};
pub use utils::CompileFlags;

pub fn compile(pattern: &str) -> Result<Fragment, ReError> {
    let mut regex = RegexNFA::new(pattern);
    regex.compile()?;
    regex.into_fragment()
}
