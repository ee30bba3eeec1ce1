//! The `nfa.json` document: a `startingState` entry, one entry per state with
//! outgoing transitions, and a minimal `isTerminating` entry for accept states
//! that have none.

use itertools::Itertools;
use serde_json::{json, Map, Value};

use crate::fsm::{Fragment, State};

pub fn state_name(state: State) -> String {
    format!("S{}", state)
}

pub fn serialize(fragment: &Fragment) -> Value {
    let mut document = Map::new();
    document.insert(
        "startingState".to_string(),
        Value::String(state_name(fragment.start())),
    );

    let terminating = fragment.accept().first().copied();
    for transition in fragment.transitions() {
        let entry = document
            .entry(state_name(transition.from))
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(fields) = entry else {
            continue;
        };
        fields.insert(
            "isTerminatingState".to_string(),
            Value::Bool(terminating == Some(transition.from)),
        );
        let destinations = transition
            .to
            .iter()
            .map(|state| Value::String(state_name(*state)))
            .collect_vec();
        match fields
            .entry(transition.label.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(existing) => existing.extend(destinations),
            other => *other = Value::Array(destinations),
        }
    }

    for state in fragment.accept() {
        document
            .entry(state_name(*state))
            .or_insert_with(|| json!({ "isTerminating": true }));
    }
    Value::Object(document)
}

pub fn to_json_pretty(fragment: &Fragment) -> String {
    format!("{:#}", serialize(fragment))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::fsm::{Label, RegexNFA, Transition};

    fn compile(pattern: &str) -> Fragment {
        let mut regex = RegexNFA::new(pattern);
        regex.compile().unwrap();
        regex.into_fragment().unwrap()
    }

    fn keys(document: &Value) -> Vec<String> {
        document.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_literal_document() {
        let document = serialize(&compile("a"));
        assert_eq!(
            document,
            json!({
                "startingState": "S0",
                "S0": { "isTerminatingState": false, "a": ["S1"] },
                "S1": { "isTerminating": true },
            })
        );
        assert_eq!(keys(&document), vec!["startingState", "S0", "S1"]);
    }

    #[test]
    fn test_union_document() {
        let document = serialize(&compile("a|b"));
        assert_eq!(
            document,
            json!({
                "startingState": "S0",
                "S0": { "isTerminatingState": false, "Epsilon": ["S1", "S3"] },
                "S1": { "isTerminatingState": false, "a": ["S2"] },
                "S3": { "isTerminatingState": false, "b": ["S4"] },
                "S2": { "isTerminatingState": false, "Epsilon": ["S5"] },
                "S4": { "isTerminatingState": false, "Epsilon": ["S5"] },
                "S5": { "isTerminating": true },
            })
        );
        assert_eq!(
            keys(&document),
            vec!["startingState", "S0", "S1", "S3", "S2", "S4", "S5"]
        );
    }

    #[test]
    fn test_star_document() {
        let document = serialize(&compile("(ab)*"));
        assert_eq!(document["startingState"], json!("S0"));
        assert_eq!(document["S0"]["Epsilon"], json!(["S1", "S4"]));
        assert_eq!(document["S3"]["Epsilon"], json!(["S1", "S4"]));
        assert_eq!(document["S4"], json!({ "isTerminating": true }));
    }

    #[test]
    fn test_accept_state_with_transitions_keeps_transition_entry() {
        let fragment = Fragment::from_parts(
            BTreeSet::from([0, 1]),
            0,
            vec![1],
            vec![
                Transition::new(0, vec![1], Label::Symbol('a')),
                Transition::new(1, vec![1], Label::Symbol('a')),
            ],
        )
        .unwrap();
        let document = serialize(&fragment);
        assert_eq!(
            document["S1"],
            json!({ "isTerminatingState": true, "a": ["S1"] })
        );
        assert!(document["S1"].get("isTerminating").is_none());
    }

    #[test]
    fn test_records_sharing_a_state_are_merged() {
        let fragment = Fragment::from_parts(
            BTreeSet::from([0, 1, 2]),
            0,
            vec![2],
            vec![
                Transition::new(0, vec![1], Label::Symbol('a')),
                Transition::new(0, vec![2], Label::Symbol('b')),
                Transition::new(0, vec![2], Label::Symbol('a')),
                Transition::epsilon(1, vec![2]),
            ],
        )
        .unwrap();
        let document = serialize(&fragment);
        assert_eq!(
            document["S0"],
            json!({ "isTerminatingState": false, "a": ["S1", "S2"], "b": ["S2"] })
        );
    }

    #[test]
    fn test_pretty_output() {
        let text = to_json_pretty(&compile("a"));
        assert!(text.starts_with("{\n  \"startingState\": \"S0\""));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serialize(&compile("a")));
    }
}
