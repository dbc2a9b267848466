//! Post-alignment phoneme redirection.
//!
//! Singers may remap phoneme sequences after timing is settled, e.g.
//! collapsing a diphthong pair into one symbol. Rules rewrite the
//! symbol list while keeping slot positions stable: a sequence of n
//! symbols that maps to one symbol leaves n−1 empty slots behind, so
//! timing indices computed before redirection stay valid. Empty slots
//! are dropped at emission.

use std::collections::HashMap;

use regex::Regex;

use crate::config::RedirectionRule;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct RedirectionDict {
    pattern: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl RedirectionDict {
    pub fn new(rules: &[RedirectionRule]) -> Result<Self> {
        let mut rules: Vec<&RedirectionRule> =
            rules.iter().filter(|r| !r.from.is_empty()).collect();
        if rules.is_empty() {
            return Ok(Self::default());
        }
        // Longer sequences first so they win alternation preference.
        rules.sort_by_key(|r| std::cmp::Reverse(r.from.len()));

        let mut alternatives = Vec::with_capacity(rules.len());
        let mut replacements = HashMap::new();
        for rule in rules {
            let key = rule.from.join("\n");
            alternatives.push(regex::escape(&key));
            let padded = format!("{}{}", rule.to, "\n".repeat(rule.from.len() - 1));
            replacements.insert(key, padded);
        }
        let pattern = Regex::new(&format!("(?m)^(?:{})$", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
            replacements,
        })
    }

    /// Rewrites `symbols` in place of matched rule sequences. The
    /// returned vector always has the same length as the input.
    pub fn apply(&self, symbols: &[String]) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return symbols.to_vec();
        };
        let joined = symbols.join("\n");
        let rewritten = pattern.replace_all(&joined, |caps: &regex::Captures| {
            self.replacements
                .get(&caps[0])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        rewritten.split('\n').map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from: &[&str], to: &str) -> RedirectionRule {
        RedirectionRule {
            from: from.iter().map(|s| s.to_string()).collect(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_empty_dict_is_identity() {
        let dict = RedirectionDict::new(&[]).unwrap();
        let symbols = vec!["a".to_string(), "i".to_string()];
        assert_eq!(dict.apply(&symbols), symbols);
    }

    #[test]
    fn test_pair_collapses_with_placeholder() {
        let dict = RedirectionDict::new(&[rule(&["a", "i"], "ai")]).unwrap();
        let symbols: Vec<String> =
            ["k", "a", "i", "n"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dict.apply(&symbols), vec!["k", "ai", "", "n"]);
    }

    #[test]
    fn test_no_partial_symbol_match() {
        let dict = RedirectionDict::new(&[rule(&["a"], "A")]).unwrap();
        let symbols = vec!["ae".to_string(), "a".to_string()];
        assert_eq!(dict.apply(&symbols), vec!["ae", "A"]);
    }

    #[test]
    fn test_longest_rule_wins() {
        let dict = RedirectionDict::new(&[
            rule(&["a"], "A"),
            rule(&["a", "u"], "au"),
        ])
        .unwrap();
        let symbols: Vec<String> = ["a", "u"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dict.apply(&symbols), vec!["au", ""]);
    }

    #[test]
    fn test_length_is_preserved() {
        let dict =
            RedirectionDict::new(&[rule(&["e", "i", "N"], "eN")]).unwrap();
        let symbols: Vec<String> =
            ["s", "e", "i", "N", "pau"].iter().map(|s| s.to_string()).collect();
        let out = dict.apply(&symbols);
        assert_eq!(out.len(), symbols.len());
        assert_eq!(out, vec!["s", "eN", "", "", "pau"]);
    }
}
