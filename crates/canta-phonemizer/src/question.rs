//! HTS-style question set.
//!
//! A question file is the external contract between a trained duration model
//! and this front end. Each line is either a binary question
//! (`QS "name" {pattern,pattern,...}`) or a continuous one
//! (`CQS "name" {pattern}`); patterns are `*`-delimited wildcards over the
//! rendered context-label string.

use std::fs;
use std::ops::Range;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// Capture-group sequences that naive escaping would mangle and must be
/// restored verbatim: numeric captures, then singing-specific pitch-name and
/// signed-integer captures.
const NUMBER_PATTERNS: [(&str, &str); 3] = [
    (r"(\d+)", r"(\d+)"),
    (r"([-\d]+)", r"([-\d]+)"),
    (r"([\d\.]+)", r"([\d\.]+)"),
];

const SVS_PATTERNS: [(&str, &str); 3] = [
    (r"([A-Z][b]?[0-9]+)", r"([A-Z][b]?[0-9]+)"),
    (r"(\NOTE)", r"([A-Z][b]?[0-9]+)"),
    (r"([pm]\d+)", r"([pm]\d+)"),
];

/// One binary question: 1 if any pattern matches the context string.
#[derive(Debug, Clone)]
pub struct BinaryQuestion {
    pub name: String,
    pub patterns: Vec<Regex>,
}

/// One continuous question: a single regex with one capture group.
#[derive(Debug, Clone)]
pub struct NumericQuestion {
    pub name: String,
    pub pattern: Regex,
    /// Whether the pattern captures a signed integer; decides the
    /// no-match sentinel (−50.0 instead of −1.0).
    pub signed_int: bool,
}

/// Parsed question set, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct QuestionSet {
    pub binary: Vec<BinaryQuestion>,
    pub numeric: Vec<NumericQuestion>,
}

impl QuestionSet {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut set = Self::default();
        let ll_key = Regex::new("LL-")?;
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let kind = tokens.next().unwrap_or_default();
            let key = tokens.next().ok_or_else(|| Error::QuestionSet {
                line: line_no + 1,
                reason: "missing question name".to_string(),
            })?;
            let name = key.trim_matches(|c| c == '"' || c == '\'').to_string();
            let body = line
                .split_once('{')
                .and_then(|(_, rest)| rest.split_once('}'))
                .map(|(inner, _)| inner.trim())
                .ok_or_else(|| Error::QuestionSet {
                    line: line_no + 1,
                    reason: "missing {patterns} block".to_string(),
                })?;
            match kind {
                "CQS" => {
                    if body.contains(',') {
                        return Err(Error::QuestionSet {
                            line: line_no + 1,
                            reason: "CQS takes exactly one pattern".to_string(),
                        });
                    }
                    let processed = wildcard_to_regex(body, true, true);
                    set.numeric.push(NumericQuestion {
                        name,
                        signed_int: processed.contains(r"([-\d]+)"),
                        pattern: Regex::new(&processed)?,
                    });
                }
                "QS" => {
                    let mut patterns = Vec::new();
                    for item in body.split(',') {
                        let mut processed = wildcard_to_regex(item.trim(), false, true);
                        // The leftmost context slot is the phoneme before the
                        // previous one; LL- questions must match it at the
                        // start of the label.
                        if ll_key.is_match(key) && !processed.starts_with('^') {
                            processed.insert(0, '^');
                        }
                        patterns.push(Regex::new(&processed)?);
                    }
                    set.binary.push(BinaryQuestion { name, patterns });
                }
                other => {
                    return Err(Error::QuestionSet {
                        line: line_no + 1,
                        reason: format!("unknown question kind {other:?}"),
                    });
                }
            }
        }
        Ok(set)
    }

    /// Feature vector width: binary questions then continuous ones.
    pub fn width(&self) -> usize {
        self.binary.len() + self.numeric.len()
    }

    /// Columns holding raw note pitch, overwritten by log-F0 conditioning.
    /// By convention these are the first three continuous questions.
    pub fn pitch_indices(&self) -> Range<usize> {
        self.binary.len()..self.binary.len() + 3
    }
}

/// Compile one `*`-delimited wildcard pattern to a regex string.
///
/// `*` becomes `.*`; a pattern containing `*` but not starting (ending) with
/// one is anchored at that end. When `convert_number` is set, numeric capture
/// groups are restored after escaping; `convert_svs` likewise restores the
/// singing-specific pitch-name and signed-integer captures.
fn wildcard_to_regex(question: &str, convert_number: bool, convert_svs: bool) -> String {
    let mut prefix = "";
    let mut postfix = "";
    if question.contains('*') {
        if !question.starts_with('*') {
            prefix = r"\A";
        }
        if !question.ends_with('*') {
            postfix = r"\z";
        }
    }
    let mut escaped = regex::escape(question.trim_matches('*')).replace(r"\*", ".*");
    if convert_number {
        for (raw, target) in NUMBER_PATTERNS {
            escaped = escaped.replace(&regex::escape(raw), target);
        }
    }
    if convert_svs {
        for (raw, target) in SVS_PATTERNS {
            escaped = escaped.replace(&regex::escape(raw), target);
        }
    }
    format!("{prefix}{escaped}{postfix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_wildcard_matches_anywhere() {
        let set = QuestionSet::parse("QS \"C-Phone_a\" {*-a+*}\n").unwrap();
        assert_eq!(set.binary.len(), 1);
        let q = &set.binary[0];
        assert_eq!(q.name, "C-Phone_a");
        assert!(q.patterns[0].is_match("xx@sil^l-a+l=a_1"));
        assert!(!q.patterns[0].is_match("xx@sil^a-l+a=l_1"));
    }

    #[test]
    fn test_anchoring_without_leading_star() {
        let set = QuestionSet::parse("QS \"head\" {sil^*}\n").unwrap();
        let q = &set.binary[0];
        assert!(q.patterns[0].is_match("sil^l-a"));
        assert!(!q.patterns[0].is_match("x@sil^l-a"));
    }

    #[test]
    fn test_anchoring_without_trailing_star() {
        let set = QuestionSet::parse("QS \"tail\" {*~p0}\n").unwrap();
        let q = &set.binary[0];
        assert!(q.patterns[0].is_match("stuff~p0"));
        assert!(!q.patterns[0].is_match("stuff~p0!more"));
    }

    #[test]
    fn test_multiple_patterns_and_order() {
        let text = "QS \"a\" {*-a+*,*-A+*}\nCQS \"e1\" {*/E:(\\NOTE)]*}\nQS \"b\" {*-b+*}\n";
        let set = QuestionSet::parse(text).unwrap();
        assert_eq!(set.binary.len(), 2);
        assert_eq!(set.numeric.len(), 1);
        assert_eq!(set.width(), 3);
        assert_eq!(set.binary[0].patterns.len(), 2);
        assert_eq!(set.binary[1].name, "b");
    }

    #[test]
    fn test_note_capture_group_restored() {
        let set = QuestionSet::parse("CQS \"e1\" {*/E:(\\NOTE)]*}\n").unwrap();
        let q = &set.numeric[0];
        assert!(!q.signed_int);
        let caps = q.pattern.captures("a/E:Db4]xx^").unwrap();
        assert_eq!(&caps[1], "Db4");
    }

    #[test]
    fn test_signed_int_capture_flag() {
        let set = QuestionSet::parse("CQS \"d1\" {*#([-\\d]+)!*}\n").unwrap();
        let q = &set.numeric[0];
        assert!(q.signed_int);
        let caps = q.pattern.captures("x#-12!y").unwrap();
        assert_eq!(&caps[1], "-12");
    }

    #[test]
    fn test_digit_capture_restored() {
        let set = QuestionSet::parse("CQS \"pos\" {*_(\\d+)~*}\n").unwrap();
        let caps = set.numeric[0].pattern.captures("a_42~b").unwrap();
        assert_eq!(&caps[1], "42");
    }

    #[test]
    fn test_ll_questions_get_hat() {
        let set = QuestionSet::parse("QS \"LL-sil\" {sil*}\n").unwrap();
        assert!(set.binary[0].patterns[0].as_str().starts_with('^'));
    }

    #[test]
    fn test_pitch_indices_follow_binary_block() {
        let text = "QS \"a\" {*-a+*}\nQS \"b\" {*-b+*}\nCQS \"e1\" {*/E:(\\NOTE)]*}\n";
        let set = QuestionSet::parse(text).unwrap();
        assert_eq!(set.pitch_indices(), 2..5);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(QuestionSet::parse("XQ \"a\" {*-a+*}\n").is_err());
    }

    #[test]
    fn test_skips_comments_and_blanks() {
        let set = QuestionSet::parse("# header\n\nQS \"a\" {*-a+*}\n").unwrap();
        assert_eq!(set.width(), 1);
    }
}
