//! Merlin-style numeric feature extraction from rendered context labels.

use canta_score::pitch;

use crate::question::{NumericQuestion, QuestionSet};

/// Feature matrix for a phrase: one row per phoneme, binary question values
/// followed by continuous ones, in declaration order.
pub fn linguistic_features(labels: &[String], questions: &QuestionSet) -> Vec<Vec<f32>> {
    labels
        .iter()
        .map(|label| {
            let mut row = Vec::with_capacity(questions.width());
            for q in &questions.binary {
                let hit = q.patterns.iter().any(|p| p.is_match(label));
                row.push(if hit { 1.0 } else { 0.0 });
            }
            for q in &questions.numeric {
                row.push(numeric_value(q, label));
            }
            row
        })
        .collect()
}

/// Evaluate one continuous question against a label.
///
/// No match yields the sentinel (−50.0 for signed-integer patterns, −1.0
/// otherwise). A captured value is read as a pitch name, then as a `p`/`m`
/// signed integer, then as a bare float.
fn numeric_value(question: &NumericQuestion, label: &str) -> f32 {
    let sentinel = if question.signed_int { -50.0 } else { -1.0 };
    let Some(capture) = question
        .pattern
        .captures(label)
        .and_then(|caps| caps.get(1))
    else {
        return sentinel;
    };
    let text = capture.as_str();
    if let Some(tone) = pitch::name_to_tone(text).filter(|tone| *tone > 0) {
        return tone as f32;
    }
    if let Some(value) = pitch::parse_signed(text) {
        return value as f32;
    }
    text.parse().unwrap_or(sentinel)
}

/// Log-F0 conditioning: overwrite the pitch columns with the natural log of
/// the fundamental frequency of the last voiced tone seen at or before each
/// row, holding the previous tone across unvoiced rows. The hold value
/// starts at middle C and is shared across the pitch columns.
pub fn apply_log_f0(matrix: &mut [Vec<f32>], pitch_indices: impl Iterator<Item = usize>) {
    let mut last_tone = 60.0f32;
    for column in pitch_indices {
        for row in matrix.iter_mut() {
            if row[column] > 0.0 {
                last_tone = row[column];
            }
            row[column] = (pitch::tone_to_freq(last_tone as f64)).ln() as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn questions() -> QuestionSet {
        QuestionSet::parse(concat!(
            "QS \"C-a\" {*-a+*}\n",
            "QS \"C-sil\" {*-sil+*}\n",
            "CQS \"e1\" {*/E:(\\NOTE)]*}\n",
            "CQS \"e57\" {*+([pm]\\d+)!*}\n",
            "CQS \"pos\" {*-(\\d+)!*}\n",
        ))
        .unwrap()
    }

    #[test]
    fn test_binary_evaluation() {
        let labels = vec![
            "x^sil-a+l=a/E:C4]xx".to_string(),
            "x^a-l+a=sil/E:C4]xx".to_string(),
        ];
        let m = linguistic_features(&labels, &questions());
        assert_eq!(m.len(), 2);
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[1][0], 0.0);
        assert_eq!(m[0][1], 0.0);
    }

    #[test]
    fn test_numeric_pitch_name() {
        let labels = vec!["x-a+l/E:Db4]xx".to_string()];
        let m = linguistic_features(&labels, &questions());
        assert_eq!(m[0][2], 61.0);
    }

    #[test]
    fn test_numeric_signed_encoding() {
        let labels = vec!["x+m3!y/E:C4]xx".to_string()];
        let m = linguistic_features(&labels, &questions());
        assert_eq!(m[0][3], -3.0);
    }

    #[test]
    fn test_numeric_plain_number() {
        let labels = vec!["q-7!r".to_string()];
        let m = linguistic_features(&labels, &questions());
        assert_eq!(m[0][4], 7.0);
    }

    #[test]
    fn test_numeric_sentinels() {
        let labels = vec!["nothing here".to_string()];
        let set = QuestionSet::parse(concat!(
            "CQS \"plain\" {*_(\\d+)~*}\n",
            "CQS \"signed\" {*#([-\\d]+)!*}\n",
        ))
        .unwrap();
        let m = linguistic_features(&labels, &set);
        assert_eq!(m[0][0], -1.0);
        assert_eq!(m[0][1], -50.0);
    }

    #[test]
    fn test_row_width() {
        let labels = vec!["x".to_string()];
        let q = questions();
        let m = linguistic_features(&labels, &q);
        assert_eq!(m[0].len(), q.width());
    }

    #[test]
    fn test_log_f0_hold() {
        // Column 0 carries raw tones: unvoiced, C4, unvoiced, A4, unvoiced.
        let mut m = vec![
            vec![0.0],
            vec![60.0],
            vec![-1.0],
            vec![69.0],
            vec![0.0],
        ];
        apply_log_f0(&mut m, std::iter::once(0));
        let ln_c4 = (pitch::tone_to_freq(60.0) as f32).ln();
        let ln_a4 = 440.0f32.ln();
        // Leading unvoiced row holds the middle-C default.
        assert_relative_eq!(m[0][0], ln_c4, epsilon = 1e-5);
        assert_relative_eq!(m[1][0], ln_c4, epsilon = 1e-5);
        assert_relative_eq!(m[2][0], ln_c4, epsilon = 1e-5);
        assert_relative_eq!(m[3][0], ln_a4, epsilon = 1e-5);
        assert_relative_eq!(m[4][0], ln_a4, epsilon = 1e-5);
    }
}
