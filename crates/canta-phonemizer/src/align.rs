//! Alignment of predicted phoneme durations to note boundaries.
//!
//! Model durations rarely sum to the exact span of a phrase. Anchors
//! pin selected phonemes (vowel onsets and the trailing silence) to
//! their note times and the remaining phonemes are stretched
//! proportionally between them.

/// Pins phoneme `phoneme` to start at `ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub phoneme: usize,
    pub ms: f64,
}

impl Anchor {
    pub fn new(phoneme: usize, ms: f64) -> Self {
        Self { phoneme, ms }
    }
}

/// Computes start times in ms for every phoneme.
///
/// `durations` holds one predicted length per phoneme. `anchors` must
/// be sorted by phoneme index. Phonemes before the first anchor are
/// laid out backward from it at raw durations, phonemes between two
/// anchors are scaled so the group exactly fills the anchor gap, and
/// phonemes after the last anchor run forward at raw durations.
pub fn align_positions(durations: &[f32], anchors: &[Anchor]) -> Vec<f64> {
    let mut positions = vec![0.0; durations.len()];
    let Some(first) = anchors.first() else {
        let mut cursor = 0.0;
        for (pos, dur) in positions.iter_mut().zip(durations) {
            *pos = cursor;
            cursor += f64::from(*dur);
        }
        return positions;
    };

    // Leading consonants walk backward from the first anchored vowel.
    if first.phoneme < durations.len() {
        positions[first.phoneme] = first.ms;
    }
    let mut cursor = first.ms;
    for k in (0..first.phoneme.min(durations.len())).rev() {
        cursor -= f64::from(durations[k]);
        positions[k] = cursor;
    }

    for pair in anchors.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let lo = a.phoneme.min(durations.len());
        let hi = b.phoneme.min(durations.len());
        let sum: f64 = durations[lo..hi].iter().map(|d| f64::from(*d)).sum();
        let ratio = if sum > 0.0 { (b.ms - a.ms) / sum } else { 0.0 };
        let mut cursor = a.ms;
        for k in lo..hi {
            positions[k] = cursor;
            cursor += f64::from(durations[k]) * ratio;
        }
        if hi < durations.len() {
            positions[hi] = b.ms;
        }
    }

    if let Some(last) = anchors.last() {
        if last.phoneme < durations.len() {
            positions[last.phoneme] = last.ms;
            let mut cursor = last.ms;
            for k in last.phoneme..durations.len() {
                positions[k] = cursor;
                cursor += f64::from(durations[k]);
            }
        }
    }

    positions
}
