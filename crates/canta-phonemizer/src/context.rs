//! Phrase context and full-context label rendering.
//!
//! One [`PhraseContext`] covers one phrase (a contiguous run of notes).
//! Syllables and phonemes live in flat arenas; neighbors are reached by
//! index, and both sequences are in phrase order, so `i ± 1` is the
//! linked-chain traversal.
//!
//! [`PhraseContext::render_label`] produces the HTS-style full-context
//! string for one phoneme. Its field order, separators and `xx` null tokens
//! are an external contract: question files are written against this exact
//! layout, so none of it may change.

use canta_score::{pitch, SymbolKind};

use crate::config::SymbolInventory;

/// Null token in rendered labels.
const XX: &str = "xx";

/// Separators between the 16 phoneme-block slots.
const P_SEPS: [&str; 15] = [
    "@", "^", "-", "+", "=", "_", "%", "^", "_", "~", "-", "!", "[", "$", "]",
];

/// Separators between the 60 note-block slots.
const E_SEPS: [&str; 59] = [
    "]", "^", "=", "~", "!", "@", "#", "+", "]", "$", "|", "[", "&", "]", "=", "^", "~", "#", "_",
    ";", "$", "&", "%", "[", "|", "]", "-", "^", "+", "~", "=", "@", "$", "!", "%", "#", "|", "|",
    "-", "&", "&", "+", "[", ";", "]", ";", "~", "~", "^", "^", "@", "[", "#", "=", "!", "~", "+",
    "!", "^",
];

/// Separators for the 9 slots rendered from a neighbor note block.
const D_SEPS: [&str; 8] = ["!", "#", "$", "%", "|", "&", ";", "-"];
const F_SEPS: [&str; 8] = ["#", "#", "-", "$", "$", "+", "%", ";"];

/// One syllable bound to one note.
#[derive(Debug, Clone)]
pub struct SyllableCtx {
    /// MIDI tone of the owning note (0 for synthesized silence).
    pub tone: i32,
    /// Phoneme symbols of this syllable, onset first.
    pub symbols: Vec<String>,
    /// Start within the phrase in ms, lead-in padding included.
    pub start_ms: i32,
    /// End within the phrase in ms.
    pub end_ms: i32,
    /// Absolute tick position of the owning note.
    pub position_ticks: i32,
    /// Tick duration of the owning note.
    pub duration_ticks: i32,
}

impl SyllableCtx {
    #[inline]
    pub fn duration_ms(&self) -> i32 {
        self.end_ms - self.start_ms
    }

    #[inline]
    pub fn end_ticks(&self) -> i32 {
        self.position_ticks + self.duration_ticks
    }
}

/// One phoneme occurrence with its within-syllable context.
#[derive(Debug, Clone)]
pub struct PhonemeCtx {
    pub symbol: String,
    pub kind: SymbolKind,
    /// 1-based index within the syllable.
    pub position: usize,
    /// Count − index + 1, so the last phoneme has 1.
    pub position_backward: usize,
    /// Distance to the previous vowel in this syllable; −1 when not
    /// resolvable (including for vowels themselves).
    pub dist_from_prev_vowel: i32,
    /// Distance to the next vowel in this syllable; −1 when not resolvable.
    pub dist_to_next_vowel: i32,
    /// Index of the owning syllable.
    pub syllable: usize,
}

/// Flat-arena context for one phrase.
#[derive(Debug, Clone)]
pub struct PhraseContext {
    pub syllables: Vec<SyllableCtx>,
    pub phonemes: Vec<PhonemeCtx>,
    /// Whole-phrase duration in ms, padding included.
    pub sentence_dur_ms: i32,
}

impl PhraseContext {
    pub fn new(sentence_dur_ms: i32) -> Self {
        Self {
            syllables: Vec::new(),
            phonemes: Vec::new(),
            sentence_dur_ms,
        }
    }

    /// Append a syllable and derive the per-phoneme context for its symbols.
    ///
    /// Returns the global index of the syllable's first phoneme.
    pub fn push_syllable(&mut self, syllable: SyllableCtx, inventory: &SymbolInventory) -> usize {
        let first_phoneme = self.phonemes.len();
        let syllable_index = self.syllables.len();
        let n = syllable.symbols.len();

        let mut phonemes: Vec<PhonemeCtx> = syllable
            .symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| PhonemeCtx {
                symbol: symbol.clone(),
                kind: inventory.classify(symbol),
                position: i + 1,
                position_backward: n - i,
                dist_from_prev_vowel: -1,
                dist_to_next_vowel: -1,
                syllable: syllable_index,
            })
            .collect();

        // Vowel distances scan within the syllable only. A vowel at slot 0
        // intentionally yields no distance; labels have always been rendered
        // that way and trained models expect it.
        let mut prev_vowel_pos: i32 = -1;
        for i in 0..n {
            if phonemes[i].kind == SymbolKind::Vowel {
                prev_vowel_pos = i as i32;
            } else if prev_vowel_pos > 0 {
                phonemes[i].dist_from_prev_vowel = i as i32 - prev_vowel_pos;
            }
        }
        let mut next_vowel_pos: i32 = -1;
        for i in (1..n).rev() {
            if phonemes[i].kind == SymbolKind::Vowel {
                next_vowel_pos = i as i32;
            } else if next_vowel_pos > 0 {
                phonemes[i].dist_to_next_vowel = next_vowel_pos - i as i32;
            }
        }

        self.phonemes.extend(phonemes);
        self.syllables.push(syllable);
        first_phoneme
    }

    /// Render the full-context label string for phoneme `index`.
    pub fn render_label(&self, index: usize) -> String {
        let ph = &self.phonemes[index];
        let syl = ph.syllable;

        let mut label = join_slots(&self.p_slots(index), &P_SEPS, "");

        let b = self.b_slots(syl);
        let a = match syl.checked_sub(1) {
            Some(prev) => self.b_slots(prev),
            None => std::array::from_fn(|_| XX.to_string()),
        };
        let c = if syl + 1 < self.syllables.len() {
            self.b_slots(syl + 1)
        } else {
            std::array::from_fn(|_| XX.to_string())
        };
        label.push_str(&join_slots(&a, &["-", "-", "@", "~"], "/A:"));
        label.push_str(&join_slots(&b, &["_", "_", "@", "|"], "/B:"));
        label.push_str(&join_slots(&c, &["+", "+", "@", "&"], "/C:"));

        let e = self.e_slots(syl);
        let d: [String; 9] = match syl.checked_sub(1) {
            Some(prev) => head9(self.e_slots(prev)),
            None => std::array::from_fn(|_| XX.to_string()),
        };
        let f: [String; 9] = if syl + 1 < self.syllables.len() {
            head9(self.e_slots(syl + 1))
        } else {
            std::array::from_fn(|_| XX.to_string())
        };
        label.push_str(&join_slots(&d, &D_SEPS, "/D:"));
        label.push_str(&join_slots(&e, &E_SEPS, "/E:"));
        label.push_str(&join_slots(&f, &F_SEPS, "/F:"));
        label.push_str("/G:xx_xx/H:xx_xx/I:xx_xx/J:xx~xx@1");
        label
    }

    /// Render all labels in phrase order.
    pub fn render_labels(&self) -> Vec<String> {
        (0..self.phonemes.len())
            .map(|i| self.render_label(i))
            .collect()
    }

    /// Phoneme block: identity of this phoneme and its four neighbors
    /// (reaching across syllable boundaries), positions, vowel distances.
    fn p_slots(&self, index: usize) -> [String; 16] {
        let ph = &self.phonemes[index];
        let neighbor = |offset: i64| -> String {
            let i = index as i64 + offset;
            if i >= 0 && (i as usize) < self.phonemes.len() {
                self.phonemes[i as usize].symbol.clone()
            } else {
                XX.to_string()
            }
        };
        let mut slots: [String; 16] = std::array::from_fn(|_| XX.to_string());
        slots[0] = ph.kind.code().to_string();
        slots[1] = neighbor(-2);
        slots[2] = neighbor(-1);
        slots[3] = ph.symbol.clone();
        slots[4] = neighbor(1);
        slots[5] = neighbor(2);
        slots[11] = ph.position.to_string();
        slots[12] = ph.position_backward.to_string();
        if ph.dist_from_prev_vowel >= 0 {
            slots[13] = ph.dist_from_prev_vowel.to_string();
        }
        if ph.dist_to_next_vowel >= 0 {
            slots[14] = ph.dist_to_next_vowel.to_string();
        }
        slots
    }

    /// Syllable block: phoneme count, fixed 1/1 syllable counts.
    fn b_slots(&self, syl: usize) -> [String; 5] {
        let mut slots: [String; 5] = std::array::from_fn(|_| XX.to_string());
        slots[0] = self.syllables[syl].symbols.len().to_string();
        slots[1] = "1".to_string();
        slots[2] = "1".to_string();
        slots
    }

    /// Note block: pitch name, coarse duration/position slots, in-sentence
    /// indices, relative pitch to the neighbor notes.
    fn e_slots(&self, syl: usize) -> [String; 60] {
        let s = &self.syllables[syl];
        let index = syl;
        let index_backward = self.syllables.len() - syl;
        let mut slots: [String; 60] = std::array::from_fn(|_| XX.to_string());
        slots[0] = pitch::tone_name(s.tone);
        slots[5] = "1".to_string();
        slots[6] = ((s.duration_ms() + 5) / 10).to_string();
        slots[7] = ((s.duration_ticks + 10) / 20).to_string();
        if index > 0 {
            slots[17] = index.to_string();
        }
        slots[18] = index_backward.to_string();
        slots[19] = ((s.start_ms + 50) / 100).to_string();
        slots[20] = ((self.sentence_dur_ms - s.start_ms + 50) / 100).to_string();
        let relative = |other: Option<&SyllableCtx>| -> String {
            match other {
                Some(o) if s.tone > 0 && o.tone > 0 => pitch::write_signed(o.tone - s.tone),
                _ => "p0".to_string(),
            }
        };
        slots[56] = relative(syl.checked_sub(1).map(|p| &self.syllables[p]));
        slots[57] = relative(self.syllables.get(syl + 1));
        slots
    }
}

fn head9(slots: [String; 60]) -> [String; 9] {
    let mut out: [String; 9] = std::array::from_fn(|_| String::new());
    for (dst, src) in out.iter_mut().zip(slots) {
        *dst = src;
    }
    out
}

fn join_slots(slots: &[String], seps: &[&str], prefix: &str) -> String {
    debug_assert_eq!(slots.len(), seps.len() + 1);
    let mut out = String::from(prefix);
    out.push_str(&slots[0]);
    for (slot, sep) in slots[1..].iter().zip(seps) {
        out.push_str(sep);
        out.push_str(slot);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> SymbolInventory {
        SymbolInventory::default()
    }

    fn sil_syllable() -> SyllableCtx {
        SyllableCtx {
            tone: 0,
            symbols: vec!["sil".to_string()],
            start_ms: 0,
            end_ms: 500,
            position_ticks: -480,
            duration_ticks: 480,
        }
    }

    fn la_syllable() -> SyllableCtx {
        SyllableCtx {
            tone: 60,
            symbols: vec!["l".to_string(), "a".to_string()],
            start_ms: 500,
            end_ms: 1000,
            position_ticks: 0,
            duration_ticks: 480,
        }
    }

    fn phrase() -> PhraseContext {
        let mut ctx = PhraseContext::new(1500);
        ctx.push_syllable(sil_syllable(), &inventory());
        ctx.push_syllable(la_syllable(), &inventory());
        ctx
    }

    #[test]
    fn test_push_syllable_positions() {
        let ctx = phrase();
        assert_eq!(ctx.phonemes.len(), 3);
        let l = &ctx.phonemes[1];
        assert_eq!(l.position, 1);
        assert_eq!(l.position_backward, 2);
        let a = &ctx.phonemes[2];
        assert_eq!(a.position, 2);
        assert_eq!(a.position_backward, 1);
        assert_eq!(a.kind, SymbolKind::Vowel);
    }

    #[test]
    fn test_vowel_distances() {
        let mut ctx = PhraseContext::new(1000);
        // "s t a k u" — consonants around interior vowels.
        ctx.push_syllable(
            SyllableCtx {
                tone: 60,
                symbols: ["s", "t", "a", "k", "u"].iter().map(|s| s.to_string()).collect(),
                start_ms: 0,
                end_ms: 500,
                position_ticks: 0,
                duration_ticks: 480,
            },
            &inventory(),
        );
        let ph = &ctx.phonemes;
        // 'k' sits one after vowel 'a' (slot 2) and one before vowel 'u'.
        assert_eq!(ph[3].dist_from_prev_vowel, 1);
        assert_eq!(ph[3].dist_to_next_vowel, 1);
        // 't' precedes 'a'.
        assert_eq!(ph[1].dist_to_next_vowel, 1);
        assert_eq!(ph[1].dist_from_prev_vowel, -1);
        // Vowels themselves keep the sentinel.
        assert_eq!(ph[2].dist_from_prev_vowel, -1);
        assert_eq!(ph[2].dist_to_next_vowel, -1);
    }

    #[test]
    fn test_phoneme_block_layout() {
        let ctx = phrase();
        let label = ctx.render_label(2);
        assert!(
            label.starts_with("v@sil^l-a+xx=xx_xx%xx^xx_xx~xx-2!1[xx$xx]xx"),
            "unexpected phoneme block: {label}"
        );
    }

    #[test]
    fn test_syllable_blocks() {
        let ctx = phrase();
        let label = ctx.render_label(2);
        assert!(label.contains("/A:1-1-1@xx~xx"));
        assert!(label.contains("/B:2_1_1@xx|xx"));
        assert!(label.contains("/C:xx+xx+xx@xx&xx"));
    }

    #[test]
    fn test_note_blocks() {
        let ctx = phrase();
        let label = ctx.render_label(2);
        // Previous note (silence): C-1, 1 syllable, 50 (10ms units), 24 (96th notes).
        assert!(label.contains("/D:C-1!xx#xx$xx%xx|1&50;24-xx"));
        assert!(label.contains("/E:C4]xx^"));
        // Slots 55-59: xx ~ p0 + p0 ! xx ^ xx (prev is silence, no next note).
        assert!(label.contains("!xx~p0+p0!xx^xx/F:"));
        assert!(label.contains("/F:xx#xx#xx-xx$xx$xx+xx%xx;xx"));
        assert!(label.ends_with("/G:xx_xx/H:xx_xx/I:xx_xx/J:xx~xx@1"));
    }

    #[test]
    fn test_in_sentence_indices() {
        let ctx = phrase();
        // Leading silence is note 0: index renders as xx, backward index 2,
        // start 0ms and 1500ms from the end (100ms units).
        let sil_label = ctx.render_label(0);
        assert!(sil_label.contains("~xx#2_0;15$"), "bad slots: {sil_label}");
        // Second note: index 1, backward 1, start 500ms, 1000ms from end.
        let a_label = ctx.render_label(2);
        assert!(a_label.contains("~1#1_5;10$"), "bad slots: {a_label}");
    }

    #[test]
    fn test_relative_pitch_between_voiced_notes() {
        let mut ctx = PhraseContext::new(2000);
        ctx.push_syllable(sil_syllable(), &inventory());
        ctx.push_syllable(la_syllable(), &inventory());
        let mut second = la_syllable();
        second.tone = 64;
        second.start_ms = 1000;
        second.end_ms = 1500;
        second.position_ticks = 480;
        ctx.push_syllable(second, &inventory());

        // From the C4 note the next note is E4: +4 semitones.
        let label = ctx.render_label(2);
        assert!(label.contains("~p0+p4!"), "missing relative pitch: {label}");
        // From the E4 note the previous note is C4: −4.
        let label2 = ctx.render_label(4);
        assert!(label2.contains("~m4+p0!"), "missing relative pitch: {label2}");
    }

    #[test]
    fn test_neighbor_symbols_cross_syllables() {
        let ctx = phrase();
        let label = ctx.render_label(1);
        // 'l' sees sil before and 'a' after; nothing two steps away left.
        assert!(label.starts_with("c@xx^sil-l+a=xx"));
    }
}
