//! Lyric resolution and note↔syllable reconciliation.
//!
//! One note group is one word: a main note optionally followed by extension
//! notes. Resolution turns the word into phoneme symbols; reconciliation
//! repairs any mismatch between the number of vowels (syllables) and the
//! number of notes, then assembles one syllable per note with consonant
//! clusters attached to the following vowel.

use canta_score::{G2p, Note};

/// Sub-note durations produced by the split repair are rounded down to this
/// many ticks, with the remainder pushed into the last sub-note.
const SPLIT_GRANULARITY: i32 = 15;

/// One syllable bound to one (possibly repaired) note.
#[derive(Debug, Clone)]
pub struct Syllable {
    pub symbols: Vec<String>,
    pub note: Note,
}

/// Resolve a note group into syllables.
///
/// Repair policy: fewer notes than vowels splits the last note into equal
/// sub-notes; more notes than vowels merges the surplus into one. The
/// result always has exactly one syllable per vowel.
pub fn make_syllables(group: &[Note], g2p: &dyn G2p, default_pause: &str) -> Vec<Syllable> {
    let symbols = resolve_symbols(&group[0], g2p, default_pause);
    let symbols = apply_extensions(&symbols, group, g2p);
    let vowel_ids = vowels_with_fallback(&symbols, g2p);

    let notes: Vec<Note> = if group.len() < vowel_ids.len() {
        split_last_note(group, vowel_ids.len())
    } else if group.len() > vowel_ids.len() {
        merge_excess_notes(group, vowel_ids.len())
    } else {
        group.to_vec()
    };

    // First syllable takes everything up to and including the first vowel;
    // after that, consonant clusters attach to the vowel that follows them.
    let mut syllables = vec![Syllable {
        symbols: symbols[..=vowel_ids[0]].to_vec(),
        note: notes[0].clone(),
    }];
    let mut cluster: Vec<String> = Vec::new();
    for (i, symbol) in symbols.iter().enumerate().skip(vowel_ids[0] + 1) {
        if vowel_ids.contains(&i) {
            let mut syllable_symbols = std::mem::take(&mut cluster);
            syllable_symbols.push(symbol.clone());
            let note = notes[syllables.len()].clone();
            syllables.push(Syllable {
                symbols: syllable_symbols,
                note,
            });
        } else {
            cluster.push(symbol.clone());
        }
    }
    if let Some(last) = syllables.last_mut() {
        last.symbols.append(&mut cluster);
    }
    syllables
}

/// Resolve one note to phoneme symbols.
///
/// Priority: phonetic hint (invalid symbols dropped, empty result falls
/// through), then the G2P dictionary, then the lyric itself read as
/// space-separated symbols, then the default pause.
pub fn resolve_symbols(note: &Note, g2p: &dyn G2p, default_pause: &str) -> Vec<String> {
    if let Some(hint) = &note.phonetic_hint {
        let symbols: Vec<String> = hint
            .split_whitespace()
            .filter(|s| g2p.is_valid_symbol(s))
            .map(str::to_string)
            .collect();
        if !symbols.is_empty() {
            return symbols;
        }
    }
    if let Some(symbols) = g2p.query(&note.lyric.to_lowercase()) {
        return symbols;
    }
    let from_lyric: Vec<String> = note
        .lyric
        .split_whitespace()
        .filter(|s| g2p.is_valid_symbol(s))
        .map(str::to_string)
        .collect();
    if !from_lyric.is_empty() {
        return from_lyric;
    }
    vec![default_pause.to_string()]
}

/// Re-splice symbols across the group's extension notes: a `+~`/`+*` note
/// repeats the pending vowel instead of consuming the next one.
fn apply_extensions(symbols: &[String], notes: &[Note], g2p: &dyn G2p) -> Vec<String> {
    let vowel_ids = vowels_with_fallback(symbols, g2p);
    let mut out: Vec<String> = symbols[..=vowel_ids[0]].to_vec();
    let mut last_vowel = 0;
    for note in notes.iter().skip(1) {
        if last_vowel + 1 >= vowel_ids.len() {
            break;
        }
        if note.is_vowel_extension() {
            out.push(symbols[vowel_ids[last_vowel]].clone());
        } else {
            let prev = vowel_ids[last_vowel];
            last_vowel += 1;
            out.extend_from_slice(&symbols[prev + 1..=vowel_ids[last_vowel]]);
        }
    }
    out.extend_from_slice(&symbols[vowel_ids[last_vowel] + 1..]);
    out
}

/// Vowel indices; an all-consonant word treats its last phoneme as a vowel
/// so every word carries at least one syllable.
fn vowels_with_fallback(symbols: &[String], g2p: &dyn G2p) -> Vec<usize> {
    let mut ids: Vec<usize> = symbols
        .iter()
        .enumerate()
        .filter(|(_, s)| g2p.is_vowel(s))
        .map(|(i, _)| i)
        .collect();
    if ids.is_empty() {
        ids.push(symbols.len() - 1);
    }
    ids
}

/// Not-enough-notes repair: split the last note into equal sub-notes so
/// every syllable gets one, durations rounded to the tick granularity with
/// the remainder in the final sub-note.
fn split_last_note(notes: &[Note], syllable_count: usize) -> Vec<Note> {
    let Some((last, kept)) = notes.split_last() else {
        return Vec::new();
    };
    let sub_count = (syllable_count - kept.len()) as i32;
    let mut sub_duration = last.duration / sub_count / SPLIT_GRANULARITY * SPLIT_GRANULARITY;
    if sub_duration == 0 {
        // The note is too short for granular splitting; fall back to plain
        // division with a 1-tick floor rather than emit zero-length notes.
        sub_duration = (last.duration / sub_count).max(1);
    }
    let mut out = kept.to_vec();
    let mut position = last.position;
    for i in 0..sub_count {
        let duration = if i + 1 < sub_count {
            sub_duration
        } else {
            (last.duration - sub_duration * (sub_count - 1)).max(1)
        };
        out.push(Note {
            position,
            duration,
            tone: last.tone,
            lyric: last.lyric.clone(),
            phonetic_hint: last.phonetic_hint.clone(),
        });
        position += duration;
    }
    out
}

/// Excess-notes repair: every note from the last syllable onward is merged
/// into one note spanning their total duration.
fn merge_excess_notes(notes: &[Note], syllable_count: usize) -> Vec<Note> {
    let mut out = notes[..syllable_count - 1].to_vec();
    let anchor = &notes[syllable_count - 1];
    out.push(Note {
        position: anchor.position,
        duration: notes[syllable_count - 1..].iter().map(|n| n.duration).sum(),
        tone: anchor.tone,
        lyric: anchor.lyric.clone(),
        phonetic_hint: anchor.phonetic_hint.clone(),
    });
    out
}
