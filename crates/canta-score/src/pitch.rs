//! Pitch math: tone numbers, pitch names, frequencies.
//!
//! Rendered pitch names use flat spellings (`Db4`, not `C#4`) because that
//! is what the label contract consumed by question files expects; parsing
//! accepts both sharp and flat spellings.

/// Flat note spellings within one octave, indexed by `tone % 12`.
const KEYS_IN_OCTAVE: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Pitch name of a MIDI tone number, e.g. `60` → `"C4"`.
///
/// Negative tones render as an empty string.
pub fn tone_name(tone: i32) -> String {
    if tone < 0 {
        return String::new();
    }
    format!("{}{}", KEYS_IN_OCTAVE[(tone % 12) as usize], tone / 12 - 1)
}

/// Parse a pitch name such as `C4`, `C#4` or `Db4` to a MIDI tone number.
pub fn name_to_tone(name: &str) -> Option<i32> {
    if name.len() < 2 {
        return None;
    }
    let bytes = name.as_bytes();
    let accidental = matches!(bytes[1], b'#' | b'b');
    let (letter, octave_str) = name.split_at(if accidental { 2 } else { 1 });
    let in_octave = match letter {
        "C" => 0,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" => 4,
        "F" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" => 11,
        _ => return None,
    };
    let octave: i32 = octave_str.parse().ok()?;
    Some(12 * (octave + 1) + in_octave)
}

/// Fundamental frequency of a tone number in Hz (A4 = 69 = 440 Hz).
pub fn tone_to_freq(tone: f64) -> f64 {
    440.0 * 2f64.powf((tone - 69.0) / 12.0)
}

/// Signed-integer wire encoding used by label slots: `p` for zero and
/// positive values, `m` for negative, e.g. `3` → `"p3"`, `-2` → `"m2"`.
pub fn write_signed(value: i32) -> String {
    format!("{}{}", if value >= 0 { "p" } else { "m" }, value.abs())
}

/// Parse the `p`/`m` signed-integer encoding.
pub fn parse_signed(text: &str) -> Option<i32> {
    if let Some(digits) = text.strip_prefix('p') {
        digits.parse().ok()
    } else if let Some(digits) = text.strip_prefix('m') {
        digits.parse::<i32>().ok().map(|v| -v)
    } else {
        None
    }
}
