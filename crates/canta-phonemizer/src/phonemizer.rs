//! Phonemizer façade.
//!
//! [`Phonemizer::set_up`] takes the note groups of a voice part, splits
//! them into phrases at timeline gaps, and runs the whole pipeline per
//! phrase: lyric resolution, full-context labels, feature extraction,
//! duration inference, anchor alignment and redirection. Results are
//! cached per note group; [`Phonemizer::process`] is then a lookup.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use canta_score::{G2p, Note, TimeAxis};

use crate::align::{align_positions, Anchor};
use crate::config::SingerConfig;
use crate::context::{PhraseContext, SyllableCtx};
use crate::dict::TableG2p;
use crate::error::{Error, Result};
use crate::features::{apply_log_f0, linguistic_features};
use crate::model::{validate_output, DurationModel};
use crate::question::QuestionSet;
use crate::redirect::RedirectionDict;
use crate::scaler::Scaler;
use crate::syllable::make_syllables;

/// One timed phoneme, positioned in ticks relative to its note group's
/// first note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeTiming {
    pub symbol: String,
    pub tick_offset: i32,
}

/// Singer bank plus a duration model, with per-group result cache.
pub struct Phonemizer {
    config: SingerConfig,
    g2p: TableG2p,
    questions: QuestionSet,
    in_scaler: Scaler,
    out_scaler: Scaler,
    redirect: RedirectionDict,
    model: Box<dyn DurationModel>,
    results: HashMap<i32, Vec<PhonemeTiming>>,
}

impl std::fmt::Debug for Phonemizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Phonemizer").finish_non_exhaustive()
    }
}

impl Phonemizer {
    /// Load a singer bank from its directory. `root` must hold a
    /// `singer.toml`; rule-file paths inside it resolve against `root`.
    pub fn load(root: &Path, model: Box<dyn DurationModel>) -> Result<Self> {
        let config = SingerConfig::load(&root.join("singer.toml"))?;
        let g2p = TableG2p::load(&config.resolve(root, &config.table_path), &config.symbols)?;
        let questions = QuestionSet::load(&config.resolve(root, &config.question_path))?;
        let stats = config.resolve(root, &config.stats_dir);
        let in_scaler = Scaler::load(&stats.join("duration_in.json"))?;
        let out_scaler = Scaler::load(&stats.join("duration_out.json"))?;
        if in_scaler.width() != questions.width() {
            return Err(Error::ScalerWidth {
                expected: questions.width(),
                got: in_scaler.width(),
            });
        }
        let redirect = RedirectionDict::new(&config.redirections)?;
        info!(
            singer = %root.display(),
            entries = g2p.entry_count(),
            features = questions.width(),
            "singer bank loaded"
        );
        Self::from_parts(config, g2p, questions, in_scaler, out_scaler, redirect, model)
    }

    /// Assemble a phonemizer from already-loaded components.
    ///
    /// The question set must define at least three continuous questions;
    /// the leading three columns carry the pitch conditioning.
    pub fn from_parts(
        config: SingerConfig,
        g2p: TableG2p,
        questions: QuestionSet,
        in_scaler: Scaler,
        out_scaler: Scaler,
        redirect: RedirectionDict,
        model: Box<dyn DurationModel>,
    ) -> Result<Self> {
        if questions.numeric.len() < 3 {
            return Err(Error::InvalidConfig(format!(
                "question set defines {} continuous questions, log-F0 conditioning needs at least 3",
                questions.numeric.len()
            )));
        }
        Ok(Self {
            config,
            g2p,
            questions,
            in_scaler,
            out_scaler,
            redirect,
            model,
            results: HashMap::new(),
        })
    }

    /// Run the pipeline over a part's note groups and fill the result
    /// cache. Groups must be in timeline order; a gap between one
    /// group's end and the next group's start splits the phrase.
    pub fn set_up(&mut self, groups: &[Vec<Note>], axis: &dyn TimeAxis) -> Result<()> {
        let mut phrase: Vec<&[Note]> = Vec::new();
        for group in groups.iter().filter(|g| !g.is_empty()) {
            if let Some(prev) = phrase.last() {
                let end = prev
                    .last()
                    .map(|n| n.end())
                    .unwrap_or(group[0].position);
                if end != group[0].position {
                    self.process_phrase(&phrase, axis)?;
                    phrase.clear();
                }
            }
            phrase.push(group);
        }
        if !phrase.is_empty() {
            self.process_phrase(&phrase, axis)?;
        }
        Ok(())
    }

    /// Fetch the cached timings for one note group.
    pub fn process(&self, group: &[Note]) -> Result<Vec<PhonemeTiming>> {
        let Some(first) = group.first() else {
            return Ok(Vec::new());
        };
        self.results
            .get(&first.position)
            .cloned()
            .ok_or(Error::MissingResult(first.position))
    }

    /// Drop all cached results.
    pub fn clean_up(&mut self) {
        self.results.clear();
    }

    fn process_phrase(&mut self, groups: &[&[Note]], axis: &dyn TimeAxis) -> Result<()> {
        let padding_ms = self.config.padding_ms;
        let start_tick = groups[0][0].position;
        let start_ms = axis.tick_to_ms(start_tick);
        let default_pause = self.config.symbols.default_pause.clone();
        let default_silence = self.config.symbols.default_silence.clone();

        let end_tick = groups
            .last()
            .and_then(|g| g.last())
            .map(|n| n.end())
            .unwrap_or(start_tick);
        let end_ms = axis.tick_to_ms(end_tick);
        let phrase_len_ms = (end_ms - start_ms).round() as i32;

        // Lead-in silence, sized in ticks so its anchor lands padding_ms
        // before the first note.
        let padding_ticks = axis.ticks_between_ms(start_ms - f64::from(padding_ms), start_ms);
        let mut ctx = PhraseContext::new(padding_ms + phrase_len_ms + padding_ms);
        ctx.push_syllable(
            SyllableCtx {
                tone: 0,
                symbols: vec![default_silence.clone()],
                start_ms: 0,
                end_ms: padding_ms,
                position_ticks: start_tick - padding_ticks,
                duration_ticks: padding_ticks,
            },
            &self.config.symbols,
        );

        // One syllable per note; remember where each group's phonemes start.
        let mut group_bounds: Vec<usize> = Vec::with_capacity(groups.len());
        for group in groups {
            group_bounds.push(ctx.phonemes.len());
            for syllable in make_syllables(group, &self.g2p, &default_pause) {
                let note = &syllable.note;
                let rel_start =
                    padding_ms + axis.ms_between_ticks(start_tick, note.position).round() as i32;
                let rel_end =
                    padding_ms + axis.ms_between_ticks(start_tick, note.end()).round() as i32;
                ctx.push_syllable(
                    SyllableCtx {
                        tone: note.tone,
                        symbols: syllable.symbols,
                        start_ms: rel_start,
                        end_ms: rel_end,
                        position_ticks: note.position,
                        duration_ticks: note.duration,
                    },
                    &self.config.symbols,
                );
            }
        }

        let tail_phoneme = ctx.phonemes.len();
        ctx.push_syllable(
            SyllableCtx {
                tone: 0,
                symbols: vec![default_silence],
                start_ms: padding_ms + phrase_len_ms,
                end_ms: padding_ms + phrase_len_ms + padding_ms,
                position_ticks: end_tick,
                duration_ticks: axis.ticks_between_ms(end_ms, end_ms + f64::from(padding_ms)),
            },
            &self.config.symbols,
        );

        // Every sung syllable pins its first vowel (or first phoneme) to
        // its note start; the trailing silence pins the phrase end. The
        // lead-in silence is not anchored, so the run before the first
        // vowel keeps its raw durations, walked backward from that anchor.
        let mut anchors: Vec<Anchor> = Vec::with_capacity(ctx.syllables.len());
        let mut first_phoneme = 0;
        for (i, syllable) in ctx.syllables.iter().enumerate() {
            if i > 0 {
                let vowel = syllable
                    .symbols
                    .iter()
                    .position(|s| self.g2p.is_vowel(s))
                    .unwrap_or(0);
                anchors.push(Anchor::new(
                    first_phoneme + vowel,
                    axis.tick_to_ms(syllable.position_ticks),
                ));
            }
            first_phoneme += syllable.symbols.len();
        }

        let labels = ctx.render_labels();
        let mut features = linguistic_features(&labels, &self.questions);
        apply_log_f0(&mut features, self.questions.pitch_indices());
        self.in_scaler.transform(&mut features)?;
        let output = self.model.infer(&features)?;
        let mut durations = validate_output(output, features.len())?;
        self.out_scaler.inverse_transform_first(&mut durations)?;
        let positions = align_positions(&durations, &anchors);

        let symbols: Vec<String> = ctx.phonemes.iter().map(|p| p.symbol.clone()).collect();
        let redirected = self.redirect.apply(&symbols);

        for (i, group) in groups.iter().enumerate() {
            // Orphan extension groups carry no word of their own.
            if group[0].lyric.starts_with('+') {
                continue;
            }
            let lo = group_bounds[i];
            let hi = group_bounds.get(i + 1).copied().unwrap_or(tail_phoneme);
            let base_ms = axis.tick_to_ms(group[0].position);
            let timings: Vec<PhonemeTiming> = (lo..hi)
                .filter(|k| !redirected[*k].is_empty())
                .map(|k| PhonemeTiming {
                    symbol: redirected[k].clone(),
                    tick_offset: axis.ticks_between_ms(base_ms, positions[k]),
                })
                .collect();
            self.results.insert(group[0].position, timings);
        }
        debug!(
            start_tick,
            phonemes = ctx.phonemes.len(),
            groups = groups.len(),
            "phrase processed"
        );
        Ok(())
    }
}
