//! # BMS Chart Emitter
//!
//! Builds the BMS representation of a parsed PT chart and writes it as text.
//!
//! ## Output Order
//! ```text
//! #GENERATOR <name> <version>
//! #PLAYER 1
//! #GENRE / #TITLE / #ARTIST          (with metadata)
//! #BPM <base>
//! #PLAYLEVEL / #DIFFICULTY           (with metadata)
//! #LNTYPE 1                          (with long notes)
//! #WAVxx <file>                      per clip
//! #BPMxx <bpm>                       per distinct BPM, ascending
//! #mmm08:...                         per measure holding a tempo event
//! #mmmCC:...                         per lane, every measure 0..=max
//! #mmmLL:...                         per lane with long notes, every measure 0..=max
//! ```
//!
//! Grid lines are `#`, a 3-digit measure, a 2-digit channel, `:` and the
//! measure's slots as 2-digit hex values, `00` for an empty slot.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::layout::{arrange_lanes, Channel};
use crate::lookup::SongMetadata;
use crate::pt::PtChart;
use crate::GENERATOR;
use crate::quantize::{quantize_measure, GridEvent, MeasureGrid};

#[derive(Debug, Clone, PartialEq)]
pub struct BmsHeader {
    pub base_bpm: f32,
    pub metadata: Option<SongMetadata>,
    pub long_notes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavDef {
    pub id: u8,
    pub path: String,
}

/// Entry of the `#BPMxx` table referenced by channel 08.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmDef {
    pub id: u8,
    pub bpm: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLine {
    pub channel: Channel,
    pub grid: MeasureGrid,
}

impl ChannelLine {
    pub fn to_text(&self) -> String {
        format!("#{:03}{}:{}", self.grid.measure, self.channel, self.grid.encode())
    }
}

/// A complete BMS chart, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct BmsChart {
    pub header: BmsHeader,
    pub wavs: Vec<WavDef>,
    pub bpms: Vec<BpmDef>,
    pub lines: Vec<ChannelLine>,
}

impl BmsChart {
    pub fn build(
        chart: &PtChart,
        options: &ConvertOptions,
        metadata: Option<SongMetadata>,
    ) -> Result<Self, ConvertError> {
        let header = BmsHeader {
            base_bpm: chart.base_bpm(),
            metadata,
            long_notes: options.long_notes,
        };

        let wavs = chart
            .clips
            .iter()
            .map(|clip| WavDef {
                id: clip.id,
                path: options.wav_path(&clip.filename),
            })
            .collect();

        let bpms = bpm_palette(chart)?;
        let mut lines = tempo_lines(chart, &bpms);

        let layout = arrange_lanes(&chart.lanes, options.mode, options.long_notes);
        for lane in &layout.lanes {
            lines.extend(measure_lines(&lane.short, lane.short_channel, layout.max_measure));
            match lane.long_channel {
                Some(channel) if !lane.long.is_empty() => {
                    lines.extend(measure_lines(&lane.long, channel, layout.max_measure));
                }
                _ => {}
            }
        }
        debug!(
            lanes = layout.lanes.len(),
            max_measure = layout.max_measure,
            lines = lines.len(),
            "built BMS chart"
        );

        Ok(BmsChart {
            header,
            wavs,
            bpms,
            lines,
        })
    }

    /// Serialize to BMS text, one command per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("#GENERATOR {}\n", GENERATOR));
        out.push_str("#PLAYER 1\n");
        if let Some(meta) = &self.header.metadata {
            out.push_str(&format!("#GENRE {}\n", meta.genre));
            out.push_str(&format!("#TITLE {}\n", meta.title));
            out.push_str(&format!("#ARTIST {}\n", meta.artist));
        }
        out.push_str(&format!("#BPM {}\n", format_bpm(self.header.base_bpm)));
        if let Some(meta) = &self.header.metadata {
            out.push_str(&format!("#PLAYLEVEL {}\n", meta.play_level));
            out.push_str(&format!("#DIFFICULTY {}\n", meta.difficulty.bms_value()));
        }
        if self.header.long_notes {
            out.push_str("#LNTYPE 1\n");
        }

        for wav in &self.wavs {
            out.push_str(&format!("#WAV{:02X} {}\n", wav.id, wav.path));
        }
        for def in &self.bpms {
            out.push_str(&format!("#BPM{:02X} {}\n", def.id, format_bpm(def.bpm)));
        }
        for line in &self.lines {
            out.push_str(&line.to_text());
            out.push('\n');
        }

        out
    }
}

/// Shortest decimal form that reads back as the same value, e.g. `120.0`.
pub fn format_bpm(bpm: f32) -> String {
    format!("{:?}", bpm)
}

/// Distinct BPM values in ascending order, numbered from 1.
fn bpm_palette(chart: &PtChart) -> Result<Vec<BpmDef>, ConvertError> {
    let mut values: Vec<f32> = chart.tempos.iter().map(|t| t.bpm).collect();
    values.sort_by(f32::total_cmp);
    values.dedup_by(|a, b| a.to_bits() == b.to_bits());

    if values.len() > usize::from(u8::MAX) {
        return Err(ConvertError::PaletteOverflow {
            count: values.len(),
        });
    }
    Ok(values
        .into_iter()
        .zip(1..=u8::MAX)
        .map(|(bpm, id)| BpmDef { id, bpm })
        .collect())
}

fn palette_id(bpms: &[BpmDef], bpm: f32) -> u8 {
    bpms.iter()
        .find(|def| def.bpm.to_bits() == bpm.to_bits())
        .map_or(0, |def| def.id)
}

/// Channel 08 lines, only for measures that hold a tempo event.
fn tempo_lines(chart: &PtChart, bpms: &[BpmDef]) -> Vec<ChannelLine> {
    let mut tempos = chart.tempos.clone();
    tempos.sort_by_key(|t| t.position);

    let events: Vec<GridEvent> = tempos
        .iter()
        .map(|t| GridEvent::at_ticks(t.position, palette_id(bpms, t.bpm)))
        .collect();
    let measures: BTreeSet<u32> = events.iter().map(|e| e.position.measure).collect();

    measures
        .into_iter()
        .map(|measure| ChannelLine {
            channel: Channel::BPM_CHANGE,
            grid: quantize_measure(&events, measure),
        })
        .collect()
}

fn measure_lines(events: &[GridEvent], channel: Channel, max_measure: u32) -> Vec<ChannelLine> {
    (0..=max_measure)
        .map(|measure| ChannelLine {
            channel,
            grid: quantize_measure(events, measure),
        })
        .collect()
}
