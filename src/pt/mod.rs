//! # PT Chart Reader
//!
//! Parses the binary PT chart format into a [`PtChart`].
//!
//! ## Layout
//! ```text
//! 0x00  "PTFF" + file header                       (0x18 bytes)
//! 0x18  clip records                               (0x42 bytes each)
//!       ── until "EZTR" ──
//!       tempo track header                         (0x4e bytes, starts with "EZTR")
//!       tempo records                              (0x0b bytes each)
//!       ── until "EZTR" ──
//!       lane header                                (0x4e bytes, name at +6)
//!       note records                               (0x0b bytes each)
//!       ── until "EZTR" or end of file, repeated per lane ──
//! ```
//!
//! No section stores a count. Each run of records ends at the first record
//! boundary that holds the `EZTR` marker. The clip and tempo runs must be
//! terminated by the marker; the last lane may run to the end of the file.
//!
//! ## Kept records
//! - Tempo records of kind 3. A record at position 0 sets the base tempo
//!   instead of adding a change.
//! - Note records of kind 1.

mod reader;
pub mod record;

use tracing::{debug, warn};

use crate::error::{ConvertError, Section};
use reader::RecordReader;
use record::{
    nul_terminated, ClipRecord, NoteRecord, TempoRecord, TrackHeader, FILE_HEADER_LEN,
    MAGIC, NOTE_KIND, TEMPO_KIND,
};

/// Base tempo used when a chart carries no position-0 tempo record.
pub const DEFAULT_BPM: f32 = 130.0;

/// An external audio file referenced by notes.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub id: u8,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoChange {
    pub position: u32,
    pub bpm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub position: u32,
    pub clip_id: u8,
    pub volume: u8,
    pub pan: u8,
    pub length: u16,
}

impl NoteEvent {
    /// Tick position where a sustained note ends.
    pub fn end_position(&self) -> u32 {
        self.position + u32::from(self.length)
    }
}

/// One column of note data. Its index in [`PtChart::lanes`] decides the output channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub name: String,
    pub notes: Vec<NoteEvent>,
}

/// Everything extracted from one PT file.
#[derive(Debug, Clone, PartialEq)]
pub struct PtChart {
    pub clips: Vec<AudioClip>,
    /// Stream order. The first entry is always the base tempo at position 0.
    pub tempos: Vec<TempoChange>,
    pub lanes: Vec<Lane>,
}

impl PtChart {
    pub fn base_bpm(&self) -> f32 {
        self.tempos.first().map_or(DEFAULT_BPM, |t| t.bpm)
    }
}

/// Parse a complete PT file held in memory.
pub fn parse_pt(bytes: &[u8]) -> Result<PtChart, ConvertError> {
    if !bytes.starts_with(MAGIC) {
        return Err(ConvertError::format(Section::Header, 0, "missing PTFF magic"));
    }
    if bytes.len() < FILE_HEADER_LEN {
        return Err(ConvertError::format(
            Section::Header,
            bytes.len(),
            format!("file header truncated ({} of {} bytes)", bytes.len(), FILE_HEADER_LEN),
        ));
    }

    let mut reader = RecordReader::new(bytes, FILE_HEADER_LEN);
    let clips = read_clips(&mut reader)?;
    let tempos = read_tempos(&mut reader)?;

    let mut lanes = Vec::new();
    while !reader.at_end() {
        let lane = read_lane(&mut reader, lanes.len())?;
        lanes.push(lane);
    }
    debug!(lanes = lanes.len(), "parsed lane sections");

    Ok(PtChart {
        clips,
        tempos,
        lanes,
    })
}

fn read_clips(reader: &mut RecordReader<'_>) -> Result<Vec<AudioClip>, ConvertError> {
    let mut clips = Vec::new();
    while !reader.at_sentinel() {
        expect_more(reader, Section::Clips)?;
        let at = reader.offset();
        let record: ClipRecord = reader.read(Section::Clips)?;
        clips.push(AudioClip {
            id: record.id,
            filename: decode_text(&record.filename, Section::Clips, at + 2)?,
        });
    }
    debug!(clips = clips.len(), offset = reader.offset(), "parsed clip section");
    Ok(clips)
}

fn read_tempos(reader: &mut RecordReader<'_>) -> Result<Vec<TempoChange>, ConvertError> {
    let _header: TrackHeader = reader.read(Section::Tempo)?;

    let mut base = None;
    let mut changes = Vec::new();
    while !reader.at_sentinel() {
        expect_more(reader, Section::Tempo)?;
        let record: TempoRecord = reader.read(Section::Tempo)?;
        if record.kind != TEMPO_KIND {
            continue;
        }
        if record.position == 0 {
            base = Some(record.bpm);
        } else {
            changes.push(TempoChange {
                position: u32::from(record.position),
                bpm: record.bpm,
            });
        }
    }

    let base_bpm = base.unwrap_or_else(|| {
        warn!("no tempo record at position 0, assuming {} BPM", DEFAULT_BPM);
        DEFAULT_BPM
    });
    let mut tempos = Vec::with_capacity(changes.len() + 1);
    tempos.push(TempoChange {
        position: 0,
        bpm: base_bpm,
    });
    tempos.extend(changes);
    debug!(
        tempo_changes = tempos.len() - 1,
        base_bpm = f64::from(base_bpm),
        offset = reader.offset(),
        "parsed tempo section"
    );
    Ok(tempos)
}

fn read_lane(reader: &mut RecordReader<'_>, index: usize) -> Result<Lane, ConvertError> {
    let section = Section::Lane(index);
    let at = reader.offset();
    let header: TrackHeader = reader.read(section)?;
    let name = decode_text(&header.name, section, at + 6)?;

    let mut notes = Vec::new();
    while !reader.at_end() && !reader.at_sentinel() {
        let record: NoteRecord = reader.read(section)?;
        if record.kind == NOTE_KIND {
            notes.push(NoteEvent {
                position: u32::from(record.position),
                clip_id: record.clip_id,
                volume: record.volume,
                pan: record.pan,
                length: record.length,
            });
        }
    }
    debug!(lane = index, name = %name, notes = notes.len(), "parsed lane");
    Ok(Lane { name, notes })
}

/// The clip and tempo runs must be closed by a marker before end of file.
fn expect_more(reader: &RecordReader<'_>, section: Section) -> Result<(), ConvertError> {
    if reader.at_end() {
        return Err(ConvertError::format(
            section,
            reader.offset(),
            "section is not terminated by an EZTR marker",
        ));
    }
    Ok(())
}

fn decode_text(field: &[u8], section: Section, offset: usize) -> Result<String, ConvertError> {
    std::str::from_utf8(nul_terminated(field))
        .map(str::to_owned)
        .map_err(|e| ConvertError::format(section, offset, format!("text field is not valid UTF-8: {}", e)))
}
