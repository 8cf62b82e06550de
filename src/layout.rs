//! # Lane Layout
//!
//! Decides which BMS channel each PT lane is written to and splits its notes
//! into tap notes and long notes.
//!
//! ## Channel Tables
//! ```text
//! lane index     2   3   4   5   6   9   10
//! 7-key short   12  13  14  15  18  11   19
//! 7-key long    52  53  54  55  58  51   59
//! 5-key short   11  12  13  14  15   -    -
//! 5-key long    51  52  53  54  55   -    -
//! ```
//! Every other lane is background audio on channel `01`, where notes are
//! never split into long notes.
//!
//! ## Long Notes
//! A note on a playable lane is long when its length exceeds
//! [`LONG_NOTE_THRESHOLD`] ticks. It becomes a start event at its position
//! and an end event at `position + length`, both carrying its clip id, on
//! the lane's long-note channel.

use std::fmt;

use serde::Deserialize;

use crate::pt::Lane;
use crate::quantize::{last_measure, GridEvent};

/// Notes up to this many ticks long are tap notes.
pub const LONG_NOTE_THRESHOLD: u16 = 6;

/// Number of playable keys the chart is laid out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Five,
    #[default]
    Seven,
}

/// `(lane index, short-note channel, long-note channel)`
const SEVEN_KEY_CHANNELS: &[(usize, u8, u8)] = &[
    (2, 12, 52),
    (3, 13, 53),
    (4, 14, 54),
    (5, 15, 55),
    (6, 18, 58),
    (9, 11, 51),
    (10, 19, 59),
];

const FIVE_KEY_CHANNELS: &[(usize, u8, u8)] = &[
    (2, 11, 51),
    (3, 12, 52),
    (4, 13, 53),
    (5, 14, 54),
    (6, 15, 55),
];

/// A BMS channel number, written as two decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(pub u8);

impl Channel {
    pub const BACKGROUND: Channel = Channel(1);
    pub const BPM_CHANGE: Channel = Channel(8);
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// What a lane index is used for under a key mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneRole {
    Playable { short: Channel, long: Channel },
    Background,
}

impl KeyMode {
    fn channel_table(self) -> &'static [(usize, u8, u8)] {
        match self {
            KeyMode::Five => FIVE_KEY_CHANNELS,
            KeyMode::Seven => SEVEN_KEY_CHANNELS,
        }
    }

    pub fn role(self, lane_index: usize) -> LaneRole {
        self.channel_table()
            .iter()
            .find(|(index, _, _)| *index == lane_index)
            .map_or(LaneRole::Background, |&(_, short, long)| LaneRole::Playable {
                short: Channel(short),
                long: Channel(long),
            })
    }

    /// Key count used in song database keys and file names (`5k`, `7k`).
    pub fn key_count(self) -> u8 {
        match self {
            KeyMode::Five => 5,
            KeyMode::Seven => 7,
        }
    }
}

/// Grid events of one PT lane, ready for quantization.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneTracks {
    pub lane_index: usize,
    pub name: String,
    pub short_channel: Channel,
    pub short: Vec<GridEvent>,
    /// `None` for background lanes.
    pub long_channel: Option<Channel>,
    /// Start/end pairs, start first.
    pub long: Vec<GridEvent>,
}

impl LaneTracks {
    fn is_empty(&self) -> bool {
        self.short.is_empty() && self.long.is_empty()
    }

    fn last_measure(&self) -> Option<u32> {
        last_measure(self.short.iter().chain(&self.long))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneLayout {
    /// Non-empty lanes in PT lane order.
    pub lanes: Vec<LaneTracks>,
    /// Every lane writes one grid line per measure in `0..=max_measure`.
    pub max_measure: u32,
}

/// Map every PT lane onto its channels. Lanes without notes are dropped.
///
/// With `long_notes` off, every note of a playable lane is a tap note.
pub fn arrange_lanes(lanes: &[Lane], mode: KeyMode, long_notes: bool) -> LaneLayout {
    let arranged: Vec<LaneTracks> = lanes
        .iter()
        .enumerate()
        .map(|(index, lane)| arrange_lane(index, lane, mode.role(index), long_notes))
        .filter(|tracks| !tracks.is_empty())
        .collect();

    let max_measure = arranged
        .iter()
        .filter_map(LaneTracks::last_measure)
        .max()
        .unwrap_or(0);

    LaneLayout {
        lanes: arranged,
        max_measure,
    }
}

fn arrange_lane(index: usize, lane: &Lane, role: LaneRole, long_notes: bool) -> LaneTracks {
    let mut short = Vec::new();
    let mut long = Vec::new();

    let (short_channel, long_channel) = match role {
        LaneRole::Playable { short, long } if long_notes => (short, Some(long)),
        LaneRole::Playable { short, .. } => (short, None),
        LaneRole::Background => (Channel::BACKGROUND, None),
    };

    for note in &lane.notes {
        if long_channel.is_some() && note.length > LONG_NOTE_THRESHOLD {
            long.push(GridEvent::at_ticks(note.position, note.clip_id));
            long.push(GridEvent::at_ticks(note.end_position(), note.clip_id));
        } else {
            short.push(GridEvent::at_ticks(note.position, note.clip_id));
        }
    }

    LaneTracks {
        lane_index: index,
        name: lane.name.clone(),
        short_channel,
        short,
        long_channel,
        long,
    }
}
