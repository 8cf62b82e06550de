//! # Measure Quantizer
//!
//! Places the events of one measure on the smallest equal subdivision that
//! holds all of them exactly.
//!
//! ## Example
//! Events at 1/4 and 1/3 of a measure need a 12-slot grid; they land on
//! slots 3 and 4:
//! ```text
//! slot   0  1  2  3  4  5  6  7  8  9 10 11
//!        .  .  .  A  B  .  .  .  .  .  .  .
//! ```
//!
//! ## Collisions
//! Two events landing on the same slot overwrite each other in input order:
//! the later one wins. Distinct tick positions never share a slot, so this
//! only happens for events at the same tick.

use crate::time::{lcm_of, MeasurePosition, TICKS_PER_MEASURE};

/// A value to place at a position on the chart grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEvent {
    pub position: MeasurePosition,
    pub value: u8,
}

impl GridEvent {
    pub fn at_ticks(ticks: u32, value: u8) -> Self {
        GridEvent {
            position: MeasurePosition::from_ticks(ticks),
            value,
        }
    }
}

/// One measure of one channel, divided into `slots.len()` equal parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureGrid {
    pub measure: u32,
    pub slots: Vec<Option<u8>>,
}

impl MeasureGrid {
    /// Slot values as consecutive 2-digit uppercase hex; empty slots are `00`.
    pub fn encode(&self) -> String {
        self.slots
            .iter()
            .map(|slot| format!("{:02X}", slot.unwrap_or(0)))
            .collect()
    }
}

/// Quantize the events that fall in `measure`; others are ignored.
///
/// A measure with no events yields a single empty slot.
pub fn quantize_measure(events: &[GridEvent], measure: u32) -> MeasureGrid {
    let in_measure: Vec<&GridEvent> = events
        .iter()
        .filter(|e| e.position.measure == measure)
        .collect();

    // Every denominator divides TICKS_PER_MEASURE, so their lcm always fits
    let subdivision = lcm_of(in_measure.iter().map(|e| e.position.denominator))
        .unwrap_or(TICKS_PER_MEASURE);
    let mut slots = vec![None; subdivision as usize];
    for event in in_measure {
        slots[event.position.slot(subdivision)] = Some(event.value);
    }

    MeasureGrid { measure, slots }
}

/// Highest measure index among `events`.
pub fn last_measure<'a, I>(events: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a GridEvent>,
{
    events.into_iter().map(|e| e.position.measure).max()
}
