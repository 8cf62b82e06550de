pub mod bms;
pub mod config;
pub mod error;
pub mod layout;
pub mod lookup;
pub mod pt;
pub mod quantize;
pub mod table;
pub mod time;

#[cfg(test)]
mod test_utils;

/// Tool name and version written into every generated file.
pub const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

pub use bms::BmsChart;
pub use config::ConvertOptions;
pub use error::*;
pub use layout::KeyMode;
pub use lookup::{resolve_metadata, ChartName, SongLookup, SongMetadata, YamlSongDb};
pub use pt::{parse_pt, PtChart};
pub use table::to_csv;

/// Convert a PT file held in memory to BMS text.
/// This is the main entry point for the library.
pub fn convert(
    bytes: &[u8],
    options: &ConvertOptions,
    metadata: Option<SongMetadata>,
) -> Result<String, ConvertError> {
    let chart = parse_pt(bytes)?;
    to_bms(&chart, options, metadata)
}

/// Emit BMS text for an already parsed chart.
pub fn to_bms(
    chart: &PtChart,
    options: &ConvertOptions,
    metadata: Option<SongMetadata>,
) -> Result<String, ConvertError> {
    Ok(BmsChart::build(chart, options, metadata)?.to_text())
}
