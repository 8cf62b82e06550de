//! Tabular dump of a parsed PT chart for inspection in a spreadsheet.
//!
//! Comma-separated, `\r\n` line endings, fields quoted only when they
//! contain a comma, a quote or a line break.

use crate::pt::PtChart;
use crate::GENERATOR;

/// Render clips, tempo changes and every lane's notes as CSV.
pub fn to_csv(source_name: &str, chart: &PtChart) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();

    rows.push(vec!["Data extracted from:".into(), source_name.into()]);
    rows.push(vec!["Generated by:".into(), GENERATOR.into()]);
    rows.push(Vec::new());

    rows.push(vec!["List of .ogg files:".into()]);
    rows.push(vec!["ID".into(), "filename".into()]);
    for clip in &chart.clips {
        rows.push(vec![format!("{:02X}", clip.id), clip.filename.clone()]);
    }

    rows.push(Vec::new());
    rows.push(vec!["Track:".into(), "0".into(), "BPM changes".into()]);
    rows.push(vec!["Pos".into(), "BPM".into()]);
    for tempo in &chart.tempos {
        rows.push(vec![tempo.position.to_string(), format!("{:?}", tempo.bpm)]);
    }

    for (i, lane) in chart.lanes.iter().enumerate() {
        rows.push(Vec::new());
        rows.push(vec!["Track:".into(), (i + 1).to_string(), lane.name.clone()]);
        rows.push(vec![
            "Pos".into(),
            "ID".into(),
            "Vol".into(),
            "Pan".into(),
            "Length".into(),
        ]);
        for note in &lane.notes {
            rows.push(vec![
                note.position.to_string(),
                format!("{:02X}", note.clip_id),
                note.volume.to_string(),
                note.pan.to_string(),
                note.length.to_string(),
            ]);
        }
    }

    let mut out = String::new();
    for row in &rows {
        let fields: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pt::{AudioClip, Lane, NoteEvent, TempoChange};

    fn sample_chart() -> PtChart {
        PtChart {
            clips: vec![AudioClip {
                id: 0x0b,
                filename: "kick.ogg".to_string(),
            }],
            tempos: vec![
                TempoChange { position: 0, bpm: 120.0 },
                TempoChange { position: 384, bpm: 150.5 },
            ],
            lanes: vec![Lane {
                name: "Drums, left".to_string(),
                notes: vec![NoteEvent {
                    position: 48,
                    clip_id: 0x0b,
                    volume: 127,
                    pan: 64,
                    length: 12,
                }],
            }],
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv("song.pt", &sample_chart());
        let rows: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(rows[0], "Data extracted from:,song.pt");
        assert!(rows[1].starts_with("Generated by:,pt2bms "));
        assert_eq!(rows[2], "");
        assert_eq!(&rows[3..6], &["List of .ogg files:", "ID,filename", "0B,kick.ogg"]);
        assert_eq!(
            &rows[7..11],
            &["Track:,0,BPM changes", "Pos,BPM", "0,120.0", "384,150.5"]
        );
        assert_eq!(
            &rows[12..15],
            &["Track:,1,\"Drums, left\"", "Pos,ID,Vol,Pan,Length", "48,0B,127,64,12"]
        );
        assert!(csv.ends_with("\r\n"));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
