use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pt2bms::{
    parse_pt, resolve_metadata, to_bms, to_csv, ChartName, ConvertOptions, KeyMode, SongMetadata,
    YamlSongDb,
};

#[derive(Parser, Debug)]
#[command(name = "pt2bms", version, about = "Convert PT charts to BMS")]
struct Args {
    /// PT file to convert.
    input: PathBuf,

    /// BMS/BME file to write. Existing files are overwritten.
    #[arg(short = 'o', value_name = "BMS")]
    bms_file: Option<PathBuf>,

    /// CSV file to write with every value read from the PT file.
    #[arg(short = 'c', value_name = "CSV")]
    csv_file: Option<PathBuf>,

    /// Treat the chart as 5-key.
    #[arg(short = '5', conflicts_with = "seven_key")]
    five_key: bool,

    /// Treat the chart as 7-key (default).
    #[arg(short = '7')]
    seven_key: bool,

    /// YAML options file.
    #[arg(long, value_name = "YAML")]
    config: Option<PathBuf>,

    /// YAML song database for title, artist, genre and level.
    #[arg(long, value_name = "YAML")]
    db: Option<PathBuf>,

    /// Write every note as a tap note.
    #[arg(long)]
    no_ln: bool,

    /// Directory prefix for #WAV declarations.
    #[arg(long, value_name = "DIR")]
    wav_dir: Option<String>,

    /// Show debug logs.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => ConvertOptions::load(path)
                .with_context(|| format!("reading options from {}", path.display()))?,
            None => ConvertOptions::default(),
        };
        if self.five_key {
            options.mode = KeyMode::Five;
        } else if self.seven_key {
            options.mode = KeyMode::Seven;
        }
        if self.no_ln {
            options.long_notes = false;
        }
        if let Some(dir) = &self.wav_dir {
            options.wav_dir = Some(dir.clone());
        }
        Ok(options)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn lookup_metadata(db_path: &Path, input: &Path, mode: KeyMode) -> Result<SongMetadata> {
    let db = YamlSongDb::load(db_path)?;
    let name = ChartName::from_path(input)?;
    if name.key != format!("{}k", mode.key_count()) {
        warn!(
            key = %name.key,
            mode = ?mode,
            "file name key count differs from the selected layout"
        );
    }
    let metadata = resolve_metadata(&db, &name)
        .with_context(|| format!("looking up {} in {}", name.tag, db_path.display()))?;
    info!(title = %metadata.title, level = metadata.play_level, "found song metadata");
    Ok(metadata)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let options = args.options()?;

    info!(path = %args.input.display(), "Reading PT file");
    let bytes = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let chart = parse_pt(&bytes).with_context(|| format!("parsing {}", args.input.display()))?;
    info!(
        clips = chart.clips.len(),
        tempos = chart.tempos.len(),
        lanes = chart.lanes.len(),
        "Parsed chart"
    );

    if let Some(csv_path) = &args.csv_file {
        let source = args
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        fs::write(csv_path, to_csv(&source, &chart))
            .with_context(|| format!("writing {}", csv_path.display()))?;
        info!(path = %csv_path.display(), "Wrote CSV");
    }

    // Without -o the chart goes to stdout, unless only a CSV was requested
    if args.bms_file.is_none() && args.csv_file.is_some() {
        return Ok(());
    }

    let metadata = match &args.db {
        Some(db_path) => Some(lookup_metadata(db_path, &args.input, options.mode)?),
        None => None,
    };
    let text = to_bms(&chart, &options, metadata)?;

    match &args.bms_file {
        Some(bms_path) => {
            fs::write(bms_path, text)
                .with_context(|| format!("writing {}", bms_path.display()))?;
            info!(path = %bms_path.display(), "Wrote BMS");
        }
        None => print!("{}", text),
    }

    Ok(())
}
