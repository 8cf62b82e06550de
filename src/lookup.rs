//! # Song Database Lookup
//!
//! Header metadata (title, genre, artist, play level) does not live in PT
//! files. It comes from a song database keyed by the chart's file name.
//!
//! ## File Name Convention
//! `<tag>_<keys>k_<difficulty>.pt`, e.g. `ladymade_7k_hd.pt`:
//! - `tag` selects the song row
//! - `7k` selects the level row of that song
//! - `hd` selects the rating within the row (`ez`, `nm`, `hd`, `mx`)
//!
//! ## Database File
//! ```yaml
//! songs:
//!   - id: 42
//!     tag: ladymade
//!     title: Lady Made
//!     genre: Electronica
//!     artist: Someone
//!     levels:
//!       7k: [3, 7, 11, 14]
//!       5k: [2, 6, 9]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConvertError;

/// Song row of the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub id: u32,
    pub title: String,
    pub genre: String,
    pub artist: String,
}

/// Numeric ratings of one song under one key layout, easiest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRow {
    pub levels: Vec<u32>,
}

impl LevelRow {
    pub fn level_at(&self, index: usize) -> Option<u32> {
        self.levels.get(index).copied()
    }
}

/// Read-only point queries against a song database.
pub trait SongLookup {
    fn lookup_song(&self, tag: &str) -> Result<SongRecord, ConvertError>;

    fn lookup_level(&self, song_id: u32, key: &str) -> Result<LevelRow, ConvertError>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabase {
    songs: Vec<RawSong>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSong {
    id: u32,
    tag: String,
    title: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    levels: HashMap<String, Vec<u32>>,
}

/// Song database loaded from a YAML file.
#[derive(Debug)]
pub struct YamlSongDb {
    songs: Vec<RawSong>,
}

impl YamlSongDb {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConvertError> {
        let raw: RawDatabase =
            serde_yaml::from_str(content).map_err(|e| ConvertError::Database(e.to_string()))?;
        Ok(Self { songs: raw.songs })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConvertError::Database(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }
}

impl SongLookup for YamlSongDb {
    fn lookup_song(&self, tag: &str) -> Result<SongRecord, ConvertError> {
        self.songs
            .iter()
            .find(|song| song.tag.eq_ignore_ascii_case(tag))
            .map(|song| SongRecord {
                id: song.id,
                title: song.title.clone(),
                genre: song.genre.clone(),
                artist: song.artist.clone(),
            })
            .ok_or_else(|| ConvertError::LookupMiss {
                key: tag.to_string(),
            })
    }

    fn lookup_level(&self, song_id: u32, key: &str) -> Result<LevelRow, ConvertError> {
        self.songs
            .iter()
            .find(|song| song.id == song_id)
            .and_then(|song| song.levels.get(key))
            .map(|levels| LevelRow {
                levels: levels.clone(),
            })
            .ok_or_else(|| ConvertError::LookupMiss {
                key: format!("{}/{}", song_id, key),
            })
    }
}

/// Difficulty suffix of a chart file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Maximum,
}

impl Difficulty {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "ez" => Some(Difficulty::Easy),
            "nm" => Some(Difficulty::Normal),
            "hd" => Some(Difficulty::Hard),
            "mx" => Some(Difficulty::Maximum),
            _ => None,
        }
    }

    /// Position of this difficulty's rating in a [`LevelRow`].
    pub fn level_index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
            Difficulty::Maximum => 3,
        }
    }

    /// Value of the BMS `#DIFFICULTY` header.
    pub fn bms_value(self) -> u8 {
        self.level_index() as u8 + 1
    }
}

/// Database keys derived from a chart file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartName {
    pub tag: String,
    /// Level row key, e.g. `7k`.
    pub key: String,
    pub difficulty: Difficulty,
}

impl ChartName {
    /// Split a file stem such as `ladymade_7k_hd`.
    pub fn parse(stem: &str) -> Result<Self, ConvertError> {
        let miss = || ConvertError::LookupMiss {
            key: stem.to_string(),
        };

        let mut parts = stem.rsplitn(3, '_');
        let suffix = parts.next().ok_or_else(miss)?;
        let key = parts.next().ok_or_else(miss)?.to_ascii_lowercase();
        let tag = parts.next().filter(|t| !t.is_empty()).ok_or_else(miss)?;

        let keys = key.strip_suffix('k').ok_or_else(miss)?;
        if keys.is_empty() || !keys.bytes().all(|b| b.is_ascii_digit()) {
            return Err(miss());
        }
        let difficulty = Difficulty::from_suffix(suffix).ok_or_else(miss)?;

        Ok(ChartName {
            tag: tag.to_string(),
            key,
            difficulty,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConvertError::LookupMiss {
                key: path.display().to_string(),
            })?;
        Self::parse(stem)
    }
}

/// Header metadata for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongMetadata {
    pub title: String,
    pub genre: String,
    pub artist: String,
    pub play_level: u32,
    pub difficulty: Difficulty,
}

/// Look up everything the BMS header needs for `name`.
pub fn resolve_metadata<L>(store: &L, name: &ChartName) -> Result<SongMetadata, ConvertError>
where
    L: SongLookup + ?Sized,
{
    let song = store.lookup_song(&name.tag)?;
    let row = store.lookup_level(song.id, &name.key)?;
    let index = name.difficulty.level_index();
    let play_level = row.level_at(index).ok_or_else(|| ConvertError::LookupMiss {
        key: format!("{}/{}[{}]", song.id, name.key, index),
    })?;

    Ok(SongMetadata {
        title: song.title,
        genre: song.genre,
        artist: song.artist,
        play_level,
        difficulty: name.difficulty,
    })
}
