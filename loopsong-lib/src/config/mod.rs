//! Song description files.
//!
//! A description is a small INI file naming the track and its loop points:
//!
//! ```text
//! song = music/theme.ogg
//! start = 0:12.5
//! end = 1:48
//!
//! [short]
//! end = 0:56
//! ```
//!
//! Named sections hold alternate loop definitions selected at run time.

mod ini;

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::ConfigError;
use crate::timing::parse_duration;

pub use ini::IniDocument;

/// Track and raw loop points, before they are resolved against the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopDefinition {
    pub song: PathBuf,
    /// Loop start in seconds, negative when unset.
    pub start: f64,
    /// Loop end in seconds, negative when unset.
    pub end: f64,
}

impl LoopDefinition {
    /// Read a loop definition from a song description file.
    ///
    /// # Arguments
    ///
    /// * `path` - Description file.
    /// * `section` - Optional named section whose keys override the global ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the section does not
    /// exist, or no song is named.
    pub fn load(path: &Path, section: Option<&str>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = IniDocument::parse(&text);
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_document(&document, section, base_dir)
    }

    /// Build a loop definition from an already parsed document.
    ///
    /// Relative song paths are resolved against `base_dir` when the
    /// resolved file exists.
    pub fn from_document(
        document: &IniDocument,
        section: Option<&str>,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(name) = section {
            if !document.has_section(name) {
                return Err(ConfigError::MissingSection(name.to_string()));
            }
        }

        let lookup = |key: &str| {
            section
                .and_then(|name| document.get(Some(name), key))
                .or_else(|| document.get(None, key))
        };

        let song = match lookup("song") {
            Some(song) if !song.is_empty() => song,
            _ => return Err(ConfigError::MissingSong),
        };

        let definition = Self {
            song: resolve_song(song, base_dir),
            start: parse_duration(lookup("start")),
            end: parse_duration(lookup("end")),
        };
        debug!("loop definition: {:?}", definition);
        Ok(definition)
    }
}

fn resolve_song(song: &str, base_dir: &Path) -> PathBuf {
    let song = PathBuf::from(song);
    if song.is_absolute() {
        return song;
    }
    let relative = base_dir.join(&song);
    if relative.exists() {
        relative
    } else {
        song
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const DESCRIPTION: &str = "\
# theme loop
song = theme.ogg
start = 0:12.5
end = 1:48

[short]
end = 0:56

[other]
song = other.ogg
";

    fn document() -> IniDocument {
        IniDocument::parse(DESCRIPTION)
    }

    #[test]
    fn reads_global_definition() {
        let definition =
            LoopDefinition::from_document(&document(), None, Path::new("")).expect("definition");
        assert_eq!(definition.song, PathBuf::from("theme.ogg"));
        assert_eq!(definition.start, 12.5);
        assert_eq!(definition.end, 108.0);
    }

    #[test]
    fn section_overrides_only_its_keys() {
        let short = LoopDefinition::from_document(&document(), Some("short"), Path::new(""))
            .expect("definition");
        assert_eq!(short.song, PathBuf::from("theme.ogg"));
        assert_eq!(short.start, 12.5);
        assert_eq!(short.end, 56.0);

        let other = LoopDefinition::from_document(&document(), Some("other"), Path::new(""))
            .expect("definition");
        assert_eq!(other.song, PathBuf::from("other.ogg"));
        assert_eq!(other.end, 108.0);
    }

    #[test]
    fn missing_loop_points_are_unset() {
        let document = IniDocument::parse("song = a.ogg\n");
        let definition =
            LoopDefinition::from_document(&document, None, Path::new("")).expect("definition");
        assert_eq!(definition.start, -1.0);
        assert_eq!(definition.end, -1.0);
    }

    #[test]
    fn missing_or_empty_song_is_an_error() {
        let missing = IniDocument::parse("start = 3\n");
        assert!(matches!(
            LoopDefinition::from_document(&missing, None, Path::new("")),
            Err(ConfigError::MissingSong)
        ));

        let empty = IniDocument::parse("song =\n");
        assert!(matches!(
            LoopDefinition::from_document(&empty, None, Path::new("")),
            Err(ConfigError::MissingSong)
        ));
    }

    #[test]
    fn unknown_section_is_an_error() {
        let result = LoopDefinition::from_document(&document(), Some("long"), Path::new(""));
        assert!(matches!(result, Err(ConfigError::MissingSection(name)) if name == "long"));
    }

    #[test]
    fn load_resolves_song_next_to_description() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("theme.ogg"), b"").expect("song");
        let description = dir.path().join("theme.ini");
        let mut file = std::fs::File::create(&description).expect("description");
        file.write_all(DESCRIPTION.as_bytes()).expect("write");

        let definition = LoopDefinition::load(&description, None).expect("definition");
        assert_eq!(definition.song, dir.path().join("theme.ogg"));
    }

    #[test]
    fn unresolved_relative_song_is_kept_as_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let description = dir.path().join("theme.ini");
        std::fs::write(&description, "song = elsewhere/theme.ogg\n").expect("write");

        let definition = LoopDefinition::load(&description, None).expect("definition");
        assert_eq!(definition.song, PathBuf::from("elsewhere/theme.ogg"));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = LoopDefinition::load(Path::new("/nonexistent/loopsong.ini"), None);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
