use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_FILE: &str = "devotional.toml";
const ENV_PREFIX: &str = "DEVOTIONAL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub structure: StructureSettings,
    pub output: OutputSettings,
}

/// Lookahead bounds and quote set used by the entry structurer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StructureSettings {
    /// Lines scanned for an inline reference, counted from the title line.
    pub inline_window: usize,
    /// Lines scanned for a quote line followed by a reference line.
    pub split_window: usize,
    /// Lines of verse kept before a reference found by the whole-span search.
    pub fallback_context: usize,
    /// Characters that open and close a quotation.
    pub quote_chars: String,
}

impl Default for StructureSettings {
    fn default() -> Self {
        StructureSettings {
            inline_window: 12,
            split_window: 12,
            fallback_context: 4,
            quote_chars: "\"".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub grouped: bool,
}

impl Settings {
    /// Defaults, then the TOML file (explicit path, or `devotional.toml` if present),
    /// then `DEVOTIONAL__SECTION__KEY` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut builder = Config::builder();
        builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_FILE).required(false)),
        };
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_bounds() {
        let s = Settings::default();
        assert_eq!(s.structure.inline_window, 12);
        assert_eq!(s.structure.split_window, 12);
        assert_eq!(s.structure.fallback_context, 4);
        assert_eq!(s.structure.quote_chars, "\"");
        assert!(!s.output.grouped);
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[structure]\ninline_window = 10\nquote_chars = \"\\\"'\"\n\n[output]\ngrouped = true\n",
        )
        .unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.structure.inline_window, 10);
        assert_eq!(s.structure.split_window, 12);
        assert_eq!(s.structure.quote_chars, "\"'");
        assert!(s.output.grouped);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
