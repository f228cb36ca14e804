#![allow(clippy::missing_errors_doc)]

use std::{fs, path::Path};

use ledgejump_core::Platform;
use ledgejump_system_collectibles::PlacementTuning;
use serde::Deserialize;
use thiserror::Error;

/// Platform layout handed over by the stage geometry tables.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct StageLayout {
    /// Platforms in any order.
    #[serde(default)]
    pub(crate) platforms: Vec<Platform>,
}

/// Errors raised while loading layout or tuning files.
#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    /// The file could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for the expected shape.
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// A platform has a non-finite coordinate or a negative size.
    #[error("platform #{index} is malformed: {platform:?}")]
    InvalidPlatform { index: usize, platform: Platform },
}

impl StageLayout {
    /// Parses and validates a layout from TOML text.
    pub(crate) fn parse(path: &str, contents: &str) -> Result<Self, LayoutError> {
        let layout: Self = toml::from_str(contents).map_err(|source| LayoutError::Parse {
            path: path.to_owned(),
            source,
        })?;

        for (index, platform) in layout.platforms.iter().enumerate() {
            let finite = [platform.x, platform.y, platform.width, platform.height]
                .iter()
                .all(|value| value.is_finite());
            if !finite || platform.width < 0.0 || platform.height < 0.0 {
                return Err(LayoutError::InvalidPlatform {
                    index,
                    platform: *platform,
                });
            }
        }

        Ok(layout)
    }

    /// Reads and validates a layout file.
    pub(crate) fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = read(path)?;
        Self::parse(&path.display().to_string(), &contents)
    }
}

/// Reads placement tuning overrides. Missing keys keep their defaults.
pub(crate) fn load_tuning(path: &Path) -> Result<PlacementTuning, LayoutError> {
    let contents = read(path)?;
    toml::from_str(&contents).map_err(|source| LayoutError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LayoutError> {
    fs::read_to_string(path).map_err(|source| LayoutError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_tables() {
        let layout = StageLayout::parse(
            "inline",
            r#"
            [[platforms]]
            x = 100.0
            y = 400.0
            width = 200.0
            height = 20.0

            [[platforms]]
            x = 500.0
            y = 380.0
            width = 250.0
            height = 20.0
            "#,
        )
        .expect("layout parses");
        assert_eq!(layout.platforms.len(), 2);
        assert_eq!(layout.platforms[1], Platform::new(500.0, 380.0, 250.0, 20.0));
    }

    #[test]
    fn empty_file_is_an_empty_layout() {
        let layout = StageLayout::parse("inline", "").expect("layout parses");
        assert!(layout.platforms.is_empty());
    }

    #[test]
    fn negative_sizes_are_rejected() {
        let error = StageLayout::parse(
            "inline",
            r#"
            [[platforms]]
            x = 0.0
            y = 0.0
            width = -5.0
            height = 20.0
            "#,
        )
        .expect_err("negative width is rejected");
        assert!(matches!(error, LayoutError::InvalidPlatform { index: 0, .. }));
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let error = StageLayout::parse("stage-7.toml", "[[platforms]\n").expect_err("bad toml");
        assert!(error.to_string().starts_with("could not parse stage-7.toml"));
    }
}
