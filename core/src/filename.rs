use chrono::DateTime;
use chrono::Local;
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::PasteError;

pub const IMAGE_EXTENSION: &str = ".png";

const DEFAULT_NAME_PREFIX: &str = "img_";
const RANDOM_SUFFIX_LEN: usize = 6;

/// How the pre-filled filename in the prompt is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// `img_` followed by six random alphanumeric characters.
    #[default]
    Random,
    /// `img_` followed by the local time down to the second.
    Timestamp,
}

impl NameStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Some(NameStyle::Random),
            "timestamp" => Some(NameStyle::Timestamp),
            _ => None,
        }
    }
}

pub fn generate_default_name(style: NameStyle, now: DateTime<Local>) -> String {
    let stem = match style {
        NameStyle::Random => rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(char::from)
            .collect::<String>(),
        NameStyle::Timestamp => now.format("%Y%m%d_%H%M%S").to_string(),
    };
    format!("{DEFAULT_NAME_PREFIX}{stem}{IMAGE_EXTENSION}")
}

/// Validate what the user typed into the filename prompt.
///
/// Separators are allowed so images can go into sub-folders; parent traversal is not.
pub fn validate_filename(entered: Option<&str>) -> Result<String, PasteError> {
    let Some(entered) = entered else {
        return Err(PasteError::UserCancelled);
    };

    let filename = entered.trim();
    if filename.is_empty() {
        return Err(PasteError::EmptyFilename);
    }

    // `Path::join` replaces the base when handed an absolute path.
    if filename.contains("..") || filename.starts_with(['/', '\\']) {
        return Err(PasteError::UnsafeFilename {
            filename: filename.to_string(),
        });
    }

    if has_image_extension(filename) {
        return Ok(filename.to_string());
    }
    Ok(format!("{filename}{IMAGE_EXTENSION}"))
}

fn has_image_extension(filename: &str) -> bool {
    filename.len() > IMAGE_EXTENSION.len()
        && filename
            .get(filename.len() - IMAGE_EXTENSION.len()..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION))
}
