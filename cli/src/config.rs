use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use md_img_paster_core::NameStyle;
use toml_edit::DocumentMut;
use toml_edit::Item as TomlItem;

const IMAGE_FOLDER_KEY: &str = "image_folder";
const NAME_STYLE_KEY: &str = "name_style";

/// Values read from `config.toml`. `None` means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub image_folder: Option<String>,
    pub name_style: Option<NameStyle>,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn new_default() -> anyhow::Result<Self> {
        let Some(home) = dirs::home_dir() else {
            anyhow::bail!("cannot determine home directory for config path");
        };
        Ok(Self::new(default_config_path(&home)))
    }

    pub fn load(&self) -> anyhow::Result<Settings> {
        let Some(content) = read_document_string(&self.path)? else {
            return Ok(Settings::default());
        };

        let doc = match content.parse::<DocumentMut>() {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(
                    "{} is not valid TOML, reading known keys only: {err}",
                    self.path.display()
                );
                return Ok(parse_settings_fallback(&content));
            }
        };

        Ok(Settings {
            image_folder: read_string(&doc, IMAGE_FOLDER_KEY).filter(|s| !s.trim().is_empty()),
            name_style: read_string(&doc, NAME_STYLE_KEY).and_then(|s| NameStyle::parse(&s)),
        })
    }
}

fn default_config_path(home: &Path) -> PathBuf {
    home.join(".md-img-paster").join("config.toml")
}

fn read_string(doc: &DocumentMut, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(TomlItem::as_value)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn parse_settings_fallback(contents: &str) -> Settings {
    let mut settings = Settings::default();

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            // Only top-level keys are meaningful.
            break;
        }
        let Some(line) = strip_toml_comment(trimmed) else {
            continue;
        };
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Some(value) = unquote(value.trim()) else {
            continue;
        };

        match key.trim() {
            IMAGE_FOLDER_KEY if !value.trim().is_empty() => {
                settings.image_folder = Some(value.to_string());
            }
            NAME_STYLE_KEY => settings.name_style = NameStyle::parse(value),
            _ => {}
        }
    }

    settings
}

fn unquote(value: &str) -> Option<&str> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
}

fn strip_toml_comment(line: &str) -> Option<&str> {
    let line = line.split_once('#').map_or(line, |(head, _)| head).trim();
    if line.is_empty() { None } else { Some(line) }
}

fn read_document_string(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow::Error::new(err).context("read config.toml")),
    }
}
