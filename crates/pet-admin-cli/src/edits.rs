//! Operator edits arriving from flags or request bodies

use pet_admin_core::types::UnknownChoice;
use pet_admin_core::{FormEvent, ImageFile, Navigator, Sex, WeightClass};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Edit input errors
#[derive(Debug, thiserror::Error)]
pub enum EditsError {
    #[error("invalid {field}: {source}")]
    Choice {
        field: &'static str,
        #[source]
        source: UnknownChoice,
    },

    #[error("failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Partial edit; unset fields keep their current value
///
/// An empty `sex` or `weight` clears the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormEdits {
    pub name: Option<String>,
    pub age: Option<String>,
    pub description: Option<String>,
    pub breed: Option<String>,
    #[serde(rename = "type")]
    pub sex: Option<String>,
    pub weight: Option<String>,
    /// Local file; only settable from the command line
    #[serde(skip)]
    pub image: Option<PathBuf>,
}

impl FormEdits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Form events in field order
    ///
    /// # Errors
    /// Unknown sex/weight value or unreadable image file.
    pub fn into_events(self) -> Result<Vec<FormEvent>, EditsError> {
        let mut events = Vec::new();
        if let Some(name) = self.name {
            events.push(FormEvent::Name(name));
        }
        if let Some(age) = self.age {
            events.push(FormEvent::Age(age));
        }
        if let Some(description) = self.description {
            events.push(FormEvent::Description(description));
        }
        if let Some(breed) = self.breed {
            events.push(FormEvent::Breed(breed));
        }
        if let Some(sex) = self.sex {
            let sex = parse_choice::<Sex>(&sex).map_err(|source| EditsError::Choice { field: "type", source })?;
            events.push(FormEvent::Sex(sex));
        }
        if let Some(weight) = self.weight {
            let weight =
                parse_choice::<WeightClass>(&weight).map_err(|source| EditsError::Choice { field: "weight", source })?;
            events.push(FormEvent::Weight(weight));
        }
        if let Some(path) = self.image {
            events.push(FormEvent::PickFiles(vec![read_image(&path)?]));
        }
        Ok(events)
    }
}

fn parse_choice<T>(value: &str) -> Result<Option<T>, UnknownChoice>
where
    T: std::str::FromStr<Err = UnknownChoice>,
{
    if value.trim().is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Load a file into an [`ImageFile`], guessing the content type from its extension
///
/// # Errors
/// `EditsError::Image` if the file cannot be read.
pub fn read_image(path: &Path) -> Result<ImageFile, EditsError> {
    let bytes = std::fs::read(path).map_err(|source| EditsError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| match e.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        });

    let file = ImageFile::new(file_name, bytes);
    Ok(match content_type {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}

/// Navigator for headless sessions; records the move in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(to = path, "navigate");
    }
}
