//! Core types for the pet record
//!
//! Defines:
//! - Record identity and the persisted record shape
//! - The two fixed enums (sex, weight class) with their wire strings
//! - Image values on the form side and file handles
//! - Selector options

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Record identifier, immutable once assigned
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sex of the animal (`type` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "Fêmea")]
    Female,
    #[serde(rename = "Macho")]
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Wire/display value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "Fêmea",
            Sex::Male => "Macho",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fêmea" | "femea" | "female" | "f" => Ok(Sex::Female),
            "macho" | "male" | "m" => Ok(Sex::Male),
            _ => Err(UnknownChoice(s.to_string())),
        }
    }
}

/// Size/weight class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightClass {
    #[serde(rename = "Pequeno")]
    Small,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Grande")]
    Large,
}

impl WeightClass {
    pub const ALL: [WeightClass; 3] = [WeightClass::Small, WeightClass::Medium, WeightClass::Large];

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightClass::Small => "Pequeno",
            WeightClass::Medium => "Médio",
            WeightClass::Large => "Grande",
        }
    }
}

impl std::fmt::Display for WeightClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightClass {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pequeno" | "small" => Ok(WeightClass::Small),
            "médio" | "medio" | "medium" => Ok(WeightClass::Medium),
            "grande" | "large" => Ok(WeightClass::Large),
            _ => Err(UnknownChoice(s.to_string())),
        }
    }
}

/// Value that is not one of the fixed choices
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown choice: {0}")]
pub struct UnknownChoice(pub String);

/// Persisted pet record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    #[serde(deserialize_with = "deserialize_age")]
    pub age: u32,
    pub description: String,
    pub breed: String,
    #[serde(rename = "type")]
    pub sex: Sex,
    pub weight: WeightClass,
    /// Stored image reference
    pub image: String,
}

/// `GET /api/pet/{id}` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEnvelope {
    pub body: Record,
}

/// Age arrives as a number, or as a numeric string once it has been through a multipart update
fn deserialize_age<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Number(u32),
        Text(String),
    }

    match Age::deserialize(deserializer)? {
        Age::Number(n) => Ok(n),
        Age::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Binary file chosen for upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    #[inline]
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Image value held by the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageField {
    /// Nothing loaded yet
    #[default]
    Empty,
    /// Reference loaded from the record
    Stored(String),
    /// File picker selection (may be empty)
    Picked(Vec<ImageFile>),
    /// Single handle set programmatically
    File(ImageFile),
}

impl ImageField {
    /// Whether this value carries a new file
    #[inline]
    #[must_use]
    pub fn has_new_file(&self) -> bool {
        match self {
            ImageField::Picked(files) => !files.is_empty(),
            ImageField::File(_) => true,
            ImageField::Empty | ImageField::Stored(_) => false,
        }
    }
}

/// Entry of a fixed-choice selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Placeholder shown before a breed is chosen
pub const BREED_PLACEHOLDER: &str = "Selecione uma raça";
/// Placeholder shown before a sex is chosen
pub const SEX_PLACEHOLDER: &str = "Selecione o sexo";
/// Placeholder shown before a weight class is chosen
pub const WEIGHT_PLACEHOLDER: &str = "Selecione o porte";

/// Choices for the sex selector
#[must_use]
pub fn sex_choices() -> Vec<SelectOption> {
    Sex::ALL
        .iter()
        .map(|s| SelectOption {
            value: s.as_str(),
            label: s.as_str(),
        })
        .collect()
}

/// Choices for the weight-class selector
#[must_use]
pub fn weight_choices() -> Vec<SelectOption> {
    WeightClass::ALL
        .iter()
        .map(|w| SelectOption {
            value: w.as_str(),
            label: w.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_from_envelope() {
        let json = r#"{"body":{"id":"5","name":"Rex","age":3,"description":"calmo",
            "breed":"hound/afghan","type":"Macho","weight":"Médio","image":"dog.jpg"}}"#;
        let envelope: RecordEnvelope = serde_json::from_str(json).unwrap();
        let record = envelope.body;

        assert_eq!(record.id, RecordId::new("5"));
        assert_eq!(record.age, 3);
        assert_eq!(record.sex, Sex::Male);
        assert_eq!(record.weight, WeightClass::Medium);
        assert_eq!(record.image, "dog.jpg");
    }

    #[test]
    fn record_accepts_string_age() {
        let json = r#"{"id":"5","name":"Rex","age":"7","description":"",
            "breed":"pug","type":"Fêmea","weight":"Pequeno","image":"a.png"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.age, 7);
    }

    #[test]
    fn record_rejects_negative_age() {
        let json = r#"{"id":"5","name":"Rex","age":-1,"description":"",
            "breed":"pug","type":"Fêmea","weight":"Pequeno","image":"a.png"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn sex_parses_wire_and_aliases() {
        assert_eq!("Fêmea".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn weight_parses_wire_and_aliases() {
        assert_eq!("Médio".parse::<WeightClass>().unwrap(), WeightClass::Medium);
        assert_eq!("medio".parse::<WeightClass>().unwrap(), WeightClass::Medium);
        assert_eq!("LARGE".parse::<WeightClass>().unwrap(), WeightClass::Large);
        assert_eq!("small".parse::<WeightClass>().unwrap(), WeightClass::Small);
        assert!("huge".parse::<WeightClass>().is_err());
    }

    #[test]
    fn image_field_new_file() {
        assert!(!ImageField::Stored("dog.jpg".into()).has_new_file());
        assert!(!ImageField::Picked(vec![]).has_new_file());
        assert!(ImageField::File(ImageFile::new("a.png", vec![1])).has_new_file());
    }

    #[test]
    fn choices_cover_all_values() {
        assert_eq!(sex_choices().len(), 2);
        assert_eq!(weight_choices()[1].value, "Médio");
    }
}
