//! Editable form state and field validation
//!
//! The form holds a working copy of the record's editable fields. Text
//! inputs stay as strings until validation so that half-typed values (an
//! empty age, say) are representable. Validation turns them into typed
//! fields or a set of field-level errors.

use crate::types::{ImageField, ImageFile, Record, Sex, WeightClass};
use std::collections::BTreeMap;

/// Maximum description length, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 255;

/// Working copy of the editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub age: String,
    pub description: String,
    pub breed: String,
    pub sex: Option<Sex>,
    pub weight: Option<WeightClass>,
    pub image: ImageField,
}

impl FormValues {
    /// Defaults taken from a loaded record
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age.to_string(),
            description: record.description.clone(),
            breed: record.breed.clone(),
            sex: Some(record.sex),
            weight: Some(record.weight),
            image: ImageField::Stored(record.image.clone()),
        }
    }
}

/// Operator input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Name(String),
    Age(String),
    Description(String),
    Breed(String),
    Sex(Option<Sex>),
    Weight(Option<WeightClass>),
    /// File picker selection
    PickFiles(Vec<ImageFile>),
    /// Single file handle set directly
    SetImage(ImageFile),
}

impl FormEvent {
    /// Field this event edits
    #[inline]
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            FormEvent::Name(_) => Field::Name,
            FormEvent::Age(_) => Field::Age,
            FormEvent::Description(_) => Field::Description,
            FormEvent::Breed(_) => Field::Breed,
            FormEvent::Sex(_) => Field::Sex,
            FormEvent::Weight(_) => Field::Weight,
            FormEvent::PickFiles(_) | FormEvent::SetImage(_) => Field::Image,
        }
    }
}

/// Form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Age,
    Description,
    Breed,
    Sex,
    Weight,
    Image,
}

impl Field {
    /// Multipart/wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::Description => "description",
            Field::Breed => "breed",
            Field::Sex => "type",
            Field::Weight => "weight",
            Field::Image => "image",
        }
    }

    /// Operator-facing label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Nome",
            Field::Age => "Idade",
            Field::Description => "Descrição",
            Field::Breed => "Raça",
            Field::Sex => "Sexo",
            Field::Weight => "Porte",
            Field::Image => "Imagem",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("required")]
    Required,

    #[error("too long: {actual} > {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("not a non-negative integer")]
    InvalidNumber,
}

impl FieldError {
    /// Message shown next to the field
    #[must_use]
    pub fn message(&self, field: Field) -> String {
        match self {
            FieldError::Required => format!("{} é obrigatório", field.label()),
            FieldError::TooLong { max, .. } => {
                format!("{} deve ter no máximo {max} caracteres", field.label())
            }
            FieldError::InvalidNumber => {
                format!("{} deve ser um número inteiro não negativo", field.label())
            }
        }
    }
}

/// Errors keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    #[inline]
    #[must_use]
    pub fn single(field: Field, error: FieldError) -> Self {
        let mut errors = Self::default();
        errors.insert(field, error);
        errors
    }

    #[inline]
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    #[inline]
    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    #[inline]
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }

    /// Operator-facing messages in field order
    #[must_use]
    pub fn messages(&self) -> Vec<(Field, String)> {
        self.iter().map(|(f, e)| (f, e.message(f))).collect()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

/// Typed values that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub name: String,
    pub age: u32,
    pub description: String,
    pub breed: String,
    pub sex: Sex,
    pub weight: WeightClass,
}

fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(value)
}

/// Validate the required fields and the description length
///
/// The image is not checked here; it is resolved by the submission builder.
///
/// # Errors
/// Returns every failing field, not just the first.
pub fn validate(values: &FormValues) -> Result<ValidatedFields, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = required(&values.name);
    if name.is_none() {
        errors.insert(Field::Name, FieldError::Required);
    }

    let age = match required(&values.age) {
        None => {
            errors.insert(Field::Age, FieldError::Required);
            None
        }
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(age) => Some(age),
            Err(_) => {
                errors.insert(Field::Age, FieldError::InvalidNumber);
                None
            }
        },
    };

    let description = match required(&values.description) {
        None => {
            errors.insert(Field::Description, FieldError::Required);
            None
        }
        Some(text) => {
            let actual = text.chars().count();
            if actual > MAX_DESCRIPTION_CHARS {
                errors.insert(
                    Field::Description,
                    FieldError::TooLong {
                        max: MAX_DESCRIPTION_CHARS,
                        actual,
                    },
                );
                None
            } else {
                Some(text)
            }
        }
    };

    let breed = required(&values.breed);
    if breed.is_none() {
        errors.insert(Field::Breed, FieldError::Required);
    }
    if values.sex.is_none() {
        errors.insert(Field::Sex, FieldError::Required);
    }
    if values.weight.is_none() {
        errors.insert(Field::Weight, FieldError::Required);
    }

    match (name, age, description, breed, values.sex, values.weight) {
        (Some(name), Some(age), Some(description), Some(breed), Some(sex), Some(weight))
            if errors.is_empty() =>
        {
            Ok(ValidatedFields {
                name: name.to_string(),
                age,
                description: description.to_string(),
                breed: breed.to_string(),
                sex,
                weight,
            })
        }
        _ => Err(errors),
    }
}

/// Form state: working values and field errors
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: FormValues,
    errors: FieldErrors,
}

impl FormState {
    /// Empty form, as shown while loading
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working values with load-time defaults
    pub fn populate(&mut self, defaults: &FormValues) {
        self.values = defaults.clone();
        self.errors = FieldErrors::default();
    }

    /// Apply an operator input event
    ///
    /// Editing a field clears its pending error.
    pub fn apply(&mut self, event: FormEvent) {
        self.errors.remove(event.field());
        match event {
            FormEvent::Name(v) => self.values.name = v,
            FormEvent::Age(v) => self.values.age = v,
            FormEvent::Description(v) => self.values.description = v,
            FormEvent::Breed(v) => self.values.breed = v,
            FormEvent::Sex(v) => self.values.sex = v,
            FormEvent::Weight(v) => self.values.weight = v,
            FormEvent::PickFiles(files) => self.values.image = ImageField::Picked(files),
            FormEvent::SetImage(file) => self.values.image = ImageField::File(file),
        }
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[inline]
    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    #[inline]
    pub fn clear_errors(&mut self) {
        self.errors = FieldErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormValues {
        FormValues {
            name: "Rex".to_string(),
            age: "3".to_string(),
            description: "calmo".to_string(),
            breed: "hound/afghan".to_string(),
            sex: Some(Sex::Male),
            weight: Some(WeightClass::Large),
            image: ImageField::Stored("dog.jpg".to_string()),
        }
    }

    #[test]
    fn valid_form_passes() {
        let fields = validate(&filled()).unwrap();
        assert_eq!(fields.age, 3);
        assert_eq!(fields.sex, Sex::Male);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate(&FormValues::default()).unwrap_err();
        assert_eq!(errors.len(), 6);
        for field in [Field::Name, Field::Age, Field::Description, Field::Breed, Field::Sex, Field::Weight] {
            assert_eq!(errors.get(field), Some(&FieldError::Required));
        }
        assert!(errors.get(Field::Image).is_none());
    }

    #[test]
    fn description_of_255_chars_passes() {
        let mut values = filled();
        values.description = "a".repeat(255);
        assert!(validate(&values).is_ok());
    }

    #[test]
    fn description_of_256_chars_is_too_long() {
        let mut values = filled();
        values.description = "a".repeat(256);
        let errors = validate(&values).unwrap_err();
        assert_eq!(
            errors.get(Field::Description),
            Some(&FieldError::TooLong { max: 255, actual: 256 })
        );
        assert_eq!(
            errors.messages(),
            vec![(Field::Description, "Descrição deve ter no máximo 255 caracteres".to_string())]
        );
    }

    #[test]
    fn description_length_counts_characters() {
        let mut values = filled();
        values.description = "ç".repeat(255);
        assert!(validate(&values).is_ok());
    }

    #[test]
    fn age_must_be_non_negative_integer() {
        let mut values = filled();
        values.age = "-2".to_string();
        assert_eq!(validate(&values).unwrap_err().get(Field::Age), Some(&FieldError::InvalidNumber));

        values.age = "two".to_string();
        assert_eq!(validate(&values).unwrap_err().get(Field::Age), Some(&FieldError::InvalidNumber));
    }

    #[test]
    fn whitespace_name_is_missing() {
        let mut values = filled();
        values.name = "   ".to_string();
        assert_eq!(validate(&values).unwrap_err().get(Field::Name), Some(&FieldError::Required));
    }

    #[test]
    fn apply_clears_field_error() {
        let mut state = FormState::new();
        state.populate(&filled());
        state.set_errors(FieldErrors::single(Field::Name, FieldError::Required));

        state.apply(FormEvent::Age("4".to_string()));
        assert!(state.errors().get(Field::Name).is_some());

        state.apply(FormEvent::Name("Bob".to_string()));
        assert!(state.errors().is_empty());
        assert_eq!(state.values().name, "Bob");
    }

    #[test]
    fn pick_files_replaces_image() {
        let mut state = FormState::new();
        state.populate(&filled());
        state.apply(FormEvent::PickFiles(vec![ImageFile::new("photo.png", vec![1, 2])]));
        assert!(state.values().image.has_new_file());
    }

    #[test]
    fn field_errors_display() {
        let mut errors = FieldErrors::single(Field::Name, FieldError::Required);
        errors.insert(Field::Age, FieldError::InvalidNumber);
        assert_eq!(errors.to_string(), "name: required, age: not a non-negative integer");
    }
}
