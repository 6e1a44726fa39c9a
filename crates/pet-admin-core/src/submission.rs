//! Update payload construction
//!
//! Every field is always sent because the storage API replaces the whole
//! record. The image resolves in order:
//! 1. First file from the picker, if any were picked
//! 2. A single file handle set directly on the form
//! 3. The stored reference from the load-time snapshot

use crate::form::{validate, Field, FieldError, FieldErrors, FormValues};
use crate::types::{ImageField, ImageFile, Record, Sex, WeightClass};

/// Outgoing image: new file bytes or the previously stored reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    File(ImageFile),
    Stored(String),
}

/// Whole-record update body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload {
    pub name: String,
    pub age: u32,
    pub description: String,
    pub breed: String,
    pub sex: Sex,
    pub weight: WeightClass,
    pub image: ImagePayload,
}

impl UpdatePayload {
    /// Text parts in wire order; the image part is handled separately
    #[must_use]
    pub fn text_fields(&self) -> [(&'static str, String); 6] {
        [
            (Field::Name.as_str(), self.name.clone()),
            (Field::Age.as_str(), self.age.to_string()),
            (Field::Description.as_str(), self.description.clone()),
            (Field::Breed.as_str(), self.breed.clone()),
            (Field::Sex.as_str(), self.sex.as_str().to_string()),
            (Field::Weight.as_str(), self.weight.as_str().to_string()),
        ]
    }
}

/// Resolve the outgoing image
///
/// The stored reference always comes from `snapshot`, never from the form's
/// own `Stored` value.
#[must_use]
pub fn resolve_image(image: &ImageField, snapshot: Option<&Record>) -> Option<ImagePayload> {
    match image {
        ImageField::Picked(files) if !files.is_empty() => Some(ImagePayload::File(files[0].clone())),
        ImageField::File(file) => Some(ImagePayload::File(file.clone())),
        ImageField::Picked(_) | ImageField::Stored(_) | ImageField::Empty => {
            snapshot.map(|record| ImagePayload::Stored(record.image.clone()))
        }
    }
}

/// Validate the form and build the update payload
///
/// # Errors
/// Returns all field errors. `image` is reported as required when no file
/// was chosen and there is no snapshot to fall back to.
pub fn build_payload(
    values: &FormValues,
    snapshot: Option<&Record>,
) -> Result<UpdatePayload, FieldErrors> {
    let image = resolve_image(&values.image, snapshot);

    match (validate(values), image) {
        (Ok(fields), Some(image)) => Ok(UpdatePayload {
            name: fields.name,
            age: fields.age,
            description: fields.description,
            breed: fields.breed,
            sex: fields.sex,
            weight: fields.weight,
            image,
        }),
        (Ok(_), None) => Err(FieldErrors::single(Field::Image, FieldError::Required)),
        (Err(mut errors), None) => {
            errors.insert(Field::Image, FieldError::Required);
            Err(errors)
        }
        (Err(errors), Some(_)) => Err(errors),
    }
}
