use log::warn;

use crate::models::listing::{ImageFile, ListingDraft, ListingKind};

use super::FormState;

/// A raw input-change notification from the view layer: the id of the
/// control that fired, its current value, and an optional file list for
/// file pickers. Every control on the page funnels through this one shape.
#[derive(Debug, Clone, Default)]
pub struct InputEvent {
    pub id: String,
    pub value: String,
    pub files: Option<Vec<ImageFile>>,
}

/// Typed draft fields, one per control id on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ListingType,
    Name,
    Bedrooms,
    Bathrooms,
    Parking,
    Furnished,
    Address,
    Offer,
    RegularPrice,
    DiscountedPrice,
    Latitude,
    Longitude,
}

impl Field {
    pub fn from_id(id: &str) -> Option<Field> {
        match id {
            "type" => Some(Field::ListingType),
            "name" => Some(Field::Name),
            "bedrooms" => Some(Field::Bedrooms),
            "bathrooms" => Some(Field::Bathrooms),
            "parking" => Some(Field::Parking),
            "furnished" => Some(Field::Furnished),
            "address" => Some(Field::Address),
            "offer" => Some(Field::Offer),
            "regularPrice" => Some(Field::RegularPrice),
            "discountedPrice" => Some(Field::DiscountedPrice),
            "latitude" => Some(Field::Latitude),
            "longitude" => Some(Field::Longitude),
            _ => None,
        }
    }
}

/// A classified field mutation, dispatched through one pure reducer.
#[derive(Debug, Clone)]
pub enum FormEvent {
    SetText(Field, String),
    SetBool(Field, bool),
    SetFiles(Vec<ImageFile>),
}

/// Turns a raw notification into a typed mutation. Policy, in order:
/// literal "true"/"false" values coerce to booleans, an attached file list
/// wins over the id/value pair, anything else targets the named field.
pub fn classify(event: InputEvent) -> Option<FormEvent> {
    let boolean = match event.value.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    };

    if let Some(files) = event.files {
        return Some(FormEvent::SetFiles(files));
    }

    let Some(field) = Field::from_id(&event.id) else {
        warn!("ignoring input event for unknown field '{}'", event.id);
        return None;
    };

    match boolean {
        Some(value) => Some(FormEvent::SetBool(field, value)),
        None => Some(FormEvent::SetText(field, event.value)),
    }
}

/// The reducer: merges one mutation into the form state, leaving every
/// other field untouched. Performs no validation.
pub fn apply(state: &mut FormState, event: FormEvent) {
    let draft = &mut state.draft;
    match event {
        FormEvent::SetFiles(files) => draft.images = files,
        FormEvent::SetBool(field, value) => match field {
            Field::Parking => draft.parking = value,
            Field::Furnished => draft.furnished = value,
            Field::Offer => draft.offer = value,
            other => warn!("boolean value for non-boolean field {:?} ignored", other),
        },
        FormEvent::SetText(field, value) => set_text(draft, field, &value),
    }
}

fn set_text(draft: &mut ListingDraft, field: Field, value: &str) {
    match field {
        Field::ListingType => match ListingKind::parse(value) {
            Some(kind) => draft.listing_type = kind,
            None => warn!("unknown listing type '{}' ignored", value),
        },
        Field::Name => draft.name = value.to_string(),
        Field::Address => draft.address = value.to_string(),
        Field::Bedrooms => set_parsed(&mut draft.bedrooms, field, value),
        Field::Bathrooms => set_parsed(&mut draft.bathrooms, field, value),
        Field::RegularPrice => set_parsed(&mut draft.regular_price, field, value),
        Field::DiscountedPrice => set_parsed(&mut draft.discounted_price, field, value),
        Field::Latitude => set_parsed(&mut draft.latitude, field, value),
        Field::Longitude => set_parsed(&mut draft.longitude, field, value),
        Field::Parking | Field::Furnished | Field::Offer => {
            warn!("text value for boolean field {:?} ignored", field)
        }
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, field: Field, value: &str) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!("non-numeric value '{}' for {:?} ignored", value, field),
    }
}
