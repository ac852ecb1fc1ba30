use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sale,
    Rent,
}

impl ListingKind {
    pub fn parse(value: &str) -> Option<ListingKind> {
        match value {
            "sale" => Some(ListingKind::Sale),
            "rent" => Some(ListingKind::Rent),
            _ => None,
        }
    }
}

/// A photo selected for upload: raw bytes plus the metadata the object
/// store needs to serve it back.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub const MAX_IMAGES: usize = 6;
pub const NAME_MIN_LEN: usize = 10;
pub const NAME_MAX_LEN: usize = 32;
pub const ROOMS_MIN: u32 = 1;
pub const ROOMS_MAX: u32 = 50;
pub const REGULAR_PRICE_MIN: i64 = 50;
pub const REGULAR_PRICE_MAX: i64 = 750_000_000;
pub const DISCOUNTED_PRICE_MIN: i64 = 50;
pub const DISCOUNTED_PRICE_MAX: i64 = 75_000_000;

/// The in-progress, unsaved listing being edited. Owned by the form store
/// for the lifetime of the page session.
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub listing_type: ListingKind,
    pub name: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking: bool,
    pub furnished: bool,
    pub address: String,
    pub offer: bool,
    pub regular_price: i64,
    pub discounted_price: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub images: Vec<ImageFile>,
    pub owner_id: Option<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        ListingDraft {
            listing_type: ListingKind::Rent,
            name: String::new(),
            bedrooms: 1,
            bathrooms: 1,
            parking: false,
            furnished: false,
            address: String::new(),
            offer: false,
            regular_price: 0,
            discounted_price: 0,
            latitude: 0.0,
            longitude: 0.0,
            images: Vec::new(),
            owner_id: None,
        }
    }
}

/// The write payload sent to the listings collection. Assembled from a
/// draft at submission time: `address` becomes `location`, the raw image
/// files are replaced by their uploaded URLs (first URL is the cover
/// image), and the discounted price is dropped entirely when no offer is
/// set. The creation timestamp is assigned server-side, never here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub listing_type: ListingKind,
    pub name: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking: bool,
    pub furnished: bool,
    pub offer: bool,
    pub regular_price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub image_urls: Vec<String>,
    pub location: String,
    pub owner_id: String,
}

impl NewListing {
    pub fn from_draft(draft: ListingDraft, owner_id: String, image_urls: Vec<String>) -> Self {
        NewListing {
            listing_type: draft.listing_type,
            name: draft.name,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            parking: draft.parking,
            furnished: draft.furnished,
            offer: draft.offer,
            regular_price: draft.regular_price,
            discounted_price: draft.offer.then_some(draft.discounted_price),
            latitude: draft.latitude,
            longitude: draft.longitude,
            image_urls,
            location: draft.address,
            owner_id,
        }
    }
}

/// What the listings service hands back after an insert: the new document
/// id and the server-assigned creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedListing {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            name: "Harbourside studio".to_string(),
            address: "12 Harbour Lane".to_string(),
            regular_price: 1000,
            ..ListingDraft::default()
        }
    }

    #[test]
    fn discounted_price_dropped_without_offer() {
        let listing = NewListing::from_draft(draft(), "owner-1".to_string(), vec![]);
        let json = serde_json::to_value(&listing).unwrap();
        assert!(json.get("discountedPrice").is_none());
    }

    #[test]
    fn discounted_price_kept_with_offer() {
        let mut d = draft();
        d.offer = true;
        d.discounted_price = 900;
        let listing = NewListing::from_draft(d, "owner-1".to_string(), vec![]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["discountedPrice"], 900);
    }

    #[test]
    fn address_becomes_location() {
        let listing = NewListing::from_draft(draft(), "owner-1".to_string(), vec![]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["location"], "12 Harbour Lane");
        assert!(json.get("address").is_none());
        assert!(json.get("images").is_none());
        assert_eq!(json["listingType"], "rent");
    }
}
