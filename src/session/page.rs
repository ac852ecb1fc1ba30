use std::sync::Arc;

use anyhow::Result;
use log::{error, info};

use crate::clients::listings_client::ListingStore;
use crate::clients::storage_client::ObjectStore;
use crate::form::FormStore;
use crate::models::listing::{
    ListingDraft, NewListing, ACCEPTED_IMAGE_TYPES, DISCOUNTED_PRICE_MAX, DISCOUNTED_PRICE_MIN,
    MAX_IMAGES, NAME_MAX_LEN, NAME_MIN_LEN, REGULAR_PRICE_MAX, REGULAR_PRICE_MIN, ROOMS_MAX,
    ROOMS_MIN,
};
use crate::upload::store_images;

use super::{Navigator, Notifier, HOME_ROUTE};

/// Drives one submission: validate, upload, assemble, persist, navigate.
/// Every step is a hard gate on the next - in particular a failed upload
/// prevents the record from ever being written.
pub struct ListingPage {
    store: Arc<FormStore>,
    objects: Arc<dyn ObjectStore>,
    listings: Arc<dyn ListingStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ListingPage {
    pub fn new(
        store: Arc<FormStore>,
        objects: Arc<dyn ObjectStore>,
        listings: Arc<dyn ListingStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> ListingPage {
        ListingPage {
            store,
            objects,
            listings,
            navigator,
            notifier,
        }
    }

    pub async fn submit(&self) -> Result<()> {
        self.store.set_loading(true);
        let state = self.store.snapshot();
        let draft = state.draft;

        // The discount invariant only applies when an offer is actually
        // set; without one both prices default to zero and the comparison
        // would reject every untouched form.
        if draft.offer && draft.discounted_price >= draft.regular_price {
            self.abort("Discounted price needs to be less than regular price");
            return Ok(());
        }

        if let Err(problem) = validate_draft(&draft, state.geolocation_enabled) {
            self.abort(&problem);
            return Ok(());
        }

        // validate_draft guarantees the owner is present.
        let owner_id = draft.owner_id.clone().unwrap_or_default();

        let image_urls = match store_images(self.objects.as_ref(), &owner_id, &draft.images).await {
            Ok(urls) => urls,
            Err(err) => {
                error!("image upload failed: {:?}", err);
                self.abort("Images not uploaded");
                return Ok(());
            }
        };

        let listing = NewListing::from_draft(draft, owner_id, image_urls);

        match self.listings.insert(&listing).await {
            Ok(inserted) => info!("listing {} created at {}", inserted.id, inserted.created_at),
            Err(err) => {
                error!("listing insert failed: {:?}", err);
                self.abort("Listing not saved");
                return Ok(());
            }
        }

        self.store.set_loading(false);
        self.notifier.success("Listing saved");
        self.navigator.navigate(HOME_ROUTE);
        Ok(())
    }

    fn abort(&self, message: &str) {
        self.store.set_loading(false);
        self.notifier.error(message);
    }
}

/// Field-level checks mirroring the constraints the form itself imposes.
/// The store never validates; everything funnels through here at submit.
fn validate_draft(draft: &ListingDraft, geolocation_enabled: bool) -> Result<(), String> {
    if draft.owner_id.is_none() {
        return Err("You need to be signed in to create a listing".to_string());
    }

    let name_len = draft.name.chars().count();
    if name_len < NAME_MIN_LEN || name_len > NAME_MAX_LEN {
        return Err(format!(
            "Name must be between {} and {} characters",
            NAME_MIN_LEN, NAME_MAX_LEN
        ));
    }

    for rooms in [draft.bedrooms, draft.bathrooms] {
        if !(ROOMS_MIN..=ROOMS_MAX).contains(&rooms) {
            return Err(format!(
                "Bedrooms and bathrooms must be between {} and {}",
                ROOMS_MIN, ROOMS_MAX
            ));
        }
    }

    if !(REGULAR_PRICE_MIN..=REGULAR_PRICE_MAX).contains(&draft.regular_price) {
        return Err(format!(
            "Regular price must be between {} and {}",
            REGULAR_PRICE_MIN, REGULAR_PRICE_MAX
        ));
    }

    if draft.offer && !(DISCOUNTED_PRICE_MIN..=DISCOUNTED_PRICE_MAX).contains(&draft.discounted_price)
    {
        return Err(format!(
            "Discounted price must be between {} and {}",
            DISCOUNTED_PRICE_MIN, DISCOUNTED_PRICE_MAX
        ));
    }

    if draft.images.is_empty() || draft.images.len() > MAX_IMAGES {
        return Err(format!("Between 1 and {} images are required", MAX_IMAGES));
    }

    if draft
        .images
        .iter()
        .any(|image| !ACCEPTED_IMAGE_TYPES.contains(&image.content_type.as_str()))
    {
        return Err("Images must be jpg or png".to_string());
    }

    if !geolocation_enabled && !(draft.latitude.is_finite() && draft.longitude.is_finite()) {
        return Err("Latitude and longitude are required".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::ImageFile;

    fn valid_draft() -> ListingDraft {
        ListingDraft {
            name: "Harbourside studio".to_string(),
            address: "12 Harbour Lane".to_string(),
            regular_price: 1000,
            images: vec![ImageFile {
                file_name: "front.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![0; 16],
            }],
            owner_id: Some("user-1".to_string()),
            ..ListingDraft::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate_draft(&valid_draft(), false).is_ok());
    }

    #[test]
    fn short_name_rejected() {
        let mut draft = valid_draft();
        draft.name = "Tiny".to_string();
        assert!(validate_draft(&draft, false).is_err());
    }

    #[test]
    fn too_many_images_rejected() {
        let mut draft = valid_draft();
        let photo = draft.images[0].clone();
        draft.images = vec![photo; MAX_IMAGES + 1];
        assert!(validate_draft(&draft, false).is_err());
    }

    #[test]
    fn wrong_image_type_rejected() {
        let mut draft = valid_draft();
        draft.images[0].content_type = "image/gif".to_string();
        assert!(validate_draft(&draft, false).is_err());
    }

    #[test]
    fn missing_owner_rejected() {
        let mut draft = valid_draft();
        draft.owner_id = None;
        assert!(validate_draft(&draft, false).is_err());
    }

    #[test]
    fn discounted_price_range_only_checked_with_offer() {
        let mut draft = valid_draft();
        draft.discounted_price = 0;
        assert!(validate_draft(&draft, false).is_ok());

        draft.offer = true;
        assert!(validate_draft(&draft, false).is_err());
    }
}
