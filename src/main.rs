use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;

use homelist::clients::auth_client::HttpAuthClient;
use homelist::clients::listings_client::HttpListingStore;
use homelist::clients::storage_client::HttpObjectStore;
use homelist::config;
use homelist::form::events::InputEvent;
use homelist::form::FormStore;
use homelist::logger::setup_logger;
use homelist::models::listing::ImageFile;
use homelist::session::auth_gate::AuthGate;
use homelist::session::page::ListingPage;
use homelist::session::{Navigator, Notifier, PageToken};

/// On-disk stand-in for the listing form: field values plus paths to the
/// photos to upload. Every value still goes through the same mutation
/// handler the interactive form would use.
#[derive(Debug, Deserialize)]
struct DraftFile {
    #[serde(rename = "type")]
    listing_type: String,
    name: String,
    bedrooms: u32,
    bathrooms: u32,
    parking: bool,
    furnished: bool,
    offer: bool,
    address: String,
    regular_price: i64,
    discounted_price: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    images: Vec<String>,
}

impl DraftFile {
    fn into_events(self) -> Result<Vec<InputEvent>> {
        let mut events = vec![
            text_event("type", self.listing_type),
            text_event("name", self.name),
            text_event("bedrooms", self.bedrooms.to_string()),
            text_event("bathrooms", self.bathrooms.to_string()),
            text_event("parking", self.parking.to_string()),
            text_event("furnished", self.furnished.to_string()),
            text_event("offer", self.offer.to_string()),
            text_event("address", self.address),
            text_event("regularPrice", self.regular_price.to_string()),
        ];
        if let Some(price) = self.discounted_price {
            events.push(text_event("discountedPrice", price.to_string()));
        }
        if let Some(latitude) = self.latitude {
            events.push(text_event("latitude", latitude.to_string()));
        }
        if let Some(longitude) = self.longitude {
            events.push(text_event("longitude", longitude.to_string()));
        }

        let mut files = Vec::new();
        for path in &self.images {
            files.push(read_image(Path::new(path))?);
        }
        events.push(InputEvent {
            id: "images".to_string(),
            value: String::new(),
            files: Some(files),
        });

        Ok(events)
    }
}

fn text_event(id: &str, value: String) -> InputEvent {
    InputEvent {
        id: id.to_string(),
        value,
        files: None,
    }
}

fn read_image(path: &Path) -> Result<ImageFile> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        other => bail!("unsupported image type '{}' for {}", other, path.display()),
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("could not read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImageFile {
        file_name,
        content_type: content_type.to_string(),
        bytes,
    })
}

struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        info!("navigating to {}", route);
    }
}

struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("toast: {}", message);
    }

    fn error(&self, message: &str) {
        log::error!("toast: {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let config = Arc::new(config::read_config());

    let draft_path = env::args()
        .nth(1)
        .context("usage: homelist <draft.toml>")?;
    let contents = std::fs::read_to_string(&draft_path)
        .with_context(|| format!("could not read draft file {}", draft_path))?;
    let draft_file: DraftFile = toml::from_str(&contents)?;

    let store = Arc::new(FormStore::new());
    let navigator = Arc::new(LogNavigator);
    let notifier = Arc::new(LogNotifier);
    let auth = Arc::new(HttpAuthClient::new(config.clone()));
    let objects = Arc::new(HttpObjectStore::new(config.clone()));
    let listings = Arc::new(HttpListingStore::new(config));

    let token = PageToken::new();
    let gate = AuthGate::new(auth, store.clone(), navigator.clone(), token.clone());
    gate.activate().await?;

    if store.snapshot().draft.owner_id.is_none() {
        // The gate already asked for the sign-in route.
        token.deactivate();
        return Ok(());
    }

    for event in draft_file.into_events()? {
        store.apply_input(event);
    }

    let page = ListingPage::new(store, objects, listings, navigator, notifier);
    page.submit().await?;

    token.deactivate();
    Ok(())
}
