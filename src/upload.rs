use anyhow::{Context, Result};
use futures::future::try_join_all;
use uuid::Uuid;

use crate::clients::storage_client::ObjectStore;
use crate::models::listing::ImageFile;

/// Storage key for one photo: owner, original filename and a random
/// suffix so repeated uploads of the same file never collide.
pub fn storage_key(owner_id: &str, file_name: &str) -> String {
    format!("images/{}-{}-{}", owner_id, file_name, Uuid::new_v4())
}

/// Uploads every photo concurrently and resolves to their public URLs in
/// input order - the first URL stays the cover image no matter which
/// upload finishes first. Each task carries its original index and the
/// results are collected by that index rather than by arrival.
///
/// One failed upload fails the whole batch; objects that already made it
/// to the store are left behind (cleanup is out of scope here).
pub async fn store_images(
    store: &dyn ObjectStore,
    owner_id: &str,
    images: &[ImageFile],
) -> Result<Vec<String>> {
    let uploads = images.iter().enumerate().map(|(index, image)| {
        let key = storage_key(owner_id, &image.file_name);
        async move {
            let url = store
                .upload(&key, image)
                .await
                .with_context(|| format!("upload of '{}' failed", image.file_name))?;
            Ok::<(usize, String), anyhow::Error>((index, url))
        }
    });

    let mut urls = vec![String::new(); images.len()];
    for (index, url) in try_join_all(uploads).await? {
        urls[index] = url;
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_unique_per_call() {
        let first = storage_key("user-1", "front.jpg");
        let second = storage_key("user-1", "front.jpg");
        assert!(first.starts_with("images/user-1-front.jpg-"));
        assert_ne!(first, second);
    }
}
