#[cfg(test)]
mod upload_orchestration {
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use homelist::clients::storage_client::ObjectStore;
    use homelist::models::listing::ImageFile;
    use homelist::upload::store_images;

    fn image(file_name: &str) -> ImageFile {
        ImageFile {
            file_name: file_name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0; 8],
        }
    }

    /// Completes uploads after a per-file delay so completion order can be
    /// forced to differ from input order.
    struct SlowStore {
        delays_ms: Vec<(String, u64)>,
        fail_on: Option<String>,
        completions: Mutex<Vec<String>>,
    }

    impl SlowStore {
        fn new(delays_ms: Vec<(&str, u64)>) -> SlowStore {
            SlowStore {
                delays_ms: delays_ms
                    .into_iter()
                    .map(|(name, delay)| (name.to_string(), delay))
                    .collect(),
                fail_on: None,
                completions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for SlowStore {
        async fn upload(&self, key: &str, image: &ImageFile) -> Result<String> {
            assert!(
                key.starts_with("images/owner-1-"),
                "unexpected storage key {}",
                key
            );

            let delay = self
                .delays_ms
                .iter()
                .find(|(name, _)| *name == image.file_name)
                .map(|(_, delay)| *delay)
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.fail_on.as_deref() == Some(image.file_name.as_str()) {
                bail!("quota exceeded");
            }

            self.completions
                .lock()
                .unwrap()
                .push(image.file_name.clone());
            Ok(format!("https://cdn.test/{}", image.file_name))
        }
    }

    #[tokio::test]
    async fn urls_come_back_in_input_order_not_completion_order() {
        // The last file finishes first, the first file finishes last.
        let store = SlowStore::new(vec![("a.jpg", 60), ("b.jpg", 30), ("c.jpg", 0)]);
        let images = vec![image("a.jpg"), image("b.jpg"), image("c.jpg")];

        let urls = store_images(&store, "owner-1", &images).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "https://cdn.test/a.jpg",
                "https://cdn.test/b.jpg",
                "https://cdn.test/c.jpg",
            ]
        );

        let completions = store.completions.lock().unwrap().clone();
        assert_eq!(completions.first().map(String::as_str), Some("c.jpg"));
        assert_eq!(completions.last().map(String::as_str), Some("a.jpg"));
    }

    #[tokio::test]
    async fn single_failure_fails_the_whole_batch() {
        let mut store = SlowStore::new(vec![("a.jpg", 0), ("b.jpg", 0), ("c.jpg", 0)]);
        store.fail_on = Some("b.jpg".to_string());
        let images = vec![image("a.jpg"), image("b.jpg"), image("c.jpg")];

        let result = store_images(&store, "owner-1", &images).await;

        assert!(result.is_err());
        let message = format!("{:?}", result.unwrap_err());
        assert!(message.contains("b.jpg"), "error should name the file");
    }

    #[tokio::test]
    async fn six_images_all_upload() {
        let store = SlowStore::new(vec![]);
        let images: Vec<ImageFile> = (0..6).map(|i| image(&format!("{i}.jpg"))).collect();

        let urls = store_images(&store, "owner-1", &images).await.unwrap();

        assert_eq!(urls.len(), 6);
        assert_eq!(urls[0], "https://cdn.test/0.jpg");
        assert_eq!(urls[5], "https://cdn.test/5.jpg");
    }
}
