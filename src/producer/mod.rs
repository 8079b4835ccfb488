//! Image production driver.
//!
//! Orchestrates the account pool and the image backend: request a key, call
//! the API, report the outcome back to the pool, and degrade to placeholder
//! images once every account is exhausted.

mod images;

pub use images::{ImageProducer, ProductionReport, SlidePrompt, load_prompts};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountConfig;
    use crate::imagegen::{ImageGenError, MockImageBackend};
    use crate::pool::AccountPool;
    use tempfile::TempDir;

    fn pool(limits: &[u32], dir: &TempDir) -> AccountPool {
        let configs: Vec<_> = limits
            .iter()
            .enumerate()
            .map(|(i, &limit)| AccountConfig {
                name: format!("Account {}", i + 1),
                api_key: format!("key{}", i + 1),
                daily_limit: limit,
            })
            .collect();
        AccountPool::new(&configs, dir.path().join("state.json"))
    }

    fn prompts(count: u32) -> Vec<SlidePrompt> {
        (1..=count)
            .map(|n| SlidePrompt {
                slide_number: n,
                text: format!("Prompt for slide {n}"),
            })
            .collect()
    }

    #[test]
    fn test_produce_generates_and_counts_usage() {
        let temp_dir = TempDir::new().unwrap();
        let mut pool = pool(&[10], &temp_dir);

        let mut mock = MockImageBackend::new();
        mock.expect_generate()
            .times(2)
            .returning(|_, _| Ok(b"\x89PNG fake".to_vec()));

        let producer = ImageProducer::new(mock, temp_dir.path().join("images"));
        let report = producer.produce(&mut pool, &prompts(2));

        assert_eq!(report.generated, 2);
        assert_eq!(report.placeholders, 0);
        assert_eq!(pool.accounts()[0].used_today, 2);
        assert!(temp_dir.path().join("images/slide_01.png").exists());
        assert!(temp_dir.path().join("images/slide_02.png").exists());
    }

    #[test]
    fn test_produce_reuses_existing_images() {
        let temp_dir = TempDir::new().unwrap();
        let mut pool = pool(&[10], &temp_dir);
        let images_dir = temp_dir.path().join("images");
        std::fs::create_dir_all(&images_dir).unwrap();
        std::fs::write(images_dir.join("slide_01.jpg"), b"manual image").unwrap();

        let mut mock = MockImageBackend::new();
        mock.expect_generate()
            .times(1)
            .returning(|_, _| Ok(b"\x89PNG fake".to_vec()));

        let producer = ImageProducer::new(mock, &images_dir);
        let report = producer.produce(&mut pool, &prompts(2));

        assert_eq!(report.reused, 1);
        assert_eq!(report.generated, 1);
        // The reused slide cost no quota
        assert_eq!(pool.accounts()[0].used_today, 1);
    }

    #[test]
    fn test_quota_error_rotates_to_next_account() {
        let temp_dir = TempDir::new().unwrap();
        let mut pool = pool(&[10, 10], &temp_dir);

        let mut mock = MockImageBackend::new();
        mock.expect_generate()
            .withf(|_, key| key == "key1")
            .times(1)
            .returning(|_, _| {
                Err(ImageGenError::QuotaExceeded(
                    "429 RESOURCE_EXHAUSTED".to_string(),
                ))
            });
        mock.expect_generate()
            .withf(|_, key| key == "key2")
            .times(1)
            .returning(|_, _| Ok(b"\x89PNG fake".to_vec()));

        let producer = ImageProducer::new(mock, temp_dir.path().join("images"));
        let report = producer.produce(&mut pool, &prompts(1));

        assert_eq!(report.generated, 1);
        assert!(pool.accounts()[0].is_exhausted);
        assert_eq!(pool.accounts()[1].used_today, 1);
    }

    #[test]
    fn test_exhausted_pool_falls_back_to_placeholders() {
        let temp_dir = TempDir::new().unwrap();
        let mut pool = pool(&[1], &temp_dir);

        let mut mock = MockImageBackend::new();
        mock.expect_generate().times(1).returning(|_, _| {
            Err(ImageGenError::QuotaExceeded(
                "daily quota exhausted".to_string(),
            ))
        });

        let producer = ImageProducer::new(mock, temp_dir.path().join("images"));
        let report = producer.produce(&mut pool, &prompts(2));

        assert_eq!(report.generated, 0);
        assert_eq!(report.placeholders, 2);
        assert!(temp_dir.path().join("images/slide_01.png").exists());
        assert!(temp_dir.path().join("images/slide_02.png").exists());
    }

    #[test]
    fn test_transient_errors_retry_then_give_up() {
        let temp_dir = TempDir::new().unwrap();
        let mut pool = pool(&[10], &temp_dir);

        let mut mock = MockImageBackend::new();
        mock.expect_generate()
            .times(3)
            .returning(|_, _| Err(ImageGenError::ConnectionFailed("timeout".to_string())));

        let producer = ImageProducer::new(mock, temp_dir.path().join("images"));
        let report = producer.produce(&mut pool, &prompts(1));

        assert_eq!(report.generated, 0);
        assert_eq!(report.placeholders, 1);
        // Non-quota failures never exhaust the account
        assert!(!pool.accounts()[0].is_exhausted);
    }

    // ===========================================
    // Prompt loading
    // ===========================================

    #[test]
    fn test_load_prompts_ordered_by_slide_number() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("slide_03.txt"), "third\n").unwrap();
        std::fs::write(dir.join("slide_01.txt"), "first").unwrap();
        std::fs::write(dir.join("slide_02.txt"), "second").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let prompts = load_prompts(dir).unwrap();

        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[0].slide_number, 1);
        assert_eq!(prompts[0].text, "first");
        assert_eq!(prompts[2].text, "third");
    }

    #[test]
    fn test_load_prompts_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let prompts = load_prompts(&temp_dir.path().join("nonexistent")).unwrap();

        assert!(prompts.is_empty());
    }
}
