use std::cell::Cell;
use std::io::Cursor;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::provider::ProviderError;

const SMALL: Canvas = Canvas {
    width: 18,
    height: 32,
};

/// Serves solid PNGs until `fail_after` images have been produced, then errors.
struct FakeImages {
    calls: Cell<usize>,
    fail_after: usize,
}

impl FakeImages {
    fn new(fail_after: usize) -> Self {
        Self {
            calls: Cell::new(0),
            fail_after,
        }
    }
}

impl ImageProvider for FakeImages {
    fn generate_image(&self, _prompt: &str, _canvas: Canvas) -> Result<Vec<u8>, ProviderError> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n >= self.fail_after {
            return Err(ProviderError::request_failed("quota exhausted"));
        }
        let img = image::RgbaImage::from_pixel(9, 16, image::Rgba([40, 80, 120, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        Ok(buf)
    }
}

#[test]
fn ensure_pool_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeImages::new(usize::MAX);
    let pool = BackgroundPool::new(dir.path().join("bg"), SMALL, &provider);

    assert_eq!(pool.ensure_pool(5).unwrap(), 5);
    assert_eq!(pool.ensure_pool(5).unwrap(), 5);
    assert_eq!(pool.members().unwrap().len(), 5);
    assert_eq!(provider.calls.get(), 5);
}

#[test]
fn provider_failure_keeps_partial_pool() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeImages::new(2);
    let pool = BackgroundPool::new(dir.path(), SMALL, &provider);

    assert_eq!(pool.ensure_pool(5).unwrap(), 2);
    let names: Vec<String> = pool
        .members()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["bg_1.jpg", "bg_2.jpg"]);
}

#[test]
fn stored_members_are_canvas_sized() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeImages::new(1);
    let pool = BackgroundPool::new(dir.path(), SMALL, &provider);
    pool.ensure_pool(1).unwrap();

    let stored = image::open(dir.path().join("bg_1.jpg")).unwrap();
    assert_eq!((stored.width(), stored.height()), (18, 32));
}

#[test]
fn random_background_fills_an_empty_pool() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeImages::new(usize::MAX);
    let pool = BackgroundPool::new(dir.path(), SMALL, &provider).with_target(3);
    let mut rng = StdRng::seed_from_u64(7);

    let img = pool.random_background(&mut rng).unwrap();
    assert_eq!(img.dimensions(), (18, 32));
    assert_eq!(pool.members().unwrap().len(), 3);

    pool.random_background(&mut rng).unwrap();
    assert_eq!(provider.calls.get(), 3);
}

#[test]
fn empty_pool_after_failed_population_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeImages::new(0);
    let pool = BackgroundPool::new(dir.path(), SMALL, &provider);
    let mut rng = StdRng::seed_from_u64(1);

    let err = pool.random_background(&mut rng).unwrap_err();
    assert!(matches!(err, TwainError::EmptyPool));
}
