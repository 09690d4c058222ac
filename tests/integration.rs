// SPDX-License-Identifier: MPL-2.0
//! End-to-end tests over real image files and the production adapters.

use image_rs::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use wallswap::cache::AssetCache;
use wallswap::catalog::{Catalog, CatalogMode};
use wallswap::compositor::{compose, CanvasSpec};
use wallswap::domain::media::RawImage;
use wallswap::domain::wallpaper::{BackgroundColor, DisplayMode};
use wallswap::infrastructure::{BitmapApplier, ImageRsDecoder, ReqwestHttpClient};
use wallswap::navigation::{NavigationEngine, NavigationOutcome, NavigationSettings};

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> String {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .expect("write png");
    path.to_string_lossy().into_owned()
}

fn settings() -> NavigationSettings {
    NavigationSettings {
        change_randomly: false,
        high_resolution_thumbnails: false,
        trash_purged_files: false,
        canvas: CanvasSpec::new(80, 60, 10),
        mode: DisplayMode::Center,
        background: BackgroundColor::BLACK,
    }
}

fn engine(
    catalog: Catalog,
    data: &Path,
) -> NavigationEngine<ReqwestHttpClient, ImageRsDecoder, BitmapApplier> {
    let client = Arc::new(ReqwestHttpClient::new().expect("http client"));
    let cache = AssetCache::new(client, data.join("thumbnailCache"), data.join("wallpaperCache"));
    NavigationEngine::new(
        catalog,
        cache,
        Arc::new(ImageRsDecoder),
        Arc::new(BitmapApplier::new(data.join("wallswap.bmp"), None)),
        settings(),
    )
}

#[tokio::test]
async fn broken_files_are_purged_and_the_list_is_saved() {
    let images = tempdir().expect("images dir");
    let data = tempdir().expect("data dir");
    let list_path = data.path().join("localList.xml");

    let good = write_png(images.path(), "b_good.png", 40, 20);
    let broken = images.path().join("a_broken.jpg");
    std::fs::write(&broken, b"definitely not a jpeg").expect("write");

    let mut catalog = Catalog::with_path(CatalogMode::Sorted, &list_path);
    assert_eq!(catalog.add_directory(images.path()), 2);
    catalog.save().expect("save");

    let catalog = Catalog::open(CatalogMode::Sorted, &list_path).expect("reopen");
    let engine = engine(catalog, data.path());

    let outcome = engine.goto_next(true, None).await.expect("navigate");
    let NavigationOutcome::Selected { index, entry } = outcome else {
        panic!("expected a selection, got {outcome:?}");
    };
    assert_eq!(index, 0);
    assert_eq!(entry.source(), good);
    assert_eq!(entry.dimensions(), Some("40x20"));

    let bitmap = image_rs::open(data.path().join("wallswap.bmp")).expect("bitmap");
    assert_eq!((bitmap.width(), bitmap.height()), (80, 60));

    let saved = Catalog::open(CatalogMode::Sorted, &list_path).expect("reopen");
    assert_eq!(saved.len(), 1);
    assert!(saved.contains(&good));
    assert!(broken.exists(), "purging without trash keeps the file");
}

#[tokio::test]
async fn previous_walks_back_through_real_files() {
    let images = tempdir().expect("images dir");
    let data = tempdir().expect("data dir");
    let first = write_png(images.path(), "1.png", 8, 8);
    let second = write_png(images.path(), "2.png", 8, 8);

    let mut catalog = Catalog::new(CatalogMode::Sorted);
    catalog.add_directory(images.path());
    let engine = engine(catalog, data.path());

    engine.goto_next(false, None).await.expect("first");
    let outcome = engine.goto_next(false, None).await.expect("second");
    assert_eq!(outcome.entry().map(|e| e.source()), Some(second.as_str()));

    let back = engine.goto_previous(false).await.expect("previous");
    assert_eq!(back.entry().map(|e| e.source()), Some(first.as_str()));
    assert!(!data.path().join("wallswap.bmp").exists());
}

#[test]
fn compose_letterboxes_a_wide_image() {
    let source = RawImage::filled(100, 25, [255, 255, 255, 255]);
    let canvas = compose(
        &source,
        CanvasSpec::new(100, 100, 0),
        DisplayMode::Center,
        BackgroundColor::BLACK,
    )
    .expect("compose");

    assert_eq!((canvas.width(), canvas.height()), (100, 100));
    assert_eq!(canvas.pixel(50, 5), Some([0, 0, 0, 255]));
    assert_eq!(canvas.pixel(50, 50), Some([255, 255, 255, 255]));
}
