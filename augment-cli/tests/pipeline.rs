use augment_brief::{DescriptorModel, ModelGenerator};
use augment_cli::{AugmenterBuilder, AugmenterError, Frame, SceneAugmenter};
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;

const SOURCE_SIDE: u32 = 96;
const OFFSET: (u32, u32) = (30, 20);
const REPLACEMENT_COLOUR: [u8; 3] = [200, 10, 10];

/// Low-contrast noise with bright isolated dots on a jittered grid
///
/// The noise stays below the corner threshold, so only the dots are detected,
/// while it gives every descriptor patch a distinct texture.
fn dotted_texture(side: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img: GrayImage = ImageBuffer::from_fn(side, side, |_, _| Luma([rng.gen_range(10..=40)]));
    for cy in (8..side - 15).step_by(8) {
        for cx in (8..side - 15).step_by(8) {
            let x = cx + rng.gen_range(0..5);
            let y = cy + rng.gen_range(0..5);
            img.put_pixel(x, y, Luma([rng.gen_range(200..=255)]));
        }
    }
    img
}

fn to_rgb(img: &GrayImage) -> RgbImage {
    ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// `source` pasted at [`OFFSET`] onto a larger noisy canvas
fn scene(source: &GrayImage) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(99);
    let mut canvas: GrayImage = ImageBuffer::from_fn(160, 140, |_, _| Luma([rng.gen_range(10..=40)]));
    image::imageops::replace(&mut canvas, source, OFFSET.0 as i64, OFFSET.1 as i64);
    to_rgb(&canvas)
}

fn model() -> Arc<DescriptorModel> {
    Arc::new(ModelGenerator::new(13, 13, 48, 2024).unwrap().generate().unwrap())
}

fn augmenter() -> SceneAugmenter {
    AugmenterBuilder::new(model()).threads(2).max_iters(2_000).seed(5).build().unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("augment-{}-{}", std::process::id(), name))
}

#[test]
fn test_execute_requires_both_images() {
    let _ = env_logger::builder().is_test(true).try_init();

    let frame = Frame::Rgb8(RgbImage::new(40, 30));
    let mut a = augmenter();
    assert!(matches!(a.execute(&frame), Err(AugmenterError::SourceNotSet)));
    a.set_source_image(&frame).unwrap();
    assert!(matches!(a.execute(&frame), Err(AugmenterError::ReplacementNotSet)));
    a.set_replacement_image(&frame).unwrap();

    let out = a.execute(&frame).unwrap();
    assert_eq!(out.dimensions(), (40, 30));
    assert_eq!(out, frame);
}

#[test]
fn test_translated_source_is_replaced() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = dotted_texture(SOURCE_SIDE, 7);
    let target = Frame::Rgb8(scene(&source));
    let replacement: RgbImage = ImageBuffer::from_pixel(SOURCE_SIDE, SOURCE_SIDE, Rgb(REPLACEMENT_COLOUR));

    let mut a = augmenter();
    a.set_source_image(&Frame::Rgb8(to_rgb(&source))).unwrap();
    a.set_replacement_image(&Frame::Rgb8(replacement)).unwrap();
    assert!(a.source_description().map_or(0, |d| d.len()) > 50);

    let out = match a.execute(&target).unwrap() {
        Frame::Rgb8(img) => img,
        other => panic!("unexpected frame kind {:?}", other.kind()),
    };
    let Frame::Rgb8(original) = &target else { unreachable!() };

    let half = SOURCE_SIDE / 2;
    assert_eq!(out.get_pixel(OFFSET.0 + half, OFFSET.1 + half).0, REPLACEMENT_COLOUR);
    assert_eq!(out.get_pixel(OFFSET.0 + 5, OFFSET.1 + 5).0, REPLACEMENT_COLOUR);
    for (x, y) in [(5, 5), (150, 130), (OFFSET.0 - 3, OFFSET.1 + half), (OFFSET.0 + half, OFFSET.1 + SOURCE_SIDE + 3)] {
        assert_eq!(out.get_pixel(x, y), original.get_pixel(x, y), "pixel ({}, {})", x, y);
    }
}

#[test]
fn test_replacement_is_stretched_over_source() {
    let source = dotted_texture(SOURCE_SIDE, 11);
    let target = Frame::Luma8(ImageBuffer::from_fn(160, 140, |x, y| {
        Luma([if x >= OFFSET.0 && y >= OFFSET.1 && x < OFFSET.0 + SOURCE_SIDE && y < OFFSET.1 + SOURCE_SIDE {
            source.get_pixel(x - OFFSET.0, y - OFFSET.1)[0]
        } else {
            25
        }])
    }));
    // A small white replacement covers the whole located source once resized
    let replacement = Frame::Luma8(ImageBuffer::from_pixel(8, 4, Luma([255])));

    let mut a = augmenter();
    a.set_source_image(&Frame::Luma8(source)).unwrap();
    a.set_replacement_image(&replacement).unwrap();

    let Frame::Luma8(out) = a.execute(&target).unwrap() else {
        panic!("grayscale target should stay grayscale");
    };
    assert_eq!(out.dimensions(), (160, 140));
    assert_eq!(out.get_pixel(OFFSET.0 + 10, OFFSET.1 + 80)[0], 255);
    assert_eq!(out.get_pixel(OFFSET.0 + 85, OFFSET.1 + 10)[0], 255);
    assert_eq!(out.get_pixel(2, 2)[0], 25);
}

#[test]
fn test_model_file_round_trip() {
    let path = temp_path("model.bin");
    let model = ModelGenerator::new(13, 13, 48, 3).unwrap().generate().unwrap();
    model.write(&path).unwrap();

    assert_eq!(DescriptorModel::load(&path).unwrap(), model);
    assert!(SceneAugmenter::from_model_path(&path).is_ok());

    // A truncated file is rejected
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();
    assert!(matches!(
        SceneAugmenter::from_model_path(&path),
        Err(AugmenterError::Descriptor(_))
    ));
    std::fs::remove_file(&path).unwrap();
}
