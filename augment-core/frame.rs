//! Tagged image buffer accepted at the pipeline boundary, plus the
//! conversions between its representations.
//!
//! The detection and description stages work on single-channel `f32`
//! images in `[0, 1]`; compositing works on three-channel `f32` images in
//! `[0, 1]`. Everything else is converted with the free functions below.

use crate::error::{ImageError, ImageResult};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, Rgb32FImage, RgbImage};

/// Row-major single-channel float image
pub type GrayF32Image = ImageBuffer<Luma<f32>, Vec<f32>>;

const MAX_CHAR_VALUE: f32 = 255.0;
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Pixel representation of a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Luma8,
    Rgb8,
    Luma32F,
    Rgb32F,
}

impl FrameKind {
    pub fn channels(&self) -> usize {
        match self {
            FrameKind::Luma8 | FrameKind::Luma32F => 1,
            FrameKind::Rgb8 | FrameKind::Rgb32F => 3,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, FrameKind::Luma32F | FrameKind::Rgb32F)
    }
}

/// Image with an explicit channel count and element type
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Luma8(GrayImage),
    Rgb8(RgbImage),
    Luma32F(GrayF32Image),
    Rgb32F(Rgb32FImage),
}

impl Frame {
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Luma8(_) => FrameKind::Luma8,
            Frame::Rgb8(_) => FrameKind::Rgb8,
            Frame::Luma32F(_) => FrameKind::Luma32F,
            Frame::Rgb32F(_) => FrameKind::Rgb32F,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Luma8(img) => img.dimensions(),
            Frame::Rgb8(img) => img.dimensions(),
            Frame::Luma32F(img) => img.dimensions(),
            Frame::Rgb32F(img) => img.dimensions(),
        }
    }

    pub fn is_empty(&self) -> bool {
        let (w, h) = self.dimensions();
        w == 0 || h == 0
    }

    /// Rejects frames without pixels
    pub fn validate(&self) -> ImageResult<()> {
        if self.is_empty() {
            let (width, height) = self.dimensions();
            return Err(ImageError::Empty { width, height });
        }
        Ok(())
    }

    /// Convert for encoding; single-channel float frames are quantized to 8 bits
    pub fn to_dynamic(&self) -> DynamicImage {
        match self {
            Frame::Luma8(img) => DynamicImage::ImageLuma8(img.clone()),
            Frame::Rgb8(img) => DynamicImage::ImageRgb8(img.clone()),
            Frame::Luma32F(img) => DynamicImage::ImageLuma8(ImageBuffer::from_fn(
                img.width(),
                img.height(),
                |x, y| Luma([float_to_u8(img.get_pixel(x, y)[0])]),
            )),
            Frame::Rgb32F(img) => DynamicImage::ImageRgb32F(img.clone()),
        }
    }
}

impl TryFrom<DynamicImage> for Frame {
    type Error = ImageError;

    fn try_from(img: DynamicImage) -> Result<Self, Self::Error> {
        match img {
            DynamicImage::ImageLuma8(img) => Ok(Frame::Luma8(img)),
            DynamicImage::ImageRgb8(img) => Ok(Frame::Rgb8(img)),
            DynamicImage::ImageRgb32F(img) => Ok(Frame::Rgb32F(img)),
            other => Err(ImageError::UnsupportedPixelType(format!("{:?}", other.color()))),
        }
    }
}

impl From<GrayImage> for Frame {
    fn from(img: GrayImage) -> Self {
        Frame::Luma8(img)
    }
}

impl From<RgbImage> for Frame {
    fn from(img: RgbImage) -> Self {
        Frame::Rgb8(img)
    }
}

impl From<GrayF32Image> for Frame {
    fn from(img: GrayF32Image) -> Self {
        Frame::Luma32F(img)
    }
}

impl From<Rgb32FImage> for Frame {
    fn from(img: Rgb32FImage) -> Self {
        Frame::Rgb32F(img)
    }
}

#[inline]
fn u8_to_float(v: u8) -> f32 {
    v as f32 / MAX_CHAR_VALUE
}

#[inline]
fn float_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * MAX_CHAR_VALUE).round() as u8
}

#[inline]
fn luma(rgb: [f32; 3]) -> f32 {
    LUMA_WEIGHTS[0] * rgb[0] + LUMA_WEIGHTS[1] * rgb[1] + LUMA_WEIGHTS[2] * rgb[2]
}

/// Single-channel float image in `[0, 1]`
pub fn to_gray_f32(frame: &Frame) -> GrayF32Image {
    match frame {
        Frame::Luma8(img) => ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            Luma([u8_to_float(img.get_pixel(x, y)[0])])
        }),
        Frame::Rgb8(img) => ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            let Rgb(p) = *img.get_pixel(x, y);
            Luma([luma([u8_to_float(p[0]), u8_to_float(p[1]), u8_to_float(p[2])])])
        }),
        Frame::Luma32F(img) => img.clone(),
        Frame::Rgb32F(img) => ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            Luma([luma(img.get_pixel(x, y).0)])
        }),
    }
}

/// Three-channel float image in `[0, 1]`
pub fn to_color_f32(frame: &Frame) -> Rgb32FImage {
    match frame {
        Frame::Luma8(img) => ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            let v = u8_to_float(img.get_pixel(x, y)[0]);
            Rgb([v, v, v])
        }),
        Frame::Rgb8(img) => ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            let Rgb(p) = *img.get_pixel(x, y);
            Rgb([u8_to_float(p[0]), u8_to_float(p[1]), u8_to_float(p[2])])
        }),
        Frame::Luma32F(img) => ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            let v = img.get_pixel(x, y)[0];
            Rgb([v, v, v])
        }),
        Frame::Rgb32F(img) => img.clone(),
    }
}

/// Convert a three-channel float image back into the requested representation
pub fn color_f32_to_frame(img: &Rgb32FImage, kind: FrameKind) -> Frame {
    let (w, h) = img.dimensions();
    match kind {
        FrameKind::Luma8 => Frame::Luma8(ImageBuffer::from_fn(w, h, |x, y| {
            Luma([float_to_u8(luma(img.get_pixel(x, y).0))])
        })),
        FrameKind::Rgb8 => Frame::Rgb8(ImageBuffer::from_fn(w, h, |x, y| {
            let Rgb(p) = *img.get_pixel(x, y);
            Rgb([float_to_u8(p[0]), float_to_u8(p[1]), float_to_u8(p[2])])
        })),
        FrameKind::Luma32F => Frame::Luma32F(ImageBuffer::from_fn(w, h, |x, y| {
            Luma([luma(img.get_pixel(x, y).0)])
        })),
        FrameKind::Rgb32F => Frame::Rgb32F(img.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_dimensions() {
        let frame = Frame::from(RgbImage::new(10, 20));
        assert_eq!(frame.kind(), FrameKind::Rgb8);
        assert_eq!(frame.dimensions(), (10, 20));
        assert_eq!(frame.kind().channels(), 3);
        assert!(!frame.kind().is_float());
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        let frame = Frame::from(GrayImage::new(0, 5));
        assert!(frame.is_empty());
        assert!(matches!(frame.validate(), Err(ImageError::Empty { .. })));
    }

    #[test]
    fn test_unsupported_dynamic_image() {
        let rgba = DynamicImage::new_rgba8(4, 4);
        assert!(matches!(Frame::try_from(rgba), Err(ImageError::UnsupportedPixelType(_))));
        let luma = DynamicImage::new_luma8(4, 4);
        assert_eq!(Frame::try_from(luma).unwrap().kind(), FrameKind::Luma8);
    }

    #[test]
    fn test_gray_conversion_scales_to_unit_range() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(1, 0, Luma([255]));
        let gray = to_gray_f32(&Frame::from(img));
        assert_eq!(gray.get_pixel(0, 0)[0], 0.0);
        assert_eq!(gray.get_pixel(1, 0)[0], 1.0);
    }

    #[test]
    fn test_color_weights() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        let gray = to_gray_f32(&Frame::from(img));
        assert!((gray.get_pixel(0, 0)[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_back_conversion_preserves_kind() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([10, 200, 30]));
        let frame = Frame::from(img.clone());
        let color = to_color_f32(&frame);
        let back = color_f32_to_frame(&color, frame.kind());
        assert_eq!(back, frame);

        let gray = color_f32_to_frame(&color, FrameKind::Luma8);
        assert_eq!(gray.kind(), FrameKind::Luma8);
        assert_eq!(gray.dimensions(), (3, 2));
    }

    #[test]
    fn test_float_clamping() {
        let img: Rgb32FImage = ImageBuffer::from_pixel(1, 1, Rgb([-0.5, 2.0, 0.5]));
        match color_f32_to_frame(&img, FrameKind::Rgb8) {
            Frame::Rgb8(out) => assert_eq!(out.get_pixel(0, 0).0, [0, 255, 128]),
            other => panic!("unexpected frame kind {:?}", other.kind()),
        }
    }
}
