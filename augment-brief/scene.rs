use crate::error::{DescriptorError, DescriptorResult};
use crate::extractor::DescriptorExtractor;
use crate::model::DescriptorModel;
use augment_core::{Descriptor, GrayF32Image, ImageError, Keypoint};
use image::{ImageBuffer, Luma};
use log::debug;
use rayon::prelude::*;
use std::sync::Arc;

/// Keypoints of an image and their descriptors, index-aligned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDescription {
    width: u32,
    height: u32,
    keypoints: Vec<Keypoint>,
    descriptors: Vec<Descriptor>,
}

impl ImageDescription {
    pub fn new(
        width: u32,
        height: u32,
        keypoints: Vec<Keypoint>,
        descriptors: Vec<Descriptor>,
    ) -> DescriptorResult<Self> {
        if keypoints.len() != descriptors.len() {
            return Err(DescriptorError::LengthMismatch {
                keypoints: keypoints.len(),
                descriptors: descriptors.len(),
            });
        }
        Ok(Self {
            width,
            height,
            keypoints,
            descriptors,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Describes every keypoint of an image from a patch centred on it
#[derive(Debug, Clone)]
pub struct SceneDescriptorExtractor {
    extractor: DescriptorExtractor,
}

impl SceneDescriptorExtractor {
    pub fn new(model: Arc<DescriptorModel>) -> Self {
        Self {
            extractor: DescriptorExtractor::new(model),
        }
    }

    pub fn extractor(&self) -> &DescriptorExtractor {
        &self.extractor
    }

    /// One descriptor per keypoint, in keypoint order
    pub fn describe(&self, img: &GrayF32Image, keypoints: &[Keypoint]) -> DescriptorResult<Vec<Descriptor>> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height }.into());
        }
        if let Some(kp) = keypoints
            .iter()
            .find(|kp| kp.x < 0 || kp.y < 0 || kp.x >= width as i32 || kp.y >= height as i32)
        {
            return Err(DescriptorError::KeypointOutOfImage {
                x: kp.x,
                y: kp.y,
                width,
                height,
            });
        }

        let descriptors = keypoints
            .par_iter()
            .map(|kp| self.extractor.extract(&self.crop(img, *kp)))
            .collect::<DescriptorResult<Vec<_>>>()?;

        debug!("Described {} keypoints", descriptors.len());
        Ok(descriptors)
    }

    /// Describe and bundle into an [`ImageDescription`]
    pub fn describe_image(&self, img: &GrayF32Image, keypoints: Vec<Keypoint>) -> DescriptorResult<ImageDescription> {
        let descriptors = self.describe(img, &keypoints)?;
        ImageDescription::new(img.width(), img.height(), keypoints, descriptors)
    }

    /// Template-sized patch centred at `kp`, zero outside the image
    fn crop(&self, img: &GrayF32Image, kp: Keypoint) -> GrayF32Image {
        let (tw, th) = self.extractor.template_size();
        let x0 = kp.x as i64 - (tw / 2) as i64;
        let y0 = kp.y as i64 - (th / 2) as i64;
        let (w, h) = (img.width() as i64, img.height() as i64);

        ImageBuffer::from_fn(tw, th, |px, py| {
            let (x, y) = (x0 + px as i64, y0 + py as i64);
            if x >= 0 && y >= 0 && x < w && y < h {
                *img.get_pixel(x as u32, y as u32)
            } else {
                Luma([0.0])
            }
        })
    }
}
