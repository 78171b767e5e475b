use crate::error::{AugmenterError, AugmenterResult};
use augment_brief::{CorrespondenceFinder, DescriptorModel, ImageDescription, SceneDescriptorExtractor};
use augment_core::frame::{color_f32_to_frame, to_color_f32, to_gray_f32};
use augment_core::{build_thread_pool, AugmentConfig, Frame};
use augment_fast::KeypointDetector;
use augment_geometry::{PointPairs, Transformation, TransformationFitter};
use image::imageops::{self, FilterType};
use image::Rgb32FImage;
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Paints a replacement image over a planar source object wherever it shows
/// up in a target image
///
/// Both the source and the replacement must be set before [`execute`].
/// When no sane fit is found the target comes back unchanged.
///
/// [`execute`]: SceneAugmenter::execute
pub struct SceneAugmenter {
    config: AugmentConfig,
    pool: rayon::ThreadPool,
    detector: KeypointDetector,
    scene_extractor: SceneDescriptorExtractor,
    finder: CorrespondenceFinder,
    fitter: TransformationFitter,
    source: Option<ImageDescription>,
    replacement: Option<Rgb32FImage>,
}

impl SceneAugmenter {
    pub fn new(model: Arc<DescriptorModel>, config: AugmentConfig) -> AugmenterResult<Self> {
        config.validate()?;

        let pool = build_thread_pool(config.n_threads)?;
        let detector = KeypointDetector::new(config.detector.clone())?;
        let fitter = TransformationFitter::new(config.ransac.clone())?;

        Ok(Self {
            pool,
            detector,
            scene_extractor: SceneDescriptorExtractor::new(model),
            finder: CorrespondenceFinder::new(config.min_top_distance),
            fitter,
            config,
            source: None,
            replacement: None,
        })
    }

    /// Load the descriptor model from disk and use the default configuration
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> AugmenterResult<Self> {
        let model = DescriptorModel::load(path)?;
        Self::new(Arc::new(model), AugmentConfig::default())
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Keypoints and descriptors of the current source image
    pub fn source_description(&self) -> Option<&ImageDescription> {
        self.source.as_ref()
    }

    pub fn set_source_image(&mut self, frame: &Frame) -> AugmenterResult<()> {
        frame.validate()?;
        let description = self.pool.install(|| self.describe(frame))?;
        debug!("Source image described by {} keypoints", description.len());
        self.source = Some(description);
        Ok(())
    }

    pub fn set_replacement_image(&mut self, frame: &Frame) -> AugmenterResult<()> {
        frame.validate()?;
        self.replacement = Some(to_color_f32(frame));
        Ok(())
    }

    /// Augment `target`, returning a frame of the same size and pixel kind
    pub fn execute(&self, target: &Frame) -> AugmenterResult<Frame> {
        target.validate()?;
        let source = self.source.as_ref().ok_or(AugmenterError::SourceNotSet)?;
        let replacement = self.replacement.as_ref().ok_or(AugmenterError::ReplacementNotSet)?;

        self.pool.install(|| {
            let transformation = self.fit_target(target, source)?;
            Ok(self.apply_transformation(target, source, replacement, &transformation))
        })
    }

    fn fit_target(&self, target: &Frame, source: &ImageDescription) -> AugmenterResult<Transformation> {
        let described = self.describe(target)?;
        let correspondences = self.finder.find(source.descriptors(), described.descriptors());
        debug!(
            "{} correspondences between {} source and {} target keypoints",
            correspondences.len(),
            source.len(),
            described.len()
        );

        let pairs = PointPairs::from_correspondences(source.keypoints(), described.keypoints(), &correspondences)?;
        Ok(self.fitter.fit(&pairs))
    }

    fn describe(&self, frame: &Frame) -> AugmenterResult<ImageDescription> {
        let gray = to_gray_f32(frame);
        let keypoints = self.detector.detect(&gray)?;
        Ok(self.scene_extractor.describe_image(&gray, keypoints)?)
    }

    /// Stretch the replacement over the source extent and warp it into the target
    ///
    /// Any fallback returns the exact input frame.
    fn apply_transformation(
        &self,
        target: &Frame,
        source: &ImageDescription,
        replacement: &Rgb32FImage,
        transformation: &Transformation,
    ) -> Frame {
        if !transformation.is_valid() {
            debug!("No transformation found, returning target unchanged");
            return target.clone();
        }

        let (sw, sh) = source.dimensions();
        let scaled = if replacement.dimensions() == (sw, sh) {
            replacement.clone()
        } else {
            imageops::resize(replacement, sw, sh, FilterType::Triangle)
        };

        match transformation.try_augment(&to_color_f32(target), &scaled) {
            Some(augmented) => color_f32_to_frame(&augmented, target.kind()),
            None => target.clone(),
        }
    }
}
