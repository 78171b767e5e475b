//! High-level scene augmentation.
//!
//! A [`SceneAugmenter`] describes a planar source image once, then for each
//! target image detects and describes keypoints, matches them against the
//! source, fits a homography with RANSAC and paints the replacement image
//! over the located source object.
//!
//! ```no_run
//! use augment_cli::{AugmenterBuilder, Frame};
//! use augment_brief::DescriptorModel;
//! use std::sync::Arc;
//!
//! let model = Arc::new(DescriptorModel::load("model.bin")?);
//! let mut augmenter = AugmenterBuilder::new(model).preset_fast().build()?;
//!
//! let source = Frame::try_from(image::open("source.png")?)?;
//! let replacement = Frame::try_from(image::open("replacement.png")?)?;
//! augmenter.set_source_image(&source)?;
//! augmenter.set_replacement_image(&replacement)?;
//!
//! let target = Frame::try_from(image::open("frame_0001.png")?)?;
//! let augmented = augmenter.execute(&target)?;
//! augmented.to_dynamic().save("out.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod augmenter;
pub mod builder;
pub mod error;

pub use augment_core::{self, AugmentConfig, Frame, FrameKind};
pub use augmenter::SceneAugmenter;
pub use builder::AugmenterBuilder;
pub use error::{AugmenterError, AugmenterResult};
