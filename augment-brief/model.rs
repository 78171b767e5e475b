//! Rotation-bucketed sampling model and its binary file format.
//!
//! Layout, all little-endian:
//!
//! ```text
//! i32 template_width, i32 template_height
//! u32 num_buckets
//! num_buckets x { 128 x (i32 x, i32 y) points1, 128 x (i32 x, i32 y) points2 }
//! ```

use crate::error::{DescriptorError, DescriptorResult};
use augment_core::{Point, DESCRIPTOR_BITS};
use std::path::Path;

/// Bytes before the first bucket
pub const HEADER_BYTES: usize = 3 * 4;
/// Bytes per bucket, two point sets of `DESCRIPTOR_BITS` points
pub const BUCKET_BYTES: usize = 2 * DESCRIPTOR_BITS * 2 * 4;

/// Point pairs compared by the descriptor at one orientation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorModelAtAngle {
    pub points1: Vec<Point>,
    pub points2: Vec<Point>,
}

/// Sampling pairs for every orientation bucket of a fixed-size template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorModel {
    template_width: u32,
    template_height: u32,
    buckets: Vec<DescriptorModelAtAngle>,
}

impl DescriptorModel {
    /// Build a model, checking every point against the template bounds
    pub fn new(
        template_width: u32,
        template_height: u32,
        buckets: Vec<DescriptorModelAtAngle>,
    ) -> DescriptorResult<Self> {
        if template_width == 0 || template_height == 0 {
            return Err(DescriptorError::InvalidTemplateSize {
                width: template_width as i64,
                height: template_height as i64,
            });
        }
        if buckets.is_empty() {
            return Err(DescriptorError::NoBuckets);
        }

        for (bucket, at_angle) in buckets.iter().enumerate() {
            for points in [&at_angle.points1, &at_angle.points2] {
                if points.len() != DESCRIPTOR_BITS {
                    return Err(DescriptorError::WrongPointCount {
                        bucket,
                        expected: DESCRIPTOR_BITS,
                        actual: points.len(),
                    });
                }
                if let Some(p) = points.iter().find(|p| {
                    p.x < 0 || p.y < 0 || p.x >= template_width as i32 || p.y >= template_height as i32
                }) {
                    return Err(DescriptorError::PointOutOfTemplate {
                        bucket,
                        x: p.x,
                        y: p.y,
                        width: template_width,
                        height: template_height,
                    });
                }
            }
        }

        Ok(Self {
            template_width,
            template_height,
            buckets,
        })
    }

    /// Patch size the model samples from
    pub fn template_size(&self) -> (u32, u32) {
        (self.template_width, self.template_height)
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, index: usize) -> &DescriptorModelAtAngle {
        &self.buckets[index]
    }

    pub fn buckets(&self) -> &[DescriptorModelAtAngle] {
        &self.buckets
    }

    /// Size in bytes of a serialized model with `num_buckets` buckets
    pub fn encoded_len(num_buckets: usize) -> Option<usize> {
        num_buckets
            .checked_mul(BUCKET_BYTES)
            .and_then(|n| n.checked_add(HEADER_BYTES))
    }

    /// Parse a serialized model; the stream must be consumed exactly
    pub fn from_bytes(bytes: &[u8]) -> DescriptorResult<Self> {
        let mut reader = Reader::new(bytes);

        let width = reader.read_i32()?;
        let height = reader.read_i32()?;
        if width <= 0 || height <= 0 {
            return Err(DescriptorError::InvalidTemplateSize {
                width: width as i64,
                height: height as i64,
            });
        }
        let num_buckets = reader.read_u32()? as usize;

        let expected = Self::encoded_len(num_buckets).unwrap_or(usize::MAX);
        if bytes.len() < expected {
            return Err(DescriptorError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(DescriptorError::TrailingBytes {
                expected,
                actual: bytes.len(),
            });
        }

        let mut buckets = Vec::with_capacity(num_buckets);
        for _ in 0..num_buckets {
            let points1 = reader.read_points(DESCRIPTOR_BITS)?;
            let points2 = reader.read_points(DESCRIPTOR_BITS)?;
            buckets.push(DescriptorModelAtAngle { points1, points2 });
        }

        Self::new(width as u32, height as u32, buckets)
    }

    /// Serialize into the binary layout read by [`DescriptorModel::from_bytes`]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::encoded_len(self.buckets.len()).unwrap_or(0));
        out.extend_from_slice(&(self.template_width as i32).to_le_bytes());
        out.extend_from_slice(&(self.template_height as i32).to_le_bytes());
        out.extend_from_slice(&(self.buckets.len() as u32).to_le_bytes());
        for at_angle in &self.buckets {
            for p in at_angle.points1.iter().chain(at_angle.points2.iter()) {
                out.extend_from_slice(&p.x.to_le_bytes());
                out.extend_from_slice(&p.y.to_le_bytes());
            }
        }
        out
    }

    /// Load a model file
    pub fn load<P: AsRef<Path>>(path: P) -> DescriptorResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Write a model file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> DescriptorResult<()> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take4(&mut self) -> DescriptorResult<[u8; 4]> {
        let end = self.pos + 4;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or(DescriptorError::Truncated {
                expected: end.max(HEADER_BYTES),
                actual: self.bytes.len(),
            })?;
        self.pos = end;
        Ok([chunk[0], chunk[1], chunk[2], chunk[3]])
    }

    fn read_i32(&mut self) -> DescriptorResult<i32> {
        Ok(i32::from_le_bytes(self.take4()?))
    }

    fn read_u32(&mut self) -> DescriptorResult<u32> {
        Ok(u32::from_le_bytes(self.take4()?))
    }

    fn read_points(&mut self, count: usize) -> DescriptorResult<Vec<Point>> {
        (0..count)
            .map(|_| -> DescriptorResult<Point> {
                let x = self.read_i32()?;
                let y = self.read_i32()?;
                Ok(Point::new(x, y))
            })
            .collect()
    }
}
