//! Resampling of curve paths onto an evenly spaced x grid.

use crate::geom::{Point, distance};
use crate::path::PathData;
use crate::transform::AxisTransform;
use crate::{Error, Result};

/// Upper bound on grid values per path; finer steps are clamped to it.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Samples paths at a fixed pixel step along x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSampler {
    pixel_interval: f64,
}

impl PathSampler {
    /// Converts a real-unit interval into a pixel step using the x calibration.
    pub fn new(interval: f64, x: &AxisTransform) -> Result<Self> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(Error::InvalidOptions {
                message: format!("sampling interval must be finite and positive, got {interval}"),
            });
        }
        let slope = (x.apply(interval) - x.apply(0.0)) / interval;
        Self::with_pixel_interval((interval / slope).abs())
    }

    pub fn with_pixel_interval(pixel_interval: f64) -> Result<Self> {
        if !(pixel_interval.is_finite() && pixel_interval > 0.0) {
            return Err(Error::InvalidOptions {
                message: format!("pixel sampling step must be finite and positive, got {pixel_interval}"),
            });
        }
        Ok(Self { pixel_interval })
    }

    pub fn pixel_interval(&self) -> f64 {
        self.pixel_interval
    }

    /// Candidate x positions over `[min, max]`: `floor(width / step)` evenly spaced values,
    /// both ends included.
    pub fn grid(&self, min: f64, max: f64) -> Vec<f64> {
        let count = ((max - min).abs() / self.pixel_interval).floor();
        let n = if count > MAX_GRID_POINTS as f64 {
            tracing::warn!(
                requested = count,
                max = MAX_GRID_POINTS,
                "sampling grid too dense; clamping"
            );
            MAX_GRID_POINTS
        } else {
            count as usize
        };
        match n {
            0 => Vec::new(),
            1 => vec![min],
            _ => {
                let step = (max - min) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
                    .collect()
            }
        }
    }

    /// Samples `path` segment by segment, preserving the drawing direction of each segment.
    ///
    /// A path without extent on either axis yields no samples.
    pub fn sample(&self, path: &PathData) -> Vec<Point> {
        let Some(bounds) = path.bounds() else {
            return Vec::new();
        };
        if bounds.width() == 0.0 || bounds.height() == 0.0 {
            return Vec::new();
        }
        let xs = self.grid(bounds.min_x, bounds.max_x);
        let mut out: Vec<Point> = Vec::new();

        for segment in path.segments() {
            let seg_bounds = segment.bounds();
            let mut forward: Vec<Point> = Vec::new();
            let mut backward: Vec<Point> = Vec::new();

            for &x in xs.iter().filter(|x| seg_bounds.contains_x(**x)) {
                let hits = segment.vertical_intersections(x, bounds.min_y, bounds.max_y);
                if hits.len() > 2 {
                    tracing::trace!(x, hits = hits.len(), "dropping extra vertical intersections");
                }
                let mut hits = hits.into_iter();
                if let Some(p) = hits.next() {
                    forward.push(p);
                }
                if let Some(p) = hits.next() {
                    backward.push(p);
                }
            }

            // The second branch runs against the scan direction.
            forward.extend(backward.into_iter().rev());

            orient_from(segment.start(), &mut forward);
            out.extend(forward);
        }
        out
    }
}

/// Reverses `samples` unless the first one is strictly closer to `start` than the last.
pub(crate) fn orient_from(start: Point, samples: &mut [Point]) {
    // Short segments may not contain a single grid value.
    let (Some(&first), Some(&last)) = (samples.first(), samples.last()) else {
        return;
    };
    if distance(last, start) <= distance(first, start) {
        samples.reverse();
    }
}
