//! Per-axis affine pixel→real calibration.

use crate::annotations::Annotations;
use crate::axis::Axis;
use crate::{Error, Result};

/// Which annotations produced a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMode {
    /// Two reference points on the axis.
    ReferencePoints,
    /// A scale bar for the slope, reference point 1 as the origin.
    ScaleBar,
}

/// `real = slope * (pixel - pixel_anchor) + real_anchor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    axis: Axis,
    slope: f64,
    pixel_anchor: f64,
    real_anchor: f64,
    mode: CalibrationMode,
}

impl AxisTransform {
    /// Builds a transform directly from its parameters.
    ///
    /// The slope must be finite and nonzero.
    pub fn new(axis: Axis, slope: f64, pixel_anchor: f64, real_anchor: f64) -> Result<Self> {
        Self::checked(
            axis,
            slope,
            pixel_anchor,
            real_anchor,
            CalibrationMode::ReferencePoints,
        )
    }

    /// Unit slope anchored at the origin: pixels are passed through unchanged.
    pub fn identity(axis: Axis) -> Self {
        Self {
            axis,
            slope: 1.0,
            pixel_anchor: 0.0,
            real_anchor: 0.0,
            mode: CalibrationMode::ReferencePoints,
        }
    }

    fn checked(
        axis: Axis,
        slope: f64,
        pixel_anchor: f64,
        real_anchor: f64,
        mode: CalibrationMode,
    ) -> Result<Self> {
        if !slope.is_finite() || slope == 0.0 {
            return Err(Error::Calibration {
                axis,
                reason: format!("slope must be finite and nonzero, got {slope}"),
            });
        }
        Ok(Self {
            axis,
            slope,
            pixel_anchor,
            real_anchor,
            mode,
        })
    }

    /// Derives the calibration of `axis` from resolved annotations.
    ///
    /// Two reference points are preferred. Otherwise a scale bar provides the slope and
    /// reference point 1 the origin; the scale-bar slope is negated because the document's
    /// vertical pixel axis runs opposite to the data axis.
    pub fn from_annotations(annotations: &Annotations, axis: Axis) -> Result<Self> {
        let factor = annotations.scaling_factor(axis);
        let first = annotations.reference_point(axis, 1);
        let second = annotations.reference_point(axis, 2);

        if let (Some(p1), Some(p2)) = (first, second) {
            let px1 = axis.coord(p1.pixel_anchor);
            let px2 = axis.coord(p2.pixel_anchor);
            if px2 - px1 == 0.0 {
                return Err(Error::DegenerateGeometry {
                    axis,
                    reason: format!(
                        "reference points {} and {} share pixel coordinate {px1}",
                        p1.id(),
                        p2.id()
                    ),
                });
            }
            let slope = (p2.real_value - p1.real_value) / (px2 - px1) / factor;
            tracing::debug!(%axis, slope, "calibrated from reference points");
            return Self::checked(
                axis,
                slope,
                px1,
                p1.real_value,
                CalibrationMode::ReferencePoints,
            );
        }

        match (annotations.scale_bar(axis), first) {
            (Some(bar), Some(p1)) => {
                if bar.pixel_length == 0.0 {
                    return Err(Error::DegenerateGeometry {
                        axis,
                        reason: "scale bar markers share the same pixel coordinate".to_string(),
                    });
                }
                let slope = -(bar.real_length / bar.pixel_length) / factor;
                tracing::debug!(%axis, slope, "calibrated from scale bar");
                Self::checked(
                    axis,
                    slope,
                    axis.coord(p1.pixel_anchor),
                    p1.real_value,
                    CalibrationMode::ScaleBar,
                )
            }
            (Some(_), None) => Err(Error::Calibration {
                axis,
                reason: format!("a scale bar needs reference point {axis}1 as its origin"),
            }),
            (None, _) => Err(Error::Calibration {
                axis,
                reason: format!("expected reference points {axis}1 and {axis}2, or a scale bar"),
            }),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn pixel_anchor(&self) -> f64 {
        self.pixel_anchor
    }

    pub fn real_anchor(&self) -> f64 {
        self.real_anchor
    }

    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    pub fn apply(&self, pixel: f64) -> f64 {
        self.slope * (pixel - self.pixel_anchor) + self.real_anchor
    }

    pub fn apply_all(&self, pixels: &[f64]) -> Vec<f64> {
        pixels.iter().map(|p| self.apply(*p)).collect()
    }

    /// Maps a real value back to pixel space.
    pub fn invert(&self, real: f64) -> f64 {
        (real - self.real_anchor) / self.slope + self.pixel_anchor
    }
}

/// The pair of axis transforms for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub x: AxisTransform,
    pub y: AxisTransform,
}

impl Calibration {
    pub fn from_annotations(annotations: &Annotations) -> Result<Self> {
        Ok(Self {
            x: AxisTransform::from_annotations(annotations, Axis::X)?,
            y: AxisTransform::from_annotations(annotations, Axis::Y)?,
        })
    }

    pub fn identity() -> Self {
        Self {
            x: AxisTransform::identity(Axis::X),
            y: AxisTransform::identity(Axis::Y),
        }
    }

    pub fn get(&self, axis: Axis) -> &AxisTransform {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}
