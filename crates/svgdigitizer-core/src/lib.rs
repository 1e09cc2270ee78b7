#![forbid(unsafe_code)]

//! Headless digitizer for hand-annotated SVG plots.
//!
//! A plot is traced in a vector editor: curves are drawn as paths, and each axis is calibrated
//! with labelled marker paths (`x1: 0`, `x2: 10`, or a scale bar such as `ysb: 5 mA`).
//! [`Digitizer`] resolves those annotations once, builds one affine pixel→real transform per
//! axis, and turns every curve path into a [`DataSeries`] in real units.
//!
//! ```no_run
//! use svgdigitizer_core::{Digitizer, DigitizerOptions};
//!
//! let svg = std::fs::read_to_string("plot.svg")?;
//! let digitizer = Digitizer::from_svg(&svg, DigitizerOptions::default().with_sampling_interval(0.01))?;
//! for series in digitizer.data_series() {
//!     println!("{}: {} points", series.curve_id(), series.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotations;
pub mod axis;
pub mod document;
pub mod error;
pub mod geom;
pub mod path;
pub mod registry;
pub mod sampler;
pub mod series;
pub mod transform;

pub use annotations::{Annotations, ReferencePoint, ScaleBar, ScalingFactor};
pub use axis::Axis;
pub use error::{Error, Result};
pub use registry::{CurvePath, PathRegistry};
pub use sampler::PathSampler;
pub use series::{CurveAssembler, DataSeries};
pub use transform::{AxisTransform, Calibration, CalibrationMode};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitizerOptions {
    /// Name of the x column. Has no effect on the numbers.
    #[serde(rename = "xlabel")]
    pub x_label: String,
    #[serde(rename = "ylabel")]
    pub y_label: String,
    /// Real-unit spacing for resampling along x. Raw path vertices are emitted when `None`.
    #[serde(rename = "samplingInterval")]
    pub sampling_interval: Option<f64>,
}

impl Default for DigitizerOptions {
    fn default() -> Self {
        Self {
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            sampling_interval: None,
        }
    }
}

impl DigitizerOptions {
    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_sampling_interval(mut self, interval: f64) -> Self {
        self.sampling_interval = Some(interval);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(interval) = self.sampling_interval {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(Error::InvalidOptions {
                    message: format!(
                        "samplingInterval must be finite and positive, got {interval}"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// A loaded document: calibration and curve classification are resolved once, up front.
#[derive(Debug, Clone)]
pub struct Digitizer {
    options: DigitizerOptions,
    annotations: Annotations,
    calibration: Calibration,
    registry: PathRegistry,
    sampler: Option<PathSampler>,
}

impl Digitizer {
    /// Parses and resolves an SVG document.
    ///
    /// Any calibration or geometry problem fails the whole document; there is no partial result.
    pub fn from_svg(text: &str, options: DigitizerOptions) -> Result<Self> {
        options.validate()?;
        let doc = document::parse_document(text)?;
        let annotations = Annotations::extract(&doc)?;
        let calibration = Calibration::from_annotations(&annotations)?;
        let registry = PathRegistry::from_document(&doc)?;
        let sampler = options
            .sampling_interval
            .map(|interval| PathSampler::new(interval, &calibration.x))
            .transpose()?;

        Ok(Self {
            options,
            annotations,
            calibration,
            registry,
            sampler,
        })
    }

    pub fn options(&self) -> &DigitizerOptions {
        &self.options
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    pub fn sampler(&self) -> Option<&PathSampler> {
        self.sampler.as_ref()
    }

    pub fn assembler(&self) -> CurveAssembler<'_> {
        CurveAssembler::new(&self.calibration)
            .with_sampler(self.sampler)
            .with_labels(self.options.x_label.clone(), self.options.y_label.clone())
    }

    /// One series per curve, in document order.
    pub fn data_series(&self) -> Vec<DataSeries> {
        let assembler = self.assembler();
        self.registry
            .curves()
            .map(|curve| assembler.assemble(curve))
            .collect()
    }

    pub fn series(&self, curve_id: &str) -> Option<DataSeries> {
        let curve = self.registry.curve(curve_id)?;
        Some(self.assembler().assemble(curve))
    }
}

#[cfg(test)]
mod tests;
