//! Calibrated data series assembled from curve paths.

use crate::registry::CurvePath;
use crate::sampler::PathSampler;
use crate::transform::Calibration;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// An ordered `(x, y)` series in real units, with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    curve_id: String,
    x_label: String,
    y_label: String,
    points: Vec<(f64, f64)>,
}

impl DataSeries {
    pub fn new(
        curve_id: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            curve_id: curve_id.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            points,
        }
    }

    pub fn curve_id(&self) -> &str {
        &self.curve_id
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|(x, _)| *x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|(_, y)| *y).collect()
    }

    /// Looks a column up by its label.
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        if label == self.x_label {
            Some(self.xs())
        } else if label == self.y_label {
            Some(self.ys())
        } else {
            None
        }
    }
}

impl Serialize for DataSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<[f64; 2]> = self.points.iter().map(|(x, y)| [*x, *y]).collect();
        let mut s = serializer.serialize_struct("DataSeries", 3)?;
        s.serialize_field("curve", &self.curve_id)?;
        s.serialize_field("columns", &[self.x_label.as_str(), self.y_label.as_str()])?;
        s.serialize_field("rows", &rows)?;
        s.end()
    }
}

/// Turns curve paths into calibrated series.
#[derive(Debug, Clone)]
pub struct CurveAssembler<'a> {
    calibration: &'a Calibration,
    sampler: Option<PathSampler>,
    x_label: String,
    y_label: String,
}

impl<'a> CurveAssembler<'a> {
    pub fn new(calibration: &'a Calibration) -> Self {
        Self {
            calibration,
            sampler: None,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
        }
    }

    /// Resample curves instead of emitting their raw vertices.
    pub fn with_sampler(mut self, sampler: Option<PathSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn assemble(&self, curve: &CurvePath) -> DataSeries {
        let pixels = match &self.sampler {
            Some(sampler) => sampler.sample(&curve.data),
            None => curve.raw_vertices(),
        };
        let px: Vec<f64> = pixels.iter().map(|p| p.x).collect();
        let py: Vec<f64> = pixels.iter().map(|p| p.y).collect();
        let xs = self.calibration.x.apply_all(&px);
        let ys = self.calibration.y.apply_all(&py);

        DataSeries::new(
            curve.id.clone(),
            self.x_label.clone(),
            self.y_label.clone(),
            xs.into_iter().zip(ys).collect(),
        )
    }
}
