//! Splits a document's `<path>` elements into curves and calibration markers.

use crate::document::{self, descendant_paths, is_element_named, is_layer};
use crate::geom::Point;
use crate::path::PathData;
use crate::{Error, Result};
use indexmap::IndexMap;
use roxmltree::{Document, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Curve,
    Marker,
}

/// Markers carry no text of their own, so the role is read off the tree structure: a marker is
/// the only path of a plain (non-layer) group. Editors drop the layer flag on plain-SVG export,
/// which is why a group holding several paths is treated as curve content too.
pub fn classify_path(path: Node<'_, '_>) -> PathRole {
    let Some(parent) = path.parent_element() else {
        return PathRole::Curve;
    };
    if !is_element_named(parent, "g") || is_layer(parent) {
        return PathRole::Curve;
    }
    if descendant_paths(parent).len() == 1 {
        PathRole::Marker
    } else {
        PathRole::Curve
    }
}

/// A drawn path to digitize.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePath {
    pub id: String,
    pub data: PathData,
}

impl CurvePath {
    pub fn new(id: impl Into<String>, data: PathData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// One pixel vertex per drawing command, in drawing order.
    pub fn raw_vertices(&self) -> Vec<Point> {
        self.data.start_vertices()
    }
}

/// Curve paths keyed by id, in document encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathRegistry {
    curves: IndexMap<String, CurvePath>,
    marker_count: usize,
}

impl PathRegistry {
    pub fn from_document(doc: &Document<'_>) -> Result<Self> {
        let mut out = Self::default();
        for (idx, node) in document::path_elements(doc).enumerate() {
            if classify_path(node) == PathRole::Marker {
                out.marker_count += 1;
                continue;
            }
            let id = node
                .attribute("id")
                .map(str::to_string)
                .unwrap_or_else(|| format!("path{idx}"));
            let d = node.attribute("d").unwrap_or_default();
            let data = PathData::parse(d).map_err(|e| match e {
                Error::Parse { message } => Error::parse(format!("curve {id:?}: {message}")),
                other => other,
            })?;
            if data.is_empty() {
                tracing::warn!(%id, "skipping curve path without geometry");
                continue;
            }
            out.insert(CurvePath::new(id, data));
        }
        tracing::debug!(
            curves = out.curves.len(),
            markers = out.marker_count,
            "classified paths"
        );
        Ok(out)
    }

    /// Adds a curve; a repeated id replaces the earlier geometry in place.
    pub fn insert(&mut self, curve: CurvePath) {
        if let Some(prev) = self.curves.insert(curve.id.clone(), curve) {
            tracing::warn!(id = %prev.id, "duplicate curve id; keeping the later geometry");
        }
    }

    pub fn curves(&self) -> impl Iterator<Item = &CurvePath> {
        self.curves.values()
    }

    pub fn curve(&self, id: &str) -> Option<&CurvePath> {
        self.curves.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn marker_count(&self) -> usize {
        self.marker_count
    }
}
