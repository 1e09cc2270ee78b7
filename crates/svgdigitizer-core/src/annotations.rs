//! Calibration annotations: text labels that tie pixel positions to real values.
//!
//! Three grammars are recognized, tried in this order (first match wins):
//!
//! - reference point: `x1: 0 mV`, `y2: 1.5`
//! - scale bar: `x_scale_bar: 10 s`, `ysb: 2`
//! - scaling factor: `x_scaling_factor: 1000`, `ysf: 2`
//!
//! Any other text is ignored.

use crate::axis::Axis;
use crate::document::{self, descendant_paths};
use crate::geom::{Point, distance};
use crate::path::PathData;
use crate::registry::{PathRole, classify_path};
use crate::{Error, Result};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use roxmltree::{Document, Node};
use std::sync::OnceLock;

/// A labelled pixel anchor with a known real value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    pub axis: Axis,
    /// `1` or `2`.
    pub index: u8,
    pub pixel_anchor: Point,
    pub real_value: f64,
    pub unit: Option<String>,
}

impl ReferencePoint {
    pub fn id(&self) -> String {
        format!("{}{}", self.axis, self.index)
    }
}

/// A marker pair spanning a known real-unit length along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    pub axis: Axis,
    pub pixel_length: f64,
    pub real_length: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingFactor {
    pub axis: Axis,
    pub multiplier: f64,
}

/// The grammar-level reading of an annotation text, before marker geometry is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationText {
    ReferencePoint {
        axis: Axis,
        index: u8,
        value: f64,
        unit: Option<String>,
    },
    ScaleBar {
        axis: Axis,
        value: f64,
        unit: Option<String>,
    },
    ScalingFactor {
        axis: Axis,
        value: f64,
    },
}

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

fn reference_point_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<axis>[xy])(?P<index>[12]):\s?(?P<value>{NUMBER})?\s?(?P<unit>.+)?"
        ))
        .expect("valid regex")
    })
}

fn scale_bar_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<axis>[xy])(?:_scale_bar|sb):\s?(?P<value>{NUMBER})?\s?(?P<unit>.+)?"
        ))
        .expect("valid regex")
    })
}

fn scaling_factor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<axis>[xy])(?:_scaling_factor|sf):\s?(?P<value>{NUMBER})?"
        ))
        .expect("valid regex")
    })
}

type Build = fn(&Captures<'_>, Axis, f64) -> AnnotationText;

struct Grammar {
    name: &'static str,
    regex: fn() -> &'static Regex,
    build: Build,
}

fn unit_of(caps: &Captures<'_>) -> Option<String> {
    caps.name("unit")
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty())
}

fn build_reference_point(caps: &Captures<'_>, axis: Axis, value: f64) -> AnnotationText {
    AnnotationText::ReferencePoint {
        axis,
        index: if &caps["index"] == "1" { 1 } else { 2 },
        value,
        unit: unit_of(caps),
    }
}

fn build_scale_bar(caps: &Captures<'_>, axis: Axis, value: f64) -> AnnotationText {
    AnnotationText::ScaleBar {
        axis,
        value,
        unit: unit_of(caps),
    }
}

fn build_scaling_factor(_: &Captures<'_>, axis: Axis, value: f64) -> AnnotationText {
    AnnotationText::ScalingFactor { axis, value }
}

// The order is significant: the first matching grammar wins.
const GRAMMARS: [Grammar; 3] = [
    Grammar {
        name: "reference point",
        regex: reference_point_regex,
        build: build_reference_point,
    },
    Grammar {
        name: "scale bar",
        regex: scale_bar_regex,
        build: build_scale_bar,
    },
    Grammar {
        name: "scaling factor",
        regex: scaling_factor_regex,
        build: build_scaling_factor,
    },
];

/// Classifies an annotation text. Returns `Ok(None)` for text matching no grammar.
pub fn classify(text: &str) -> Result<Option<AnnotationText>> {
    let text = text.trim();
    for grammar in &GRAMMARS {
        let Some(caps) = (grammar.regex)().captures(text) else {
            continue;
        };
        let Ok(axis) = caps["axis"].parse::<Axis>() else {
            continue;
        };
        let Some(raw) = caps.name("value") else {
            return Err(Error::parse(format!(
                "{} annotation {text:?} has no numeric value",
                grammar.name
            )));
        };
        let value = raw
            .as_str()
            .parse::<f64>()
            .map_err(|e| Error::parse(format!("invalid number in {text:?}: {e}")))?;
        return Ok(Some((grammar.build)(&caps, axis, value)));
    }
    Ok(None)
}

/// Resolved calibration annotations of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    reference_points: IndexMap<(Axis, u8), ReferencePoint>,
    scale_bars: IndexMap<Axis, ScaleBar>,
    scaling_factors: IndexMap<Axis, ScalingFactor>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans every `<text>` element of `doc` and resolves the calibration annotations found.
    pub fn extract(doc: &Document<'_>) -> Result<Self> {
        let mut out = Self::new();
        for text_node in document::text_elements(doc) {
            let content = document::text_content(text_node);
            let Some(annotation) = classify(&content)? else {
                continue;
            };
            match annotation {
                AnnotationText::ReferencePoint {
                    axis,
                    index,
                    value,
                    unit,
                } => {
                    let pixel_anchor = resolve_reference_anchor(text_node, &content)?;
                    out.insert_reference_point(ReferencePoint {
                        axis,
                        index,
                        pixel_anchor,
                        real_value: value,
                        unit,
                    });
                }
                AnnotationText::ScaleBar { axis, value, unit } => {
                    let pixel_length = resolve_scale_bar_length(text_node, &content, axis)?;
                    out.insert_scale_bar(ScaleBar {
                        axis,
                        pixel_length,
                        real_length: value,
                        unit,
                    });
                }
                AnnotationText::ScalingFactor { axis, value } => {
                    out.insert_scaling_factor(ScalingFactor {
                        axis,
                        multiplier: value,
                    });
                }
            }
        }
        Ok(out)
    }

    pub fn insert_reference_point(&mut self, point: ReferencePoint) {
        tracing::debug!(
            id = %point.id(),
            px = point.pixel_anchor.x,
            py = point.pixel_anchor.y,
            value = point.real_value,
            "resolved reference point"
        );
        if let Some(prev) = self
            .reference_points
            .insert((point.axis, point.index), point)
        {
            tracing::warn!(id = %prev.id(), "duplicate reference point; keeping the later one");
        }
    }

    pub fn insert_scale_bar(&mut self, bar: ScaleBar) {
        tracing::debug!(
            axis = %bar.axis,
            pixel_length = bar.pixel_length,
            real_length = bar.real_length,
            "resolved scale bar"
        );
        if let Some(prev) = self.scale_bars.insert(bar.axis, bar) {
            tracing::warn!(axis = %prev.axis, "duplicate scale bar; keeping the later one");
        }
    }

    pub fn insert_scaling_factor(&mut self, factor: ScalingFactor) {
        if let Some(prev) = self.scaling_factors.insert(factor.axis, factor) {
            tracing::warn!(axis = %prev.axis, "duplicate scaling factor; keeping the later one");
        }
    }

    pub fn reference_point(&self, axis: Axis, index: u8) -> Option<&ReferencePoint> {
        self.reference_points.get(&(axis, index))
    }

    pub fn reference_points(&self) -> impl Iterator<Item = &ReferencePoint> {
        self.reference_points.values()
    }

    pub fn scale_bar(&self, axis: Axis) -> Option<&ScaleBar> {
        self.scale_bars.get(&axis)
    }

    pub fn scale_bars(&self) -> impl Iterator<Item = &ScaleBar> {
        self.scale_bars.values()
    }

    /// The explicit multiplier for `axis`, `1` when none was given.
    pub fn scaling_factor(&self, axis: Axis) -> f64 {
        self.scaling_factors
            .get(&axis)
            .map(|f| f.multiplier)
            .unwrap_or(1.0)
    }
}

/// Of the marker's two endpoints, the one farther from the label position.
///
/// On an exact tie the path's end point wins.
pub fn far_endpoint(start: Point, end: Point, label: Point) -> Point {
    if distance(start, label) > distance(end, label) {
        start
    } else {
        end
    }
}

fn marker_far_endpoint(marker: Node<'_, '_>, content: &str, label: Point) -> Result<Point> {
    let Some(d) = marker.attribute("d") else {
        return Err(Error::malformed(content, "marker path has no `d` attribute"));
    };
    let data = PathData::parse(d)?;
    let (Some(start), Some(end)) = (data.start_point(), data.end_point()) else {
        return Err(Error::malformed(content, "marker path has no geometry"));
    };
    Ok(far_endpoint(start, end, label))
}

fn label_position(text_node: Node<'_, '_>, content: &str) -> Result<Point> {
    document::text_position(text_node)?
        .ok_or_else(|| Error::malformed(content, "text has no x/y position"))
}

fn resolve_reference_anchor(text_node: Node<'_, '_>, content: &str) -> Result<Point> {
    let label = label_position(text_node, content)?;
    // Curves sharing a layer with a stray label are never anchors.
    let marker = text_node
        .parent_element()
        .and_then(|group| descendant_paths(group).into_iter().next())
        .filter(|path| classify_path(*path) == PathRole::Marker)
        .ok_or_else(|| Error::malformed(content, "no marker path grouped with the label"))?;
    marker_far_endpoint(marker, content, label)
}

fn resolve_scale_bar_length(text_node: Node<'_, '_>, content: &str, axis: Axis) -> Result<f64> {
    let label = label_position(text_node, content)?;
    let Some(group) = text_node
        .parent_element()
        .and_then(|parent| parent.parent_element())
    else {
        return Err(Error::malformed(content, "scale bar label is not nested in a group"));
    };
    let markers = descendant_paths(group);
    let [first, second] = markers.as_slice() else {
        return Err(Error::malformed(
            content,
            format!("expected 2 scale bar marker paths, found {}", markers.len()),
        ));
    };
    if let Some(curve) = [first, second]
        .into_iter()
        .find(|path| classify_path(**path) != PathRole::Marker)
    {
        return Err(Error::malformed(
            content,
            format!(
                "scale bar path {:?} is not a lone path in its group",
                curve.attribute("id").unwrap_or_default()
            ),
        ));
    }
    let a = marker_far_endpoint(*first, content, label)?;
    let b = marker_far_endpoint(*second, content, label)?;
    Ok((axis.coord(b) - axis.coord(a)).abs())
}
