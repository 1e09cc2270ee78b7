mod digitizer;
mod sampler;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub(crate) const X_REFERENCE_MARKERS: &str = r#"
    <g><path d="M 0 110 L 0 100"/><text x="0" y="110"><tspan x="0" y="110">x1: 0</tspan></text></g>
    <g><path d="M 100 110 L 100 100"/><text x="100" y="110"><tspan x="100" y="110">x2: 50 s</tspan></text></g>
"#;

pub(crate) const Y_REFERENCE_MARKERS: &str = r#"
    <g><path d="M -10 100 L 0 100"/><text x="-10" y="100"><tspan x="-10" y="100">y1: 0</tspan></text></g>
    <g><path d="M -10 0 L 0 0"/><text x="-10" y="0"><tspan x="-10" y="0">y2: 10 mA</tspan></text></g>
"#;

/// An Inkscape-style document: everything lives in one layer.
///
/// With both marker sets the transforms are `x = 0.5 * px` and `y = -0.1 * (py - 100)`.
pub(crate) fn plot_svg(body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:groupmode="layer" id="layer1">
{body}
  </g>
</svg>"#
    )
}

pub(crate) fn calibrated_svg(curves: &str) -> String {
    plot_svg(&format!("{X_REFERENCE_MARKERS}{Y_REFERENCE_MARKERS}{curves}"))
}
