use super::{X_REFERENCE_MARKERS, approx_eq, calibrated_svg, plot_svg};
use crate::*;

const DIAGONAL: &str = r#"<path id="curve" d="M 0 100 L 50 50 L 100 0"/>"#;

fn assert_all_close(got: &[f64], expected: &[f64]) {
    assert_eq!(got.len(), expected.len(), "{got:?} vs {expected:?}");
    for (g, e) in got.iter().zip(expected) {
        assert!(approx_eq(*g, *e), "{got:?} vs {expected:?}");
    }
}

#[test]
fn raw_vertices_are_calibrated() {
    let digitizer = Digitizer::from_svg(&calibrated_svg(DIAGONAL), DigitizerOptions::default())
        .unwrap();
    assert!(digitizer.sampler().is_none());

    let series = digitizer.data_series();
    assert_eq!(series.len(), 1);
    let curve = &series[0];
    assert_eq!(curve.curve_id(), "curve");
    assert_all_close(&curve.xs(), &[0.0, 0.0, 25.0]);
    assert_all_close(&curve.ys(), &[0.0, 0.0, 5.0]);
}

#[test]
fn sampling_interval_resamples_in_real_units() {
    let options = DigitizerOptions::default()
        .with_labels("t", "I")
        .with_sampling_interval(10.0);
    let digitizer = Digitizer::from_svg(&calibrated_svg(DIAGONAL), options).unwrap();
    assert!(approx_eq(digitizer.sampler().unwrap().pixel_interval(), 20.0));

    let curve = digitizer.series("curve").unwrap();
    assert_eq!(curve.x_label(), "t");
    assert_all_close(&curve.column("t").unwrap(), &[0.0, 12.5, 25.0, 25.0, 37.5, 50.0]);
    assert_all_close(&curve.column("I").unwrap(), &[0.0, 2.5, 5.0, 5.0, 7.5, 10.0]);
    assert!(curve.column("U").is_none());
}

#[test]
fn scale_bar_calibrates_the_y_axis() {
    let svg = plot_svg(&format!(
        r#"{X_REFERENCE_MARKERS}
    <g><path d="M -10 100 L 0 100"/><text x="-10" y="100"><tspan x="-10" y="100">y1: 0</tspan></text></g>
    <g>
      <g><path d="M -20 100 L -5 100"/></g>
      <g><path d="M -20 0 L -5 0"/></g>
      <g><text x="-30" y="50"><tspan x="-30" y="50">ysb: 10</tspan></text></g>
    </g>
    {DIAGONAL}"#
    ));
    let digitizer = Digitizer::from_svg(&svg, DigitizerOptions::default()).unwrap();
    let y = digitizer.calibration().y;
    assert_eq!(y.mode(), CalibrationMode::ScaleBar);
    assert!(approx_eq(y.slope(), -0.1));
    assert_eq!(digitizer.registry().len(), 1);

    let curve = digitizer.series("curve").unwrap();
    assert_all_close(&curve.ys(), &[0.0, 0.0, 5.0]);
}

#[test]
fn curves_keep_document_order() {
    let curves = r#"<path id="b" d="M 0 0 L 10 10"/><path id="a" d="M 0 0 L 20 20"/>"#;
    let digitizer = Digitizer::from_svg(&calibrated_svg(curves), DigitizerOptions::default())
        .unwrap();
    let ids: Vec<String> = digitizer
        .data_series()
        .iter()
        .map(|s| s.curve_id().to_string())
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert!(digitizer.series("missing").is_none());
}

#[test]
fn missing_y_calibration_fails_the_document() {
    let svg = plot_svg(&format!("{X_REFERENCE_MARKERS}{DIAGONAL}"));
    let err = Digitizer::from_svg(&svg, DigitizerOptions::default()).unwrap_err();
    assert!(
        matches!(err, Error::Calibration { axis: Axis::Y, .. }),
        "{err}"
    );
}

#[test]
fn invalid_options_are_rejected_before_parsing() {
    let options = DigitizerOptions::default().with_sampling_interval(-1.0);
    let err = Digitizer::from_svg("not even xml", options).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions { .. }), "{err}");
}

#[test]
fn malformed_xml_is_reported() {
    let err = Digitizer::from_svg("<svg><g></svg>", DigitizerOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Xml(_)), "{err}");
}

#[test]
fn series_serializes_as_columns_and_rows() {
    let digitizer = Digitizer::from_svg(&calibrated_svg(DIAGONAL), DigitizerOptions::default())
        .unwrap();
    let value = serde_json::to_value(digitizer.data_series()).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "curve": "curve",
            "columns": ["x", "y"],
            "rows": [[0.0, 0.0], [0.0, 0.0], [25.0, 5.0]],
        }])
    );
}

#[test]
fn options_deserialize_from_camel_case_keys() {
    let options: DigitizerOptions =
        serde_json::from_str(r#"{"xlabel": "U", "samplingInterval": 0.5}"#).unwrap();
    assert_eq!(options.x_label, "U");
    assert_eq!(options.y_label, "y");
    assert_eq!(options.sampling_interval, Some(0.5));
}
