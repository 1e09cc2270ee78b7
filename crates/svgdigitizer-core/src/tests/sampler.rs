use super::approx_eq;
use crate::geom::point;
use crate::path::PathData;
use crate::sampler::{MAX_GRID_POINTS, orient_from};
use crate::*;

fn sampler(step: f64) -> PathSampler {
    PathSampler::with_pixel_interval(step).unwrap()
}

#[test]
fn real_interval_becomes_a_pixel_step() {
    let x = AxisTransform::new(Axis::X, 0.5, 0.0, 0.0).unwrap();
    assert!(approx_eq(PathSampler::new(10.0, &x).unwrap().pixel_interval(), 20.0));

    // A decreasing axis still yields a positive step.
    let x = AxisTransform::new(Axis::X, -0.25, 40.0, 3.0).unwrap();
    assert!(approx_eq(PathSampler::new(1.0, &x).unwrap().pixel_interval(), 4.0));
}

#[test]
fn non_positive_intervals_are_rejected() {
    let x = AxisTransform::identity(Axis::X);
    for interval in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = PathSampler::new(interval, &x).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions { .. }), "{interval}: {err}");
    }
}

#[test]
fn grid_spans_both_ends() {
    let s = sampler(20.0);
    assert_eq!(s.grid(0.0, 100.0), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    assert_eq!(s.grid(0.0, 30.0), vec![0.0]);
    assert!(s.grid(0.0, 10.0).is_empty());
    assert_eq!(s.grid(5.0, 45.0), vec![5.0, 45.0]);
}

#[test]
fn diagonal_line_is_sampled_evenly() {
    let data = PathData::parse("M 0 0 L 10 10").unwrap();
    let samples = sampler(2.0).sample(&data);
    assert_eq!(samples.len(), 5);
    for (sample, expected) in samples.iter().zip([0.0, 2.5, 5.0, 7.5, 10.0]) {
        assert!(approx_eq(sample.x, expected), "{sample:?}");
        assert!(approx_eq(sample.y, expected), "{sample:?}");
    }
}

#[test]
fn drawing_direction_is_preserved() {
    let data = PathData::parse("M 10 10 L 0 0").unwrap();
    let samples = sampler(2.0).sample(&data);
    assert_eq!(samples.first(), Some(&point(10.0, 10.0)));
    assert_eq!(samples.last(), Some(&point(0.0, 0.0)));
}

#[test]
fn segment_joints_are_sampled_on_both_sides() {
    let data = PathData::parse("M 0 100 L 50 50 L 100 0").unwrap();
    let samples = sampler(20.0).sample(&data);
    assert_eq!(
        samples,
        vec![
            point(0.0, 100.0),
            point(25.0, 75.0),
            point(50.0, 50.0),
            point(50.0, 50.0),
            point(75.0, 25.0),
            point(100.0, 0.0),
        ]
    );
}

#[test]
fn folding_curve_runs_out_and_back() {
    let data = PathData::parse("M 0 0 C 10 0 10 10 0 10").unwrap();
    let samples = sampler(2.5).sample(&data);
    let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
    assert_eq!(samples.len(), 5, "{samples:?}");
    for (got, expected) in xs.iter().zip([0.0, 3.75, 7.5, 3.75, 0.0]) {
        assert!((got - expected).abs() < 1e-6, "{xs:?}");
    }
    assert!(approx_eq(samples[0].y, 0.0));
    assert!(samples[1].y < 5.0);
    assert!((samples[2].y - 5.0).abs() < 1e-6);
    assert!(samples[3].y > 5.0);
    assert!(approx_eq(samples[4].y, 10.0));
}

#[test]
fn segments_narrower_than_the_step_contribute_nothing() {
    let data = PathData::parse("M 0 0 L 50 0 L 51 5 L 100 5").unwrap();
    let samples = sampler(25.0).sample(&data);
    let ys: Vec<f64> = samples.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![0.0, 0.0, 5.0, 5.0], "{samples:?}");
}

#[test]
fn empty_path_yields_no_samples() {
    assert!(sampler(1.0).sample(&PathData::default()).is_empty());
    let only_move = PathData::parse("M 3 4").unwrap();
    assert!(sampler(1.0).sample(&only_move).is_empty());
}

#[test]
fn paths_without_extent_yield_no_samples() {
    let vertical = PathData::parse("M 5 0 L 5 10").unwrap();
    assert!(sampler(2.0).sample(&vertical).is_empty());

    let horizontal = PathData::parse("M 0 5 L 10 5").unwrap();
    assert!(sampler(2.0).sample(&horizontal).is_empty());
}

#[test]
fn equidistant_ends_are_reversed() {
    let start = point(5.0, 0.0);
    let mut samples = vec![point(0.0, 0.0), point(5.0, 5.0), point(10.0, 0.0)];
    orient_from(start, &mut samples);
    assert_eq!(
        samples,
        vec![point(10.0, 0.0), point(5.0, 5.0), point(0.0, 0.0)]
    );

    let mut samples = vec![point(5.0, 1.0), point(9.0, 9.0)];
    orient_from(start, &mut samples);
    assert_eq!(samples, vec![point(5.0, 1.0), point(9.0, 9.0)]);

    let mut empty: Vec<crate::geom::Point> = Vec::new();
    orient_from(start, &mut empty);
    assert!(empty.is_empty());
}

#[test]
fn dense_grids_are_clamped() {
    let xs = sampler(1e-9).grid(0.0, 1000.0);
    assert_eq!(xs.len(), MAX_GRID_POINTS);
    assert_eq!(xs.first(), Some(&0.0));
    assert_eq!(xs.last(), Some(&1000.0));
}
