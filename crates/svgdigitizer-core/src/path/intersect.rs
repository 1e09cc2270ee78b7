use super::segment::{ArcSegment, Segment};
use crate::geom::Point;
use std::f64::consts::PI;

const PARAM_EPS: f64 = 1e-9;

/// Real roots of `a t^2 + b t + c`.
pub(crate) fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = b.abs().max(c.abs());
    if a.abs() <= 1e-12 * scale.max(1e-300) || a == 0.0 {
        if b.abs() <= f64::EPSILON * c.abs() || b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    let tol = 1e-12 * (b * b + (4.0 * a * c).abs() + 1.0);
    if disc < -tol {
        return Vec::new();
    }
    let s = disc.max(0.0).sqrt();
    if s == 0.0 {
        return vec![-b / (2.0 * a)];
    }
    vec![(-b + s) / (2.0 * a), (-b - s) / (2.0 * a)]
}

/// Real roots of `a t^3 + b t^2 + c t + d`, polished with a few Newton steps.
pub(crate) fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = b.abs().max(c.abs()).max(d.abs());
    if a == 0.0 || a.abs() <= 1e-12 * scale {
        return quadratic_roots(b, c, d);
    }

    let bn = b / a;
    let cn = c / a;
    let dn = d / a;
    let shift = bn / 3.0;
    let p = cn - bn * bn / 3.0;
    let q = 2.0 * bn * bn * bn / 27.0 - bn * cn / 3.0 + dn;
    let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    let mut roots: Vec<f64> = if disc.abs() <= 1e-14 * (1.0 + q * q + p.abs().powi(3)) {
        if p.abs() < 1e-14 {
            vec![0.0]
        } else {
            vec![3.0 * q / p, -3.0 * q / (2.0 * p)]
        }
    } else if disc > 0.0 {
        let sd = disc.sqrt();
        vec![(-q / 2.0 + sd).cbrt() + (-q / 2.0 - sd).cbrt()]
    } else {
        let r = (-p / 3.0).sqrt();
        let phi = (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0).acos();
        (0..3)
            .map(|k| 2.0 * r * ((phi + 2.0 * PI * k as f64) / 3.0).cos())
            .collect()
    };

    for root in &mut roots {
        let mut t = *root - shift;
        for _ in 0..3 {
            let f = ((a * t + b) * t + c) * t + d;
            let df = (3.0 * a * t + 2.0 * b) * t + c;
            if df.abs() < 1e-300 {
                break;
            }
            t -= f / df;
        }
        *root = t;
    }
    roots
}

/// Keeps parameters inside `[0, 1]` (with tolerance), sorted and deduplicated.
fn unit_params(mut ts: Vec<f64>) -> Vec<f64> {
    ts.retain(|t| t.is_finite() && *t >= -PARAM_EPS && *t <= 1.0 + PARAM_EPS);
    for t in &mut ts {
        *t = t.clamp(0.0, 1.0);
    }
    ts.sort_by(|a, b| a.total_cmp(b));
    ts.dedup_by(|a, b| (*a - *b).abs() <= PARAM_EPS);
    ts
}

fn arc_params(arc: &ArcSegment, x: f64) -> Vec<f64> {
    // x(theta) = cx + A cos(theta) + B sin(theta) = cx + R cos(theta - alpha)
    let a = arc.rx * arc.phi.cos();
    let b = -arc.ry * arc.phi.sin();
    let r = a.hypot(b);
    if r < 1e-12 {
        return Vec::new();
    }
    let c = (x - arc.center.x) / r;
    if c.abs() > 1.0 + PARAM_EPS {
        return Vec::new();
    }
    let alpha = b.atan2(a);
    let beta = c.clamp(-1.0, 1.0).acos();
    [alpha + beta, alpha - beta]
        .into_iter()
        .filter_map(|theta| arc.param_of_angle(theta))
        .collect()
}

impl Segment {
    /// Intersections with the vertical scan line `x = x` spanning `y_min..=y_max`, ordered by
    /// segment parameter.
    ///
    /// A line parallel to the scan line has no isolated intersection and yields nothing.
    pub fn vertical_intersections(&self, x: f64, y_min: f64, y_max: f64) -> Vec<Point> {
        let params = match *self {
            Segment::Line { from, to } => {
                let dx = to.x - from.x;
                if dx.abs() < 1e-12 {
                    Vec::new()
                } else {
                    vec![(x - from.x) / dx]
                }
            }
            Segment::Quadratic { from, ctrl, to } => {
                let a = from.x - 2.0 * ctrl.x + to.x;
                let b = 2.0 * (ctrl.x - from.x);
                quadratic_roots(a, b, from.x - x)
            }
            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                let (p0, p1, p2, p3) = (from.x, ctrl1.x, ctrl2.x, to.x);
                cubic_roots(
                    -p0 + 3.0 * p1 - 3.0 * p2 + p3,
                    3.0 * p0 - 6.0 * p1 + 3.0 * p2,
                    -3.0 * p0 + 3.0 * p1,
                    p0 - x,
                )
            }
            Segment::Arc(ref arc) => arc_params(arc, x),
        };

        let tol = 1e-9 * (1.0 + (y_max - y_min).abs());
        unit_params(params)
            .into_iter()
            .map(|t| self.point_at(t))
            .filter(|p| p.y >= y_min - tol && p.y <= y_max + tol)
            .collect()
    }
}
