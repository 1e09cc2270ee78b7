use crate::geom::{Bounds, Point, point};
use std::f64::consts::PI;

/// An absolute drawing segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        from: Point,
        to: Point,
    },
    Quadratic {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Arc(ArcSegment),
}

/// Elliptical arc in center parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub from: Point,
    pub to: Point,
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// X-axis rotation in radians.
    pub phi: f64,
    pub theta1: f64,
    pub delta: f64,
}

impl ArcSegment {
    pub(crate) fn point_at_angle(&self, theta: f64) -> Point {
        let (cos_phi, sin_phi) = (self.phi.cos(), self.phi.sin());
        let (ct, st) = (theta.cos(), theta.sin());
        point(
            self.center.x + self.rx * ct * cos_phi - self.ry * st * sin_phi,
            self.center.y + self.rx * ct * sin_phi + self.ry * st * cos_phi,
        )
    }

    /// Maps an angle on the swept range to its segment parameter.
    pub(crate) fn param_of_angle(&self, theta: f64) -> Option<f64> {
        const EPS: f64 = 1e-9;
        if self.delta.abs() < EPS {
            return None;
        }
        let u = if self.delta >= 0.0 {
            normalize_angle(theta - self.theta1)
        } else {
            normalize_angle(self.theta1 - theta)
        };
        let span = self.delta.abs();
        let u = if u > 2.0 * PI - EPS { 0.0 } else { u };
        if u <= span + EPS {
            Some((u / span).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

impl Segment {
    /// Builds an arc from SVG endpoint parameters.
    ///
    /// Zero radii or coincident endpoints degrade to a straight line, as SVG renderers do.
    pub fn arc(
        from: Point,
        to: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Self {
        // SVG 1.1 implementation notes, F.6.5 endpoint-to-center conversion.
        if rx.abs() < 1e-12 || ry.abs() < 1e-12 || from == to {
            return Segment::Line { from, to };
        }

        let phi = x_axis_rotation_deg.to_radians();
        let (cos_phi, sin_phi) = (phi.cos(), phi.sin());
        let mut rx = rx.abs();
        let mut ry = ry.abs();

        let dx2 = (from.x - to.x) / 2.0;
        let dy2 = (from.y - to.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;
        let x1p2 = x1p * x1p;
        let y1p2 = y1p * y1p;

        let lam = x1p2 / (rx * rx) + y1p2 / (ry * ry);
        if lam > 1.0 {
            let s = lam.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = (rx2 * ry2) - (rx2 * y1p2) - (ry2 * x1p2);
        let den = (rx2 * y1p2) + (ry2 * x1p2);
        if den.abs() < 1e-24 {
            return Segment::Line { from, to };
        }
        let sq = (num / den).max(0.0);
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coef = sign * sq.sqrt();

        let cxp = coef * (rx * y1p) / ry;
        let cyp = coef * (-ry * x1p) / rx;
        let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;

        let theta1 = vec_angle(1.0, 0.0, ux, uy);
        let mut delta = vec_angle(ux, uy, vx, vy);
        if !sweep && delta > 0.0 {
            delta -= 2.0 * PI;
        } else if sweep && delta < 0.0 {
            delta += 2.0 * PI;
        }

        Segment::Arc(ArcSegment {
            from,
            to,
            center: point(cx, cy),
            rx,
            ry,
            phi,
            theta1,
            delta,
        })
    }

    pub fn start(&self) -> Point {
        match self {
            Segment::Line { from, .. }
            | Segment::Quadratic { from, .. }
            | Segment::Cubic { from, .. } => *from,
            Segment::Arc(arc) => arc.from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line { to, .. } | Segment::Quadratic { to, .. } | Segment::Cubic { to, .. } => {
                *to
            }
            Segment::Arc(arc) => arc.to,
        }
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        match *self {
            Segment::Line { from, to } => point(
                from.x + (to.x - from.x) * t,
                from.y + (to.y - from.y) * t,
            ),
            Segment::Quadratic { from, ctrl, to } => point(
                quadratic_eval(from.x, ctrl.x, to.x, t),
                quadratic_eval(from.y, ctrl.y, to.y, t),
            ),
            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => point(
                cubic_eval(from.x, ctrl1.x, ctrl2.x, to.x, t),
                cubic_eval(from.y, ctrl1.y, ctrl2.y, to.y, t),
            ),
            Segment::Arc(arc) => {
                if t <= 0.0 {
                    arc.from
                } else if t >= 1.0 {
                    arc.to
                } else {
                    arc.point_at_angle(arc.theta1 + t * arc.delta)
                }
            }
        }
    }

    /// Exact axis-aligned bounds, including interior extrema of curved segments.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::at(self.start());
        b.include_point(self.end());
        match *self {
            Segment::Line { .. } => {}
            Segment::Quadratic { from, ctrl, to } => {
                // Degree elevation keeps a single extrema routine.
                let ctrl1 = point(
                    from.x + (2.0 / 3.0) * (ctrl.x - from.x),
                    from.y + (2.0 / 3.0) * (ctrl.y - from.y),
                );
                let ctrl2 = point(
                    to.x + (2.0 / 3.0) * (ctrl.x - to.x),
                    to.y + (2.0 / 3.0) * (ctrl.y - to.y),
                );
                cubic_include_extrema(&mut b, from, ctrl1, ctrl2, to);
            }
            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => cubic_include_extrema(&mut b, from, ctrl1, ctrl2, to),
            Segment::Arc(arc) => arc_include_extrema(&mut b, &arc),
        }
        b
    }
}

pub(crate) fn quadratic_eval(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * p0 + 2.0 * mt * t * p1 + t * t * p2
}

pub(crate) fn cubic_eval(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let c = -3.0 * p0 + 3.0 * p1;
    ((a * t + b) * t + c) * t + p0
}

fn cubic_include_extrema(b: &mut Bounds, p0: Point, p1: Point, p2: Point, p3: Point) {
    let seg = Segment::Cubic {
        from: p0,
        ctrl1: p1,
        ctrl2: p2,
        to: p3,
    };
    for (c0, c1, c2, c3) in [(p0.x, p1.x, p2.x, p3.x), (p0.y, p1.y, p2.y, p3.y)] {
        // Roots of the derivative: 3a t^2 + 2b t + c.
        let a = -c0 + 3.0 * c1 - 3.0 * c2 + c3;
        let bb = 3.0 * c0 - 6.0 * c1 + 3.0 * c2;
        let c = -3.0 * c0 + 3.0 * c1;
        for t in super::intersect::quadratic_roots(3.0 * a, 2.0 * bb, c) {
            if t > 0.0 && t < 1.0 {
                b.include_point(seg.point_at(t));
            }
        }
    }
}

fn arc_include_extrema(b: &mut Bounds, arc: &ArcSegment) {
    let (cos_phi, sin_phi) = (arc.phi.cos(), arc.phi.sin());
    let tx_base = (-arc.ry * sin_phi).atan2(arc.rx * cos_phi);
    let ty_base = (arc.ry * cos_phi).atan2(arc.rx * sin_phi);
    for base in [tx_base, ty_base] {
        for k in 0..2 {
            let theta = base + (k as f64) * PI;
            if arc.param_of_angle(theta).is_some() {
                b.include_point(arc.point_at_angle(theta));
            }
        }
    }
}

pub(crate) fn normalize_angle(a: f64) -> f64 {
    let two_pi = 2.0 * PI;
    let mut a = a % two_pi;
    if a < 0.0 {
        a += two_pi;
    }
    a
}

fn vec_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let det = ux * vy - uy * vx;
    det.atan2(dot)
}
