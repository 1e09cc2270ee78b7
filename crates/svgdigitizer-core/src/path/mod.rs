//! SVG path-data geometry.
//!
//! Path strings are tokenized with `svgtypes` and normalized into absolute [`Segment`]s, one
//! per drawing command. Move-to commands carry no geometry but still count as a command, which
//! matters for the raw vertex list of a curve.

mod intersect;
mod segment;

pub use segment::{ArcSegment, Segment};

use crate::geom::{Bounds, Point, point};
use crate::{Error, Result};
use svgtypes::{PathParser, PathSegment};

/// One absolute drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MoveTo(Point),
    Draw(Segment),
}

impl Command {
    /// The point the pen is at when this command starts drawing.
    pub fn start(&self) -> Point {
        match self {
            Command::MoveTo(p) => *p,
            Command::Draw(seg) => seg.start(),
        }
    }
}

/// Parsed `d` attribute of a `<path>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    commands: Vec<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Cubic,
    Quadratic,
    Other,
}

impl PathData {
    pub fn parse(d: &str) -> Result<Self> {
        let mut commands: Vec<Command> = Vec::new();
        let mut cur = point(0.0, 0.0);
        let mut subpath_start = cur;
        let mut last_ctrl = cur;
        let mut prev = Prev::Other;

        for seg in PathParser::from(d) {
            let seg = seg.map_err(|e| Error::parse(format!("invalid path data {d:?}: {e}")))?;
            let rel = |abs: bool, x: f64, y: f64| {
                if abs {
                    point(x, y)
                } else {
                    point(cur.x + x, cur.y + y)
                }
            };

            let (cmd, next_prev) = match seg {
                PathSegment::MoveTo { abs, x, y } => {
                    let to = rel(abs, x, y);
                    subpath_start = to;
                    (Command::MoveTo(to), Prev::Other)
                }
                PathSegment::LineTo { abs, x, y } => {
                    let to = rel(abs, x, y);
                    (Command::Draw(Segment::Line { from: cur, to }), Prev::Other)
                }
                PathSegment::HorizontalLineTo { abs, x } => {
                    let to = point(if abs { x } else { cur.x + x }, cur.y);
                    (Command::Draw(Segment::Line { from: cur, to }), Prev::Other)
                }
                PathSegment::VerticalLineTo { abs, y } => {
                    let to = point(cur.x, if abs { y } else { cur.y + y });
                    (Command::Draw(Segment::Line { from: cur, to }), Prev::Other)
                }
                PathSegment::CurveTo {
                    abs,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    let ctrl1 = rel(abs, x1, y1);
                    let ctrl2 = rel(abs, x2, y2);
                    let to = rel(abs, x, y);
                    last_ctrl = ctrl2;
                    (
                        Command::Draw(Segment::Cubic {
                            from: cur,
                            ctrl1,
                            ctrl2,
                            to,
                        }),
                        Prev::Cubic,
                    )
                }
                PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                    let ctrl1 = reflect(prev == Prev::Cubic, cur, last_ctrl);
                    let ctrl2 = rel(abs, x2, y2);
                    let to = rel(abs, x, y);
                    last_ctrl = ctrl2;
                    (
                        Command::Draw(Segment::Cubic {
                            from: cur,
                            ctrl1,
                            ctrl2,
                            to,
                        }),
                        Prev::Cubic,
                    )
                }
                PathSegment::Quadratic { abs, x1, y1, x, y } => {
                    let ctrl = rel(abs, x1, y1);
                    let to = rel(abs, x, y);
                    last_ctrl = ctrl;
                    (
                        Command::Draw(Segment::Quadratic {
                            from: cur,
                            ctrl,
                            to,
                        }),
                        Prev::Quadratic,
                    )
                }
                PathSegment::SmoothQuadratic { abs, x, y } => {
                    let ctrl = reflect(prev == Prev::Quadratic, cur, last_ctrl);
                    let to = rel(abs, x, y);
                    last_ctrl = ctrl;
                    (
                        Command::Draw(Segment::Quadratic {
                            from: cur,
                            ctrl,
                            to,
                        }),
                        Prev::Quadratic,
                    )
                }
                PathSegment::EllipticalArc {
                    abs,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    let to = rel(abs, x, y);
                    let seg = Segment::arc(cur, to, rx, ry, x_axis_rotation, large_arc, sweep);
                    (Command::Draw(seg), Prev::Other)
                }
                PathSegment::ClosePath { .. } => (
                    Command::Draw(Segment::Line {
                        from: cur,
                        to: subpath_start,
                    }),
                    Prev::Other,
                ),
            };

            cur = match &cmd {
                Command::MoveTo(p) => *p,
                Command::Draw(seg) => seg.end(),
            };
            prev = next_prev;
            commands.push(cmd);
        }

        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drawing segments in path order (move-to commands skipped).
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(seg) => Some(seg),
            Command::MoveTo(_) => None,
        })
    }

    /// One vertex per command: the point each command starts at.
    pub fn start_vertices(&self) -> Vec<Point> {
        self.commands.iter().map(Command::start).collect()
    }

    /// The first point of the path.
    pub fn start_point(&self) -> Option<Point> {
        self.commands.first().map(Command::start)
    }

    /// The last point of the path.
    pub fn end_point(&self) -> Option<Point> {
        self.commands.last().map(|c| match c {
            Command::MoveTo(p) => *p,
            Command::Draw(seg) => seg.end(),
        })
    }

    /// Exact bounds of all drawn segments, curve extrema included.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut out: Option<Bounds> = None;
        for seg in self.segments() {
            let b = seg.bounds();
            match out.as_mut() {
                Some(cur) => cur.union(&b),
                None => out = Some(b),
            }
        }
        out
    }
}

fn reflect(smooth: bool, cur: Point, last_ctrl: Point) -> Point {
    if smooth {
        point(2.0 * cur.x - last_ctrl.x, 2.0 * cur.y - last_ctrl.y)
    } else {
        cur
    }
}
