use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use crate::surface::Surface;
use crate::symmetry::{AffineTransform, AffineTransformSet};
use crate::tools::ToolKind;

/// Samples per cubic segment when a path is flattened to a polyline
const BEZIER_STEPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub const ALL: [LineCap; 3] = [Self::Butt, Self::Round, Self::Square];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

impl LineJoin {
    pub const ALL: [LineJoin; 3] = [Self::Round, Self::Bevel, Self::Miter];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Bevel => "bevel",
            Self::Miter => "miter",
        }
    }
}

/// Style snapshot stored with every operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke_color: Color32,
    pub fill_color: Color32,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color32::from_rgba_unmultiplied(100, 100, 100, 255),
            fill_color: Color32::from_rgba_unmultiplied(200, 100, 100, 128),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            miter_limit: 10.0,
        }
    }
}

impl Style {
    /// Style used for on-canvas handles
    pub fn handle() -> Self {
        Self {
            stroke_color: Color32::from_rgb(70, 130, 220),
            fill_color: Color32::from_rgba_unmultiplied(70, 130, 220, 60),
            line_width: 1.0,
            ..Default::default()
        }
    }

    /// Returns a copy with the line width clamped to the allowed range.
    pub fn clamped(mut self) -> Self {
        self.line_width = if self.line_width.is_finite() {
            self.line_width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
        } else {
            MIN_LINE_WIDTH
        };
        self.miter_limit = self.miter_limit.max(1.0);
        self
    }
}

/// Geometry handed to a surface, already in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polyline {
        points: Vec<Pos2>,
        closed: bool,
        filled: bool,
    },
    Circle {
        center: Pos2,
        radius: f32,
        filled: bool,
    },
    /// Chain of cubic segments `[control1, control2, end]` starting at `start`
    Path {
        start: Pos2,
        segments: Vec<[Pos2; 3]>,
        filled: bool,
    },
}

impl Primitive {
    pub fn transformed(&self, t: &AffineTransform) -> Self {
        match self {
            Self::Polyline {
                points,
                closed,
                filled,
            } => Self::Polyline {
                points: points.iter().map(|p| t.apply(*p)).collect(),
                closed: *closed,
                filled: *filled,
            },
            Self::Circle {
                center,
                radius,
                filled,
            } => Self::Circle {
                center: t.apply(*center),
                radius: radius * t.scale_factor(),
                filled: *filled,
            },
            Self::Path {
                start,
                segments,
                filled,
            } => Self::Path {
                start: t.apply(*start),
                segments: segments
                    .iter()
                    .map(|seg| seg.map(|p| t.apply(p)))
                    .collect(),
                filled: *filled,
            },
        }
    }

    /// Polyline approximation of a path; other primitives return their points.
    pub fn flatten(&self) -> Vec<Pos2> {
        match self {
            Self::Polyline { points, .. } => points.clone(),
            Self::Circle { center, .. } => vec![*center],
            Self::Path {
                start, segments, ..
            } => {
                let mut points = Vec::with_capacity(1 + segments.len() * BEZIER_STEPS);
                points.push(*start);
                let mut from = *start;
                for [c1, c2, to] in segments {
                    for step in 1..=BEZIER_STEPS {
                        let s = step as f32 / BEZIER_STEPS as f32;
                        points.push(cubic_point(from, *c1, *c2, *to, s));
                    }
                    from = *to;
                }
                points
            }
        }
    }
}

fn cubic_point(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, s: f32) -> Pos2 {
    let u = 1.0 - s;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * s;
    let w2 = 3.0 * u * s * s;
    let w3 = s * s * s;
    Pos2::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PencilOp {
    pub points: Vec<Pos2>,
    #[serde(default)]
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOp {
    pub start: Pos2,
    pub end: Pos2,
    #[serde(default)]
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleOp {
    pub center: Pos2,
    pub radius: f32,
    #[serde(default)]
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyOp {
    /// Shared by every checkpoint of one polygon
    pub shape: Uuid,
    pub points: Vec<Pos2>,
    #[serde(default)]
    pub style: Style,
}

impl PolyOp {
    pub fn new(first: Pos2, style: Style) -> Self {
        Self {
            shape: Uuid::new_v4(),
            points: vec![first],
            style,
        }
    }
}

/// One anchor of a smooth path. The incoming handle mirrors `handle`
/// through the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub anchor: Pos2,
    pub handle: Pos2,
}

impl PathNode {
    pub fn at(anchor: Pos2) -> Self {
        Self {
            anchor,
            handle: anchor,
        }
    }

    pub fn in_handle(&self) -> Pos2 {
        self.anchor - (self.handle - self.anchor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOp {
    pub shape: Uuid,
    pub nodes: Vec<PathNode>,
    #[serde(default)]
    pub style: Style,
}

impl PathOp {
    pub fn new(first: Pos2, style: Style) -> Self {
        Self {
            shape: Uuid::new_v4(),
            nodes: vec![PathNode::at(first)],
            style,
        }
    }
}

/// A recorded, replayable drawing action.
///
/// Serialized as a record tagged by `tool`; `bezier` is accepted as an
/// older name for paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum DrawOperation {
    Pencil(PencilOp),
    Line(LineOp),
    Circle(CircleOp),
    Poly(PolyOp),
    #[serde(alias = "bezier")]
    Path(PathOp),
}

impl DrawOperation {
    /// The tool that builds and resumes this kind of operation
    pub fn tool(&self) -> ToolKind {
        match self {
            Self::Pencil(_) => ToolKind::Pencil,
            Self::Line(_) => ToolKind::Line,
            Self::Circle(_) => ToolKind::Circle,
            Self::Poly(_) => ToolKind::Poly,
            Self::Path(_) => ToolKind::Path,
        }
    }

    /// Identity of the multi-click shape this operation belongs to.
    pub fn shape(&self) -> Option<Uuid> {
        match self {
            Self::Poly(op) => Some(op.shape),
            Self::Path(op) => Some(op.shape),
            _ => None,
        }
    }

    /// True when `other` is a later state of the same multi-click shape.
    pub fn is_continued_by(&self, other: &DrawOperation) -> bool {
        matches!((self.shape(), other.shape()), (Some(a), Some(b)) if a == b)
    }

    pub fn style(&self) -> &Style {
        match self {
            Self::Pencil(op) => &op.style,
            Self::Line(op) => &op.style,
            Self::Circle(op) => &op.style,
            Self::Poly(op) => &op.style,
            Self::Path(op) => &op.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut Style {
        match self {
            Self::Pencil(op) => &mut op.style,
            Self::Line(op) => &mut op.style,
            Self::Circle(op) => &mut op.style,
            Self::Poly(op) => &mut op.style,
            Self::Path(op) => &mut op.style,
        }
    }

    /// Untransformed geometry of the operation
    pub fn primitives(&self) -> Vec<Primitive> {
        match self {
            Self::Pencil(op) => vec![Primitive::Polyline {
                points: op.points.clone(),
                closed: false,
                filled: false,
            }],
            Self::Line(op) => vec![Primitive::Polyline {
                points: vec![op.start, op.end],
                closed: false,
                filled: false,
            }],
            Self::Circle(op) => vec![Primitive::Circle {
                center: op.center,
                radius: op.radius,
                filled: true,
            }],
            Self::Poly(op) => vec![Primitive::Polyline {
                points: op.points.clone(),
                closed: true,
                filled: true,
            }],
            Self::Path(op) => {
                let Some(first) = op.nodes.first() else {
                    return Vec::new();
                };
                let segments = op
                    .nodes
                    .windows(2)
                    .map(|pair| [pair[0].handle, pair[1].in_handle(), pair[1].anchor])
                    .collect();
                vec![Primitive::Path {
                    start: first.anchor,
                    segments,
                    filled: true,
                }]
            }
        }
    }

    /// Draws every primitive once per transform in `transforms`.
    pub fn render(&self, transforms: &AffineTransformSet, surface: &mut dyn Surface) {
        let style = self.style();
        for primitive in self.primitives() {
            for t in transforms.iter() {
                surface.draw(&primitive.transformed(t), style);
            }
        }
    }
}
