use egui::{Color32, Painter, Pos2, Shape, Stroke, Vec2};

use crate::operation::{LineCap, LineJoin, Primitive, Style};

/// Sink for transformed primitives.
pub trait Surface {
    fn clear(&mut self);
    fn draw(&mut self, primitive: &Primitive, style: &Style);
}

/// Collects `egui` shapes in canvas coordinates.
#[derive(Debug, Default, Clone)]
pub struct ShapeSurface {
    shapes: Vec<Shape>,
}

impl ShapeSurface {
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Paints the collected shapes with the canvas origin at `offset`.
    pub fn paint(&self, painter: &Painter, offset: Vec2) {
        painter.extend(self.shapes.iter().cloned().map(|mut shape| {
            shape.translate(offset);
            shape
        }));
    }

    fn push_outline(&mut self, points: Vec<Pos2>, closed: bool, filled: bool, style: &Style) {
        let stroke = Stroke::new(style.line_width, style.stroke_color);
        match points.len() {
            0 => {}
            1 => self.shapes.push(Shape::circle_filled(
                points[0],
                style.line_width / 2.0,
                style.stroke_color,
            )),
            _ if filled && points.len() > 2 => {
                self.shapes
                    .push(Shape::convex_polygon(points, style.fill_color, stroke));
            }
            _ if closed => self.shapes.push(Shape::closed_line(points, stroke)),
            _ => self.shapes.push(Shape::line(points, stroke)),
        }
    }
}

impl Surface for ShapeSurface {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn draw(&mut self, primitive: &Primitive, style: &Style) {
        match primitive {
            Primitive::Polyline {
                points,
                closed,
                filled,
            } => self.push_outline(points.clone(), *closed, *filled, style),
            Primitive::Circle {
                center,
                radius,
                filled,
            } => {
                let fill = if *filled {
                    style.fill_color
                } else {
                    Color32::TRANSPARENT
                };
                self.shapes.push(Shape::circle_filled(*center, *radius, fill));
                self.shapes.push(Shape::circle_stroke(
                    *center,
                    *radius,
                    Stroke::new(style.line_width, style.stroke_color),
                ));
            }
            Primitive::Path { filled, .. } => {
                self.push_outline(primitive.flatten(), false, *filled, style);
            }
        }
    }
}

/// Builds a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f32,
    height: f32,
    /// Added to every coordinate before it is written
    offset: Vec2,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
            body: String::new(),
        }
    }

    /// Shifts all output so that `origin` lands at the document's top-left.
    pub fn with_origin(mut self, origin: Pos2) -> Self {
        self.offset = -origin.to_vec2();
        self
    }

    fn pt(&self, p: Pos2) -> Pos2 {
        p + self.offset
    }

    pub fn finish(self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn svg_paint(color: Color32) -> (String, f32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    (format!("rgb({r},{g},{b})"), a as f32 / 255.0)
}

fn svg_style(style: &Style, filled: bool) -> String {
    let (stroke, stroke_opacity) = svg_paint(style.stroke_color);
    let fill = if filled {
        let (fill, fill_opacity) = svg_paint(style.fill_color);
        format!("fill=\"{fill}\" fill-opacity=\"{fill_opacity}\"")
    } else {
        "fill=\"none\"".to_owned()
    };
    format!(
        "{fill} stroke=\"{stroke}\" stroke-opacity=\"{stroke_opacity}\" \
         stroke-width=\"{}\" stroke-linecap=\"{}\" stroke-linejoin=\"{}\" \
         stroke-miterlimit=\"{}\"",
        style.line_width,
        style.line_cap.name(),
        style.line_join.name(),
        style.miter_limit
    )
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.body.clear();
    }

    fn draw(&mut self, primitive: &Primitive, style: &Style) {
        let element = match primitive {
            Primitive::Polyline {
                points,
                closed,
                filled,
            } => {
                if points.is_empty() {
                    return;
                }
                let coords: Vec<String> = points
                    .iter()
                    .map(|p| {
                        let p = self.pt(*p);
                        format!("{},{}", p.x, p.y)
                    })
                    .collect();
                let tag = if *closed { "polygon" } else { "polyline" };
                format!(
                    "<{tag} points=\"{}\" {}/>",
                    coords.join(" "),
                    svg_style(style, *filled)
                )
            }
            Primitive::Circle {
                center,
                radius,
                filled,
            } => {
                let c = self.pt(*center);
                format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
                    c.x,
                    c.y,
                    radius,
                    svg_style(style, *filled)
                )
            }
            Primitive::Path {
                start,
                segments,
                filled,
            } => {
                let s = self.pt(*start);
                let mut d = format!("M {} {}", s.x, s.y);
                for [c1, c2, to] in segments {
                    let (c1, c2, to) = (self.pt(*c1), self.pt(*c2), self.pt(*to));
                    d.push_str(&format!(
                        " C {} {} {} {} {} {}",
                        c1.x, c1.y, c2.x, c2.y, to.x, to.y
                    ));
                }
                format!("<path d=\"{d}\" {}/>", svg_style(style, *filled))
            }
        };
        self.body.push_str(&element);
        self.body.push('\n');
    }
}

/// Rasterizes into an RGBA pixmap.
pub struct PixmapSurface {
    pixmap: tiny_skia::Pixmap,
    transform: tiny_skia::Transform,
}

impl PixmapSurface {
    /// A `width`×`height` pixel image showing the canvas from `origin`,
    /// magnified by `scale`. `None` for an empty size.
    pub fn new(width: u32, height: u32, origin: Pos2, scale: f32) -> Option<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height)?;
        let transform =
            tiny_skia::Transform::from_translate(-origin.x, -origin.y).post_scale(scale, scale);
        Some(Self { pixmap, transform })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha copy of the pixels.
    pub fn into_image(self) -> image::RgbaImage {
        let width = self.pixmap.width();
        let pixels = self.pixmap.pixels();
        image::RgbaImage::from_fn(width, self.pixmap.height(), |x, y| {
            let c = pixels[(y * width + x) as usize].demultiply();
            image::Rgba([c.red(), c.green(), c.blue(), c.alpha()])
        })
    }

    fn paint(color: Color32) -> tiny_skia::Paint<'static> {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::from_rgba8(r, g, b, a));
        paint.anti_alias = true;
        paint
    }

    fn stroke(style: &Style) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: style.line_width,
            line_cap: match style.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.line_join {
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
            },
            miter_limit: style.miter_limit,
            ..Default::default()
        }
    }

    fn fill_and_stroke(&mut self, path: &tiny_skia::Path, filled: bool, style: &Style) {
        if filled {
            self.pixmap.fill_path(
                path,
                &Self::paint(style.fill_color),
                tiny_skia::FillRule::Winding,
                self.transform,
                None,
            );
        }
        self.pixmap.stroke_path(
            path,
            &Self::paint(style.stroke_color),
            &Self::stroke(style),
            self.transform,
            None,
        );
    }
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl Surface for PixmapSurface {
    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn draw(&mut self, primitive: &Primitive, style: &Style) {
        let path = match primitive {
            Primitive::Polyline { points, .. } if points.len() == 1 => {
                let dot = tiny_skia::PathBuilder::from_circle(
                    points[0].x,
                    points[0].y,
                    style.line_width / 2.0,
                );
                if let Some(dot) = dot {
                    self.pixmap.fill_path(
                        &dot,
                        &Self::paint(style.stroke_color),
                        tiny_skia::FillRule::Winding,
                        self.transform,
                        None,
                    );
                }
                return;
            }
            Primitive::Polyline {
                points,
                closed,
                filled,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    return;
                };
                let mut pb = tiny_skia::PathBuilder::new();
                pb.move_to(first.x, first.y);
                for p in rest {
                    pb.line_to(p.x, p.y);
                }
                if *closed {
                    pb.close();
                }
                pb.finish().map(|path| (path, *filled))
            }
            Primitive::Circle {
                center,
                radius,
                filled,
            } => tiny_skia::PathBuilder::from_circle(center.x, center.y, *radius)
                .map(|path| (path, *filled)),
            Primitive::Path {
                start,
                segments,
                filled,
            } => {
                let mut pb = tiny_skia::PathBuilder::new();
                pb.move_to(start.x, start.y);
                for [c1, c2, to] in segments {
                    pb.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
                }
                pb.finish().map(|path| (path, *filled))
            }
        };
        // degenerate geometry builds no path
        if let Some((path, filled)) = path {
            self.fill_and_stroke(&path, filled, style);
        }
    }
}
