use std::fmt::Write as _;

use crate::error::PlotResult;
use crate::render::{Color, RenderFrame, Renderer, TextHAlign, TextOrientation};

/// Renderer serializing frames into standalone SVG documents.
///
/// The hover glow halo is painted as a translucent disc behind the point
/// rather than an SVG filter, which keeps the output self-contained and
/// deterministic across SVG rasterizers.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The document produced by the most recent render pass; empty before
    /// the first pass.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            frame.viewport.width, frame.viewport.height
        );

        for rect in &frame.rects {
            let _ = writeln!(
                svg,
                r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                hex_color(rect.fill),
                stroke_attributes(rect.stroke_width, rect.stroke_color),
            );
        }

        for line in &frame.lines {
            let _ = writeln!(
                svg,
                r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"/>"#,
                line.x1,
                line.y1,
                line.x2,
                line.y2,
                hex_color(line.color),
                line.stroke_width,
            );
        }

        for circle in &frame.circles {
            if circle.halo_radius > 0.0 {
                let _ = writeln!(
                    svg,
                    r##"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="#000000" fill-opacity="0.35"/>"##,
                    circle.cx,
                    circle.cy,
                    circle.radius + circle.halo_radius,
                );
            }
            let _ = writeln!(
                svg,
                r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"{}/>"#,
                circle.cx,
                circle.cy,
                circle.radius,
                hex_color(circle.fill),
                stroke_attributes(circle.stroke_width, circle.stroke_color),
            );
        }

        for text in &frame.texts {
            let anchor = match text.h_align {
                TextHAlign::Left => "start",
                TextHAlign::Center => "middle",
                TextHAlign::Right => "end",
            };
            let transform = match text.orientation {
                TextOrientation::Horizontal => String::new(),
                TextOrientation::VerticalUp => {
                    format!(r#" transform="rotate(-90 {:.2} {:.2})""#, text.x, text.y)
                }
            };
            let _ = writeln!(
                svg,
                r#"  <text x="{:.2}" y="{:.2}" font-size="{:.0}" font-family="sans-serif" fill="{}" text-anchor="{}"{}>{}</text>"#,
                text.x,
                text.y,
                text.font_size_px,
                hex_color(text.color),
                anchor,
                transform,
                escape_text(&text.text),
            );
        }

        svg.push_str("</svg>\n");
        self.document = svg;
        Ok(())
    }
}

fn hex_color(color: Color) -> String {
    let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.red),
        channel(color.green),
        channel(color.blue)
    )
}

fn stroke_attributes(width: f64, color: Color) -> String {
    if width <= 0.0 {
        return String::new();
    }
    format!(
        r#" stroke="{}" stroke-width="{width:.2}""#,
        hex_color(color)
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
