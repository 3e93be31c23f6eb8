use kurbo::ParamCurve as _;

use crate::{
    foundation::{
        color::Color,
        core::{Canvas, CubicBez, Point, Rect, Vec2},
        error::LexvisResult,
    },
    scene::{
        Scene,
        measure::TextStyle,
        node::{NodeId, NodeKind, RectNode, Stroke},
    },
};

/// Serialize the visible part of `scene` into a standalone SVG document.
///
/// The scene origin maps to the canvas center. Opacity multiplies down the tree and fully
/// transparent subtrees are skipped.
pub fn scene_to_svg(scene: &Scene, canvas: Canvas, background: Color) -> LexvisResult<String> {
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        canvas.width, canvas.height, canvas.width, canvas.height
    );
    out.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="{}"/>"#,
        canvas.width,
        canvas.height,
        background.to_hex_rgb()
    ));
    out.push_str(&format!(
        r#"<g transform="translate({} {})">"#,
        num(w / 2.0),
        num(h / 2.0)
    ));

    let root = scene.root();
    let opacity = scene.node(root)?.opacity;
    for child in scene.draw_order(root)? {
        write_node(scene, child, opacity, &mut out)?;
    }

    out.push_str("</g></svg>");
    Ok(out)
}

fn write_node(scene: &Scene, id: NodeId, parent_opacity: f64, out: &mut String) -> LexvisResult<()> {
    let node = scene.node(id)?;
    let opacity = parent_opacity * node.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }

    match &node.kind {
        NodeKind::Group => {}
        NodeKind::Rect(r) => write_rect(r, scene.world_bounds(id)?, opacity, out),
        NodeKind::Text(t) => {
            let at = scene.world_bounds(id)?.center();
            let style = scene.text_style(id)?;
            write_text(&scene.text(id)?, at, "middle", &style, t.fill, opacity, out);
        }
        NodeKind::Code(c) => {
            let bounds = scene.world_bounds(id)?;
            let line_h = scene.measure_text("M", &c.style).height;
            for (i, line) in c.code.split('\n').enumerate() {
                let at = Point::new(bounds.x0, bounds.y0 + line_h * (i as f64 + 0.5));
                write_text(line, at, "start", &c.style, c.fill, opacity, out);
            }
        }
        NodeKind::Curve(c) => {
            let frame = match node.parent() {
                Some(p) => scene.world_origin(p)?.to_vec2(),
                None => Vec2::ZERO,
            };
            let full = translate(scene.curve(id)?, frame);
            let progress = c.progress.clamp(0.0, 1.0);
            if progress > 0.0 {
                write_curve(full.subsegment(0.0..progress), c.stroke, opacity, out);
            }
            if let Some(color) = c.debug {
                for p in [full.p0, full.p1, full.p2, full.p3] {
                    out.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="15" height="15" fill="{}"{}/>"#,
                        num(p.x - 7.5),
                        num(p.y - 7.5),
                        color.to_hex_rgb(),
                        opacity_attr("fill-opacity", color.alpha_f64() * opacity),
                    ));
                }
            }
        }
    }

    for child in scene.draw_order(id)? {
        write_node(scene, child, opacity, out)?;
    }
    Ok(())
}

// Progress fades the fill in and trims the outline along its perimeter.
fn write_rect(r: &RectNode, b: Rect, opacity: f64, out: &mut String) {
    let progress = r.progress.clamp(0.0, 1.0);
    let radius = r.radius.min(b.width() / 2.0).min(b.height() / 2.0).max(0.0);

    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}""#,
        num(b.x0),
        num(b.y0),
        num(b.width()),
        num(b.height()),
        num(radius)
    ));
    match r.fill {
        Some(fill) => out.push_str(&format!(
            r#" fill="{}"{}"#,
            fill.to_hex_rgb(),
            opacity_attr("fill-opacity", fill.alpha_f64() * opacity * progress)
        )),
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = r.stroke {
        write_stroke_attrs(stroke, opacity, out);
        if progress < 1.0 {
            let perimeter =
                2.0 * (b.width() + b.height()) - (8.0 - 2.0 * std::f64::consts::PI) * radius;
            out.push_str(&format!(
                r#" stroke-dasharray="{} {}""#,
                num(perimeter * progress),
                num(perimeter)
            ));
        }
    }
    out.push_str("/>");
}

fn write_curve(c: CubicBez, stroke: Stroke, opacity: f64, out: &mut String) {
    out.push_str(&format!(
        r#"<path d="M{} {} C{} {} {} {} {} {}" fill="none""#,
        num(c.p0.x),
        num(c.p0.y),
        num(c.p1.x),
        num(c.p1.y),
        num(c.p2.x),
        num(c.p2.y),
        num(c.p3.x),
        num(c.p3.y)
    ));
    write_stroke_attrs(stroke, opacity, out);
    out.push_str("/>");
}

fn write_stroke_attrs(stroke: Stroke, opacity: f64, out: &mut String) {
    out.push_str(&format!(
        r#" stroke="{}" stroke-width="{}"{}"#,
        stroke.color.to_hex_rgb(),
        num(stroke.width),
        opacity_attr("stroke-opacity", stroke.color.alpha_f64() * opacity)
    ));
}

fn write_text(
    text: &str,
    at: Point,
    anchor: &str,
    style: &TextStyle,
    fill: Color,
    opacity: f64,
    out: &mut String,
) {
    if text.is_empty() {
        return;
    }
    out.push_str(&format!(
        r#"<text x="{}" y="{}" text-anchor="{anchor}" dominant-baseline="central" xml:space="preserve" font-family="{}" font-size="{}" font-weight="{}" letter-spacing="{}" fill="{}"{}>{}</text>"#,
        num(at.x),
        num(at.y),
        escape(&style.font_family),
        num(style.font_size),
        if style.bold { "bold" } else { "normal" },
        num(style.letter_spacing),
        fill.to_hex_rgb(),
        opacity_attr("fill-opacity", fill.alpha_f64() * opacity),
        escape(text)
    ));
}

fn translate(c: CubicBez, by: Vec2) -> CubicBez {
    CubicBez::new(c.p0 + by, c.p1 + by, c.p2 + by, c.p3 + by)
}

fn opacity_attr(name: &str, value: f64) -> String {
    if value >= 1.0 {
        String::new()
    } else {
        format!(r#" {name}="{}""#, num(value))
    }
}

fn num(v: f64) -> String {
    let v = (v * 1000.0).round() / 1000.0;
    if v == 0.0 { "0".to_owned() } else { v.to_string() }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
