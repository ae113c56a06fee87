use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::layout::{LinkKind, Node, NodeKind};
use super::state::MindMapState;

/// Gradient stops, glow color, and label size for one node kind.
struct NodeStyle {
	inner: &'static str,
	outer: &'static str,
	glow: &'static str,
	font_size: f64,
}

fn style_for(kind: &NodeKind) -> NodeStyle {
	match kind {
		NodeKind::Center => NodeStyle {
			inner: "#7c95f7",
			outer: "#667eea",
			glow: "rgba(102, 126, 234, 0.6)",
			font_size: 16.0,
		},
		NodeKind::Category => NodeStyle {
			inner: "#8a5cb8",
			outer: "#764ba2",
			glow: "rgba(118, 75, 162, 0.6)",
			font_size: 14.0,
		},
		NodeKind::Work(_) => NodeStyle {
			inner: "#f5a8ff",
			outer: "#f093fb",
			glow: "rgba(240, 147, 251, 0.6)",
			font_size: 12.0,
		},
	}
}

/// Repaint the whole surface: clear, apply the view transform, then links
/// under nodes.
pub fn render(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.offset_x, state.transform.offset_y);
	let _ = ctx.scale(state.transform.scale, state.transform.scale);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	for link in &state.links {
		let (source, target) = (&state.nodes[link.source], &state.nodes[link.target]);
		let (mid_x, mid_y) = ((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);
		let (dx, dy) = (target.x - source.x, target.y - source.y);

		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		// Control point sits perpendicular to the segment, 10% of its length out,
		// so overlapping links separate visually.
		ctx.quadratic_curve_to(mid_x - dy * 0.1, mid_y + dx * 0.1, target.x, target.y);

		let (stroke, width) = match link.kind {
			LinkKind::Category => ("rgba(255, 255, 255, 0.9)", 4.0),
			LinkKind::Work => ("rgba(255, 255, 255, 0.7)", 3.0),
		};
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width);
		ctx.set_line_cap("round");
		ctx.stroke();
	}
}

fn draw_nodes(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	for node in &state.nodes {
		let style = style_for(&node.kind);

		ctx.save();
		ctx.set_shadow_color(style.glow);
		ctx.set_shadow_blur(15.0);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);

		// Light source sits up and to the left of each sphere.
		let gradient = ctx
			.create_radial_gradient(
				node.x - node.radius * 0.3,
				node.y - node.radius * 0.3,
				0.0,
				node.x,
				node.y,
				node.radius,
			)
			.unwrap();
		gradient.add_color_stop(0.0, style.inner).unwrap();
		gradient.add_color_stop(1.0, style.outer).unwrap();
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
		ctx.restore();

		ctx.set_stroke_style_str("#fff");
		ctx.set_line_width(4.0);
		ctx.stroke();

		draw_label(node, style.font_size, ctx);
	}
}

fn draw_label(node: &Node, font_size: f64, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fff");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_shadow_color("rgba(0, 0, 0, 0.3)");
	ctx.set_shadow_blur(2.0);
	ctx.set_shadow_offset_x(1.0);
	ctx.set_shadow_offset_y(1.0);
	ctx.set_font(&format!("bold {font_size}px Arial"));

	let lines = wrap_label(&node.label, node.radius * 1.8, font_size);
	let line_height = font_size + 4.0;
	let start_y = node.y - (lines.len().saturating_sub(1)) as f64 * line_height / 2.0;
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, node.x, start_y + i as f64 * line_height);
	}

	ctx.set_shadow_color("transparent");
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_offset_x(0.0);
	ctx.set_shadow_offset_y(0.0);
}

/// Greedily pack whitespace-delimited words into lines that fit a pixel
/// width, approximating character width as `font_size * 0.6`. Capped at
/// three lines; overflow is dropped.
fn wrap_label(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
	let char_width = font_size * 0.6;
	let max_chars = (max_width / char_width).floor() as usize;

	let mut lines = Vec::new();
	let mut current = String::new();
	let mut current_chars = 0usize;
	for word in text.split_whitespace() {
		let word_chars = word.chars().count();
		if current.is_empty() {
			current.push_str(word);
			current_chars = word_chars;
		} else if current_chars + 1 + word_chars <= max_chars {
			current.push(' ');
			current.push_str(word);
			current_chars += 1 + word_chars;
		} else {
			lines.push(std::mem::take(&mut current));
			current.push_str(word);
			current_chars = word_chars;
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines.truncate(3);
	lines
}
