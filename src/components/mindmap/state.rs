use log::debug;

use super::layout::{self, Link, Node, NodeKind};
use super::types::{TooltipInfo, TooltipKind, WorkDetails, WorkRecord};

/// Zoom bounds shared by wheel, pinch, and toolbar zooming.
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;

/// Total pointer travel (screen px) below which a press still counts as a click.
const DRAG_THRESHOLD: f64 = 4.0;

/// Pan offset and zoom scale applied uniformly to all drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub scale: f64,
	pub offset_x: f64,
	pub offset_y: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			scale: 1.0,
			offset_x: 0.0,
			offset_y: 0.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
	Idle,
	Panning {
		last_x: f64,
		last_y: f64,
		travelled: f64,
	},
}

/// Pointer, touch, and toolbar input. Coordinates are canvas-relative screen px.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
	PointerDown { x: f64, y: f64 },
	PointerMove { x: f64, y: f64 },
	PointerUp { x: f64, y: f64 },
	PointerLeave,
	Wheel { x: f64, y: f64, delta_y: f64 },
	ZoomStep { factor: f64 },
	PinchStart { distance: f64 },
	PinchMove { distance: f64, x: f64, y: f64 },
	PinchEnd,
	ResetView,
	Resize { width: f64, height: f64 },
}

/// Side effect the caller owes the user after one input event.
#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
	OpenWork(WorkDetails),
	Hover(TooltipInfo),
	ClearHover,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
	pub redraw: bool,
	pub action: Option<UiAction>,
}

/// All state behind one mind-map view: the records, their layout, the view
/// transform, and the interaction phase. Each canvas owns its own instance.
pub struct MindMapState {
	works: Vec<WorkRecord>,
	root_label: String,
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
	pub transform: ViewTransform,
	phase: Phase,
	hovered: Option<usize>,
	pinch_distance: f64,
	pub width: f64,
	pub height: f64,
}

impl MindMapState {
	pub fn new(works: Vec<WorkRecord>, root_label: String, width: f64, height: f64) -> Self {
		let (nodes, links) = layout::compute_layout(&works, &root_label, width, height);
		debug!("layout pass: {} nodes, {} links", nodes.len(), links.len());
		Self {
			works,
			root_label,
			nodes,
			links,
			transform: ViewTransform::default(),
			phase: Phase::Idle,
			hovered: None,
			pinch_distance: 0.0,
			width,
			height,
		}
	}

	pub fn screen_to_model(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.offset_x) / self.transform.scale,
			(sy - self.transform.offset_y) / self.transform.scale,
		)
	}

	/// Topmost node under a screen point. Later nodes draw on top, so they
	/// are tested first.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (mx, my) = self.screen_to_model(sx, sy);
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| (mx - node.x).hypot(my - node.y) <= node.radius)
			.map(|(slot, _)| slot)
	}

	pub fn is_panning(&self) -> bool {
		matches!(self.phase, Phase::Panning { .. })
	}

	pub fn is_hovering(&self) -> bool {
		self.hovered.is_some()
	}

	/// Apply one input event and report what the caller must do about it.
	/// The transition table lives here so it can be exercised without a canvas.
	pub fn apply(&mut self, event: InputEvent) -> Outcome {
		match event {
			InputEvent::PointerDown { x, y } => {
				self.phase = Phase::Panning {
					last_x: x,
					last_y: y,
					travelled: 0.0,
				};
				let action = self.hovered.take().map(|_| UiAction::ClearHover);
				Outcome {
					redraw: false,
					action,
				}
			}
			InputEvent::PointerMove { x, y } => match self.phase {
				Phase::Panning {
					last_x,
					last_y,
					travelled,
				} => {
					let (dx, dy) = (x - last_x, y - last_y);
					self.phase = Phase::Panning {
						last_x: x,
						last_y: y,
						travelled: travelled + dx.hypot(dy),
					};
					self.transform.offset_x += dx;
					self.transform.offset_y += dy;
					Outcome {
						redraw: true,
						action: None,
					}
				}
				Phase::Idle => match self.node_at(x, y) {
					Some(slot) => {
						self.hovered = Some(slot);
						Outcome {
							redraw: false,
							action: Some(UiAction::Hover(tooltip_for(&self.nodes[slot]))),
						}
					}
					None => {
						let left_node = self.hovered.take().is_some();
						Outcome {
							redraw: false,
							action: left_node.then_some(UiAction::ClearHover),
						}
					}
				},
			},
			InputEvent::PointerUp { x, y } => {
				let ended = self.phase;
				self.phase = Phase::Idle;
				let action = match ended {
					Phase::Panning { travelled, .. } if travelled <= DRAG_THRESHOLD => {
						self.activate_at(x, y)
					}
					_ => None,
				};
				Outcome {
					redraw: false,
					action,
				}
			}
			InputEvent::PointerLeave => {
				self.phase = Phase::Idle;
				self.pinch_distance = 0.0;
				let left_node = self.hovered.take().is_some();
				Outcome {
					redraw: false,
					action: left_node.then_some(UiAction::ClearHover),
				}
			}
			InputEvent::Wheel { x, y, delta_y } => {
				let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
				Outcome {
					redraw: self.zoom_at(x, y, factor),
					action: None,
				}
			}
			InputEvent::ZoomStep { factor } => Outcome {
				redraw: self.zoom_at(self.width / 2.0, self.height / 2.0, factor),
				action: None,
			},
			InputEvent::PinchStart { distance } => {
				// A second finger cancels any pan in progress.
				self.phase = Phase::Idle;
				self.pinch_distance = distance;
				Outcome::default()
			}
			InputEvent::PinchMove { distance, x, y } => {
				let redraw = if self.pinch_distance > 0.0 {
					self.zoom_at(x, y, distance / self.pinch_distance)
				} else {
					false
				};
				self.pinch_distance = distance;
				Outcome {
					redraw,
					action: None,
				}
			}
			InputEvent::PinchEnd => {
				self.pinch_distance = 0.0;
				Outcome::default()
			}
			InputEvent::ResetView => {
				let reset = ViewTransform::default();
				let redraw = self.transform != reset;
				self.transform = reset;
				Outcome {
					redraw,
					action: None,
				}
			}
			InputEvent::Resize { width, height } => {
				self.width = width;
				self.height = height;
				self.relayout();
				Outcome {
					redraw: true,
					action: None,
				}
			}
		}
	}

	/// Multiply the scale by `factor`, clamped, keeping the screen point
	/// `(x, y)` fixed in model space.
	fn zoom_at(&mut self, x: f64, y: f64, factor: f64) -> bool {
		let scale = (self.transform.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
		if scale == self.transform.scale {
			return false;
		}
		let ratio = scale / self.transform.scale;
		self.transform.offset_x = x - (x - self.transform.offset_x) * ratio;
		self.transform.offset_y = y - (y - self.transform.offset_y) * ratio;
		self.transform.scale = scale;
		true
	}

	fn activate_at(&self, x: f64, y: f64) -> Option<UiAction> {
		let node = &self.nodes[self.node_at(x, y)?];
		match &node.kind {
			NodeKind::Work(record) => {
				debug!("activated {}", node.id);
				Some(UiAction::OpenWork(WorkDetails::from_record(record)))
			}
			NodeKind::Center | NodeKind::Category => None,
		}
	}

	fn relayout(&mut self) {
		let (nodes, links) =
			layout::compute_layout(&self.works, &self.root_label, self.width, self.height);
		debug!("layout pass: {} nodes, {} links", nodes.len(), links.len());
		self.nodes = nodes;
		self.links = links;
		self.hovered = None;
	}
}

fn tooltip_for(node: &Node) -> TooltipInfo {
	match &node.kind {
		NodeKind::Work(record) => TooltipInfo {
			label: record.title.clone(),
			kind: TooltipKind::Work,
			work_type: Some(record.work_type.clone()),
			category: Some(record.category.clone()),
		},
		NodeKind::Center => TooltipInfo {
			label: node.label.clone(),
			kind: TooltipKind::Center,
			work_type: None,
			category: None,
		},
		NodeKind::Category => TooltipInfo {
			label: node.label.clone(),
			kind: TooltipKind::Category,
			work_type: None,
			category: None,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn work(id: u64, title: &str, category: &str) -> WorkRecord {
		WorkRecord {
			id,
			title: title.into(),
			work_type: "essay".into(),
			category: category.into(),
			description: None,
			download_links: None,
		}
	}

	fn state() -> MindMapState {
		MindMapState::new(
			vec![work(1, "A", "X"), work(2, "B", "X"), work(3, "C", "Y")],
			"Works".into(),
			800.0,
			600.0,
		)
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn pan_round_trip_restores_offsets() {
		let mut s = state();
		s.apply(InputEvent::PointerDown { x: 100.0, y: 100.0 });
		let moved = s.apply(InputEvent::PointerMove { x: 130.0, y: 140.0 });
		assert!(moved.redraw);
		assert!(close(s.transform.offset_x, 30.0));
		assert!(close(s.transform.offset_y, 40.0));
		s.apply(InputEvent::PointerMove { x: 100.0, y: 100.0 });
		s.apply(InputEvent::PointerUp { x: 100.0, y: 100.0 });
		assert!(close(s.transform.offset_x, 0.0));
		assert!(close(s.transform.offset_y, 0.0));
		assert!(!s.is_panning());
	}

	#[test]
	fn scale_stays_clamped_under_any_zoom_sequence() {
		let mut s = state();
		for _ in 0..100 {
			s.apply(InputEvent::Wheel { x: 10.0, y: 10.0, delta_y: -1.0 });
			assert!(s.transform.scale <= MAX_SCALE);
		}
		assert_eq!(s.transform.scale, MAX_SCALE);
		for _ in 0..100 {
			s.apply(InputEvent::Wheel { x: 10.0, y: 10.0, delta_y: 1.0 });
			assert!(s.transform.scale >= MIN_SCALE);
		}
		assert_eq!(s.transform.scale, MIN_SCALE);
	}

	#[test]
	fn wheel_steps_scale_by_tenths() {
		let mut s = state();
		s.apply(InputEvent::Wheel { x: 0.0, y: 0.0, delta_y: -1.0 });
		assert!(close(s.transform.scale, 1.1));
		s.apply(InputEvent::Wheel { x: 0.0, y: 0.0, delta_y: 1.0 });
		assert!(close(s.transform.scale, 1.1 * 0.9));
	}

	#[test]
	fn wheel_zoom_keeps_cursor_point_fixed() {
		let mut s = state();
		let (before_x, before_y) = s.screen_to_model(200.0, 150.0);
		s.apply(InputEvent::Wheel { x: 200.0, y: 150.0, delta_y: -1.0 });
		let (after_x, after_y) = s.screen_to_model(200.0, 150.0);
		assert!(close(before_x, after_x));
		assert!(close(before_y, after_y));
	}

	#[test]
	fn reset_view_restores_identity() {
		let mut s = state();
		s.apply(InputEvent::Wheel { x: 50.0, y: 60.0, delta_y: -1.0 });
		s.apply(InputEvent::PointerDown { x: 0.0, y: 0.0 });
		s.apply(InputEvent::PointerMove { x: 25.0, y: -10.0 });
		s.apply(InputEvent::PointerUp { x: 25.0, y: -10.0 });
		let outcome = s.apply(InputEvent::ResetView);
		assert!(outcome.redraw);
		assert_eq!(s.transform, ViewTransform::default());
		// Resetting an already-identity view changes nothing.
		assert!(!s.apply(InputEvent::ResetView).redraw);
	}

	#[test]
	fn hit_test_at_center_reports_center_node() {
		let s = state();
		let slot = s.node_at(400.0, 300.0).unwrap();
		assert_eq!(s.nodes[slot].id, "center");
		assert!(matches!(s.nodes[slot].kind, NodeKind::Center));
	}

	#[test]
	fn hit_test_far_from_all_nodes_reports_none() {
		let s = state();
		assert_eq!(s.node_at(-5000.0, -5000.0), None);
	}

	#[test]
	fn hit_test_respects_transform() {
		let mut s = state();
		s.transform = ViewTransform {
			scale: 2.0,
			offset_x: 50.0,
			offset_y: 30.0,
		};
		// Model (400, 300) lands on screen at (850, 630).
		let slot = s.node_at(850.0, 630.0).unwrap();
		assert_eq!(s.nodes[slot].id, "center");
		assert_eq!(s.screen_to_model(850.0, 630.0), (400.0, 300.0));
	}

	#[test]
	fn overlapping_nodes_resolve_to_last_drawn() {
		let mut s = MindMapState::new(Vec::new(), "Works".into(), 800.0, 600.0);
		for id in ["under", "over"] {
			s.nodes.push(Node {
				id: id.into(),
				label: id.into(),
				x: 100.0,
				y: 100.0,
				radius: 40.0,
				kind: NodeKind::Category,
			});
		}
		let slot = s.node_at(100.0, 100.0).unwrap();
		assert_eq!(s.nodes[slot].id, "over");
	}

	#[test]
	fn click_on_work_node_opens_details() {
		let mut s = state();
		let (x, y) = {
			let node = s.nodes.iter().find(|n| n.id == "work-2").unwrap();
			(node.x, node.y)
		};
		s.apply(InputEvent::PointerDown { x, y });
		let outcome = s.apply(InputEvent::PointerUp { x, y });
		match outcome.action {
			Some(UiAction::OpenWork(details)) => {
				assert_eq!(details.title, "B");
				assert_eq!(details.work_type, "essay");
			}
			other => panic!("expected OpenWork, got {other:?}"),
		}
	}

	#[test]
	fn click_on_category_node_opens_nothing() {
		let mut s = state();
		let (x, y) = {
			let node = s.nodes.iter().find(|n| n.id == "cat-0").unwrap();
			(node.x, node.y)
		};
		s.apply(InputEvent::PointerDown { x, y });
		assert_eq!(s.apply(InputEvent::PointerUp { x, y }).action, None);
	}

	#[test]
	fn dragging_past_threshold_suppresses_click() {
		let mut s = state();
		let (x, y) = {
			let node = s.nodes.iter().find(|n| n.id == "work-1").unwrap();
			(node.x, node.y)
		};
		s.apply(InputEvent::PointerDown { x, y });
		s.apply(InputEvent::PointerMove { x: x + 50.0, y });
		let outcome = s.apply(InputEvent::PointerUp { x: x + 50.0, y });
		assert_eq!(outcome.action, None);
		assert!(close(s.transform.offset_x, 50.0));
	}

	#[test]
	fn hover_emits_tooltip_then_clears_once() {
		let mut s = state();
		let (x, y) = {
			let node = s.nodes.iter().find(|n| n.id == "work-3").unwrap();
			(node.x, node.y)
		};
		let over = s.apply(InputEvent::PointerMove { x, y });
		match over.action {
			Some(UiAction::Hover(tip)) => {
				assert_eq!(tip.label, "C");
				assert_eq!(tip.kind, TooltipKind::Work);
				assert_eq!(tip.work_type.as_deref(), Some("essay"));
				assert_eq!(tip.category.as_deref(), Some("Y"));
			}
			other => panic!("expected Hover, got {other:?}"),
		}
		assert!(s.is_hovering());

		let out = s.apply(InputEvent::PointerMove { x: -900.0, y: -900.0 });
		assert_eq!(out.action, Some(UiAction::ClearHover));
		// Further misses stay quiet.
		let again = s.apply(InputEvent::PointerMove { x: -901.0, y: -900.0 });
		assert_eq!(again.action, None);
	}

	#[test]
	fn hover_on_category_reports_bare_label() {
		let mut s = state();
		let (x, y) = {
			let node = s.nodes.iter().find(|n| n.id == "cat-1").unwrap();
			(node.x, node.y)
		};
		match s.apply(InputEvent::PointerMove { x, y }).action {
			Some(UiAction::Hover(tip)) => {
				assert_eq!(tip.label, "Y");
				assert_eq!(tip.kind, TooltipKind::Category);
				assert_eq!(tip.work_type, None);
				assert_eq!(tip.category, None);
			}
			other => panic!("expected Hover, got {other:?}"),
		}
	}

	#[test]
	fn pinch_zooms_by_distance_ratio() {
		let mut s = state();
		s.apply(InputEvent::PinchStart { distance: 100.0 });
		s.apply(InputEvent::PinchMove {
			distance: 150.0,
			x: 400.0,
			y: 300.0,
		});
		assert!(close(s.transform.scale, 1.5));
		// Growing far past the bound clamps.
		s.apply(InputEvent::PinchMove {
			distance: 600.0,
			x: 400.0,
			y: 300.0,
		});
		assert_eq!(s.transform.scale, MAX_SCALE);
		s.apply(InputEvent::PinchEnd);
		// A move without a preceding start only seeds the distance.
		let quiet = s.apply(InputEvent::PinchMove {
			distance: 50.0,
			x: 0.0,
			y: 0.0,
		});
		assert!(!quiet.redraw);
	}

	#[test]
	fn pinch_start_cancels_pan() {
		let mut s = state();
		s.apply(InputEvent::PointerDown { x: 10.0, y: 10.0 });
		assert!(s.is_panning());
		s.apply(InputEvent::PinchStart { distance: 80.0 });
		assert!(!s.is_panning());
	}

	#[test]
	fn resize_preserves_transform_and_recenters_layout() {
		let mut s = state();
		s.apply(InputEvent::Wheel { x: 100.0, y: 100.0, delta_y: -1.0 });
		let before = s.transform.clone();
		let outcome = s.apply(InputEvent::Resize {
			width: 1000.0,
			height: 700.0,
		});
		assert!(outcome.redraw);
		assert_eq!(s.transform, before);
		assert_eq!(s.nodes[0].x, 500.0);
		assert_eq!(s.nodes[0].y, 350.0);
		assert!(!s.is_hovering());
	}

	#[test]
	fn zoom_step_matches_toolbar_factors() {
		let mut s = state();
		s.apply(InputEvent::ZoomStep { factor: 1.2 });
		assert!(close(s.transform.scale, 1.2));
		s.apply(InputEvent::ZoomStep { factor: 0.8 });
		assert!(close(s.transform.scale, 0.96));
	}
}
