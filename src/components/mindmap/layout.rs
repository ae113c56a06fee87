use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::WorkRecord;

pub const CENTER_NODE_RADIUS: f64 = 60.0;
pub const CATEGORY_NODE_RADIUS: f64 = 50.0;
pub const WORK_NODE_RADIUS: f64 = 35.0;

/// Distance from a category node to its work nodes, in model units.
pub const WORK_RING: f64 = 120.0;
/// Angular width of the fan work nodes occupy around their category.
const WORK_FAN: f64 = PI / 2.0;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	Center,
	Category,
	Work(WorkRecord),
}

/// A positioned, labeled circle in the radial layout.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub kind: NodeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
	Category,
	Work,
}

/// A connector between two nodes, stored as indices into the layout's node list.
#[derive(Clone, Copy, Debug)]
pub struct Link {
	pub source: usize,
	pub target: usize,
	pub kind: LinkKind,
}

/// Build the radial layout: the center node, a ring of category nodes, and a
/// quarter-turn fan of work nodes behind each category. Pure and deterministic
/// for a given record order; categories keep their first-seen order.
pub fn compute_layout(
	works: &[WorkRecord],
	root_label: &str,
	width: f64,
	height: f64,
) -> (Vec<Node>, Vec<Link>) {
	let (cx, cy) = (width / 2.0, height / 2.0);
	let mut nodes = vec![Node {
		id: "center".into(),
		label: root_label.to_string(),
		x: cx,
		y: cy,
		radius: CENTER_NODE_RADIUS,
		kind: NodeKind::Center,
	}];
	let mut links = Vec::new();

	let mut categories: Vec<(&str, Vec<&WorkRecord>)> = Vec::new();
	let mut slot_by_name: HashMap<&str, usize> = HashMap::new();
	for work in works {
		let slot = *slot_by_name.entry(work.category.as_str()).or_insert_with(|| {
			categories.push((work.category.as_str(), Vec::new()));
			categories.len() - 1
		});
		categories[slot].1.push(work);
	}
	if categories.is_empty() {
		return (nodes, links);
	}

	let ring = width.min(height) * 0.3;
	let angle_step = 2.0 * PI / categories.len() as f64;

	for (cat_index, (category, members)) in categories.iter().enumerate() {
		let cat_angle = angle_step * cat_index as f64;
		let (x, y) = (cx + ring * cat_angle.cos(), cy + ring * cat_angle.sin());
		let cat_slot = nodes.len();
		nodes.push(Node {
			id: format!("cat-{cat_index}"),
			label: (*category).to_string(),
			x,
			y,
			radius: CATEGORY_NODE_RADIUS,
			kind: NodeKind::Category,
		});
		links.push(Link {
			source: 0,
			target: cat_slot,
			kind: LinkKind::Category,
		});

		// Fan centred on the category's outward direction; holds for a single member.
		let fan_step = WORK_FAN / (members.len() + 1) as f64;
		for (work_index, work) in members.iter().enumerate() {
			let angle = cat_angle + fan_step * (work_index + 1) as f64 - WORK_FAN / 2.0;
			let work_slot = nodes.len();
			nodes.push(Node {
				id: format!("work-{}", work.id),
				label: work.title.clone(),
				x: x + WORK_RING * angle.cos(),
				y: y + WORK_RING * angle.sin(),
				radius: WORK_NODE_RADIUS,
				kind: NodeKind::Work((*work).clone()),
			});
			links.push(Link {
				source: cat_slot,
				target: work_slot,
				kind: LinkKind::Work,
			});
		}
	}

	(nodes, links)
}
