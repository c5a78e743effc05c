use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;

pub const NODE_RADIUS: f64 = 4.0;
pub const HIT_RADIUS: f64 = 10.0;
pub const CAPTION_OFFSET: f64 = 20.0;

// d3-style energy schedule: alpha decays toward alpha_target each tick and
// the engine step is scaled by it, so the layout cools to rest and can be
// reheated by a drag gesture.
const ALPHA_INIT: f32 = 1.0;
const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.0228;
const DRAG_ALPHA_TARGET: f32 = 0.3;

/// Per-node record carried inside the engine. `fx`/`fy` are the pin
/// coordinates: set for the duration of a drag gesture, `None` otherwise.
#[derive(Clone, Debug, Default)]
pub struct SimNode {
	pub id: String,
	pub desc: String,
	pub fx: Option<f32>,
	pub fy: Option<f32>,
}

/// A link whose endpoint ids resolved to engine nodes.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedLink {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub strength: Option<f32>,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
}

pub struct GraphState {
	graph: ForceGraph<SimNode, ()>,
	links: Vec<ResolvedLink>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	pub drag: DragState,
	hover: Option<DefaultNodeIdx>,
	alpha: f32,
	alpha_target: f32,
}

impl GraphState {
	/// Build the simulation from parsed page data. Node positions are seeded
	/// on a ring around the origin (the viewBox is origin-centered). Links
	/// whose `source`/`target` id matches no node are skipped.
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut links = Vec::new();
		let seed_radius = (width.min(height) / 8.0).max(1.0);

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
			let idx = graph.add_node(NodeData {
				x: (seed_radius * angle.cos()) as f32,
				y: (seed_radius * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: SimNode {
					id: node.id.clone(),
					desc: node.desc.clone(),
					fx: None,
					fy: None,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				links.push(ResolvedLink {
					source: src,
					target: tgt,
					strength: link.strength,
				});
			}
		}

		Self {
			graph,
			links,
			id_to_idx,
			drag: DragState::default(),
			hover: None,
			alpha: ALPHA_INIT,
			alpha_target: 0.0,
		}
	}

	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	pub fn links(&self) -> &[ResolvedLink] {
		&self.links
	}

	pub fn node_by_id(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.id_to_idx.get(id).copied()
	}

	/// Current node positions, indexed by insertion slot.
	pub fn positions(&self) -> Vec<(f32, f32)> {
		let mut positions = vec![(0.0, 0.0); self.node_count()];
		self.graph.visit_nodes(|node| {
			positions[node.index().index()] = (node.x(), node.y());
		});
		positions
	}

	/// Per-node id and caption text, indexed by insertion slot.
	pub fn records(&self) -> Vec<SimNode> {
		let mut records = vec![SimNode::default(); self.node_count()];
		self.graph.visit_nodes(|node| {
			records[node.index().index()] = node.data.user_data.clone();
		});
		records
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<DefaultNodeIdx> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - x, node.y() as f64 - y);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover = node;
	}

	pub fn hovered_slot(&self) -> Option<usize> {
		self.hover.map(|idx| idx.index())
	}

	/// Pin coordinates of a node, `Some` only while a drag gesture holds it.
	pub fn pin(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		let mut pin = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pin = node.data.user_data.fx.zip(node.data.user_data.fy);
			}
		});
		pin
	}

	/// Start a drag gesture: reheat the simulation and pin the node at its
	/// current position. The gesture owns `fx`/`fy` until [`Self::end_drag`].
	pub fn begin_drag(&mut self, idx: DefaultNodeIdx) {
		self.alpha_target = DRAG_ALPHA_TARGET;
		self.drag.active = true;
		self.drag.node_idx = Some(idx);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.user_data.fx = Some(node.data.x);
				node.data.user_data.fy = Some(node.data.y);
				node.data.is_anchor = true;
			}
		});
	}

	/// Move the active gesture's pin to the pointer location.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.user_data.fx = Some(x as f32);
				node.data.user_data.fy = Some(y as f32);
			}
		});
	}

	/// End the gesture: release the energy target and unpin the node so it
	/// resumes free simulation.
	pub fn end_drag(&mut self) {
		self.alpha_target = 0.0;
		if let Some(idx) = self.drag.node_idx.take() {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.user_data.fx = None;
					node.data.user_data.fy = None;
					node.data.is_anchor = false;
				}
			});
		}
		self.drag.active = false;
	}

	pub fn is_idle(&self) -> bool {
		self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
	}

	/// One simulation step. Alpha always advances toward its target; the
	/// engine only steps while the layout is warm.
	pub fn tick(&mut self, dt: f32) {
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		if self.is_idle() {
			return;
		}
		self.graph.update(dt * self.alpha);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::{GraphLink, GraphNode};

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode {
					id: "a".into(),
					desc: "A".into(),
				},
				GraphNode {
					id: "b".into(),
					desc: "B".into(),
				},
			],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
				strength: None,
			}],
		}
	}

	fn settle(state: &mut GraphState) {
		for _ in 0..800 {
			state.tick(0.016);
		}
	}

	#[test]
	fn builds_nodes_and_resolved_links() {
		let state = GraphState::new(&sample(), 1200.0, 800.0);
		assert_eq!(state.node_count(), 2);
		assert_eq!(state.links().len(), 1);
		assert_eq!(state.positions().len(), 2);
	}

	#[test]
	fn unknown_link_ids_are_skipped() {
		let mut data = sample();
		data.links[0].target = "missing".into();
		let state = GraphState::new(&data, 1200.0, 800.0);
		assert_eq!(state.node_count(), 2);
		assert!(state.links().is_empty());
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut state = GraphState::new(&sample(), 1200.0, 800.0);
		let idx = state.node_by_id("a").unwrap();
		assert_eq!(state.pin(idx), None);

		state.begin_drag(idx);
		assert!(state.drag.active);
		assert!(state.pin(idx).is_some());

		state.drag_to(50.0, 60.0);
		assert_eq!(state.pin(idx), Some((50.0, 60.0)));

		// The pin holds the node in place while the simulation runs.
		for _ in 0..20 {
			state.tick(0.016);
		}
		let slot = idx.index();
		assert_eq!(state.positions()[slot], (50.0, 60.0));

		state.end_drag();
		assert!(!state.drag.active);
		assert_eq!(state.pin(idx), None);
	}

	#[test]
	fn idle_simulation_reheats_on_drag() {
		let mut state = GraphState::new(&sample(), 1200.0, 800.0);
		settle(&mut state);
		assert!(state.is_idle());

		let idx = state.node_by_id("b").unwrap();
		state.begin_drag(idx);
		assert!(!state.is_idle());

		state.end_drag();
		settle(&mut state);
		assert!(state.is_idle());
	}

	#[test]
	fn hover_tracks_slots() {
		let mut state = GraphState::new(&sample(), 1200.0, 800.0);
		assert_eq!(state.hovered_slot(), None);
		let idx = state.node_by_id("b").unwrap();
		state.set_hover(Some(idx));
		assert_eq!(state.hovered_slot(), Some(idx.index()));
		state.set_hover(None);
		assert_eq!(state.hovered_slot(), None);
	}

	#[test]
	fn hit_test_finds_dragged_node() {
		let mut state = GraphState::new(&sample(), 1200.0, 800.0);
		let idx = state.node_by_id("a").unwrap();
		state.begin_drag(idx);
		state.drag_to(200.0, -150.0);
		state.end_drag();
		assert_eq!(state.node_at_position(202.0, -148.0), Some(idx));
		assert_eq!(state.node_at_position(400.0, 400.0), None);
	}
}
