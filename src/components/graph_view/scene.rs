//! SVG scene construction and per-frame attribute sync.
//!
//! The scene mirrors the simulation: one `<line>` per resolved link and one
//! `<g class="node">` (caption text + circle) per node. Positions are copied
//! from [`GraphState`] into attributes on every animation frame.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::state::{CAPTION_OFFSET, GraphState, NODE_RADIUS};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The id of the SVG root. At most one element with this id exists at a time;
/// building a new scene removes the previous one first.
pub const GRAPH_ID: &str = "graph";

const LINK_STROKE_WIDTH: f32 = 2.0;

pub struct GraphScene {
	svg: Element,
	lines: Vec<Element>,
	circles: Vec<Element>,
	captions: Vec<Element>,
}

impl GraphScene {
	/// Build the SVG tree for `state` under `parent`, tearing down any scene
	/// a previous draw left behind.
	pub fn build(
		document: &Document,
		parent: &Element,
		state: &GraphState,
		width: f64,
		height: f64,
	) -> Result<Self, JsValue> {
		if let Some(prev) = document.get_element_by_id(GRAPH_ID) {
			prev.remove();
		}

		let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
		svg.set_attribute("id", GRAPH_ID)?;
		svg.set_attribute("width", &width.to_string())?;
		svg.set_attribute("height", &height.to_string())?;
		svg.set_attribute(
			"viewBox",
			&format!("{} {} {} {}", -width / 2.0, -height / 2.0, width, height),
		)?;
		svg.set_attribute("style", "max-width: 100%; height: auto;")?;

		let link_layer = document.create_element_ns(Some(SVG_NS), "g")?;
		link_layer.set_attribute("stroke", "black")?;
		link_layer.set_attribute("stroke-opacity", "1")?;
		link_layer.set_attribute("stroke-width", &LINK_STROKE_WIDTH.to_string())?;
		link_layer.set_attribute("stroke-linecap", "round")?;

		let mut lines = Vec::with_capacity(state.links().len());
		for link in state.links() {
			let line = document.create_element_ns(Some(SVG_NS), "line")?;
			// Weighted links get a proportional stroke width.
			if let Some(strength) = link.strength {
				line.set_attribute(
					"stroke-width",
					&(LINK_STROKE_WIDTH * strength.max(0.25)).to_string(),
				)?;
			}
			link_layer.append_child(&line)?;
			lines.push(line);
		}
		svg.append_child(&link_layer)?;

		let node_layer = document.create_element_ns(Some(SVG_NS), "g")?;
		node_layer.set_attribute("fill", "red")?;
		node_layer.set_attribute("stroke-width", "1")?;

		let records = state.records();
		let mut circles = Vec::with_capacity(records.len());
		let mut captions = Vec::with_capacity(records.len());
		for record in &records {
			let group = document.create_element_ns(Some(SVG_NS), "g")?;
			group.set_attribute("class", "node")?;

			let caption = document.create_element_ns(Some(SVG_NS), "text")?;
			caption.set_attribute("class", "caption")?;
			caption.set_attribute("text-anchor", "middle")?;
			caption.set_attribute("style", "display: none;")?;
			caption.set_text_content(Some(&format!("{}\n{}", record.id, record.desc)));
			group.append_child(&caption)?;

			let circle = document.create_element_ns(Some(SVG_NS), "circle")?;
			circle.set_attribute("r", &NODE_RADIUS.to_string())?;
			group.append_child(&circle)?;

			node_layer.append_child(&group)?;
			circles.push(circle);
			captions.push(caption);
		}
		svg.append_child(&node_layer)?;

		parent.append_child(&svg)?;
		Ok(Self {
			svg,
			lines,
			circles,
			captions,
		})
	}

	pub fn svg(&self) -> &Element {
		&self.svg
	}

	/// Copy simulated positions and hover state into SVG attributes.
	pub fn sync(&self, state: &GraphState) {
		let positions = state.positions();
		let hovered = state.hovered_slot();

		for (line, link) in self.lines.iter().zip(state.links()) {
			let (x1, y1) = positions[link.source.index()];
			let (x2, y2) = positions[link.target.index()];
			let _ = line.set_attribute("x1", &x1.to_string());
			let _ = line.set_attribute("y1", &y1.to_string());
			let _ = line.set_attribute("x2", &x2.to_string());
			let _ = line.set_attribute("y2", &y2.to_string());
		}

		for (slot, &(x, y)) in positions.iter().enumerate() {
			let _ = self.circles[slot].set_attribute("cx", &x.to_string());
			let _ = self.circles[slot].set_attribute("cy", &y.to_string());

			let caption = &self.captions[slot];
			let _ = caption.set_attribute("fill", "green");
			let _ = caption.set_attribute("x", &x.to_string());
			let _ = caption.set_attribute("y", &(y as f64 - CAPTION_OFFSET).to_string());
			let visible = hovered == Some(slot);
			let _ = caption.set_attribute(
				"style",
				if visible {
					"display: inherit;"
				} else {
					"display: none;"
				},
			);
		}
	}

	/// Detach the SVG root from the page.
	pub fn remove(&self) {
		self.svg.remove();
	}
}
