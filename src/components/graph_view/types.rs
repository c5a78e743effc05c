use serde::Deserialize;

/// Wire shape of a node as embedded in the page.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub desc: String,
}

/// Wire shape of a link. `source`/`target` reference [`GraphNode::id`];
/// `strength` is an optional weight emitted by some exporters.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub strength: Option<f32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse the two JSON payloads the page embeds (`#nodes`, `#links`).
	pub fn from_json(nodes_json: &str, links_json: &str) -> serde_json::Result<Self> {
		Ok(Self {
			nodes: serde_json::from_str(nodes_json)?,
			links: serde_json::from_str(links_json)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_documented_shapes() {
		let data = GraphData::from_json(
			r#"[{"id":"a","desc":"first"},{"id":"b","desc":"second"}]"#,
			r#"[{"source":"a","target":"b"}]"#,
		)
		.unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.links.len(), 1);
		assert_eq!(data.nodes[0].id, "a");
		assert_eq!(data.nodes[1].desc, "second");
		assert!(data.links[0].strength.is_none());
	}

	#[test]
	fn desc_and_strength_are_optional() {
		let data = GraphData::from_json(
			r#"[{"id":"a"}]"#,
			r#"[{"source":"a","target":"a","strength":0.75}]"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].desc, "");
		assert_eq!(data.links[0].strength, Some(0.75));
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(GraphData::from_json("[{", "[]").is_err());
		assert!(GraphData::from_json("[]", r#"[{"source":"a"}]"#).is_err());
	}
}
