use leptos::prelude::*;
use log::{error, warn};
use web_sys::Document;

use crate::components::graph_view::{GraphData, GraphView};

fn embedded_json(document: &Document, id: &str) -> Option<String> {
	document.get_element_by_id(id).and_then(|el| el.text_content())
}

/// Parse the `#nodes`/`#links` payloads the page embeds. Missing elements or
/// malformed JSON are logged; the caller keeps whatever data it already has.
fn load_graph_data() -> Option<GraphData> {
	let document = web_sys::window().and_then(|w| w.document())?;
	let (Some(nodes), Some(links)) = (
		embedded_json(&document, "nodes"),
		embedded_json(&document, "links"),
	) else {
		warn!("missing #nodes or #links payload");
		return None;
	};
	match GraphData::from_json(&nodes, &links) {
		Ok(data) => Some(data),
		Err(e) => {
			error!("failed to parse embedded graph data: {e}");
			None
		}
	}
}

/// Graph page: parses the embedded payloads once on load and again whenever
/// the redraw button is clicked.
#[component]
pub fn Home() -> impl IntoView {
	let (graph_data, set_graph_data) = signal(load_graph_data().unwrap_or_default());

	let on_redraw = move |_| {
		if let Some(data) = load_graph_data() {
			set_graph_data.set(data);
		}
	};

	view! {
		<div class="graph-page">
			<button id="redraw" on:click=on_redraw>
				"Redraw"
			</button>
			<GraphView data=graph_data />
		</div>
	}
}
