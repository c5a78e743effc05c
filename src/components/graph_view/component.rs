use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, Window};

use super::scene::GraphScene;
use super::state::GraphState;
use super::types::GraphData;

/// Translate a pointer event into viewBox coordinates (origin-centered).
fn pointer_to_graph(svg: &Element, ev: &MouseEvent, width: f64, height: f64) -> (f64, f64) {
	let rect = svg.get_bounding_client_rect();
	let sx = ev.client_x() as f64 - rect.left();
	let sy = ev.client_y() as f64 - rect.top();
	let kx = if rect.width() > 0.0 {
		width / rect.width()
	} else {
		1.0
	};
	let ky = if rect.height() > 0.0 {
		height / rect.height()
	} else {
		1.0
	};
	(sx * kx - width / 2.0, sy * ky - height / 2.0)
}

/// Halt the previous draw: cancel the pending animation frame, drop the
/// simulation, and detach its SVG root. Rebuilding without this would leak
/// the old frame callback (the original implementation only removed the SVG).
fn dispose(
	raf_id: &Cell<Option<i32>>,
	animate: &RefCell<Option<Closure<dyn FnMut()>>>,
	state: &RefCell<Option<GraphState>>,
	scene: &RefCell<Option<GraphScene>>,
) {
	if let Some(id) = raf_id.take() {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(id);
		}
	}
	animate.borrow_mut().take();
	state.borrow_mut().take();
	if let Some(scene) = scene.borrow_mut().take() {
		scene.remove();
	}
}

#[component]
pub fn GraphView(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = 1200.0)] width: f64,
	#[prop(default = 800.0)] height: f64,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let scene: Rc<RefCell<Option<GraphScene>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (state_init, scene_init, animate_init, raf_init) = (
		state.clone(),
		scene.clone(),
		animate.clone(),
		raf_id.clone(),
	);

	Effect::new(move |_| {
		// Reading the signal here makes a data change re-run the whole
		// draw: teardown, rebuild, restart.
		let data = data.get();
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: Element = container.into();
		let window: Window = web_sys::window().unwrap();
		let document = window.document().unwrap();

		dispose(&raf_init, &animate_init, &state_init, &scene_init);

		let graph_state = GraphState::new(&data, width, height);
		let graph_scene = match GraphScene::build(&document, &container, &graph_state, width, height)
		{
			Ok(scene) => scene,
			Err(e) => {
				error!("failed to build graph scene: {e:?}");
				return;
			}
		};
		graph_scene.sync(&graph_state);
		*state_init.borrow_mut() = Some(graph_state);
		*scene_init.borrow_mut() = Some(graph_scene);

		let (state_anim, scene_anim, animate_inner, raf_anim) = (
			state_init.clone(),
			scene_init.clone(),
			animate_init.clone(),
			raf_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut state_ref = state_anim.borrow_mut();
				let scene_ref = scene_anim.borrow();
				if let (Some(s), Some(sc)) = (state_ref.as_mut(), scene_ref.as_ref()) {
					s.tick(0.016);
					sc.sync(s);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(id) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					raf_anim.set(Some(id));
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				raf_init.set(Some(id));
			}
		}
	});

	let (state_md, scene_md) = (state.clone(), scene.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let scene_ref = scene_md.borrow();
		let Some(sc) = scene_ref.as_ref() else {
			return;
		};
		let (x, y) = pointer_to_graph(sc.svg(), &ev, width, height);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.begin_drag(idx);
			}
		}
	};

	let (state_mm, scene_mm) = (state.clone(), scene.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let scene_ref = scene_mm.borrow();
		let Some(sc) = scene_ref.as_ref() else {
			return;
		};
		let (x, y) = pointer_to_graph(sc.svg(), &ev, width, height);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				s.end_drag();
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.drag.active {
				s.end_drag();
			}
			s.set_hover(None);
		}
	};

	// on_cleanup demands Send + Sync; the handles are single-threaded Rc's,
	// so a SendWrapper carries them across the bound.
	let cleanup = SendWrapper::new((state.clone(), scene.clone(), animate.clone(), raf_id.clone()));
	on_cleanup(move || {
		let (state, scene, animate, raf_id) = &*cleanup;
		dispose(raf_id, animate, state, scene);
	});

	view! {
		<div
			class="graph-view"
			node_ref=container_ref
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
		/>
	}
}
