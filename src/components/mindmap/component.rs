use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::render;
use super::state::{InputEvent, MindMapState, Outcome, UiAction};
use super::types::{TooltipInfo, WorkCatalog, WorkDetails};

type SharedState = Rc<RefCell<Option<MindMapState>>>;
type SharedContext = Rc<RefCell<Option<CanvasRenderingContext2d>>>;

fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn repaint(state: &MindMapState, ctx: &SharedContext) {
	if let Some(ctx) = ctx.borrow().as_ref() {
		render::render(state, ctx);
	}
}

/// Repaint if the reducer asked for it, then hand its action to the host.
fn settle(
	outcome: Outcome,
	state: &MindMapState,
	ctx: &SharedContext,
	on_open: Callback<WorkDetails>,
	on_tooltip: Callback<Option<(TooltipInfo, i32, i32)>>,
	pointer_page: Option<(i32, i32)>,
) {
	if outcome.redraw {
		repaint(state, ctx);
	}
	match outcome.action {
		Some(UiAction::OpenWork(details)) => on_open.run(details),
		Some(UiAction::Hover(info)) => {
			if let Some((px, py)) = pointer_page {
				on_tooltip.run(Some((info, px + 10, py + 10)));
			}
		}
		Some(UiAction::ClearHover) => on_tooltip.run(None),
		None => {}
	}
}

#[component]
pub fn MindMapCanvas(
	#[prop(into)] data: Signal<WorkCatalog>,
	#[prop(into, default = String::from("Works"))] root_label: String,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(into)] on_open: Callback<WorkDetails>,
	#[prop(into)] on_tooltip: Callback<Option<(TooltipInfo, i32, i32)>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let ctx: SharedContext = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, ctx_init, resize_cb_init) = (state.clone(), ctx.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let context: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(MindMapState::new(
			data.get().works,
			root_label.clone(),
			w,
			h,
		));
		*ctx_init.borrow_mut() = Some(context);
		if let Some(ref s) = *state_init.borrow() {
			repaint(s, &ctx_init);
		}

		if fullscreen {
			let (state_resize, ctx_resize, canvas_resize) =
				(state_init.clone(), ctx_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					// The user keeps their pan/zoom; only the layout moves.
					let outcome = s.apply(InputEvent::Resize {
						width: nw,
						height: nh,
					});
					if outcome.redraw {
						repaint(s, &ctx_resize);
					}
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let (state_md, ctx_md) = (state.clone(), ctx.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_md.borrow_mut() {
			let outcome = s.apply(InputEvent::PointerDown { x, y });
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "grabbing");
			settle(outcome, s, &ctx_md, on_open, on_tooltip, None);
		}
	};

	let (state_mm, ctx_mm) = (state.clone(), ctx.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let outcome = s.apply(InputEvent::PointerMove { x, y });
			let cursor = if s.is_panning() {
				"grabbing"
			} else if s.is_hovering() {
				"pointer"
			} else {
				"default"
			};
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			settle(
				outcome,
				s,
				&ctx_mm,
				on_open,
				on_tooltip,
				Some((ev.page_x(), ev.page_y())),
			);
		}
	};

	let (state_mu, ctx_mu) = (state.clone(), ctx.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			let outcome = s.apply(InputEvent::PointerUp { x, y });
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "default");
			settle(outcome, s, &ctx_mu, on_open, on_tooltip, None);
		}
	};

	let (state_ml, ctx_ml) = (state.clone(), ctx.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			let outcome = s.apply(InputEvent::PointerLeave);
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "default");
			settle(outcome, s, &ctx_ml, on_open, on_tooltip, None);
		}
	};

	let (state_wh, ctx_wh) = (state.clone(), ctx.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let outcome = s.apply(InputEvent::Wheel {
				x,
				y,
				delta_y: ev.delta_y(),
			});
			settle(outcome, s, &ctx_wh, on_open, on_tooltip, None);
		}
	};

	let (state_ts, ctx_ts) = (state.clone(), ctx.clone());
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let touches = ev.touches();
		if let Some(ref mut s) = *state_ts.borrow_mut() {
			let outcome = if touches.length() == 1 {
				let touch = touches.item(0).unwrap();
				let (x, y) = canvas_point(&canvas, touch.client_x(), touch.client_y());
				s.apply(InputEvent::PointerDown { x, y })
			} else if touches.length() >= 2 {
				let (a, b) = (touches.item(0).unwrap(), touches.item(1).unwrap());
				let distance = f64::from(b.client_x() - a.client_x())
					.hypot(f64::from(b.client_y() - a.client_y()));
				s.apply(InputEvent::PinchStart { distance })
			} else {
				Outcome::default()
			};
			settle(outcome, s, &ctx_ts, on_open, on_tooltip, None);
		}
	};

	let (state_tm, ctx_tm) = (state.clone(), ctx.clone());
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let touches = ev.touches();
		if let Some(ref mut s) = *state_tm.borrow_mut() {
			let outcome = if touches.length() == 1 {
				let touch = touches.item(0).unwrap();
				let (x, y) = canvas_point(&canvas, touch.client_x(), touch.client_y());
				s.apply(InputEvent::PointerMove { x, y })
			} else if touches.length() >= 2 {
				let (a, b) = (touches.item(0).unwrap(), touches.item(1).unwrap());
				let distance = f64::from(b.client_x() - a.client_x())
					.hypot(f64::from(b.client_y() - a.client_y()));
				let (x, y) = canvas_point(
					&canvas,
					(a.client_x() + b.client_x()) / 2,
					(a.client_y() + b.client_y()) / 2,
				);
				s.apply(InputEvent::PinchMove { distance, x, y })
			} else {
				Outcome::default()
			};
			settle(outcome, s, &ctx_tm, on_open, on_tooltip, None);
		}
	};

	let (state_te, ctx_te) = (state.clone(), ctx.clone());
	let on_touchend = move |ev: TouchEvent| {
		if let Some(ref mut s) = *state_te.borrow_mut() {
			let outcome = if let Some(touch) = ev.changed_touches().item(0) {
				let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
				let (x, y) = canvas_point(&canvas, touch.client_x(), touch.client_y());
				s.apply(InputEvent::PointerUp { x, y })
			} else {
				s.apply(InputEvent::PointerLeave)
			};
			let _ = s.apply(InputEvent::PinchEnd);
			settle(outcome, s, &ctx_te, on_open, on_tooltip, None);
		}
	};

	let (state_zi, ctx_zi) = (state.clone(), ctx.clone());
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			let outcome = s.apply(InputEvent::ZoomStep { factor: 1.2 });
			settle(outcome, s, &ctx_zi, on_open, on_tooltip, None);
		}
	};

	let (state_zo, ctx_zo) = (state.clone(), ctx.clone());
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			let outcome = s.apply(InputEvent::ZoomStep { factor: 0.8 });
			settle(outcome, s, &ctx_zo, on_open, on_tooltip, None);
		}
	};

	let (state_rs, ctx_rs) = (state.clone(), ctx.clone());
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_rs.borrow_mut() {
			let outcome = s.apply(InputEvent::ResetView);
			settle(outcome, s, &ctx_rs, on_open, on_tooltip, None);
		}
	};

	let on_fullscreen_toggle = move |_: MouseEvent| {
		let document = web_sys::window().unwrap().document().unwrap();
		if document.fullscreen_element().is_some() {
			document.exit_fullscreen();
		} else if let Some(root) = document.document_element() {
			let _ = root.request_fullscreen();
		}
	};

	view! {
		<div class="mindmap-container">
			<canvas
				node_ref=canvas_ref
				class="mindmap-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				style="display: block; cursor: default; touch-action: none;"
			/>
			<div class="mindmap-controls">
				<button title="Zoom in" on:click=on_zoom_in>"+"</button>
				<button title="Zoom out" on:click=on_zoom_out>"\u{2212}"</button>
				<button title="Reset view" on:click=on_reset>"Reset"</button>
				<button title="Fullscreen" on:click=on_fullscreen_toggle>"Full"</button>
			</div>
		</div>
	}
}
