use leptos::prelude::*;
use log::error;

use crate::components::mindmap::{MindMapCanvas, TooltipInfo, TooltipKind, WorkCatalog, WorkDetails};

/// Catalog compiled into the app; the authoring tools produce this document.
const CATALOG_JSON: &str = include_str!("../../assets/works.json");

/// Decode the bundled catalog, falling back to an empty map on a bad document.
fn load_catalog() -> WorkCatalog {
	WorkCatalog::from_json(CATALOG_JSON).unwrap_or_else(|err| {
		error!("bundled catalog is invalid: {err}");
		WorkCatalog::default()
	})
}

/// Default Home Page: the full-screen mind map plus its tooltip and detail modal.
#[component]
pub fn Home() -> impl IntoView {
	let catalog = Signal::derive(load_catalog);
	let (details, set_details) = signal(None::<WorkDetails>);
	let (tooltip, set_tooltip) = signal(None::<(TooltipInfo, i32, i32)>);

	let on_open = Callback::new(move |d: WorkDetails| set_details.set(Some(d)));
	let on_tooltip = Callback::new(move |t: Option<(TooltipInfo, i32, i32)>| set_tooltip.set(t));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<MindMapCanvas
					data=catalog
					root_label="Works"
					fullscreen=true
					on_open=on_open
					on_tooltip=on_tooltip
				/>
				<div class="graph-overlay">
					<h1>"Works Mind Map"</h1>
					<p class="subtitle">
						"Drag to pan. Scroll or pinch to zoom. Click a work for details."
					</p>
				</div>
				{move || {
					tooltip
						.get()
						.map(|(info, x, y)| {
							let kind_class = match info.kind {
								TooltipKind::Center => "tooltip tooltip-center",
								TooltipKind::Category => "tooltip tooltip-category",
								TooltipKind::Work => "tooltip tooltip-work",
							};
							view! {
								<div class=kind_class style=format!("left: {x}px; top: {y}px;")>
									<strong>{info.label.clone()}</strong>
									{info
										.work_type
										.clone()
										.map(|t| view! { <div>{format!("Type: {t}")}</div> })}
									{info
										.category
										.clone()
										.map(|c| view! { <div>{format!("Category: {c}")}</div> })}
								</div>
							}
						})
				}}
				{move || {
					details
						.get()
						.map(|d| {
							view! {
								<WorkModal
									details=d
									on_close=Callback::new(move |()| set_details.set(None))
								/>
							}
						})
				}}
			</div>
		</ErrorBoundary>
	}
}

/// Detail dialog for one work, closed from the corner button or the backdrop.
#[component]
fn WorkModal(details: WorkDetails, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
	view! {
		<div class="modal" on:click=move |_| on_close.run(())>
			<div class="modal-content" on:click=|ev| ev.stop_propagation()>
				<span class="close" on:click=move |_| on_close.run(())>"\u{00d7}"</span>
				<h2>{details.title.clone()}</h2>
				<p class="modal-type">{format!("Type: {}", details.work_type)}</p>
				{details
					.description
					.clone()
					.map(|text| view! { <p class="modal-description">{text}</p> })}
				<div class="modal-links">
					{details
						.pdf_url
						.clone()
						.map(|href| {
							view! {
								<a class="download-link" href=href target="_blank">
									"Download PDF"
								</a>
							}
						})}
					{details
						.word_url
						.clone()
						.map(|href| {
							view! {
								<a class="download-link" href=href target="_blank">
									"Download Word"
								</a>
							}
						})}
				</div>
			</div>
		</div>
	}
}
