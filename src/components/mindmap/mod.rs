mod component;
mod layout;
mod render;
mod state;
mod types;

pub use component::MindMapCanvas;
pub use types::{DownloadLinks, TooltipInfo, TooltipKind, WorkCatalog, WorkDetails, WorkRecord};
