mod bookmarks;
mod config;
mod fonts;
mod layout;
mod rendering;

pub use config::{RenderStats, PDF};
