pub mod app;
pub mod config;
pub mod credits;
pub mod egui_integration;
pub mod flip;
pub mod images;
pub mod metadata;
pub mod ui;

pub use app::AboutHost;
pub use flip::{Face, FlipController, FlipState};
pub use metadata::{DisplayMetadata, MetadataSource};
