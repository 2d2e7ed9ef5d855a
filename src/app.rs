use crate::config::Config;
use crate::credits::{self, UrlOpener};
use crate::metadata::{Descriptor, DisplayMetadata, MetadataSource};
use crate::ui::{AboutWindow, UiAction};

/// Resolve the metadata shown in the About window. A configured descriptor
/// file takes precedence; `fallback` is used when none is set or it cannot be read.
pub fn load_metadata(config: &Config, fallback: &dyn MetadataSource) -> DisplayMetadata {
    if let Some(path) = &config.descriptor_path {
        match Descriptor::load(path) {
            Ok(descriptor) => return DisplayMetadata::from_source(&descriptor),
            Err(e) => log::warn!("{:#}, using package metadata", e),
        }
    }
    DisplayMetadata::from_source(fallback)
}

/// Top-level owner of the About window. The window is built on first
/// request and kept afterwards, so there is at most one per host.
pub struct AboutHost {
    config: Config,
    metadata: DisplayMetadata,
    opener: Box<dyn UrlOpener>,
    about: Option<AboutWindow>,
}

impl AboutHost {
    pub fn new(config: Config, metadata: DisplayMetadata, opener: Box<dyn UrlOpener>) -> Self {
        Self {
            config,
            metadata,
            opener,
            about: None,
        }
    }

    pub fn metadata(&self) -> &DisplayMetadata {
        &self.metadata
    }

    /// Menu/button label, e.g. "About Demo".
    pub fn about_label(&self) -> String {
        format!("{}\u{a0}{}", self.config.labels.about, self.metadata.app_name)
    }

    pub fn about(&self) -> Option<&AboutWindow> {
        self.about.as_ref()
    }

    pub fn about_mut(&mut self) -> Option<&mut AboutWindow> {
        self.about.as_mut()
    }

    pub fn open_about(&mut self, ctx: &egui::Context) {
        let window = self.about.get_or_insert_with(|| {
            log::info!("Creating About window");
            AboutWindow::new(ctx, &self.config, self.metadata.clone())
        });
        window.open = true;
    }

    /// Draw the About window if it exists and handle what it asks for.
    pub fn show(&mut self, ctx: &egui::Context) {
        let actions = match &mut self.about {
            Some(window) => window.show(ctx),
            None => return,
        };
        for action in actions {
            self.handle(ctx, action);
        }
    }

    /// Process an action. Returns `false` for actions the host application must handle.
    pub fn handle(&mut self, ctx: &egui::Context, action: UiAction) -> bool {
        match action {
            UiAction::ShowAbout => {
                self.open_about(ctx);
                true
            }
            UiAction::OpenCredits(url) => {
                credits::open_credits(&url, self.opener.as_ref());
                true
            }
            UiAction::Quit => false,
        }
    }
}
