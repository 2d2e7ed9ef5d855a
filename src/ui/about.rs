use std::f32::consts::FRAC_PI_2;
use std::time::Instant;

use egui::text::{LayoutJob, TextFormat, TextWrapping};
use egui::{Color32, FontId, Rect, Sense, TextureHandle, Vec2};

use crate::config::{Config, Labels};
use crate::flip::{Face, FlipController};
use crate::images;
use crate::metadata::DisplayMetadata;
use crate::ui::UiAction;

const ICON_SIZE: f32 = 128.0;
const ICON_CORNER_RADIUS: f32 = 24.0;
const ICON_PLACEHOLDER_PADDING: f32 = 13.0;
const LOGO_MAX_HEIGHT: f32 = 12.0;
const COPYRIGHT_ROW_HEIGHT: f32 = 38.0;
const HOVER_FADE_SECS: f32 = 0.16;
/// Alpha of the white wash drawn over the icon while hovered.
const HOVER_LIFT_ALPHA: f32 = 13.0;

/// The About window: app icon with a flip-to-reveal back face, name,
/// version, credits link and a copyright line that flips to the
/// organization logo on hover.
pub struct AboutWindow {
    pub open: bool,
    metadata: DisplayMetadata,
    labels: Labels,
    credits_url: Option<String>,
    size: Vec2,
    icon_flip: FlipController,
    copyright_flip: FlipController,
    icon_hovered: bool,
    copyright_hovered: bool,
    icon_front: Option<TextureHandle>,
    icon_back: Option<TextureHandle>,
    organization_logo: Option<TextureHandle>,
    icon_rect: Option<Rect>,
    copyright_rect: Option<Rect>,
}

impl AboutWindow {
    pub fn new(ctx: &egui::Context, config: &Config, metadata: DisplayMetadata) -> Self {
        Self {
            open: false,
            metadata,
            labels: config.labels.clone(),
            credits_url: config.credits_url.clone(),
            size: Vec2::new(config.window_width, config.window_height),
            icon_flip: FlipController::with_timing(config.icon_timing()),
            copyright_flip: FlipController::with_timing(config.copyright_timing()),
            icon_hovered: false,
            copyright_hovered: false,
            icon_front: images::load_texture(ctx, "about_icon_front", config.icon_front_path.as_deref()),
            icon_back: images::load_texture(ctx, "about_icon_back", config.icon_back_path.as_deref()),
            organization_logo: images::load_texture(
                ctx,
                "about_organization_logo",
                config.organization_logo_path.as_deref(),
            ),
            icon_rect: None,
            copyright_rect: None,
        }
    }

    pub fn metadata(&self) -> &DisplayMetadata {
        &self.metadata
    }

    /// Screen area of the app icon as laid out in the last frame.
    pub fn icon_rect(&self) -> Option<Rect> {
        self.icon_rect
    }

    /// Screen area of the copyright row as laid out in the last frame.
    pub fn copyright_rect(&self) -> Option<Rect> {
        self.copyright_rect
    }

    pub fn icon_flip(&self) -> &FlipController {
        &self.icon_flip
    }

    pub fn icon_flip_mut(&mut self) -> &mut FlipController {
        &mut self.icon_flip
    }

    pub fn copyright_flip(&self) -> &FlipController {
        &self.copyright_flip
    }

    pub fn title(&self) -> String {
        format!("{}\u{a0}{}", self.labels.about, self.metadata.app_name)
    }

    /// Line under the app name, e.g. "Version 1.2 (345)".
    pub fn version_line(&self) -> (String, String) {
        (
            format!(
                "{}\u{a0}{}",
                self.labels.version, self.metadata.version_marketing
            ),
            format!("({})", self.metadata.version_build),
        )
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Vec<UiAction> {
        let mut actions = Vec::new();
        if !self.open {
            return actions;
        }

        let now = Instant::now();
        self.icon_flip.tick(now);
        self.copyright_flip.tick(now);

        let mut open = self.open;
        egui::Window::new(self.title())
            .id(egui::Id::new("about_window"))
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .fixed_size(self.size)
            .pivot(egui::Align2::CENTER_CENTER)
            .default_pos(ctx.screen_rect().center())
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(28.0);
                    self.show_icon(ui, now);
                    ui.add_space(14.0);

                    ui.label(
                        egui::RichText::new(&self.metadata.app_name)
                            .size(22.0)
                            .strong(),
                    );
                    ui.add_space(6.0);
                    self.show_version(ui);

                    ui.add_space(36.0);
                    if let Some(url) = &self.credits_url {
                        if ui.button(&self.labels.credits).clicked() {
                            actions.push(UiAction::OpenCredits(url.clone()));
                        }
                    }
                    ui.add_space(36.0);

                    ui.separator();
                    self.show_copyright(ui, now);
                });
            });
        self.open = open;

        if self.icon_flip.is_animating() || self.copyright_flip.is_animating() {
            ctx.request_repaint();
        }

        actions
    }

    fn show_icon(&mut self, ui: &mut egui::Ui, now: Instant) {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(ICON_SIZE), Sense::click());
        self.icon_rect = Some(rect);

        if response.clicked() {
            self.icon_flip.trigger(now);
        }
        let hovered = response.hovered();
        if self.icon_hovered && !hovered {
            // Leaving the icon turns it back to the app icon.
            self.icon_flip.request(Face::Front, now);
        }
        self.icon_hovered = hovered;

        let hover = ui
            .ctx()
            .animate_bool_with_time(response.id, hovered, HOVER_FADE_SECS);
        let face = self.icon_flip.drawn_face();
        let turn = match face {
            Face::Front => self.icon_flip.front_turn(now),
            Face::Back => self.icon_flip.back_turn(now),
        };
        let squash = (turn * FRAC_PI_2).cos();
        let face_rect = Rect::from_center_size(
            rect.center(),
            Vec2::new(rect.width() * squash, rect.height()),
        );
        if face_rect.width() < 0.5 {
            return;
        }

        let texture = match face {
            Face::Front => self.icon_front.as_ref(),
            Face::Back => self.icon_back.as_ref(),
        };
        let painter = ui.painter();
        let corner_radius = ICON_CORNER_RADIUS * squash.max(0.2);
        let face_area = match texture {
            Some(texture) => {
                painter.image(texture.id(), face_rect, full_uv(), Color32::WHITE);
                face_rect
            }
            None => {
                let inset = ICON_PLACEHOLDER_PADDING * squash;
                let placeholder = face_rect.shrink2(Vec2::new(inset, ICON_PLACEHOLDER_PADDING));
                painter.rect_filled(placeholder, corner_radius, ui.visuals().weak_text_color());
                placeholder
            }
        };

        if let Some(lift) = hover_lift(hover) {
            painter.rect_filled(face_area, corner_radius, lift);
        }
    }

    fn show_version(&self, ui: &mut egui::Ui) {
        let (version, build) = self.version_line();
        let weak = ui.visuals().weak_text_color();

        let mut job = LayoutJob::default();
        job.append(
            &version,
            0.0,
            TextFormat {
                font_id: FontId::proportional(14.0),
                color: weak,
                ..Default::default()
            },
        );
        job.append(
            &build,
            4.0,
            TextFormat {
                font_id: FontId::monospace(13.0),
                color: weak.gamma_multiply(0.7),
                ..Default::default()
            },
        );
        ui.label(job);
    }

    fn show_copyright(&mut self, ui: &mut egui::Ui, now: Instant) {
        let width = ui.available_width();
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(width, COPYRIGHT_ROW_HEIGHT), Sense::hover());
        self.copyright_rect = Some(rect);

        let text_color = ui.visuals().text_color();
        ui.painter()
            .rect_filled(rect, 0.0, text_color.gamma_multiply(0.03));

        let hovered = response.hovered();
        if self.organization_logo.is_some() && hovered != self.copyright_hovered {
            let face = if hovered { Face::Back } else { Face::Front };
            self.copyright_flip.request(face, now);
        }
        self.copyright_hovered = hovered;

        let face = self.copyright_flip.drawn_face();
        let turn = match face {
            Face::Front => self.copyright_flip.front_turn(now),
            Face::Back => self.copyright_flip.back_turn(now),
        };
        let squash = (turn * FRAC_PI_2).cos();
        let color = ui.visuals().weak_text_color().gamma_multiply(0.7);

        match (face, &self.organization_logo) {
            (Face::Back, Some(logo)) => {
                let [w, h] = logo.size();
                let height = (h as f32).min(LOGO_MAX_HEIGHT);
                let aspect = if h == 0 { 1.0 } else { w as f32 / h as f32 };
                let logo_rect = Rect::from_center_size(
                    rect.center(),
                    Vec2::new(height * aspect, height * squash),
                );
                ui.painter().image(logo.id(), logo_rect, full_uv(), color);
            }
            _ => {
                let mut job = LayoutJob::single_section(
                    self.metadata.copyright_text.clone(),
                    TextFormat {
                        font_id: FontId::proportional(11.0),
                        color,
                        ..Default::default()
                    },
                );
                job.wrap = TextWrapping::truncate_at_width(width - 16.0);
                let galley = ui.fonts(|f| f.layout_job(job));

                let pos = rect.center() - galley.size() / 2.0;
                let visible = Rect::from_center_size(
                    rect.center(),
                    Vec2::new(rect.width(), galley.size().y * squash),
                );
                ui.painter()
                    .with_clip_rect(visible)
                    .galley(pos, galley, color);
            }
        }

        response.on_hover_text(&self.metadata.copyright_text);
    }
}

/// White wash laid over the icon for a hover fade of `hover` (0 to 1).
fn hover_lift(hover: f32) -> Option<Color32> {
    let alpha = (HOVER_LIFT_ALPHA * hover.clamp(0.0, 1.0)).round() as u8;
    (alpha > 0).then(|| Color32::from_white_alpha(alpha))
}

fn full_uv() -> Rect {
    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}
