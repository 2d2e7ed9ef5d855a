pub mod about;
pub mod menu;

pub use about::AboutWindow;

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ShowAbout,
    OpenCredits(String),
    Quit,
}

/// Build the host window's UI. Returns a list of actions to process.
pub fn build_ui(ctx: &egui::Context, about_label: &str) -> Vec<UiAction> {
    let mut actions = Vec::new();

    // Menu bar
    actions.extend(menu::show_menu_bar(ctx, about_label));

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.with_layout(
            egui::Layout::centered_and_justified(egui::Direction::TopDown),
            |ui| {
                let button = egui::Button::new(egui::RichText::new(about_label).size(22.0))
                    .fill(egui::Color32::from_rgb(66, 133, 244).gamma_multiply(0.16));
                if ui.add_sized([220.0, 40.0], button).clicked() {
                    actions.push(UiAction::ShowAbout);
                }
            },
        );
    });

    actions
}
