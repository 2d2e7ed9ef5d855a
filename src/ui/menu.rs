use crate::ui::UiAction;

pub fn show_menu_bar(ctx: &egui::Context, about_label: &str) -> Vec<UiAction> {
    let mut actions = Vec::new();

    let quit = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
    if ctx.input_mut(|i| i.consume_shortcut(&quit)) {
        actions.push(UiAction::Quit);
    }

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .add(egui::Button::new("Quit").shortcut_text("Ctrl+Q"))
                    .clicked()
                {
                    actions.push(UiAction::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button(about_label).clicked() {
                    actions.push(UiAction::ShowAbout);
                    ui.close_menu();
                }
            });
        });
    });

    actions
}
