use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use gantt_timeline::Scale;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Tasks...").clicked() {
                app.open_tasks();
                ui.close_menu();
            }
            if ui.button("  Reload Sample").clicked() {
                app.load_sample();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Timeline Scale").small().weak());
            let mut scale = app.scale();
            for candidate in Scale::ALL {
                if ui.radio_value(&mut scale, candidate, candidate.title()).clicked() {
                    ui.close_menu();
                }
            }
            if scale != app.scale() {
                app.set_scale(scale);
            }
        });

        ui.separator();

        let today = egui::Button::new(
            RichText::new(format!("{}  Today", egui_phosphor::regular::CALENDAR_CHECK)).size(12.0),
        );
        if ui.add(today).on_hover_text("Scroll to the current time").clicked() {
            app.jump_to_today();
        }

        ui.label(RichText::new("Go to").size(11.0).color(theme::TEXT_SECONDARY));
        let picker = ui.add(
            egui_extras::DatePickerButton::new(&mut app.jump_date).id_salt("dp_jump"),
        );
        if picker.changed() {
            app.jump_to_selected_date();
        }

        // Right-aligned scale and window position
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let window = app.coordinator.window();
            ui.label(
                RichText::new(format!(
                    "{} · offset {:+}",
                    window.scale().title(),
                    window.virtual_offset()
                ))
                .size(11.0)
                .weak(),
            );
        });
    });
}
