use crate::attributes::Attributes;
use crate::dicom::ElementNames;
use eframe::egui;

/// Editable table of attributes shared by the edit dialogs.
#[derive(Default)]
pub struct AttributeForm {
    new_tag: String,
    new_value: String,
    error: Option<String>,
}

impl AttributeForm {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Add the pending tag/value pair to `attrs`.
    pub fn add(&mut self, attrs: &mut Attributes) {
        match attrs.insert_new(&self.new_tag, self.new_value.trim()) {
            Ok(()) => {
                self.new_tag.clear();
                self.new_value.clear();
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn set_pending(&mut self, tag: &str, value: &str) {
        self.new_tag = tag.to_string();
        self.new_value = value.to_string();
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        id_source: &str,
        attrs: &mut Attributes,
        names: &dyn ElementNames,
    ) {
        let mut remove: Option<String> = None;
        egui::Grid::new(id_source)
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                for (tag, value) in attrs.iter_mut() {
                    ui.monospace(tag.as_str());
                    ui.label(names.for_tag(tag).unwrap_or("Unknown"));
                    ui.text_edit_singleline(value);
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        remove = Some(tag.clone());
                    }
                    ui.end_row();
                }
            });
        if let Some(tag) = remove {
            attrs.remove(&tag);
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Tag");
            ui.add(egui::TextEdit::singleline(&mut self.new_tag).desired_width(80.0));
            ui.label("Value");
            ui.text_edit_singleline(&mut self.new_value);
            if ui.button("Add").clicked() {
                self.add(attrs);
            }
        });
        if let Some(name) = names.for_tag(&self.new_tag) {
            ui.small(name);
        }
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::YELLOW, err);
        }
    }
}
