use crate::dialog::{ConfirmParams, DialogError, DialogKind, DialogParams, DialogResult, DialogValue, DialogWidget};
use eframe::egui;

#[derive(Debug, Default)]
pub struct ConfirmDialog {
    params: Option<ConfirmParams>,
}

impl ConfirmDialog {
    pub fn parameters(&self) -> Option<&ConfirmParams> {
        self.params.as_ref()
    }
}

impl DialogWidget for ConfirmDialog {
    fn kind(&self) -> DialogKind {
        DialogKind::Confirm
    }

    fn set_parameters(&mut self, params: DialogParams) -> Result<(), DialogError> {
        match params {
            DialogParams::Confirm(p) => {
                self.params = Some(p);
                Ok(())
            }
            other => Err(other.mismatch(DialogKind::Confirm)),
        }
    }

    fn title(&self) -> String {
        self.params
            .as_ref()
            .map(|p| p.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Confirm".into())
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> Option<DialogResult> {
        if let Some(p) = &self.params {
            ui.label(&p.content);
        }
        let mut result = None;
        ui.horizontal(|ui| {
            if ui.button("OK").clicked() {
                result = Some(Some(DialogValue::Ok));
            }
            if ui.button("Cancel").clicked() {
                result = Some(None);
            }
        });
        result
    }

    /// Only Enter and Escape resolve a confirmation.
    fn on_key(&mut self, key: egui::Key) -> Option<DialogResult> {
        match key {
            egui::Key::Enter => Some(Some(DialogValue::Ok)),
            egui::Key::Escape => Some(None),
            _ => None,
        }
    }
}
