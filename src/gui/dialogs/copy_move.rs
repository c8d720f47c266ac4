use crate::dialog::{
    CopyMoveParams, CopyMoveSelection, DialogError, DialogKind, DialogParams, DialogResult,
    DialogValue, DialogWidget,
};
use eframe::egui;

#[derive(Default)]
pub struct CopyMoveObjectsDialog {
    params: Option<CopyMoveParams>,
    target: String,
}

impl CopyMoveObjectsDialog {
    pub fn parameters(&self) -> Option<&CopyMoveParams> {
        self.params.as_ref()
    }

    pub fn set_target(&mut self, target: &str) {
        self.target = target.to_string();
    }

    /// The selection to return, once objects and a target study are known.
    pub fn selection(&self) -> Option<CopyMoveSelection> {
        let p = self.params.as_ref()?;
        let target = self.target.trim();
        if target.is_empty() || p.objects.is_empty() {
            return None;
        }
        Some(CopyMoveSelection {
            action: p.action,
            objects: p.objects.clone(),
            target: target.to_string(),
        })
    }
}

impl DialogWidget for CopyMoveObjectsDialog {
    fn kind(&self) -> DialogKind {
        DialogKind::CopyMoveObjects
    }

    fn set_parameters(&mut self, params: DialogParams) -> Result<(), DialogError> {
        match params {
            DialogParams::CopyMove(p) => {
                self.target = p.target.clone().unwrap_or_default();
                self.params = Some(p);
                Ok(())
            }
            other => Err(other.mismatch(DialogKind::CopyMoveObjects)),
        }
    }

    fn title(&self) -> String {
        match &self.params {
            Some(p) => format!("{} objects", p.action.label()),
            None => "Copy/Move objects".into(),
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> Option<DialogResult> {
        let Some(p) = &self.params else {
            ui.label("Nothing selected");
            return ui.button("Close").clicked().then_some(None);
        };
        ui.label(format!("{} selected object(s)", p.objects.len()));
        egui::ScrollArea::vertical()
            .max_height(120.0)
            .show(ui, |ui| {
                for uid in &p.objects {
                    ui.monospace(uid);
                }
            });
        ui.horizontal(|ui| {
            ui.label("Target Study Instance UID");
            ui.text_edit_singleline(&mut self.target);
        });
        let selection = self.selection();
        let mut result = None;
        ui.horizontal(|ui| {
            let label = self
                .params
                .as_ref()
                .map(|p| p.action.label())
                .unwrap_or("Apply");
            if ui
                .add_enabled(selection.is_some(), egui::Button::new(label))
                .clicked()
            {
                result = Some(selection.clone().map(DialogValue::CopyMove));
            }
            if ui.button("Cancel").clicked() {
                result = Some(None);
            }
        });
        result
    }
}
