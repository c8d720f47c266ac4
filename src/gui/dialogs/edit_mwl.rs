use super::attribute_form::AttributeForm;
use crate::dialog::{
    DialogError, DialogKind, DialogParams, DialogResult, DialogValue, DialogWidget, EditMode,
    EditMwlParams,
};
use crate::dicom::StandardElements;
use eframe::egui;

/// Editor for a modality worklist entry.
#[derive(Default)]
pub struct EditMwlDialog {
    params: Option<EditMwlParams>,
    form: AttributeForm,
    error: Option<String>,
}

impl EditMwlDialog {
    pub fn parameters(&self) -> Option<&EditMwlParams> {
        self.params.as_ref()
    }

    pub fn submit(&mut self) -> Result<DialogValue, String> {
        let Some(p) = &self.params else {
            return Err("No worklist item loaded".into());
        };
        if p.item.scheduled_step_id().is_none() {
            return Err("Scheduled Procedure Step ID is required".into());
        }
        Ok(DialogValue::Mwl(p.item.clone()))
    }
}

impl DialogWidget for EditMwlDialog {
    fn kind(&self) -> DialogKind {
        DialogKind::EditMwl
    }

    fn set_parameters(&mut self, params: DialogParams) -> Result<(), DialogError> {
        match params {
            DialogParams::EditMwl(p) => {
                self.params = Some(p);
                Ok(())
            }
            other => Err(other.mismatch(DialogKind::EditMwl)),
        }
    }

    fn title(&self) -> String {
        match self.params.as_ref().map(|p| p.mode) {
            Some(EditMode::Edit) => "Edit MWL".into(),
            _ => "Create new MWL".into(),
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> Option<DialogResult> {
        let Some(p) = self.params.as_mut() else {
            ui.label("No worklist item loaded");
            return ui.button("Close").clicked().then_some(None);
        };
        if let Some(aet) = p.item.station_aet() {
            ui.label(format!("Scheduled station: {aet}"));
        }
        self.form
            .ui(ui, "mwl_attrs", &mut p.item.attrs, &StandardElements);
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
        let mut result = None;
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                match self.submit() {
                    Ok(v) => result = Some(Some(v)),
                    Err(e) => self.error = Some(e),
                }
            }
            if ui.button("Cancel").clicked() {
                result = Some(None);
            }
        });
        result
    }
}
