use super::attribute_form::AttributeForm;
use crate::dialog::{
    DialogError, DialogKind, DialogParams, DialogResult, DialogValue, DialogWidget, EditMode,
    EditPatientParams,
};
use crate::dicom::StandardElements;
use eframe::egui;

#[derive(Default)]
pub struct EditPatientDialog {
    params: Option<EditPatientParams>,
    form: AttributeForm,
    error: Option<String>,
}

impl EditPatientDialog {
    pub fn parameters(&self) -> Option<&EditPatientParams> {
        self.params.as_ref()
    }

    pub fn form_mut(&mut self) -> &mut AttributeForm {
        &mut self.form
    }

    /// Add the pending attribute row to the patient being edited.
    pub fn add_pending(&mut self) {
        if let Some(p) = self.params.as_mut() {
            self.form.add(&mut p.patient.attrs);
        }
    }

    /// Validate the form and produce the dialog result.
    pub fn submit(&mut self) -> Result<DialogValue, String> {
        let Some(p) = &self.params else {
            return Err("No patient loaded".into());
        };
        if p.patient.patient_id().is_none() {
            return Err("Patient ID is required".into());
        }
        Ok(DialogValue::Patient(p.patient.clone()))
    }
}

impl DialogWidget for EditPatientDialog {
    fn kind(&self) -> DialogKind {
        DialogKind::EditPatient
    }

    fn set_parameters(&mut self, params: DialogParams) -> Result<(), DialogError> {
        match params {
            DialogParams::EditPatient(p) => {
                self.params = Some(p);
                Ok(())
            }
            other => Err(other.mismatch(DialogKind::EditPatient)),
        }
    }

    fn title(&self) -> String {
        match self.params.as_ref().map(|p| p.mode) {
            Some(EditMode::Edit) => "Edit patient".into(),
            _ => "Create new patient".into(),
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> Option<DialogResult> {
        let Some(p) = self.params.as_mut() else {
            ui.label("No patient loaded");
            return ui.button("Close").clicked().then_some(None);
        };
        self.form
            .ui(ui, "patient_attrs", &mut p.patient.attrs, &StandardElements);
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
