use super::attribute_form::AttributeForm;
use crate::dialog::{
    DialogError, DialogKind, DialogParams, DialogResult, DialogValue, DialogWidget,
    EditStudyParams,
};
use crate::dicom::StandardElements;
use eframe::egui;

#[derive(Default)]
pub struct EditStudyDialog {
    params: Option<EditStudyParams>,
    form: AttributeForm,
    error: Option<String>,
}

impl EditStudyDialog {
    pub fn parameters(&self) -> Option<&EditStudyParams> {
        self.params.as_ref()
    }

    pub fn submit(&mut self) -> Result<DialogValue, String> {
        let Some(p) = &self.params else {
            return Err("No study loaded".into());
        };
        if p.study.study_instance_uid().is_none() {
            return Err("Study Instance UID is required".into());
        }
        Ok(DialogValue::Study(p.study.clone()))
    }
}

impl DialogWidget for EditStudyDialog {
    fn kind(&self) -> DialogKind {
        DialogKind::EditStudy
    }

    fn set_parameters(&mut self, params: DialogParams) -> Result<(), DialogError> {
        match params {
            DialogParams::EditStudy(p) => {
                self.params = Some(p);
                Ok(())
            }
            other => Err(other.mismatch(DialogKind::EditStudy)),
        }
    }

    fn title(&self) -> String {
        let desc = self
            .params
            .as_ref()
            .and_then(|p| p.study.description().map(str::to_string));
        match desc {
            Some(d) => format!("Edit study: {d}"),
            None => "Edit study".into(),
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> Option<DialogResult> {
        let Some(p) = self.params.as_mut() else {
            ui.label("No study loaded");
            return ui.button("Close").clicked().then_some(None);
        };
        self.form
            .ui(ui, "study_attrs", &mut p.study.attrs, &StandardElements);
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
