mod attribute_form;
mod confirm;
mod copy_move;
mod edit_mwl;
mod edit_patient;
mod edit_study;

pub use attribute_form::AttributeForm;
pub use confirm::ConfirmDialog;
pub use copy_move::CopyMoveObjectsDialog;
pub use edit_mwl::EditMwlDialog;
pub use edit_patient::EditPatientDialog;
pub use edit_study::EditStudyDialog;

use crate::dialog::{DialogKind, DialogWidget};

/// Widget factory handed to [`crate::dialog::DialogCoordinator::new`].
pub fn instantiate(kind: DialogKind) -> Box<dyn DialogWidget> {
    match kind {
        DialogKind::Confirm => Box::<ConfirmDialog>::default(),
        DialogKind::EditPatient => Box::<EditPatientDialog>::default(),
        DialogKind::EditMwl => Box::<EditMwlDialog>::default(),
        DialogKind::EditStudy => Box::<EditStudyDialog>::default(),
        DialogKind::CopyMoveObjects => Box::<CopyMoveObjectsDialog>::default(),
    }
}
