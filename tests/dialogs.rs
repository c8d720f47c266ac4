use arc_console::attributes::{PatientRecord, STUDY_INSTANCE_UID};
use arc_console::dialog::{
    ConfirmParams, CopyMoveParams, DialogCoordinator, DialogError, DialogKind, DialogParams,
    DialogResult, DialogValue, DialogWidget, EditMode, EditPatientParams, EditStudyParams,
    TransferAction,
};
use arc_console::gui::dialogs::{
    self, ConfirmDialog, CopyMoveObjectsDialog, EditPatientDialog, EditStudyDialog,
};
use eframe::egui;
use std::sync::{Arc, Mutex};

fn coordinator() -> (egui::Context, DialogCoordinator) {
    let ctx = egui::Context::default();
    let mut coord = DialogCoordinator::new(dialogs::instantiate);
    coord.attach_container(ctx.clone());
    (ctx, coord)
}

fn confirm_params() -> DialogParams {
    DialogParams::Confirm(ConfirmParams {
        title: "Delete".into(),
        content: "Really?".into(),
    })
}

fn recorder() -> (
    Arc<Mutex<Vec<DialogResult>>>,
    impl FnOnce(DialogResult) + Send + 'static,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |r| sink.lock().unwrap().push(r))
}

fn key_press(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::default(),
    }
}

#[test]
fn enter_confirms_once() {
    let (_ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord.open(DialogKind::Confirm, confirm_params()).unwrap().on_close(cb);

    assert!(coord.handle_key(egui::Key::Enter));
    assert!(!coord.is_open());
    assert!(!coord.handle_key(egui::Key::Enter));
    assert_eq!(*log.lock().unwrap(), vec![Some(DialogValue::Ok)]);
}

#[test]
fn escape_cancels() {
    let (_ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord.open(DialogKind::Confirm, confirm_params()).unwrap().on_close(cb);

    assert!(coord.handle_key(egui::Key::Escape));
    assert_eq!(*log.lock().unwrap(), vec![None]);
}

#[test]
fn other_keys_are_ignored() {
    let (_ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord.open(DialogKind::Confirm, confirm_params()).unwrap().on_close(cb);

    for key in [egui::Key::A, egui::Key::Space, egui::Key::Tab, egui::Key::Backspace] {
        assert!(!coord.handle_key(key));
    }
    assert!(coord.is_open());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn key_events_from_frame_input_resolve_dialog() {
    let (ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord.open(DialogKind::Confirm, confirm_params()).unwrap().on_close(cb);

    let input = egui::RawInput {
        events: vec![key_press(egui::Key::A)],
        ..Default::default()
    };
    let _ = ctx.run(input, |_| coord.ui());
    assert!(coord.is_open());

    let input = egui::RawInput {
        events: vec![key_press(egui::Key::Enter)],
        ..Default::default()
    };
    let _ = ctx.run(input, |_| coord.ui());
    assert!(!coord.is_open());
    assert_eq!(*log.lock().unwrap(), vec![Some(DialogValue::Ok)]);
}

#[test]
fn reopen_after_close_gives_fresh_session() {
    let (_ctx, mut coord) = coordinator();
    let (first_log, first_cb) = recorder();
    let first = coord.open(DialogKind::Confirm, confirm_params()).unwrap();
    let first_id = first.id();
    first.on_close(first_cb);
    coord.handle_key(egui::Key::Escape);

    let (second_log, second_cb) = recorder();
    let second = coord.open(DialogKind::Confirm, confirm_params()).unwrap();
    assert_ne!(second.id(), first_id);
    second.on_close(second_cb);
    coord.handle_key(egui::Key::Enter);

    assert_eq!(*first_log.lock().unwrap(), vec![None]);
    assert_eq!(*second_log.lock().unwrap(), vec![Some(DialogValue::Ok)]);
}

#[test]
fn second_open_is_rejected_and_first_callback_survives() {
    let (_ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord.open(DialogKind::Confirm, confirm_params()).unwrap().on_close(cb);

    let err = coord
        .open(
            DialogKind::EditPatient,
            DialogParams::EditPatient(EditPatientParams::default()),
        )
        .err()
        .unwrap();
    assert_eq!(err, DialogError::AlreadyOpen(DialogKind::Confirm));
    assert_eq!(coord.current_kind(), Some(DialogKind::Confirm));

    coord.handle_key(egui::Key::Enter);
    assert_eq!(*log.lock().unwrap(), vec![Some(DialogValue::Ok)]);
}

#[test]
fn open_requires_container() {
    let mut coord = DialogCoordinator::new(dialogs::instantiate);
    let err = coord.open(DialogKind::Confirm, confirm_params()).err().unwrap();
    assert_eq!(err, DialogError::NoContainer);
}

#[test]
fn unknown_variant_fails_fast() {
    let (_ctx, mut coord) = coordinator();
    let err = coord.open_named("edit-series", confirm_params()).err().unwrap();
    assert_eq!(err, DialogError::UnknownVariant("edit-series".into()));
    assert!(!coord.is_open());
}

#[test]
fn variant_names_round_trip() {
    for kind in DialogKind::ALL {
        assert_eq!(kind.name().parse::<DialogKind>().unwrap(), kind);
    }
}

#[test]
fn coordinator_builds_widgets_through_its_factory() {
    fn confirm_only(_: DialogKind) -> Box<dyn DialogWidget> {
        Box::<ConfirmDialog>::default()
    }
    let ctx = egui::Context::default();
    let mut coord = DialogCoordinator::new(confirm_only);
    coord.attach_container(ctx);
    let err = coord
        .open(
            DialogKind::EditPatient,
            DialogParams::EditPatient(EditPatientParams::default()),
        )
        .err()
        .unwrap();
    assert_eq!(
        err,
        DialogError::ParametersMismatch {
            expected: DialogKind::Confirm,
            found: DialogKind::EditPatient,
        }
    );
    assert!(!coord.is_open());
}

#[test]
fn factory_covers_every_kind() {
    for kind in DialogKind::ALL {
        assert_eq!(dialogs::instantiate(kind).kind(), kind);
    }
}

#[test]
fn mismatched_parameters_are_rejected() {
    let (_ctx, mut coord) = coordinator();
    let err = coord
        .open(DialogKind::EditStudy, confirm_params())
        .err()
        .unwrap();
    assert_eq!(
        err,
        DialogError::ParametersMismatch {
            expected: DialogKind::EditStudy,
            found: DialogKind::Confirm,
        }
    );
    assert!(!coord.is_open());
}

#[test]
fn close_without_dialog_reports_not_open() {
    let (_ctx, mut coord) = coordinator();
    assert_eq!(coord.close(None), Err(DialogError::NotOpen));
}

#[test]
fn programmatic_close_delivers_result() {
    let (_ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord.open(DialogKind::Confirm, confirm_params()).unwrap().on_close(cb);
    coord.close(Some(DialogValue::Ok)).unwrap();
    assert_eq!(*log.lock().unwrap(), vec![Some(DialogValue::Ok)]);
}

#[test]
fn callback_registered_after_close_never_fires() {
    let (_ctx, mut coord) = coordinator();
    let handle = coord.open(DialogKind::Confirm, confirm_params()).unwrap();
    coord.handle_key(egui::Key::Enter);
    let (log, cb) = recorder();
    handle.on_close(cb);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn escape_cancels_edit_dialogs_but_enter_does_not_submit() {
    let (_ctx, mut coord) = coordinator();
    let (log, cb) = recorder();
    coord
        .open(
            DialogKind::EditPatient,
            DialogParams::EditPatient(EditPatientParams {
                mode: EditMode::Create,
                patient: PatientRecord::new("P1", "Doe^John"),
            }),
        )
        .unwrap()
        .on_close(cb);
    assert!(!coord.handle_key(egui::Key::Enter));
    assert!(coord.handle_key(egui::Key::Escape));
    assert_eq!(*log.lock().unwrap(), vec![None]);
}

#[test]
fn widgets_render_before_parameters_arrive() {
    let ctx = egui::Context::default();
    let mut confirm = ConfirmDialog::default();
    let mut patient = EditPatientDialog::default();
    let mut copy_move = CopyMoveObjectsDialog::default();
    assert_eq!(confirm.title(), "Confirm");
    assert_eq!(patient.title(), "Create new patient");
    assert!(confirm.parameters().is_none());
    let _ = ctx.run(Default::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            assert!(confirm.ui(ui).is_none());
            assert!(patient.ui(ui).is_none());
            assert!(copy_move.ui(ui).is_none());
        });
    });
    assert!(patient.submit().is_err());
}

#[test]
fn widget_rejects_foreign_parameters() {
    let mut confirm = ConfirmDialog::default();
    assert!(confirm
        .set_parameters(DialogParams::EditStudy(EditStudyParams::default()))
        .is_err());
    confirm.set_parameters(confirm_params()).unwrap();
    assert_eq!(confirm.title(), "Delete");
}

#[test]
fn patient_submit_requires_id() {
    let mut dlg = EditPatientDialog::default();
    dlg.set_parameters(DialogParams::EditPatient(EditPatientParams {
        mode: EditMode::Edit,
        patient: PatientRecord::new("", "Doe^Jane"),
    }))
    .unwrap();
    assert_eq!(dlg.title(), "Edit patient");
    assert_eq!(dlg.submit().unwrap_err(), "Patient ID is required");

    dlg.form_mut().set_pending("00100020", "P7");
    dlg.add_pending();
    // the blank ID row already exists, so the add is refused
    assert_eq!(dlg.form_mut().error(), Some("Attribute already exists!"));
}

#[test]
fn patient_form_adds_new_attributes() {
    let mut dlg = EditPatientDialog::default();
    dlg.set_parameters(DialogParams::EditPatient(EditPatientParams {
        mode: EditMode::Create,
        patient: PatientRecord::new("P1", "Doe^John"),
    }))
    .unwrap();
    dlg.form_mut().set_pending("0010,0040", "M");
    dlg.add_pending();
    assert!(dlg.form_mut().error().is_none());
    match dlg.submit().unwrap() {
        DialogValue::Patient(p) => assert_eq!(p.attrs.get("00100040"), Some("M")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn study_submit_requires_uid() {
    let mut dlg = EditStudyDialog::default();
    dlg.set_parameters(DialogParams::EditStudy(EditStudyParams::default()))
        .unwrap();
    assert!(dlg.submit().is_err());

    let mut params = EditStudyParams::default();
    params.study.attrs.set(STUDY_INSTANCE_UID, "1.2.3").unwrap();
    dlg.set_parameters(DialogParams::EditStudy(params)).unwrap();
    assert!(matches!(dlg.submit(), Ok(DialogValue::Study(_))));
}

#[test]
fn copy_move_needs_target() {
    let mut dlg = CopyMoveObjectsDialog::default();
    dlg.set_parameters(DialogParams::CopyMove(CopyMoveParams {
        action: TransferAction::Move,
        objects: vec!["1.2.3.1".into(), "1.2.3.2".into()],
        target: None,
    }))
    .unwrap();
    assert_eq!(dlg.title(), "Move objects");
    assert!(dlg.selection().is_none());

    dlg.set_target(" 1.2.9 ");
    let sel = dlg.selection().unwrap();
    assert_eq!(sel.action, TransferAction::Move);
    assert_eq!(sel.objects.len(), 2);
    assert_eq!(sel.target, "1.2.9");
}
