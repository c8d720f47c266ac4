pub mod dialogs;
mod messaging;

pub use messaging::MessagingWidget;

use crate::attributes::{
    MwlItem, PatientRecord, StudyRecord, STUDY_DESCRIPTION, STUDY_INSTANCE_UID,
};
use crate::dialog::{
    ConfirmParams, CopyMoveParams, DialogCoordinator, DialogKind, DialogParams, DialogResult,
    DialogValue, EditMode, EditMwlParams, EditPatientParams, EditStudyParams, TransferAction,
};
use crate::dicom::{ElementNames, StandardElements};
use crate::hub::{PatientCreateRequest, Subscription};
use crate::notification::Notification;
use crate::notification_log::NOTIFICATION_LOG_FILE;
use crate::realm::RealmError;
use crate::service::AppService;
use crate::settings::Settings;
use crate::user::{User, ADMIN_ROLE};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// Why a dialog was opened; decides what happens with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Demo,
    CreatePatient,
    EditPatient(usize),
    DeletePatient(usize),
    CreateMwl,
    EditStudy,
    CopyMove,
}

pub struct ConsoleApp {
    service: AppService,
    messaging: MessagingWidget,
    dialogs: DialogCoordinator,
    messages: Subscription<Notification>,
    patient_requests: Subscription<PatientCreateRequest>,
    pending: Vec<(Instant, Notification)>,
    user_rx: Option<Receiver<Result<User, RealmError>>>,
    dialog_tx: Sender<(Purpose, DialogResult)>,
    dialog_rx: Receiver<(Purpose, DialogResult)>,
    patients: Vec<PatientRecord>,
    worklist: Vec<MwlItem>,
    default_timeout_ms: u64,
}

impl ConsoleApp {
    pub fn new(ctx: &egui::Context, service: AppService, settings: &Settings) -> Self {
        let mut dialogs = DialogCoordinator::new(dialogs::instantiate);
        dialogs.attach_container(ctx.clone());
        let mut messaging = MessagingWidget::new();
        if settings.notification_log {
            messaging = messaging.with_log(NOTIFICATION_LOG_FILE);
        }
        let (dialog_tx, dialog_rx) = channel();
        Self {
            messages: service.hub.messages(),
            patient_requests: service.hub.patient_requests(),
            service,
            messaging,
            dialogs,
            pending: Vec::new(),
            user_rx: None,
            dialog_tx,
            dialog_rx,
            patients: Vec::new(),
            worklist: Vec::new(),
            default_timeout_ms: settings.default_timeout_ms,
        }
    }

    /// Receive the session user from a background fetch.
    pub fn with_user_fetch(mut self, rx: Receiver<Result<User, RealmError>>) -> Self {
        self.user_rx = Some(rx);
        self
    }

    pub fn service(&self) -> &AppService {
        &self.service
    }

    pub fn messaging(&self) -> &MessagingWidget {
        &self.messaging
    }

    pub fn dialogs(&self) -> &DialogCoordinator {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut DialogCoordinator {
        &mut self.dialogs
    }

    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    pub fn worklist(&self) -> &[MwlItem] {
        &self.worklist
    }

    /// Publish `msg` on the hub once `at` has passed.
    pub fn schedule(&mut self, at: Instant, msg: Notification) {
        self.pending.push((at, msg));
    }

    /// Publish every scheduled message that is due, earliest first.
    pub fn run_due(&mut self, now: Instant) {
        let (mut due, later): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = later;
        due.sort_by_key(|(at, _)| *at);
        for (_, msg) in due {
            self.service.set_message(msg);
        }
    }

    /// Process everything that arrived since the last frame.
    pub fn pump(&mut self, now: Instant) {
        self.poll_user();
        self.run_due(now);
        for msg in self.messages.drain() {
            self.messaging.set_msg_at(msg, now);
        }
        self.messaging.tick(now);
        for req in self.patient_requests.drain() {
            self.on_patient_created(req.patient);
        }
        while let Ok((purpose, result)) = self.dialog_rx.try_recv() {
            self.on_dialog_closed(purpose, result);
        }
        // Notifications raised while handling dialog results show up now.
        for msg in self.messages.drain() {
            self.messaging.set_msg_at(msg, now);
        }
    }

    fn poll_user(&mut self) {
        let Some(rx) = &self.user_rx else {
            return;
        };
        let res = match rx.try_recv() {
            Ok(res) => res,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                self.user_rx = None;
                tracing::error!("user info worker exited without a result");
                return;
            }
        };
        self.user_rx = None;
        match res {
            Ok(user) => self.service.set_user(user),
            Err(e) => {
                tracing::error!("failed to load user info: {e}");
                self.service.set_message(Notification::error(
                    "Error",
                    format!("Failed to load user info: {e}"),
                ));
            }
        }
    }

    fn notify(&self, msg: Notification) {
        self.service
            .set_message(msg.with_timeout_ms(self.default_timeout_ms));
    }

    fn open(&mut self, purpose: Purpose, kind: DialogKind, params: DialogParams) {
        match self.dialogs.open(kind, params) {
            Ok(handle) => {
                let tx = self.dialog_tx.clone();
                handle.on_close(move |result| {
                    let _ = tx.send((purpose, result));
                });
            }
            Err(e) => {
                tracing::warn!("could not open {kind} dialog: {e}");
                self.service
                    .set_message(Notification::warning("Warning", e.to_string()));
            }
        }
    }

    /// Replays the archive UI's demo: a confirmation dialog, a long-lived
    /// warning and an info message half a second later that replaces it.
    pub fn demo(&mut self, now: Instant) {
        let names = StandardElements;
        tracing::info!(
            tag = "00000000",
            name = names.for_tag("00000000").unwrap_or("unknown"),
            "element name lookup"
        );
        self.open(
            Purpose::Demo,
            DialogKind::Confirm,
            DialogParams::Confirm(ConfirmParams {
                title: "Test dialog".into(),
                content: "Press Enter to confirm or Escape to cancel.".into(),
            }),
        );
        self.service.set_message(
            Notification::warning("Warning", "Attribute already exists!").with_timeout_ms(50_000),
        );
        self.schedule(
            now + Duration::from_millis(500),
            Notification::info("Info", "Info message!"),
        );
    }

    pub fn open_create_patient(&mut self) {
        self.open(
            Purpose::CreatePatient,
            DialogKind::EditPatient,
            DialogParams::EditPatient(EditPatientParams {
                mode: EditMode::Create,
                patient: PatientRecord::new("", ""),
            }),
        );
    }

    pub fn open_edit_patient(&mut self, idx: usize) {
        let Some(patient) = self.patients.get(idx).cloned() else {
            return;
        };
        self.open(
            Purpose::EditPatient(idx),
            DialogKind::EditPatient,
            DialogParams::EditPatient(EditPatientParams {
                mode: EditMode::Edit,
                patient,
            }),
        );
    }

    pub fn confirm_delete_patient(&mut self, idx: usize) {
        let Some(patient) = self.patients.get(idx) else {
            return;
        };
        let label = patient
            .patient_name()
            .or(patient.patient_id())
            .unwrap_or("this patient")
            .to_string();
        self.open(
            Purpose::DeletePatient(idx),
            DialogKind::Confirm,
            DialogParams::Confirm(ConfirmParams {
                title: "Delete patient".into(),
                content: format!("Are you sure you want to delete {label}?"),
            }),
        );
    }

    pub fn open_create_mwl(&mut self) {
        self.open(
            Purpose::CreateMwl,
            DialogKind::EditMwl,
            DialogParams::EditMwl(EditMwlParams {
                mode: EditMode::Create,
                item: MwlItem::default(),
            }),
        );
    }

    pub fn open_edit_study(&mut self, study: StudyRecord) {
        self.open(
            Purpose::EditStudy,
            DialogKind::EditStudy,
            DialogParams::EditStudy(EditStudyParams { study }),
        );
    }

    pub fn open_copy_move(&mut self, action: TransferAction, objects: Vec<String>) {
        self.open(
            Purpose::CopyMove,
            DialogKind::CopyMoveObjects,
            DialogParams::CopyMove(CopyMoveParams {
                action,
                objects,
                target: None,
            }),
        );
    }

    fn on_patient_created(&mut self, patient: PatientRecord) {
        let id = patient.patient_id().unwrap_or_default().to_string();
        self.patients.push(patient);
        self.notify(Notification::success("Info", format!("Patient {id} created")));
    }

    fn on_dialog_closed(&mut self, purpose: Purpose, result: DialogResult) {
        tracing::debug!(?purpose, confirmed = result.is_some(), "dialog result");
        match (purpose, result) {
            (_, None) => {}
            (Purpose::Demo, Some(_)) => {
                self.notify(Notification::info("Info", "Dialog confirmed"));
            }
            (Purpose::CreatePatient, Some(DialogValue::Patient(patient))) => {
                self.service
                    .hub
                    .create_patient(PatientCreateRequest { patient });
            }
            (Purpose::EditPatient(idx), Some(DialogValue::Patient(patient))) => {
                if let Some(slot) = self.patients.get_mut(idx) {
                    *slot = patient;
                    self.notify(Notification::success("Info", "Patient saved"));
                }
            }
            (Purpose::DeletePatient(idx), Some(DialogValue::Ok)) => {
                if idx < self.patients.len() {
                    self.patients.remove(idx);
                    self.notify(Notification::success("Info", "Patient deleted"));
                }
            }
            (Purpose::CreateMwl, Some(DialogValue::Mwl(item))) => {
                self.worklist.push(item);
                self.notify(Notification::success("Info", "MWL item created"));
            }
            (Purpose::EditStudy, Some(DialogValue::Study(study))) => {
                let uid = study.study_instance_uid().unwrap_or_default().to_string();
                self.notify(Notification::success("Info", format!("Study {uid} saved")));
            }
            (Purpose::CopyMove, Some(DialogValue::CopyMove(sel))) => {
                self.notify(Notification::info(
                    "Info",
                    format!(
                        "{} of {} object(s) to {} requested",
                        sel.action.label(),
                        sel.objects.len(),
                        sel.target
                    ),
                ));
            }
            (purpose, Some(other)) => {
                tracing::warn!(?purpose, ?other, "unexpected dialog result");
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let admin = self.service.is_role(ADMIN_ROLE);
        ui.horizontal(|ui| {
            if ui.button("Create patient").clicked() {
                self.open_create_patient();
            }
            if ui.button("Create MWL").clicked() {
                self.open_create_mwl();
            }
            if ui
                .add_enabled(admin, egui::Button::new("Edit study"))
                .clicked()
            {
                let mut study = StudyRecord::default();
                study.attrs.set_known(STUDY_INSTANCE_UID, "1.2.3.4");
                study.attrs.set_known(STUDY_DESCRIPTION, "Demo study");
                self.open_edit_study(study);
            }
            if ui
                .add_enabled(admin, egui::Button::new("Copy/Move"))
                .clicked()
            {
                self.open_copy_move(TransferAction::Copy, vec!["1.2.3.4.1".into()]);
            }
            if ui.button("Demo").clicked() {
                self.demo(Instant::now());
            }
        });
    }

    fn user_line(&self, ui: &mut egui::Ui) {
        match self.service.user() {
            Some(u) => {
                let name = u.identity.as_deref().unwrap_or("(unrestricted)");
                ui.label(format!("User: {name}  Roles: {}", u.roles.join(", ")));
            }
            None => {
                ui.weak("Not signed in");
            }
        }
    }

    fn patient_list(&mut self, ui: &mut egui::Ui) {
        let mut edit = None;
        let mut delete = None;
        egui::Grid::new("patients").striped(true).show(ui, |ui| {
            for (idx, p) in self.patients.iter().enumerate() {
                ui.label(p.patient_id().unwrap_or("-"));
                ui.label(p.patient_name().unwrap_or("-"));
                if ui.small_button("Edit").clicked() {
                    edit = Some(idx);
                }
                if ui.small_button("Delete").clicked() {
                    delete = Some(idx);
                }
                ui.end_row();
            }
        });
        if let Some(idx) = edit {
            self.open_edit_patient(idx);
        }
        if let Some(idx) = delete {
            self.confirm_delete_patient(idx);
        }
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump(Instant::now());
        if self.user_rx.is_some() || !self.pending.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.user_line(ui);
            ui.separator();
            ui.heading("Patients");
            self.patient_list(ui);
            if !self.worklist.is_empty() {
                ui.separator();
                ui.heading("Worklist");
                for item in &self.worklist {
                    ui.label(item.scheduled_step_id().unwrap_or("-"));
                }
            }
        });

        self.dialogs.ui();
        self.messaging.ui(ctx);
    }
}
