//! Modal dialog lifecycle.
//!
//! A [`DialogCoordinator`] owns at most one open [`DialogWidget`]. Opening
//! builds the widget with no parameters, hands it its [`DialogParams`] and
//! returns a [`DialogHandle`] whose close callback fires exactly once.

use crate::attributes::{MwlItem, PatientRecord, StudyRecord};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogKind {
    Confirm,
    EditPatient,
    EditMwl,
    EditStudy,
    CopyMoveObjects,
}

impl DialogKind {
    pub const ALL: [DialogKind; 5] = [
        DialogKind::Confirm,
        DialogKind::EditPatient,
        DialogKind::EditMwl,
        DialogKind::EditStudy,
        DialogKind::CopyMoveObjects,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DialogKind::Confirm => "confirm",
            DialogKind::EditPatient => "edit-patient",
            DialogKind::EditMwl => "edit-mwl",
            DialogKind::EditStudy => "edit-study",
            DialogKind::CopyMoveObjects => "copy-move-objects",
        }
    }
}

impl std::fmt::Display for DialogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialogKind {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DialogKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| DialogError::UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("no view container attached")]
    NoContainer,
    #[error("a {0} dialog is already open")]
    AlreadyOpen(DialogKind),
    #[error("unknown dialog variant '{0}'")]
    UnknownVariant(String),
    #[error("{expected} dialog cannot take {found} parameters")]
    ParametersMismatch {
        expected: DialogKind,
        found: DialogKind,
    },
    #[error("no dialog is open")]
    NotOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransferAction {
    #[default]
    Copy,
    Move,
}

impl TransferAction {
    pub fn label(self) -> &'static str {
        match self {
            TransferAction::Copy => "Copy",
            TransferAction::Move => "Move",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmParams {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditPatientParams {
    pub mode: EditMode,
    pub patient: PatientRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditMwlParams {
    pub mode: EditMode,
    pub item: MwlItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditStudyParams {
    pub study: StudyRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CopyMoveParams {
    pub action: TransferAction,
    /// Instance or series UIDs selected in the originating view.
    pub objects: Vec<String>,
    /// Pre-selected target study, if any.
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogParams {
    Confirm(ConfirmParams),
    EditPatient(EditPatientParams),
    EditMwl(EditMwlParams),
    EditStudy(EditStudyParams),
    CopyMove(CopyMoveParams),
}

impl DialogParams {
    pub fn kind(&self) -> DialogKind {
        match self {
            DialogParams::Confirm(_) => DialogKind::Confirm,
            DialogParams::EditPatient(_) => DialogKind::EditPatient,
            DialogParams::EditMwl(_) => DialogKind::EditMwl,
            DialogParams::EditStudy(_) => DialogKind::EditStudy,
            DialogParams::CopyMove(_) => DialogKind::CopyMoveObjects,
        }
    }

    pub(crate) fn mismatch(&self, expected: DialogKind) -> DialogError {
        DialogError::ParametersMismatch {
            expected,
            found: self.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyMoveSelection {
    pub action: TransferAction,
    pub objects: Vec<String>,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogValue {
    Ok,
    Patient(PatientRecord),
    Mwl(MwlItem),
    Study(StudyRecord),
    CopyMove(CopyMoveSelection),
}

/// `None` means the dialog was cancelled.
pub type DialogResult = Option<DialogValue>;

/// A modal form hosted by the coordinator.
///
/// Widgets are created with `Default` and receive their parameters through
/// [`DialogWidget::set_parameters`] afterwards, so every method must cope
/// with parameters being absent.
pub trait DialogWidget: Send {
    fn kind(&self) -> DialogKind;

    fn set_parameters(&mut self, params: DialogParams) -> Result<(), DialogError>;

    fn title(&self) -> String;

    /// Draw the form. `Some(result)` closes the dialog.
    fn ui(&mut self, ui: &mut egui::Ui) -> Option<DialogResult>;

    /// React to a key press. `Some(result)` closes the dialog.
    fn on_key(&mut self, key: egui::Key) -> Option<DialogResult> {
        match key {
            egui::Key::Escape => Some(None),
            _ => None,
        }
    }
}

/// Builds an unconfigured widget for a dialog kind.
pub type WidgetFactory = fn(DialogKind) -> Box<dyn DialogWidget>;

type CloseCallback = Box<dyn FnOnce(DialogResult) + Send>;

#[derive(Default)]
struct CloseState {
    callback: Option<CloseCallback>,
    closed: bool,
}

#[derive(Clone, Default)]
struct CloseSlot(Arc<Mutex<CloseState>>);

impl CloseSlot {
    fn register(&self, callback: CloseCallback) {
        let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
        if state.closed {
            tracing::debug!("close callback registered after dialog closed; ignored");
            return;
        }
        state.callback = Some(callback);
    }

    fn fire(&self, result: DialogResult) {
        let callback = {
            let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
            state.closed = true;
            state.callback.take()
        };
        match callback {
            Some(cb) => cb(result),
            None => tracing::debug!("dialog closed without a callback; result discarded"),
        }
    }
}

/// Returned by [`DialogCoordinator::open`].
pub struct DialogHandle {
    id: u64,
    kind: DialogKind,
    slot: CloseSlot,
}

impl DialogHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    /// Register the completion callback. It runs once with the dialog's
    /// result; registering after the dialog closed has no effect.
    pub fn on_close<F>(self, callback: F)
    where
        F: FnOnce(DialogResult) + Send + 'static,
    {
        self.slot.register(Box::new(callback));
    }
}

struct DialogSession {
    id: u64,
    widget: Box<dyn DialogWidget>,
    slot: CloseSlot,
}

pub struct DialogCoordinator {
    factory: WidgetFactory,
    container: Option<egui::Context>,
    session: Option<DialogSession>,
    next_id: u64,
}

impl DialogCoordinator {
    pub fn new(factory: WidgetFactory) -> Self {
        Self {
            factory,
            container: None,
            session: None,
            next_id: 0,
        }
    }

    /// Attach the context dialogs are rendered into.
    pub fn attach_container(&mut self, ctx: egui::Context) {
        self.container = Some(ctx);
    }

    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_kind(&self) -> Option<DialogKind> {
        self.session.as_ref().map(|s| s.widget.kind())
    }

    /// Open `kind` with `params`.
    ///
    /// Only one dialog may be open at a time. While one is pending further
    /// requests fail with [`DialogError::AlreadyOpen`] and the pending
    /// session keeps its callback.
    pub fn open(
        &mut self,
        kind: DialogKind,
        params: DialogParams,
    ) -> Result<DialogHandle, DialogError> {
        if self.container.is_none() {
            return Err(DialogError::NoContainer);
        }
        if let Some(current) = &self.session {
            let open_kind = current.widget.kind();
            tracing::warn!(requested = %kind, open = %open_kind, "dialog already open");
            return Err(DialogError::AlreadyOpen(open_kind));
        }
        if params.kind() != kind {
            return Err(params.mismatch(kind));
        }
        let mut widget = (self.factory)(kind);
        widget.set_parameters(params)?;

        self.next_id += 1;
        let id = self.next_id;
        let slot = CloseSlot::default();
        self.session = Some(DialogSession {
            id,
            widget,
            slot: slot.clone(),
        });
        tracing::debug!(id, kind = %kind, "dialog opened");
        Ok(DialogHandle { id, kind, slot })
    }

    pub fn open_named(
        &mut self,
        name: &str,
        params: DialogParams,
    ) -> Result<DialogHandle, DialogError> {
        let kind = name.parse()?;
        self.open(kind, params)
    }

    /// Forward a key press to the open dialog. Returns `true` when the key
    /// closed it.
    pub fn handle_key(&mut self, key: egui::Key) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.widget.on_key(key) {
            Some(result) => {
                self.finish(result);
                true
            }
            None => false,
        }
    }

    /// Close the open dialog with `result`.
    pub fn close(&mut self, result: DialogResult) -> Result<(), DialogError> {
        if self.session.is_none() {
            return Err(DialogError::NotOpen);
        }
        self.finish(result);
        Ok(())
    }

    fn finish(&mut self, result: DialogResult) {
        if let Some(session) = self.session.take() {
            tracing::debug!(
                id = session.id,
                kind = %session.widget.kind(),
                confirmed = result.is_some(),
                "dialog closed"
            );
            session.slot.fire(result);
        }
    }

    /// Render the open dialog into the attached container.
    pub fn ui(&mut self) {
        let Some(ctx) = self.container.clone() else {
            return;
        };
        if self.session.is_none() {
            return;
        }

        let pressed: Vec<egui::Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });
        for key in pressed {
            if self.handle_key(key) {
                ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, key));
                return;
            }
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mut open = true;
        let mut outcome = None;
        egui::Window::new(session.widget.title())
            .id(egui::Id::new(("dialog", session.id)))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(&ctx, |ui| {
                outcome = session.widget.ui(ui);
            });
        if outcome.is_none() && !open {
            outcome = Some(None);
        }
        if let Some(result) = outcome {
            self.finish(result);
        }
    }
}
