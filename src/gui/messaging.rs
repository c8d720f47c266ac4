use crate::notification::Notification;
use crate::notification_log::append_notification_log;
use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

/// Shows the most recent notification.
///
/// Only one message is live at a time. The auto-dismiss deadline belongs to
/// the message that armed it: replacing the message replaces or clears the
/// deadline, so an earlier timeout never removes a newer message.
#[derive(Default)]
pub struct MessagingWidget {
    current: Option<Notification>,
    deadline: Option<Instant>,
    log_path: Option<PathBuf>,
}

impl MessagingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every displayed message to `path`.
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn set_msg(&mut self, msg: Notification) {
        self.set_msg_at(msg, Instant::now());
    }

    pub fn set_msg_at(&mut self, msg: Notification, now: Instant) {
        if let Some(path) = &self.log_path {
            append_notification_log(path, &msg);
        }
        if msg.title.is_empty() && msg.text.is_empty() {
            tracing::warn!(severity = %msg.severity, "displaying notification without title or text");
        }
        self.deadline = msg.timeout().map(|t| now + t);
        self.current = Some(msg);
    }

    /// Expire the current message if its own deadline has passed. Returns
    /// `true` when a message was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.current = None;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.deadline = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.tick(now);
        let Some(msg) = &self.current else {
            return;
        };
        if let Some(deadline) = self.deadline {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
        let color = msg.severity.color();
        let mut close = false;
        egui::Area::new(egui::Id::new("messaging_widget"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(2.0, color))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.colored_label(color, msg.severity.icon());
                            ui.strong(&msg.title);
                            if ui.small_button("✖").clicked() {
                                close = true;
                            }
                        });
                        if !msg.text.is_empty() {
                            ui.label(&msg.text);
                        }
                    });
            });
        if close {
            self.dismiss();
        }
    }
}
