use crate::notification::Notification;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const NOTIFICATION_LOG_FILE: &str = "notifications.log";

pub fn append_notification_log(path: &Path, msg: &Notification) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(
            file,
            "{} - [{}] {}: {}",
            Local::now().to_rfc3339(),
            msg.severity,
            msg.title,
            msg.text
        );
    }
}
