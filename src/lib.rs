pub mod attributes;
pub mod dialog;
pub mod dicom;
pub mod gui;
pub mod hub;
pub mod logging;
pub mod notification;
pub mod notification_log;
pub mod realm;
pub mod service;
pub mod settings;
pub mod user;
