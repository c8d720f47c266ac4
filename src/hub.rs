//! Publish/subscribe broker shared by every component of a session.
//!
//! Each [`Channel`] fans a value out to the subscribers that exist at the
//! moment of publishing. Delivery happens inside `publish` under a single
//! lock, so every subscriber observes values in publish order. Subscribers
//! created later never see earlier values.

use crate::attributes::PatientRecord;
use crate::notification::Notification;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Request to create a patient, raised by whichever view collected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCreateRequest {
    pub patient: PatientRecord,
}

pub struct Channel<T> {
    name: &'static str,
    subscribers: Arc<Mutex<Vec<Sender<T>>>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone> Channel<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Deliver `value` to every live subscriber. Dropped subscriptions are
    /// pruned here.
    pub fn publish(&self, value: T) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| tx.send(value.clone()).is_ok());
        tracing::debug!(channel = self.name, subscribers = subs.len(), "published");
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        Subscription { rx }
    }

    /// Number of subscribers that were alive at the last publish or
    /// subscribe.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Receiving end of a [`Channel`]. Dropping it ends the subscription.
pub struct Subscription<T> {
    rx: Receiver<T>,
}

impl<T> Subscription<T> {
    pub fn try_next(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Take everything delivered so far, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

/// The session's event hub: one channel for messages to display and one for
/// patient creation requests.
#[derive(Clone)]
pub struct NotificationHub {
    messages: Channel<Notification>,
    patients: Channel<PatientCreateRequest>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            messages: Channel::new("message"),
            patients: Channel::new("create-patient"),
        }
    }

    pub fn set_message(&self, msg: Notification) {
        self.messages.publish(msg);
    }

    pub fn messages(&self) -> Subscription<Notification> {
        self.messages.subscribe()
    }

    pub fn create_patient(&self, request: PatientCreateRequest) {
        self.patients.publish(request);
    }

    pub fn patient_requests(&self) -> Subscription<PatientCreateRequest> {
        self.patients.subscribe()
    }

    pub fn message_subscribers(&self) -> usize {
        self.messages.subscriber_count()
    }

    pub fn patient_subscribers(&self) -> usize {
        self.patients.subscriber_count()
    }
}
