use crate::hub::NotificationHub;
use crate::notification::Notification;
use crate::user::{User, UserSlot};

/// Per-session context handed to every view that needs the hub or the
/// current user. Clones share state.
#[derive(Clone, Default)]
pub struct AppService {
    pub hub: NotificationHub,
    pub user: UserSlot,
}

impl AppService {
    pub fn new() -> Self {
        tracing::debug!("session context created");
        Self::default()
    }

    pub fn set_message(&self, msg: Notification) {
        self.hub.set_message(msg);
    }

    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    pub fn set_user(&self, user: User) {
        self.user.set(user);
    }

    pub fn is_role(&self, role: &str) -> bool {
        self.user.is_role(role)
    }

    /// Forget the session user. Subscriptions stay valid until dropped.
    pub fn end_session(&self) {
        tracing::debug!("session ended");
        self.user.clear();
    }
}
