use serde::{Deserialize, Deserializer, Serialize};
use std::sync::{Arc, RwLock};

/// Role that is withheld from anonymous sessions.
pub const ADMIN_ROLE: &str = "admin";

/// The authenticated principal as reported by the realm endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserDoc", into = "UserDoc")]
pub struct User {
    /// Principal name.
    pub identity: Option<String>,
    pub roles: Vec<String>,
    /// Set only when the realm document carried an explicit `"user": null`.
    unrestricted: bool,
}

/// Wire shape of the realm user document. An absent `user` key and an
/// explicit `null` decode differently; a `null` role list is no roles.
#[derive(Serialize, Deserialize)]
struct UserDoc {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    user: Option<Option<String>>,
    #[serde(default)]
    roles: Option<Vec<String>>,
}

/// Maps a present key to `Some`, so `null` becomes `Some(None)`.
fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        let unrestricted = matches!(doc.user, Some(None))
            && doc.roles.as_ref().is_some_and(|r| r.is_empty());
        Self {
            identity: doc.user.flatten(),
            roles: doc.roles.unwrap_or_default(),
            unrestricted,
        }
    }
}

impl From<User> for UserDoc {
    fn from(user: User) -> Self {
        let name = if user.unrestricted {
            Some(None)
        } else {
            user.identity.map(Some)
        };
        Self {
            user: name,
            roles: Some(user.roles),
        }
    }
}

impl User {
    pub fn new(identity: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            identity: Some(identity.into()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            unrestricted: false,
        }
    }

    /// A user known only by its roles.
    pub fn anonymous(roles: &[&str]) -> Self {
        Self {
            identity: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            unrestricted: false,
        }
    }

    /// The `{"user": null, "roles": []}` principal, granted every role.
    pub fn unrestricted() -> Self {
        Self {
            unrestricted: true,
            ..Self::default()
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.unrestricted && self.identity.is_none() && self.roles.is_empty()
    }
}

/// Evaluate role membership for `user`.
///
/// Without a user every role except [`ADMIN_ROLE`] is granted. This fail-open
/// behaviour is what the archive UI has always done and callers rely on it
/// while the realm request is still in flight.
pub fn is_role(user: Option<&User>, role: &str) -> bool {
    match user {
        None => role != ADMIN_ROLE,
        Some(u) if u.is_unrestricted() => true,
        Some(u) => u.roles.iter().any(|r| r == role),
    }
}

/// Shared slot holding the current session user.
///
/// Clones share the same slot. Writes are last-write-wins and visible to the
/// next [`UserSlot::is_role`] call.
#[derive(Clone, Default)]
pub struct UserSlot {
    inner: Arc<RwLock<Option<User>>>,
}

impl UserSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user: User) {
        tracing::debug!(identity = ?user.identity, roles = ?user.roles, "user set");
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn get(&self) -> Option<User> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_set(&self) -> bool {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    pub fn is_role(&self, role: &str) -> bool {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        is_role(guard.as_ref(), role)
    }
}
