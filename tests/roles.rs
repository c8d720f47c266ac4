use arc_console::service::AppService;
use arc_console::user::{is_role, User, UserSlot};

#[test]
fn anonymous_session_denies_only_admin() {
    assert!(!is_role(None, "admin"));
    assert!(is_role(None, "viewer"));
    assert!(is_role(None, "user"));
}

#[test]
fn unrestricted_user_has_every_role() {
    let user = User::unrestricted();
    assert!(is_role(Some(&user), "admin"));
    assert!(is_role(Some(&user), "anything"));
}

#[test]
fn regular_user_needs_membership() {
    let user = User::new("u1", &["x", "y"]);
    assert!(is_role(Some(&user), "x"));
    assert!(is_role(Some(&user), "y"));
    assert!(!is_role(Some(&user), "z"));
    assert!(!is_role(Some(&user), "admin"));
}

#[test]
fn user_with_identity_but_no_roles_has_none() {
    let user = User::new("u2", &[]);
    assert!(!is_role(Some(&user), "viewer"));
}

#[test]
fn roles_without_identity_are_checked() {
    let user = User::anonymous(&["auditor"]);
    assert!(is_role(Some(&user), "auditor"));
    assert!(!is_role(Some(&user), "admin"));
}

#[test]
fn user_without_identity_or_roles_is_not_unrestricted() {
    let user = User::anonymous(&[]);
    assert!(!user.is_unrestricted());
    assert!(!is_role(Some(&user), "admin"));
    assert!(!is_role(Some(&user), "viewer"));
}

#[test]
fn slot_writes_are_visible_to_next_check() {
    let slot = UserSlot::new();
    let reader = slot.clone();
    assert!(!reader.is_role("admin"));
    slot.set(User::new("root", &["admin"]));
    assert!(reader.is_role("admin"));
    slot.set(User::new("guest", &["viewer"]));
    assert!(!reader.is_role("admin"));
    slot.clear();
    assert!(reader.is_role("viewer"));
    assert!(!reader.is_set());
}

#[test]
fn end_session_clears_user() {
    let service = AppService::new();
    service.set_user(User::new("u1", &["user"]));
    assert_eq!(service.user().unwrap().identity.as_deref(), Some("u1"));
    service.end_session();
    assert!(service.user().is_none());
    assert!(!service.is_role("admin"));
}
