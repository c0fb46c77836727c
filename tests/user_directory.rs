//! Integration tests for the user directory.
//!
//! Each test builds a fresh `Store` / `MailboxHost` / `UserDirectory`
//! stack and exercises one account-lifecycle or authentication
//! scenario end to end.

use std::sync::Arc;
use stubmail::{Config, Error, MailboxHost, Store, UserDirectory, UserSpec};

/// Build a minimal valid RFC 2822 email.
fn make_raw_email(from: &str, to: &str, subject: &str, body: &str) -> Vec<u8> {
    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         Message-ID: <test-{subject}@stub.test>\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}"
    )
    .into_bytes()
}

fn setup() -> (Arc<MailboxHost>, UserDirectory) {
    let host = Arc::new(MailboxHost::new(Arc::new(Store::new())));
    let directory = UserDirectory::new(Arc::clone(&host));
    (host, directory)
}

// ── Account lifecycle ──────────────────────────────────────────────

#[test]
fn test_list_users() {
    let (_, directory) = setup();

    assert!(directory.list_users().is_empty());

    let u1 = directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();
    assert_eq!(directory.list_users().len(), 1);
    assert!(directory.list_users().contains(&u1));

    let u2 = directory.create_user("foo2@bar.com", "foo2", Some("pwd")).unwrap();
    assert_eq!(directory.list_users().len(), 2);
    assert!(directory.list_users().contains(&u1));
    assert!(directory.list_users().contains(&u2));
}

#[test]
fn test_find_by_email_and_login() {
    let (_, directory) = setup();
    let u1 = directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();

    assert_eq!(directory.get_user_by_email(&u1.email).unwrap(), u1);
    assert_eq!(directory.get_user(&u1.login).unwrap(), u1);

    let u2 = directory.create_user("foo2@bar.com", "foo2", Some("pwd")).unwrap();
    assert_eq!(directory.get_user_by_email(&u1.email).unwrap(), u1);
    assert_eq!(directory.get_user_by_email(&u2.email).unwrap(), u2);
    assert_eq!(directory.get_user(&u1.login).unwrap(), u1);
    assert_eq!(directory.get_user(&u2.login).unwrap(), u2);

    let found = directory.find_users(|u| u.email_matches(&u1.email));
    assert_eq!(found, vec![u1.clone()]);
    let found = directory.find_users(|u| u.email_matches(&u2.email));
    assert_eq!(found, vec![u2.clone()]);
    let both =
        directory.find_users(|u| u.email_matches(&u1.email) || u.email_matches(&u2.email));
    assert_eq!(both.len(), 2);
    assert!(both.contains(&u1));
    assert!(both.contains(&u2));
}

#[test]
fn test_email_lookup_is_case_insensitive() {
    let (_, directory) = setup();
    let u = directory.create_user("Foo@Bar.com", "foo", Some("pwd")).unwrap();

    assert_eq!(directory.get_user_by_email("foo@bar.com").unwrap(), u);
    assert_eq!(directory.get_user_by_email("FOO@BAR.COM").unwrap(), u);
    // Login lookup stays case-sensitive.
    assert!(directory.get_user("FOO").is_none());
}

#[test]
fn test_create_and_delete_user() {
    let (_, directory) = setup();

    assert!(directory.list_users().is_empty());

    let user = directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();
    assert_eq!(directory.list_users().len(), 1);

    directory.delete_user(&user).unwrap();
    assert!(directory.list_users().is_empty());
}

#[test]
fn test_duplicate_user_leaves_directory_unchanged() {
    let (host, directory) = setup();
    directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();

    let by_login = directory.create_user("other@bar.com", "foo", Some("pwd"));
    assert_eq!(by_login.unwrap_err(), Error::DuplicateUser("foo".to_string()));

    let by_email = directory.create_user("FOO@BAR.COM", "other", Some("pwd"));
    assert!(matches!(by_email.unwrap_err(), Error::DuplicateUser(_)));

    assert_eq!(directory.list_users().len(), 1);
    // No stray folders were provisioned for the rejected accounts.
    assert!(directory.get_user("other").is_none());
    let user = directory.get_user("foo").unwrap();
    assert!(host.get_inbox(&user).is_some());
}

#[test]
fn test_delete_user_should_delete_mail() {
    let (host, directory) = setup();

    let user = directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();
    assert_eq!(directory.list_users().len(), 1);

    let other_folder = host.create_mailbox(&user, "otherFolder").unwrap();
    let inbox = host.get_folder(&user, "INBOX").unwrap();

    let m1 = make_raw_email("there@localhost", "here@localhost", "sub1", "msg1");
    let m2 = make_raw_email("there@localhost", "here@localhost", "sub2", "msg2");
    inbox.store(m1);
    other_folder.store(m2);

    directory.delete_user(&user).unwrap();
    assert!(host.get_all_messages().is_empty());
    assert!(host.get_folder(&user, "INBOX").is_none());
    assert!(host.get_inbox(&user).is_none());
    assert!(host.get_folder(&user, "otherFolder").is_none());
    assert!(directory.get_user("foo").is_none());
}

#[test]
fn test_delete_unknown_user_is_an_error() {
    let (_, directory) = setup();
    let user = directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();
    directory.delete_user(&user).unwrap();

    assert_eq!(
        directory.delete_user(&user).unwrap_err(),
        Error::UserNotFound("foo".to_string())
    );
}

// ── Authentication policy ──────────────────────────────────────────

#[test]
fn test_no_auth_required() {
    let (host, directory) = setup();
    directory.set_auth_required(false);

    assert!(directory.authenticate("foo@localhost", None));
    assert_eq!(directory.list_users().len(), 1);

    // The auto-provisioned account is fully usable.
    let user = directory.get_user("foo@localhost").unwrap();
    assert_eq!(user.email, "foo@localhost");
    assert!(host.get_inbox(&user).is_some());
}

#[test]
fn test_no_auth_required_with_existing_user() {
    let (_, directory) = setup();
    directory.set_auth_required(false);

    directory.create_user("foo@example.com", "foo", None).unwrap();
    assert!(!directory.list_users().is_empty());
    assert!(directory.authenticate("foo", None));
    // Existing users pass without a password check.
    assert!(directory.authenticate("foo", Some("anything")));
    assert_eq!(directory.list_users().len(), 1);
}

#[test]
fn test_auth_required() {
    let (_, directory) = setup();
    directory.set_auth_required(true);

    assert!(!directory.authenticate("foo@localhost", None));
    assert!(directory.list_users().is_empty());
}

#[test]
fn test_auth_required_with_existing_user() {
    let (_, directory) = setup();
    directory.set_auth_required(true);
    directory.create_user("foo@example.com", "foo", Some("bar")).unwrap();

    assert!(!directory.list_users().is_empty());
    assert!(directory.authenticate("foo", Some("bar")));
    assert!(!directory.authenticate("foo", Some("wrong")));
    assert!(!directory.authenticate("foo", None));
    // Email works as the identifier too, case-insensitively.
    assert!(directory.authenticate("foo@example.com", Some("bar")));
    assert!(directory.authenticate("FOO@EXAMPLE.COM", Some("bar")));
}

#[test]
fn test_auth_default_is_required() {
    let (_, directory) = setup();
    assert!(directory.is_auth_required());
    assert!(!directory.authenticate("nobody", None));
    assert!(directory.list_users().is_empty());
}

// ── Startup configuration ──────────────────────────────────────────

#[test]
fn test_config_apply_provisions_users() {
    let (host, directory) = setup();

    let config = Config {
        auth_disabled: false,
        users: vec![
            "alice:secret@example.com".parse::<UserSpec>().unwrap(),
            "bob:hunter2@example.com".parse::<UserSpec>().unwrap(),
        ],
    };
    config.apply(&directory).unwrap();

    assert!(directory.is_auth_required());
    assert_eq!(directory.list_users().len(), 2);
    assert!(directory.authenticate("alice", Some("secret")));
    assert!(!directory.authenticate("bob", Some("wrong")));

    let alice = directory.get_user_by_email("alice@example.com").unwrap();
    assert!(host.get_inbox(&alice).is_some());
}

#[test]
fn test_config_apply_rejects_colliding_specs() {
    let (_, directory) = setup();

    let config = Config {
        auth_disabled: true,
        users: vec![
            "alice:secret@example.com".parse::<UserSpec>().unwrap(),
            "alice:other@example.com".parse::<UserSpec>().unwrap(),
        ],
    };
    assert!(matches!(
        config.apply(&directory).unwrap_err(),
        Error::DuplicateUser(_)
    ));
    assert!(!directory.is_auth_required());
}
