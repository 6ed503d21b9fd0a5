use super::*;
use crate::auth::{Credential, IdentityKind};
use tempfile::tempdir;

const COMPLETE_ORG_FILE: &str = r#"TOKEN_TYPE="oat"
DOCKER_ORG="futuresecureai"
DOCKER_USERNAME=""
DOCKER_TOKEN="dckr_oat_123"
DEBUG="false"
"#;

fn store_with(contents: &str) -> (tempfile::TempDir, FileCredentialStore) {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("credentials.env");
    fs::write(&path, contents).unwrap();
    (temp_dir, FileCredentialStore::new(path))
}

#[test]
fn test_load_missing_file_returns_none() {
    let temp_dir = tempdir().unwrap();
    let store = FileCredentialStore::new(temp_dir.path().join("nope.env"));
    assert!(store.load().is_none());
}

#[test]
fn test_load_organization_credential() {
    let (_dir, store) = store_with(COMPLETE_ORG_FILE);

    let cred = store.load().unwrap();
    assert_eq!(cred.identity(), "futuresecureai");
    assert_eq!(cred.token(), "dckr_oat_123");
    assert_eq!(cred.kind(), IdentityKind::Organization);
}

#[test]
fn test_load_personal_credential() {
    let (_dir, store) = store_with(
        "TOKEN_TYPE=pat\nDOCKER_ORG=\nDOCKER_USERNAME=alice\nDOCKER_TOKEN=dckr_pat_9\n",
    );

    let cred = store.load().unwrap();
    assert_eq!(cred.identity(), "alice");
    assert_eq!(cred.kind(), IdentityKind::Personal);
}

#[test]
fn test_load_missing_any_credential_key_returns_none() {
    let lines = [
        "TOKEN_TYPE=\"oat\"",
        "DOCKER_ORG=\"futuresecureai\"",
        "DOCKER_USERNAME=\"alice\"",
        "DOCKER_TOKEN=\"dckr_oat_123\"",
    ];

    for skip in 0..lines.len() {
        let contents: Vec<&str> = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, line)| *line)
            .collect();
        let (_dir, store) = store_with(&contents.join("\n"));
        assert!(
            store.load().is_none(),
            "expected no credential without {}",
            lines[skip]
        );
    }
}

#[test]
fn test_load_placeholder_token_returns_none() {
    let contents = COMPLETE_ORG_FILE.replace("dckr_oat_123", TOKEN_PLACEHOLDER);
    let (_dir, store) = store_with(&contents);
    assert!(store.load().is_none());
}

#[test]
fn test_load_malformed_file_returns_none() {
    let (_dir, store) = store_with("TOKEN_TYPE=oat\nthis line is garbage\n");
    assert!(store.load().is_none());
    assert!(store.read_file().is_none());
}

#[test]
fn test_load_unknown_token_type_returns_none() {
    let contents = COMPLETE_ORG_FILE.replace("\"oat\"", "\"robot\"");
    let (_dir, store) = store_with(&contents);
    assert!(store.load().is_none());
}

#[test]
fn test_oat_without_org_falls_back_to_username() {
    let (_dir, store) = store_with(
        "TOKEN_TYPE=oat\nDOCKER_ORG=\nDOCKER_USERNAME=alice\nDOCKER_TOKEN=tok\n",
    );

    let cred = store.load().unwrap();
    assert_eq!(cred.identity(), "alice");
    assert_eq!(cred.kind(), IdentityKind::Personal);
}

#[test]
fn test_pat_ignores_org_name() {
    let (_dir, store) = store_with(
        "TOKEN_TYPE=pat\nDOCKER_ORG=acme\nDOCKER_USERNAME=alice\nDOCKER_TOKEN=tok\n",
    );

    let cred = store.load().unwrap();
    assert_eq!(cred.identity(), "alice");
    assert_eq!(cred.kind(), IdentityKind::Personal);
}

#[test]
fn test_no_identity_returns_none() {
    let (_dir, store) =
        store_with("TOKEN_TYPE=oat\nDOCKER_ORG=\nDOCKER_USERNAME=\nDOCKER_TOKEN=tok\n");
    assert!(store.load().is_none());
}

#[test]
fn test_parse_handles_comments_export_and_quotes() {
    let file = CredentialFile::parse(
        "# comment\n\nexport TOKEN_TYPE='pat'\n  DOCKER_USERNAME = \"bob\"  \nOTHER=1\n",
    )
    .unwrap();

    assert_eq!(file.token_type.as_deref(), Some("pat"));
    assert_eq!(file.username.as_deref(), Some("bob"));
    assert_eq!(file.org, None);
    assert_eq!(file.token, None);
}

#[test]
fn test_parse_debug_flag() {
    assert!(CredentialFile::parse("DEBUG=\"true\"").unwrap().debug);
    assert!(CredentialFile::parse("DEBUG=TRUE").unwrap().debug);
    assert!(!CredentialFile::parse("DEBUG=\"false\"").unwrap().debug);
    assert!(!CredentialFile::parse("").unwrap().debug);
}

#[test]
fn test_save_then_load_round_trips() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("credentials.env");

    for cred in [
        Credential::new("futuresecureai", "dckr_oat_1", IdentityKind::Organization).unwrap(),
        Credential::new("alice", "dckr_pat_2", IdentityKind::Personal).unwrap(),
    ] {
        let mut store = FileCredentialStore::new(path.clone());
        store.save(&cred).unwrap();
        assert_eq!(store.load(), Some(cred));
    }
}

#[test]
fn test_save_writes_fixed_layout() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("credentials.env");
    let mut store = FileCredentialStore::new(path.clone());

    let cred = Credential::new("acme", "dckr_oat_x", IdentityKind::Organization).unwrap();
    store.save(&cred).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let keys: Vec<&str> = contents
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split('=').next().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec![
            "TOKEN_TYPE",
            "DOCKER_ORG",
            "DOCKER_USERNAME",
            "DOCKER_TOKEN",
            "DEBUG"
        ]
    );
    assert!(contents.contains("DOCKER_ORG=\"acme\""));
}

#[test]
fn test_save_keeps_other_identity_and_debug_flag() {
    let (_dir, mut store) = store_with(
        "TOKEN_TYPE=pat\nDOCKER_ORG=acme\nDOCKER_USERNAME=alice\nDOCKER_TOKEN=old\nDEBUG=true\n",
    );

    let cred = Credential::new("bob", "new", IdentityKind::Personal).unwrap();
    store.save(&cred).unwrap();

    let file = store.read_file().unwrap();
    assert_eq!(file.org.as_deref(), Some("acme"));
    assert_eq!(file.username.as_deref(), Some("bob"));
    assert_eq!(file.token.as_deref(), Some("new"));
    assert!(file.debug);
}

#[test]
fn test_save_creates_parent_directory() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("credentials.env");
    let mut store = FileCredentialStore::new(path.clone());

    let cred = Credential::new("alice", "tok", IdentityKind::Personal).unwrap();
    store.save(&cred).unwrap();

    assert!(path.exists());
}

#[test]
fn test_save_leaves_no_temp_files_behind() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("credentials.env");
    let mut store = FileCredentialStore::new(path);

    let cred = Credential::new("alice", "tok", IdentityKind::Personal).unwrap();
    store.save(&cred).unwrap();
    store.save(&cred).unwrap();

    let entries = fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[cfg(unix)]
#[test]
fn test_save_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("credentials.env");
    let mut store = FileCredentialStore::new(path.clone());

    let cred = Credential::new("alice", "tok", IdentityKind::Personal).unwrap();
    store.save(&cred).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_save_over_malformed_file_replaces_it() {
    let (_dir, mut store) = store_with("garbage without equals\n");

    let cred = Credential::new("alice", "tok", IdentityKind::Personal).unwrap();
    store.save(&cred).unwrap();

    assert_eq!(store.load(), Some(cred));
}

#[test]
fn test_write_template_has_no_usable_credential() {
    let temp_dir = tempdir().unwrap();
    let store = FileCredentialStore::new(temp_dir.path().join("credentials.env"));

    store.write_template().unwrap();

    let file = store.read_file().unwrap();
    assert_eq!(file.token.as_deref(), Some(TOKEN_PLACEHOLDER));
    assert!(store.load().is_none());
    assert!(!store.debug_enabled());
}

#[test]
fn test_write_template_refuses_to_overwrite() {
    let (_dir, store) = store_with(COMPLETE_ORG_FILE);

    let result = store.write_template();
    assert!(matches!(result, Err(DockhandError::Config { .. })));
    assert!(store.load().is_some());
}

#[test]
fn test_debug_enabled_reads_flag() {
    let contents = COMPLETE_ORG_FILE.replace("DEBUG=\"false\"", "DEBUG=\"true\"");
    let (_dir, store) = store_with(&contents);
    assert!(store.debug_enabled());
}
