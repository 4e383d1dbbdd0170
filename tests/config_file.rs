use parlor::config::Config;
use parlor::messaging::ContactId;
use parlor::modules::ModuleKind;
use parlor::session::{ConfigSessionStore, SessionStore};
use parlor::styles::ThemeType;
use std::fs;
use tempfile::TempDir;

const EXAMPLE_CONFIG: &str = r#"
theme = "light"
default_tab = "contacts"
is_user_logged_in = true
nickname = "ana"

[[bootstrap_nodes]]
host = "127.0.0.1"
port = 33445
public_key = "ABCDEF"

[[contacts]]
id = "alice"
name = "Alice"
online = true

[[contacts]]
id = "bob"
name = "Bob"
status_message = "away"
"#;

#[test]
fn test_example_config_loads() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, EXAMPLE_CONFIG).unwrap();

    let config = Config::load_or_create(&config_path).unwrap();

    assert_eq!(config.theme, ThemeType::Light);
    assert_eq!(config.default_tab, ModuleKind::Contacts);
    assert!(config.is_user_logged_in);
    assert_eq!(config.nickname.as_deref(), Some("ana"));
    assert_eq!(config.bootstrap_nodes.len(), 1);
    assert_eq!(config.bootstrap_nodes[0].port, 33445);
    assert_eq!(config.contacts.len(), 2);
    assert_eq!(config.contacts[1].id, ContactId::new("bob"));
    assert_eq!(config.contacts[1].status_message, "away");
    assert!(!config.contacts[1].online);
}

#[test]
fn test_unknown_default_tab_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, r#"default_tab = "calls""#).unwrap();

    assert!(Config::load_or_create(&config_path).is_err());
}

#[test]
fn test_logout_rewrites_only_the_session_flag() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, EXAMPLE_CONFIG).unwrap();

    let mut store = ConfigSessionStore::new(&config_path);
    assert!(store.is_logged_in());
    store.end_session().unwrap();
    assert!(!store.is_logged_in());

    let config = Config::load_or_create(&config_path).unwrap();
    assert_eq!(config.default_tab, ModuleKind::Contacts);
    assert_eq!(config.contacts.len(), 2);
    assert_eq!(config.nickname.as_deref(), Some("ana"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_contacts_file_is_merged() {
    let temp_dir = TempDir::new().unwrap();
    let contacts_path = temp_dir.path().join("contacts.json");
    fs::write(
        &contacts_path,
        r#"[{"id": "carol", "name": "Carol", "online": true}]"#,
    )
    .unwrap();

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "contacts_file = {:?}\n{}",
            contacts_path.display().to_string(),
            r#"
[[contacts]]
id = "alice"
name = "Alice"
"#
        ),
    )
    .unwrap();

    let config = Config::load_or_create(&config_path).unwrap();
    let ids: Vec<String> = config
        .seed_contacts()
        .unwrap()
        .into_iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(ids, vec!["alice", "carol"]);
}
