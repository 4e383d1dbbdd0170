use crate::messaging::local::BootstrapNode;
use crate::messaging::Contact;
use crate::modules::ModuleKind;
use crate::styles::ThemeType;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// UI theme (dark, light, nocolor)
    #[serde(default)]
    pub theme: ThemeType,
    /// Tab selected when a session starts
    #[serde(default = "default_tab")]
    pub default_tab: ModuleKind,
    /// Whether a session is open; written on login and logout
    #[serde(default)]
    pub is_user_logged_in: bool,
    /// Nickname of the logged in user
    #[serde(default)]
    pub nickname: Option<String>,
    /// Optional JSON file with additional contacts
    #[serde(default)]
    pub contacts_file: Option<PathBuf>,
    /// Rendezvous nodes; the built-in list is used when empty
    #[serde(default)]
    pub bootstrap_nodes: Vec<BootstrapNode>,
    /// Contacts to seed the local engine with
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

fn default_tab() -> ModuleKind {
    ModuleKind::Conversations
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeType::default(),
            default_tab: default_tab(),
            is_user_logged_in: false,
            nickname: None,
            contacts_file: None,
            bootstrap_nodes: Vec::new(),
            contacts: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file with secure permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        // 600: the file names the logged in user
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)
                .with_context(|| format!("Failed to get file metadata: {:?}", config_path))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)
                .with_context(|| format!("Failed to set file permissions: {:?}", config_path))?;
        }

        Ok(())
    }

    /// Contacts from the config plus the optional seed file, deduplicated by id.
    pub fn seed_contacts(&self) -> Result<Vec<Contact>> {
        let mut contacts = self.contacts.clone();
        if let Some(path) = &self.contacts_file {
            for contact in crate::messaging::local::load_contacts(path)? {
                if !contacts.iter().any(|c| c.id == contact.id) {
                    contacts.push(contact);
                }
            }
        }
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_tab, ModuleKind::Conversations);
        assert!(!config.is_user_logged_in);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.nickname = Some("ana".to_string());
        config.default_tab = ModuleKind::Contacts;
        config.save(&config_path).unwrap();

        let loaded = Config::load_or_create(&config_path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_seed_contacts_merges_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("contacts.json");
        std::fs::write(
            &file,
            r#"[{"id": "alice", "name": "Alice (dup)"}, {"id": "erin", "name": "Erin"}]"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.contacts = vec![Contact::new("alice", "Alice")];
        config.contacts_file = Some(file);

        let contacts = config.seed_contacts().unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Alice");
        assert_eq!(contacts[1].name, "Erin");
    }
}
