use std::path::PathBuf;

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Get the config directory path (always ~/.config/parlor, regardless of OS)
pub fn get_config_dir() -> PathBuf {
    get_home_dir().join(".config").join("parlor")
}

/// Get the config file path (~/.config/parlor/config.toml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Directory the log file is written to
pub fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(get_home_dir)
        .join("parlor")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_inside_config_dir() {
        assert!(get_config_path().starts_with(get_config_dir()));
        assert!(get_config_path().ends_with("config.toml"));
    }
}
