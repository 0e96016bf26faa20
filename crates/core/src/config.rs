//! Configuration management for s3pilot

use crate::error::{Error, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration directory name
const CONFIG_DIR: &str = "s3pilot";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub aws: AwsConfig,
    pub site: SiteConfig,
    pub logging: Option<LoggingConfig>,
}

/// AWS session configuration
///
/// Authentication is delegated entirely to the named credentials profile;
/// no keys are stored in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Overrides the profile's default region when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Website deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub default_bucket: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default values
fn default_profile() -> String {
    "default".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    let config_dir = home.join(".config").join(CONFIG_DIR);

    // Create directory if it doesn't exist
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    Ok(config_dir)
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load configuration from file
pub fn load_config() -> Result<ConfigFile> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Err(Error::ConfigNotFound(config_path));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        Error::InvalidConfig(format!("Failed to read config file: {}", e))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::InvalidConfig(format!("Failed to parse config file: {}", e))
    })?;

    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let config_path = get_config_path()?;

    let content = toml::to_string_pretty(config).map_err(|e| {
        Error::InvalidConfig(format!("Failed to serialize config: {}", e))
    })?;

    fs::write(&config_path, content).map_err(|e| {
        Error::Config(format!("Failed to write config file: {}", e))
    })?;

    // Set secure permissions on config file (read/write for owner only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&config_path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&config_path, perms)?;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.aws.profile.is_empty() {
        return Err(Error::InvalidInput("Profile name cannot be empty".to_string()));
    }

    if let Some(region) = &config.aws.region {
        if region.is_empty() {
            return Err(Error::InvalidInput("Region cannot be empty when set".to_string()));
        }
    }

    validate_bucket_name(&config.site.default_bucket)
}

/// Validate an S3 bucket name (length and character rules)
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("Bucket name cannot be empty".to_string()));
    }

    if name.len() < 3 || name.len() > 63 {
        return Err(Error::InvalidInput(format!(
            "Bucket name must be between 3 and 63 characters (got {})",
            name.len()
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(Error::InvalidInput(
            "Bucket name can only contain lowercase letters, digits, hyphens, and dots".to_string(),
        ));
    }

    Ok(())
}

/// Check if configuration exists
pub fn config_exists() -> bool {
    get_config_path().map(|p| p.exists()).unwrap_or(false)
}

/// Public alias for ConfigFile (used by lib.rs)
pub use ConfigFile as Config;

#[cfg(test)]
mod tests {
    use super::*;

    fn make_valid_config() -> ConfigFile {
        ConfigFile {
            aws: AwsConfig {
                profile: "site-deploy".to_string(),
                region: Some("eu-west-2".to_string()),
            },
            site: SiteConfig {
                default_bucket: "my-site-bucket".to_string(),
            },
            logging: None,
        }
    }

    #[test]
    fn test_validate_config_valid() {
        let config = make_valid_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_empty_profile() {
        let mut config = make_valid_config();
        config.aws.profile = "".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_no_region_is_ok() {
        let mut config = make_valid_config();
        config.aws.region = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_empty_region() {
        let mut config = make_valid_config();
        config.aws.region = Some("".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bucket_name_empty() {
        assert!(validate_bucket_name("").is_err());
    }

    #[test]
    fn test_validate_bucket_name_too_short() {
        assert!(validate_bucket_name("ab").is_err());
    }

    #[test]
    fn test_validate_bucket_name_too_long() {
        let name = "a".repeat(64);
        assert!(validate_bucket_name(&name).is_err());
    }

    #[test]
    fn test_validate_bucket_name_uppercase() {
        assert!(validate_bucket_name("My-Bucket").is_err());
    }

    #[test]
    fn test_validate_bucket_name_valid() {
        assert!(validate_bucket_name("my-site.example.com").is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let config = make_valid_config();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.aws.profile, "site-deploy");
        assert_eq!(parsed.aws.region.as_deref(), Some("eu-west-2"));
        assert_eq!(parsed.site.default_bucket, "my-site-bucket");
    }

    #[test]
    fn test_config_defaults_applied() {
        let parsed: ConfigFile = toml::from_str(
            "[aws]\n\n[site]\ndefault_bucket = \"my-bucket\"\n",
        )
        .unwrap();

        assert_eq!(parsed.aws.profile, "default");
        assert!(parsed.aws.region.is_none());
    }
}
