//! Command handlers for the s3pilot CLI

use crate::wizard::run_init_wizard;
use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Shell as ClapShell};
use s3pilot_core::{
    get_config_path, load_config, validate_config, BucketInit, BucketManager, ConfigFile,
    ERROR_DOCUMENT, INDEX_DOCUMENT,
};
use std::path::Path;
use tabled::{Table, Tabled};

/// Build a bucket manager from the configured profile
async fn bucket_manager(config: &ConfigFile) -> Result<BucketManager> {
    Ok(BucketManager::from_profile(&config.aws.profile, config.aws.region.clone()).await?)
}

/// Resolve the target bucket: explicit argument or the configured default
fn resolve_bucket<'a>(bucket: Option<&'a str>, config: &'a ConfigFile) -> &'a str {
    bucket.unwrap_or(&config.site.default_bucket)
}

/// Handle init command
pub async fn handle_init() -> Result<()> {
    run_init_wizard().await
}

/// Handle config commands
pub async fn handle_config(action: &str) -> Result<()> {
    match action {
        "show" => {
            println!("Current configuration:");
            println!();

            let config = load_config()?;

            println!("AWS:");
            println!("  Profile: {}", config.aws.profile);
            println!(
                "  Region: {}",
                config.aws.region.as_deref().unwrap_or("(from profile)")
            );
            println!();
            println!("Site:");
            println!("  Default bucket: {}", config.site.default_bucket);

            Ok(())
        }
        "validate" => {
            println!("Validating configuration...");

            let config = load_config()?;

            // Validate config format
            validate_config(&config)?;
            println!("  ✅ Valid configuration format");

            println!("  Testing S3 connection (profile '{}')...", config.aws.profile);
            let manager = bucket_manager(&config).await?;

            // Try to list buckets as a connection test
            let _buckets = manager.all_buckets().await?;

            println!("  ✅ Valid configuration!");
            println!("  ✅ S3 connection successful!");

            Ok(())
        }
        "edit" => {
            println!("Opening editor...");
            println!("  File: ~/.config/s3pilot/config.toml");
            println!();

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            let config_path = get_config_path()?;

            let status = std::process::Command::new(editor)
                .arg(&config_path)
                .status()?;

            if status.success() {
                println!("  ✅ Configuration edited");

                // Validate after edit
                let config = load_config()?;
                validate_config(&config)?;
                println!("  ✅ Configuration valid");
            } else {
                println!("  ⚠️  Editor exited with error");
            }

            Ok(())
        }
        _ => {
            println!("Unknown action: {}", action);
            println!("Available actions: show, edit, validate");
            Ok(())
        }
    }
}

/// Handle list-buckets command
pub async fn handle_list_buckets() -> Result<()> {
    let config = load_config()?;
    let manager = bucket_manager(&config).await?;

    let buckets = manager.all_buckets().await?;

    if buckets.is_empty() {
        println!("No buckets found");
    } else {
        for bucket in buckets {
            println!("{}", bucket);
        }
    }

    Ok(())
}

/// Handle list-bucket-objects command
pub async fn handle_list_bucket_objects(bucket: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let manager = bucket_manager(&config).await?;
    let bucket = resolve_bucket(bucket, &config);

    println!("Bucket '{}' contents...", bucket);

    let objects = manager.all_objects(bucket).await?;

    if objects.is_empty() {
        println!("  Empty bucket");
    } else {
        #[derive(Tabled)]
        struct ObjectRow {
            key: String,
            size: String,
            modified: String,
        }

        let rows: Vec<ObjectRow> = objects
            .iter()
            .map(|o| ObjectRow {
                key: o.key.clone(),
                size: format_bytes(o.size),
                modified: o
                    .last_modified_rfc3339()
                    .map(|d| format_date(&d))
                    .unwrap_or_default(),
            })
            .collect();

        println!();
        println!("{}", Table::new(rows));
    }

    Ok(())
}

/// Handle setup-bucket command
///
/// Runs create, policy, and website configuration in sequence. There is no
/// rollback: a failure partway leaves the earlier steps applied.
pub async fn handle_setup_bucket(bucket: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let manager = bucket_manager(&config).await?;
    let bucket = resolve_bucket(bucket, &config);

    println!("Setting up bucket '{}' for website hosting...", bucket);

    match manager.init_bucket(bucket).await? {
        BucketInit::Created => {
            println!("  ✅ Bucket created: {} ({})", bucket, manager.region());
        }
        BucketInit::AlreadyOwned => {
            println!("  Bucket already exists. Proceeding with setup");
        }
    }

    let policy = manager.set_policy(bucket).await?;
    println!("  ✅ Public-read policy applied:");
    println!("{}", policy);

    manager.configure_website(bucket).await?;
    println!(
        "  ✅ Website hosting enabled (index: {}, error: {})",
        INDEX_DOCUMENT, ERROR_DOCUMENT
    );

    match manager.get_bucket_url(bucket).await {
        Ok(url) => println!("  Website URL: {}", url),
        Err(e) => println!("  ⚠️  Could not determine website URL: {}", e),
    }

    Ok(())
}

/// Handle sync command
pub async fn handle_sync(pathname: &Path, bucket: Option<&str>) -> Result<()> {
    // Fail fast before touching config or the network
    if !pathname.exists() {
        return Err(anyhow::anyhow!("Path not found: {}", pathname.display()));
    }

    let config = load_config()?;
    let manager = bucket_manager(&config).await?;
    let bucket = resolve_bucket(bucket, &config);

    println!("Syncing {} -> s3://{}...", pathname.display(), bucket);

    let uploaded = manager.sync(pathname, bucket).await?;

    println!("  ✅ Sync complete ({} objects uploaded)", uploaded);

    match manager.get_bucket_url(bucket).await {
        Ok(url) => println!("  Website URL: {}", url),
        Err(e) => println!("  ⚠️  Could not determine website URL: {}", e),
    }

    Ok(())
}

/// Handle url command
pub async fn handle_url(bucket: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let manager = bucket_manager(&config).await?;
    let bucket = resolve_bucket(bucket, &config);

    let url = manager.get_bucket_url(bucket).await?;
    println!("{}", url);

    Ok(())
}

/// Handle doctor commands
pub async fn handle_doctor(action: &str) -> Result<()> {
    match action {
        "check" => {
            println!("Checking s3pilot installation...");

            println!("  ✅ s3pilot is installed");
            println!("  Version: {}", env!("CARGO_PKG_VERSION"));

            // Check config
            let config_path = get_config_path()?;
            if config_path.exists() {
                println!("  ✅ Configuration found");

                let config = load_config()?;
                validate_config(&config)?;
                println!("  ✅ Configuration valid");
            } else {
                println!("  ⚠️  Configuration not found (run 's3pilot init')");
            }

            Ok(())
        }
        "test-connection" => {
            println!("Testing S3 connection...");

            let config = load_config()?;
            println!("  Using profile '{}'", config.aws.profile);

            let manager = bucket_manager(&config).await?;

            let buckets = manager.all_buckets().await?;
            println!("  ✅ S3 connection OK ({} buckets visible)", buckets.len());

            Ok(())
        }
        _ => {
            println!("Unknown action: {}", action);
            println!("Available actions: check, test-connection");
            Ok(())
        }
    }
}

/// Handle shell completion generation
pub async fn handle_completion(shell: &str, cmd: &mut Command) -> Result<()> {
    use std::io;

    let clap_shell = match shell {
        "bash" => ClapShell::Bash,
        "zsh" => ClapShell::Zsh,
        "fish" => ClapShell::Fish,
        "elvish" => ClapShell::Elvish,
        "powershell" | "pwsh" => ClapShell::PowerShell,
        _ => {
            return Err(anyhow::anyhow!(
                "Unsupported shell: {}\nSupported shells: bash, zsh, fish, elvish, powershell",
                shell
            ));
        }
    };

    generate(clap_shell, cmd, "s3pilot", &mut io::stdout());

    Ok(())
}

/// Format ISO date string to readable format
fn format_date(iso_date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(iso_date) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

/// Format bytes to human-readable size
fn format_bytes(bytes: i64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512.00 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(format_date("2024-03-01T12:30:00Z"), "2024-03-01 12:30");
    }

    #[test]
    fn test_format_date_passthrough_on_garbage() {
        assert_eq!(format_date("not-a-date"), "not-a-date");
    }
}
