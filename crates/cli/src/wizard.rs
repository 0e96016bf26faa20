//! Interactive setup wizard for s3pilot configuration

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use s3pilot_core::{save_config, validate_bucket_name, AwsConfig, ConfigFile, SiteConfig};

/// Run the interactive setup wizard
pub async fn run_init_wizard() -> Result<()> {
    println!("🚀 Welcome to s3pilot setup!\n");

    println!("This wizard will guide you through the configuration process.");
    println!("You will need:");
    println!("  1. A named AWS credentials profile (from ~/.aws/credentials)");
    println!("  2. The region your website buckets should live in");
    println!("  3. Your default bucket name\n");

    // Step 1: Credentials profile
    let profile = prompt_profile()?;

    // Step 2: Region (optional, the profile's default applies when empty)
    let region = prompt_region()?;

    // Step 3: Default bucket
    let default_bucket = prompt_bucket_name()?;

    // Summary
    println!("\n📋 Configuration summary:");
    println!("  Profile: {}", profile);
    println!(
        "  Region: {}",
        region.as_deref().unwrap_or("(from profile)")
    );
    println!("  Default bucket: {}", default_bucket);

    // Confirmation
    let confirm = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save this configuration?")
        .default(false)
        .interact()?;

    if !confirm {
        println!("❌ Configuration cancelled");
        return Ok(());
    }

    // Create config
    let config = ConfigFile {
        aws: AwsConfig {
            profile: profile.clone(),
            region: region.clone(),
        },
        site: SiteConfig {
            default_bucket: default_bucket.clone(),
        },
        logging: None,
    };

    // Save config
    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Saving configuration...");

    save_config(&config)?;

    pb.inc(1);
    pb.finish_with_message("✅ Configuration saved!");

    println!("\n🎉 Setup complete!");
    println!("\nConfiguration saved to: ~/.config/s3pilot/config.toml");
    println!("\nYou can now use s3pilot:");
    println!("  $ s3pilot setup-bucket {}", default_bucket);
    println!("  $ s3pilot sync ./site {}", default_bucket);
    println!("  $ s3pilot list-buckets");

    Ok(())
}

/// Prompt for the AWS credentials profile name
fn prompt_profile() -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("AWS profile name")
        .default("default".to_string())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.is_empty() {
                Err("Profile name cannot be empty")
            } else if input.chars().any(char::is_whitespace) {
                Err("Profile name cannot contain whitespace")
            } else {
                Ok(())
            }
        })
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to get profile name: {}", e))
}

/// Prompt for the region, empty means "use the profile's default"
fn prompt_region() -> Result<Option<String>> {
    let region: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Region (leave empty to use the profile's default)")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.is_empty() || s3pilot_core::website_endpoint(input).is_some() {
                Ok(())
            } else {
                Err("Unknown region (no static-website endpoint for it)")
            }
        })
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to get region: {}", e))?;

    Ok(if region.is_empty() { None } else { Some(region) })
}

/// Prompt for the default bucket name
fn prompt_bucket_name() -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Default bucket name")
        .validate_with(|input: &String| -> Result<(), String> {
            validate_bucket_name(input).map_err(|e| e.to_string())
        })
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to get bucket name: {}", e))
}
