use anyhow::Result;
use clap::{CommandFactory, Parser};
use color_eyre::config::HookBuilder;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod handlers;
mod wizard;

/// s3pilot - deploy static websites to Amazon S3
#[derive(Parser, Debug)]
#[command(name = "s3pilot")]
#[command(version = "0.1.0")]
#[command(about = "Deploy static websites to Amazon S3 from your terminal", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Initial configuration (interactive wizard)
    Init,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List all buckets visible to the session
    ListBuckets,

    /// List all objects in a bucket
    ListBucketObjects {
        /// Bucket to list (defaults to the configured bucket)
        bucket: Option<String>,
    },

    /// Create a bucket and configure it for website hosting
    SetupBucket {
        /// Bucket to provision (defaults to the configured bucket)
        bucket: Option<String>,
    },

    /// Sync a local directory tree to a bucket
    Sync {
        /// Local directory to upload
        pathname: PathBuf,
        /// Target bucket (defaults to the configured bucket)
        bucket: Option<String>,
    },

    /// Print the public website URL of a bucket
    Url {
        /// Bucket (defaults to the configured bucket)
        bucket: Option<String>,
    },

    /// Shell completion
    Completion {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: String,
    },

    /// Diagnostic and verification
    Doctor {
        #[command(subcommand)]
        action: DoctorAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Edit the configuration in $EDITOR
    Edit,
    /// Validate the configuration and credentials
    Validate,
}

#[derive(clap::Subcommand, Debug)]
enum DoctorAction {
    /// Check the installation
    Check,
    /// Test the S3 connection
    TestConnection,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    // Logging is opt-in through RUST_LOG; command output stays on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Init => handlers::handle_init().await,
        Commands::Config { action } => {
            let action_str = match action {
                ConfigAction::Show => "show",
                ConfigAction::Edit => "edit",
                ConfigAction::Validate => "validate",
            };
            handlers::handle_config(action_str).await
        }
        Commands::ListBuckets => handlers::handle_list_buckets().await,
        Commands::ListBucketObjects { bucket } => {
            handlers::handle_list_bucket_objects(bucket.as_deref()).await
        }
        Commands::SetupBucket { bucket } => {
            handlers::handle_setup_bucket(bucket.as_deref()).await
        }
        Commands::Sync { pathname, bucket } => {
            handlers::handle_sync(&pathname, bucket.as_deref()).await
        }
        Commands::Url { bucket } => handlers::handle_url(bucket.as_deref()).await,
        Commands::Completion { shell } => {
            handlers::handle_completion(&shell, &mut Cli::command()).await
        }
        Commands::Doctor { action } => {
            let action_str = match action {
                DoctorAction::Check => "check",
                DoctorAction::TestConnection => "test-connection",
            };
            handlers::handle_doctor(action_str).await
        }
    }
}
