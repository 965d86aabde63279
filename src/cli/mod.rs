// ABOUTME: CLI argument parsing and command routing for skydeck
//
// Provides command-line interface for:
// - Managing servers (servers list/start/stop/reboot/delete)
// - Provisioning through the wizard (deploy)
// - Rendering configuration previews (preview)
// - Onboarding progress and dashboard counts (checklist, stats)
// - Inspecting the wizard's option catalogs (catalog)

pub mod catalog;
pub mod checklist;
pub mod deploy;
pub mod preview;
pub mod servers;
pub mod stats;
pub mod util;

use clap::{Parser, Subcommand, ValueEnum};

/// Cloud console client - provision and manage servers from the terminal
#[derive(Parser)]
#[command(name = "skydeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to the configured preference)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse a configured preference, falling back to text
    pub fn from_preference(value: &str) -> Self {
        <Self as ValueEnum>::from_str(value, true).unwrap_or_default()
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List and control servers
    Servers(ServersArgs),

    /// Provision a server through the wizard
    Deploy(DeployArgs),

    /// Print a configuration preview without submitting anything
    Preview(PreviewArgs),

    /// Show or update onboarding progress
    Checklist(ChecklistArgs),

    /// Show dashboard statistics
    Stats,

    /// Show the images, flavors and networks offered by the wizard
    Catalog,
}

#[derive(clap::Args)]
pub struct ServersArgs {
    #[command(subcommand)]
    pub action: ServerAction,
}

#[derive(Subcommand)]
pub enum ServerAction {
    /// List servers
    List,
    /// Start a stopped server
    Start { id: String },
    /// Stop a running server
    Stop { id: String },
    /// Reboot a running server
    Reboot { id: String },
    /// Delete a server
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

/// Wizard selections shared by `deploy` and `preview server`
#[derive(clap::Args, Clone, Debug)]
pub struct ServerSelectionArgs {
    /// Image id, e.g. ubuntu-22
    #[arg(long)]
    pub image: String,

    /// Flavor id, e.g. medium
    #[arg(long)]
    pub flavor: String,

    /// Server name (at least two characters)
    #[arg(long)]
    pub name: String,

    /// Network id; the default network when omitted
    #[arg(long)]
    pub network: Option<String>,

    /// SSH key pair name
    #[arg(long)]
    pub key_name: Option<String>,
}

#[derive(clap::Args)]
pub struct DeployArgs {
    #[command(flatten)]
    pub selection: ServerSelectionArgs,

    /// Validate and print the preview without creating anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct PreviewArgs {
    #[command(subcommand)]
    pub target: PreviewTarget,
}

#[derive(Subcommand)]
pub enum PreviewTarget {
    /// Server manifest for the given selections
    Server {
        #[command(flatten)]
        selection: ServerSelectionArgs,

        /// Resolve options from the built-in catalogs instead of the backend
        #[arg(long)]
        offline: bool,
    },
    /// Container deployment manifest
    Container(ContainerPreviewArgs),
}

#[derive(clap::Args, Debug)]
pub struct ContainerPreviewArgs {
    /// runtime, worker, cron or oneoff
    #[arg(long = "type", default_value = "runtime")]
    pub container_type: String,

    /// Project name
    #[arg(long)]
    pub project: Option<String>,

    /// Project environment
    #[arg(long, default_value = "production")]
    pub env: String,

    /// Existing pipeline name
    #[arg(long, conflicts_with = "template")]
    pub pipeline: Option<String>,

    /// Template for a new pipeline (node, python, go, docker)
    #[arg(long)]
    pub template: Option<String>,

    #[arg(long, default_value_t = 0.5)]
    pub cpu: f64,

    /// Memory in MiB
    #[arg(long, default_value_t = 1024)]
    pub memory: u32,

    #[arg(long, default_value_t = 2)]
    pub replicas: u32,

    /// Enable autoscaling
    #[arg(long)]
    pub autoscale: bool,

    #[arg(long, default_value_t = 2)]
    pub min_replicas: u32,

    #[arg(long, default_value_t = 10)]
    pub max_replicas: u32,

    /// Autoscaling CPU target in percent
    #[arg(long, default_value_t = 70)]
    pub target_cpu: u32,

    /// public, private or internal
    #[arg(long, default_value = "public")]
    pub expose: String,

    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Public domain for runtime services
    #[arg(long)]
    pub domain: Option<String>,
}

#[derive(clap::Args)]
pub struct ChecklistArgs {
    #[command(subcommand)]
    pub action: Option<ChecklistAction>,
}

#[derive(Subcommand)]
pub enum ChecklistAction {
    /// Show progress (default)
    Show,
    /// Mark a step complete, e.g. add_ssh_key
    Mark { step: String },
}
