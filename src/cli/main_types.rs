use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recuerd0")]
#[command(about = "Command line interface for the recuerd0 memory service")]
#[command(version)]
#[command(after_help = "Examples:
  recuerd0 account add work --token TOKEN
  recuerd0 workspace list
  recuerd0 memory list --workspace 5
  echo \"notes\" | recuerd0 memory create --workspace 5 --title Notes --content -
  recuerd0 search \"rust patterns\" --pretty")]
pub struct Cli {
    /// Log request tracing to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Indent the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Account to use instead of the current one
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// API token, overriding the account's token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL, overriding the account's URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Workspace ID
    #[arg(long, global = true)]
    pub workspace: Option<String>,

    /// Directory holding config.yaml
    #[arg(long, global = true, env = "RECUERD0_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configured accounts
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Manage workspaces
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
    /// Manage memories
    Memory {
        #[command(subcommand)]
        command: MemoryCommands,
    },
    /// Search memories
    Search {
        /// Search query
        query: String,
        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },
    /// Print the CLI version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Add a new account (uses --token and --api-url)
    Add {
        /// Account name
        name: String,
    },
    /// List all configured accounts
    List,
    /// Set the active account
    Select {
        /// Account name
        name: String,
    },
    /// Remove an account
    Remove {
        /// Account name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    /// List workspaces
    List {
        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show workspace details
    Show {
        /// Workspace ID
        id: String,
    },
    /// Create a new workspace
    Create {
        /// Workspace name (required)
        #[arg(long)]
        name: Option<String>,
        /// Workspace description
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a workspace
    Update {
        /// Workspace ID
        id: String,
        /// Workspace name
        #[arg(long)]
        name: Option<String>,
        /// Workspace description
        #[arg(long)]
        description: Option<String>,
    },
    /// Archive a workspace
    Archive {
        /// Workspace ID
        id: String,
    },
    /// Unarchive a workspace
    Unarchive {
        /// Workspace ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemoryCommands {
    /// List memories in a workspace
    List {
        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show memory details
    Show {
        /// Memory ID
        id: String,
    },
    /// Create a new memory
    Create {
        #[command(flatten)]
        fields: MemoryFields,
    },
    /// Update an existing memory
    Update {
        /// Memory ID
        id: String,
        #[command(flatten)]
        fields: MemoryFields,
    },
    /// Delete a memory
    Delete {
        /// Memory ID
        id: String,
    },
    /// Manage memory versions
    Version {
        #[command(subcommand)]
        command: MemoryVersionCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemoryVersionCommands {
    /// Create a new version of a memory
    Create {
        /// Memory ID
        id: String,
        #[command(flatten)]
        fields: MemoryFields,
    },
}

/// Writable memory fields shared by create, update and version create
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFields {
    /// Memory title
    #[arg(long)]
    pub title: Option<String>,
    /// Memory content (use - for stdin)
    #[arg(long)]
    pub content: Option<String>,
    /// Source of the memory
    #[arg(long)]
    pub source: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}
