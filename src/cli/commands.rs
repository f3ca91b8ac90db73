use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "modgate", version, about = "Bearer-token gateway for image content moderation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Manage API tokens directly in the database
    Token(TokenArgs),
    /// Moderate a local image file and print the verdict
    Check(CheckArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long, env = "MODGATE_CONFIG")]
    pub config: Option<String>,

    /// Listen port (overrides config)
    #[arg(long, env = "MODGATE_PORT")]
    pub port: Option<u16>,

    /// Listen address (overrides config)
    #[arg(long, env = "MODGATE_HOST")]
    pub host: Option<String>,

    /// SQLite database path (overrides config)
    #[arg(long, env = "MODGATE_DB")]
    pub db: Option<String>,
}

#[derive(Args, Clone)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,

    /// YAML configuration file
    #[arg(short, long, env = "MODGATE_CONFIG", global = true)]
    pub config: Option<String>,

    /// SQLite database path (overrides config)
    #[arg(long, env = "MODGATE_DB", global = true)]
    pub db: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum TokenCommand {
    /// Create a new token
    Create {
        /// Grant admin privileges
        #[arg(long)]
        admin: bool,
    },
    /// List all tokens
    List,
    /// Revoke a token
    Delete {
        /// Token to revoke
        token: String,
    },
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Image file to moderate
    pub file: String,

    /// YAML configuration file
    #[arg(short, long, env = "MODGATE_CONFIG")]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
