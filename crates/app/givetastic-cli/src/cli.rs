use clap::{Parser, Subcommand};
use givetastic_core::models::{CodeKind, Role};

#[derive(Parser, Debug)]
#[command(name = "givetastic", version, about = "Manage Givetastic access codes")]
pub struct Cli {
    /// Store backend: fallback, memory or postgres.
    #[arg(long, global = true, env = "GIVETASTIC_STORE")]
    pub store: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Log level when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information.
    Version,

    /// Generate a batch of codes for every kind.
    Seed {
        #[arg(long, default_value_t = 25)]
        team: usize,
        #[arg(long, default_value_t = 10)]
        coach: usize,
        #[arg(long, default_value_t = 5)]
        company: usize,
    },

    /// Issue a single code.
    Issue {
        /// team, coach or company
        kind: CodeKind,
    },

    /// Check whether a code is active. Exits non-zero when it is not.
    Validate { kind: CodeKind, code: String },

    /// Deactivate a code.
    Revoke { kind: CodeKind, code: String },

    /// Run the entry flow and print the resulting identity.
    Login {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Sign in to an existing account instead of creating one.
        #[arg(long)]
        sign_in: bool,
    },
}
