use clap::Parser;

/// Command line interface for the application
#[derive(Parser)]
pub struct Cli {
    /// Port to bind the HTTP API on (overrides APP_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the sqlite database file (overrides DATABASE_PATH)
    #[arg(long)]
    pub database_path: Option<String>,

    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Default: "info"
    #[arg(long, default_value_t = String::from("info"))]
    pub logging_level: String,

    /// Also write logs to a daily rotating file under logs/
    #[arg(long, default_value_t = false)]
    pub log_to_file: bool,
}
