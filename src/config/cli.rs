use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use url::Url;

/// Command-line arguments for the Gurshabad binary.
#[derive(Debug, Parser)]
#[command(name = "gurshabad", version, about = "Gurbani ang viewer")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "GURSHABAD_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the viewer HTTP server.
    Serve(Box<ServeArgs>),
    /// Render a single ang to stdout or a file.
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct CommonOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the verse provider base URL.
    #[arg(long = "provider-base-url", value_name = "URL")]
    pub provider_base_url: Option<String>,

    /// Override the verse provider request timeout.
    #[arg(long = "provider-timeout-seconds", value_name = "SECONDS")]
    pub provider_timeout_seconds: Option<u64>,

    /// Override the User-Agent sent to the verse provider.
    #[arg(long = "provider-user-agent", value_name = "AGENT")]
    pub provider_user_agent: Option<String>,

    /// Override the file holding the last viewed ang.
    #[arg(long = "storage-path", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub common: CommonOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: CommonOverrides,

    /// Ang to render; out-of-range values are clamped.
    #[arg(long, value_name = "ANG", conflicts_with = "url")]
    pub ang: Option<String>,

    /// Viewer URL to resolve the ang from (`?ang=N` or `#ang=N`).
    #[arg(long, value_name = "URL")]
    pub url: Option<Url>,

    /// Write the rendered page here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
