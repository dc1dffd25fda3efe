use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "svgtint",
    about = "Interactive web tool for recoloring SVG images, with a live log console",
    version = "0.1.0"
)]
pub struct Cli {
    /// Host for web server
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port for web server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Directory holding app.toml and the HTML templates
    #[arg(long, default_value = "resources")]
    pub resource_dir: PathBuf,

    /// Override the root log level from app.toml (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}
