//! iconpath - resolve a freedesktop icon name to an image file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use iconpath::{config, export_icon, logging, resolve, select_theme, IconRequest};

/// Resolve an icon name through the active icon theme.
#[derive(Parser, Debug)]
#[command(name = "iconpath", version, about)]
struct Cli {
    /// Icon name without extension
    #[arg(value_name = "ICON", default_value = "utilities-terminal")]
    icon: String,

    /// Requested size in pixels
    #[arg(
        short = 's',
        long = "size",
        default_value_t = 64,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    size: u32,

    /// Display scale factor
    #[arg(
        long = "scale",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    scale: u32,

    /// Icon theme (defaults to config.json, then the desktop setting)
    #[arg(short = 't', long = "theme", value_name = "THEME")]
    theme: Option<String>,

    /// Write the icon as PNG to this path
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_app_config();
    let theme = select_theme(cli.theme.as_deref(), &config)?;
    let request = IconRequest::new(cli.icon, cli.size, cli.scale);
    tracing::debug!(%theme, ?request, "resolving icon");

    let path = resolve(&theme, &request, &config)?;

    let Some(output) = cli.output else {
        println!("{}", path.display());
        return Ok(());
    };

    let resolution = request.size.saturating_mul(request.scale);
    let exported = export_icon(&path, &output, resolution, &config)
        .with_context(|| format!("failed to export {}", path.display()))?;
    println!("{}", exported.path.display());
    Ok(())
}
