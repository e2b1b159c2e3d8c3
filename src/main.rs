//! qrforge command-line entrypoint

use clap::Parser;
use qrforge::{
    BlobStore, DirectorySurface, Error, ExportFormat, ExportReceipt, PREVIEW_SIZE,
    PreviewController, QrforgeConfig, Result, SelectedFile, StyledEngine, Theme, logging,
};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type Controller = PreviewController<StyledEngine, DirectorySurface>;

#[derive(Parser, Debug)]
#[command(
    name = "qrforge",
    version,
    about = "Themed QR code generator with SVG logo embedding"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrforge.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Text to encode (defaults to the fallback URL)
    #[arg(long, value_name = "TEXT")]
    url: Option<String>,

    /// Palette to render with
    #[arg(long, value_name = "THEME", default_value = "dark")]
    theme: Theme,

    /// SVG logo composited at the centre of the symbol
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Export format (`png` or `svg`); repeat for both
    #[arg(long = "format", value_name = "FORMAT")]
    formats: Vec<ExportFormat>,

    /// Square export size; unparseable values fall back to the configured default
    #[arg(long, value_name = "N")]
    size: Option<String>,

    /// Directory downloads are written to
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Write the mounted preview markup to this path
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Print the preview styling options as JSON
    #[arg(long)]
    options: bool,

    /// Print export receipts as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Read commands from stdin after applying the flags above
    #[arg(long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = QrforgeConfig::load(cli.config.as_deref())?;
    if let Some(ref out) = cli.out {
        config.export.output_dir = out.clone();
    }

    logging::init(&config.logging)?;

    let blobs = BlobStore::new();
    let engine = StyledEngine::new(blobs.clone());
    let mut surface = DirectorySurface::new(config.export.output_dir.clone(), blobs.clone());
    surface.select_size(cli.size.clone());

    let mut controller = PreviewController::new(engine, surface, blobs)
        .with_default_export_size(config.export.default_size);
    controller.initialize()?;

    if cli.theme != controller.theme() {
        controller.toggle_theme()?;
    }
    if let Some(ref url) = cli.url {
        controller.on_url_changed(url)?;
    }
    if let Some(ref logo) = cli.logo {
        select_logo(&mut controller, logo).await?;
    }

    if cli.options {
        let options = controller.style_options(PREVIEW_SIZE);
        println!("{}", serde_json::to_string_pretty(&options)?);
    }

    for format in &cli.formats {
        if let Some(receipt) = controller.export(*format).await? {
            print_receipt(&receipt, controller.surface().output_dir(), cli.json)?;
        }
    }

    if let Some(ref path) = cli.preview {
        controller.surface().write_preview(path)?;
        info!(path = %path.display(), "Wrote preview markup");
    }

    if cli.interactive {
        run_interactive(&mut controller, cli.json).await?;
    }

    Ok(())
}

/// Select a logo, treating a rejected file type as already reported.
async fn select_logo(controller: &mut Controller, path: &Path) -> Result<()> {
    match controller.on_logo_selected(SelectedFile::from_path(path)).await {
        Ok(()) => Ok(()),
        Err(Error::InvalidLogoFormat { content_type }) => {
            warn!(path = %path.display(), %content_type, "Logo ignored");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn print_receipt(receipt: &ExportReceipt, dir: &Path, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(receipt)?);
    } else {
        println!(
            "Saved {} ({}x{}, {} bytes)",
            dir.join(receipt.filename).display(),
            receipt.size,
            receipt.size,
            receipt.bytes
        );
    }
    Ok(())
}

async fn run_interactive(controller: &mut Controller, json: bool) -> Result<()> {
    println!("Commands: toggle | url [TEXT] | logo PATH | size [N] | png | svg | preview PATH | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (command, arg) = split_command(&line);

        let outcome = match command {
            "" => Ok(()),
            "quit" | "exit" => break,
            "toggle" => controller.toggle_theme().map(|()| {
                println!("Theme: {}", controller.theme());
            }),
            "url" => controller.on_url_changed(arg),
            "logo" if !arg.trim().is_empty() => select_logo(controller, Path::new(arg.trim())).await,
            "size" => {
                let value = Some(arg.trim()).filter(|v| !v.is_empty()).map(str::to_string);
                controller.surface_mut().select_size(value);
                Ok(())
            }
            "png" | "svg" => match command.parse::<ExportFormat>() {
                Ok(format) => match controller.export(format).await {
                    Ok(Some(receipt)) => {
                        print_receipt(&receipt, controller.surface().output_dir(), json)
                    }
                    Ok(None) => Ok(()),
                    Err(err) => Err(err),
                },
                Err(message) => Err(Error::Other(message)),
            },
            "preview" if !arg.trim().is_empty() => {
                controller.surface().write_preview(Path::new(arg.trim()))
            }
            other => Err(Error::Other(format!("Unknown command '{other}'"))),
        };

        if let Err(err) = outcome {
            eprintln!("{err}");
        }
    }

    Ok(())
}

/// Split an interactive line into its command word and argument text.
/// Whitespace around the command is dropped; the argument keeps trailing text.
fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim_start()),
        None => (line.trim_end(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_lines_ignore_leading_whitespace() {
        assert_eq!(split_command(" toggle"), ("toggle", ""));
        assert_eq!(split_command("\ttoggle  "), ("toggle", ""));
        assert_eq!(split_command("url  https://x.test"), ("url", "https://x.test"));
        assert_eq!(split_command("  url hello world "), ("url", "hello world "));
        assert_eq!(split_command("url"), ("url", ""));
        assert_eq!(split_command("   "), ("", ""));
    }
}
