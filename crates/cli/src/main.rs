//! wputils command-line entry point.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use wputils_common::{Settings, WpError, WpResult};
use wputils_media::media::{mime_type_for_file_name, normalize_mime_type};
use wputils_media::{MediaKind, PhotonBuilder, PhotonRequest, Quality, media_file_name, media_kind};
use wputils_text::{
    lookup_emoji_for_legacy_icon_file, replace_legacy_icons_in_html,
    replace_surrogate_pairs_with_entities,
};

/// Content utilities for blog posts and comments.
#[derive(Debug, Parser)]
#[command(name = "wputils", version, about)]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rewrite an image URL through the Photon resizing proxy.
    Photon {
        /// Source image URL.
        url: String,
        /// Target width in pixels; 0 leaves it unconstrained.
        #[arg(long, default_value_t = 0)]
        width: u32,
        /// Target height in pixels; 0 leaves it unconstrained.
        #[arg(long, default_value_t = 0)]
        height: u32,
        /// Compression quality: high, medium or low.
        #[arg(long, default_value = "medium")]
        quality: Quality,
        /// The image lives on a private atomic site.
        #[arg(long)]
        private: bool,
        /// Build the plain `?w=` form using `--width` as the size.
        #[arg(long, conflicts_with_all = ["height", "private"])]
        simple: bool,
    },

    /// Print the emoji for a legacy smiley image URL.
    Emoji {
        /// Smiley image URL.
        url: String,
        /// Printed when the image is not a known smiley.
        #[arg(long, default_value = "")]
        fallback: String,
    },

    /// Replace smiley images in HTML read from stdin.
    Icons,

    /// Replace supplementary-plane characters in text read from stdin.
    Entities,

    /// Describe a media file by name and optional MIME type.
    Media {
        /// File name or URL.
        name: String,
        /// MIME type reported for the file.
        #[arg(long)]
        mime: Option<String>,
    },
}

/// JSON form of the `media` command output.
#[derive(Debug, Serialize)]
struct MediaReport {
    file_name: String,
    kind: Option<MediaKind>,
    mime_type: Option<String>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wputils: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> WpResult<()> {
    let settings = Settings::load()?;
    wputils_common::logging::init(&settings.logging);
    debug!(?settings, "settings loaded");

    let output = execute(&cli.command, &settings, cli.json, read_stdin)?;
    println!("{output}");
    Ok(())
}

fn read_stdin() -> WpResult<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

/// Run one command and return what should be printed.
fn execute(
    command: &Command,
    settings: &Settings,
    json: bool,
    input: impl FnOnce() -> WpResult<String>,
) -> WpResult<String> {
    let text = match command {
        Command::Photon {
            url,
            width,
            height,
            quality,
            private,
            simple,
        } => {
            let builder = PhotonBuilder::new(settings.photon.clone());
            if *simple {
                if *width == 0 {
                    return Err(WpError::InvalidArgument(
                        "--simple needs a non-zero --width".to_string(),
                    ));
                }
                builder.simple_url(url, *width)
            } else {
                let request = PhotonRequest::new(*width, *height)
                    .with_quality(*quality)
                    .with_private_site(*private);
                builder.build(Some(url.as_str()), &request)
            }
        }
        Command::Emoji { url, fallback } => {
            lookup_emoji_for_legacy_icon_file(Some(url.as_str()), fallback)
        }
        Command::Icons => {
            let html = input()?;
            replace_legacy_icons_in_html(Some(html.as_str())).unwrap_or_default()
        }
        Command::Entities => replace_surrogate_pairs_with_entities(&input()?),
        Command::Media { name, mime } => {
            let report = MediaReport {
                file_name: media_file_name(name, mime.as_deref()),
                kind: media_kind(name),
                mime_type: mime
                    .as_deref()
                    .map(normalize_mime_type)
                    .or_else(|| mime_type_for_file_name(name).map(str::to_string)),
            };
            if json {
                return Ok(serde_json::to_string_pretty(&report)
                    .context("encoding media report")?);
            }
            format!(
                "{}\t{}\t{}",
                report.file_name,
                report.kind.map_or("unknown", media_kind_label),
                report.mime_type.as_deref().unwrap_or("-"),
            )
        }
    };

    if json {
        Ok(serde_json::to_string(&text).context("encoding output")?)
    } else {
        Ok(text)
    }
}

const fn media_kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
        MediaKind::Document => "document",
        MediaKind::Presentation => "presentation",
        MediaKind::Spreadsheet => "spreadsheet",
    }
}
