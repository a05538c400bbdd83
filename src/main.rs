use clap::{Parser, Subcommand, ValueEnum};
use roundel::{Dimensions, Engine, TransformOptions, animated, placeholder};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "roundel")]
#[command(about = "Resize and corner-round avatars and banners, static or animated")]
#[command(long_about = "\
Resize and corner-round avatars and banners, static or animated

The same transform engine the image service runs, as a file-in/file-out
tool: handy for previewing what a given size/radius combination will serve,
and for debugging animations whose disposal metadata misbehaves.

Static images (JPEG/PNG) keep their encoding when only resized; rounding
introduces alpha, so rounded output is always PNG. Animated GIFs are
re-composited frame by frame, so rounding respects disposal modes, and the
output preserves the original delays and loop count.

Examples:

  roundel transform avatar.jpg -o avatar-128.jpg --size 128
  roundel transform avatar.gif -o rounded.gif --size 128 --radius 16
  roundel inspect avatar.gif --json
  roundel placeholder avatar -o default.jpg")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply resize and/or corner-rounding to an image file
    Transform {
        /// Input image (JPEG, PNG, or animated GIF)
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Resize to a square of this many pixels
        #[arg(long)]
        size: Option<u32>,

        /// Corner radius in pixels
        #[arg(long)]
        radius: Option<u32>,
    },
    /// Print image metadata (frames, delays, disposal for GIFs)
    Inspect {
        /// Input image
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a synthesized placeholder image
    Placeholder {
        /// Which placeholder to generate
        #[arg(value_enum)]
        kind: PlaceholderKind,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PlaceholderKind {
    /// 256×256 neutral gray JPEG
    Avatar,
    /// 3×1 transparent PNG
    Banner,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Transform {
            input,
            output,
            size,
            radius,
        } => {
            let source = std::fs::read(&input)?;
            let opts = TransformOptions::new(size.map(Dimensions::square), radius);
            let engine = Engine::new();
            let result = engine.transform(&source, &opts)?;
            std::fs::write(&output, &result.data)?;
            println!(
                "{} → {} ({}, {} bytes)",
                input.display(),
                output.display(),
                result.content_type,
                result.data.len()
            );
        }
        Command::Inspect { input, json } => {
            let source = std::fs::read(&input)?;
            print_inspection(&source, json)?;
        }
        Command::Placeholder { kind, output } => {
            let encoded = match kind {
                PlaceholderKind::Avatar => placeholder::fallback_avatar()?,
                PlaceholderKind::Banner => placeholder::fallback_banner()?,
            };
            std::fs::write(&output, &encoded.data)?;
            println!(
                "{} ({}, {} bytes)",
                output.display(),
                encoded.content_type,
                encoded.data.len()
            );
        }
    }

    Ok(())
}

/// Print animation metadata for GIFs; for static images, dimensions only.
fn print_inspection(source: &[u8], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match animated::decode_animation(source) {
        Ok(animation) => {
            let info = animation.describe();
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{}×{}, {} frames, loop {:?}",
                    info.width, info.height, info.frame_count, info.loop_count
                );
                for (index, frame) in info.frames.iter().enumerate() {
                    println!(
                        "  {:3}: {}×{} at ({},{}), {} cs, disposal {:?}",
                        index,
                        frame.width,
                        frame.height,
                        frame.left,
                        frame.top,
                        frame.delay_cs,
                        frame.disposal
                    );
                }
            }
        }
        Err(_) => {
            let raster = roundel::raster::decode(source)?;
            println!(
                "{}×{} static image ({})",
                raster.image.width(),
                raster.image.height(),
                raster.format.content_type()
            );
        }
    }
    Ok(())
}
