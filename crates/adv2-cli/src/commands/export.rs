use std::path::PathBuf;

use adv2_core::config::ReaderConfig;
use adv2_core::io::image_io::save_image;
use adv2_core::stream::StreamId;
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::{open_session, StreamArg};

#[derive(Args)]
pub struct ExportArgs {
    /// Input ADV file
    pub file: PathBuf,

    /// Frame number to export
    pub frame: i64,

    /// Output image (.tiff/.tif or .png)
    pub output: PathBuf,

    /// Stream to read from
    #[arg(long, value_enum, default_value = "main")]
    pub stream: StreamArg,
}

pub fn run(args: &ExportArgs, config: &ReaderConfig) -> Result<()> {
    let mut session = open_session(&args.file, config)?;
    let stream = StreamId::from(args.stream);

    let frame = session
        .get_frame(stream, args.frame)
        .with_context(|| format!("Failed to decode {} frame {}", stream, args.frame))?;
    save_image(&frame.pixels, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(output = %args.output.display(), "Frame exported");
    println!(
        "Saved {} frame {} ({}x{}, {} bpp) to {}",
        stream,
        args.frame,
        frame.width(),
        frame.height(),
        frame.pixels.bits_per_pixel(),
        args.output.display()
    );
    session.close()?;
    Ok(())
}
