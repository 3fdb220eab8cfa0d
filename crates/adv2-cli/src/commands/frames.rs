use std::path::PathBuf;

use adv2_core::config::ReaderConfig;
use adv2_core::error::{resolve_error_message, S_OK};
use adv2_core::stream::StreamId;
use anyhow::Result;
use clap::Args;

use super::{open_session, StreamArg};

#[derive(Args)]
pub struct FramesArgs {
    /// Input ADV file
    pub file: PathBuf,

    /// Stream to list
    #[arg(long, value_enum, default_value = "main")]
    pub stream: StreamArg,

    /// List at most N frames
    #[arg(long)]
    pub limit: Option<u32>,
}

pub fn run(args: &FramesArgs, config: &ReaderConfig) -> Result<()> {
    let mut session = open_session(&args.file, config)?;
    let stream = StreamId::from(args.stream);
    let (width, height) = session.image_dimensions()?;
    let count = session.frame_count(stream)?;

    println!(
        "Width: {}  Height: {}  Num{}Frames: {}",
        width,
        height,
        match stream {
            StreamId::Main => "Main",
            StreamId::Calibration => "Calibration",
        },
        count
    );

    let shown = args.limit.map_or(count, |n| n.min(count));
    let mut last_shape = None;
    for index in 0..shown {
        match session.get_frame(stream, index as i64) {
            Ok(frame) => {
                let utc = frame.info.utc_mid_exposure();
                println!("\nframe: {}", index);
                println!("  UTC mid-exposure lo: {}", utc.lo);
                println!("  UTC mid-exposure hi: {}", utc.hi);
                println!(
                    "  UTC mid-exposure:    {} ns ({:.6} unix s)",
                    utc.combined(),
                    utc.to_adv_timestamp().unix_seconds()
                );
                println!("  Exposure:            {} s", frame.info.exposure);
                last_shape = Some((frame.pixels.shape(), frame.pixels.bits_per_pixel()));
            }
            Err(e) => {
                println!(
                    "\nframe: {}  error {:#010x}: {} ({})",
                    index,
                    e.code(),
                    resolve_error_message(e.code()),
                    e
                );
            }
        }
    }

    if let Some(((h, w), bpp)) = last_shape {
        println!("\nimage.shape: ({}, {})  bits per pixel: {}\n", h, w, bpp);
    }
    println!(
        "SysMetaNum: {}",
        session.file_info()?.system_metadata_tags_count
    );

    for _ in 0..2 {
        let code = match session.close() {
            Ok(()) => S_OK,
            Err(e) => e.code(),
        };
        println!("close returned: {} ({})", code, resolve_error_message(code));
    }

    Ok(())
}
