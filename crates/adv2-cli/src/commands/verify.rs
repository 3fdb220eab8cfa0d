use std::path::PathBuf;

use adv2_core::config::ReaderConfig;
use adv2_core::stream::StreamId;
use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use super::{open_session, StreamArg};

#[derive(Args)]
pub struct VerifyArgs {
    /// Input ADV file
    pub file: PathBuf,

    /// Stream to verify
    #[arg(long, value_enum, default_value = "main")]
    pub stream: StreamArg,
}

pub fn run(args: &VerifyArgs, config: &ReaderConfig) -> Result<()> {
    let mut session = open_session(&args.file, config)?;
    let stream = StreamId::from(args.stream);
    let total = session.frame_count(stream)?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message(format!("Decoding {} frames", stream));

    // Frames decode independently; collect keeps failures in frame order.
    let failures: Vec<_> = (0..total)
        .into_par_iter()
        .filter_map(|i| {
            let result = session.get_frame(stream, i as i64);
            pb.inc(1);
            result.err().map(|e| (i, e))
        })
        .collect();
    pb.finish_with_message("Verification done");

    for (index, err) in &failures {
        println!("{:>8}  {:#010x}  {}", index, err.code(), err);
    }
    println!(
        "\n{} of {} {} frames decoded cleanly",
        total as usize - failures.len(),
        total,
        stream
    );

    session.close()?;
    if !failures.is_empty() {
        bail!("{} frame(s) failed verification", failures.len());
    }
    Ok(())
}
