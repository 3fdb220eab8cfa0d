use std::path::PathBuf;

use adv2_core::config::ReaderConfig;
use anyhow::Result;
use clap::Args;

use super::open_session;
use crate::summary::print_file_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Input ADV file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs, config: &ReaderConfig) -> Result<()> {
    let mut session = open_session(&args.file, config)?;
    print_file_summary(&session)?;
    session.close()?;
    Ok(())
}
