pub mod config;
pub mod export;
pub mod frames;
pub mod info;
pub mod verify;

use std::path::Path;

use adv2_core::config::ReaderConfig;
use adv2_core::session::AdvSession;
use adv2_core::stream::StreamId;
use anyhow::{Context, Result};
use clap::ValueEnum;

#[derive(Clone, Copy, ValueEnum)]
pub enum StreamArg {
    Main,
    Calibration,
}

impl From<StreamArg> for StreamId {
    fn from(arg: StreamArg) -> Self {
        match arg {
            StreamArg::Main => StreamId::Main,
            StreamArg::Calibration => StreamId::Calibration,
        }
    }
}

/// Open `path` with the given configuration.
pub fn open_session(path: &Path, config: &ReaderConfig) -> Result<AdvSession> {
    let mut session = AdvSession::new(config.clone());
    session
        .open(path)
        .with_context(|| format!("There was an error opening {}", path.display()))?;
    Ok(session)
}
