use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, info};

use crate::config::ReaderConfig;
use crate::cursor::BinaryCursor;
use crate::decode::FrameDecoder;
use crate::error::{AdvError, Result};
use crate::frame::Frame;
use crate::header::{parse_header, FileHeader, FileInfo};
use crate::index::FrameIndex;
use crate::stream::{ImageLayoutDefinition, StreamDefinition, StreamDefinitionTable, StreamId};
use crate::tags::TagDictionary;

/// Everything built at open time. Dropping it releases the mapping.
struct OpenFile {
    path: PathBuf,
    mmap: Mmap,
    header: FileHeader,
    definitions: StreamDefinitionTable,
    main_index: FrameIndex,
    calibration_index: Option<FrameIndex>,
    decoder: FrameDecoder,
}

impl OpenFile {
    fn load(path: &Path, config: &ReaderConfig) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        if size < 4 {
            return Err(AdvError::NotAnAdvFile(format!(
                "file too small for the ADV signature ({size} bytes)"
            )));
        }
        let mmap = unsafe { Mmap::map(&file)? };
        drop(file);

        let (header, definitions, main_index, calibration_index) = {
            let mut cursor = BinaryCursor::new(&mmap);
            let header = parse_header(&mut cursor)?;
            let info = &header.info;
            let definitions = StreamDefinitionTable::read(&mut cursor, info)?;

            let sections = info.sections;
            if cursor.position() > sections.frame_index {
                return Err(AdvError::CorruptStructure {
                    offset: sections.frame_index,
                    reason: format!(
                        "frame index offset overlaps the stream definitions (end at {})",
                        cursor.position()
                    ),
                });
            }
            cursor.seek(sections.frame_index)?;

            let data_section = sections.frame_data..info.file_size;
            let main_index = FrameIndex::build(
                &mut cursor,
                StreamId::Main,
                definitions.main.frame_count,
                definitions.main.has_checksums,
                data_section.clone(),
            )?;
            let calibration_index = match &definitions.calibration {
                Some(calibration) => Some(FrameIndex::build(
                    &mut cursor,
                    StreamId::Calibration,
                    calibration.frame_count,
                    calibration.has_checksums,
                    data_section,
                )?),
                None => None,
            };

            if cursor.position() > sections.frame_data {
                return Err(AdvError::CorruptStructure {
                    offset: sections.frame_data,
                    reason: format!(
                        "frame index section (ends at {}) overlaps the frame data",
                        cursor.position()
                    ),
                });
            }

            (header, definitions, main_index, calibration_index)
        };

        let decoder = FrameDecoder::new(header.info.width, header.info.height, config);
        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            header,
            definitions,
            main_index,
            calibration_index,
            decoder,
        })
    }

    fn index(&self, stream: StreamId) -> Option<&FrameIndex> {
        match stream {
            StreamId::Main => Some(&self.main_index),
            StreamId::Calibration => self.calibration_index.as_ref(),
        }
    }
}

enum SessionState {
    Closed,
    Open(Box<OpenFile>),
}

/// A reader over one ADV2 file at a time.
///
/// Starts closed. `open` maps the file read-only, parses the header, stream
/// and layout definitions and builds the frame indexes; afterwards frames
/// can be decoded in any order. Sessions share no state, so any number of
/// files can be open at once through separate sessions.
pub struct AdvSession {
    config: ReaderConfig,
    state: SessionState,
}

impl Default for AdvSession {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

impl AdvSession {
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            state: SessionState::Closed,
        }
    }

    /// Create a session with the default configuration and open `path`.
    pub fn open_path(path: &Path) -> Result<Self> {
        let mut session = Self::default();
        session.open(path)?;
        Ok(session)
    }

    pub fn open(&mut self, path: &Path) -> Result<()> {
        if let SessionState::Open(file) = &self.state {
            return Err(AdvError::InvalidState(format!(
                "session already has {} open",
                file.path.display()
            )));
        }

        let file = OpenFile::load(path, &self.config)?;
        let fi = &file.header.info;
        info!(
            path = %path.display(),
            width = fi.width,
            height = fi.height,
            main_frames = fi.count_main_frames,
            calibration_frames = fi.count_calibration_frames,
            "ADV2 file opened"
        );
        self.state = SessionState::Open(Box::new(file));
        Ok(())
    }

    /// Release the file. Closing a closed session is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Open(file) => {
                info!(path = %file.path.display(), "ADV2 file closed");
            }
            SessionState::Closed => {
                debug!("close on a closed session ignored");
            }
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn opened(&self) -> Result<&OpenFile> {
        match &self.state {
            SessionState::Open(file) => Ok(file),
            SessionState::Closed => Err(AdvError::InvalidState("no file is open".into())),
        }
    }

    pub fn path(&self) -> Result<&Path> {
        Ok(&self.opened()?.path)
    }

    pub fn file_info(&self) -> Result<&FileInfo> {
        Ok(&self.opened()?.header.info)
    }

    pub fn system_metadata(&self) -> Result<&TagDictionary> {
        Ok(&self.opened()?.header.system_metadata)
    }

    pub fn user_metadata(&self) -> Result<&TagDictionary> {
        Ok(&self.opened()?.header.user_metadata)
    }

    /// The stream definition, or `None` when the file has no such stream.
    pub fn stream(&self, stream: StreamId) -> Result<Option<&StreamDefinition>> {
        Ok(self.opened()?.definitions.stream(stream))
    }

    pub fn image_layouts(&self) -> Result<&[ImageLayoutDefinition]> {
        Ok(self.opened()?.definitions.layouts())
    }

    pub fn frame_index(&self, stream: StreamId) -> Result<Option<&FrameIndex>> {
        Ok(self.opened()?.index(stream))
    }

    /// Number of frames in `stream`; 0 for a stream the file does not carry.
    pub fn frame_count(&self, stream: StreamId) -> Result<u32> {
        Ok(self
            .opened()?
            .definitions
            .stream(stream)
            .map_or(0, |s| s.frame_count))
    }

    /// (width, height) in pixels.
    pub fn image_dimensions(&self) -> Result<(u32, u32)> {
        let info = self.file_info()?;
        Ok((info.width, info.height))
    }

    /// Decode one frame. Errors from a single frame leave the session usable.
    pub fn get_frame(&self, stream: StreamId, frame_number: i64) -> Result<Frame> {
        let file = self.opened()?;
        let index = file
            .index(stream)
            .ok_or(AdvError::FrameNumberOutOfRange {
                stream,
                frame: frame_number,
                total: 0,
            })?;
        let entry = index.entry_for(frame_number)?;

        let mut cursor = BinaryCursor::new(&file.mmap);
        file.decoder.decode(
            &mut cursor,
            stream,
            frame_number as u32,
            entry,
            &file.definitions,
        )
    }

    /// Iterate every frame of `stream` in order.
    pub fn frames(&self, stream: StreamId) -> Result<impl Iterator<Item = Result<Frame>> + '_> {
        let count = self.frame_count(stream)?;
        Ok((0..count).map(move |i| self.get_frame(stream, i as i64)))
    }
}
