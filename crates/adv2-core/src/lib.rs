pub mod config;
pub mod consts;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod frame;
pub mod header;
pub mod index;
pub mod io;
pub mod session;
pub mod stream;
pub mod tags;
pub mod timestamp;

pub use config::{ChecksumPolicy, ReaderConfig};
pub use error::{AdvError, Result};
pub use frame::{Frame, FrameInfo, PixelBuffer};
pub use header::FileInfo;
pub use session::AdvSession;
pub use stream::StreamId;
pub use tags::TagDictionary;
