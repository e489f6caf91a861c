mod icon;
mod playlist;
mod transcode;

pub use icon::{Display, IconRef, MEDIA_REF_PREFIX};
pub use playlist::{
    pad2, ChannelLayout, Chapter, MediaRef, PlaylistContent, Track, TrackKind, DEFAULT_DURATION,
    DEFAULT_FILE_SIZE, DEFAULT_FORMAT,
};
pub use transcode::{IngestedFile, TranscodeDescriptor};
