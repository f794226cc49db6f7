/// Magic bytes at the start of every pattern file.
pub const SIGNATURE: &[u8; SIGNATURE_LENGTH] = b"SPLICE";

pub const SIGNATURE_LENGTH: usize = 6;
pub const CONTENT_LENGTH_SIZE: usize = 8;
pub const VERSION_LENGTH: usize = 32;
pub const TEMPO_SIZE: usize = 4;
pub const HEADER_LENGTH: usize =
    SIGNATURE_LENGTH + CONTENT_LENGTH_SIZE + VERSION_LENGTH + TEMPO_SIZE;

/// Bytes counted by the header's content length that are not track data.
pub const HEADER_METADATA_SIZE: u64 = 40;

pub const TRACK_ID_SIZE: usize = 4;
pub const PASCAL_STRING_PREFIX_SIZE: usize = 1;
pub const MAX_NAME_LENGTH: usize = u8::MAX as usize;

pub const STEPS_PER_BAR: usize = 16;
pub const STEPS_PER_BEAT: usize = 4;
