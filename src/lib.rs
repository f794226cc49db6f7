//! Decoder for `.splice` drum machine pattern files.
//!
//! A pattern file is a fixed 50 byte [`Header`] followed by a run of
//! [`Track`] records. There is no track count; the header's content length
//! decides how many bytes of tracks follow.
//!
//! ```no_run
//! # fn main() -> Result<(), splice::Error> {
//! let pattern = splice::decode_file("pattern_1.splice")?;
//! print!("{}", pattern);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all)]

mod consts;
mod errors;
mod header;
mod pascal;
mod pattern;
mod track;

pub use consts::{
    HEADER_LENGTH, HEADER_METADATA_SIZE, MAX_NAME_LENGTH, SIGNATURE, STEPS_PER_BAR,
    VERSION_LENGTH,
};
pub use errors::{Cause, Error, Field, PartialTracks};
pub use header::{parse_header, Header};
pub use pascal::{parse_pascal_string, PascalString};
pub use pattern::{decode, decode_file, decode_file_with, decode_with, DecodeOptions, Pattern};
pub use track::{parse_track, parse_tracks, BudgetMode, Track};
