//! Error types for decoding pattern files.

use std::{fmt, io};
use thiserror::Error;

use crate::consts::{HEADER_METADATA_SIZE, MAX_NAME_LENGTH, SIGNATURE_LENGTH};
use crate::track::Track;

/// Possible errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input ended before `field` could be read in full.
    #[error("Truncated input while reading {field}")]
    TruncatedInput {
        field: Field,
        #[source]
        source: Cause,
    },

    #[error(
        "Signature mismatch: expected \"SPLICE\", found {:?}",
        String::from_utf8_lossy(.found)
    )]
    SignatureMismatch { found: [u8; SIGNATURE_LENGTH] },

    #[error(
        "Content length {content_length} is smaller than the {} byte header metadata",
        HEADER_METADATA_SIZE
    )]
    SizeUnderflow { content_length: u64 },

    /// Only raised with [`BudgetMode::Exact`](crate::BudgetMode::Exact).
    #[error("Track data ended after {consumed} bytes, expected exactly {budget}")]
    BudgetMismatch { budget: u64, consumed: u64 },

    #[error("Name is {length} bytes long, at most {} fit in a pascal string", MAX_NAME_LENGTH)]
    NameTooLong { length: usize },

    /// The track stream failed; carries the tracks decoded before the failure.
    #[error(transparent)]
    Tracks(Box<PartialTracks>),

    #[error("I/O error")]
    Io(#[from] io::Error),
}

/// The underlying reason for a [`Error::TruncatedInput`].
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Io(io::Error),

    #[error(transparent)]
    Nested(Box<Error>),
}

/// Names the field being read when decoding failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    HeaderSignature,
    HeaderContentLength,
    HeaderVersion,
    HeaderTempo,
    PascalStringLength,
    PascalStringText,
    TrackId,
    TrackName,
    TrackSteps,
    TrackData,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::HeaderSignature => "header signature",
            Field::HeaderContentLength => "header content length",
            Field::HeaderVersion => "header version",
            Field::HeaderTempo => "header tempo",
            Field::PascalStringLength => "pascal string length",
            Field::PascalStringText => "pascal string text",
            Field::TrackId => "track id",
            Field::TrackName => "track name",
            Field::TrackSteps => "track steps",
            Field::TrackData => "track data",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Error {
    /// The field named by the outermost truncation error, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Error::TruncatedInput { field, .. } => Some(*field),
            Error::Tracks(partial) => partial.error.field(),
            _ => None,
        }
    }

    /// The innermost field in a chain of truncation errors.
    ///
    /// A track that fails on its steps reports `TrackData` from [`Error::field`]
    /// but `TrackSteps` here.
    pub fn root_field(&self) -> Option<Field> {
        match self {
            Error::TruncatedInput {
                field,
                source: Cause::Nested(inner),
            } => inner.root_field().or(Some(*field)),
            Error::TruncatedInput { field, .. } => Some(*field),
            Error::Tracks(partial) => partial.error.root_field(),
            _ => None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.field().is_some()
    }

    /// Tracks decoded before the track stream failed.
    pub fn partial_tracks(&self) -> Option<&[Track]> {
        match self {
            Error::Tracks(partial) => Some(&partial.tracks),
            _ => None,
        }
    }
}

/// Failure of the track stream parser.
///
/// Unlike every other stage, a failing track stream still hands back the
/// tracks it decoded before the failure.
#[derive(Debug)]
pub struct PartialTracks {
    pub tracks: Vec<Track>,
    pub error: Error,
}

impl fmt::Display for PartialTracks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for PartialTracks {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl From<PartialTracks> for Error {
    fn from(partial: PartialTracks) -> Self {
        Error::Tracks(Box::new(partial))
    }
}

/// Maps a failed read of `field` to an error.
///
/// Running out of bytes is a truncation; any other I/O failure passes through.
pub(crate) fn truncated(field: Field) -> impl FnOnce(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput {
                field,
                source: Cause::Io(e),
            }
        } else {
            Error::Io(e)
        }
    }
}

/// Wraps a truncation from a sub-parser so it names the enclosing `field`.
pub(crate) fn within(field: Field) -> impl FnOnce(Error) -> Error {
    move |e| match e {
        Error::TruncatedInput { .. } => Error::TruncatedInput {
            field,
            source: Cause::Nested(Box::new(e)),
        },
        e => e,
    }
}
