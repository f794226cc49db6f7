use arrayvec::ArrayVec;
use byteorder::ReadBytesExt;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;

use crate::consts::*;
use crate::errors::{truncated, Error, Field};

/// A length prefixed string: one length byte followed by that many bytes of text.
///
/// The text is stored as raw bytes and is not required to be valid UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PascalString {
    text: ArrayVec<u8, MAX_NAME_LENGTH>,
}

impl PascalString {
    /// Number of text bytes, as stored in the length prefix.
    pub fn len(&self) -> u8 {
        // Capacity is `u8::MAX`
        self.text.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    /// Bytes this string occupies in a pattern file, including the length prefix.
    pub fn byte_size(&self) -> u64 {
        (PASCAL_STRING_PREFIX_SIZE + self.text.len()) as u64
    }
}

impl TryFrom<&[u8]> for PascalString {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let text = ArrayVec::try_from(bytes).map_err(|_| Error::NameTooLong {
            length: bytes.len(),
        })?;

        Ok(PascalString { text })
    }
}

impl TryFrom<&str> for PascalString {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        PascalString::try_from(text.as_bytes())
    }
}

impl fmt::Display for PascalString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Read a length byte, then exactly that many bytes of text.
pub fn parse_pascal_string<R: Read>(reader: &mut R) -> Result<PascalString, Error> {
    let length = reader
        .read_u8()
        .map_err(truncated(Field::PascalStringLength))?;

    let mut buffer = [0; MAX_NAME_LENGTH];
    let buffer = &mut buffer[..usize::from(length)];
    reader
        .read_exact(buffer)
        .map_err(truncated(Field::PascalStringText))?;

    Ok(PascalString {
        text: buffer.iter().copied().collect(),
    })
}
