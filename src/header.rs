use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use tracing::debug;

use crate::consts::*;
use crate::errors::{truncated, Error, Field};

/// The fixed-layout header at the start of every pattern file.
///
/// Layout, in order: the `SPLICE` signature, a big-endian `u64` content
/// length, a NUL padded 32 byte version string and a little-endian `f32`
/// tempo.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    signature: [u8; SIGNATURE_LENGTH],
    content_length: u64,
    version: [u8; VERSION_LENGTH],
    tempo: f32,
}

impl Header {
    /// Create a header carrying the `SPLICE` signature.
    ///
    /// `version` is NUL padded, or cut off after 32 bytes.
    pub fn new(content_length: u64, version: &[u8], tempo: f32) -> Header {
        let mut buffer = [0; VERSION_LENGTH];
        let length = version.len().min(VERSION_LENGTH);
        buffer[..length].copy_from_slice(&version[..length]);

        Header {
            signature: *SIGNATURE,
            content_length,
            version: buffer,
            tempo,
        }
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    /// Length of everything following the content length field, as declared
    /// by the file.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// The raw version buffer, including padding.
    pub fn version(&self) -> &[u8; VERSION_LENGTH] {
        &self.version
    }

    /// The version bytes up to, not including, the first NUL.
    pub fn version_bytes(&self) -> &[u8] {
        let end = self
            .version
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(VERSION_LENGTH);

        &self.version[..end]
    }

    pub fn version_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.version_bytes())
    }

    /// Beats per minute.
    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// Number of track data bytes following the header.
    pub fn content_size(&self) -> Result<u64, Error> {
        self.content_length
            .checked_sub(HEADER_METADATA_SIZE)
            .ok_or(Error::SizeUnderflow {
                content_length: self.content_length,
            })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Saved with HW Version: {}", self.version_text())?;
        write!(f, "Tempo: {}", self.tempo)
    }
}

/// Read and validate the header from the start of a pattern file.
///
/// All fields are read before the signature is checked, so a short file is
/// always reported as truncated. Headers whose content length cannot cover
/// the header metadata are rejected here.
pub fn parse_header<R: Read>(reader: &mut R) -> Result<Header, Error> {
    let mut signature = [0; SIGNATURE_LENGTH];
    reader
        .read_exact(&mut signature)
        .map_err(truncated(Field::HeaderSignature))?;

    let content_length = reader
        .read_u64::<BigEndian>()
        .map_err(truncated(Field::HeaderContentLength))?;

    let mut version = [0; VERSION_LENGTH];
    reader
        .read_exact(&mut version)
        .map_err(truncated(Field::HeaderVersion))?;

    let tempo = reader
        .read_f32::<LittleEndian>()
        .map_err(truncated(Field::HeaderTempo))?;

    if &signature != SIGNATURE {
        return Err(Error::SignatureMismatch { found: signature });
    }

    let header = Header {
        signature,
        content_length,
        version,
        tempo,
    };
    header.content_size()?;

    debug!(
        version = %header.version_text(),
        tempo,
        content_length,
        "Parsed pattern header"
    );

    Ok(header)
}
