use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::errors::Error;
use crate::header::{parse_header, Header};
use crate::track::{parse_tracks, BudgetMode, Track};

/// A decoded drum pattern: the header and its tracks in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    header: Header,
    tracks: Vec<Track>,
}

/// Settings for decoding a pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub budget_mode: BudgetMode,
}

impl DecodeOptions {
    pub fn with_budget_mode(mut self, budget_mode: BudgetMode) -> Self {
        self.budget_mode = budget_mode;
        self
    }
}

impl Pattern {
    pub fn new(header: Header, tracks: Vec<Track>) -> Pattern {
        Pattern { header, tracks }
    }

    /// Decode a `Pattern` from a byte slice.
    ///
    /// ```no_run
    /// # fn main() -> Result<(), splice::Error> {
    /// let data = std::fs::read("/some/file.splice")?;
    /// let pattern = splice::Pattern::from_slice(&data)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_slice(mut slice: &[u8]) -> Result<Pattern, Error> {
        decode(&mut slice)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_parts(self) -> (Header, Vec<Track>) {
        (self.header, self.tracks)
    }

    /// Total bytes of track data, summed over every track.
    pub fn track_bytes(&self) -> u64 {
        self.tracks.iter().map(Track::byte_size).sum()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for track in &self.tracks {
            writeln!(f, "{}", track)?;
        }

        Ok(())
    }
}

/// Decode a pattern with the default [`DecodeOptions`].
pub fn decode<R: Read>(reader: &mut R) -> Result<Pattern, Error> {
    decode_with(reader, &DecodeOptions::default())
}

/// Decode a pattern: the header first, then exactly as much track data as its
/// content length leaves for tracks.
pub fn decode_with<R: Read>(reader: &mut R, options: &DecodeOptions) -> Result<Pattern, Error> {
    let header = parse_header(reader)?;
    let budget = header.content_size()?;
    let tracks = parse_tracks(reader, budget, options.budget_mode)?;

    debug!(tracks = tracks.len(), budget, "Decoded pattern");

    Ok(Pattern { header, tracks })
}

/// Open and decode the pattern file at `path` with the default options.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Pattern, Error> {
    decode_file_with(path, &DecodeOptions::default())
}

pub fn decode_file_with<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<Pattern, Error> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Opening pattern file");

    let mut reader = BufReader::new(File::open(path)?);
    decode_with(&mut reader, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::errors::Field;
    use crate::header::tests::header_bytes;
    use crate::pascal::PascalString;
    use crate::track::tests::track_bytes;

    const KICK: [u8; STEPS_PER_BAR] = [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];
    const SNARE: [u8; STEPS_PER_BAR] = [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0];

    fn pattern_bytes(tracks: &[u8], slack: i64) -> Vec<u8> {
        let content_length = (HEADER_METADATA_SIZE as i64 + tracks.len() as i64 + slack) as u64;
        let mut data = header_bytes(SIGNATURE, content_length, "0.808-alpha", 98.4);
        data.extend_from_slice(tracks);
        data
    }

    fn kick_and_snare() -> Vec<u8> {
        let mut tracks = track_bytes(0, "kick", &KICK);
        tracks.extend(track_bytes(1, "snare", &SNARE));
        tracks
    }

    #[test]
    fn decode_pattern() {
        let tracks = kick_and_snare();
        let mut data = pattern_bytes(&tracks, 0);
        data.extend_from_slice(b"trailing");
        let mut reader = &data[..];
        let pattern = decode(&mut reader).unwrap();

        assert_eq!(pattern.header().version_text(), "0.808-alpha");
        assert_eq!(pattern.tracks().len(), 2);
        assert_eq!(pattern.tracks()[0].name().to_string(), "kick");
        assert_eq!(pattern.tracks()[1].id(), 1);
        assert_eq!(pattern.track_bytes(), tracks.len() as u64);
        assert_eq!(
            pattern.track_bytes(),
            pattern.header().content_size().unwrap()
        );
        // Nothing past the declared content is read
        assert_eq!(reader, b"trailing");
    }

    #[test]
    fn display() {
        let pattern = Pattern::from_slice(&pattern_bytes(&kick_and_snare(), 0)).unwrap();

        assert_eq!(
            pattern.to_string(),
            "Saved with HW Version: 0.808-alpha\n\
             Tempo: 98.4\n\
             (0) kick\t|x---|x---|x---|x---|\n\
             (1) snare\t|----|x---|----|x---|\n"
        );
    }

    #[test]
    fn header_only() {
        let pattern = Pattern::from_slice(&pattern_bytes(&[], 0)).unwrap();

        assert!(pattern.tracks().is_empty());
        assert_eq!(
            pattern.to_string(),
            "Saved with HW Version: 0.808-alpha\nTempo: 98.4\n"
        );
    }

    #[test]
    fn short_content_length() {
        let data = pattern_bytes(&kick_and_snare(), -4);

        let pattern = Pattern::from_slice(&data).unwrap();
        assert_eq!(pattern.tracks().len(), 2);

        let options = DecodeOptions::default().with_budget_mode(BudgetMode::Exact);
        let error = decode_with(&mut data.as_slice(), &options).unwrap_err();
        assert!(matches!(
            &error,
            Error::Tracks(partial) if matches!(partial.error, Error::BudgetMismatch { .. })
        ));
        assert_eq!(error.partial_tracks().map(<[Track]>::len), Some(2));
    }

    #[test]
    fn truncated_tracks_keep_prefix() {
        let tracks = kick_and_snare();
        let mut data = pattern_bytes(&tracks, 0);
        data.truncate(data.len() - 3);
        let error = Pattern::from_slice(&data).unwrap_err();

        assert!(error.is_truncated());
        assert_eq!(error.field(), Some(Field::TrackData));
        assert_eq!(error.root_field(), Some(Field::TrackSteps));
        let partial = error.partial_tracks().unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].name().to_string(), "kick");
    }

    #[test]
    fn header_errors_carry_no_tracks() {
        let mut data = pattern_bytes(&kick_and_snare(), 0);
        data[0] = b'X';
        let error = Pattern::from_slice(&data).unwrap_err();

        assert!(matches!(error, Error::SignatureMismatch { .. }));
        assert!(error.partial_tracks().is_none());

        let data = header_bytes(SIGNATURE, 12, "0.808-alpha", 98.4);
        let error = Pattern::from_slice(&data).unwrap_err();
        assert!(matches!(error, Error::SizeUnderflow { content_length: 12 }));
    }

    #[test]
    fn huge_content_length() {
        let mut data = header_bytes(SIGNATURE, u64::MAX, "0.808-alpha", 98.4);
        data.extend(kick_and_snare());
        let error = Pattern::from_slice(&data).unwrap_err();

        assert_eq!(error.partial_tracks().map(<[Track]>::len), Some(2));
        assert_eq!(error.root_field(), Some(Field::TrackId));
    }

    #[test]
    fn into_parts() {
        let header = Header::new(61, b"0.808-alpha", 120.0);
        let track = Track::new(
            7,
            PascalString::try_from("hh-open").unwrap(),
            [0; STEPS_PER_BAR],
        );
        let pattern = Pattern::new(header.clone(), vec![track.clone()]);

        assert_eq!(pattern.into_parts(), (header, vec![track]));
    }

    #[test]
    fn missing_file() {
        let error = decode_file("/nonexistent/pattern.splice").unwrap_err();

        assert!(matches!(error, Error::Io(_)));
    }
}
