use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt::{self, Write as _};
use std::io::Read;
use tracing::{trace, warn};

use crate::consts::*;
use crate::errors::{truncated, within, Error, Field, PartialTracks};
use crate::pascal::{parse_pascal_string, PascalString};

/// One instrument's row in a pattern: an id, a name and a bar of 16 steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    id: u32,
    name: PascalString,
    steps: [u8; STEPS_PER_BAR],
}

/// How the track stream treats a byte budget that does not end on a track
/// boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BudgetMode {
    /// Keep reading tracks while fewer bytes than the budget have been
    /// consumed. The final track may run past the budget.
    #[default]
    Lenient,

    /// Fail with [`Error::BudgetMismatch`] unless the tracks fill the budget
    /// exactly.
    Exact,
}

impl Track {
    pub fn new(id: u32, name: PascalString, steps: [u8; STEPS_PER_BAR]) -> Track {
        Track { id, name, steps }
    }

    /// Instrument id. Not unique, not ordered.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &PascalString {
        &self.name
    }

    /// One bar of sixteenth notes; zero is off, anything else is on.
    pub fn steps(&self) -> &[u8; STEPS_PER_BAR] {
        &self.steps
    }

    pub fn is_step_on(&self, index: usize) -> bool {
        self.steps.get(index).is_some_and(|&step| step != 0)
    }

    /// Indices of the steps that are on.
    pub fn active_steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(|&(_, &step)| step != 0)
            .map(|(index, _)| index)
    }

    /// Bytes this track occupied in the pattern file.
    pub fn byte_size(&self) -> u64 {
        (TRACK_ID_SIZE + STEPS_PER_BAR) as u64 + self.name.byte_size()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}) {}\t|", self.id, self.name)?;
        for beat in self.steps.chunks(STEPS_PER_BEAT) {
            for &step in beat {
                f.write_char(if step == 0 { '-' } else { 'x' })?;
            }
            f.write_char('|')?;
        }

        Ok(())
    }
}

/// Read a single track record.
pub fn parse_track<R: Read>(reader: &mut R) -> Result<Track, Error> {
    let id = reader
        .read_u32::<LittleEndian>()
        .map_err(truncated(Field::TrackId))?;

    let name = parse_pascal_string(reader).map_err(within(Field::TrackName))?;

    let mut steps = [0; STEPS_PER_BAR];
    reader
        .read_exact(&mut steps)
        .map_err(truncated(Field::TrackSteps))?;

    Ok(Track { id, name, steps })
}

/// Read tracks until at least `budget` bytes of track data are consumed.
///
/// The format has no track count, so the budget is the only terminator. A
/// stream that runs dry before the budget is met fails on the next read
/// instead of looping. On failure the tracks read so far are returned with
/// the error.
pub fn parse_tracks<R: Read>(
    reader: &mut R,
    budget: u64,
    mode: BudgetMode,
) -> Result<Vec<Track>, PartialTracks> {
    let mut tracks = Vec::new();
    let mut consumed = 0;

    while consumed < budget {
        let track = match parse_track(reader) {
            Ok(track) => track,
            Err(error) => {
                return Err(PartialTracks {
                    tracks,
                    error: within(Field::TrackData)(error),
                })
            }
        };

        consumed += track.byte_size();
        trace!(
            index = tracks.len(),
            id = track.id,
            size = track.byte_size(),
            consumed,
            budget,
            "Parsed track"
        );
        tracks.push(track);
    }

    if consumed != budget {
        match mode {
            BudgetMode::Lenient => {
                warn!(consumed, budget, "Track data overran its byte budget");
            }
            BudgetMode::Exact => {
                return Err(PartialTracks {
                    tracks,
                    error: Error::BudgetMismatch { budget, consumed },
                });
            }
        }
    }

    Ok(tracks)
}
