//! Mapping between transcript positions and spliced (mature transcript) offsets.
//!
//! All functions here take exon coordinates relative to the transcript start, sorted ascending
//! and non-overlapping. Strand handling is done by [`Orientation`]: a reverse-strand transcript
//! is mirrored onto a reading axis on which its 5' end comes first, so every computation is
//! written once, for the ascending direction.
//!
//! [`Orientation`]: trait.Orientation.html
use std::cmp::{max, min};

use crate::{Coord, Strand};
use crate::codon::complement;


quick_error! {
    /// Errors that occur when mapping positions onto exons.
    #[derive(Debug, PartialEq)]
    pub enum MappingError {
        /// Occurs when the transcript has no exons.
        NoExons {
            display("transcript has no exons")
        }
        /// Occurs when a position lies before the first exon or after the last exon.
        PositionOutOfRange(pos: u64, first: u64, last: u64) {
            display("position {} lies outside the exons spanning [{}, {})", pos, first, last)
        }
        /// Occurs when a position expected to be exonic lies in an intron.
        IntronicPosition(pos: u64) {
            display("position {} lies in an intron", pos)
        }
        /// Occurs when a flanking base would lie beyond the first or last exon.
        FlankOutOfRange(pos: u64) {
            display("flanking base of position {} lies outside the exons", pos)
        }
    }
}

type MapResult<T> = ::std::result::Result<T, MappingError>;

/// Where a position lies relative to a set of exons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// Inside the exon with the given index.
    Exon(usize),
    /// In the intron preceding the exon with the given index (always at least 1).
    Intron(usize),
}

/// Finds the exon or intron that contains the given position.
pub fn locate(exons: &[Coord<u64>], pos: u64) -> MapResult<Location> {
    let (first, last) = match (exons.first(), exons.last()) {
        (Some(f), Some(l)) => (f.0, l.1),
        _ => return Err(MappingError::NoExons),
    };
    if pos < first || pos >= last {
        return Err(MappingError::PositionOutOfRange(pos, first, last));
    }
    // the first exon that ends past the position always exists given the bounds check
    let idx = exons.iter().position(|&(_, end)| pos < end)
        .ok_or(MappingError::PositionOutOfRange(pos, first, last))?;
    if pos >= exons[idx].0 {
        Ok(Location::Exon(idx))
    } else {
        Ok(Location::Intron(idx))
    }
}

/// Number of exonic bases preceding the given exonic position.
///
/// This is the zero-based offset of the position on the mature transcript.
pub fn spliced_offset(exons: &[Coord<u64>], pos: u64) -> MapResult<u64> {
    let mut count = 0;
    for &(start, end) in exons {
        if pos < start {
            return match count {
                0 => Err(MappingError::PositionOutOfRange(pos, start, exons[exons.len() - 1].1)),
                _ => Err(MappingError::IntronicPosition(pos)),
            };
        }
        if pos < end {
            return Ok(count + (pos - start));
        }
        count += end - start;
    }
    match (exons.first(), exons.last()) {
        (Some(first), Some(last)) => Err(MappingError::PositionOutOfRange(pos, first.0, last.1)),
        _ => Err(MappingError::NoExons),
    }
}

/// Total number of exonic bases.
pub fn spliced_len(exons: &[Coord<u64>]) -> u64 {
    exons.iter().map(|&(s, e)| e - s).sum()
}

/// Direction of a single-base step along the exons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Towards lower coordinates.
    Upstream,
    /// Towards higher coordinates.
    Downstream,
}

/// The exonic position adjacent to the given exonic position.
///
/// Steps that leave the containing exon continue at the nearest base of the neighboring exon,
/// so intronic bases are never returned.
pub fn flank(exons: &[Coord<u64>], pos: u64, step: Step) -> MapResult<u64> {
    let idx = match locate(exons, pos)? {
        Location::Exon(idx) => idx,
        Location::Intron(_) => return Err(MappingError::IntronicPosition(pos)),
    };
    let (start, end) = exons[idx];
    match step {
        Step::Downstream if pos + 1 < end => Ok(pos + 1),
        Step::Downstream => exons.get(idx + 1)
            .map(|next| next.0)
            .ok_or(MappingError::FlankOutOfRange(pos)),
        Step::Upstream if pos > start => Ok(pos - 1),
        Step::Upstream if idx > 0 => Ok(exons[idx - 1].1 - 1),
        Step::Upstream => Err(MappingError::FlankOutOfRange(pos)),
    }
}

/// Positions of the three bases of the codon containing `pos`.
///
/// `frame` is the position of `pos` within its codon (0, 1, or 2). The returned positions are
/// in ascending order and may span exon boundaries.
pub fn codon_positions(exons: &[Coord<u64>], pos: u64, frame: u8) -> MapResult<[u64; 3]> {
    let mut codon = [pos; 3];
    let frame = usize::from(frame % 3);
    for i in (0..frame).rev() {
        codon[i] = flank(exons, codon[i + 1], Step::Upstream)?;
    }
    for i in (frame + 1)..3 {
        codon[i] = flank(exons, codon[i - 1], Step::Downstream)?;
    }
    Ok(codon)
}

/// Reading direction of a transcript.
///
/// Implementors map transcript-relative coordinates onto a reading axis that runs from the
/// transcript's 5' end to its 3' end. The mapping is its own inverse.
pub trait Orientation {

    /// Strand read in this orientation.
    const STRAND: Strand;

    /// Maps a boundary between two bases of a transcript spanning `span` bases.
    fn flip_boundary(span: u64, boundary: u64) -> u64;

    /// A genomic base as read in this orientation.
    fn orient_base(base: u8) -> u8;

    /// Maps the position of a single base.
    fn flip_pos(span: u64, pos: u64) -> u64 {
        min(Self::flip_boundary(span, pos), Self::flip_boundary(span, pos + 1))
    }

    /// Maps a half-open interval.
    fn flip_coord(span: u64, coord: Coord<u64>) -> Coord<u64> {
        let (a, b) = (Self::flip_boundary(span, coord.0), Self::flip_boundary(span, coord.1));
        (min(a, b), max(a, b))
    }

    /// Exon coordinates on the reading axis, sorted ascending.
    fn reading_exons(span: u64, exons: &[Coord<u64>]) -> Vec<Coord<u64>> {
        let mut flipped = exons.iter()
            .map(|&coord| Self::flip_coord(span, coord))
            .collect::<Vec<Coord<u64>>>();
        flipped.sort_unstable();
        flipped
    }
}

/// Reading direction of forward-strand transcripts.
#[derive(Debug, Clone, Copy)]
pub struct Forward;

impl Orientation for Forward {

    const STRAND: Strand = Strand::Forward;

    #[inline]
    fn flip_boundary(_span: u64, boundary: u64) -> u64 {
        boundary
    }

    #[inline]
    fn orient_base(base: u8) -> u8 {
        base
    }
}

/// Reading direction of reverse-strand transcripts.
#[derive(Debug, Clone, Copy)]
pub struct Reverse;

impl Orientation for Reverse {

    const STRAND: Strand = Strand::Reverse;

    #[inline]
    fn flip_boundary(span: u64, boundary: u64) -> u64 {
        span - boundary
    }

    #[inline]
    fn orient_base(base: u8) -> u8 {
        complement(base)
    }
}
