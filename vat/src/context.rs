//! Position context within a transcript.
//!
//! Classification works on the reading axis (see `mapper::Orientation`): exons and the coding
//! region are given in 5' to 3' order, so exon and intron numbers follow the transcript's
//! reading direction on both strands.
use std::fmt;

use crate::Coord;
use crate::mapper::{locate, spliced_offset, Location, MappingError};


/// Part of an exon relative to the coding region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Utr5,
    Cds,
    Utr3,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Region::Utr5 => f.write_str("5'-UTR"),
            Region::Cds => f.write_str("CDS"),
            Region::Utr3 => f.write_str("3'-UTR"),
        }
    }
}

/// Numbered transcript segment a position lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// 1-based exon number and total number of exons.
    Exon(usize, usize),
    /// 1-based intron number and total number of introns.
    Intron(usize, usize),
    /// Outside of all transcripts.
    Intergenic,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Exon(num, total) => write!(f, "Exon({}/{})", num, total),
            Segment::Intron(num, total) => write!(f, "Intron({}/{})", num, total),
            Segment::Intergenic => f.write_str("Intergenic"),
        }
    }
}

/// Coding DNA coordinate, e.g. `c.41`, `c.-12`, `c.*3`, or `c.88+2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxCoord {
    /// Region of the exonic anchor base.
    pub region: Region,
    /// Distance of the anchor base from the coding region, always at least 1.
    pub pos: u64,
    /// Signed distance from the anchor base into the intron; zero for exonic positions.
    pub offset: i64,
}

impl TxCoord {

    /// Zero-based index of the position within the coding sequence, if it lies there.
    pub fn cds_index(&self) -> Option<u64> {
        match (self.region, self.offset) {
            (Region::Cds, 0) => Some(self.pos - 1),
            _ => None,
        }
    }

    fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

impl fmt::Display for TxCoord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.region {
            Region::Utr5 => write!(f, "c.-{}", self.pos)?,
            Region::Cds => write!(f, "c.{}", self.pos)?,
            Region::Utr3 => write!(f, "c.*{}", self.pos)?,
        }
        if self.offset != 0 {
            write!(f, "{:+}", self.offset)?;
        }
        Ok(())
    }
}

/// Classification of a transcript position.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub segment: Segment,
    /// Coding coordinate; `None` for transcripts without a coding region.
    pub coord: Option<TxCoord>,
}

impl Context {

    pub fn is_exonic(&self) -> bool {
        match self.segment {
            Segment::Exon(..) => true,
            _ => false,
        }
    }

    /// Region of an exonic position. Intronic positions have none.
    pub fn region(&self) -> Option<Region> {
        match self.coord {
            Some(coord) if coord.offset == 0 && self.is_exonic() => Some(coord.region),
            _ => None,
        }
    }
}

/// Classifies a position on the reading axis.
///
/// `exons` and `coding` are reading-axis coordinates; `coding` must be non-empty when given.
/// Intronic positions are anchored to the nearest exonic base. When the position is
/// equidistant from both flanking exons, the upstream exon is used.
pub fn classify(exons: &[Coord<u64>], coding: Option<Coord<u64>>, pos: u64)
    -> Result<Context, MappingError>
{
    let num_exons = exons.len();
    match locate(exons, pos)? {
        Location::Exon(idx) => {
            let coord = coding.map(|cds| exonic_coord(exons, cds, pos)).transpose()?;
            Ok(Context { segment: Segment::Exon(idx + 1, num_exons), coord })
        },
        Location::Intron(idx) => {
            let upstream = exons[idx - 1].1 - 1;
            let downstream = exons[idx].0;
            let (anchor, offset) =
                if downstream - pos < pos - upstream {
                    (downstream, -((downstream - pos) as i64))
                } else {
                    (upstream, (pos - upstream) as i64)
                };
            let coord = coding
                .map(|cds| exonic_coord(exons, cds, anchor).map(|c| c.with_offset(offset)))
                .transpose()?;
            Ok(Context { segment: Segment::Intron(idx, num_exons - 1), coord })
        },
    }
}

/// Coding coordinate of an exonic base.
///
/// UTR distances count exonic bases only.
fn exonic_coord(exons: &[Coord<u64>], coding: Coord<u64>, pos: u64)
    -> Result<TxCoord, MappingError>
{
    let offset = spliced_offset(exons, pos)?;
    let cds_first = spliced_offset(exons, coding.0)?;
    let cds_last = spliced_offset(exons, coding.1 - 1)?;
    let (region, dist) =
        if pos < coding.0 {
            (Region::Utr5, cds_first - offset)
        } else if pos >= coding.1 {
            (Region::Utr3, offset - cds_last)
        } else {
            (Region::Cds, offset - cds_first + 1)
        };
    Ok(TxCoord { region, pos: dist, offset: 0 })
}

#[cfg(test)]
mod test_context {
    use super::*;

    const EXONS: [Coord<u64>; 3] = [(0, 10), (20, 30), (40, 50)];

    fn coord_str(coding: Coord<u64>, pos: u64) -> String {
        classify(&EXONS, Some(coding), pos).unwrap().coord.unwrap().to_string()
    }

    #[test]
    fn exonic_coords() {
        let cds = (5, 45);
        assert_eq!(coord_str(cds, 2), "c.-3");
        assert_eq!(coord_str(cds, 4), "c.-1");
        assert_eq!(coord_str(cds, 5), "c.1");
        assert_eq!(coord_str(cds, 9), "c.5");
        assert_eq!(coord_str(cds, 20), "c.6");
        assert_eq!(coord_str(cds, 44), "c.20");
        assert_eq!(coord_str(cds, 45), "c.*1");
        assert_eq!(coord_str(cds, 49), "c.*5");
    }

    #[test]
    fn utr_distance_skips_introns() {
        let cds = (25, 42);
        assert_eq!(coord_str(cds, 9), "c.-6");
        assert_eq!(coord_str(cds, 24), "c.-1");
        assert_eq!(coord_str(cds, 42), "c.*1");
        assert_eq!(coord_str(cds, 45), "c.*4");
    }

    #[test]
    fn intronic_coords() {
        let cds = (5, 45);
        assert_eq!(coord_str(cds, 12), "c.5+3");
        assert_eq!(coord_str(cds, 17), "c.6-3");
        assert_eq!(coord_str(cds, 10), "c.5+1");
        assert_eq!(coord_str(cds, 19), "c.6-1");
    }

    #[test]
    fn intronic_tie_goes_upstream() {
        let exons = [(0, 10), (19, 30)];
        let ctx = classify(&exons, Some((0, 30)), 14).unwrap();
        assert_eq!(ctx.coord.unwrap().to_string(), "c.10+5");
        let ctx = classify(&exons, Some((0, 30)), 15).unwrap();
        assert_eq!(ctx.coord.unwrap().to_string(), "c.11-4");
    }

    #[test]
    fn intronic_anchor_region() {
        // intron right before the first coding base
        assert_eq!(coord_str((20, 45), 17), "c.1-3");
        assert_eq!(coord_str((20, 45), 12), "c.-1+3");
        // intron right after the last coding base
        assert_eq!(coord_str((5, 30), 32), "c.15+3");
        assert_eq!(coord_str((5, 30), 38), "c.*1-2");
    }

    #[test]
    fn segments() {
        let cds = Some((5, 45));
        let ctx = classify(&EXONS, cds, 0).unwrap();
        assert_eq!(ctx.segment, Segment::Exon(1, 3));
        assert!(ctx.is_exonic());
        assert_eq!(ctx.region(), Some(Region::Utr5));

        let ctx = classify(&EXONS, cds, 35).unwrap();
        assert_eq!(ctx.segment, Segment::Intron(2, 2));
        assert!(!ctx.is_exonic());
        assert_eq!(ctx.region(), None);

        let ctx = classify(&EXONS, cds, 25).unwrap();
        assert_eq!(ctx.segment, Segment::Exon(2, 3));
        assert_eq!(ctx.region(), Some(Region::Cds));
        assert_eq!(ctx.segment.to_string(), "Exon(2/3)");
        assert_eq!(Segment::Intron(2, 2).to_string(), "Intron(2/2)");
        assert_eq!(Segment::Intergenic.to_string(), "Intergenic");
    }

    #[test]
    fn without_coding_region() {
        let ctx = classify(&EXONS, None, 12).unwrap();
        assert_eq!(ctx.segment, Segment::Intron(1, 2));
        assert_eq!(ctx.coord, None);
        assert_eq!(ctx.region(), None);
    }

    #[test]
    fn cds_index() {
        let ctx = classify(&EXONS, Some((5, 45)), 20).unwrap();
        assert_eq!(ctx.coord.and_then(|c| c.cds_index()), Some(5));
        let ctx = classify(&EXONS, Some((5, 45)), 12).unwrap();
        assert_eq!(ctx.coord.and_then(|c| c.cds_index()), None);
        let ctx = classify(&EXONS, Some((5, 45)), 2).unwrap();
        assert_eq!(ctx.coord.and_then(|c| c.cds_index()), None);
    }

    #[test]
    fn out_of_range() {
        assert_eq!(classify(&EXONS, None, 50),
                   Err(MappingError::PositionOutOfRange(50, 0, 50)));
        assert_eq!(classify(&[(3, 10)], None, 0),
                   Err(MappingError::PositionOutOfRange(0, 3, 10)));
    }

    #[test]
    fn region_display() {
        assert_eq!(Region::Utr5.to_string(), "5'-UTR");
        assert_eq!(Region::Utr3.to_string(), "3'-UTR");
        assert_eq!(Region::Cds.to_string(), "CDS");
    }
}
