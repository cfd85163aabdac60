//! Transcript model.
//!
//! A transcript keeps its genomic start as an absolute coordinate and stores its exons relative
//! to that start. All coordinates are zero-based, half-open.
use itertools::Itertools;

use crate::{Coord, Strand};
use crate::consts::DEF_ID;


quick_error! {
    /// Errors that occur when creating transcripts.
    #[derive(Debug)]
    pub enum ModelError {
        /// Occurs when the strand character is not one of `+` or `-`.
        InvalidStrandChar(chr: char, tid: Option<String>) {
            display("invalid strand character '{}', transcript ID: {}",
                    chr, tid.as_deref().unwrap_or(DEF_ID))
        }
        /// Occurs when the transcript has no known orientation.
        UnspecifiedStrand(tid: Option<String>) {
            display("strand not specified, transcript ID: {}", tid.as_deref().unwrap_or(DEF_ID))
        }
        InvalidInterval(start: u64, end: u64, tid: Option<String>) {
            display("transcript start {} is larger than its end {}, transcript ID: {}",
                    start, end, tid.as_deref().unwrap_or(DEF_ID))
        }
        InvalidCodingInterval(tid: Option<String>) {
            display("coding region has larger start than end coordinate or lies outside the \
                     transcript, transcript ID: {}", tid.as_deref().unwrap_or(DEF_ID))
        }
        InvalidExonInterval(start: u64, end: u64, tid: Option<String>) {
            display("exon [{}, {}) is empty or lies outside the transcript, transcript ID: {}",
                    start, end, tid.as_deref().unwrap_or(DEF_ID))
        }
        UnsortedExons(tid: Option<String>) {
            display("exons overlap or are not sorted by start coordinate, transcript ID: {}",
                    tid.as_deref().unwrap_or(DEF_ID))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    seq_name: String,
    id: String,
    gene_id: String,
    strand: Strand,
    start: u64,
    end: u64,
    coding: Coord<u64>,
    exons: Vec<Coord<u64>>,
}

impl Transcript {

    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Gene symbol of the transcript.
    pub fn gene_id(&self) -> &str {
        self.gene_id.as_str()
    }

    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Absolute genomic start coordinate.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Absolute genomic end coordinate.
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    pub fn span(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the given absolute genomic position lies within the transcript.
    #[inline]
    pub fn contains(&self, pos: u64) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Coding region coordinates relative to the transcript start.
    pub fn rel_coding_coord(&self) -> Coord<u64> {
        (self.coding.0 - self.start, self.coding.1 - self.start)
    }

    /// Whether the transcript has a coding region at all.
    pub fn is_coding(&self) -> bool {
        self.coding.0 < self.coding.1
    }

    /// Exon coordinates relative to the transcript start, sorted ascending.
    pub fn exons(&self) -> &[Coord<u64>] {
        self.exons.as_slice()
    }
}

pub struct TBuilder {
    seq_name: String,
    start: u64,
    end: u64,
    strand: Option<Strand>,
    strand_char: Option<char>,
    id: Option<String>,
    gene_id: Option<String>,
    coding_coord: Option<Coord<u64>>,
    exon_coords: Vec<Coord<u64>>,
}

impl TBuilder {

    /// Creates a builder for a transcript spanning the given absolute coordinates.
    pub fn new<T>(seq_name: T, start: u64, end: u64) -> Self
        where T: Into<String>
    {
        TBuilder {
            seq_name: seq_name.into(),
            start,
            end,
            strand: None,
            strand_char: None,
            id: None,
            gene_id: None,
            coding_coord: None,
            exon_coords: Vec::new(),
        }
    }

    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn strand_char(mut self, strand_char: char) -> Self {
        self.strand_char = Some(strand_char);
        self
    }

    pub fn id<T>(mut self, id: T) -> Self
        where T: Into<String>
    {
        self.id = Some(id.into());
        self
    }

    pub fn gene_id<T>(mut self, gene_id: T) -> Self
        where T: Into<String>
    {
        self.gene_id = Some(gene_id.into());
        self
    }

    /// Sets the absolute coding region coordinates.
    ///
    /// Transcripts without a coding region may leave this unset, or set both coordinates to the
    /// same value.
    pub fn coding_coord(mut self, start: u64, end: u64) -> Self {
        self.coding_coord = Some((start, end));
        self
    }

    /// Sets the absolute exon coordinates.
    pub fn exon_coords<E>(mut self, exon_coords: E) -> Self
        where E: IntoIterator<Item=Coord<u64>>
    {
        self.exon_coords = exon_coords.into_iter().collect();
        self
    }

    pub fn build(self) -> ::std::result::Result<Transcript, ModelError> {
        let strand = resolve_strand_input(self.strand, self.strand_char, self.id.as_deref())?;
        if self.start > self.end {
            return Err(ModelError::InvalidInterval(self.start, self.end, self.id));
        }
        let coding = match self.coding_coord {
            None => (self.end, self.end),
            Some((s, e)) if s <= e && self.start <= s && e <= self.end => (s, e),
            Some(_) => return Err(ModelError::InvalidCodingInterval(self.id)),
        };

        let mut exons = Vec::with_capacity(self.exon_coords.len());
        for (s, e) in self.exon_coords {
            if s >= e || s < self.start || e > self.end {
                return Err(ModelError::InvalidExonInterval(s, e, self.id));
            }
            exons.push((s - self.start, e - self.start));
        }
        if !exons.iter().tuple_windows().all(|(a, b)| a.1 <= b.0) {
            return Err(ModelError::UnsortedExons(self.id));
        }

        Ok(Transcript {
            seq_name: self.seq_name,
            id: self.id.unwrap_or_default(),
            gene_id: self.gene_id.unwrap_or_default(),
            strand,
            start: self.start,
            end: self.end,
            coding,
            exons,
        })
    }
}

fn resolve_strand_input(
    strand: Option<Strand>,
    strand_char: Option<char>,
    tid: Option<&str>,
) -> Result<Strand, ModelError>
{
    let owned_tid = || tid.map(|v| v.to_owned());
    let resolved = match (strand, strand_char) {
        (Some(sv), _) => sv,
        (None, Some('+')) => Strand::Forward,
        (None, Some('-')) => Strand::Reverse,
        (None, Some(chr)) => return Err(ModelError::InvalidStrandChar(chr, owned_tid())),
        (None, None) => return Err(ModelError::UnspecifiedStrand(owned_tid())),
    };
    match resolved {
        Strand::Unknown => Err(ModelError::UnspecifiedStrand(owned_tid())),
        known => Ok(known),
    }
}
