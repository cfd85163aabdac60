/*! Reader for the refGene format.

The refGene format is the transcript table distributed by the
[UCSC table browser](https://genome.ucsc.edu/cgi-bin/hgTables). Each transcript is denoted in a
single tab-separated line with the following columns:

0.  bin
1.  transcript identifier
2.  sequence name
3.  strand
4.  transcript start
5.  transcript end
6.  coding region start
7.  coding region end
8.  number of exons
9.  exon start coordinates (comma-separated)
10. exon end coordinates (comma-separated)
11. score
12. gene symbol
13. coding start completeness
14. coding end completeness
15. exon frames

All coordinates are zero-based, half-open. Only rows whose coding start and end are both marked
complete (`cmpl`) are read.
*/
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use csv::{self, StringRecord};
use itertools::{EitherOrBoth, Itertools};

use crate::{Coord, Error, Result, TBuilder, Transcript};
use crate::consts::{CMPL_STR, STREAM_NAME};


const COLUMN_NAMES: [&str; 16] = [
    "bin", "name", "chrom", "strand", "txStart", "txEnd", "cdsStart", "cdsEnd", "exonCount",
    "exonStarts", "exonEnds", "score", "name2", "cdsStartStat", "cdsEndStat", "exonFrames",
];

const COL_NAME: usize = 1;
const COL_CHROM: usize = 2;
const COL_STRAND: usize = 3;
const COL_TX_START: usize = 4;
const COL_TX_END: usize = 5;
const COL_CDS_START: usize = 6;
const COL_CDS_END: usize = 7;
const COL_EXON_COUNT: usize = 8;
const COL_EXON_STARTS: usize = 9;
const COL_EXON_ENDS: usize = 10;
const COL_GENE: usize = 12;
const COL_CDS_START_STAT: usize = 13;
const COL_CDS_END_STAT: usize = 14;


quick_error! {
    /// Errors that occur when reading refGene files.
    #[derive(Debug)]
    pub enum RefGeneError {
        /// Occurs when a required column is absent.
        MissingColumn(idx: usize) {
            display("required column '{}' is missing", COLUMN_NAMES[*idx])
        }
        /// Occurs when a numeric column does not hold a valid u64 value.
        InvalidNumber(idx: usize, value: String, err: ParseIntError) {
            display("invalid value '{}' in column '{}': {}", value, COLUMN_NAMES[*idx], err)
            source(err)
        }
        /// Occurs when the strand column does not hold exactly one character.
        InvalidStrand(value: String) {
            display("invalid strand value '{}'", value)
        }
    }
}

/// RefGene record type.
///
/// This type represents the information of a refGene row that is used for creating a
/// transcript. Exon coordinates are absolute, as they appear in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RefGeneRecord {
    transcript_id: String,
    seq_name: String,
    strand: char,
    transcript_start: u64,
    transcript_end: u64,
    coding_start: u64,
    coding_end: u64,
    num_exons: usize,
    exons: Vec<Coord<u64>>,
    gene_id: String,
    line: u64,
}

impl RefGeneRecord {

    /// Returns the transcript identifier.
    pub fn transcript_id(&self) -> &str {
        self.transcript_id.as_str()
    }

    /// Returns the sequence name.
    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    /// Returns the strand character.
    pub fn strand(&self) -> char {
        self.strand
    }

    /// Returns the genome-wise 5'-most transcript coordinate of the record.
    pub fn transcript_start(&self) -> u64 {
        self.transcript_start
    }

    /// Returns the genome-wise 3'-most transcript coordinate of the record.
    pub fn transcript_end(&self) -> u64 {
        self.transcript_end
    }

    /// Returns the genome-wise 5'-most coding region coordinate of the record.
    pub fn coding_start(&self) -> u64 {
        self.coding_start
    }

    /// Returns the genome-wise 3'-most coding region coordinate of the record.
    pub fn coding_end(&self) -> u64 {
        self.coding_end
    }

    /// Returns the value of the number of exons column.
    pub fn num_exons(&self) -> usize {
        self.num_exons
    }

    /// Returns the exon coordinates that could be parsed from the record.
    ///
    /// This may hold fewer exons than `num_exons` when the exon columns are malformed.
    pub fn exons(&self) -> &[Coord<u64>] {
        self.exons.as_slice()
    }

    /// Returns the gene symbol.
    pub fn gene_id(&self) -> &str {
        self.gene_id.as_str()
    }

    /// Returns the 1-based line number of the record in its source.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Creates a record from a raw row.
    ///
    /// Malformed exon coordinate columns do not cause an error: the record keeps the exons that
    /// could be parsed and a warning is logged.
    pub fn try_from_row(row: &StringRecord, line: u64) -> ::std::result::Result<Self, RefGeneError> {
        let transcript_id = get_column(row, COL_NAME)?.to_owned();
        let strand_str = get_column(row, COL_STRAND)?;
        let mut strand_chars = strand_str.chars();
        let strand = match (strand_chars.next(), strand_chars.next()) {
            (Some(chr), None) => chr,
            _ => return Err(RefGeneError::InvalidStrand(strand_str.to_owned())),
        };
        let num_exons = parse_column(row, COL_EXON_COUNT)?;
        let (exons, is_complete) = Self::parse_exon_coords(
            get_column(row, COL_EXON_STARTS)?, get_column(row, COL_EXON_ENDS)?, num_exons);
        if !is_complete {
            warn!("invalid exon info for transcript '{}' at line {}, keeping {} of {} exon(s)",
                  transcript_id, line, exons.len(), num_exons);
        }

        Ok(RefGeneRecord {
            transcript_id,
            seq_name: get_column(row, COL_CHROM)?.to_owned(),
            strand,
            transcript_start: parse_column(row, COL_TX_START)?,
            transcript_end: parse_column(row, COL_TX_END)?,
            coding_start: parse_column(row, COL_CDS_START)?,
            coding_end: parse_column(row, COL_CDS_END)?,
            num_exons,
            exons,
            gene_id: get_column(row, COL_GENE)?.to_owned(),
            line,
        })
    }

    /// Transforms the record into a transcript.
    pub fn into_transcript(self) -> Result<Transcript> {
        TBuilder::new(self.seq_name, self.transcript_start, self.transcript_end)
            .id(self.transcript_id)
            .gene_id(self.gene_id)
            .strand_char(self.strand)
            .coding_coord(self.coding_start, self.coding_end)
            .exon_coords(self.exons)
            .build()
            .map_err(Error::from)
    }

    /// Whether the coding region of the raw row is annotated as complete on both ends.
    fn is_complete_row(row: &StringRecord) -> bool {
        row.get(COL_CDS_START_STAT) == Some(CMPL_STR) && row.get(COL_CDS_END_STAT) == Some(CMPL_STR)
    }

    /// Pairs up the raw start and end coordinate strings into exon coordinates.
    ///
    /// Parsing stops at the first invalid coordinate. The returned flag is false when not all
    /// of the expected exons could be created.
    fn parse_exon_coords(raw_starts: &str, raw_ends: &str, expected: usize) -> (Vec<Coord<u64>>, bool) {
        let starts = Self::parse_coords(raw_starts);
        let ends = Self::parse_coords(raw_ends);
        let mut is_complete = starts.is_ok() && ends.is_ok();

        let mut exons = Vec::with_capacity(expected);
        for pair in starts.unwrap_or_else(|p| p).into_iter().zip_longest(ends.unwrap_or_else(|p| p)) {
            match pair {
                EitherOrBoth::Both(start, end) => exons.push((start, end)),
                _ => {
                    is_complete = false;
                    break;
                },
            }
        }
        let is_complete = is_complete && exons.len() == expected;
        (exons, is_complete)
    }

    /// Parses the given comma-separated coordinate string.
    ///
    /// On failure, the coordinates parsed before the invalid one are returned as the error value.
    #[inline]
    fn parse_coords(raw_coords: &str) -> ::std::result::Result<Vec<u64>, Vec<u64>> {
        let mut res = vec![];
        let trimmed = raw_coords.trim_matches(',');
        if trimmed.is_empty() {
            return Ok(res);
        }
        for item in trimmed.split(',') {
            match u64::from_str(item.trim()) {
                Ok(coord) => res.push(coord),
                Err(_) => return Err(res),
            }
        }
        Ok(res)
    }
}

#[inline]
fn get_column(row: &StringRecord, idx: usize) -> ::std::result::Result<&str, RefGeneError> {
    row.get(idx).ok_or(RefGeneError::MissingColumn(idx))
}

#[inline]
fn parse_column<T>(row: &StringRecord, idx: usize) -> ::std::result::Result<T, RefGeneError>
    where T: FromStr<Err=ParseIntError>
{
    let raw = get_column(row, idx)?;
    T::from_str(raw.trim()).map_err(|e| RefGeneError::InvalidNumber(idx, raw.to_owned(), e))
}

/// RefGene reader.
pub struct Reader<R: io::Read> {
    inner: csv::Reader<R>,
    name: String,
}

impl<R: io::Read> Reader<R> {

    /// Creates a refGene reader from another reader.
    pub fn from_reader(in_reader: R) -> Reader<R> {
        Reader {
            inner: csv::ReaderBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .flexible(true)
                .quoting(false)
                .comment(Some(b'#'))
                .from_reader(in_reader),
            name: STREAM_NAME.to_owned(),
        }
    }

    /// Sets the name used for the input in error messages.
    pub fn with_name<T>(mut self, name: T) -> Self
        where T: Into<String>
    {
        self.name = name.into();
        self
    }

    /// Returns the name of the input.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Creates an iterator of refGene records with completely annotated coding regions.
    pub fn records(&mut self) -> RefGeneRecords<R> {
        RefGeneRecords {
            inner: self.inner.records(),
            name: self.name.as_str(),
        }
    }

    /// Creates an iterator of transcripts.
    pub fn transcripts(&mut self) -> RefGeneTranscripts<R> {
        RefGeneTranscripts {
            inner: self.records(),
        }
    }
}

impl Reader<fs::File> {

    /// Creates a refGene reader that reads from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let name = path.as_ref().display().to_string();
        fs::File::open(path).map(|f| Reader::from_reader(f).with_name(name))
    }
}

/// Iterator over refGene records.
pub struct RefGeneRecords<'a, R: 'a> where R: io::Read {
    inner: csv::StringRecordsIter<'a, R>,
    name: &'a str,
}

impl<'a, R> Iterator for RefGeneRecords<'a, R> where R: io::Read {

    type Item = Result<RefGeneRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        for row in self.inner.by_ref() {
            let row = match row {
                Ok(row) => row,
                Err(err) => return Some(Err(Error::from(err))),
            };
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            if !RefGeneRecord::is_complete_row(&row) {
                debug!("skipping row with incomplete coding region at line {} of '{}'",
                       line, self.name);
                continue;
            }
            return Some(RefGeneRecord::try_from_row(&row, line)
                            .map_err(|e| Error::from(e).at_line(self.name, line)));
        }
        None
    }
}

/// Iterator over transcripts created from refGene records.
pub struct RefGeneTranscripts<'a, R: 'a> where R: io::Read {
    inner: RefGeneRecords<'a, R>,
}

impl<'a, R> Iterator for RefGeneTranscripts<'a, R> where R: io::Read {

    type Item = Result<Transcript>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.inner.name;
        self.inner.next()
            .map(|record| record.and_then(|rec| {
                let line = rec.line();
                rec.into_transcript().map_err(|e| e.at_line(name, line))
            }))
    }
}
