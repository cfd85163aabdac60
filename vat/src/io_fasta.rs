//! Reference sequence access.
use std::fs;
use std::io;
use std::path::Path;

use bio::io::fasta;
use linked_hash_map::LinkedHashMap;

use crate::Result;


quick_error! {
    /// Errors that occur when fetching reference bases.
    #[derive(Debug)]
    pub enum SequenceError {
        /// Occurs when the requested sequence was not loaded.
        MissingSequence(seq_name: String) {
            display("sequence '{}' not found in the reference", seq_name)
        }
        /// Occurs when the requested bases run past the end of the sequence.
        OutOfBounds(seq_name: String, start: u64, end: u64, len: u64) {
            display("region [{}, {}) lies outside sequence '{}' of length {}",
                    start, end, seq_name, len)
        }
    }
}

/// Random access to uppercase reference bases.
pub trait SequenceProvider {

    /// Whether the provider holds the given sequence.
    fn has(&self, seq_name: &str) -> bool;

    /// Bases of the given sequence in the zero-based, half-open region starting at `start`.
    fn bases(&self, seq_name: &str, start: u64, len: u64)
        -> ::std::result::Result<&[u8], SequenceError>;

    /// The base of the given sequence at the zero-based position.
    fn base(&self, seq_name: &str, pos: u64) -> ::std::result::Result<u8, SequenceError> {
        self.bases(seq_name, pos, 1).map(|b| b[0])
    }
}

/// Reference sequences held fully in memory, in the order they were loaded.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    seqs: LinkedHashMap<String, Vec<u8>>,
}

impl Genome {

    pub fn new() -> Self {
        Genome { seqs: LinkedHashMap::new() }
    }

    /// Loads all records of a FASTA stream.
    ///
    /// Records are keyed by the first whitespace-delimited token of their header and their bases
    /// are upper-cased. Records sharing a name are concatenated.
    pub fn from_reader<R: io::Read>(in_reader: R) -> Result<Self> {
        let mut genome = Genome::new();
        for record in fasta::Reader::new(in_reader).records() {
            let record = record?;
            genome.insert(record.id(), record.seq());
        }
        info!("loaded {} reference sequence(s)", genome.len());
        Ok(genome)
    }

    /// Loads all records of the FASTA file at the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path)?;
        Genome::from_reader(file)
    }

    /// Adds bases to the named sequence, creating it if needed.
    pub fn insert<T: Into<String>>(&mut self, seq_name: T, bases: &[u8]) {
        let seq_name = seq_name.into();
        let upper = bases.iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(u8::to_ascii_uppercase);
        if let Some(seq) = self.seqs.get_mut(&seq_name) {
            warn!("duplicate reference sequence '{}', appending its bases", seq_name);
            seq.extend(upper);
            return;
        }
        let _ = self.seqs.insert(seq_name, upper.collect());
    }

    /// Number of loaded sequences.
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

impl SequenceProvider for Genome {

    fn has(&self, seq_name: &str) -> bool {
        self.seqs.contains_key(seq_name)
    }

    fn bases(&self, seq_name: &str, start: u64, len: u64)
        -> ::std::result::Result<&[u8], SequenceError>
    {
        let seq = self.seqs.get(seq_name)
            .ok_or_else(|| SequenceError::MissingSequence(seq_name.to_owned()))?;
        let end = start + len;
        if end > seq.len() as u64 {
            return Err(SequenceError::OutOfBounds(seq_name.to_owned(), start, end,
                                                  seq.len() as u64));
        }
        Ok(&seq[start as usize..end as usize])
    }
}

#[cfg(test)]
mod test_genome {
    use super::*;

    const FASTA: &str = ">chr1 first sequence\nacgtAC\nGT\n>chr2\nNNNN\n";

    #[test]
    fn from_reader() {
        let genome = Genome::from_reader(FASTA.as_bytes()).expect("a genome");
        assert_eq!(genome.len(), 2);
        assert!(genome.has("chr2"));
        assert!(genome.has("chr1"));
        assert!(!genome.has("chr1 first sequence"));
        assert_eq!(genome.bases("chr1", 0, 8).unwrap(), b"ACGTACGT");
        assert_eq!(genome.base("chr1", 2).unwrap(), b'G');
    }

    #[test]
    fn duplicate_names_are_concatenated() {
        let mut genome = Genome::new();
        genome.insert("chr1", b"AC");
        genome.insert("chr1", b"gt");
        assert_eq!(genome.len(), 1);
        assert_eq!(genome.bases("chr1", 0, 4).unwrap(), b"ACGT");
    }

    #[test]
    fn errors() {
        let genome = Genome::from_reader(FASTA.as_bytes()).unwrap();
        assert!(matches!(genome.bases("chrX", 0, 1),
                         Err(SequenceError::MissingSequence(_))));
        assert!(matches!(genome.bases("chr1", 6, 3),
                         Err(SequenceError::OutOfBounds(_, 6, 9, 8))));
        assert!(genome.bases("chr1", 6, 2).is_ok());
    }
}
