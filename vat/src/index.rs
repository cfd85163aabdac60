//! Lookup of transcripts by sequence name and position.
use std::io;

use multimap::MultiMap;

use crate::{RefGeneReader, Result, Transcript};


/// Transcripts grouped by their sequence name.
///
/// Within a sequence, transcripts are kept in the order they were added. Overlap queries are a
/// linear scan over the transcripts of the queried sequence.
#[derive(Debug, Clone, Default)]
pub struct TranscriptIndex {
    inner: MultiMap<String, Transcript>,
}

impl TranscriptIndex {

    pub fn new() -> Self {
        TranscriptIndex { inner: MultiMap::new() }
    }

    /// Creates an index from all transcripts of the given refGene reader.
    pub fn from_refgene<R: io::Read>(reader: &mut RefGeneReader<R>) -> Result<Self> {
        let mut index = TranscriptIndex::new();
        for transcript in reader.transcripts() {
            index.insert(transcript?);
        }
        if index.is_empty() {
            warn!("no transcripts with complete coding annotation found in '{}'", reader.name());
        } else {
            info!("loaded {} transcript(s) on {} sequence(s) from '{}'",
                  index.len(), index.num_seqs(), reader.name());
        }
        Ok(index)
    }

    pub fn insert(&mut self, transcript: Transcript) {
        self.inner.insert(transcript.seq_name().to_owned(), transcript);
    }

    /// Transcripts on the given sequence, in insertion order.
    pub fn transcripts(&self, seq_name: &str) -> &[Transcript] {
        self.inner.get_vec(seq_name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Transcripts on the given sequence whose span contains the given absolute position.
    pub fn overlapping<'a>(&'a self, seq_name: &str, pos: u64)
        -> impl Iterator<Item=&'a Transcript> + 'a
    {
        self.transcripts(seq_name).iter().filter(move |trx| trx.contains(pos))
    }

    /// Number of transcripts in the index.
    pub fn len(&self) -> usize {
        self.inner.iter_all().map(|(_, trxs)| trxs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of sequences with at least one transcript.
    pub fn num_seqs(&self) -> usize {
        self.inner.keys().count()
    }
}

#[cfg(test)]
mod test_index {
    use super::*;
    use crate::TBuilder;

    fn trx(id: &str, seq_name: &str, start: u64, end: u64) -> Transcript {
        TBuilder::new(seq_name, start, end)
            .id(id)
            .strand_char('+')
            .exon_coords(vec![(start, end)])
            .build()
            .expect("a transcript")
    }

    fn index() -> TranscriptIndex {
        let mut index = TranscriptIndex::new();
        index.insert(trx("t3", "chr1", 500, 900));
        index.insert(trx("t1", "chr1", 100, 200));
        index.insert(trx("t2", "chr1", 150, 600));
        index.insert(trx("t4", "chr2", 100, 200));
        index
    }

    #[test]
    fn counts() {
        let index = index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.num_seqs(), 2);
        assert!(!index.is_empty());
        assert!(TranscriptIndex::new().is_empty());
    }

    #[test]
    fn insertion_order() {
        let index = index();
        let ids = index.transcripts("chr1").iter().map(|t| t.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["t3", "t1", "t2"]);
        assert!(index.transcripts("chrX").is_empty());
    }

    #[test]
    fn overlapping() {
        let index = index();
        let ids = index.overlapping("chr1", 550).map(|t| t.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["t3", "t2"]);
        let ids = index.overlapping("chr1", 150).map(|t| t.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(index.overlapping("chr1", 900).count(), 0);
        assert_eq!(index.overlapping("chr1", 99).count(), 0);
        assert_eq!(index.overlapping("chr3", 150).count(), 0);
    }

    #[test]
    fn from_refgene() {
        let data = "1\tNM_1\tchr1\t+\t0\t10\t2\t8\t1\t0,\t10,\t0\tG1\tcmpl\tcmpl\t0,\n\
                    1\tNM_2\tchr2\t-\t0\t10\t2\t8\t1\t0,\t10,\t0\tG2\tcmpl\tcmpl\t0,\n";
        let mut reader = RefGeneReader::from_reader(data.as_bytes());
        let index = TranscriptIndex::from_refgene(&mut reader).expect("an index");
        assert_eq!(index.len(), 2);
        assert_eq!(index.transcripts("chr2")[0].id(), "NM_2");
    }
}
