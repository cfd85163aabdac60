//! Variant annotation against transcripts.
use crate::{Error, ModelError, Result, SequenceError, SequenceProvider, Strand, Transcript,
            TranscriptIndex, Variant};
use crate::codon::{AminoAcid, MutationClass, ProteinChange};
use crate::consts::UNK_STR;
use crate::context::{classify, Region, Segment};
use crate::mapper::{codon_positions, Forward, Orientation, Reverse};


/// Annotation settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Annotate only the first overlapping transcript of each variant.
    pub first_only: bool,
}

/// Annotation of a variant against one transcript.
///
/// Fields that do not apply are `None` and are written as `.`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub strand: Option<Strand>,
    pub transcript_id: Option<String>,
    pub gene_id: Option<String>,
    /// Coding coordinate followed by the reference and alternate alleles, e.g. `c.41A>G`.
    pub mutation: Option<String>,
    pub segment: Segment,
    pub region: Option<Region>,
    pub ref_codon: Option<String>,
    pub alt_codon: Option<String>,
    pub protein_change: Option<ProteinChange>,
    pub class: Option<MutationClass>,
}

impl Annotation {

    /// Annotation of a variant that overlaps no transcript.
    pub fn intergenic() -> Annotation {
        Annotation {
            strand: None,
            transcript_id: None,
            gene_id: None,
            mutation: None,
            segment: Segment::Intergenic,
            region: None,
            ref_codon: None,
            alt_codon: None,
            protein_change: None,
            class: None,
        }
    }

    /// Output column values.
    pub fn fields(&self) -> Vec<String> {
        fn or_unk<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_else(|| UNK_STR.to_owned())
        }
        let strand = match self.strand {
            Some(Strand::Forward) => "+",
            Some(Strand::Reverse) => "-",
            _ => UNK_STR,
        };
        vec![
            strand.to_owned(),
            or_unk(self.transcript_id.as_ref()),
            or_unk(self.gene_id.as_ref()),
            or_unk(self.mutation.as_ref()),
            self.segment.to_string(),
            or_unk(self.region),
            or_unk(self.ref_codon.as_ref()),
            or_unk(self.alt_codon.as_ref()),
            or_unk(self.protein_change.as_ref().map(|c| c.one_letter())),
            or_unk(self.protein_change.as_ref().map(|c| c.three_letter())),
            or_unk(self.class),
        ]
    }
}

/// Annotates variants against the transcripts of an index.
pub struct Annotator<'a, S: 'a + SequenceProvider> {
    index: &'a TranscriptIndex,
    genome: &'a S,
    options: Options,
}

impl<'a, S: SequenceProvider> Annotator<'a, S> {

    pub fn new(index: &'a TranscriptIndex, genome: &'a S, options: Options) -> Self {
        Annotator { index, genome, options }
    }

    /// Annotates the variant against every transcript that contains its position.
    ///
    /// A variant outside all transcripts gets a single intergenic annotation. A transcript whose
    /// sequence is absent from the reference is an error, and so is a transcript whose exons
    /// cannot place the variant, such as one kept with a partial exon list.
    pub fn annotate(&self, variant: &Variant) -> Result<Vec<Annotation>> {
        let mut annotations = vec![];
        let mut ref_bases = None;
        for transcript in self.index.overlapping(variant.seq_name(), variant.pos()) {
            let bases = match ref_bases {
                Some(bases) => bases,
                None => {
                    let bases = self.reference_bases(variant)?;
                    ref_bases = Some(bases);
                    bases
                },
            };
            annotations.push(self.annotate_transcript(transcript, variant, bases)?);
            if self.options.first_only {
                break;
            }
        }
        if annotations.is_empty() {
            annotations.push(Annotation::intergenic());
        }
        Ok(annotations)
    }

    /// Annotates the variant against a single transcript containing its position.
    ///
    /// `ref_bases` are the reference bases under the variant's reference allele.
    pub fn annotate_transcript(&self, transcript: &Transcript, variant: &Variant, ref_bases: &[u8])
        -> Result<Annotation>
    {
        match transcript.strand() {
            Strand::Forward => annotate_oriented::<Forward, S>(transcript, variant, ref_bases, self.genome),
            Strand::Reverse => annotate_oriented::<Reverse, S>(transcript, variant, ref_bases, self.genome),
            Strand::Unknown => {
                let err = ModelError::UnspecifiedStrand(Some(transcript.id().to_owned()));
                Err(Error::from(err))
            },
        }
    }

    /// Reference bases under the variant's reference allele, read from the genome.
    fn reference_bases(&self, variant: &Variant) -> Result<&'a [u8]> {
        if !self.genome.has(variant.seq_name()) {
            return Err(Error::from(SequenceError::MissingSequence(variant.seq_name().to_owned())));
        }
        let ref_allele = variant.ref_allele();
        let bases = self.genome.bases(variant.seq_name(), variant.pos(), ref_allele.len() as u64)?;
        if !bases.eq_ignore_ascii_case(ref_allele.as_bytes()) {
            warn!("reference allele '{}' at {}:{} does not match the reference sequence '{}'",
                  ref_allele, variant.seq_name(), variant.pos() + 1,
                  String::from_utf8_lossy(bases));
        }
        Ok(bases)
    }
}

fn annotate_oriented<O, S>(transcript: &Transcript, variant: &Variant, ref_bases: &[u8], genome: &S)
    -> Result<Annotation>
    where O: Orientation, S: SequenceProvider
{
    let span = transcript.span();
    let exons = O::reading_exons(span, transcript.exons());
    let coding =
        if transcript.is_coding() {
            Some(O::flip_coord(span, transcript.rel_coding_coord()))
        } else {
            None
        };
    let pos = O::flip_pos(span, variant.pos() - transcript.start());
    let context = classify(&exons, coding, pos)?;

    let alt_allele = variant.alt_allele();
    let mut annotation = Annotation {
        strand: Some(O::STRAND),
        transcript_id: Some(transcript.id().to_owned()),
        gene_id: Some(transcript.gene_id().to_owned()),
        mutation: context.coord.map(|coord| {
            format!("{}{}>{}", coord, String::from_utf8_lossy(ref_bases), alt_allele)
        }),
        segment: context.segment,
        region: context.region(),
        ref_codon: None,
        alt_codon: None,
        protein_change: None,
        class: None,
    };

    if coding.is_none() {
        annotation.class = Some(MutationClass::Unknown);
        return Ok(annotation);
    }
    let cds_idx = match context.coord.and_then(|coord| coord.cds_index()) {
        Some(idx) => idx,
        None => return Ok(annotation),
    };
    if let Some(class) = MutationClass::from_alleles(variant.ref_allele(), alt_allele) {
        annotation.class = Some(class);
        return Ok(annotation);
    }

    let frame = (cds_idx % 3) as u8;
    let mut ref_codon = [0u8; 3];
    for (base, &cpos) in ref_codon.iter_mut().zip(codon_positions(&exons, pos, frame)?.iter()) {
        let genome_pos = transcript.start() + O::flip_pos(span, cpos);
        *base = O::orient_base(genome.base(transcript.seq_name(), genome_pos)?);
    }
    let mut alt_codon = ref_codon;
    alt_codon[usize::from(frame)] = O::orient_base(alt_allele.as_bytes()[0].to_ascii_uppercase());

    let change = ProteinChange {
        pos: cds_idx / 3 + 1,
        ref_aa: AminoAcid::from_codon(&ref_codon)?,
        alt_aa: AminoAcid::from_codon(&alt_codon)?,
    };
    annotation.ref_codon = Some(String::from_utf8_lossy(&ref_codon).into_owned());
    annotation.alt_codon = Some(String::from_utf8_lossy(&alt_codon).into_owned());
    annotation.class = Some(change.class());
    annotation.protein_change = Some(change);
    Ok(annotation)
}

#[cfg(test)]
mod test_annotate {
    use super::*;
    use crate::{Genome, MappingError, TBuilder};

    /// Forward transcript spanning chrE:100-200 with one exon and coding region 110-190.
    fn setup() -> (TranscriptIndex, Genome) {
        let mut index = TranscriptIndex::new();
        index.insert(TBuilder::new("chrE", 100, 200)
                         .id("NM_E")
                         .gene_id("GE")
                         .strand_char('+')
                         .coding_coord(110, 190)
                         .exon_coords(vec![(100, 200)])
                         .build()
                         .unwrap());
        let mut seq = vec![b'C'; 300];
        seq[149..152].copy_from_slice(b"GAT");
        let mut genome = Genome::new();
        genome.insert("chrE", &seq);
        (index, genome)
    }

    fn variant(seq_name: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Variant {
        let fields = vec![seq_name.to_owned(), pos.to_string(), ".".to_owned(),
                          ref_allele.to_owned(), alt_allele.to_owned()];
        Variant::from_fields(fields, 1).unwrap()
    }

    #[test]
    fn coding_substitution() {
        let (index, genome) = setup();
        let annotator = Annotator::new(&index, &genome, Options::default());
        let anns = annotator.annotate(&variant("chrE", 151, "A", "G")).unwrap();
        assert_eq!(anns.len(), 1);
        let ann = &anns[0];
        assert_eq!(ann.mutation.as_deref(), Some("c.41A>G"));
        assert_eq!(ann.segment, Segment::Exon(1, 1));
        assert_eq!(ann.region, Some(Region::Cds));
        assert_eq!(ann.ref_codon.as_deref(), Some("GAT"));
        assert_eq!(ann.alt_codon.as_deref(), Some("GGT"));
        assert_eq!(ann.class, Some(MutationClass::NonSynonymous));
        assert_eq!(ann.fields(), vec!["+", "NM_E", "GE", "c.41A>G", "Exon(1/1)", "CDS",
                                      "GAT", "GGT", "p.D14G", "p.Asp14Gly", "Non-synonymous"]);
    }

    #[test]
    fn reference_aa_matches_codon() {
        let (index, genome) = setup();
        let annotator = Annotator::new(&index, &genome, Options::default());
        let ann = annotator.annotate(&variant("chrE", 151, "A", "A")).unwrap().remove(0);
        let change = ann.protein_change.unwrap();
        assert_eq!(change.ref_aa, AminoAcid::from_codon(b"GAT").unwrap());
        assert_eq!(change.ref_aa, change.alt_aa);
        assert_eq!(ann.class, Some(MutationClass::Synonymous));
    }

    #[test]
    fn coding_indels() {
        let (index, genome) = setup();
        let annotator = Annotator::new(&index, &genome, Options::default());
        for alt in ["AC", "ACGTA", "ACGTACGT"].iter() {
            let ann = annotator.annotate(&variant("chrE", 151, "A", alt)).unwrap().remove(0);
            assert_eq!(ann.class, Some(MutationClass::Inframe));
            assert_eq!(ann.ref_codon, None);
        }
        for alt in ["ACG", "ACGT", "ACGTACG"].iter() {
            let ann = annotator.annotate(&variant("chrE", 151, "A", alt)).unwrap().remove(0);
            assert_eq!(ann.class, Some(MutationClass::Frameshift));
        }
        let ann = annotator.annotate(&variant("chrE", 151, "A", "*")).unwrap().remove(0);
        assert_eq!(ann.class, Some(MutationClass::Frameshift));
        let ann = annotator.annotate(&variant("chrE", 151, "A", ".")).unwrap().remove(0);
        assert_eq!(ann.class, Some(MutationClass::Unknown));
    }

    #[test]
    fn utr_has_no_class() {
        let (index, genome) = setup();
        let annotator = Annotator::new(&index, &genome, Options::default());
        let ann = annotator.annotate(&variant("chrE", 101, "C", "G")).unwrap().remove(0);
        assert_eq!(ann.mutation.as_deref(), Some("c.-10C>G"));
        assert_eq!(ann.region, Some(Region::Utr5));
        assert_eq!(ann.class, None);
        let ann = annotator.annotate(&variant("chrE", 191, "C", "G")).unwrap().remove(0);
        assert_eq!(ann.mutation.as_deref(), Some("c.*1C>G"));
        assert_eq!(ann.region, Some(Region::Utr3));
    }

    #[test]
    fn intergenic() {
        let (index, genome) = setup();
        let annotator = Annotator::new(&index, &genome, Options::default());
        let anns = annotator.annotate(&variant("chrE", 250, "C", "G")).unwrap();
        assert_eq!(anns, vec![Annotation::intergenic()]);
        let anns = annotator.annotate(&variant("chrZ", 250, "C", "G")).unwrap();
        assert_eq!(anns, vec![Annotation::intergenic()]);
        assert_eq!(anns[0].fields(), vec![".", ".", ".", ".", "Intergenic", ".",
                                          ".", ".", ".", ".", "."]);
    }

    #[test]
    fn position_outside_exons_is_fatal() {
        let (full, genome) = setup();
        let mut index = TranscriptIndex::new();
        index.insert(TBuilder::new("chrE", 100, 200)
                         .id("NM_P")
                         .strand_char('-')
                         .coding_coord(110, 140)
                         .exon_coords(vec![(100, 150)])
                         .build()
                         .unwrap());
        for trx in full.transcripts("chrE") {
            index.insert(trx.clone());
        }
        let annotator = Annotator::new(&index, &genome, Options::default());
        let err = annotator.annotate(&variant("chrE", 171, "C", "G")).unwrap_err();
        assert!(matches!(err, Error::Mapping(MappingError::PositionOutOfRange(..))));
        let anns = annotator.annotate(&variant("chrE", 120, "C", "G")).unwrap();
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].transcript_id.as_deref(), Some("NM_P"));
        assert_eq!(anns[0].class, Some(MutationClass::Synonymous));
    }

    #[test]
    fn missing_sequence_is_fatal() {
        let (index, _) = setup();
        let genome = Genome::new();
        let annotator = Annotator::new(&index, &genome, Options::default());
        let err = annotator.annotate(&variant("chrE", 151, "A", "G")).unwrap_err();
        assert!(matches!(err, Error::Sequence(_)));
    }

    #[test]
    fn invalid_alt_base_is_fatal() {
        let (index, genome) = setup();
        let annotator = Annotator::new(&index, &genome, Options::default());
        let err = annotator.annotate(&variant("chrE", 151, "A", "N")).unwrap_err();
        assert!(matches!(err, Error::Codon(_)));
    }
}
