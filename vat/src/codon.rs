//! Codon translation and mutation classes.
use std::fmt;

use crate::consts::{ALT_FRAMESHIFT, ALT_UNKNOWN};


quick_error! {
    /// Errors that occur when translating codons.
    #[derive(Debug, PartialEq)]
    pub enum CodonError {
        /// Occurs when a codon contains a character that is not a nucleotide.
        InvalidBase(base: char) {
            display("invalid base '{}'", base)
        }
    }
}

/// Amino acids and the translation stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala, Arg, Asn, Asp, Cys, Gln, Glu, Gly, His, Ile,
    Leu, Lys, Met, Phe, Pro, Ser, Thr, Trp, Tyr, Val,
    Stop,
}

use self::AminoAcid::*;

/// The standard genetic code, indexed by the rank of each codon base (T=0, C=1, A=2, G=3).
const CODON_TABLE: [[[AminoAcid; 4]; 4]; 4] = [
    [
        [Phe, Phe, Leu, Leu], [Ser, Ser, Ser, Ser],
        [Tyr, Tyr, Stop, Stop], [Cys, Cys, Stop, Trp],
    ],
    [
        [Leu, Leu, Leu, Leu], [Pro, Pro, Pro, Pro],
        [His, His, Gln, Gln], [Arg, Arg, Arg, Arg],
    ],
    [
        [Ile, Ile, Ile, Met], [Thr, Thr, Thr, Thr],
        [Asn, Asn, Lys, Lys], [Ser, Ser, Arg, Arg],
    ],
    [
        [Val, Val, Val, Val], [Ala, Ala, Ala, Ala],
        [Asp, Asp, Glu, Glu], [Gly, Gly, Gly, Gly],
    ],
];

impl AminoAcid {

    /// Translates a codon; bases are case-insensitive.
    pub fn from_codon(codon: &[u8; 3]) -> Result<AminoAcid, CodonError> {
        Ok(CODON_TABLE[base_rank(codon[0])?][base_rank(codon[1])?][base_rank(codon[2])?])
    }

    pub fn is_stop(self) -> bool {
        self == Stop
    }

    /// Single-letter code; `*` for the stop.
    pub fn one_letter(self) -> char {
        match self {
            Ala => 'A', Arg => 'R', Asn => 'N', Asp => 'D', Cys => 'C',
            Gln => 'Q', Glu => 'E', Gly => 'G', His => 'H', Ile => 'I',
            Leu => 'L', Lys => 'K', Met => 'M', Phe => 'F', Pro => 'P',
            Ser => 'S', Thr => 'T', Trp => 'W', Tyr => 'Y', Val => 'V',
            Stop => '*',
        }
    }

    /// Three-letter code; `*` for the stop.
    pub fn three_letter(self) -> &'static str {
        match self {
            Ala => "Ala", Arg => "Arg", Asn => "Asn", Asp => "Asp", Cys => "Cys",
            Gln => "Gln", Glu => "Glu", Gly => "Gly", His => "His", Ile => "Ile",
            Leu => "Leu", Lys => "Lys", Met => "Met", Phe => "Phe", Pro => "Pro",
            Ser => "Ser", Thr => "Thr", Trp => "Trp", Tyr => "Tyr", Val => "Val",
            Stop => "*",
        }
    }
}

#[inline]
fn base_rank(base: u8) -> Result<usize, CodonError> {
    match base {
        b'T' | b't' => Ok(0),
        b'C' | b'c' => Ok(1),
        b'A' | b'a' => Ok(2),
        b'G' | b'g' => Ok(3),
        other => Err(CodonError::InvalidBase(char::from(other))),
    }
}

/// Complementary base; case is kept and non-nucleotides are returned as they are.
#[inline]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T', b'a' => b't',
        b'C' => b'G', b'c' => b'g',
        b'G' => b'C', b'g' => b'c',
        b'T' => b'A', b't' => b'a',
        other => other,
    }
}

/// Effect of a variant on the coding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationClass {
    Synonymous,
    NonSynonymous,
    StopGain,
    StopLoss,
    Frameshift,
    Inframe,
    Unknown,
}

impl MutationClass {

    /// Class of a substitution given the reference and mutated amino acids.
    pub fn from_amino_acids(ref_aa: AminoAcid, alt_aa: AminoAcid) -> MutationClass {
        if ref_aa == alt_aa {
            MutationClass::Synonymous
        } else if ref_aa.is_stop() {
            MutationClass::StopLoss
        } else if alt_aa.is_stop() {
            MutationClass::StopGain
        } else {
            MutationClass::NonSynonymous
        }
    }

    /// Class of a coding variant that can be determined from its alleles alone.
    ///
    /// Returns `None` for single-base substitutions, whose class depends on the codon.
    pub fn from_alleles(ref_allele: &str, alt_allele: &str) -> Option<MutationClass> {
        match alt_allele {
            ALT_FRAMESHIFT => Some(MutationClass::Frameshift),
            ALT_UNKNOWN => Some(MutationClass::Unknown),
            alt if alt.len() > 1 && (alt.len() - 2) % 3 == 0 => Some(MutationClass::Inframe),
            alt if alt.len() > 1 => Some(MutationClass::Frameshift),
            alt if alt.len() == 1 && ref_allele.len() == 1 => None,
            _ => Some(MutationClass::Unknown),
        }
    }
}

impl fmt::Display for MutationClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            MutationClass::Synonymous => "Synonymous",
            MutationClass::NonSynonymous => "Non-synonymous",
            MutationClass::StopGain => "Stop-codon-gain",
            MutationClass::StopLoss => "Stop-codon-loss",
            MutationClass::Frameshift => "Frameshift",
            MutationClass::Inframe => "Inframe",
            MutationClass::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Amino acid change caused by a codon substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinChange {
    /// 1-based codon number.
    pub pos: u64,
    pub ref_aa: AminoAcid,
    pub alt_aa: AminoAcid,
}

impl ProteinChange {

    pub fn class(&self) -> MutationClass {
        MutationClass::from_amino_acids(self.ref_aa, self.alt_aa)
    }

    /// Change in single-letter notation, e.g. `p.K14E`.
    pub fn one_letter(&self) -> String {
        format!("p.{}{}{}", self.ref_aa.one_letter(), self.pos, self.alt_aa.one_letter())
    }

    /// Change in three-letter notation, e.g. `p.Lys14Glu`.
    pub fn three_letter(&self) -> String {
        format!("p.{}{}{}", self.ref_aa.three_letter(), self.pos, self.alt_aa.three_letter())
    }
}
