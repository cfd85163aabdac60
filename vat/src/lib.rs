#![deny(unsafe_code, unstable_features, unused_import_braces)]
#![warn(trivial_casts, trivial_numeric_casts, unused_qualifications, unused_results)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

use std::io;

pub use bio_types::strand::Strand;

pub mod model;
pub use crate::model::{ModelError, TBuilder, Transcript};

mod io_refgene;
pub use crate::io_refgene::{Reader as RefGeneReader, RefGeneError, RefGeneRecord,
                            RefGeneRecords, RefGeneTranscripts};

mod index;
pub use crate::index::TranscriptIndex;

mod io_fasta;
pub use crate::io_fasta::{Genome, SequenceError, SequenceProvider};

pub mod mapper;
pub use crate::mapper::{Forward, MappingError, Orientation, Reverse, Step};

pub mod context;
pub use crate::context::{Context, Region, Segment, TxCoord};

pub mod codon;
pub use crate::codon::{AminoAcid, CodonError, MutationClass, ProteinChange};

pub mod annotate;
pub use crate::annotate::{Annotation, Annotator, Options};

mod io_variant;
pub use crate::io_variant::{InputFormat, Reader as VariantReader, Variant, VariantError,
                            VariantLine, VariantLines, Writer as AnnotationWriter};


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Model(err: ModelError) {
            display("{}", err)
            from()
            source(err)
        }
        RefGene(err: RefGeneError) {
            display("{}", err)
            from()
            source(err)
        }
        Sequence(err: SequenceError) {
            display("{}", err)
            from()
            source(err)
        }
        Mapping(err: MappingError) {
            display("{}", err)
            from()
            source(err)
        }
        Codon(err: CodonError) {
            display("{}", err)
            from()
            source(err)
        }
        Variant(err: VariantError) {
            display("{}", err)
            from()
            source(err)
        }
        Csv(err: csv::Error) {
            display("{}", err)
            from()
            source(err)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            source(err)
        }
        /// Wraps an error with the input it came from.
        InputLine(path: String, line: u64, err: Box<Error>) {
            display("{}, line {} of file '{}'", err, line, path)
            source(err)
        }
    }
}

impl Error {

    /// Attaches the input name and the 1-based line number to the error.
    ///
    /// Errors that already carry a location are returned as they are.
    pub fn at_line<T: Into<String>>(self, path: T, line: u64) -> Error {
        match self {
            located @ Error::InputLine(..) => located,
            otherwise => Error::InputLine(path.into(), line, Box::new(otherwise)),
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

// Helper type for raw coordinates
pub type Coord<T> = (T, T);

// Crate-wide constants
mod consts {
    // Value for unknown columns.
    pub(crate) const UNK_STR: &str = ".";

    // Name used for inputs that do not come from a named file.
    pub(crate) const STREAM_NAME: &str = "-";

    // Value of the refGene completeness columns for fully annotated coding regions.
    pub(crate) const CMPL_STR: &str = "cmpl";

    // Alternate allele markers with special meaning.
    pub(crate) const ALT_FRAMESHIFT: &str = "*";
    pub(crate) const ALT_UNKNOWN: &str = ".";

    // Value for optionally known strings.
    pub(crate) const DEF_ID: &str = "<unknown>";
}
