/*! Reader for variant inputs and writer for annotated variants.

Two tab-separated input shapes are accepted. Both start with the columns sequence name, 1-based
position, identifier, reference allele, and alternate allele; any further columns are passed
through to the output untouched.

* VCF-like input: lines starting with `##` are meta lines and are skipped. A line starting with
  a single `#` is the header.
* TSV input: lines starting with `#` are comments. The first remaining line may be a header.
*/
use std::io;
use std::num::ParseIntError;
use std::str::FromStr;

use csv::{self, StringRecord};

use crate::{Annotation, Error, Result};
use crate::consts::STREAM_NAME;


/// Number of leading input columns placed before the annotation columns.
const NUM_LEAD_COLUMNS: usize = 5;

/// Names of the columns added to each output row.
pub const ANNOTATION_COLUMNS: [&str; 11] = [
    "strand", "transcript", "gene", "mutation", "segment", "region",
    "ref_codon", "alt_codon", "aa_change", "aa_change3", "class",
];


quick_error! {
    /// Errors that occur when reading variant inputs.
    #[derive(Debug)]
    pub enum VariantError {
        /// Occurs when a row has fewer than the five required columns.
        MissingColumns(found: usize) {
            display("expected at least {} columns, found {}", NUM_LEAD_COLUMNS, found)
        }
        /// Occurs when the position column is not a valid 1-based coordinate.
        InvalidPosition(value: String, err: Option<ParseIntError>) {
            display("invalid position '{}'", value)
        }
    }
}

/// Layout of the variant input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Vcf,
    Tsv,
}

impl Default for InputFormat {
    fn default() -> InputFormat {
        InputFormat::Vcf
    }
}

/// A single variant input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    fields: Vec<String>,
    pos: u64,
    line: u64,
}

impl Variant {

    /// Creates a variant from the columns of an input row.
    pub fn from_fields(fields: Vec<String>, line: u64) -> ::std::result::Result<Self, VariantError> {
        if fields.len() < NUM_LEAD_COLUMNS {
            return Err(VariantError::MissingColumns(fields.len()));
        }
        let raw_pos = fields[1].trim();
        let pos = match u64::from_str(raw_pos) {
            Ok(0) => return Err(VariantError::InvalidPosition(raw_pos.to_owned(), None)),
            Ok(p) => p - 1,
            Err(e) => return Err(VariantError::InvalidPosition(raw_pos.to_owned(), Some(e))),
        };
        Ok(Variant { fields, pos, line })
    }

    pub fn seq_name(&self) -> &str {
        self.fields[0].as_str()
    }

    /// Zero-based position.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn ref_allele(&self) -> &str {
        self.fields[3].as_str()
    }

    pub fn alt_allele(&self) -> &str {
        self.fields[4].as_str()
    }

    /// All input columns.
    pub fn fields(&self) -> &[String] {
        self.fields.as_slice()
    }

    /// 1-based line number of the variant in its source.
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Item of a variant input.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantLine {
    Header(Vec<String>),
    Record(Variant),
}

/// Variant reader.
pub struct Reader<R: io::Read> {
    inner: csv::Reader<R>,
    name: String,
    format: InputFormat,
    has_header: bool,
}

impl<R: io::Read> Reader<R> {

    /// Creates a variant reader from another reader.
    pub fn from_reader(in_reader: R) -> Reader<R> {
        Reader {
            inner: csv::ReaderBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .flexible(true)
                .quoting(false)
                .from_reader(in_reader),
            name: STREAM_NAME.to_owned(),
            format: InputFormat::default(),
            has_header: false,
        }
    }

    /// Sets the name used for the input in error messages.
    pub fn with_name<T>(mut self, name: T) -> Self
        where T: Into<String>
    {
        self.name = name.into();
        self
    }

    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether the input is expected to carry a header.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Creates an iterator over the header and the variants of the input.
    pub fn lines(&mut self) -> VariantLines<R> {
        VariantLines {
            inner: self.inner.records(),
            name: self.name.as_str(),
            format: self.format,
            header_pending: self.has_header,
        }
    }
}

/// Iterator over variant input lines.
pub struct VariantLines<'a, R: 'a> where R: io::Read {
    inner: csv::StringRecordsIter<'a, R>,
    name: &'a str,
    format: InputFormat,
    header_pending: bool,
}

impl<'a, R> VariantLines<'a, R> where R: io::Read {

    /// Turns a raw row into an input line; `None` for rows that are skipped.
    fn process(&mut self, row: &StringRecord, line: u64) -> Option<Result<VariantLine>> {
        let first = row.get(0).unwrap_or_default();
        let is_comment = first.starts_with('#');
        match self.format {
            InputFormat::Vcf if is_comment => {
                if first.starts_with("##") || !self.header_pending {
                    return None;
                }
                self.header_pending = false;
                let mut fields = to_fields(row);
                let _ = fields[0].remove(0);
                Some(Ok(VariantLine::Header(fields)))
            },
            InputFormat::Tsv if is_comment => None,
            InputFormat::Tsv if self.header_pending => {
                self.header_pending = false;
                Some(Ok(VariantLine::Header(to_fields(row))))
            },
            _ => Some(Variant::from_fields(to_fields(row), line)
                          .map(VariantLine::Record)
                          .map_err(|e| Error::from(e).at_line(self.name, line))),
        }
    }
}

impl<'a, R> Iterator for VariantLines<'a, R> where R: io::Read {

    type Item = Result<VariantLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(row) = self.inner.next() {
            let row = match row {
                Ok(row) => row,
                Err(err) => return Some(Err(Error::from(err))),
            };
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            if let Some(item) = self.process(&row, line) {
                return Some(item);
            }
        }
        None
    }
}

#[inline]
fn to_fields(row: &StringRecord) -> Vec<String> {
    row.iter().map(|field| field.trim_end_matches('\r').to_owned()).collect()
}

/// Writer for annotated variants.
///
/// Each output row holds the five leading input columns, the annotation columns, and then the
/// remaining input columns.
pub struct Writer<W: io::Write> {
    inner: csv::Writer<W>,
}

impl<W: io::Write> Writer<W> {

    /// Creates an annotation writer from another writer.
    pub fn from_writer(in_writer: W) -> Writer<W> {
        Writer {
            inner: csv::WriterBuilder::new()
                .delimiter(b'\t')
                .quote_style(csv::QuoteStyle::Never)
                .flexible(true)
                .from_writer(in_writer),
        }
    }

    /// Writes the header row, given the input header columns.
    pub fn write_header<T: AsRef<str>>(&mut self, fields: &[T]) -> Result<()> {
        let annotation = ANNOTATION_COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        self.write_spliced(fields, &annotation)
    }

    /// Writes one annotation of the given variant.
    pub fn write_annotation(&mut self, variant: &Variant, annotation: &Annotation) -> Result<()> {
        self.write_spliced(variant.fields(), &annotation.fields())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(Error::from)
    }

    /// Flushes the writer and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner()
            .map_err(|e| Error::from(io::Error::new(e.error().kind(), e.error().to_string())))
    }

    fn write_spliced<T: AsRef<str>>(&mut self, fields: &[T], annotation: &[String]) -> Result<()> {
        let split = NUM_LEAD_COLUMNS.min(fields.len());
        let row = fields[..split].iter().map(|f| f.as_ref())
            .chain(annotation.iter().map(|a| a.as_str()))
            .chain(fields[split..].iter().map(|f| f.as_ref()));
        self.inner.write_record(row).map_err(Error::from)
    }
}

#[cfg(test)]
mod test_variant {
    use super::*;

    fn collect_lines(data: &str, format: InputFormat, has_header: bool) -> Vec<VariantLine> {
        let mut reader = Reader::from_reader(data.as_bytes())
            .with_format(format)
            .with_header(has_header);
        reader.lines().collect::<Result<Vec<_>>>().expect("variant lines")
    }

    const VCF: &str = "##fileformat=VCFv4.2\n\
                       ##contig=<ID=chr1>\n\
                       #CHROM\tPOS\tID\tREF\tALT\tQUAL\n\
                       chr1\t151\t.\tA\tG\t50\n\
                       \n\
                       chr2\t10\trs1\tC\tT\t.\n";

    #[test]
    fn vcf_with_header() {
        let lines = collect_lines(VCF, InputFormat::Vcf, true);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], VariantLine::Header(
            vec!["CHROM", "POS", "ID", "REF", "ALT", "QUAL"].into_iter()
                .map(String::from).collect()));
        match lines[1] {
            VariantLine::Record(ref var) => {
                assert_eq!(var.seq_name(), "chr1");
                assert_eq!(var.pos(), 150);
                assert_eq!(var.ref_allele(), "A");
                assert_eq!(var.alt_allele(), "G");
                assert_eq!(var.fields().len(), 6);
                assert_eq!(var.line(), 4);
            },
            ref otherwise => panic!("unexpected line: {:?}", otherwise),
        }
    }

    #[test]
    fn vcf_without_header() {
        let lines = collect_lines(VCF, InputFormat::Vcf, false);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| matches!(l, VariantLine::Record(_))));
    }

    #[test]
    fn tsv_with_header() {
        let data = "# comment\nchrom\tpos\tid\tref\talt\nchr1\t5\t.\tA\tT\n";
        let lines = collect_lines(data, InputFormat::Tsv, true);
        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0], VariantLine::Header(_)));
        assert!(matches!(lines[1], VariantLine::Record(_)));

        let lines = collect_lines("chr1\t5\t.\tA\tT\n#chr1\t6\t.\tA\tT\n", InputFormat::Tsv, false);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn invalid_rows() {
        let mut reader = Reader::from_reader("chr1\t5\t.\tA\n".as_bytes()).with_name("in.vcf");
        let err = reader.lines().next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "expected at least 5 columns, found 4, line 1 of file 'in.vcf'");

        let mut reader = Reader::from_reader("chr1\t0\t.\tA\tT\n".as_bytes());
        let err = reader.lines().next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "invalid position '0', line 1 of file '-'");

        let mut reader = Reader::from_reader("chr1\tx1\t.\tA\tT\n".as_bytes());
        assert!(reader.lines().next().unwrap().is_err());
    }

    #[test]
    fn writer_places_annotation_after_lead_columns() {
        let var = Variant::from_fields(
            vec!["chr1", "5", ".", "A", "T", "PASS", "DP=3"].into_iter()
                .map(String::from).collect(), 1).unwrap();
        let mut writer = Writer::from_writer(vec![]);
        writer.write_header(&["CHROM", "POS", "ID", "REF", "ALT", "FILTER"]).unwrap();
        writer.write_annotation(&var, &Annotation::intergenic()).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("CHROM\tPOS\tID\tREF\tALT\t\
                                      strand\ttranscript\tgene\tmutation\tsegment\tregion\t\
                                      ref_codon\talt_codon\taa_change\taa_change3\tclass\t\
                                      FILTER"));
        assert_eq!(lines.next(), Some("chr1\t5\t.\tA\tT\t\
                                      .\t.\t.\t.\tIntergenic\t.\t.\t.\t.\t.\t.\t\
                                      PASS\tDP=3"));
        assert_eq!(lines.next(), None);
    }
}
