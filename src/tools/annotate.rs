use clap::{App, Arg, ArgMatches, SubCommand};

use vat::{AnnotationWriter, Annotator, Genome, InputFormat, Options, RefGeneReader,
          TranscriptIndex, VariantLine, VariantReader};

use super::TEMPLATE_SUBCMD;
use crate::utils::{resolve_reader, resolve_writer};

pub const NAME: &str = "annotate";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Annotates variants against transcripts of a refGene table")
        .template(TEMPLATE_SUBCMD)
        .arg(Arg::with_name("input")
                 .value_name("input")
                 .help("Path to input variant file or '-' for stdin")
                 .takes_value(true)
                 .required(true))
        .arg(Arg::with_name("refgene")
                 .value_name("refgene")
                 .help("Path to refGene transcript table")
                 .takes_value(true)
                 .required(true))
        .arg(Arg::with_name("reference")
                 .value_name("reference")
                 .help("Path to reference sequence FASTA file")
                 .takes_value(true)
                 .required(true))
        .arg(Arg::with_name("output")
                 .short("o")
                 .long("output")
                 .value_name("output")
                 .help("Path to output file or '-' for stdout")
                 .takes_value(true)
                 .default_value("-"))
        .arg(Arg::with_name("first-only")
                 .short("1")
                 .long("first-only")
                 .help("Annotates only the first overlapping transcript of each variant"))
        .arg(Arg::with_name("tsv")
                 .short("T")
                 .long("tsv")
                 .help("Reads the input as generic tab-separated values instead of VCF"))
        .arg(Arg::with_name("header")
                 .short("H")
                 .long("header")
                 .help("Reads the input header and writes an annotated output header"))
        .arg(Arg::with_name("verbose")
                 .short("v")
                 .long("verbose")
                 .help("Logs progress information to stderr"))
}

pub fn run(args: &ArgMatches) -> vat::Result<()> {
    let input = args.value_of("input").unwrap_or("-");
    let output = args.value_of("output").unwrap_or("-");
    let refgene = args.value_of("refgene").unwrap_or_default();
    let reference = args.value_of("reference").unwrap_or_default();
    let options = Options { first_only: args.is_present("first-only") };
    let format = if args.is_present("tsv") { InputFormat::Tsv } else { InputFormat::Vcf };

    let genome = Genome::from_file(reference)?;
    let index = TranscriptIndex::from_refgene(&mut RefGeneReader::from_file(refgene)?)?;
    let annotator = Annotator::new(&index, &genome, options);

    let mut reader = VariantReader::from_reader(resolve_reader(input)?)
        .with_name(input)
        .with_format(format)
        .with_header(args.is_present("header"));
    let mut writer = AnnotationWriter::from_writer(resolve_writer(output)?);

    let (mut num_variants, mut num_rows) = (0usize, 0usize);
    for item in reader.lines() {
        match item? {
            VariantLine::Header(fields) => writer.write_header(&fields)?,
            VariantLine::Record(variant) => {
                let annotations = annotator.annotate(&variant)
                    .map_err(|e| e.at_line(input, variant.line()))?;
                for annotation in annotations.iter() {
                    writer.write_annotation(&variant, annotation)?;
                }
                num_variants += 1;
                num_rows += annotations.len();
            },
        }
    }
    writer.flush()?;
    info!("annotated {} variant(s) into {} row(s)", num_variants, num_rows);
    Ok(())
}
