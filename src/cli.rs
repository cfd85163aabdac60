use clap::{App, AppSettings, ArgMatches};

use crate::tools;

const TEMPLATE: &str = "
{bin} {version}
{about}


USAGE:
    {usage}

SUBCOMMANDS:
{subcommands}

OPTIONS:
{unified}";

const ABOUT: &str = "
vatools annotates short genomic variants against gene transcript models,
reporting their coding coordinates, codon changes, and predicted effect on
the encoded protein.";

/// Constructs a new `clap::App` for argument parsing.
pub fn build_cli() -> App<'static, 'static> {
    App::new("vatools")
        .version(crate_version!())
        .author(crate_authors!())
        .about(ABOUT)
        .template(TEMPLATE)
        .max_term_width(80)
        .settings(&[AppSettings::GlobalVersion,
                    AppSettings::SubcommandRequiredElseHelp,
                    AppSettings::DisableHelpSubcommand,
                    AppSettings::VersionlessSubcommands])
        .subcommand(tools::annotate::build_cli())
}

/// Runs the appropriate tool given the subcommand argument matches.
pub fn run(matches: &ArgMatches) -> vat::Result<()> {
    match matches.subcommand() {
        (tools::annotate::NAME, Some(m)) => tools::annotate::run(m),
        // Subcommands are required by the app settings.
        _ => unreachable!(),
    }
}
