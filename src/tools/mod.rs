//! Functions invoked by the subcommands.

pub mod annotate;

const TEMPLATE_SUBCMD: &str = "
USAGE:
    {usage}

ARGS:
{positionals}

OPTIONS:
{unified}";
