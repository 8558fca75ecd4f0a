use std::{fs, io::Write, path::Path};

use super::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use strand_core::diff::FileDiff;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("apply")
        .about("Apply a single-file unified diff to a file")
        .arg(
            Arg::with_name("patch")
                .required(true)
                .help("The diff to apply"),
        )
        .arg(
            Arg::with_name("target")
                .required(true)
                .help("The file to patch in place"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let patch = matches.value_of("patch").unwrap_or_default();
    let target = Path::new(matches.value_of("target").unwrap_or_default());

    let diff: FileDiff = fs::read_to_string(patch)?.parse()?;
    diff.apply_to_file(target)?;

    writeln!(
        app,
        "Applied {} hunk(s) to {}",
        diff.hunks.len(),
        target.display()
    )?;
    Ok(())
}
