use std::io::Write;

use super::{find_repo, parse_count, App, Result};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("diff")
        .about("Show work tree changes, or changes between two commits")
        .arg(
            Arg::with_name("unified")
                .short("U")
                .long("unified")
                .takes_value(true)
                .value_name("lines")
                .help("Lines of context around each change"),
        )
        .arg(
            Arg::with_name("old")
                .requires("new")
                .help("Older revision (branch, HEAD, or commit ID)"),
        )
        .arg(Arg::with_name("new").help("Newer revision"))
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;
    let context = match parse_count(matches, "unified")? {
        Some(lines) => lines,
        None => repo.config().diff.context_lines,
    };

    let diffs = match (matches.value_of("old"), matches.value_of("new")) {
        (Some(old), Some(new)) => {
            repo.diff_commits(&repo.resolve(old)?, &repo.resolve(new)?, context)?
        }
        _ => repo.diff_work_tree(context)?,
    };

    for diff in diffs {
        write!(app, "{}", diff)?;
    }

    Ok(())
}
