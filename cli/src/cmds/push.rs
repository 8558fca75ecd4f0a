use std::io::Write;

use super::{find_repo, App, Result};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("push")
        .about("Publish a branch to a registered remote")
        .arg(
            Arg::with_name("remote")
                .default_value("origin")
                .help("The remote to push to"),
        )
        .arg(
            Arg::with_name("branch").help("The branch to push (default: the current branch)"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let remote = matches.value_of("remote").unwrap_or("origin");
    let branch = matches.value_of("branch");

    let repo = find_repo::from_current_dir()?;
    let outcome = repo.push(remote, branch)?;

    let branch = match branch {
        Some(name) => name.to_string(),
        None => repo.current_branch()?.unwrap_or_default(),
    };
    writeln!(app, "{} {}: {}", remote, branch, outcome)?;
    Ok(())
}
