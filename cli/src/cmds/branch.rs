use std::io::Write;

use super::{find_repo, App, Result};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("branch")
        .about("List branches, or create one at the head commit")
        .arg(Arg::with_name("name").help("The branch to create"))
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let mut repo = find_repo::from_current_dir()?;

    if let Some(name) = matches.value_of("name") {
        let id = repo.create_branch(name)?;
        writeln!(app, "Created branch {} at {}", name, id.short())?;
        return Ok(());
    }

    let current = repo.current_branch()?;
    for (name, id) in repo.branches()? {
        let marker = if current.as_deref() == Some(name.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(app, "{} {} {}", marker, name, id.short())?;
    }

    Ok(())
}
