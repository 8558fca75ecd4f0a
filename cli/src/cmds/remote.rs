use std::{io::Write, path::Path};

use super::{find_repo, App, Result};

use clap::{AppSettings, Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("remote")
        .about("Manage the repositories branches can be pushed to")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("add")
                .about("Register a remote repository")
                .arg(Arg::with_name("name").required(true))
                .arg(
                    Arg::with_name("path")
                        .required(true)
                        .help("Work dir of the other repository"),
                ),
        )
        .subcommand(
            SubCommand::with_name("remove")
                .about("Forget a remote repository")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(SubCommand::with_name("list").about("List registered remotes"))
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let mut repo = find_repo::from_current_dir()?;

    match matches.subcommand() {
        ("add", Some(m)) => {
            let name = m.value_of("name").unwrap_or_default();
            let path = Path::new(m.value_of("path").unwrap_or_default());
            repo.add_remote(name, path)?;
        }
        ("remove", Some(m)) => {
            repo.remove_remote(m.value_of("name").unwrap_or_default())?;
        }
        _ => {
            for (name, path) in repo.remotes() {
                writeln!(app, "{}\t{}", name, path.display())?;
            }
        }
    }

    Ok(())
}
