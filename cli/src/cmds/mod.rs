use tracing::debug;

use crate::{App, Result};

mod add;
mod apply;
mod branch;
mod checkout;
mod commit;
mod diff;
mod find_repo;
mod hash_object;
mod init;
mod log;
mod push;
mod remote;
mod reset;
mod status;

pub(crate) fn add_subcommands<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
    app.subcommand(add::subcommand())
        .subcommand(apply::subcommand())
        .subcommand(branch::subcommand())
        .subcommand(checkout::subcommand())
        .subcommand(commit::subcommand())
        .subcommand(diff::subcommand())
        .subcommand(hash_object::subcommand())
        .subcommand(init::subcommand())
        .subcommand(log::subcommand())
        .subcommand(push::subcommand())
        .subcommand(remote::subcommand())
        .subcommand(reset::subcommand())
        .subcommand(status::subcommand())
}

pub(crate) fn dispatch(app: &mut App) -> Result<()> {
    let matches = app.arg_matches.clone();
    // ^^ Ugh. Need an independent copy of matches so we can still pass
    // the App struct through to subcommand imps.

    if let (name, Some(_)) = matches.subcommand() {
        debug!(command = name, "Dispatching");
    }

    match matches.subcommand() {
        ("add", Some(m)) => add::run(app, &m),
        ("apply", Some(m)) => apply::run(app, &m),
        ("branch", Some(m)) => branch::run(app, &m),
        ("checkout", Some(m)) => checkout::run(app, &m),
        ("commit", Some(m)) => commit::run(app, &m),
        ("diff", Some(m)) => diff::run(app, &m),
        ("hash-object", Some(m)) => hash_object::run(app, &m),
        ("init", Some(m)) => init::run(app, &m),
        ("log", Some(m)) => log::run(app, &m),
        ("push", Some(m)) => push::run(app, &m),
        ("remote", Some(m)) => remote::run(app, &m),
        ("reset", Some(m)) => reset::run(app, &m),
        ("status", Some(m)) => status::run(app, &m),
        _ => unreachable!(),
        // unreachable: Should have exited out with appropriate help or
        // error message if no subcommand was given.
    }
}

/// Parse a numeric option, naming the option in the error.
pub(crate) fn parse_count(matches: &clap::ArgMatches, name: &str) -> Result<Option<usize>> {
    match matches.value_of(name) {
        Some(value) => value.parse::<usize>().map(Some).map_err(|_| {
            format!("--{} expects a non-negative number, got {:?}", name, value).into()
        }),
        None => Ok(None),
    }
}
