use std::io::Write;

use super::{find_repo, App, Result};

use clap::{Arg, ArgGroup, ArgMatches, SubCommand};
use strand_core::object::{
    Commit, ContentSource, FileContentSource, Kind, Object, ReadContentSource,
};
use strand_core::repo::ObjectStore;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("hash-object")
        .about("Compute object ID and optionally store the content as an object")
        .arg(
            Arg::with_name("w")
                .short("w")
                .help("Actually write the object into the object store"),
        )
        .arg(
            Arg::with_name("t")
                .short("t")
                .value_name("kind")
                .possible_values(&["blob", "commit"])
                .default_value("blob")
                .help("Kind of object to create"),
        )
        .arg(
            Arg::with_name("stdin")
                .long("stdin")
                .help("Read the object from standard input instead of from a file"),
        )
        .arg(Arg::with_name("file").help("The file to hash"))
        .group(
            ArgGroup::with_name("source")
                .args(&["stdin", "file"])
                .required(true),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let source: Box<dyn ContentSource> = if matches.is_present("stdin") {
        Box::new(ReadContentSource::new(&mut app.stdin)?)
    } else {
        // The "source" group guarantees a file when --stdin is absent.
        let file = matches.value_of("file").unwrap_or_default();
        Box::new(FileContentSource::new(file)?)
    };

    let kind = match matches.value_of("t") {
        Some("commit") => {
            Commit::parse(&source.read_to_vec()?)?;
            Kind::Commit
        }
        _ => Kind::Blob,
    };

    let mut object = Object::new(kind, source);
    let id = if matches.is_present("w") {
        let mut repo = find_repo::from_current_dir()?;
        repo.put_object(&mut object)?
    } else {
        object.assign_id()?
    };

    writeln!(app, "{}", id)?;
    Ok(())
}
