use std::io::Write;

use super::{find_repo, App, Result};

use clap::{ArgMatches, SubCommand};
use strand_core::path::RepoPath;
use strand_on_disk::Head;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("status").about("Show the working tree status")
}

pub(crate) fn run(app: &mut App, _matches: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;

    match repo.head()? {
        Head::Branch(name) => writeln!(app, "On branch {}", name)?,
        Head::Detached(id) => writeln!(app, "HEAD detached at {}", id.short())?,
    }

    let mut work_tree = repo.work_tree()?;
    work_tree.update_status()?;
    let summary = work_tree.summary();

    let groups: [(&str, &[RepoPath]); 4] = [
        ("Staged for commit", summary.staged.as_slice()),
        ("Modified", summary.modified.as_slice()),
        ("Deleted", summary.deleted.as_slice()),
        ("Untracked", summary.untracked.as_slice()),
    ];

    if groups.iter().all(|(_, paths)| paths.is_empty()) {
        writeln!(app, "Nothing to commit, working tree clean")?;
        return Ok(());
    }

    for (title, paths) in groups.iter() {
        if paths.is_empty() {
            continue;
        }

        writeln!(app, "\n{}:", title)?;
        for path in paths.iter() {
            writeln!(app, "  {}", path)?;
        }
    }

    Ok(())
}
