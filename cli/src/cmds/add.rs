use super::{find_repo, App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use strand_on_disk::FileStatus;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("add")
        .about("Stage files for the next commit")
        .arg(
            Arg::with_name("path")
                .required(true)
                .multiple(true)
                .help("Files to stage; a directory stages every new or modified file beneath it"),
        )
}

pub(crate) fn run(_app: &mut App, matches: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;
    let mut work_tree = repo.work_tree()?;

    for arg in matches.values_of("path").into_iter().flatten() {
        let path = find_repo::repo_relative(&repo, arg)?;

        if !repo.work_dir().join(&path).is_dir() {
            work_tree.stage_file(&path)?;
            continue;
        }

        work_tree.update_status()?;
        let pending: Vec<String> = work_tree
            .files()
            .into_iter()
            .filter(|e| e.status == FileStatus::Untracked || e.status == FileStatus::Modified)
            .filter(|e| e.path.starts_with_dir(&path))
            .map(|e| e.path.to_string())
            .collect();

        for path in pending {
            work_tree.stage_file(&path)?;
        }
    }

    Ok(())
}
