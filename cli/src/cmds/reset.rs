use super::{find_repo, App, Result};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("reset")
        .about("Unstage files")
        .arg(
            Arg::with_name("path")
                .required(true)
                .multiple(true)
                .help("Staged files to unstage"),
        )
}

pub(crate) fn run(_app: &mut App, matches: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;
    let mut work_tree = repo.work_tree()?;

    for arg in matches.values_of("path").into_iter().flatten() {
        let path = find_repo::repo_relative(&repo, arg)?;
        work_tree.unstage_file(&path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use strand_on_disk::FileStatus;

    use crate::test_support::InRepo;

    #[test]
    #[serial]
    fn unstages() {
        let mut r = InRepo::new();
        r.repo.write_file("a.txt", "a\n");
        r.ok(&["add", "a.txt"]);
        r.ok(&["reset", "a.txt"]);

        let wt = r.repo.repo().work_tree().unwrap();
        assert_eq!(wt.entry("a.txt").unwrap().status, FileStatus::Untracked);
    }

    #[test]
    #[serial]
    fn error_not_staged() {
        let mut r = InRepo::new();
        r.repo.write_file("a.txt", "a\n");

        let err = r.err(&["reset", "a.txt"]);
        assert_eq!(err, "path a.txt is not staged");
    }
}
