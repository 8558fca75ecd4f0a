use std::io::Write;

use super::{find_repo, App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use strand_core::repo::ObjectStore;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("commit")
        .about("Record the staged files as a new commit")
        .arg(
            Arg::with_name("message")
                .short("m")
                .long("message")
                .takes_value(true)
                .required(true)
                .help("The commit message"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let message = matches.value_of("message").unwrap_or_default();

    let mut repo = find_repo::from_current_dir()?;
    let id = repo.commit_staged(message)?;
    let commit = repo.get_commit(&id)?;

    let branch = repo.current_branch()?.unwrap_or_else(|| "HEAD".to_string());
    let summary = commit.message().lines().next().unwrap_or("");
    writeln!(app, "[{} {}] {}", branch, id.short(), summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use crate::test_support::InRepo;

    #[test]
    #[serial]
    fn commits_staged_files() {
        let mut r = InRepo::new();
        r.repo.write_file("a.txt", "a\n").write_file("b.txt", "b\n");
        r.ok(&["add", "a.txt"]);

        let stdout = r.ok(&["commit", "-m", "Add a\n\nLonger description."]);

        let head = r.repo.repo().head_commit().unwrap();
        assert_eq!(stdout, format!("[master {}] Add a\n", head.id().short()));
        assert_eq!(head.message(), "Add a\n\nLonger description.");
        assert_eq!(head.files().len(), 1);
        assert!(head.file("a.txt").is_some());

        assert_eq!(r.ok(&["status"]), "On branch master\n\nUntracked:\n  b.txt\n");
    }

    #[test]
    #[serial]
    fn error_nothing_staged() {
        let r = InRepo::new();
        assert_eq!(r.err(&["commit", "-m", "empty"]), "nothing staged to commit");
    }

    #[test]
    #[serial]
    fn error_no_message() {
        let r = InRepo::new();
        let err = r.err(&["commit"]);
        assert!(err.contains("--message"), "{}", err);
    }
}
