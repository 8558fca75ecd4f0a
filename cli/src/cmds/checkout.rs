use std::io::Write;

use super::{find_repo, App, Result};

use clap::{Arg, ArgMatches, SubCommand};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("checkout")
        .about("Switch the work tree to another branch")
        .arg(
            Arg::with_name("branch")
                .required(true)
                .help("The branch to switch to"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let name = matches.value_of("branch").unwrap_or_default();

    let mut repo = find_repo::from_current_dir()?;
    repo.checkout_branch(name)?;

    writeln!(app, "Switched to branch '{}'", name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use crate::test_support::InRepo;

    #[test]
    #[serial]
    fn switches() {
        let mut r = InRepo::new();
        r.repo.write_file("a.txt", "master\n");
        r.repo.commit_files("first", &["a.txt"]);
        r.ok(&["branch", "topic"]);

        assert_eq!(r.ok(&["checkout", "topic"]), "Switched to branch 'topic'\n");

        r.repo.write_file("a.txt", "topic\n");
        r.ok(&["add", "a.txt"]);
        r.ok(&["commit", "-m", "on topic"]);

        r.ok(&["checkout", "master"]);
        assert_eq!(r.repo.read_file("a.txt"), "master\n");
        assert!(r.ok(&["status"]).starts_with("On branch master\n"));
    }

    #[test]
    #[serial]
    fn refuses_dirty_tree() {
        let mut r = InRepo::new();
        r.repo.write_file("a.txt", "a\n");
        r.repo.commit_files("first", &["a.txt"]);
        r.ok(&["branch", "topic"]);

        r.repo.write_file("a.txt", "uncommitted\n");
        assert_eq!(
            r.err(&["checkout", "topic"]),
            "work tree has uncommitted changes: a.txt"
        );
        assert_eq!(r.repo.read_file("a.txt"), "uncommitted\n");
    }

    #[test]
    #[serial]
    fn error_missing_branch() {
        let r = InRepo::new();
        let err = r.err(&["checkout", "nope"]);
        assert!(err.contains("nope"), "{}", err);
    }
}
