use std::io::Write;

use super::{find_repo, parse_count, App, Result};

use chrono::{FixedOffset, TimeZone};
use clap::{Arg, ArgMatches, SubCommand};
use strand_core::object::Attribution;

const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("log")
        .about("Show commit history of the current branch, newest first")
        .arg(
            Arg::with_name("max-count")
                .short("n")
                .long("max-count")
                .takes_value(true)
                .value_name("count")
                .help("Show at most this many commits"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let max_count = parse_count(matches, "max-count")?.unwrap_or(0);
    let repo = find_repo::from_current_dir()?;

    for (n, commit) in repo.history(max_count)?.enumerate() {
        if n > 0 {
            writeln!(app)?;
        }

        writeln!(app, "commit {}", commit.id())?;
        let author = commit.author();
        writeln!(app, "Author: {} <{}>", author.name(), author.email())?;
        writeln!(app, "Date:   {}", format_date(author))?;
        writeln!(app)?;

        for line in commit.message().lines() {
            writeln!(app, "    {}", line)?;
        }
    }

    Ok(())
}

/// Render a commit timestamp in its recorded time zone. Falls back to the
/// raw value if it is out of chrono's range.
fn format_date(author: &Attribution) -> String {
    FixedOffset::east_opt(i32::from(author.tz_offset()) * 60)
        .and_then(|tz| tz.timestamp_opt(author.timestamp(), 0).single())
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| format!("{} {}", author.timestamp(), author.format_tz()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serial_test::serial;

    use crate::test_support::InRepo;

    #[test]
    fn dates() {
        let utc = Attribution::new("A", "a@example.com", 1_600_000_000);
        assert_eq!(format_date(&utc), "Sun Sep 13 12:26:40 2020 +0000");

        let east = Attribution::parse(b"A <a@example.com> 1600000000 +0530").unwrap();
        assert_eq!(format_date(&east), "Sun Sep 13 17:56:40 2020 +0530");

        let west = Attribution::parse(b"A <a@example.com> 0 -0800").unwrap();
        assert_eq!(format_date(&west), "Wed Dec 31 16:00:00 1969 -0800");
    }

    #[test]
    #[serial]
    fn newest_first() {
        let mut r = InRepo::new();
        for n in 1..=3 {
            r.repo.write_file("a.txt", &format!("{}\n", n));
            r.repo.commit_files(&format!("commit {}\n\nbody {}", n, n), &["a.txt"]);
        }

        let stdout = r.ok(&["log"]);
        let commits: Vec<&str> = stdout.split("\ncommit ").collect();
        assert_eq!(commits.len(), 3);

        assert!(stdout.starts_with("commit "));
        assert!(commits[0].contains("\n    commit 3\n    \n    body 3\n"));
        assert!(commits[2].contains("\n    commit 1\n"));
        assert!(stdout.contains("\nAuthor: "));
        assert!(stdout.contains("\nDate:   "));

        let head = r.repo.repo().head_commit().unwrap();
        assert!(stdout.starts_with(&format!("commit {}\n", head.id())));
    }

    #[test]
    #[serial]
    fn max_count() {
        let mut r = InRepo::new();
        for n in 1..=3 {
            r.repo.write_file("a.txt", &format!("{}\n", n));
            r.repo.commit_files(&format!("commit {}", n), &["a.txt"]);
        }

        let stdout = r.ok(&["log", "-n", "2"]);
        assert_eq!(stdout.matches("\ncommit ").count(), 1);
        assert!(stdout.contains("    commit 3\n"));
        assert!(stdout.contains("    commit 2\n"));
        assert!(!stdout.contains("    commit 1\n"));

        let err = r.err(&["log", "-n", "many"]);
        assert!(err.contains("non-negative number"), "{}", err);
    }

    #[test]
    #[serial]
    fn empty_branch() {
        let r = InRepo::new();
        assert_eq!(r.ok(&["log"]), "");
    }
}
