use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;

use super::*;

const OLD: &str = "Line 1\nLine 2\nLine 3\n";
const NEW: &str = "Line 1\nModified Line 2\nLine 3\nLine 4\n";

#[test]
fn example_yields_one_hunk() {
    let d = diff_text(OLD, NEW, DEFAULT_CONTEXT_LINES);

    assert_eq!(d.old_label, "a");
    assert_eq!(d.new_label, "b");
    assert_eq!(d.hunks.len(), 1);

    let h = &d.hunks[0];
    assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (1, 3, 1, 4));
    assert_eq!(d.line_counts(), (2, 1));

    assert_eq!(d.apply_to_str(OLD).unwrap(), NEW);
}

#[test]
fn identical_texts_have_no_hunks() {
    assert!(diff_text(OLD, OLD, 3).is_empty());
    assert!(diff_text("", "", 3).is_empty());
}

#[test]
fn pure_insertion_and_deletion() {
    let d = diff_text("", "a\nb\n", 3);
    let h = &d.hunks[0];
    assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (0, 0, 1, 2));
    assert_eq!(d.apply_to_str("").unwrap(), "a\nb\n");

    let d = diff_text("a\nb\n", "", 3);
    let h = &d.hunks[0];
    assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (1, 2, 0, 0));
    assert_eq!(d.apply_to_str("a\nb\n").unwrap(), "");
}

#[test]
fn zero_context_insertion_names_preceding_line() {
    let d = diff_text("a\nb\nc\n", "a\nb\nnew\nc\n", 0);
    assert_eq!(d.hunks.len(), 1);

    let h = &d.hunks[0];
    assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (2, 0, 3, 1));
    assert_eq!(h.lines, vec![DiffLine::new(LineTag::Added, "new")]);
    assert_eq!(d.to_string(), "--- a\n+++ b\n@@ -2,0 +3,1 @@\n+new\n");
    assert_eq!(d.apply_to_str("a\nb\nc\n").unwrap(), "a\nb\nnew\nc\n");
}

#[test]
fn distant_changes_get_separate_hunks() {
    let old: Vec<String> = (1..=20).map(|n| format!("line {}", n)).collect();
    let mut new = old.clone();
    new[1] = "changed 2".to_string();
    new[17] = "changed 18".to_string();

    let old_text = old.join("\n") + "\n";
    let new_text = new.join("\n") + "\n";

    let d = diff_text(&old_text, &new_text, 3);
    assert_eq!(d.hunks.len(), 2);
    assert_eq!(
        (d.hunks[0].old_start, d.hunks[0].old_count),
        (1, 5)
    );
    assert_eq!(
        (d.hunks[1].old_start, d.hunks[1].old_count),
        (15, 6)
    );
    assert_eq!(d.apply_to_str(&old_text).unwrap(), new_text);

    // Changes six lines apart are merged with three lines of context.
    let mut near = old.clone();
    near[1] = "changed 2".to_string();
    near[8] = "changed 9".to_string();
    let d = diff_text(&old_text, &(near.join("\n") + "\n"), 3);
    assert_eq!(d.hunks.len(), 1);
}

#[test]
fn keeps_trailing_newline_convention() {
    let d = diff_text("a\nb", "a\nc", 3);
    assert_eq!(d.apply_to_str("a\nb").unwrap(), "a\nc");
    assert_eq!(d.apply_to_str("a\nb\n").unwrap(), "a\nc\n");
}

#[test]
fn carriage_returns_are_content() {
    let d = diff_text("a\r\nb\r\n", "a\r\nc\r\n", 3);
    assert_eq!(d.hunks[0].lines[0], DiffLine::new(LineTag::Context, "a\r"));
    assert_eq!(d.apply_to_str("a\r\nb\r\n").unwrap(), "a\r\nc\r\n");
}

#[test]
fn stale_patch_is_refused() {
    let d = diff_text(OLD, NEW, 3);

    match d.apply_to_str("Line 1\nSomething else\nLine 3\n").unwrap_err() {
        Error::HunkMismatch { hunk, line } => {
            assert_eq!(hunk, 0);
            assert_eq!(line, 2);
        }
        err => panic!("wrong error: {:?}", err),
    }

    // Target too short for the hunk.
    assert!(matches!(
        d.apply_to_str("Line 1\n"),
        Err(Error::HunkMismatch { hunk: 0, .. })
    ));
}

#[test]
fn inconsistent_counts_are_refused() {
    let mut d = diff_text(OLD, NEW, 3);
    d.hunks[0].old_count = 2;
    assert!(matches!(
        d.apply_to_str(OLD),
        Err(Error::HunkMismatch { hunk: 0, .. })
    ));
}

#[test]
fn overlapping_hunks_are_refused() {
    let mut d = diff_text(OLD, NEW, 3);
    let copy = d.hunks[0].clone();
    d.hunks.push(copy);

    match d.apply_to_str(OLD).unwrap_err() {
        Error::HunkMismatch { hunk, .. } => assert_eq!(hunk, 1),
        err => panic!("wrong error: {:?}", err),
    }
}

#[test]
fn hunks_apply_in_position_order() {
    let old = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
    let new = "one\n2\n3\n4\n5\n6\n7\n8\n9\nten\n";
    let mut d = diff_text(old, new, 1);
    assert_eq!(d.hunks.len(), 2);

    d.hunks.reverse();
    assert_eq!(d.apply_to_str(old).unwrap(), new);
}

#[test]
fn apply_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hello.txt");
    fs::write(&path, OLD).unwrap();

    let d = diff_text(OLD, NEW, 3);
    d.apply_to_file(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), NEW);
}

#[test]
fn failed_apply_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hello.txt");
    let stale = "Line 1\nLine two\nLine 3\n";
    fs::write(&path, stale).unwrap();

    let d = diff_text(OLD, NEW, 3);
    assert!(matches!(
        d.apply_to_file(&path),
        Err(Error::HunkMismatch { .. })
    ));
    assert_eq!(fs::read(&path).unwrap(), stale.as_bytes());

    // No temporary files are left behind.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn apply_to_missing_file() {
    let dir = TempDir::new().unwrap();
    let d = diff_text(OLD, NEW, 3);
    assert!(matches!(
        d.apply_to_file(&dir.path().join("nope")),
        Err(Error::Io(_))
    ));
}

#[test]
fn diff_files_labels() {
    let dir = TempDir::new().unwrap();
    let old_path = dir.path().join("old.txt");
    let new_path = dir.path().join("new.txt");
    fs::write(&old_path, OLD).unwrap();
    fs::write(&new_path, NEW).unwrap();

    let d = diff_files(&old_path, &new_path, 3).unwrap();
    assert_eq!(d.old_label, old_path.display().to_string());
    assert_eq!(d.new_label, new_path.display().to_string());
    assert_eq!(d.hunks, diff_text(OLD, NEW, 3).hunks);
}

fn text() -> impl Strategy<Value = String> {
    // A small alphabet makes repeated lines (and so interesting alignments) likely.
    proptest::collection::vec(prop_oneof!["a", "b", "c", "", "dd"], 0..24).prop_map(|lines| {
        let mut s = lines.join("\n");
        if !s.is_empty() {
            s.push('\n');
        }
        s
    })
}

proptest! {
    #[test]
    fn apply_reproduces_new(old in text(), new in text(), context in 0usize..5) {
        let d = diff_text(&old, &new, context);
        let expected = if new.is_empty() { String::new() } else { new.clone() };
        prop_assert_eq!(d.apply_to_str(&old).unwrap(), expected);
    }

    #[test]
    fn parse_inverts_display(old in text(), new in text(), context in 0usize..5) {
        let d = diff_text(&old, &new, context);
        let parsed: FileDiff = d.to_string().parse().unwrap();
        prop_assert_eq!(parsed, d);
    }

    #[test]
    fn self_diff_is_empty(x in text(), context in 0usize..5) {
        prop_assert!(diff_text(&x, &x, context).is_empty());
    }

    #[test]
    fn hunks_are_ordered_and_disjoint(old in text(), new in text(), context in 0usize..5) {
        let d = diff_text(&old, &new, context);
        for pair in d.hunks.windows(2) {
            prop_assert!(pair[0].old_start + pair[0].old_count <= pair[1].old_start);
            prop_assert!(pair[0].new_start + pair[0].new_count <= pair[1].new_start);
        }
    }
}
