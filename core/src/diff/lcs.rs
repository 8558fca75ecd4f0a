//! Longest-common-subsequence alignment of two line sequences.

/// One step of an edit script. Indices are 0-based positions in the old and
/// new sequences.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Edit {
    Keep(usize, usize),
    Delete(usize),
    Insert(usize),
}

impl Edit {
    pub(crate) fn is_change(self) -> bool {
        !matches!(self, Edit::Keep(..))
    }
}

/// Compute a minimal edit script turning `old` into `new`.
///
/// Lines shared at the start and end are matched directly. The remainder is
/// aligned by Hirschberg's divide and conquer, which finds the same LCS as
/// the full dynamic-programming table while keeping only two rows of it.
/// Within each run of changes, deletions come before insertions.
pub(crate) fn edit_script<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];

    let mut edits: Vec<Edit> = (0..prefix).map(|i| Edit::Keep(i, i)).collect();
    align(a, b, (prefix, prefix), &mut edits);

    let old_tail = old.len() - suffix;
    let new_tail = new.len() - suffix;
    edits.extend((0..suffix).map(|k| Edit::Keep(old_tail + k, new_tail + k)));

    deletes_first(&mut edits);
    edits
}

// `offset` is the position of `a[0]` and `b[0]` in the full sequences.
fn align<T: PartialEq>(a: &[T], b: &[T], offset: (usize, usize), edits: &mut Vec<Edit>) {
    let (i0, j0) = offset;

    if a.is_empty() {
        edits.extend((0..b.len()).map(|j| Edit::Insert(j0 + j)));
        return;
    }
    if b.is_empty() {
        edits.extend((0..a.len()).map(|i| Edit::Delete(i0 + i)));
        return;
    }

    if a.len() == 1 {
        match b.iter().position(|line| *line == a[0]) {
            Some(j) => {
                edits.extend((0..j).map(|k| Edit::Insert(j0 + k)));
                edits.push(Edit::Keep(i0, j0 + j));
                edits.extend((j + 1..b.len()).map(|k| Edit::Insert(j0 + k)));
            }
            None => {
                edits.push(Edit::Delete(i0));
                edits.extend((0..b.len()).map(|k| Edit::Insert(j0 + k)));
            }
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_row(a[..mid].iter(), b.iter(), b.len());
    let backward = lcs_row(a[mid..].iter().rev(), b.iter().rev(), b.len());

    // Split `b` where the two halves together keep the most lines. The
    // first best split gives the upper half fewer lines of `b`, which keeps
    // deletions ahead of insertions.
    let m = b.len();
    let mut split = 0;
    let mut best = 0;
    for j in 0..=m {
        let score = forward[j] + backward[m - j];
        if j == 0 || score > best {
            best = score;
            split = j;
        }
    }

    align(&a[..mid], &b[..split], (i0, j0), edits);
    align(&a[mid..], &b[split..], (i0 + mid, j0 + split), edits);
}

// Last row of the LCS table for `a` against every prefix of `b`:
// `row[j]` is the LCS length of all of `a` and the first `j` items of `b`.
fn lcs_row<'a, T, A, B>(a: A, b: B, m: usize) -> Vec<usize>
where
    T: PartialEq + 'a,
    A: Iterator<Item = &'a T>,
    B: Iterator<Item = &'a T> + Clone,
{
    let mut prev = vec![0; m + 1];
    let mut row = vec![0; m + 1];

    for x in a {
        for (j, y) in b.clone().enumerate() {
            row[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev
}

fn deletes_first(edits: &mut [Edit]) {
    let mut start = 0;
    while start < edits.len() {
        if !edits[start].is_change() {
            start += 1;
            continue;
        }

        let end = edits[start..]
            .iter()
            .position(|e| !e.is_change())
            .map_or(edits.len(), |n| start + n);

        // Stable: deletions and insertions each keep their own order.
        edits[start..end].sort_by_key(|e| matches!(e, Edit::Insert(_)));
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::Edit::*;
    use super::*;

    #[test]
    fn identical() {
        assert_eq!(
            edit_script(&["a", "b"], &["a", "b"]),
            vec![Keep(0, 0), Keep(1, 1)]
        );
    }

    #[test]
    fn empty_sides() {
        let empty: [&str; 0] = [];
        assert_eq!(edit_script(&empty, &empty), vec![]);
        assert_eq!(edit_script(&empty, &["a", "b"]), vec![Insert(0), Insert(1)]);
        assert_eq!(edit_script(&["a", "b"], &empty), vec![Delete(0), Delete(1)]);
    }

    #[test]
    fn replacement_deletes_before_inserts() {
        assert_eq!(
            edit_script(&["a", "x", "y", "b"], &["a", "p", "q", "b"]),
            vec![Keep(0, 0), Delete(1), Delete(2), Insert(1), Insert(2), Keep(3, 3)]
        );
    }

    #[test]
    fn interleaved() {
        assert_eq!(
            edit_script(
                &["Line 1", "Line 2", "Line 3"],
                &["Line 1", "Modified Line 2", "Line 3", "Line 4"]
            ),
            vec![Keep(0, 0), Delete(1), Insert(1), Keep(2, 2), Insert(3)]
        );
    }

    #[test]
    fn finds_longest_common_subsequence() {
        let old = ["a", "b", "c", "a", "b", "b", "a"];
        let new = ["c", "b", "a", "b", "a", "c"];
        let edits = edit_script(&old, &new);

        let keeps = edits.iter().filter(|e| !e.is_change()).count();
        assert_eq!(keeps, 4);

        // Replaying the script reproduces `new`.
        let rebuilt: Vec<&str> = edits
            .iter()
            .filter_map(|e| match *e {
                Keep(i, _) => Some(old[i]),
                Insert(j) => Some(new[j]),
                Delete(_) => None,
            })
            .collect();
        assert_eq!(rebuilt, new);
    }

    #[test]
    fn long_inputs_keep_every_common_line() {
        let old: Vec<String> = (0..3000).map(|n| format!("line {}", n)).collect();
        let new: Vec<String> = (0..3000)
            .map(|n| {
                if n % 3 == 1 {
                    format!("changed {}", n)
                } else {
                    format!("line {}", n)
                }
            })
            .collect();

        let edits = edit_script(&old, &new);
        assert_eq!(edits.iter().filter(|e| !e.is_change()).count(), 2000);
        assert_eq!(edits.iter().filter(|e| matches!(e, Delete(_))).count(), 1000);

        // Each single-line change is a delete followed by an insert.
        assert_eq!(&edits[..4], &[Keep(0, 0), Delete(1), Insert(1), Keep(2, 2)]);
    }
}
