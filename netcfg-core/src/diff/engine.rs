use crate::diff::result::DiffEntry;

/// Configures line diff behavior.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Include [`DiffEntry::Identical`] rows.
    pub include_identical: bool,
    /// Lines starting with any of these prefixes (after trimming) are skipped.
    pub ignore_prefixes: Vec<String>,
    /// Compare lines with trailing whitespace removed.
    pub trim_trailing: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            include_identical: false,
            ignore_prefixes: Vec::new(),
            trim_trailing: true,
        }
    }
}

/// Diff two configuration texts with default options.
pub fn diff(left: &str, right: &str) -> Vec<DiffEntry> {
    diff_with_options(left, right, &DiffOptions::default())
}

/// Diff two configuration texts with custom options.
///
/// Lines are aligned on their longest common subsequence; removals are
/// reported before additions inside each changed hunk. Memory stays linear in
/// the number of lines.
pub fn diff_with_options(left: &str, right: &str, opts: &DiffOptions) -> Vec<DiffEntry> {
    let left_lines = collect_lines(left, opts);
    let right_lines = collect_lines(right, opts);
    let left_text: Vec<&str> = left_lines.iter().map(|(_, text)| *text).collect();
    let right_text: Vec<&str> = right_lines.iter().map(|(_, text)| *text).collect();

    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    for (mi, mj) in matched_pairs(&left_text, &right_text) {
        push_hunk(&mut out, &left_lines[i..mi], &right_lines[j..mj]);
        if opts.include_identical {
            out.push(DiffEntry::Identical {
                line: left_lines[mi].0,
                text: left_lines[mi].1.to_string(),
            });
        }
        i = mi + 1;
        j = mj + 1;
    }
    push_hunk(&mut out, &left_lines[i..], &right_lines[j..]);
    out
}

fn push_hunk(out: &mut Vec<DiffEntry>, removed: &[(usize, &str)], added: &[(usize, &str)]) {
    out.extend(removed.iter().map(|(line, text)| DiffEntry::Removed {
        line: *line,
        text: text.to_string(),
    }));
    out.extend(added.iter().map(|(line, text)| DiffEntry::Added {
        line: *line,
        text: text.to_string(),
    }));
}

fn collect_lines<'a>(text: &'a str, opts: &DiffOptions) -> Vec<(usize, &'a str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            let line = if opts.trim_trailing {
                line.trim_end()
            } else {
                line
            };
            (idx + 1, line)
        })
        .filter(|(_, line)| !line.trim().is_empty() && !should_ignore(line, opts))
        .collect()
}

fn should_ignore(line: &str, opts: &DiffOptions) -> bool {
    let trimmed = line.trim_start();
    opts.ignore_prefixes
        .iter()
        .any(|prefix| trimmed.starts_with(prefix.as_str()))
}

/// Index pairs of one longest common subsequence, in order.
///
/// The common head and tail are matched directly; only the middle goes
/// through the divide-and-conquer search.
fn matched_pairs(left: &[&str], right: &[&str]) -> Vec<(usize, usize)> {
    let head = left
        .iter()
        .zip(right)
        .take_while(|(l, r)| l == r)
        .count();
    let tail = left[head..]
        .iter()
        .rev()
        .zip(right[head..].iter().rev())
        .take_while(|(l, r)| l == r)
        .count();

    let mut pairs: Vec<(usize, usize)> = (0..head).map(|k| (k, k)).collect();
    split_lcs(
        &left[head..left.len() - tail],
        &right[head..right.len() - tail],
        (head, head),
        &mut pairs,
    );
    let (left_tail, right_tail) = (left.len() - tail, right.len() - tail);
    pairs.extend((0..tail).map(|k| (left_tail + k, right_tail + k)));
    pairs
}

/// Hirschberg split: halve `left`, find where `right` divides so both halves
/// keep an optimal LCS, recurse.
fn split_lcs(
    left: &[&str],
    right: &[&str],
    offset: (usize, usize),
    out: &mut Vec<(usize, usize)>,
) {
    if left.is_empty() || right.is_empty() {
        return;
    }
    if left.len() == 1 {
        if let Some(j) = right.iter().position(|line| *line == left[0]) {
            out.push((offset.0, offset.1 + j));
        }
        return;
    }

    let mid = left.len() / 2;
    let forward = lcs_row(left[..mid].iter().copied(), right.iter().copied());
    let backward = lcs_row(left[mid..].iter().rev().copied(), right.iter().rev().copied());
    let n = right.len();
    let split = (0..=n)
        .max_by_key(|&k| (forward[k] + backward[n - k], std::cmp::Reverse(k)))
        .unwrap_or(0);

    split_lcs(&left[..mid], &right[..split], offset, out);
    split_lcs(
        &left[mid..],
        &right[split..],
        (offset.0 + mid, offset.1 + split),
        out,
    );
}

/// Last row of the LCS length table: `row[j]` is the LCS of `left` and the
/// first `j` items of `right`.
fn lcs_row<'l, 'r>(
    left: impl Iterator<Item = &'l str>,
    right: impl Iterator<Item = &'r str> + Clone,
) -> Vec<usize> {
    let width = right.clone().count();
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];
    for l in left {
        for (j, r) in right.clone().enumerate() {
            cur[j + 1] = if l == r {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}
