//! Ordered sequence alignment into an edit script.

use std::ops::Range;

/// The kind of edit a run represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// A contiguous run of the edit script, covering `a` in the first sequence
/// and `b` in the second. For `Delete` the `b` range is empty, for `Insert`
/// the `a` range is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

impl Opcode {
    /// Number of elements covered across both sides. Equal runs count one
    /// side only (the sides are identical by definition).
    pub fn element_count(&self) -> usize {
        match self.tag {
            OpTag::Equal => self.a.len(),
            _ => self.a.len() + self.b.len(),
        }
    }
}

/// Align two ordered sequences into a minimal edit script of maximal runs.
///
/// Matching is by longest common subsequence, so the number of deleted plus
/// inserted elements is minimal. Consecutive matched elements coalesce into
/// a single `Equal` run; each gap between equal runs becomes one `Replace`
/// (both sides present), `Delete` or `Insert` run. Identical inputs yield a
/// single `Equal` run; two empty inputs yield an empty script.
pub fn diff_slices<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let n = a.len();
    let m = b.len();

    // LCS length table, indexed [i][j] = LCS of a[i..] and b[j..].
    let idx = |i: usize, j: usize| i * (m + 1) + j;
    let mut table = vec![0usize; (n + 1) * (m + 1)];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[idx(i, j)] = if a[i] == b[j] {
                table[idx(i + 1, j + 1)] + 1
            } else {
                table[idx(i + 1, j)].max(table[idx(i, j + 1)])
            };
        }
    }

    // Walk the table forward, emitting a gap run before each equal run.
    let mut ops: Vec<Opcode> = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut gap_a, mut gap_b) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            push_gap(&mut ops, gap_a..i, gap_b..j);
            let (start_a, start_b) = (i, j);
            while i < n && j < m && a[i] == b[j] {
                i += 1;
                j += 1;
            }
            ops.push(Opcode {
                tag: OpTag::Equal,
                a: start_a..i,
                b: start_b..j,
            });
            gap_a = i;
            gap_b = j;
        } else if table[idx(i + 1, j)] >= table[idx(i, j + 1)] {
            i += 1;
        } else {
            j += 1;
        }
    }
    push_gap(&mut ops, gap_a..n, gap_b..m);
    ops
}

fn push_gap(ops: &mut Vec<Opcode>, a: Range<usize>, b: Range<usize>) {
    let tag = match (a.is_empty(), b.is_empty()) {
        (true, true) => return,
        (false, true) => OpTag::Delete,
        (true, false) => OpTag::Insert,
        (false, false) => OpTag::Replace,
    };
    ops.push(Opcode { tag, a, b });
}
