//! Merge-join over two id-sorted sequences.

use std::cmp::Ordering;
use std::iter::Peekable;

/// One output pair of a merge-join: matched on both sides, or present on
/// one side only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aligned<A, B> {
    Matched(A, B),
    LeftOnly(A),
    RightOnly(B),
}

/// Lazily merge-join two sequences sorted ascending by their key functions.
///
/// Equal keys yield [`Aligned::Matched`]; a key present on one side only
/// yields [`Aligned::LeftOnly`] / [`Aligned::RightOnly`]. Output pairs come
/// in ascending key order and each input element is consumed exactly once,
/// so the whole pass is O(|left| + |right|).
///
/// Inputs must be free of duplicate keys; with duplicates the pairing of
/// equal-key runs is unspecified (though every element still appears).
pub fn merge_join<A, B, K, IA, IB, FA, FB>(
    left: IA,
    right: IB,
    key_left: FA,
    key_right: FB,
) -> MergeJoin<IA::IntoIter, IB::IntoIter, FA, FB>
where
    IA: IntoIterator<Item = A>,
    IB: IntoIterator<Item = B>,
    K: Ord,
    FA: Fn(&A) -> K,
    FB: Fn(&B) -> K,
{
    MergeJoin {
        left: left.into_iter().peekable(),
        right: right.into_iter().peekable(),
        key_left,
        key_right,
    }
}

/// Iterator returned by [`merge_join`].
pub struct MergeJoin<I, J, FA, FB>
where
    I: Iterator,
    J: Iterator,
{
    left: Peekable<I>,
    right: Peekable<J>,
    key_left: FA,
    key_right: FB,
}

impl<A, B, K, I, J, FA, FB> Iterator for MergeJoin<I, J, FA, FB>
where
    K: Ord,
    I: Iterator<Item = A>,
    J: Iterator<Item = B>,
    FA: Fn(&A) -> K,
    FB: Fn(&B) -> K,
{
    type Item = Aligned<A, B>;

    fn next(&mut self) -> Option<Self::Item> {
        // Treat an exhausted side as an infinitely large key so the other
        // side drains in order.
        let ord = match (self.left.peek(), self.right.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => (self.key_left)(a).cmp(&(self.key_right)(b)),
        };

        match ord {
            Ordering::Less => self.left.next().map(Aligned::LeftOnly),
            Ordering::Greater => self.right.next().map(Aligned::RightOnly),
            Ordering::Equal => match (self.left.next(), self.right.next()) {
                (Some(a), Some(b)) => Some(Aligned::Matched(a, b)),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(a: &[i32], b: &[i32]) -> Vec<Aligned<i32, i32>> {
        merge_join(a.iter().copied(), b.iter().copied(), |x| *x, |x| *x).collect()
    }

    #[test]
    fn test_disjoint_inputs() {
        let pairs = join(&[1, 3], &[2, 4]);
        assert_eq!(
            pairs,
            vec![
                Aligned::LeftOnly(1),
                Aligned::RightOnly(2),
                Aligned::LeftOnly(3),
                Aligned::RightOnly(4),
            ]
        );
    }

    #[test]
    fn test_matches_and_leftovers() {
        let pairs = join(&[1, 2, 5], &[2, 3]);
        assert_eq!(
            pairs,
            vec![
                Aligned::LeftOnly(1),
                Aligned::Matched(2, 2),
                Aligned::RightOnly(3),
                Aligned::LeftOnly(5),
            ]
        );
    }

    #[test]
    fn test_empty_sides() {
        assert!(join(&[], &[]).is_empty());
        assert_eq!(join(&[7], &[]), vec![Aligned::LeftOnly(7)]);
        assert_eq!(join(&[], &[7]), vec![Aligned::RightOnly(7)]);
    }

    #[test]
    fn test_each_element_appears_once() {
        let a = [1, 2, 4, 6, 9];
        let b = [2, 3, 6, 10];
        let pairs = join(&a, &b);

        let mut seen_left = Vec::new();
        let mut seen_right = Vec::new();
        for pair in &pairs {
            match pair {
                Aligned::Matched(x, y) => {
                    seen_left.push(*x);
                    seen_right.push(*y);
                }
                Aligned::LeftOnly(x) => seen_left.push(*x),
                Aligned::RightOnly(y) => seen_right.push(*y),
            }
        }
        assert_eq!(seen_left, a);
        assert_eq!(seen_right, b);
    }
}
