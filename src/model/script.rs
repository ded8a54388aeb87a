//! Script results attached to scans, hosts and ports.

/// Output of a single scan script.
///
/// The derived ordering is `(id, output)`; script-result lists are kept
/// sorted by that key so the merge-join aligner can pair them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptResult {
    pub id: String,
    pub output: String,
}

impl ScriptResult {
    pub fn new(id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output: output.into(),
        }
    }

    /// The multi-line display form: the first line carries the script id,
    /// continuation lines are prefixed `|  `, the final line `|_ `.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.output.lines().map(str::to_string).collect();
        if let Some(first) = lines.first_mut() {
            *first = format!("{}: {}", self.id, first);
        }
        let count = lines.len();
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i + 1 == count {
                    format!("|_ {line}")
                } else {
                    format!("|  {line}")
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_output() {
        let sr = ScriptResult::new("ssh-hostkey", "2048 aa:bb:cc (RSA)");
        assert_eq!(sr.lines(), vec!["|_ ssh-hostkey: 2048 aa:bb:cc (RSA)"]);
    }

    #[test]
    fn test_multi_line_output() {
        let sr = ScriptResult::new("banner", "line1\nline2\nline3");
        assert_eq!(
            sr.lines(),
            vec!["|  banner: line1", "|  line2", "|_ line3"]
        );
    }

    #[test]
    fn test_empty_output() {
        let sr = ScriptResult::new("noop", "");
        assert!(sr.lines().is_empty());
    }

    #[test]
    fn test_ordering_by_id_then_output() {
        let a = ScriptResult::new("alpha", "z");
        let b = ScriptResult::new("beta", "a");
        let a2 = ScriptResult::new("alpha", "a");
        assert!(a < b);
        assert!(a2 < a);
    }
}
