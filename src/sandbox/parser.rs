//! Parses toolchain stderr/stdout into structured compile errors and test
//! failures.

/// Split build stderr into compile-error blocks.
///
/// A block begins at a line starting with `package_boundary`. Subsequent
/// non-empty lines are appended to the current block (trimming only
/// end-of-line whitespace) until another boundary line starts a new block.
/// Lines before the first boundary are discarded. Blocks are returned in
/// encounter order.
pub fn parse_compile_errors(stderr: &str, package_boundary: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for raw_line in stderr.lines() {
        let line = raw_line.trim_end();
        if line.starts_with(package_boundary) {
            if let Some(lines) = current.take() {
                blocks.push(lines.join("\n"));
            }
            current = Some(vec![line]);
        } else if !line.is_empty()
            && let Some(lines) = current.as_mut()
        {
            lines.push(line);
        }
    }
    if let Some(lines) = current {
        blocks.push(lines.join("\n"));
    }
    blocks
}

/// Split test stdout into test-failure blocks.
///
/// A failure line matches `failure_locator` as a prefix. A block starts at
/// such a line and continues through immediately following lines sharing the
/// same indent prefix (the locator's leading whitespace). Blocks are
/// returned in encounter order.
pub fn parse_test_failures(stdout: &str, failure_locator: &str) -> Vec<String> {
    let indent: String = failure_locator
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();

    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for raw_line in stdout.lines() {
        let line = raw_line.trim_end();
        if line.starts_with(failure_locator) {
            if let Some(lines) = current.take() {
                blocks.push(lines.join("\n"));
            }
            current = Some(vec![line]);
        } else if !indent.is_empty() && line.starts_with(indent.as_str()) {
            if let Some(lines) = current.as_mut() {
                lines.push(line);
            }
        } else if let Some(lines) = current.take() {
            blocks.push(lines.join("\n"));
        }
    }
    if let Some(lines) = current {
        blocks.push(lines.join("\n"));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_errors_split_on_package_boundary() {
        let stderr = "# candidate\n./lats.go:3:2: undefined: MyResponse\n\n# other\nsomething else\n";
        let blocks = parse_compile_errors(stderr, "# candidate");
        assert_eq!(blocks, vec!["# candidate\n./lats.go:3:2: undefined: MyResponse"]);
    }

    #[test]
    fn compile_errors_round_trip_matches_contract() {
        let stderr = "noise before\n# candidate\nline one\nline two\n# candidate\nline three\n";
        let blocks = parse_compile_errors(stderr, "# candidate");
        let joined = blocks.join("\n");
        let expected: String = stderr
            .lines()
            .skip_while(|l| !l.starts_with("# candidate"))
            .filter(|l| !l.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(joined, expected);
    }

    #[test]
    fn no_boundary_line_yields_no_blocks() {
        assert!(parse_compile_errors("just noise\nmore noise\n", "# candidate").is_empty());
    }

    #[test]
    fn test_failures_split_on_indent() {
        let stdout = "--- FAIL: TestFoo (0.00s)\n        candidate_test.go:12: expected 1 got 2\n        candidate_test.go:13: extra detail\nFAIL\n";
        let blocks = parse_test_failures(stdout, "        candidate_test.go");
        assert_eq!(
            blocks,
            vec!["        candidate_test.go:12: expected 1 got 2\n        candidate_test.go:13: extra detail"]
        );
    }

    #[test]
    fn multiple_failure_blocks_are_kept_in_order() {
        let stdout = "        candidate_test.go:1: a\nok\n        candidate_test.go:2: b\n";
        let blocks = parse_test_failures(stdout, "        candidate_test.go");
        assert_eq!(
            blocks,
            vec![
                "        candidate_test.go:1: a".to_string(),
                "        candidate_test.go:2: b".to_string(),
            ]
        );
    }
}
