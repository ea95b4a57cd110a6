//! Test program synthesis.
//!
//! Each test case becomes a guarded block appended after the submission. A
//! passing test prints `Test <i>: True`; a failing comparison prints
//! `Test <i>: False` and a raised exception prints `Test <i>: error` on
//! stdout with the exception type on stderr. The only stdout line the
//! wrapper ever writes containing `True` is a passing comparison. Every
//! result line is flushed so it survives the child being killed.

use std::fmt::Write;

use crate::core::TestCase;

/// Marker counted in the captured output.
pub const PASS_TOKEN: &str = "True";

/// Build the Python program that runs `test_cases` against `source`.
pub fn python_program(source: &str, test_cases: &[TestCase]) -> String {
    let mut program = String::with_capacity(source.len() + test_cases.len() * 160);
    program.push_str(source);
    if !source.ends_with('\n') {
        program.push('\n');
    }
    program.push_str("\n\nimport sys as __critique_sys\n");

    for (index, case) in test_cases.iter().enumerate() {
        let number = index + 1;
        // Writing into a String cannot fail.
        let _ = write!(
            program,
            "\ntry:\n    __critique_result = ({invocation})\n    __critique_expected = ({expected})\n    print('Test {number}: %s' % bool(__critique_result == __critique_expected), flush=True)\nexcept Exception as __critique_error:\n    print('Test {number}: error', flush=True)\n    print('Test {number}: %s' % type(__critique_error).__name__, file=__critique_sys.stderr)\n",
            invocation = single_line(&case.invocation),
            expected = single_line(&case.expected),
        );
    }

    program
}

/// Test expressions are spliced into one line of the program.
fn single_line(expression: &str) -> String {
    expression.trim().replace(['\r', '\n'], " ")
}

/// Number of passing tests reported in `stdout`, capped at `total`.
pub fn count_passes(stdout: &str, total: usize) -> usize {
    stdout
        .lines()
        .filter(|line| line.contains(PASS_TOKEN))
        .count()
        .min(total)
}
