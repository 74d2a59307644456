mod util;

use indoc::indoc;
use util::{run_expecting_error, run_program, BUILD_ERROR, SUCCESS};

#[test]
fn unexpected_character() {
    let input = indoc! {r#"
        var a = 1;
        @
    "#};
    run_expecting_error(input, "[line 2] Error: Unexpected character.", BUILD_ERROR);
}

#[test]
fn scanning_continues_after_bad_character() {
    // Both stray characters are reported in a single pass.
    let input = "@ #";
    run_expecting_error(input, "[line 1] Error: Unexpected character.", BUILD_ERROR);
}

#[test]
fn unterminated_string() {
    let input = r#"print "never closed;"#;
    run_expecting_error(input, "[line 1] Error: Unterminated string.", BUILD_ERROR);
}

#[test]
fn comments_are_skipped() {
    let input = indoc! {r#"
        // a comment on its own line
        print 1; // and one trailing a statement
    "#};
    let expected = indoc! {"
        1
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn slash_is_still_division() {
    let input = "print 10 / 2;";
    run_program(input, "5\n", SUCCESS);
}

#[test]
fn strings_may_span_lines() {
    let input = "print \"one\ntwo\";";
    let expected = indoc! {"
        one
        two
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn number_literals() {
    let input = indoc! {"
        print 123;
        print 12.5;
        print 0.25;
    "};
    let expected = indoc! {"
        123
        12.5
        0.25
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn foreach_is_reserved() {
    // 'foreach' scans as a keyword, so it can't name a variable.
    let input = "var foreach = 1;";
    run_expecting_error(input, "Error at 'foreach': Expect variable name.", BUILD_ERROR);
}

#[test]
fn errors_report_correct_line() {
    let input = indoc! {r#"
        print 1;
        print 2;
        print "broken;
    "#};
    run_expecting_error(input, "[line 4] Error: Unterminated string.", BUILD_ERROR);
}
