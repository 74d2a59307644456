mod util;

use indoc::indoc;
use util::{run_expecting_error, run_program, RUNTIME_ERROR, SUCCESS};

#[test]
fn uninitialized_variable_is_nil() {
    let input = indoc! {"
        var a;
        print a;
    "};
    run_program(input, "nil\n", SUCCESS);
}

#[test]
fn blocks_shadow_and_restore() {
    let input = indoc! {r#"
        var a = "global";
        {
            var a = "local";
            print a;
        }
        print a;
    "#};
    let expected = indoc! {"
        local
        global
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn inner_blocks_see_outer_variables() {
    let input = indoc! {"
        var a = 1;
        {
            a = a + 1;
            {
                a = a + 1;
            }
        }
        print a;
    "};
    run_program(input, "3\n", SUCCESS);
}

#[test]
fn undefined_variable_read() {
    run_expecting_error("print missing;", "Undefined variable 'missing'.", RUNTIME_ERROR);
}

#[test]
fn undefined_variable_assignment() {
    run_expecting_error("missing = 1;", "Undefined variable 'missing'.", RUNTIME_ERROR);
}

#[test]
fn if_else_branches() {
    let input = indoc! {r#"
        if (1 < 2) print "then"; else print "else";
        if (1 > 2) print "then"; else print "else";
        if (false) print "unreached";
    "#};
    let expected = indoc! {"
        then
        else
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn while_loop() {
    let input = indoc! {"
        var n = 3;
        while (n > 0) {
            print n;
            n = n - 1;
        }
    "};
    let expected = indoc! {"
        3
        2
        1
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn for_loop_desugars_to_while() {
    let input = indoc! {"
        for (var i = 0; i < 3; i = i + 1) {
            print i;
        }
    "};
    let expected = indoc! {"
        0
        1
        2
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn for_loop_with_outside_initializer() {
    let input = indoc! {"
        var i = 10;
        for (; i < 13; i = i + 1) print i;
    "};
    let expected = indoc! {"
        10
        11
        12
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn for_loop_variable_is_scoped_to_the_loop() {
    let input = indoc! {"
        var i = 99;
        for (var i = 0; i < 1; i = i + 1) {}
        print i;
    "};
    run_program(input, "99\n", SUCCESS);
}

#[test]
fn print_stringifies_values() {
    let input = indoc! {r#"
        print 2.0;
        print 2.5;
        print true;
        print nil;
        print "text";
    "#};
    let expected = indoc! {"
        2
        2.5
        true
        nil
        text
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn runtime_error_aborts_remaining_statements() {
    let input = indoc! {r#"
        print "before";
        print 1 + nil;
        print "after";
    "#};
    run_program(input, "before\n", RUNTIME_ERROR);
}

#[test]
fn runtime_error_reports_line() {
    let input = indoc! {"
        var ok = 1;
        print ok + nil;
    "};
    run_expecting_error(
        input,
        "Operands must be two numbers or two strings.\n[line 2]",
        RUNTIME_ERROR,
    );
}
