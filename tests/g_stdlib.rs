mod util;

use indoc::indoc;
use util::{run_expecting_error, run_program, run_with_stdin, RUNTIME_ERROR, SUCCESS};

#[test]
fn clock_returns_seconds() {
    run_program("print clock() > 0;", "true\n", SUCCESS);
}

#[test]
fn input_reads_a_line() {
    let input = indoc! {r#"
        var name = input();
        print "hi " + name;
    "#};
    run_with_stdin(input, "world\n", "hi world\n", SUCCESS);
}

#[test]
fn str_converts_numbers_and_strings() {
    let input = indoc! {r#"
        print str(42) + "!";
        print str(2.5);
        print str("already");
    "#};
    let expected = indoc! {"
        42!
        2.5
        already
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn str_rejects_other_types() {
    run_expecting_error(
        "print str(nil);",
        "Built-in function 'str' expects arguments of type string or float.",
        RUNTIME_ERROR,
    );
}

#[test]
fn float_parses_strings() {
    let input = indoc! {r#"
        print float("3.5") + 1;
        print float(2);
    "#};
    let expected = indoc! {"
        4.5
        2
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn float_rejects_other_types() {
    run_expecting_error(
        "print float(true);",
        "Built-in function 'float' expects arguments of type string or float.",
        RUNTIME_ERROR,
    );
}

#[test]
fn float_rejects_unparseable_strings() {
    run_expecting_error(
        r#"print float("not a number");"#,
        "Built-in function 'float' could not convert string to number.",
        RUNTIME_ERROR,
    );
}

#[test]
fn floor_and_ceil() {
    let input = indoc! {"
        print floor(2.7);
        print ceil(2.1);
        print floor(-0.5);
    "};
    let expected = indoc! {"
        2
        3
        -1
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn floor_requires_a_number() {
    run_expecting_error(
        r#"print floor("2.7");"#,
        "Built-in function 'floor' expects arguments of type float.",
        RUNTIME_ERROR,
    );
}

#[test]
fn math_functions() {
    let input = indoc! {"
        print sin(0);
        print cos(0);
        print exp(0);
        print log(1);
    "};
    let expected = indoc! {"
        0
        1
        1
        0
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn builtin_errors_report_the_call_line() {
    let input = indoc! {"
        var x = 1;
        print str(nil);
    "};
    run_expecting_error(input, "[line 2]", RUNTIME_ERROR);
}

#[test]
fn list_literals() {
    let input = indoc! {"
        var xs = [1, 2, 3];
        print xs;
        print xs.size();
        print xs.at(0);
        print xs.at(2);
    "};
    let expected = indoc! {"
        List instance
        3
        1
        3
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn list_constructor_and_append() {
    let input = indoc! {r#"
        var xs = List();
        xs.append("a");
        xs.append("b");
        print xs.size();
        print xs.at(1);
    "#};
    let expected = indoc! {"
        2
        b
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn lists_hold_arbitrary_values() {
    let input = indoc! {r#"
        var xs = [nil, "two", 3];
        print xs.at(0);
        print xs.at(1);
        print xs.at(2);
    "#};
    let expected = indoc! {"
        nil
        two
        3
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn list_iteration_protocol() {
    let input = indoc! {"
        var xs = [10, 20, 30];
        var it = xs.iterate();
        while (it.hasItems()) {
            print it.get();
            it.move();
        }
    "};
    let expected = indoc! {"
        10
        20
        30
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn iterating_an_empty_list() {
    let input = indoc! {"
        var it = List().iterate();
        print it.hasItems();
    "};
    run_program(input, "false\n", SUCCESS);
}

#[test]
fn list_index_out_of_range() {
    let input = indoc! {"
        var xs = [1];
        xs.at(5);
    "};
    run_expecting_error(input, "List index out of range.", RUNTIME_ERROR);
}

#[test]
fn list_index_must_be_a_number() {
    let input = indoc! {r#"
        var xs = [1];
        xs.at("zero");
    "#};
    run_expecting_error(input, "List index must be a number.", RUNTIME_ERROR);
}

#[test]
fn list_storage_is_separate_from_fields() {
    // A user field named "items" must not clobber the backing vector.
    let input = indoc! {r#"
        var xs = [1];
        xs.items = "shadow";
        print xs.items;
        print xs.at(0);
        print xs.size();
    "#};
    let expected = indoc! {"
        shadow
        1
        1
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn builtins_can_be_shadowed_by_globals() {
    let input = indoc! {r#"
        var clock = "mine";
        print clock;
    "#};
    run_program(input, "mine\n", SUCCESS);
}
