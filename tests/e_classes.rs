mod util;

use indoc::indoc;
use util::{run_expecting_error, run_program, BUILD_ERROR, RUNTIME_ERROR, SUCCESS};

#[test]
fn classes_and_instances_print() {
    let input = indoc! {"
        class Bagel {}
        print Bagel;
        print Bagel();
    "};
    let expected = indoc! {"
        Bagel
        Bagel instance
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn initializer_sets_fields() {
    let input = indoc! {"
        class C {
            init(v) {
                this.v = v;
            }
        }
        print C(42).v;
    "};
    run_program(input, "42\n", SUCCESS);
}

#[test]
fn fields_can_spring_into_being() {
    let input = indoc! {r#"
        class Bag {}
        var bag = Bag();
        bag.first = "a";
        bag.second = bag.first + "b";
        print bag.second;
    "#};
    run_program(input, "ab\n", SUCCESS);
}

#[test]
fn methods_see_this() {
    let input = indoc! {r#"
        class Cake {
            taste() {
                print "The " + this.flavor + " cake is delicious";
            }
        }
        var cake = Cake();
        cake.flavor = "chocolate";
        cake.taste();
    "#};
    run_program(input, "The chocolate cake is delicious\n", SUCCESS);
}

#[test]
fn extracted_methods_stay_bound() {
    let input = indoc! {r#"
        class Person {
            init(name) {
                this.name = name;
            }
            sayName() {
                print this.name;
            }
        }
        var method = Person("Jane").sayName;
        method();
    "#};
    run_program(input, "Jane\n", SUCCESS);
}

#[test]
fn fields_shadow_methods() {
    let input = indoc! {r#"
        class Box {
            label() {
                print "method";
            }
        }
        var box = Box();
        fun replacement() {
            print "field";
        }
        box.label = replacement;
        box.label();
    "#};
    run_program(input, "field\n", SUCCESS);
}

#[test]
fn initializer_with_bare_return_still_yields_instance() {
    let input = indoc! {"
        class Foo {
            init() {
                this.ok = true;
                return;
            }
        }
        print Foo().ok;
    "};
    run_program(input, "true\n", SUCCESS);
}

#[test]
fn methods_are_inherited() {
    let input = indoc! {r#"
        class A {
            init(v) {
                this.v = v;
            }
        }
        class B < A {}
        print B(3).v;
    "#};
    run_program(input, "3\n", SUCCESS);
}

#[test]
fn super_dispatches_past_the_subclass() {
    let input = indoc! {r#"
        class A {
            greet() {
                print "A";
            }
        }
        class B < A {
            greet() {
                super.greet();
                print "B";
            }
        }
        B().greet();
    "#};
    let expected = indoc! {"
        A
        B
    "};
    run_program(input, expected, SUCCESS);
}

#[test]
fn super_binds_the_original_receiver() {
    // Method lookup through super starts above the class containing the
    // method, but 'this' stays the concrete instance.
    let input = indoc! {r#"
        class Base {
            name() {
                return "base";
            }
            describe() {
                print "I am " + this.name();
            }
        }
        class Middle < Base {
            name() {
                return "middle";
            }
            describe() {
                super.describe();
            }
        }
        Middle().describe();
    "#};
    run_program(input, "I am middle\n", SUCCESS);
}

#[test]
fn undefined_super_method() {
    let input = indoc! {"
        class A {}
        class B < A {
            go() {
                super.missing();
            }
        }
        B().go();
    "};
    run_expecting_error(input, "Undefined property 'missing'.", RUNTIME_ERROR);
}

#[test]
fn class_cannot_inherit_from_itself() {
    run_expecting_error("class X < X {}", "A class can't inherit from itself.", BUILD_ERROR);
}

#[test]
fn superclass_must_be_a_class() {
    let input = indoc! {r#"
        var NotAClass = "so not a class";
        class Sub < NotAClass {}
    "#};
    run_expecting_error(input, "Superclass must be a class.", RUNTIME_ERROR);
}

#[test]
fn this_outside_a_class() {
    run_expecting_error("print this;", "Can't use 'this' outside of a class.", BUILD_ERROR);
}

#[test]
fn super_outside_a_class() {
    run_expecting_error("super.cook();", "Can't use 'super' outside of a class.", BUILD_ERROR);
}

#[test]
fn super_without_a_superclass() {
    let input = indoc! {"
        class Alone {
            go() {
                super.go();
            }
        }
    "};
    run_expecting_error(
        input,
        "Can't use 'super' in a class with no superclass.",
        BUILD_ERROR,
    );
}

#[test]
fn returning_a_value_from_init() {
    let input = indoc! {"
        class T {
            init() {
                return 1;
            }
        }
    "};
    run_expecting_error(input, "Can't return a value from an initializer.", BUILD_ERROR);
}

#[test]
fn undefined_property() {
    let input = indoc! {"
        class Empty {}
        print Empty().anything;
    "};
    run_expecting_error(input, "Undefined property 'anything'.", RUNTIME_ERROR);
}

#[test]
fn only_instances_have_properties() {
    run_expecting_error(r#"print "text".length;"#, "Only instances have properties.", RUNTIME_ERROR);
}

#[test]
fn only_instances_have_fields() {
    run_expecting_error("true.flag = 1;", "Only instances have fields.", RUNTIME_ERROR);
}

#[test]
fn class_body_may_reference_the_class() {
    let input = indoc! {"
        class Counter {
            make() {
                return Counter();
            }
        }
        print Counter().make();
    "};
    run_program(input, "Counter instance\n", SUCCESS);
}
