//! End-to-end VM translation tests driven directly through the library.

use hack_vm::driver::{translate_program, Module, TranslateError};

fn lines(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

fn translate(stem: &str, src: &str, with_bootstrap: bool) -> Vec<String> {
    let ls = lines(src);
    let module = Module {
        stem: stem.to_string(),
        lines: &ls,
    };
    translate_program(&[module], with_bootstrap).expect("program should translate")
}

#[test]
fn simple_add_pushes_two_constants_and_adds() {
    let out = translate("SimpleAdd", "push constant 7\npush constant 8\nadd", false);
    assert!(out.contains(&"@7".to_string()));
    assert!(out.contains(&"@8".to_string()));
    assert!(out.iter().any(|l| l == "D=D+M"));
}

#[test]
fn stack_test_covers_every_arithmetic_command() {
    let out = translate(
        "StackTest",
        "\
push constant 17
push constant 17
eq
push constant 893
push constant 3
lt
push constant 1
push constant 2
push constant 3
sub
neg
and
or
not",
        false,
    );
    assert!(out.iter().any(|l| l.starts_with("(EQ0)")));
    assert!(out.iter().any(|l| l.starts_with("(LT1)")));
}

#[test]
fn basic_test_exercises_every_segment() {
    let out = translate(
        "BasicTest",
        "\
push constant 10
pop local 0
push constant 21
push constant 22
pop argument 1
pop argument 0
push constant 36
pop this 6
push constant 42
push constant 45
pop that 5
pop that 2
push constant 510
pop temp 6
push local 0
push that 5
add
push argument 1
sub
push this 6
push this 6
add
sub
push temp 6
add",
        false,
    );
    assert!(out.contains(&"@LCL".to_string()));
    assert!(out.contains(&"@ARG".to_string()));
    assert!(out.contains(&"@10".to_string()));
}

#[test]
fn pointer_test_targets_this_and_that_directly() {
    let out = translate(
        "PointerTest",
        "\
push constant 3030
pop pointer 0
push constant 3040
pop pointer 1
push constant 32
pop this 2
push constant 46
pop that 6
push pointer 0
push pointer 1
add",
        false,
    );
    assert!(out.contains(&"@THIS".to_string()));
    assert!(out.contains(&"@THAT".to_string()));
}

#[test]
fn static_test_links_statics_within_one_file() {
    let out = translate(
        "StaticTest",
        "\
push constant 111
push constant 333
push constant 888
pop static 8
pop static 3
pop static 1
push static 3
push static 1
sub
push static 8
add",
        false,
    );
    assert!(out.iter().any(|l| l == "@StaticTest.8"));
    assert!(out.iter().any(|l| l == "@StaticTest.3"));
}

#[test]
fn fibonacci_element_uses_function_call_and_return() {
    let main_fn = lines(
        "\
function Main.fibonacci 0
push argument 0
push constant 2
lt
if-goto N_LT_2
push argument 0
push constant 2
sub
call Main.fibonacci 1
push argument 0
push constant 1
sub
call Main.fibonacci 1
add
return
label N_LT_2
push argument 0
return",
    );
    let modules = [Module {
        stem: "Main".to_string(),
        lines: &main_fn,
    }];
    let out = translate_program(&modules, true).unwrap();

    assert!(out.iter().any(|l| l.contains("Sys.init")));
    assert!(out.contains(&"(Main.fibonacci$N_LT_2)".to_string()));
    assert!(out.iter().any(|l| l == "@Main.fibonacci"));
}

#[test]
fn nested_calls_share_counters_across_files() {
    let sys = lines(
        "\
function Sys.init 0
call Main.test 0
label LOOP
goto LOOP",
    );
    let main = lines(
        "\
function Main.test 0
call Main.test 0
return",
    );
    let modules = [
        Module {
            stem: "Sys".to_string(),
            lines: &sys,
        },
        Module {
            stem: "Main".to_string(),
            lines: &main,
        },
    ];
    let out = translate_program(&modules, true).unwrap();
    // Two distinct `call` sites should get distinct, function-scoped return labels.
    let ret_labels: Vec<_> = out
        .iter()
        .filter(|l| l.starts_with('(') && l.contains("$ret."))
        .collect();
    assert_eq!(ret_labels.len(), 2);
    assert!(ret_labels.iter().any(|l| l.starts_with("(Sys.init$ret.")));
    assert!(ret_labels.iter().any(|l| l.starts_with("(Main.test$ret.")));
}

#[test]
fn unknown_segment_is_reported_with_line_number() {
    let ls = lines("push constant 1\npush bogus 0");
    let module = Module {
        stem: "Bad".to_string(),
        lines: &ls,
    };
    let err = translate_program(&[module], false).unwrap_err();
    assert!(matches!(err, TranslateError::Code { line: 2, .. }));
}
