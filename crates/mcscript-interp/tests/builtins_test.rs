// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in functions.

use mcscript_interp::{
    Builtins, EvalConfig, Environment, Evaluator, Heap, Object, ObjectId,
};

fn run(input: &str) -> (Evaluator, ObjectId) {
    let mut evaluator = Evaluator::with_config(EvalConfig::default().with_gc_threshold(None));
    let env = Environment::new();
    let id = evaluator
        .run(input, &env)
        .unwrap_or_else(|err| panic!("{input}: {err}"));
    (evaluator, id)
}

fn inspect(input: &str) -> String {
    let (evaluator, id) = run(input);
    evaluator.inspect(id)
}

#[test]
fn len() {
    assert_eq!(inspect("len(\"\")"), "0");
    assert_eq!(inspect("len(\"four\")"), "4");
    assert_eq!(inspect("len(\"hello world\")"), "11");
    assert_eq!(inspect("len([1, 2, 3])"), "3");
    assert_eq!(inspect("len([])"), "0");
    assert_eq!(inspect("len(1)"), "ERROR: argument to `len` not supported, got INTEGER");
    assert_eq!(
        inspect("len(\"one\", \"two\")"),
        "ERROR: wrong number of arguments. got=2, want=1"
    );
    assert_eq!(inspect("len()"), "ERROR: wrong number of arguments. got=0, want=1");
}

#[test]
fn push() {
    assert_eq!(inspect("var arr = [1, 2, 3]; push(arr, 5); return arr[3];"), "5");
    assert_eq!(inspect("var arr = []; push(push(arr, 1), 2)"), "[1, 2]");
    assert_eq!(inspect("push(1, 1)"), "ERROR: argument to `push` must be ARRAY, got INTEGER");
    assert_eq!(inspect("push(len, 1)"), "ERROR: argument to `push` must be ARRAY, got BUILT_IN");
    assert_eq!(inspect("push([])"), "ERROR: wrong number of arguments. got=1, want=2");
}

#[test]
fn push_can_build_self_referential_arrays() {
    assert_eq!(inspect("var a = []; push(a, a); a"), "[[...]]");
}

#[test]
fn print_writes_inspected_arguments() {
    let (mut evaluator, output) = Evaluator::new().with_captured_output();
    let env = Environment::new();
    let id = evaluator
        .run("print(\"a\", 1, [1, 2]); print(); print(true, len)", &env)
        .expect("parses");

    assert_eq!(id, Heap::NULL);
    assert_eq!(*output.lock().unwrap(), "a 1 [1, 2]\n\ntrue builtin function\n");
}

#[test]
fn builtins_resolve_after_bindings() {
    assert_eq!(inspect("len"), "builtin function");
    assert_eq!(inspect("var len = function(x) { 42 }; len([1])"), "42");
}

#[test]
fn builtin_objects_are_pinned() {
    let (evaluator, _) = run("len");
    let id = evaluator.builtin("len").expect("len is registered");
    assert!(matches!(evaluator.heap().get(id), Some(Object::BuiltIn(b)) if b.name == "len"));
    assert_eq!(evaluator.heap().ref_count(id), None);
    assert!(!evaluator.heap().is_tracked(id));
}

fn double(eval: &mut Evaluator, args: &[ObjectId]) -> ObjectId {
    match args {
        [arg] => match eval.heap().get(*arg) {
            Some(&Object::Integer(value)) => eval.alloc(Object::Integer(value * 2)),
            _ => eval.new_error("double expects an integer"),
        },
        _ => eval.new_error("double takes one argument"),
    }
}

#[test]
fn custom_builtin_table() {
    let builtins = Builtins::new().with("double", double);
    let mut evaluator = Evaluator::with_builtins(EvalConfig::default(), builtins);
    let env = Environment::new();

    let id = evaluator.run("double(21)", &env).expect("parses");
    assert_eq!(evaluator.inspect(id), "42");
    let id = evaluator.run("double(true)", &env).expect("parses");
    assert_eq!(evaluator.inspect(id), "ERROR: double expects an integer");
    let id = evaluator.run("len([])", &env).expect("parses");
    assert_eq!(evaluator.inspect(id), "ERROR: unexpected identifier: len");
}
