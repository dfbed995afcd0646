//! Interpreter integration tests
//!
//! Tests the full pipeline: source → lex → parse → evaluate

use eva::diagnostics::{RuntimeError, SourceFile};
use eva::interp::{Interpreter, Value};
use eva::loader::MemoryModuleLoader;
use eva::parser::parse_body;

fn interpreter() -> Interpreter {
    let mut interpreter = Interpreter::with_loader(MemoryModuleLoader::new().with_module(
        "Math",
        r#"
            (def abs (value)
              (if (< value 0) (- value) value))
            (def square (x) (* x x))
            (var MAX_VALUE 1000)
        "#,
    ));
    interpreter.set_echo(false);
    interpreter
}

/// Helper to interpret a program at top level
fn interpret(source: &str) -> Result<Value, RuntimeError> {
    let body = parse_body(&SourceFile::new("<test>", source))
        .unwrap_or_else(|e| panic!("Parse error: {}", e));
    interpreter().evaluate_top_level(&body)
}

/// Helper to check the result is a number
fn assert_result_number(source: &str, expected: f64) {
    match interpret(source) {
        Ok(Value::Number(n)) => assert_eq!(n, expected, "Expected {}, got {}", expected, n),
        Ok(v) => panic!("Expected Number({}), got {:?}", expected, v),
        Err(e) => panic!("Interpretation failed: {}", e),
    }
}

/// Helper to check the result is a bool
fn assert_result_bool(source: &str, expected: bool) {
    match interpret(source) {
        Ok(Value::Bool(b)) => assert_eq!(b, expected, "Expected {}, got {}", expected, b),
        Ok(v) => panic!("Expected Bool({}), got {:?}", expected, v),
        Err(e) => panic!("Interpretation failed: {}", e),
    }
}

/// Helper to check the result is a string
fn assert_result_str(source: &str, expected: &str) {
    match interpret(source) {
        Ok(Value::Str(s)) => assert_eq!(s, expected),
        Ok(v) => panic!("Expected Str({:?}), got {:?}", expected, v),
        Err(e) => panic!("Interpretation failed: {}", e),
    }
}

fn assert_result_null(source: &str) {
    match interpret(source) {
        Ok(Value::Null) => {}
        Ok(v) => panic!("Expected null, got {:?}", v),
        Err(e) => panic!("Interpretation failed: {}", e),
    }
}

fn runtime_error(source: &str) -> RuntimeError {
    match interpret(source) {
        Ok(v) => panic!("Expected a runtime error, got {:?}", v),
        Err(e) => e,
    }
}

// ==================== Self-evaluating Expressions ====================

#[test]
fn test_interpret_number() {
    assert_result_number("1", 1.0);
    assert_result_number("-7.25", -7.25);
}

#[test]
fn test_interpret_string() {
    assert_result_str(r#""hello""#, "hello");
    assert_result_str(r#""line\nbreak""#, "line\nbreak");
}

#[test]
fn test_interpret_constants() {
    assert_result_bool("true", true);
    assert_result_bool("false", false);
    assert_result_null("null");
}

// ==================== Math ====================

#[test]
fn test_interpret_math() {
    assert_result_number("(+ (+ 3 2) 5)", 10.0);
    assert_result_number("(- (+ 4 2) 5)", 1.0);
    assert_result_number("(+ (* 3 2) 5)", 11.0);
    assert_result_number("(- (/ 6 4) 5)", -3.5);
    assert_result_number("(- (% 6 4) 5)", -3.0);
}

#[test]
fn test_interpret_unary_minus() {
    assert_result_number("(- 5)", -5.0);
}

#[test]
fn test_interpret_string_concat() {
    assert_result_str(r#"(+ "foo" "bar")"#, "foobar");
}

// ==================== Comparisons ====================

#[test]
fn test_interpret_comparisons() {
    assert_result_bool("(> 1 2)", false);
    assert_result_bool("(< 1 2)", true);
    assert_result_bool("(>= 2 2)", true);
    assert_result_bool("(<= 2 2)", true);
    assert_result_bool("(= 2 2)", true);
    assert_result_bool(r#"(= "a" "a")"#, true);
    assert_result_bool(r#"(= 1 "1")"#, false);
}

// ==================== Variables and Blocks ====================

#[test]
fn test_interpret_var() {
    assert_result_number("(var x 10) x", 10.0);
    assert_result_number("(var y (* 2 21)) y", 42.0);
}

#[test]
fn test_interpret_block() {
    assert_result_number(
        r#"
        (begin
          (var x 10)
          (var y 20)
          (+ (* x y) 30))
        "#,
        230.0,
    );
}

#[test]
fn test_interpret_nested_block_shadows() {
    assert_result_number(
        r#"
        (begin
          (var x 10)
          (begin
            (var x 20)
            x)
          x)
        "#,
        10.0,
    );
}

#[test]
fn test_interpret_set_reaches_outer_scope() {
    assert_result_number(
        r#"
        (begin
          (var x 10)
          (begin
            (set x 50))
          x)
        "#,
        50.0,
    );
}

#[test]
fn test_interpret_var_returns_value() {
    assert_result_number("(var x 7)", 7.0);
    assert_result_number("(var x 1) (set x 9)", 9.0);
}

// ==================== Conditionals and Truthiness ====================

#[test]
fn test_interpret_if() {
    assert_result_number(
        r#"
        (var x 10)
        (var y 0)
        (if (> x 10)
          (set y 20)
          (set y 30))
        y
        "#,
        30.0,
    );
}

#[test]
fn test_interpret_if_without_alternate() {
    assert_result_null("(if false 1)");
    assert_result_number("(if true 1)", 1.0);
}

#[test]
fn test_interpret_truthiness() {
    assert_result_number("(if 0 1 2)", 2.0);
    assert_result_number(r#"(if "" 1 2)"#, 2.0);
    assert_result_number("(if null 1 2)", 2.0);
    assert_result_number("(if false 1 2)", 2.0);
    assert_result_number(r#"(if "a" 1 2)"#, 1.0);
    assert_result_number("(if -1 1 2)", 1.0);
    assert_result_number("(if (lambda (x) x) 1 2)", 1.0);
}

#[test]
fn test_interpret_switch() {
    let program = |x: i32| {
        format!(
            r#"
            (var x {})
            (switch ((= x 10) 100)
                    ((> x 10) 200)
                    (else 300))
            "#,
            x
        )
    };
    assert_result_number(&program(10), 100.0);
    assert_result_number(&program(20), 200.0);
    assert_result_number(&program(1), 300.0);
}

#[test]
fn test_interpret_switch_without_else() {
    assert_result_null("(var x 5) (switch ((= x 1) 10) ((= x 2) 20))");
}

// ==================== Loops ====================

#[test]
fn test_interpret_while() {
    assert_result_number(
        r#"
        (var counter 0)
        (var result 0)
        (while (< counter 10)
          (begin
            (set result (+ result 1))
            (set counter (+ counter 1))))
        result
        "#,
        10.0,
    );
}

#[test]
fn test_interpret_while_never_runs() {
    assert_result_null("(while false 1)");
}

#[test]
fn test_interpret_for() {
    assert_result_number(
        r#"
        (var result 0)
        (for (var counter 0)
             (< counter 10)
             (set counter (+ counter 1))
             (begin
               (set result (+ result 1))))
        "#,
        10.0,
    );
}

#[test]
fn test_interpret_for_with_increment_sugar() {
    assert_result_number(
        r#"
        (var result 0)
        (for (var counter 10)
             (> counter 0)
             (-- counter)
             (begin
               (+= result 1)))
        result
        "#,
        10.0,
    );
    assert_result_number(
        r#"
        (var result 0)
        (for (var counter 0)
             (< counter 10)
             (+= counter 2)
             (begin
               (set result (+ result 1))))
        result
        "#,
        5.0,
    );
    assert_result_number(
        r#"
        (var result 5)
        (for (var counter 10)
             (> counter 0)
             (-= counter 2)
             (begin
               (-= result 1)))
        result
        "#,
        0.0,
    );
}

#[test]
fn test_interpret_for_counter_is_scoped() {
    let err = runtime_error(
        r#"
        (for (var i 0) (< i 3) (++ i) i)
        i
        "#,
    );
    assert!(matches!(err, RuntimeError::UnresolvedReference { ref name } if name == "i"));
}

#[test]
fn test_interpret_increment_sugar() {
    assert_result_number("(var x 1) (++ x) x", 2.0);
    assert_result_number("(var x 1) (-- x)", 0.0);
    assert_result_number("(var x 1) (+= x 10) x", 11.0);
    assert_result_number("(var x 1) (-= x 10) x", -9.0);
}

// ==================== Functions ====================

#[test]
fn test_interpret_user_defined_function() {
    assert_result_number(
        r#"
        (def square (x)
          (* x x))
        (square 2)
        "#,
        4.0,
    );
    assert_result_number(
        r#"
        (def calc (x y)
          (begin
            (var z 30)
            (+ (* x y) z)))
        (calc 10 20)
        "#,
        230.0,
    );
}

#[test]
fn test_interpret_closure_captures_definition_scope() {
    assert_result_number(
        r#"
        (var value 100)
        (def calc (x y)
          (begin
            (var z (+ x y))
            (def inner (foo)
              (+ (+ foo z) value))
            inner))
        (var fn (calc 10 20))
        (fn 30)
        "#,
        160.0,
    );
}

#[test]
fn test_interpret_lexical_not_dynamic_scope() {
    assert_result_number(
        r#"
        (var x 10)
        (def foo () x)
        (def bar ()
          (begin
            (var x 20)
            (foo)))
        (bar)
        "#,
        10.0,
    );
}

#[test]
fn test_interpret_closure_state() {
    assert_result_number(
        r#"
        (def makeCounter ()
          (begin
            (var count 0)
            (lambda ()
              (begin
                (++ count)
                count))))
        (var next (makeCounter))
        (next)
        (next)
        (next)
        "#,
        3.0,
    );
}

#[test]
fn test_interpret_recursion() {
    assert_result_number(
        r#"
        (def factorial (x)
          (if (= x 1)
            1
            (* x (factorial (- x 1)))))
        (factorial 5)
        "#,
        120.0,
    );
}

#[test]
fn test_interpret_callback() {
    assert_result_number(
        r#"
        (def onClick (callback)
          (begin
            (var x 10)
            (var y 20)
            (callback (+ x y))))
        (onClick (lambda (data) (* data 10)))
        "#,
        300.0,
    );
}

#[test]
fn test_interpret_iife() {
    assert_result_number("((lambda (x) (* x x)) 2)", 4.0);
}

#[test]
fn test_interpret_stored_lambda() {
    assert_result_number(
        r#"
        (var square (lambda (x) (* x x)))
        (square 2)
        "#,
        4.0,
    );
}

#[test]
fn test_interpret_missing_arguments_are_null() {
    assert_result_null("(def second (a b) b) (second 1)");
    assert_result_number("(def first (a) a) (first 1 2 3)", 1.0);
}

#[test]
fn test_interpret_def_equivalent_to_var_lambda() {
    let sugared = interpret("(def sq (x) (* x x)) (sq 4)").unwrap();
    let core = interpret("(var sq (lambda (x) (* x x))) (sq 4)").unwrap();
    assert_eq!(sugared, core);
    assert_eq!(sugared, Value::Number(16.0));
}

// ==================== Classes ====================

const POINTS: &str = r#"
    (class Point null
      (begin
        (def constructor (this x y)
          (begin
            (set (prop this x) x)
            (set (prop this y) y)))
        (def calc (this)
          (+ (prop this x) (prop this y)))))

    (class Point3D Point
      (begin
        (def constructor (this x y z)
          (begin
            ((prop (super Point3D) constructor) this x y)
            (set (prop this z) z)))
        (def calc (this)
          (+ ((prop (super Point3D) calc) this) (prop this z)))))
"#;

#[test]
fn test_interpret_class_instance() {
    let source = format!(
        "{}\n(var p (new Point 10 20))\n((prop p calc) p)",
        POINTS
    );
    assert_result_number(&source, 30.0);
}

#[test]
fn test_interpret_class_inheritance() {
    let source = format!(
        "{}\n(var p (new Point3D 10 20 30))\n((prop p calc) p)",
        POINTS
    );
    assert_result_number(&source, 60.0);
}

#[test]
fn test_interpret_super_is_parent_class() {
    let source = format!("{}\n(= (super Point3D) Point)", POINTS);
    assert_result_bool(&source, true);
}

#[test]
fn test_interpret_class_without_parent_operand() {
    assert_result_number(
        r#"
        (class Box
          (begin
            (def constructor (this v)
              (set (prop this v) v))))
        (prop (new Box 7) v)
        "#,
        7.0,
    );
}

#[test]
fn test_interpret_instance_property_shadows_class_member() {
    assert_result_number(
        r#"
        (class A null
          (begin
            (var v 1)
            (def constructor (this) this)))
        (var a (new A))
        (set (prop a v) 2)
        (+ (prop a v) (prop A v))
        "#,
        3.0,
    );
}

#[test]
fn test_interpret_property_increment() {
    assert_result_number(
        r#"
        (class Counter null
          (begin
            (def constructor (this)
              (set (prop this count) 0))
            (def tick (this)
              (++ (prop this count)))))
        (var c (new Counter))
        ((prop c tick) c)
        ((prop c tick) c)
        (prop c count)
        "#,
        2.0,
    );
}

#[test]
fn test_interpret_member_lookup_walks_class_chain() {
    let classes = r#"
        (class A null
          (begin
            (var onlyA 7)
            (var shared "from A")
            (def constructor (this) this)
            (def describe (this) "A")))
        (class B A
          (begin
            (var onlyB 1)
            (var shared "from B")
            (def describe (this) "B")))
        ; B has no constructor of its own, so A's runs
        (var b (new B))
    "#;

    // Reached through instance -> B -> A
    assert_result_number(&format!("{}\n(prop b onlyA)", classes), 7.0);
    assert_result_number(&format!("{}\n(prop b onlyB)", classes), 1.0);
    // B's members win over A's
    assert_result_str(&format!("{}\n(prop b shared)", classes), "from B");
    assert_result_str(&format!("{}\n((prop b describe) b)", classes), "B");
    assert_result_str(&format!("{}\n((prop A describe) b)", classes), "A");
    assert_result_bool(&format!("{}\n(= (super B) A)", classes), true);
}

#[test]
fn test_interpret_new_without_constructor() {
    let err = runtime_error("(class Empty null (begin (var x 1))) (new Empty)");
    assert!(
        matches!(err, RuntimeError::UnresolvedReference { ref name } if name == "constructor")
    );
}

#[test]
fn test_interpret_class_parent_must_be_class() {
    let err = runtime_error("(class Bad 5 (begin (var x 1)))");
    assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
}

// ==================== Modules ====================

#[test]
fn test_interpret_inline_module() {
    assert_result_number(
        r#"
        (module Math
          (begin
            (def abs (value)
              (if (< value 0) (- value) value))
            (def square (x) (* x x))
            (var MAX_VALUE 1000)))
        ((prop Math abs) (- 10))
        "#,
        10.0,
    );
}

#[test]
fn test_interpret_module_member_closure() {
    assert_result_number(
        r#"
        (module Math
          (begin
            (def square (x) (* x x))
            (var MAX_VALUE 1000)))
        (var square (prop Math square))
        (+ (square 2) (prop Math MAX_VALUE))
        "#,
        1004.0,
    );
}

#[test]
fn test_interpret_import() {
    assert_result_number(
        r#"
        (import Math)
        ((prop Math square) 4)
        "#,
        16.0,
    );
    assert_result_number("(import Math) (prop Math MAX_VALUE)", 1000.0);
}

#[test]
fn test_interpret_import_from_nested_scope_binds_globally() {
    assert_result_number(
        r#"
        (def load ()
          (begin
            (import Math)
            1))
        (load)
        ((prop Math abs) (- 3))
        "#,
        3.0,
    );
}

// ==================== Errors ====================

#[test]
fn test_interpret_division_by_zero() {
    assert!(matches!(
        runtime_error("(/ 5 0)"),
        RuntimeError::DivisionByZero { .. }
    ));
    assert!(matches!(
        runtime_error("(% 5 0)"),
        RuntimeError::DivisionByZero { .. }
    ));
}

#[test]
fn test_interpret_unresolved_reference() {
    assert!(matches!(
        runtime_error("undeclaredVar"),
        RuntimeError::UnresolvedReference { ref name } if name == "undeclaredVar"
    ));
    assert!(matches!(
        runtime_error("(set undeclaredVar 1)"),
        RuntimeError::UnresolvedReference { ref name } if name == "undeclaredVar"
    ));
}

#[test]
fn test_interpret_empty_block() {
    assert!(matches!(runtime_error("(begin)"), RuntimeError::EmptyBlock));
    assert!(matches!(runtime_error(""), RuntimeError::EmptyBlock));
}

#[test]
fn test_interpret_not_callable() {
    assert!(matches!(
        runtime_error("(5 1)"),
        RuntimeError::NotCallable { .. }
    ));
    assert!(matches!(
        runtime_error(r#"(var s "text") (s)"#),
        RuntimeError::NotCallable {
            type_name: "string",
            ..
        }
    ));
}

#[test]
fn test_interpret_unimplemented_form() {
    assert!(matches!(
        runtime_error("()"),
        RuntimeError::UnimplementedForm { .. }
    ));
}

#[test]
fn test_interpret_malformed_forms() {
    for source in ["(var x)", "(while true)", "(lambda x x)", "(import)"] {
        assert!(
            matches!(runtime_error(source), RuntimeError::MalformedForm { .. }),
            "{} should be malformed",
            source
        );
    }
}

#[test]
fn test_interpret_type_mismatch() {
    assert!(matches!(
        runtime_error("(prop 5 x)"),
        RuntimeError::TypeMismatch { .. }
    ));
    assert!(matches!(
        runtime_error(r#"(* 2 "x")"#),
        RuntimeError::TypeMismatch { .. }
    ));
}

#[test]
fn test_interpret_module_not_found() {
    assert!(matches!(
        runtime_error("(import Missing)"),
        RuntimeError::ModuleNotFound { ref name, .. } if name == "Missing"
    ));
}

// ==================== Output ====================

#[test]
fn test_interpret_print() {
    let interpreter = interpreter();
    interpreter
        .eval_source(r#"(print "Hello," "World!") (print (+ 1 2))"#)
        .unwrap();
    assert_eq!(interpreter.output(), vec!["Hello, World!", "3"]);
}

#[test]
fn test_interpret_print_instance() {
    let interpreter = interpreter();
    interpreter
        .eval_source(
            r#"
            (class P null
              (begin
                (def constructor (this x)
                  (set (prop this x) x))))
            (print (new P 1))
            "#,
        )
        .unwrap();
    assert_eq!(interpreter.output(), vec!["{x: 1}"]);
}
