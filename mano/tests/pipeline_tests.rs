use mano::compile;
use mano_parser::ast::{BinaryOp, Expr, Stmt};
use mano_source::{Phase, Severity};

#[test]
fn empty_and_comment_only_programs_compile_cleanly() {
    for source in ["", "   \n  ", "// nothing to see here\n"] {
        let compilation = compile(source);
        assert!(compilation.succeeded(), "source: {:?}", source);
        assert!(compilation.diagnostics().is_empty());
    }
}

#[test]
fn minimal_program_is_accepted() {
    let compilation = compile("let x: int = 42;");
    assert!(compilation.succeeded());
    assert!(compilation.diagnostics().is_empty());

    let program = compilation.program.as_ref().expect("program parses");
    assert_eq!(program.declarations.len(), 1);
    match &program.declarations[0] {
        Stmt::VarDeclaration {
            name,
            declared_type,
            initializer,
            resolved_type,
            ..
        } => {
            assert_eq!(name, "x");
            assert_eq!(declared_type.name, "int");
            assert!(declared_type.is_const);
            assert!(matches!(
                initializer,
                Some(Expr::Literal { value }) if value == "42"
            ));
            assert_eq!(resolved_type.as_ref().unwrap().name, "int");
        }
        other => panic!("expected a variable declaration, got {:?}", other),
    }
}

#[test]
fn initializer_type_mismatch_fails_compilation() {
    let compilation = compile("let x: int = 3.14;");
    assert!(!compilation.succeeded());

    let semantic: Vec<_> = compilation
        .diagnostics()
        .iter()
        .filter(|d| d.phase == Phase::Semantic)
        .collect();
    assert_eq!(semantic.len(), 1);
    assert!(semantic[0].message.contains("Type mismatch"));
    assert!(semantic[0].message.contains("int"));
    assert!(semantic[0].message.contains("float"));
}

#[test]
fn function_bodies_are_fully_annotated() {
    let compilation = compile("fun add(a: int, b: int): int { return a + b; }");
    assert!(compilation.succeeded(), "{:?}", compilation.diagnostics());

    let program = compilation.program.as_ref().unwrap();
    match &program.declarations[0] {
        Stmt::FunDeclaration { params, body, .. } => {
            assert_eq!(params.len(), 2);
            match &body.statements[0] {
                Stmt::Return {
                    expr: Some(Expr::Binary { op, lhs, rhs, ty }),
                    ..
                } => {
                    assert_eq!(*op, BinaryOp::Add);
                    assert_eq!(ty.as_ref().unwrap().name, "int");
                    for operand in [lhs, rhs] {
                        match operand.as_ref() {
                            Expr::Identifier { ty, symbol, .. } => {
                                assert_eq!(ty.as_ref().unwrap().name, "int");
                                assert!(symbol.is_some());
                            }
                            other => panic!("expected an identifier, got {:?}", other),
                        }
                    }
                }
                other => panic!("expected a return of a binary expression, got {:?}", other),
            }
        }
        other => panic!("expected a function declaration, got {:?}", other),
    }
}

#[test]
fn break_outside_a_loop_is_a_semantic_error() {
    let compilation = compile("fun f() { break; }");
    assert!(!compilation.succeeded());
    let messages: Vec<_> = compilation
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(messages, vec!["Break statement outside loop"]);
    assert_eq!(compilation.diagnostics()[0].phase, Phase::Semantic);
}

#[test]
fn undefined_identifiers_are_reported() {
    let compilation = compile("fun f(): int { return y; }");
    assert!(!compilation.succeeded());
    assert!(compilation
        .diagnostics()
        .iter()
        .any(|d| d.message == "Undefined identifier: y"));
}

#[test]
fn unterminated_strings_fail_in_the_lexer() {
    let compilation = compile("var s: string = \"oops");
    assert!(!compilation.succeeded());

    let lexical: Vec<_> = compilation
        .diagnostics()
        .iter()
        .filter(|d| d.phase == Phase::Lexer)
        .collect();
    assert_eq!(lexical.len(), 1);
    assert_eq!(lexical[0].message, "Unterminated string literal");
    assert_eq!(lexical[0].severity, Severity::Error);
}

#[test]
fn the_first_parse_error_stops_the_pipeline() {
    let compilation = compile("let x: int 42;");
    assert!(!compilation.succeeded());
    assert!(compilation.program.is_none());
    assert!(compilation.symbols.is_none());

    let parse_errors: Vec<_> = compilation
        .diagnostics()
        .iter()
        .filter(|d| d.phase == Phase::Parser)
        .collect();
    assert_eq!(parse_errors.len(), 1);
    assert!(parse_errors[0].line > 0);
    assert!(parse_errors[0].column > 0);
}

#[test]
fn diagnostics_render_in_the_stable_format() {
    let compilation = compile("let x: int 42;");
    let rendered = compilation.diagnostics()[0].to_string();
    assert_eq!(
        rendered,
        "[Line 1, Column 12] Error: Expected '=' after type for constant declaration."
    );
}

#[test]
fn semantic_analysis_reports_every_error_it_finds() {
    let source = "\
fun f(): int { break; return y; }
fun g() { let b: bool = 1; }
";
    let compilation = compile(source);
    assert!(!compilation.succeeded());
    let messages: Vec<_> = compilation
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert!(messages.contains(&"Break statement outside loop"));
    assert!(messages.contains(&"Undefined identifier: y"));
    assert!(messages
        .iter()
        .any(|m| m.contains("Type mismatch in variable 'b'")));
}

mod programs {
    use super::*;

    #[test]
    fn a_small_well_formed_module_compiles() {
        let source = r#"
enum Suit { Hearts, Diamonds, Clubs, Spades }

class Counter {
    var count: int = 0;
    fun bump(): int { return count + 1; }
}

fun total(values: [int], limit: int): int {
    var sum: int = 0;
    for (var i: int = 0; i < limit; i = i + 1) {
        sum = sum + values[i];
        if (sum > 100) {
            break;
        }
    }
    return sum;
}

fun main(): int {
    let suit: Suit = Suit.Spades;
    var counter: Counter = Counter();
    var values: [int] = [1, 2, 3];
    while (counter.bump() < 2) {
        continue;
    }
    return total(values, 3);
}
"#;
        let compilation = compile(source);
        assert!(
            compilation.succeeded(),
            "diagnostics: {:?}",
            compilation.diagnostics()
        );
        assert!(compilation.symbols.is_some());
    }

    #[test]
    fn switch_statements_type_check_end_to_end() {
        let source = r#"
fun describe(code: int): string {
    switch (code) {
        case 0: { return "zero"; }
        case 1: { return "one"; }
        default: { return "many"; }
    }
    return "unreachable";
}
"#;
        let compilation = compile(source);
        assert!(
            compilation.succeeded(),
            "diagnostics: {:?}",
            compilation.diagnostics()
        );
    }
}
