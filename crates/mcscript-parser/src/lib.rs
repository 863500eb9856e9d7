//! Parser for McScript.
//!
//! Transforms a token stream into a syntax tree.

mod hints;
mod parser;

pub use parser::{ParseError, ParseResult, Parser, MAX_NESTING_DEPTH};

#[cfg(test)]
mod tests {
    use super::*;
    use mcscript_ast::{ExprKind, InfixOp, PrefixOp, StmtKind};

    fn parse(src: &str) -> ParseResult {
        let lex_result = mcscript_lexer::Lexer::new(src).tokenize();
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        Parser::new(lex_result.tokens).parse()
    }

    fn render(src: &str) -> String {
        let result = parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        result.program.to_string()
    }

    #[test]
    fn var_statements() {
        let result = parse("var x = 5; var y = true; var foobar = y;");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        assert_eq!(result.program.statements.len(), 3);

        let names: Vec<_> = result
            .program
            .statements
            .iter()
            .map(|s| match &s.kind {
                StmtKind::Var { name, .. } => name.as_str(),
                other => panic!("Expected var statement, got {:?}", other),
            })
            .collect();
        assert_eq!(names, ["x", "y", "foobar"]);
    }

    #[test]
    fn semicolons_are_optional() {
        let result = parse("var arr = [1, 2, 3]\nreturn arr");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        assert_eq!(result.program.statements.len(), 2);
        assert!(matches!(result.program.statements[1].kind, StmtKind::Return(_)));
    }

    #[test]
    fn operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a + b / c", "(a + (b / c))"),
            ("1 + 2 * 3", "(1 + (2 * 3))"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("true != false", "(true != false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            ("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))", "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"),
        ];

        for (input, expected) in cases {
            assert_eq!(render(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn assignment_is_right_associative_and_lowest() {
        assert_eq!(render("x = y = 1 + 2"), "x = y = (1 + 2)");
        assert_eq!(render("i = i + 1"), "i = (i + 1)");
    }

    #[test]
    fn assignment_target_is_not_restricted() {
        let result = parse("1 + x = 5");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        match &result.program.statements[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Assign { target, .. } => assert_eq!(target.to_string(), "(1 + x)"),
                other => panic!("Expected assignment, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn prefix_expressions() {
        let result = parse("!5; -15;");
        assert!(result.is_ok());
        let ops: Vec<_> = result
            .program
            .statements
            .iter()
            .map(|s| match &s.kind {
                StmtKind::Expr(expr) => match &expr.kind {
                    ExprKind::Prefix { op, operand } => (*op, operand.to_string()),
                    other => panic!("Expected prefix, got {:?}", other),
                },
                other => panic!("Expected expression statement, got {:?}", other),
            })
            .collect();
        assert_eq!(ops, [(PrefixOp::Not, "5".to_string()), (PrefixOp::Neg, "15".to_string())]);
    }

    #[test]
    fn if_else_expression() {
        assert_eq!(render("if (x < y) { x } else { y }"), "if ((x < y)) { x } else { y }");
        assert_eq!(render("if (x) { }"), "if (x) {}");
    }

    #[test]
    fn function_literals() {
        assert_eq!(render("function(x, y) { x + y; }"), "function(x, y) { (x + y) }");
        assert_eq!(render("function() { return 1; }"), "function() { return 1; }");

        let result = parse("function(x, y, z) {};");
        match &result.program.statements[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Function { params, body } => {
                    assert_eq!(params, &["x", "y", "z"]);
                    assert!(body.is_empty());
                }
                other => panic!("Expected function, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn for_statement() {
        let src = "for (var i = 0; i < 10; i = i + 1) { print(i); }";
        assert_eq!(render(src), "for (var i = 0; (i < 10); i = (i + 1)) { print(i) }");
    }

    #[test]
    fn call_and_index_postfix() {
        let result = parse("add(1, 2 * 3)[0]");
        match &result.program.statements[0].kind {
            StmtKind::Expr(expr) => match &expr.kind {
                ExprKind::Index { target, index } => {
                    assert!(matches!(target.kind, ExprKind::Call { .. }));
                    assert_eq!(index.kind, ExprKind::Int(0));
                }
                other => panic!("Expected index, got {:?}", other),
            },
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn infix_operator_kinds() {
        let ops = ["+", "-", "*", "/", "<", ">", "==", "!="];
        let expected = [
            InfixOp::Add, InfixOp::Sub, InfixOp::Mul, InfixOp::Div,
            InfixOp::Lt, InfixOp::Gt, InfixOp::Eq, InfixOp::Ne,
        ];
        for (src_op, want) in ops.iter().zip(expected) {
            let result = parse(&format!("5 {} 5", src_op));
            match &result.program.statements[0].kind {
                StmtKind::Expr(expr) => match &expr.kind {
                    ExprKind::Infix { op, .. } => assert_eq!(*op, want),
                    other => panic!("Expected infix, got {:?}", other),
                },
                other => panic!("Expected expression statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn spans_cover_whole_statement() {
        let result = parse("var x = 1 + 2;");
        let stmt = &result.program.statements[0];
        assert_eq!((stmt.span.start, stmt.span.end), (0, 14));
        if let StmtKind::Var { value, .. } = &stmt.kind {
            assert_eq!((value.span.start, value.span.end), (8, 13));
        }
    }

    #[test]
    fn missing_expression_reports_and_recovers() {
        let result = parse("var x = ; var y = 2;");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Expected expression, found ';'");
        assert_eq!(result.errors[0].hint.as_deref(), Some("statement is incomplete"));
        assert_eq!(result.program.statements.len(), 1);
        assert_eq!(result.program.to_string(), "var y = 2;");
    }

    #[test]
    fn unclosed_call() {
        let result = parse("add(1, 2");
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].message, "Unclosed '(' - missing ')'");
    }

    #[test]
    fn keyword_as_name() {
        let result = parse("var if = 1;");
        assert_eq!(result.errors[0].message, "Expected name, found 'if'");
        assert_eq!(result.errors[0].hint.as_deref(), Some("keywords can't be used as names"));
    }

    #[test]
    fn deeply_nested_expression() {
        let depth = MAX_NESTING_DEPTH - 1;
        let src = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let result = parse(&src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        assert_eq!(result.program.to_string(), "1");
    }

    fn assert_too_deep(src: &str) {
        let result = parse(src);
        assert!(!result.is_ok());
        assert_eq!(
            result.errors[0].message,
            format!("Nesting too deep (max depth: {})", MAX_NESTING_DEPTH)
        );
    }

    #[test]
    fn over_deep_nesting_is_rejected() {
        let depth = MAX_NESTING_DEPTH + 1;
        assert_too_deep(&format!("{}1{}", "(".repeat(depth), ")".repeat(depth)));
        assert_too_deep(&format!("{}1", "-".repeat(5_000)));
        assert_too_deep(&format!("{}1", "!".repeat(20_000)));
        assert_too_deep(&format!("{}1{}", "[".repeat(depth), "]".repeat(depth)));
    }

    #[test]
    fn over_deep_blocks_are_rejected() {
        let depth = 100_000;
        assert_too_deep(&format!("{}1{}", "{".repeat(depth), "}".repeat(depth)));
    }

    #[test]
    fn long_left_chains_are_bounded() {
        let chain = vec!["1"; 5_000].join(" + ");
        assert_too_deep(&chain);
        assert_too_deep(&format!("f{}", "()".repeat(5_000)));

        let short = vec!["1"; 100].join(" + ");
        let result = parse(&short);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        assert!(result.program.to_string().starts_with("((((1 + 1)"));
    }

    #[test]
    fn nesting_limit_resets_between_statements() {
        let line = format!("{}1;", "-".repeat(MAX_NESTING_DEPTH - 10));
        let result = parse(&line.repeat(5));
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        assert_eq!(result.program.statements.len(), 5);
    }
}
