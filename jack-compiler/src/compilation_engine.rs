//! Single-pass recursive-descent parser and code generator for one class.
//!
//! No AST is retained: each grammar rule emits VM commands as it recognizes
//! its construct, the way the grammar in the governing specification
//! permits.

use std::fmt;

use crate::symbol_table::{SymbolKind, SymbolTable};
use crate::tokenizer::{Keyword, TokenKind, Tokenizer};
use crate::vm_writer::VmWriter;

#[derive(Debug)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected,
                found,
                line,
            } => write!(f, "expected {expected}, found {found} (line {line})"),
        }
    }
}

#[derive(Debug)]
pub enum SemanticError {
    UndeclaredIdentifier { name: String, line: usize },
}

impl std::error::Error for SemanticError {}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredIdentifier { name, line } => {
                write!(f, "undeclared identifier '{name}' (line {line})")
            }
        }
    }
}

#[derive(Debug)]
pub enum CompileError {
    Parse(ParseError),
    Semantic(SemanticError),
}

impl std::error::Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "ParseError: {e}"),
            Self::Semantic(e) => write!(f, "SemanticError: {e}"),
        }
    }
}

struct ResolvedVar {
    segment: &'static str,
    index: u16,
    type_name: String,
}

/// Compiles one Jack class into its VM translation.
pub struct CompilationEngine {
    tokenizer: Tokenizer,
    writer: VmWriter,
    class_name: String,
    class_scope: SymbolTable,
    subroutine_scope: SymbolTable,
    label_counter: usize,
}

impl CompilationEngine {
    #[must_use]
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            writer: VmWriter::new(),
            class_name: String::new(),
            class_scope: SymbolTable::new(),
            subroutine_scope: SymbolTable::new(),
            label_counter: 0,
        }
    }

    /// Compiles the single class the tokenizer was constructed over,
    /// returning its VM source lines.
    pub fn compile(mut self) -> Result<Vec<String>, CompileError> {
        self.compile_class()?;
        Ok(self.writer.into_lines())
    }

    // ---- token helpers -------------------------------------------------

    fn describe_current(&self) -> String {
        match self.tokenizer.kind() {
            Some(TokenKind::Keyword(k)) => format!("keyword '{}'", k.as_str()),
            Some(TokenKind::Symbol(c)) => format!("symbol '{c}'"),
            Some(TokenKind::IntegerConstant(v)) => format!("integer '{v}'"),
            Some(TokenKind::StringConstant(s)) => format!("string \"{s}\""),
            Some(TokenKind::Identifier(name)) => format!("identifier '{name}'"),
            None => "end of input".to_string(),
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> CompileError {
        CompileError::Parse(ParseError::UnexpectedToken {
            expected: expected.into(),
            found: self.describe_current(),
            line: self.tokenizer.line(),
        })
    }

    fn expect_keyword(&mut self, expected: Keyword) -> Result<(), CompileError> {
        match self.tokenizer.kind() {
            Some(TokenKind::Keyword(k)) if *k == expected => {
                self.tokenizer.advance();
                Ok(())
            }
            _ => Err(self.unexpected(format!("keyword '{}'", expected.as_str()))),
        }
    }

    fn expect_symbol(&mut self, expected: char) -> Result<(), CompileError> {
        match self.tokenizer.kind() {
            Some(TokenKind::Symbol(c)) if *c == expected => {
                self.tokenizer.advance();
                Ok(())
            }
            _ => Err(self.unexpected(format!("symbol '{expected}'"))),
        }
    }

    fn peek_symbol(&self, c: char) -> bool {
        matches!(self.tokenizer.kind(), Some(TokenKind::Symbol(actual)) if *actual == c)
    }

    fn peek_keyword(&self, kw: Keyword) -> bool {
        matches!(self.tokenizer.kind(), Some(TokenKind::Keyword(actual)) if *actual == kw)
    }

    fn expect_identifier(&mut self) -> Result<String, CompileError> {
        match self.tokenizer.kind().cloned() {
            Some(TokenKind::Identifier(name)) => {
                self.tokenizer.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// `"int" | "char" | "boolean" | className`.
    fn compile_type(&mut self) -> Result<String, CompileError> {
        match self.tokenizer.kind().cloned() {
            Some(TokenKind::Keyword(k @ (Keyword::Int | Keyword::Char | Keyword::Boolean))) => {
                self.tokenizer.advance();
                Ok(k.as_str().to_string())
            }
            Some(TokenKind::Identifier(name)) => {
                self.tokenizer.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn next_label(&mut self) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("L{n}")
    }

    fn lookup(&self, name: &str) -> Option<ResolvedVar> {
        self.subroutine_scope
            .lookup(name)
            .or_else(|| self.class_scope.lookup(name))
            .map(|entry| ResolvedVar {
                segment: entry.kind.segment(),
                index: entry.index,
                type_name: entry.type_name.clone(),
            })
    }

    fn resolve(&self, name: &str) -> Result<ResolvedVar, CompileError> {
        self.lookup(name).ok_or_else(|| {
            CompileError::Semantic(SemanticError::UndeclaredIdentifier {
                name: name.to_string(),
                line: self.tokenizer.line(),
            })
        })
    }

    fn write_push_var(&mut self, var: &ResolvedVar) {
        self.writer.write_push(var.segment, var.index);
    }

    fn write_pop_var(&mut self, var: &ResolvedVar) {
        self.writer.write_pop(var.segment, var.index);
    }

    // ---- grammar ---------------------------------------------------------

    fn compile_class(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.peek_keyword(Keyword::Static) || self.peek_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.peek_keyword(Keyword::Constructor)
            || self.peek_keyword(Keyword::Function)
            || self.peek_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }

        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        let kind = if self.peek_keyword(Keyword::Static) {
            self.tokenizer.advance();
            SymbolKind::Static
        } else {
            self.expect_keyword(Keyword::Field)?;
            SymbolKind::Field
        };

        let type_name = self.compile_type()?;
        loop {
            let name = self.expect_identifier()?;
            self.class_scope.define(&name, &type_name, kind);
            if self.peek_symbol(',') {
                self.tokenizer.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine(&mut self) -> Result<(), CompileError> {
        let is_method = self.peek_keyword(Keyword::Method);
        let is_constructor = self.peek_keyword(Keyword::Constructor);
        self.tokenizer.advance(); // constructor | function | method

        if self.peek_keyword(Keyword::Void) {
            self.tokenizer.advance();
        } else {
            self.compile_type()?;
        }

        let name = self.expect_identifier()?;
        self.subroutine_scope.reset();
        if is_method {
            self.subroutine_scope
                .define("this", &self.class_name.clone(), SymbolKind::Argument);
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.expect_symbol('{')?;
        while self.peek_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let n_locals = self.subroutine_scope.count(SymbolKind::Var);
        self.writer
            .write_function(&format!("{}.{}", self.class_name, name), n_locals);

        if is_constructor {
            let field_count = self.class_scope.count(SymbolKind::Field);
            self.writer.write_push("constant", field_count);
            self.writer.write_call("Memory.alloc", 1);
            self.writer.write_pop("pointer", 0);
        } else if is_method {
            self.writer.write_push("argument", 0);
            self.writer.write_pop("pointer", 0);
        }

        self.label_counter = 0;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompileError> {
        if self.peek_symbol(')') {
            return Ok(());
        }
        loop {
            let type_name = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.subroutine_scope
                .define(&name, &type_name, SymbolKind::Argument);
            if self.peek_symbol(',') {
                self.tokenizer.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Var)?;
        let type_name = self.compile_type()?;
        loop {
            let name = self.expect_identifier()?;
            self.subroutine_scope
                .define(&name, &type_name, SymbolKind::Var);
            if self.peek_symbol(',') {
                self.tokenizer.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_statements(&mut self) -> Result<(), CompileError> {
        loop {
            if self.peek_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.peek_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.peek_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.peek_keyword(Keyword::Do) {
                self.compile_do()?;
            } else if self.peek_keyword(Keyword::Return) {
                self.compile_return()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Let)?;
        let name = self.expect_identifier()?;

        if self.peek_symbol('[') {
            self.tokenizer.advance();
            let var = self.resolve(&name)?;
            self.write_push_var(&var);
            self.compile_expression()?;
            self.writer.write_arithmetic("add");
            self.expect_symbol(']')?;
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            self.writer.write_pop("temp", 0);
            self.writer.write_pop("pointer", 1);
            self.writer.write_push("temp", 0);
            self.writer.write_pop("that", 0);
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            let var = self.resolve(&name)?;
            self.write_pop_var(&var);
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.writer.write_arithmetic("not");
        let l_false = self.next_label();
        let l_end = self.next_label();
        self.writer.write_if(&l_false);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.writer.write_goto(&l_end);
        self.writer.write_label(&l_false);

        if self.peek_keyword(Keyword::Else) {
            self.tokenizer.advance();
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.writer.write_label(&l_end);
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::While)?;
        let l_top = self.next_label();
        let l_end = self.next_label();
        self.writer.write_label(&l_top);

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic("not");
        self.writer.write_if(&l_end);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.writer.write_goto(&l_top);
        self.writer.write_label(&l_end);
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Do)?;
        let name = self.expect_identifier()?;
        self.compile_call_tail(&name)?;
        self.expect_symbol(';')?;
        self.writer.write_pop("temp", 0);
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.expect_keyword(Keyword::Return)?;
        if self.peek_symbol(';') {
            self.writer.write_push("constant", 0);
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.writer.write_return();
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;
        loop {
            let op = match self.tokenizer.kind() {
                Some(TokenKind::Symbol(c)) if "+-*/&|<>=".contains(*c) => *c,
                _ => break,
            };
            self.tokenizer.advance();
            self.compile_term()?;
            self.emit_binary_op(op);
        }
        Ok(())
    }

    fn emit_binary_op(&mut self, op: char) {
        match op {
            '+' => self.writer.write_arithmetic("add"),
            '-' => self.writer.write_arithmetic("sub"),
            '&' => self.writer.write_arithmetic("and"),
            '|' => self.writer.write_arithmetic("or"),
            '<' => self.writer.write_arithmetic("lt"),
            '>' => self.writer.write_arithmetic("gt"),
            '=' => self.writer.write_arithmetic("eq"),
            '*' => self.writer.write_call("Math.multiply", 2),
            '/' => self.writer.write_call("Math.divide", 2),
            _ => unreachable!("emit_binary_op called with a non-operator symbol"),
        }
    }

    fn compile_term(&mut self) -> Result<(), CompileError> {
        match self.tokenizer.kind().cloned() {
            Some(TokenKind::IntegerConstant(v)) => {
                self.writer.write_push("constant", v);
                self.tokenizer.advance();
            }
            Some(TokenKind::StringConstant(s)) => {
                self.compile_string_constant(&s);
                self.tokenizer.advance();
            }
            Some(TokenKind::Keyword(Keyword::True)) => {
                self.writer.write_push("constant", 0);
                self.writer.write_arithmetic("not");
                self.tokenizer.advance();
            }
            Some(TokenKind::Keyword(Keyword::False | Keyword::Null)) => {
                self.writer.write_push("constant", 0);
                self.tokenizer.advance();
            }
            Some(TokenKind::Keyword(Keyword::This)) => {
                self.writer.write_push("pointer", 0);
                self.tokenizer.advance();
            }
            Some(TokenKind::Symbol('(')) => {
                self.tokenizer.advance();
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            Some(TokenKind::Symbol(c @ ('-' | '~'))) => {
                self.tokenizer.advance();
                self.compile_term()?;
                self.writer.write_arithmetic(if c == '-' { "neg" } else { "not" });
            }
            Some(TokenKind::Identifier(name)) => {
                self.tokenizer.advance();
                self.compile_identifier_term(&name)?;
            }
            _ => return Err(self.unexpected("a term")),
        }
        Ok(())
    }

    fn compile_identifier_term(&mut self, name: &str) -> Result<(), CompileError> {
        if self.peek_symbol('[') {
            self.tokenizer.advance();
            let var = self.resolve(name)?;
            self.write_push_var(&var);
            self.compile_expression()?;
            self.writer.write_arithmetic("add");
            self.expect_symbol(']')?;
            self.writer.write_pop("pointer", 1);
            self.writer.write_push("that", 0);
            return Ok(());
        }

        if self.peek_symbol('(') || self.peek_symbol('.') {
            return self.compile_call_tail(name);
        }

        let var = self.resolve(name)?;
        self.write_push_var(&var);
        Ok(())
    }

    /// The `"(" exprList ")"` or `"." ident "(" exprList ")"` tail shared by
    /// implicit-this calls, static/qualified calls, and `do` statements.
    fn compile_call_tail(&mut self, name: &str) -> Result<(), CompileError> {
        if self.peek_symbol('(') {
            self.tokenizer.advance();
            self.writer.write_push("pointer", 0);
            let n = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.writer
                .write_call(&format!("{}.{}", self.class_name, name), n + 1);
            return Ok(());
        }

        self.expect_symbol('.')?;
        let method = self.expect_identifier()?;
        self.expect_symbol('(')?;

        let (callee, extra_arg) = match self.lookup(name) {
            Some(var) => {
                let type_name = var.type_name.clone();
                self.write_push_var(&var);
                (type_name, 1u16)
            }
            None => (name.to_string(), 0u16),
        };

        let n = self.compile_expression_list()?;
        self.expect_symbol(')')?;
        self.writer.write_call(&format!("{callee}.{method}"), n + extra_arg);
        Ok(())
    }

    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        if self.peek_symbol(')') {
            return Ok(0);
        }
        let mut n = 1u16;
        self.compile_expression()?;
        while self.peek_symbol(',') {
            self.tokenizer.advance();
            self.compile_expression()?;
            n += 1;
        }
        Ok(n)
    }

    fn compile_string_constant(&mut self, s: &str) {
        self.writer.write_push("constant", s.len() as u16);
        self.writer.write_call("String.new", 1);
        for byte in s.bytes() {
            self.writer.write_push("constant", u16::from(byte));
            self.writer.write_call("String.appendChar", 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn compile(source: &str) -> Vec<String> {
        let tokenizer = Tokenizer::new(source).unwrap();
        CompilationEngine::new(tokenizer).compile().unwrap()
    }

    #[test]
    fn string_constant_expands_to_new_plus_append_char() {
        let out = compile(
            "class Main { function void main() { do Output.printString(\"AB\"); return; } }",
        );
        let start = out.iter().position(|l| l == "push constant 2").unwrap();
        assert_eq!(
            &out[start..start + 6],
            [
                "push constant 2",
                "call String.new 1",
                "push constant 65",
                "call String.appendChar 2",
                "push constant 66",
                "call String.appendChar 2",
            ]
        );
    }

    #[test]
    fn while_loop_emits_label_scheme_with_one_not() {
        let out = compile(
            "class Main { function void main() { var int x; while (x < 10) { let x = x + 1; } return; } }",
        );
        assert_eq!(out[0], "function Main.main 1");
        assert_eq!(out[1], "label L0");
        // condition: push x, push 10, lt
        assert!(out.contains(&"lt".to_string()));
        let not_count = out.iter().filter(|l| l.as_str() == "not").count();
        assert_eq!(not_count, 1);
        assert!(out.contains(&"if-goto L1".to_string()));
        assert!(out.contains(&"goto L0".to_string()));
        assert!(out.contains(&"label L1".to_string()));
    }

    #[test]
    fn constructor_allocates_memory_before_body() {
        let out = compile(
            "class Point { field int x, y; constructor Point new(int ax, int ay) { let x = ax; let y = ay; return this; } }",
        );
        assert_eq!(out[0], "function Point.new 0");
        assert_eq!(out[1], "push constant 2");
        assert_eq!(out[2], "call Memory.alloc 1");
        assert_eq!(out[3], "pop pointer 0");
        assert!(out.contains(&"push pointer 0".to_string()));
    }

    #[test]
    fn method_sets_this_from_argument_zero() {
        let out = compile(
            "class Point { field int x; method int getX() { return x; } }",
        );
        assert_eq!(out[0], "function Point.getX 0");
        assert_eq!(out[1], "push argument 0");
        assert_eq!(out[2], "pop pointer 0");
    }

    #[test]
    fn array_assignment_uses_temp_to_survive_pointer_reuse() {
        let out = compile(
            "class Main { function void main() { var Array a; let a[0] = a[1]; return; } }",
        );
        assert_eq!(
            out.iter().filter(|l| l.as_str() == "pop pointer 1").count(),
            2
        );
        assert!(out.contains(&"pop temp 0".to_string()));
        assert!(out.contains(&"push temp 0".to_string()));
    }

    #[test]
    fn void_return_with_no_expression_pushes_zero() {
        let out = compile("class Main { function void main() { return; } }");
        assert_eq!(out, vec!["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn undeclared_identifier_is_a_semantic_error() {
        let tokenizer =
            Tokenizer::new("class Main { function void main() { let x = 1; return; } }").unwrap();
        let err = CompilationEngine::new(tokenizer).compile().unwrap_err();
        assert!(matches!(err, CompileError::Semantic(_)));
    }

    #[test]
    fn static_call_on_class_name_passes_no_implicit_argument() {
        let out = compile(
            "class Main { function void main() { do Math.sqrt(4); return; } }",
        );
        assert!(out.contains(&"call Math.sqrt 1".to_string()));
    }
}
