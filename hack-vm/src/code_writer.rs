//! Translates parsed VM commands into Hack assembly.
//!
//! Every `write_*` method appends lines to an internal buffer rather than
//! touching the filesystem directly, so a whole program (one file or many)
//! can be assembled in memory before anything is written out, and so the
//! translator can be exercised from tests without a temp directory.

use std::fmt;

macro_rules! push_asm {
    ($self:expr, $($line:expr),+ $(,)?) => {
        $( $self.lines.push($line.to_string()); )+
    };
}

#[derive(Debug)]
pub enum CodeWriterError {
    UnknownArithmetic(String),
    UnknownSegment(String),
}

impl std::error::Error for CodeWriterError {}

impl fmt::Display for CodeWriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArithmetic(cmd) => write!(f, "unknown arithmetic command: {cmd}"),
            Self::UnknownSegment(seg) => write!(f, "unknown memory segment: {seg}"),
        }
    }
}

#[derive(Clone, Copy)]
enum Segment {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl Segment {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(Self::Local),
            "argument" => Some(Self::Argument),
            "this" => Some(Self::This),
            "that" => Some(Self::That),
            "temp" => Some(Self::Temp),
            "pointer" => Some(Self::Pointer),
            "static" => Some(Self::Static),
            "constant" => Some(Self::Constant),
            _ => None,
        }
    }

    /// The base-pointer symbol for segments addressed as `*(base + index)`.
    fn base_symbol(self) -> &'static str {
        match self {
            Self::Local => "LCL",
            Self::Argument => "ARG",
            Self::This => "THIS",
            Self::That => "THAT",
            _ => unreachable!("base_symbol only called for offset segments"),
        }
    }
}

pub struct CodeWriter {
    lines: Vec<String>,
    label_counter: usize,
    call_counter: usize,
    filename: String,
    current_function: String,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            label_counter: 0,
            call_counter: 0,
            filename: String::new(),
            current_function: String::new(),
        }
    }

    /// Starts the static segment scope for a new source file.
    #[inline]
    pub fn set_filename(&mut self, stem: &str) {
        self.filename.clear();
        self.filename.push_str(stem);
    }

    /// Consumes the writer, returning the finished assembly listing.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Emits the standard bootstrap: sets `SP` to 256 and calls `Sys.init`.
    pub fn write_bootstrap(&mut self) {
        push_asm!(self, "// bootstrap", "@256", "D=A", "@SP", "M=D");
        self.write_call("Sys.init", 0);
    }

    pub fn write_arithmetic(&mut self, command: &str) -> Result<(), CodeWriterError> {
        self.lines.push(format!("// {command}"));
        match command {
            "add" => self.write_binary_op("D+M"),
            "sub" => self.write_binary_op("D-M"),
            "and" => self.write_binary_op("D&M"),
            "or" => self.write_binary_op("D|M"),
            "neg" => self.write_unary_op(true),
            "not" => self.write_unary_op(false),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            other => return Err(CodeWriterError::UnknownArithmetic(other.to_string())),
        }
        Ok(())
    }

    fn write_binary_op(&mut self, operation: &str) {
        self.write_pop_to_d();
        push_asm!(self, "@R14", "M=D");
        self.write_pop_to_d();
        push_asm!(self, "@R13", "M=D", "@R13", "D=M", "@R14", format!("D={operation}"));
        self.write_push_d();
    }

    fn write_unary_op(&mut self, is_neg: bool) {
        self.write_pop_to_d();
        if is_neg {
            push_asm!(self, "@0", "D=A-D");
        } else {
            push_asm!(self, "D=!D");
        }
        self.write_push_d();
    }

    fn write_comparison(&mut self, jump: &str) {
        let label_prefix = match jump {
            "JEQ" => "EQ",
            "JGT" => "GT",
            "JLT" => "LT",
            _ => jump,
        };
        let n = self.label_counter;
        self.label_counter += 1;

        self.write_pop_to_d();
        push_asm!(self, "@R14", "M=D");
        self.write_pop_to_d();
        push_asm!(
            self,
            "@R13",
            "M=D",
            "@R13",
            "D=M",
            "@R14",
            "D=D-M",
            format!("@{label_prefix}{n}"),
            format!("D;{jump}"),
            "@SP",
            "A=M",
            "M=0",
            "@SP",
            "M=M+1",
            format!("@END{label_prefix}{n}"),
            "0;JMP",
            format!("({label_prefix}{n})"),
            "@SP",
            "A=M",
            "M=-1",
            "@SP",
            "M=M+1",
            format!("(END{label_prefix}{n})"),
        );
    }

    pub fn write_push_pop(
        &mut self,
        is_push: bool,
        segment: &str,
        index: i32,
    ) -> Result<(), CodeWriterError> {
        let verb = if is_push { "push" } else { "pop" };
        self.lines.push(format!("// {verb} {segment} {index}"));

        if is_push {
            self.write_push(segment, index)
        } else {
            self.write_pop(segment, index)
        }
    }

    fn write_push(&mut self, segment: &str, index: i32) -> Result<(), CodeWriterError> {
        match Segment::from_str(segment) {
            Some(Segment::Constant) => {
                push_asm!(self, format!("@{index}"), "D=A");
                self.write_push_d();
            }
            Some(seg @ (Segment::Local | Segment::Argument | Segment::This | Segment::That)) => {
                let base = seg.base_symbol();
                push_asm!(self, format!("@{base}"), "D=M", format!("@{index}"), "A=D+A", "D=M");
                self.write_push_d();
            }
            Some(Segment::Temp) => {
                push_asm!(self, format!("@{}", 5 + index), "D=M");
                self.write_push_d();
            }
            Some(Segment::Pointer) => {
                let sym = pointer_symbol(index)?;
                push_asm!(self, format!("@{sym}"), "D=M");
                self.write_push_d();
            }
            Some(Segment::Static) => {
                push_asm!(self, format!("@{}.{}", self.filename, index), "D=M");
                self.write_push_d();
            }
            None => return Err(CodeWriterError::UnknownSegment(segment.to_string())),
        }
        Ok(())
    }

    fn write_pop(&mut self, segment: &str, index: i32) -> Result<(), CodeWriterError> {
        match Segment::from_str(segment) {
            Some(seg @ (Segment::Local | Segment::Argument | Segment::This | Segment::That)) => {
                let base = seg.base_symbol();
                push_asm!(self, format!("@{base}"), "D=M", format!("@{index}"), "D=D+A", "@R13", "M=D");
                self.write_pop_to_d();
                push_asm!(self, "@R13", "A=M", "M=D");
            }
            Some(Segment::Temp) => {
                self.write_pop_to_d();
                push_asm!(self, format!("@{}", 5 + index), "M=D");
            }
            Some(Segment::Pointer) => {
                let sym = pointer_symbol(index)?;
                self.write_pop_to_d();
                push_asm!(self, format!("@{sym}"), "M=D");
            }
            Some(Segment::Static) => {
                self.write_pop_to_d();
                push_asm!(self, format!("@{}.{}", self.filename, index), "M=D");
            }
            Some(Segment::Constant) | None => {
                return Err(CodeWriterError::UnknownSegment(segment.to_string()))
            }
        }
        Ok(())
    }

    pub fn write_label(&mut self, label: &str) {
        push_asm!(self, format!("({})", self.scoped_label(label)));
    }

    pub fn write_goto(&mut self, label: &str) {
        push_asm!(self, format!("@{}", self.scoped_label(label)), "0;JMP");
    }

    pub fn write_if(&mut self, label: &str) {
        self.write_pop_to_d();
        push_asm!(self, format!("@{}", self.scoped_label(label)), "D;JNE");
    }

    fn scoped_label(&self, label: &str) -> String {
        if self.current_function.is_empty() {
            label.to_string()
        } else {
            format!("{}${}", self.current_function, label)
        }
    }

    pub fn write_function(&mut self, function_name: &str, n_vars: i32) {
        self.current_function = function_name.to_string();
        push_asm!(self, format!("({function_name})"));
        for _ in 0..n_vars {
            push_asm!(self, "@0", "D=A");
            self.write_push_d();
        }
    }

    pub fn write_call(&mut self, function_name: &str, n_args: i32) {
        let return_label = format!(
            "{}$ret.{}",
            if self.current_function.is_empty() {
                "CALL"
            } else {
                self.current_function.as_str()
            },
            self.call_counter
        );
        self.call_counter += 1;

        push_asm!(self, format!("@{return_label}"), "D=A");
        self.write_push_d();
        for symbol in ["LCL", "ARG", "THIS", "THAT"] {
            push_asm!(self, format!("@{symbol}"), "D=M");
            self.write_push_d();
        }
        push_asm!(
            self,
            "@SP",
            "D=M",
            format!("@{}", n_args + 5),
            "D=D-A",
            "@ARG",
            "M=D",
            "@SP",
            "D=M",
            "@LCL",
            "M=D",
            format!("@{function_name}"),
            "0;JMP",
            format!("({return_label})"),
        );
    }

    pub fn write_return(&mut self) {
        push_asm!(
            self,
            "// return",
            "@LCL",
            "D=M",
            "@R13",
            "M=D",
            "@5",
            "A=D-A",
            "D=M",
            "@R14",
            "M=D"
        );
        self.write_pop_to_d();
        push_asm!(
            self,
            "@ARG",
            "A=M",
            "M=D",
            "@ARG",
            "D=M+1",
            "@SP",
            "M=D",
            "@R13",
            "AM=M-1",
            "D=M",
            "@THAT",
            "M=D",
            "@R13",
            "AM=M-1",
            "D=M",
            "@THIS",
            "M=D",
            "@R13",
            "AM=M-1",
            "D=M",
            "@ARG",
            "M=D",
            "@R13",
            "AM=M-1",
            "D=M",
            "@LCL",
            "M=D",
            "@R14",
            "A=M",
            "0;JMP",
        );
    }

    #[inline]
    fn write_push_d(&mut self) {
        push_asm!(self, "@SP", "A=M", "M=D", "@SP", "M=M+1");
    }

    #[inline]
    fn write_pop_to_d(&mut self) {
        push_asm!(self, "@SP", "M=M-1", "A=M", "D=M");
    }
}

fn pointer_symbol(index: i32) -> Result<&'static str, CodeWriterError> {
    match index {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        other => Err(CodeWriterError::UnknownSegment(format!(
            "pointer {other}"
        ))),
    }
}
