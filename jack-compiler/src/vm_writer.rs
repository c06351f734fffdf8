//! Emits VM command text, one line per call.
//!
//! Styled after `hack_vm::code_writer::CodeWriter`: accumulate into an
//! in-memory buffer rather than writing to a file directly, so a whole
//! class compiles to a `Vec<String>` that the driver can join and write
//! once, or that tests can inspect without touching the filesystem.

pub struct VmWriter {
    lines: Vec<String>,
}

impl Default for VmWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VmWriter {
    #[must_use]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn write_push(&mut self, segment: &str, index: u16) {
        self.lines.push(format!("push {segment} {index}"));
    }

    pub fn write_pop(&mut self, segment: &str, index: u16) {
        self.lines.push(format!("pop {segment} {index}"));
    }

    pub fn write_arithmetic(&mut self, command: &str) {
        self.lines.push(command.to_string());
    }

    pub fn write_label(&mut self, label: &str) {
        self.lines.push(format!("label {label}"));
    }

    pub fn write_goto(&mut self, label: &str) {
        self.lines.push(format!("goto {label}"));
    }

    pub fn write_if(&mut self, label: &str) {
        self.lines.push(format!("if-goto {label}"));
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) {
        self.lines.push(format!("call {name} {n_args}"));
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) {
        self.lines.push(format!("function {name} {n_locals}"));
    }

    pub fn write_return(&mut self) {
        self.lines.push("return".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_one_line_per_call() {
        let mut w = VmWriter::new();
        w.write_push("constant", 7);
        w.write_call("Math.sqrt", 1);
        w.write_return();
        assert_eq!(
            w.into_lines(),
            vec![
                "push constant 7".to_string(),
                "call Math.sqrt 1".to_string(),
                "return".to_string(),
            ]
        );
    }
}
