//! Line-oriented output buffer with indentation.

pub(crate) struct SourceWriter {
    output: String,
    indent_unit: String,
    indent_level: usize,
    at_line_start: bool,
}

impl SourceWriter {
    pub(crate) fn new(indent_width: usize) -> Self {
        SourceWriter {
            output: String::new(),
            indent_unit: " ".repeat(indent_width),
            indent_level: 0,
            at_line_start: true,
        }
    }

    fn write_indent_if_needed(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_indent_if_needed();
        self.output.push_str(text);
    }

    pub(crate) fn write_char(&mut self, ch: char) {
        self.write_indent_if_needed();
        self.output.push(ch);
    }

    pub(crate) fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub(crate) fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub(crate) fn into_string(self) -> String {
        self.output
    }
}
