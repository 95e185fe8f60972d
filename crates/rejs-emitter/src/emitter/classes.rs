use super::Printer;
use rejs_parser::node::{ClassData, MethodKind};
use rejs_parser::precedence::Precedence;
use rejs_parser::{NodeData, NodeIndex};

impl<'a> Printer<'a> {
    // =========================================================================
    // Classes
    // =========================================================================

    /// `class Name extends Base { ... }`, one member per line.
    pub(super) fn emit_class(&mut self, class: &ClassData) {
        self.write("class");
        if class.name.is_some() {
            self.write_space();
            self.write_identifier_text(class.name);
        }
        if class.heritage.is_some() {
            self.write(" extends ");
            self.emit_expression(class.heritage, Precedence::LeftHandSide);
        }
        self.write_space();
        if class.members.is_empty() {
            self.write("{}");
            return;
        }
        let saved = std::mem::replace(&mut self.disallow_in, false);
        self.write("{");
        self.write_line();
        self.increase_indent();
        self.emit_statement_lines(&class.members.nodes);
        self.write_line();
        self.decrease_indent();
        self.write("}");
        self.disallow_in = saved;
    }

    pub(super) fn emit_class_member(&mut self, idx: NodeIndex) {
        match self.arena.data(idx) {
            Some(NodeData::MethodDefinition(method)) => {
                if method.is_static {
                    self.write("static ");
                }
                let accessor = match method.kind {
                    MethodKind::Get => Some("get"),
                    MethodKind::Set => Some("set"),
                    MethodKind::Method | MethodKind::Constructor => None,
                };
                self.emit_method_modifiers(method.value, accessor);
                self.emit_property_name(method.name, method.computed);
                if let Some(function) = self.arena.data(method.value).and_then(NodeData::function_data)
                {
                    self.emit_function(function, false);
                }
            }
            Some(NodeData::PropertyDefinition(field)) => {
                if field.is_static {
                    self.write("static ");
                }
                self.emit_property_name(field.name, field.computed);
                if field.value.is_some() {
                    self.write(" = ");
                    self.emit_expression(field.value, Precedence::Assignment);
                }
                self.write(";");
            }
            Some(NodeData::StaticBlock(_)) => {
                self.write("static ");
                self.emit_block(idx);
            }
            _ => {}
        }
    }
}
