const INDENT: &str = "    ";

/// Start a new line indented by `indent_num` levels.
pub fn new_line_and_indent(s: &mut String, indent_num: usize) {
    s.push('\n');
    for _ in 0..indent_num {
        s.push_str(INDENT);
    }
}
