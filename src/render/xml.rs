use std::io::{self, Write};

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// Path data carries mixed integer and fractional coordinates; fractional
// values round to two decimals and drop trailing zeros so whole numbers
// print bare.
pub(crate) fn fmt_num(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{value:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn write_path(
    out: &mut dyn Write,
    d: &str,
    class: &str,
    style: Option<&str>,
) -> io::Result<()> {
    match style {
        Some(style) => writeln!(
            out,
            r#"<path d="{d}" class="{}" style="{}"/>"#,
            escape_xml(class),
            escape_xml(style)
        ),
        None => writeln!(out, r#"<path d="{d}" class="{}"/>"#, escape_xml(class)),
    }
}
