use std::io::Write;
use crate::error::Result;
use crate::formats::write_failure;
use crate::method::AndroidMethod;
use crate::writer::Writer;

/// Writes methods back in permission-map syntax, one per line.
pub struct TextWriter;

impl Writer for TextWriter {
    fn write(&self, methods: &[AndroidMethod], out: &mut dyn Write) -> Result<()> {
        for method in methods {
            writeln!(out, "{}", method).map_err(write_failure)?;
        }
        out.flush().map_err(write_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PermissionMethodParser;

    #[test]
    fn output_parses_back_to_same_map() {
        let original = PermissionMethodParser::from_lines([
            "<a.B: void m(int,long)> p.ONE -> _SINK_",
            "<a.B: <init>()>",
            "<a.C: int n()> -> _SOURCE_",
        ])
        .parse()
        .unwrap();

        let mut buf = Vec::new();
        TextWriter.write(&original.sorted(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("<a.B: <init>()>\n"));

        let reparsed = PermissionMethodParser::from_lines(text.lines()).parse().unwrap();
        assert_eq!(reparsed.methods, original.methods);
        assert!(reparsed.skipped.is_empty());
    }
}
