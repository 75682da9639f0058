use std::io::Write;
use crate::error::Result;
use crate::formats::write_failure;
use crate::method::AndroidMethod;
use crate::writer::Writer;

pub struct YamlWriter;

impl Writer for YamlWriter {
    fn write(&self, methods: &[AndroidMethod], out: &mut dyn Write) -> Result<()> {
        let yaml = serde_yml::to_string(methods)?;
        out.write_all(yaml.as_bytes()).map_err(write_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Role;
    use crate::parser::PermissionMethodParser;

    #[test]
    fn yaml_output_deserializes_back() {
        let map = PermissionMethodParser::from_lines([
            "<a.B: <init>(java.lang.String)> -> _NONE_",
            "<a.B: void m()> p.X p.Y",
        ])
        .parse()
        .unwrap();

        let mut buf = Vec::new();
        YamlWriter.write(&map.sorted(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("className: a.B"));

        let back: Vec<AndroidMethod> = serde_yml::from_str(&text).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].return_type(), "");
        assert_eq!(back[0].role(), Role::Neither);
        assert_eq!(back[1].permissions().len(), 2);
    }
}
