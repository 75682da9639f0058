use std::io::Write;
use crate::error::Result;
use crate::formats::write_failure;
use crate::method::AndroidMethod;
use crate::writer::Writer;

pub struct JsonWriter;

impl Writer for JsonWriter {
    fn write(&self, methods: &[AndroidMethod], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, methods)?;
        writeln!(out).map_err(write_failure)
    }
}
