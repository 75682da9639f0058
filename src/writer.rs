use std::io::Write;
use crate::error::Result;
use crate::method::AndroidMethod;

/// Renders a list of methods in one output format.
/// Callers pass methods already in the order they want them written.
pub trait Writer {
    fn write(&self, methods: &[AndroidMethod], out: &mut dyn Write) -> Result<()>;
}
