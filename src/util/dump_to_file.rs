//! Writing rendered artifacts to disk.

use crate::error::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes any displayable value into a file.
pub trait DumpToFile {
    fn dump_to_file(&self, path: &Path) -> Result<()>;
}

impl<T: fmt::Display> DumpToFile for T {
    fn dump_to_file(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "{}", self)?;
        file.flush()?;
        Ok(())
    }
}
