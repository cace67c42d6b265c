//! CSV export of the processed table.
//!
//! Rows are written to a temporary file next to the destination, which is
//! then persisted over it. If anything fails before that the temporary
//! file is removed and the destination is untouched.
//!
//! A new file gets the same mode as [`File::create`](std::fs::File::create)
//! would give it. Replacing a file keeps that file's permissions.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{Terminator, Writer, WriterBuilder};
use serde_json::Value;
use tempfile::{Builder, NamedTempFile};

use crate::error::{ExportError, ExportResult};
use crate::models::{cell_text, RecordTable};

/// Header of the leading row-label column.
pub const INDEX_HEADER: &str = "";

/// Writes to a temp file and moves it into place on [`finish`](Self::finish).
pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicCsvWriter {
    pub fn new(final_path: impl AsRef<Path>) -> ExportResult<Self> {
        let final_path = final_path.as_ref().to_path_buf();

        // A bare file name has an empty parent.
        let parent_dir = match final_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp_file = temp_builder().tempfile_in(parent_dir)?;
        let writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(temp_file));

        Ok(Self { writer, final_path })
    }

    pub fn writer_mut(&mut self) -> &mut Writer<BufWriter<NamedTempFile>> {
        &mut self.writer
    }

    /// Flush and replace the destination. Returns the destination path.
    pub fn finish(self) -> ExportResult<PathBuf> {
        let buf_writer = self.writer.into_inner().map_err(|e| {
            ExportError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
        })?;

        let named_temp = buf_writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;

        if let Ok(existing) = fs::metadata(&self.final_path) {
            named_temp.as_file().set_permissions(existing.permissions())?;
        }

        named_temp
            .persist(&self.final_path)
            .map_err(|e| ExportError::Persist {
                path: self.final_path.clone(),
                message: e.error.to_string(),
            })?;

        Ok(self.final_path)
    }
}

// tempfile defaults to 0600; ask for 0666 and let the umask narrow it.
#[cfg(unix)]
fn temp_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> Builder<'static, 'static> {
    Builder::new()
}

fn cell_field(value: &Value) -> String {
    cell_text(value).unwrap_or_default()
}

/// Write `table` with a leading index column of row labels.
///
/// An existing file at `path` is overwritten.
pub fn export_table(table: &RecordTable, path: impl AsRef<Path>) -> ExportResult<PathBuf> {
    let mut out = AtomicCsvWriter::new(path)?;

    let mut header = Vec::with_capacity(table.columns().len() + 1);
    header.push(INDEX_HEADER.to_string());
    header.extend(table.columns().iter().cloned());
    out.writer_mut().write_record(&header)?;

    for record in table.rows() {
        let mut fields = Vec::with_capacity(record.values.len() + 1);
        fields.push(record.label.to_string());
        fields.extend(record.values.iter().map(cell_field));
        out.writer_mut().write_record(&fields)?;
    }

    out.finish()
}
