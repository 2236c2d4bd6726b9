//! Multipart form data encoder.
//!
//! [`MultipartWriter`] writes text fields and file parts into any
//! [`Write`] sink, streaming file contents through
//! [`FileContent::write_to`](crate::FileContent::write_to).
//!
//! # Example
//!
//! ```
//! use restwire_core::{FileParam, MultipartWriter};
//!
//! let mut buf = Vec::new();
//! let mut writer = MultipartWriter::with_boundary(&mut buf, "b0undary");
//! writer.write_field("name", "John").expect("field");
//! writer
//!     .write_file(&FileParam::from_bytes("avatar", "a.txt", "hi"))
//!     .expect("file");
//! writer.finish().expect("finish");
//!
//! let body = String::from_utf8(buf).expect("utf8");
//! assert!(body.ends_with("--b0undary--\r\n"));
//! ```

use std::io::Write;

use crate::file::FileParam;
use crate::{Error, Result};

/// Streaming `multipart/form-data` encoder.
#[derive(Debug)]
pub struct MultipartWriter<W> {
    writer: W,
    boundary: String,
}

impl<W: Write> MultipartWriter<W> {
    /// Create a writer with a random boundary.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_boundary(writer, generate_boundary())
    }

    /// Create a writer with a fixed boundary.
    ///
    /// The boundary must not appear in any part data.
    #[must_use]
    pub fn with_boundary(writer: W, boundary: impl Into<String>) -> Self {
        Self {
            writer,
            boundary: boundary.into(),
        }
    }

    /// The boundary separating parts.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Content-Type header value for this body.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Write a text field.
    ///
    /// # Errors
    ///
    /// [`Error::MultipartWrite`] if the underlying writer fails.
    pub fn write_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_part_header(name, None, None)?;
        self.put(value.as_bytes())?;
        self.put(b"\r\n")
    }

    /// Write a file part, streaming its content.
    ///
    /// # Errors
    ///
    /// [`Error::MultipartWrite`] if the writer fails, [`Error::FileAccess`]
    /// if the file content cannot be read.
    pub fn write_file(&mut self, file: &FileParam) -> Result<u64> {
        self.write_part_header(
            file.field_name(),
            Some(file.file_name()),
            Some(file.content_type()),
        )?;
        let written = file.content().write_to(&mut self.writer)?;
        self.put(b"\r\n")?;
        Ok(written)
    }

    /// Write the closing boundary and return the inner writer.
    ///
    /// # Errors
    ///
    /// [`Error::MultipartWrite`] if the underlying writer fails.
    pub fn finish(mut self) -> Result<W> {
        self.put(b"--")?;
        let boundary = std::mem::take(&mut self.boundary);
        self.put(boundary.as_bytes())?;
        self.put(b"--\r\n")?;
        self.writer.flush().map_err(Error::MultipartWrite)?;
        Ok(self.writer)
    }

    fn write_part_header(
        &mut self,
        name: &str,
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let mut header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"",
            self.boundary,
            escape_quotes(name)
        );
        if let Some(filename) = filename {
            header.push_str("; filename=\"");
            header.push_str(&escape_quotes(filename));
            header.push('"');
        }
        header.push_str("\r\n");
        if let Some(content_type) = content_type {
            header.push_str("Content-Type: ");
            header.push_str(content_type);
            header.push_str("\r\n");
        }
        header.push_str("\r\n");
        self.put(header.as_bytes())
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(Error::MultipartWrite)
    }
}

/// Escape `\`, `"` and line breaks inside a quoted header parameter.
fn escape_quotes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Generate a random 32 hex character boundary.
fn generate_boundary() -> String {
    format!(
        "{:016x}{:016x}",
        rand::random::<u64>(),
        rand::random::<u64>()
    )
}
