//! File attachments for multipart bodies.
//!
//! A [`FileParam`] never touches its content when it is built. The bytes are
//! produced by [`FileContent::write_to`] while the multipart body is being
//! encoded, and files on disk are copied in [`CHUNK_SIZE`] chunks so they
//! are never loaded in memory at once.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::trace;

use crate::{Error, Result};

/// Size of the buffer used to stream files from disk.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Where the bytes of a file part come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Bytes already in memory.
    InMemory(Bytes),
    /// A file read when the body is encoded.
    OnDisk(PathBuf),
}

impl FileContent {
    /// Stream the content into `writer`, returning the number of bytes written.
    ///
    /// Files are opened here and closed before returning, on success or error.
    ///
    /// # Errors
    ///
    /// [`Error::FileAccess`] if the file cannot be opened or read,
    /// [`Error::MultipartWrite`] if the writer fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        match self {
            Self::InMemory(bytes) => {
                writer.write_all(bytes).map_err(Error::MultipartWrite)?;
                Ok(bytes.len() as u64)
            }
            Self::OnDisk(path) => {
                let mut file = File::open(path).map_err(|e| Error::file_access(path, e))?;
                copy_chunked(&mut file, writer, path)
            }
        }
    }
}

fn copy_chunked<W: Write + ?Sized>(file: &mut File, writer: &mut W, path: &Path) -> Result<u64> {
    let mut buf = vec![0_u8; CHUNK_SIZE];
    let mut written = 0_u64;
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::file_access(path, e)),
        };
        let chunk = buf.get(..n).unwrap_or_default();
        writer.write_all(chunk).map_err(Error::MultipartWrite)?;
        written += n as u64;
    }
    trace!(path = %path.display(), bytes = written, "streamed file content");
    Ok(written)
}

/// One multipart file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParam {
    field_name: String,
    file_name: String,
    content_type: String,
    content_length: u64,
    content: FileContent,
}

impl FileParam {
    /// Create a file part from in-memory bytes.
    ///
    /// The content type is guessed from the file name extension, or
    /// `application/octet-stream` if unknown. The bytes are never inspected,
    /// so a name without an extension (`"README"`, `"blob"`) always gets
    /// `application/octet-stream`; use
    /// [`with_content_type`](Self::with_content_type) when the caller knows
    /// better.
    #[must_use]
    pub fn from_bytes(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let bytes = bytes.into();
        Self {
            field_name: field_name.into(),
            content_type: guess_content_type(Path::new(&file_name)),
            file_name,
            content_length: bytes.len() as u64,
            content: FileContent::InMemory(bytes),
        }
    }

    /// Create a file part streamed from a path.
    ///
    /// The file is stat'd now for its size; its content is only read when the
    /// body is encoded.
    ///
    /// # Errors
    ///
    /// [`Error::FileAccess`] if the path cannot be stat'd or is not a regular file.
    pub fn from_path(field_name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| Error::file_access(path, e))?;
        if !metadata.is_file() {
            return Err(Error::file_access(
                path,
                std::io::Error::new(ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            field_name: field_name.into(),
            file_name,
            content_type: guess_content_type(path),
            content_length: metadata.len(),
            content: FileContent::OnDisk(path.to_path_buf()),
        })
    }

    /// Override the guessed content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Form field name of the part.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// File name sent in the `Content-Disposition` header.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Content type of the part.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes, as known when the part was created.
    #[must_use]
    pub const fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Source of the part bytes.
    #[must_use]
    pub const fn content(&self) -> &FileContent {
        &self.content
    }
}

fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn from_bytes_guesses_content_type() {
        let file = FileParam::from_bytes("avatar", "photo.PNG", vec![0x89, 0x50]);
        check!(file.field_name() == "avatar");
        check!(file.file_name() == "photo.PNG");
        check!(file.content_type() == "image/png");
        check!(file.content_length() == 2);

        let unknown = FileParam::from_bytes("blob", "data.unknownext", "x");
        check!(unknown.content_type() == "application/octet-stream");
    }

    #[test]
    fn extensionless_name_ignores_content() {
        let png_bytes = FileParam::from_bytes("scan", "scan", vec![0x89, b'P', b'N', b'G']);
        check!(png_bytes.content_type() == "application/octet-stream");

        let declared = png_bytes.with_content_type("image/png");
        check!(declared.content_type() == "image/png");
    }

    #[test]
    fn from_path_stats_without_reading() {
        let mut tmp = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .expect("tempfile");
        tmp.write_all(b"hello world").expect("write");

        let file = FileParam::from_path("doc", tmp.path()).expect("file param");
        check!(file.content_length() == 11);
        check!(file.content_type() == "text/plain");
        check!(file.file_name().ends_with(".txt"));
        check!(file.content() == &FileContent::OnDisk(tmp.path().to_path_buf()));
    }

    #[test]
    fn from_path_missing_file() {
        let result = FileParam::from_path("doc", "/definitely/not/here.bin");
        let_assert!(Err(Error::FileAccess { path, .. }) = result);
        check!(path == PathBuf::from("/definitely/not/here.bin"));
    }

    #[test]
    fn from_path_rejects_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = FileParam::from_path("doc", dir.path());
        check!(result.expect_err("directory").is_file_access());
    }

    #[test]
    fn write_in_memory() {
        let content = FileContent::InMemory(Bytes::from_static(b"abc"));
        let mut out = Vec::new();
        let written = content.write_to(&mut out).expect("write");
        check!(written == 3);
        check!(out == b"abc");
    }

    #[test]
    fn write_on_disk_streams_in_chunks() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
        tmp.write_all(&data).expect("write");

        let content = FileContent::OnDisk(tmp.path().to_path_buf());
        let mut out = Vec::new();
        let written = content.write_to(&mut out).expect("stream");
        check!(written == data.len() as u64);
        check!(out == data);
    }

    #[test]
    fn write_on_disk_missing_file() {
        let content = FileContent::OnDisk(PathBuf::from("/definitely/not/here.bin"));
        let mut out = Vec::new();
        let result = content.write_to(&mut out);
        check!(result.expect_err("missing").is_file_access());
        check!(out.is_empty());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_multipart_error() {
        let content = FileContent::InMemory(Bytes::from_static(b"abc"));
        let result = content.write_to(&mut FailingWriter);
        let_assert!(Err(Error::MultipartWrite(_)) = result);
    }
}
