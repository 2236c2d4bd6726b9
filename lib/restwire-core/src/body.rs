//! Body compilation.
//!
//! Strategy selection, first match wins:
//!
//! 1. an explicit [`BodyParam`] is emitted unchanged,
//! 2. without files, form fields are url-encoded,
//! 3. with at least one file, a multipart body is streamed.

use std::io::Read;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::file::FileParam;
use crate::multipart::MultipartWriter;
use crate::param::{BodyParam, FormFieldParam};
use crate::{Method, Result};

/// Content type of url-encoded form bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A compiled request body and the content type it implies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledBody {
    /// Content type derived from the selected strategy, if any.
    pub content_type: Option<String>,
    /// Encoded body bytes. Empty for `GET`.
    pub body: Bytes,
}

impl CompiledBody {
    /// Returns `true` if there is nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// A reader over the body bytes.
    #[must_use]
    pub fn reader(&self) -> impl Read + use<> {
        self.body.clone().reader()
    }
}

/// The parts of a request the body compiler reads.
pub(crate) struct BodySource<'a> {
    pub(crate) method: Method,
    pub(crate) body: Option<&'a BodyParam>,
    pub(crate) form_fields: &'a [FormFieldParam],
    pub(crate) files: &'a [FileParam],
    pub(crate) boundary: Option<&'a str>,
}

pub(crate) fn compile_body(source: &BodySource<'_>) -> Result<CompiledBody> {
    if !source.method.allows_body() {
        debug!(method = %source.method, "method carries no body");
        return Ok(CompiledBody::default());
    }

    if let Some(body) = source.body {
        debug!(content_type = %body.content_type, "using explicit body");
        return Ok(CompiledBody {
            content_type: (!body.content_type.is_empty()).then(|| body.content_type.clone()),
            body: body.content.clone(),
        });
    }

    if source.files.is_empty() {
        debug!(fields = source.form_fields.len(), "encoding url-encoded form");
        return Ok(CompiledBody {
            content_type: Some(FORM_URLENCODED.to_string()),
            body: encode_form(source.form_fields),
        });
    }

    debug!(
        fields = source.form_fields.len(),
        files = source.files.len(),
        "encoding multipart form"
    );
    encode_multipart(source.form_fields, source.files, source.boundary)
}

fn encode_form(fields: &[FormFieldParam]) -> Bytes {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|f| (f.name.as_str(), f.value.as_str())))
        .finish();
    Bytes::from(encoded)
}

fn encode_multipart(
    fields: &[FormFieldParam],
    files: &[FileParam],
    boundary: Option<&str>,
) -> Result<CompiledBody> {
    let buf = BytesMut::new().writer();
    let mut writer = match boundary {
        Some(boundary) => MultipartWriter::with_boundary(buf, boundary),
        None => MultipartWriter::new(buf),
    };
    let content_type = writer.content_type();

    for field in fields {
        writer.write_field(&field.name, &field.value)?;
    }
    for file in files {
        let written = writer.write_file(file)?;
        debug!(
            field = file.field_name(),
            file_name = file.file_name(),
            bytes = written,
            "wrote file part"
        );
    }

    let body = writer.finish()?.into_inner().freeze();
    Ok(CompiledBody {
        content_type: Some(content_type),
        body,
    })
}
