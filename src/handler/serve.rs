//! Range and conditional-GET serving of one resource stream
//!
//! Picks 200, 206, 304 or 416 from the request headers and the stream's
//! byte count, then copies the selected bytes through a fixed-size buffer.

use std::io;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::context::RequestContext;
use crate::error::ServeError;
use crate::http::{self, cache};
use crate::logger;
use crate::resource::ResourceStream;

/// Transfer buffer size used when none is configured
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Upper bound for the body preallocation, the buffer grows past it if needed
const MAX_PREALLOC: usize = 1 << 20;

/// Copy `reader` into `writer` until end of stream using a buffer of
/// `buffer_size` bytes. Returns the number of bytes copied.
pub async fn transfer<R, W>(reader: &mut R, writer: &mut W, buffer_size: usize) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut copied = 0u64;
    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buffer[..n]).await?;
        copied += n as u64;
    }
    writer.flush().await?;
    Ok(copied)
}

/// Serve `stream` as the response to `ctx`.
///
/// The stream is consumed; it is closed when this returns, whichever branch ran.
pub async fn serve_stream(
    ctx: &RequestContext,
    mut stream: ResourceStream,
    content_type: &str,
    buffer_size: usize,
    last_modified: i64,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let path = ctx.path();
    let total = stream.available();
    let etag = cache::generate_etag(path, last_modified, &ctx.query, total);

    let Some(range) = http::parse_range_header(ctx.header("range")) else {
        if cache::check_etag_match(ctx.header("if-none-match"), &etag) {
            return Ok(http::build_304_response(content_type));
        }
        let body = read_body(&mut stream, total, buffer_size)
            .await
            .map_err(|e| ServeError::transfer(path, e))?;
        return Ok(http::build_full_response(body, content_type, &etag));
    };

    if !range.is_satisfiable(total) {
        return Ok(http::build_416_response(total, &etag));
    }

    let end = range.end_position(total);
    let length = range.content_length(total);

    tokio::io::copy(&mut (&mut stream).take(range.start), &mut tokio::io::sink())
        .await
        .map_err(|e| ServeError::transfer(path, e))?;
    let body = read_body(&mut stream, length, buffer_size)
        .await
        .map_err(|e| ServeError::transfer(path, e))?;

    Ok(http::build_partial_response(
        body,
        content_type,
        &etag,
        range.start,
        end,
        total,
    ))
}

/// Read at most `limit` bytes of the stream into a body buffer
async fn read_body(stream: &mut ResourceStream, limit: u64, buffer_size: usize) -> io::Result<Bytes> {
    let capacity = usize::try_from(limit).map_or(MAX_PREALLOC, |n| n.min(MAX_PREALLOC));
    let mut body = Vec::with_capacity(capacity);
    let copied = transfer(&mut stream.take(limit), &mut body, buffer_size).await?;
    if copied < limit {
        logger::log_warning(&format!(
            "Resource ended early: expected {limit} bytes, read {copied}"
        ));
    }
    Ok(Bytes::from(body))
}
