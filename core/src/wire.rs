//! Length-delimited framing for messages on a byte stream.
//!
//! A frame is the head (start line and headers, up to and including the blank
//! line) followed by exactly `Content-Length` body bytes. Nothing is read
//! past the declared body, so the stream stays positioned at the start of the
//! next message and one connection can carry any number of exchanges.
//!
//! Reading until the peer closes the stream is never used: on a persistent
//! connection it would block forever.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, SmsError};
use crate::http::{self, LINE_TERMINATOR};

/// Upper bound for start line plus headers.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Default upper bound for a single body (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1_048_576;

/// Read one frame from the reader.
///
/// Bare `\r\n` lines ahead of the start line are skipped; they are the
/// trailing terminator a peer writes after a response body. At most
/// `MAX_HEAD_SIZE + 1` head bytes are ever buffered, even when a line never
/// ends.
pub async fn read_frame<R>(reader: &mut R, max_body_size: usize) -> Result<Vec<u8>, SmsError>
where
    R: AsyncBufRead + Unpin,
{
    let mut frame = Vec::new();

    loop {
        let line_start = frame.len();
        let allowance = (MAX_HEAD_SIZE + 1 - line_start) as u64;
        let n = (&mut *reader)
            .take(allowance)
            .read_until(b'\n', &mut frame)
            .await?;
        if n == 0 {
            if frame.is_empty() {
                return Err(ProtocolError::ConnectionClosed.into());
            }
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed inside message head",
            )
            .into());
        }

        if &frame[line_start..] == LINE_TERMINATOR.as_bytes() {
            if line_start == 0 {
                frame.clear();
                continue;
            }
            break;
        }

        if frame.len() > MAX_HEAD_SIZE {
            return Err(ProtocolError::HeadTooLarge { max: MAX_HEAD_SIZE }.into());
        }
    }

    let head = std::str::from_utf8(&frame).map_err(|_| ProtocolError::InvalidUtf8)?;
    let declared = http::content_length(head.split(LINE_TERMINATOR).skip(1))?
        .ok_or(ProtocolError::MissingContentLength)?;
    if declared > max_body_size {
        return Err(ProtocolError::BodyTooLarge {
            size: declared,
            max: max_body_size,
        }
        .into());
    }

    let head_len = frame.len();
    frame.resize(head_len + declared, 0);
    reader.read_exact(&mut frame[head_len..]).await?;

    Ok(frame)
}

/// Write a complete message and flush it.
pub async fn write_frame<W>(writer: &mut W, data: &[u8]) -> Result<(), SmsError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}
