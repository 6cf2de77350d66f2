//! steward-wire — length-prefixed message framing.
//!
//! The transport framing used to talk to remote external schedulers:
//! each message is prefixed with an 8-digit zero-padded decimal byte
//! length and a newline, followed by exactly that many payload bytes.
//!
//! ```text
//! 00000325\n
//! <325 bytes of payload>
//! ```
//!
//! The codec knows nothing about payload contents; it owns only the
//! frame contract. Sync encode/decode work over byte buffers, and async
//! helpers run the same contract over any `AsyncRead`/`AsyncWrite`.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Header bytes: 8 decimal digits plus the terminating newline.
pub const HEADER_LEN: usize = 9;

/// Largest payload the codec will frame or accept.
pub const MAX_PAYLOAD_LEN: usize = 16 * 1024 * 1024;

/// Result type alias for framing operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors raised by the frame codec.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame header is not an 8-digit decimal length")]
    HeaderNotNumeric,

    #[error("frame header missing newline terminator")]
    MissingTerminator,

    #[error("frame payload of {0} bytes exceeds the {MAX_PAYLOAD_LEN} byte limit")]
    Oversized(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Frame a payload: header plus payload bytes.
pub fn encode_frame(payload: &[u8]) -> FrameResult<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::Oversized(payload.len()));
    }
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(format!("{:08}\n", payload.len()).as_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Decode one frame from the front of `buf`.
///
/// Returns `Ok(None)` when the buffer holds only part of a frame — read
/// more and try again. On success, returns the payload and the number of
/// bytes consumed from `buf`.
pub fn decode_frame(buf: &[u8]) -> FrameResult<Option<(Vec<u8>, usize)>> {
    if buf.len() < HEADER_LEN {
        return Ok(None);
    }
    let len = parse_header(&buf[..HEADER_LEN])?;
    let total = HEADER_LEN + len;
    if buf.len() < total {
        return Ok(None);
    }
    Ok(Some((buf[HEADER_LEN..total].to_vec(), total)))
}

/// Write one framed payload.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> FrameResult<()>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(payload)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one framed payload.
pub async fn read_frame<R>(reader: &mut R) -> FrameResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let len = parse_header(&header)?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

fn parse_header(header: &[u8]) -> FrameResult<usize> {
    if header[HEADER_LEN - 1] != b'\n' {
        return Err(FrameError::MissingTerminator);
    }
    let digits = &header[..HEADER_LEN - 1];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::HeaderNotNumeric);
    }
    let text = std::str::from_utf8(digits).map_err(|_| FrameError::HeaderNotNumeric)?;
    let len: usize = text.parse().map_err(|_| FrameError::HeaderNotNumeric)?;
    if len > MAX_PAYLOAD_LEN {
        return Err(FrameError::Oversized(len));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_padded_header() {
        let frame = encode_frame(b"hello").unwrap();
        assert_eq!(&frame[..HEADER_LEN], b"00000005\n");
        assert_eq!(&frame[HEADER_LEN..], b"hello");
    }

    #[test]
    fn decode_round_trips() {
        let frame = encode_frame(b"start_job 42").unwrap();
        let (payload, consumed) = decode_frame(&frame).unwrap().unwrap();
        assert_eq!(payload, b"start_job 42");
        assert_eq!(consumed, frame.len());
    }

    #[test]
    fn decode_reports_incomplete_input() {
        let frame = encode_frame(b"hello").unwrap();
        assert!(decode_frame(&frame[..4]).unwrap().is_none());
        assert!(decode_frame(&frame[..HEADER_LEN + 2]).unwrap().is_none());
    }

    #[test]
    fn decode_leaves_trailing_bytes() {
        let mut buf = encode_frame(b"one").unwrap();
        buf.extend_from_slice(&encode_frame(b"two").unwrap());
        let (payload, consumed) = decode_frame(&buf).unwrap().unwrap();
        assert_eq!(payload, b"one");
        let (payload, _) = decode_frame(&buf[consumed..]).unwrap().unwrap();
        assert_eq!(payload, b"two");
    }

    #[test]
    fn bad_headers_are_rejected() {
        assert!(matches!(
            decode_frame(b"0000000x\npayload"),
            Err(FrameError::HeaderNotNumeric)
        ));
        assert!(matches!(
            decode_frame(b"000000055payload"),
            Err(FrameError::MissingTerminator)
        ));
    }

    #[test]
    fn oversized_payloads_are_rejected() {
        let header = format!("{:08}\n", MAX_PAYLOAD_LEN + 1);
        assert!(matches!(
            decode_frame(header.as_bytes()),
            Err(FrameError::Oversized(_))
        ));
        let big = vec![0u8; MAX_PAYLOAD_LEN + 1];
        assert!(matches!(encode_frame(&big), Err(FrameError::Oversized(_))));
    }

    #[test]
    fn empty_payload_frames() {
        let frame = encode_frame(b"").unwrap();
        assert_eq!(frame, b"00000000\n");
        let (payload, consumed) = decode_frame(&frame).unwrap().unwrap();
        assert!(payload.is_empty());
        assert_eq!(consumed, HEADER_LEN);
    }

    #[tokio::test]
    async fn async_round_trip_over_duplex() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        write_frame(&mut client, b"get_jobs arg=all").await.unwrap();
        let payload = read_frame(&mut server).await.unwrap();
        assert_eq!(payload, b"get_jobs arg=all");
    }

    #[tokio::test]
    async fn async_read_sees_header_errors() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"garbage!\n").await.unwrap();
        assert!(matches!(
            read_frame(&mut server).await,
            Err(FrameError::HeaderNotNumeric)
        ));
    }
}
