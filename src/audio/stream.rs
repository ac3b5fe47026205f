//! `Read + Seek` over an HTTP stream endpoint using `Range` requests.
//!
//! Bytes are fetched in fixed-size chunks on demand and a handful of recent
//! chunks are kept so the decoder's probing and small backward seeks do not
//! hit the network again.

use std::collections::VecDeque;
use std::io::{self, Read, Seek, SeekFrom};

use tracing::debug;

use crate::error::{Error, Result};

pub(super) const CHUNK_SIZE: u64 = 256 * 1024;
const MAX_CHUNKS: usize = 16;

struct Chunk {
    offset: u64,
    data: Vec<u8>,
}

impl Chunk {
    fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}

pub struct HttpRangeReader {
    agent: ureq::Agent,
    url: String,
    len: Option<u64>,
    position: u64,
    chunks: VecDeque<Chunk>,
}

impl HttpRangeReader {
    /// Open the stream and learn its length.
    ///
    /// `HEAD` is tried first; servers that only route `GET` are asked for
    /// the first byte instead and the total is read from `Content-Range`.
    pub fn open(agent: ureq::Agent, url: &str) -> Result<Self> {
        let len = match agent.head(url).call() {
            Ok(response) => match header_u64(&response, "Content-Length") {
                Some(len) => Some(len),
                None => length_from_range_request(&agent, url).unwrap_or(None),
            },
            Err(e) => {
                debug!(url, error = %e, "HEAD rejected, asking for the first byte instead");
                length_from_range_request(&agent, url)?
            }
        };
        debug!(url, len, "opened stream");

        Ok(Self {
            agent,
            url: url.to_string(),
            len,
            position: 0,
            chunks: VecDeque::new(),
        })
    }

    pub fn len(&self) -> Option<u64> {
        self.len
    }

    fn cached(&self, offset: u64) -> Option<&[u8]> {
        self.chunks
            .iter()
            .find(|c| offset >= c.offset && offset < c.end())
            .map(|c| &c.data[(offset - c.offset) as usize..])
    }

    fn fetch(&mut self, offset: u64) -> io::Result<()> {
        let last = match self.len {
            Some(len) => (offset + CHUNK_SIZE).min(len) - 1,
            None => offset + CHUNK_SIZE - 1,
        };
        let range = format!("bytes={offset}-{last}");

        let response = match self.agent.get(&self.url).set("Range", &range).call() {
            Ok(response) => response,
            // Past the end of a stream whose length we never learned.
            Err(ureq::Error::Status(416, _)) => return Ok(()),
            Err(e) => return Err(io::Error::other(Error::from_ureq(&self.url, e))),
        };

        // A plain 200 is only usable when we asked for the beginning.
        if response.status() != 206 && offset != 0 {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "server ignored the Range header",
            ));
        }

        let mut data = Vec::with_capacity((last - offset + 1) as usize);
        response
            .into_reader()
            .take(last - offset + 1)
            .read_to_end(&mut data)?;

        self.chunks.push_back(Chunk { offset, data });
        if self.chunks.len() > MAX_CHUNKS {
            self.chunks.pop_front();
        }
        Ok(())
    }
}

impl Read for HttpRangeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.len.is_some_and(|len| self.position >= len) {
            return Ok(0);
        }

        if self.cached(self.position).is_none() {
            self.fetch(self.position)?;
        }
        let Some(available) = self.cached(self.position) else {
            // The server returned nothing for this offset: end of stream.
            return Ok(0);
        };

        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for HttpRangeReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.position = resolve_seek(self.position, self.len, pos)?;
        Ok(self.position)
    }
}

/// Ask for `bytes=0-0` and take the length from the response headers.
fn length_from_range_request(agent: &ureq::Agent, url: &str) -> Result<Option<u64>> {
    let response = agent
        .get(url)
        .set("Range", "bytes=0-0")
        .call()
        .map_err(|e| Error::from_ureq(url, e))?;

    if let Some(total) = response.header("Content-Range").and_then(total_from_content_range) {
        return Ok(Some(total));
    }
    // Only a full response's Content-Length is the stream length.
    if response.status() == 200 {
        return Ok(header_u64(&response, "Content-Length"));
    }
    Ok(None)
}

fn header_u64(response: &ureq::Response, name: &str) -> Option<u64> {
    response.header(name).and_then(|v| v.trim().parse::<u64>().ok())
}

/// `bytes 0-0/12345` -> `12345`; `None` for an unknown (`*`) total.
pub(super) fn total_from_content_range(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse::<u64>().ok()
}

/// Compute the absolute offset for `pos`.
pub(super) fn resolve_seek(current: u64, len: Option<u64>, pos: SeekFrom) -> io::Result<u64> {
    let target = match pos {
        SeekFrom::Start(offset) => return Ok(offset),
        SeekFrom::Current(delta) => current as i128 + delta as i128,
        SeekFrom::End(delta) => match len {
            Some(len) => len as i128 + delta as i128,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "cannot seek from end: stream length unknown",
                ));
            }
        },
    };

    u64::try_from(target).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "cannot seek to a negative position",
        )
    })
}
