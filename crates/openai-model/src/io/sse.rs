use super::Chunks;

#[derive(Debug)]
pub enum Error {
    Chunks(crate::Error),
    InvalidPayload,
}

/// A type for reading server-sent events from a chunk stream.
///
/// Only `data` fields are surfaced; other fields and comments are skipped.
/// Multiple `data` lines of one event are joined with a line feed.
pub struct Sse {
    buf: Vec<u8>,
    data: Vec<String>,
    chunks: Chunks,
    eof: bool,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: Vec::new(),
            data: Vec::new(),
            chunks,
            eof: false,
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            while let Some(line) = self.take_line()? {
                if let Some(event) = self.feed_line(&line) {
                    return Ok(Some(event));
                }
            }
            if self.eof {
                return Ok(None);
            }

            match self.chunks.next_chunk().await.map_err(Error::Chunks)? {
                Some(bytes) => self.buf.extend_from_slice(&bytes),
                None => return self.finish(),
            }
        }
    }

    /// Dispatches whatever is left when the stream ends without the
    /// terminating blank line.
    fn finish(&mut self) -> Result<Option<String>, Error> {
        self.eof = true;
        if !self.buf.is_empty() {
            let line = String::from_utf8(std::mem::take(&mut self.buf))
                .map_err(|_| Error::InvalidPayload)?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            self.feed_line(line);
        }
        Ok(self.feed_line(""))
    }

    fn take_line(&mut self) -> Result<Option<String>, Error> {
        let Some(lf_idx) = self.buf.iter().position(|b| *b == b'\n') else {
            return Ok(None);
        };
        let mut line: Vec<u8> = self.buf.drain(..=lf_idx).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        String::from_utf8(line)
            .map(Some)
            .map_err(|_| Error::InvalidPayload)
    }

    fn feed_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let event = self.data.join("\n");
            self.data.clear();
            return Some(event);
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => {
                (field, value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_owned());
        }
        None
    }
}
