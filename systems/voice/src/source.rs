//! Blocking transcript sources that stand in for a speech recogniser.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Stdin},
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Upstream recogniser that yields one transcript at a time.
///
/// Implementations may block while waiting for audio to be decoded. Returning
/// `Ok(None)` signals that the source is exhausted.
pub trait TranscriptSource: Send + 'static {
    /// Blocks until the next transcript is available.
    fn next_transcript(&mut self) -> Result<Option<String>, RecognitionError>;
}

/// Failures raised while opening or reading a transcript source.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The source could not be opened.
    #[error("failed to open transcript source {path}")]
    Open {
        /// Location that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Reading the next transcript failed.
    #[error("failed to read transcript")]
    Read(#[from] io::Error),
}

/// Final result object emitted by offline recognisers, one per line.
///
/// Partial results carry no `text` field and decode to an empty transcript.
#[derive(Debug, Default, Deserialize)]
struct RecognizerResult {
    #[serde(default)]
    text: String,
}

/// Reads newline-delimited transcripts from any buffered reader.
///
/// Each line is either plain text (`"up up left"`) or a recogniser result
/// object (`{"text": "up up left"}`). Blank results and lines that look like
/// JSON but fail to decode are skipped. Bytes that are not valid UTF-8 are
/// replaced rather than ending the stream.
#[derive(Debug)]
pub struct LineTranscriptSource<R> {
    reader: R,
    line: Vec<u8>,
}

impl<R> LineTranscriptSource<R>
where
    R: BufRead,
{
    /// Wraps `reader` as a transcript source.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
        }
    }
}

impl LineTranscriptSource<BufReader<File>> {
    /// Opens a file or named pipe containing transcripts.
    pub fn open(path: &Path) -> Result<Self, RecognitionError> {
        let file = File::open(path).map_err(|source| RecognitionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl LineTranscriptSource<BufReader<Stdin>> {
    /// Reads transcripts piped into standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R> TranscriptSource for LineTranscriptSource<R>
where
    R: BufRead + Send + 'static,
{
    fn next_transcript(&mut self) -> Result<Option<String>, RecognitionError> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }

            if let Some(text) = decode_line(&String::from_utf8_lossy(&self.line)) {
                return Ok(Some(text));
            }
        }
    }
}

fn decode_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let text = if trimmed.starts_with('{') {
        match serde_json::from_str::<RecognizerResult>(trimmed) {
            Ok(result) => result.text,
            Err(error) => {
                debug!("dropping malformed recogniser result: {error}");
                return None;
            }
        }
    } else {
        trimmed.to_owned()
    };

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}
