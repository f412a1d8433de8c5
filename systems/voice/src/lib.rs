#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recognition boundary that turns spoken words into queued movement.
//!
//! The recogniser itself is an external collaborator hidden behind
//! [`TranscriptSource`]. This crate owns the closed vocabulary that maps
//! words onto [`Command`] values and the producer that applies them to the
//! shared [`CommandQueue`]: directions are enqueued, `stop` clears the queue
//! synchronously, and everything else is dropped.

mod source;

use std::{io, thread};

use log::{debug, info, warn};
use voice_maze_core::Command;
use voice_maze_system_command_queue::CommandQueue;

pub use source::{LineTranscriptSource, RecognitionError, TranscriptSource};

/// Name given to the detached recognition thread.
pub const LISTENER_THREAD_NAME: &str = "voice-listener";

/// Maps a single recognised word onto a command.
///
/// Matching is case-insensitive and ignores surrounding punctuation, so
/// `"Left,"` and `"left"` are equivalent. Unknown words yield `None`.
#[must_use]
pub fn parse_token(word: &str) -> Option<Command> {
    let normalized = word
        .trim_matches(|character: char| !character.is_alphanumeric())
        .to_ascii_lowercase();
    match normalized.as_str() {
        "up" => Some(Command::Up),
        "down" => Some(Command::Down),
        "left" => Some(Command::Left),
        "right" => Some(Command::Right),
        "stop" => Some(Command::Stop),
        _ => None,
    }
}

/// Summary of how a transcript affected the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranscriptOutcome {
    /// Number of directional commands appended to the queue.
    pub enqueued: usize,
    /// Number of `stop` words that cleared the queue.
    pub stops: usize,
    /// Number of pending commands discarded by those stops.
    pub discarded: usize,
    /// Number of words outside the vocabulary.
    pub ignored: usize,
}

/// Producer half of the command queue.
#[derive(Clone, Debug)]
pub struct VoiceCommandProducer {
    queue: CommandQueue,
}

impl VoiceCommandProducer {
    /// Creates a producer that feeds `queue`.
    #[must_use]
    pub fn new(queue: CommandQueue) -> Self {
        Self { queue }
    }

    /// Applies a single command to the queue.
    ///
    /// Directions are appended to the tail; `Stop` clears the queue and the
    /// number of discarded commands is returned.
    pub fn submit(&self, command: Command) -> Option<usize> {
        match command.direction() {
            Some(direction) => {
                self.queue.enqueue(direction);
                None
            }
            None => Some(self.queue.clear()),
        }
    }

    /// Applies every word of a whitespace-delimited transcript in order.
    pub fn accept_transcript(&self, transcript: &str) -> TranscriptOutcome {
        let mut outcome = TranscriptOutcome::default();
        for word in transcript.split_whitespace() {
            let Some(command) = parse_token(word) else {
                outcome.ignored += 1;
                continue;
            };

            match self.submit(command) {
                Some(discarded) => {
                    outcome.stops += 1;
                    outcome.discarded += discarded;
                    debug!("stop cleared {discarded} pending commands");
                }
                None => outcome.enqueued += 1,
            }
        }
        outcome
    }
}

/// Starts a detached background thread that pumps `source` into `producer`.
///
/// The thread runs until the source is exhausted or fails, and is never
/// joined: process exit reclaims it. Dropping the returned handle detaches it.
pub fn spawn_listener<S>(
    mut source: S,
    producer: VoiceCommandProducer,
) -> io::Result<thread::JoinHandle<()>>
where
    S: TranscriptSource,
{
    thread::Builder::new()
        .name(LISTENER_THREAD_NAME.to_owned())
        .spawn(move || {
            info!("voice system online");
            loop {
                match source.next_transcript() {
                    Ok(Some(transcript)) => {
                        info!("heard: {transcript}");
                        let outcome = producer.accept_transcript(&transcript);
                        if outcome.ignored > 0 {
                            debug!("ignored {} unrecognised words", outcome.ignored);
                        }
                    }
                    Ok(None) => {
                        info!("transcript source closed; voice input disabled");
                        break;
                    }
                    Err(error) => {
                        warn!("voice input stopped: {error}");
                        break;
                    }
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_covers_the_vocabulary() {
        assert_eq!(parse_token("up"), Some(Command::Up));
        assert_eq!(parse_token("down"), Some(Command::Down));
        assert_eq!(parse_token("left"), Some(Command::Left));
        assert_eq!(parse_token("right"), Some(Command::Right));
        assert_eq!(parse_token("stop"), Some(Command::Stop));
    }

    #[test]
    fn parse_token_normalizes_case_and_punctuation() {
        assert_eq!(parse_token("Left,"), Some(Command::Left));
        assert_eq!(parse_token("STOP!"), Some(Command::Stop));
    }

    #[test]
    fn parse_token_rejects_unknown_words() {
        assert_eq!(parse_token("[unk]"), None);
        assert_eq!(parse_token("upward"), None);
        assert_eq!(parse_token(""), None);
    }
}
