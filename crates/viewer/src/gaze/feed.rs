//! Landmark feed
//!
//! Reads detector output as JSON lines (one `LandmarkFrame` per line) on a
//! tokio task and publishes the resulting gaze through a `watch` channel.
//! The channel holds a single value: the writer overwrites it, the render
//! loop reads whatever is latest without waiting.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use shared::{GazeVector, LandmarkFrame};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::adapter::GazeAdapter;

#[derive(Debug, Error)]
pub enum GazeFeedError {
    #[error("failed to open landmark source {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where landmark frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandmarkSource {
    Stdin,
    File(PathBuf),
}

impl FromStr for LandmarkSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => LandmarkSource::Stdin,
            path => LandmarkSource::File(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for LandmarkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkSource::Stdin => write!(f, "stdin"),
            LandmarkSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read side of the gaze channel
pub type GazeReceiver = watch::Receiver<GazeVector>;

/// Write side of the gaze channel
#[derive(Debug)]
pub struct GazePublisher {
    tx: watch::Sender<GazeVector>,
}

impl GazePublisher {
    /// Overwrite the latest gaze
    pub fn publish(&self, gaze: GazeVector) {
        self.tx.send_replace(gaze);
    }

    /// Every receiver has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn subscribe(&self) -> GazeReceiver {
        self.tx.subscribe()
    }
}

/// Single-slot gaze channel, starting at the frame center
pub fn gaze_channel() -> (GazePublisher, GazeReceiver) {
    let (tx, rx) = watch::channel(GazeVector::ORIGIN);
    (GazePublisher { tx }, rx)
}

/// Counters reported when a feed ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub lines: usize,
    pub frames: usize,
    pub updates: usize,
    pub malformed: usize,
}

/// Consume landmark lines until the source ends or every receiver is gone.
/// Malformed lines, including ones that are not UTF-8, are logged and skipped.
/// Only a read error ends the feed early.
pub async fn run_feed<R>(mut reader: R, adapter: GazeAdapter, publisher: GazePublisher) -> FeedStats
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = FeedStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Landmark source read failed: {e}");
                break;
            }
        }
        stats.lines += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                stats.malformed += 1;
                tracing::warn!("Skipping landmark line {} with invalid UTF-8: {e}", stats.lines);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<LandmarkFrame>(line) {
            Ok(frame) => {
                stats.frames += 1;
                if let Some(gaze) = adapter.on_frame(&frame) {
                    publisher.publish(gaze);
                    stats.updates += 1;
                }
            }
            Err(e) => {
                stats.malformed += 1;
                tracing::warn!("Skipping malformed landmark line {}: {e}", stats.lines);
            }
        }

        if publisher.is_closed() {
            tracing::debug!("No gaze receivers left, stopping feed");
            break;
        }
    }

    tracing::info!(
        "Landmark feed ended: {} frames, {} gaze updates, {} malformed lines",
        stats.frames,
        stats.updates,
        stats.malformed
    );
    stats
}

/// A running landmark feed. Stopping or dropping it aborts the reader task.
pub struct GazeFeed {
    handle: Option<JoinHandle<FeedStats>>,
    receiver: GazeReceiver,
    source: LandmarkSource,
}

impl GazeFeed {
    /// Open `source` and start reading it on `runtime`.
    /// A file that cannot be opened is reported immediately.
    pub fn spawn(
        runtime: &Handle,
        source: LandmarkSource,
        adapter: GazeAdapter,
    ) -> Result<Self, GazeFeedError> {
        match source {
            LandmarkSource::Stdin => {
                let reader = BufReader::new(tokio::io::stdin());
                Ok(Self::spawn_reader(runtime, reader, LandmarkSource::Stdin, adapter))
            }
            LandmarkSource::File(path) => {
                let file = std::fs::File::open(&path).map_err(|source| GazeFeedError::Open {
                    path: path.clone(),
                    source,
                })?;
                let reader = BufReader::new(tokio::fs::File::from_std(file));
                Ok(Self::spawn_reader(runtime, reader, LandmarkSource::File(path), adapter))
            }
        }
    }

    /// Start reading landmark lines from an already open stream.
    /// `source` only labels the feed in logs and the status bar.
    pub fn spawn_reader<R>(
        runtime: &Handle,
        reader: R,
        source: LandmarkSource,
        adapter: GazeAdapter,
    ) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (publisher, receiver) = gaze_channel();
        let handle = runtime.spawn(run_feed(reader, adapter, publisher));

        tracing::info!("Gaze feed started from {source}");
        Self {
            handle: Some(handle),
            receiver,
            source,
        }
    }

    pub fn receiver(&self) -> GazeReceiver {
        self.receiver.clone()
    }

    pub fn source(&self) -> &LandmarkSource {
        &self.source
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Abort the reader task. The last published gaze stays readable.
    pub fn stop(&mut self) {
        if let Some(handle) = &self.handle {
            if !handle.is_finished() {
                handle.abort();
                tracing::info!("Gaze feed from {} stopped", self.source);
            }
        }
    }

    /// Wait for the reader task. `None` if it was aborted before the source ended.
    pub async fn join(mut self) -> Option<FeedStats> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl Drop for GazeFeed {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_source_from_arg() {
        assert_eq!("-".parse::<LandmarkSource>(), Ok(LandmarkSource::Stdin));
        assert_eq!(
            "faces.jsonl".parse::<LandmarkSource>(),
            Ok(LandmarkSource::File(PathBuf::from("faces.jsonl")))
        );
    }

    #[test]
    fn test_channel_last_write_wins() {
        let (publisher, rx) = gaze_channel();
        assert_eq!(*rx.borrow(), GazeVector::ORIGIN);
        publisher.publish(GazeVector::new(0.1, 0.1));
        publisher.publish(GazeVector::new(0.2, -0.3));
        assert_eq!(*rx.borrow(), GazeVector::new(0.2, -0.3));
    }

    #[tokio::test]
    async fn test_run_feed_skips_malformed_lines() {
        let input = format!(
            "{}\nnot json\n\n{}\n",
            fixtures::frame_line((0.3, 0.4), (0.7, 0.4)),
            r#"{"faces":[]}"#
        );
        let (publisher, rx) = gaze_channel();
        let stats = run_feed(input.as_bytes(), GazeAdapter::default(), publisher).await;

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.malformed, 1);
        let gaze = *rx.borrow();
        assert!((gaze.x - 0.0).abs() < 1e-6);
        assert!((gaze.y + 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_run_feed_survives_invalid_utf8() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(fixtures::frame_line((0.3, 0.4), (0.7, 0.4)).as_bytes());
        input.push(b'\n');

        let (publisher, rx) = gaze_channel();
        let stats = run_feed(input.as_slice(), GazeAdapter::default(), publisher).await;

        assert_eq!(stats.lines, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.updates, 1);
        let gaze = *rx.borrow();
        assert!((gaze.y + 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let result = GazeFeed::spawn(
            &Handle::current(),
            LandmarkSource::File(PathBuf::from("/nonexistent/landmarks.jsonl")),
            GazeAdapter::default(),
        );
        assert!(matches!(result, Err(GazeFeedError::Open { .. })));
    }
}
