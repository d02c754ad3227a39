//! Push-style adapters for driving a [`FrameProcessor`] incrementally.

use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender},
};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use super::processor::FrameProcessor;

/// Errors raised while feeding frames to a stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The stream was closed; no further frames are accepted.
    #[error("Stream is closed")]
    Closed,
    /// A frame's length differs from the first frame delivered.
    #[error("Frame length mismatch: expected {expected} samples, got {actual}")]
    FrameLength {
        /// Length fixed by the first frame.
        expected: usize,
        /// Length of the rejected frame.
        actual: usize,
    },
    /// The worker thread could not be started.
    #[error("Failed to spawn stream worker: {0}")]
    Spawn(std::io::Error),
    /// The worker thread panicked.
    #[error("Stream worker panicked")]
    WorkerPanicked,
}

/// Synchronous push interface: one frame in, one coefficient vector out.
#[derive(Debug)]
pub struct MfccStream {
    processor: FrameProcessor,
    frame_len: Option<usize>,
    closed: bool,
    frames_processed: u64,
}

impl MfccStream {
    /// Wrap a processor; its pre-emphasis state carries across submitted frames.
    pub fn new(processor: FrameProcessor) -> Self {
        Self {
            processor,
            frame_len: None,
            closed: false,
            frames_processed: 0,
        }
    }

    /// Process the next frame in delivery order.
    pub fn submit_frame(&mut self, frame: &[f64]) -> Result<Vec<f64>, StreamError> {
        if self.closed {
            return Err(StreamError::Closed);
        }
        let expected = *self.frame_len.get_or_insert(frame.len());
        if frame.len() != expected {
            return Err(StreamError::FrameLength {
                expected,
                actual: frame.len(),
            });
        }
        let coefs = self.processor.process_frame(frame);
        self.frames_processed += 1;
        Ok(coefs)
    }

    /// Stop accepting frames.
    pub fn close(&mut self) {
        if !self.closed {
            tracing::debug!("MFCC stream closed after {} frames", self.frames_processed);
        }
        self.closed = true;
    }

    /// True once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Frames successfully processed so far.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Release the underlying processor.
    pub fn into_processor(self) -> FrameProcessor {
        self.processor
    }
}

/// Runs an [`MfccStream`] on a background thread between two channels.
///
/// Frames sent through [`submit`](Self::submit) are processed in order and
/// the coefficient vectors arrive on [`receiver`](Self::receiver).
pub struct StreamWorker {
    frames: Option<Sender<Vec<f64>>>,
    coefs: Receiver<Vec<f64>>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<u64, StreamError>>>,
}

impl StreamWorker {
    /// Start the worker thread.
    pub fn spawn(processor: FrameProcessor) -> Result<Self, StreamError> {
        let (frame_tx, frame_rx) = mpsc::channel::<Vec<f64>>();
        let (coef_tx, coef_rx) = mpsc::channel::<Vec<f64>>();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);
        let handle = thread::Builder::new()
            .name("cepstra-stream".into())
            .spawn(move || run_worker(MfccStream::new(processor), frame_rx, coef_tx, worker_cancel))
            .map_err(StreamError::Spawn)?;
        Ok(Self {
            frames: Some(frame_tx),
            coefs: coef_rx,
            cancel,
            handle: Some(handle),
        })
    }

    /// Queue a frame for processing.
    pub fn submit(&self, frame: Vec<f64>) -> Result<(), StreamError> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(StreamError::Closed);
        }
        let sender = self.frames.as_ref().ok_or(StreamError::Closed)?;
        sender.send(frame).map_err(|_| StreamError::Closed)
    }

    /// Channel delivering coefficient vectors in submission order.
    pub fn receiver(&self) -> &Receiver<Vec<f64>> {
        &self.coefs
    }

    /// Halt delivery; frames still queued are discarded.
    pub fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.frames = None;
    }

    /// Finish the input and wait for the worker, returning frames processed.
    pub fn join(mut self) -> Result<u64, StreamError> {
        self.frames = None;
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| StreamError::WorkerPanicked)?,
            None => Ok(0),
        }
    }
}

impl fmt::Debug for StreamWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamWorker")
            .field("accepting", &self.frames.is_some())
            .field("cancelled", &self.cancel.load(Ordering::Relaxed))
            .field("running", &self.handle.is_some())
            .finish()
    }
}

impl Drop for StreamWorker {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.frames = None;
    }
}

fn run_worker(
    mut stream: MfccStream,
    frames: Receiver<Vec<f64>>,
    coefs: Sender<Vec<f64>>,
    cancel: Arc<AtomicBool>,
) -> Result<u64, StreamError> {
    for frame in frames {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let out = stream.submit_frame(&frame)?;
        if coefs.send(out).is_err() {
            break;
        }
    }
    stream.close();
    Ok(stream.frames_processed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MfccConfig;

    fn processor() -> FrameProcessor {
        FrameProcessor::new(8_000.0, 64, 10, 6, MfccConfig::default()).unwrap()
    }

    fn frames(count: usize, len: usize) -> Vec<Vec<f64>> {
        (0..count)
            .map(|f| (0..len).map(|n| ((f * len + n) as f64 * 0.3).sin()).collect())
            .collect()
    }

    #[test]
    fn stream_matches_sequential_processing() {
        let input = frames(5, 64);
        let expected = processor().process_frames(&input);
        let mut stream = MfccStream::new(processor());
        let got: Vec<_> = input
            .iter()
            .map(|f| stream.submit_frame(f).unwrap())
            .collect();
        assert_eq!(got, expected);
        assert_eq!(stream.frames_processed(), 5);
    }

    #[test]
    fn closed_stream_rejects_frames() {
        let mut stream = MfccStream::new(processor());
        stream.submit_frame(&[0.1; 64]).unwrap();
        stream.close();
        assert!(stream.is_closed());
        assert!(matches!(stream.submit_frame(&[0.1; 64]), Err(StreamError::Closed)));
    }

    #[test]
    fn first_frame_fixes_length() {
        let mut stream = MfccStream::new(processor());
        stream.submit_frame(&[0.0; 48]).unwrap();
        assert!(matches!(
            stream.submit_frame(&[0.0; 64]),
            Err(StreamError::FrameLength {
                expected: 48,
                actual: 64
            })
        ));
        assert_eq!(stream.frames_processed(), 1);
    }

    #[test]
    fn into_processor_keeps_pre_emphasis_state() {
        let input = frames(3, 64);
        let mut stream = MfccStream::new(processor());
        for frame in &input {
            stream.submit_frame(frame).unwrap();
        }
        let proc = stream.into_processor();
        assert_eq!(proc.last_value(), input[2][63]);
        assert_eq!(proc.num_coefs(), 6);
    }

    #[test]
    fn worker_delivers_in_order() {
        let input = frames(8, 64);
        let expected = processor().process_frames(&input);
        let worker = StreamWorker::spawn(processor()).unwrap();
        for frame in input {
            worker.submit(frame).unwrap();
        }
        let got: Vec<_> = (0..8).map(|_| worker.receiver().recv().unwrap()).collect();
        assert_eq!(got, expected);
        assert_eq!(worker.join().unwrap(), 8);
    }

    #[test]
    fn stopped_worker_refuses_frames() {
        let mut worker = StreamWorker::spawn(processor()).unwrap();
        assert!(format!("{worker:?}").contains("accepting: true"));
        worker.stop();
        let debug = format!("{worker:?}");
        assert!(debug.starts_with("StreamWorker"), "{debug}");
        assert!(debug.contains("accepting: false"), "{debug}");
        assert!(debug.contains("cancelled: true"), "{debug}");
        assert!(matches!(worker.submit(vec![0.0; 64]), Err(StreamError::Closed)));
        assert_eq!(worker.join().unwrap(), 0);
    }

    #[test]
    fn worker_reports_length_mismatch() {
        let worker = StreamWorker::spawn(processor()).unwrap();
        worker.submit(vec![0.0; 64]).unwrap();
        worker.submit(vec![0.0; 32]).unwrap();
        assert!(worker.receiver().recv().is_ok());
        assert!(matches!(
            worker.join(),
            Err(StreamError::FrameLength { .. })
        ));
    }
}
