//! TreeHost adapters

mod recording;

pub use recording::RecordingHost;
