pub mod display;
mod state;

pub use state::{
    OverlayState, OverlayTimings, ProcessingState, COMPLETE_HIDE_MS, DEFAULT_AUDIO_ERROR,
    DEFAULT_RECORDING_ERROR, ERROR_HIDE_MS,
};
