//! Narrated story playback on top of a platform speech-synthesis engine.

mod controller;
pub use controller::{PlaybackState, SpeechController, SpeechSession, UNSUPPORTED};

pub mod mock;

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 10.0;
pub const MIN_PITCH: f32 = 0.0;
pub const MAX_PITCH: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag, eg. `en-GB`
    pub lang: String,
    /// Whether the platform considers this its default voice
    pub default: bool,
}

impl Voice {
    /// Picks the voice to use when the user did not choose one
    pub fn preferred(voices: &[Voice]) -> Option<&Voice> {
        voices
            .iter()
            .find(|v| v.lang.to_ascii_lowercase().starts_with("en"))
            .or_else(|| voices.iter().find(|v| v.default))
            .or_else(|| voices.first())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UtteranceId(pub u64);

/// Text handed to the engine, with everything needed to speak it
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    /// `None` lets the engine use its default voice
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Lifecycle notifications emitted by the engine for one utterance
#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    Start,
    End,
    Pause,
    Resume,
    Error(String),
}

/// The platform's speech synthesizer. There is only one per platform, so an
/// implementation will usually wrap a process-wide singleton.
pub trait SpeechEngine {
    fn is_available(&self) -> bool;

    fn voices(&self) -> Vec<Voice>;

    fn speak(&mut self, utterance: &Utterance) -> anyhow::Result<()>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Drops the current utterance and anything queued
    fn cancel(&mut self);

    /// Changes the volume of an utterance that is already queued or speaking
    fn set_volume(&mut self, utterance: UtteranceId, volume: f32);

    /// Next lifecycle event that happened since the last call
    fn next_event(&mut self) -> Option<(UtteranceId, SpeechEvent)>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeechSettings {
    /// Name of the chosen voice
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub muted: bool,
}

impl Default for SpeechSettings {
    fn default() -> SpeechSettings {
        SpeechSettings {
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            muted: false,
        }
    }
}

impl SpeechSettings {
    pub fn volume(&self) -> f32 {
        match self.muted {
            true => 0.0,
            false => 1.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("speech synthesis is not available on this platform")]
    Unsupported,

    #[error("story has no text to read")]
    EmptyTranscript,

    #[error("speech engine failure")]
    Engine(#[source] anyhow::Error),
}
