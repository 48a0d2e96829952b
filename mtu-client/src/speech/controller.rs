use std::rc::Rc;

use super::{
    Error, SpeechEngine, SpeechEvent, SpeechSettings, Utterance, UtteranceId, Voice, MAX_PITCH,
    MAX_RATE, MIN_PITCH, MIN_RATE,
};
use crate::{
    api::{Story, StoryId},
    Notifier,
};

pub const UNSUPPORTED: &str = "Sorry, your browser doesn't support text to speech.";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaybackState {
    Idle,
    Speaking,
    Paused,
}

/// The story currently being read, and the utterance reading it
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechSession {
    pub story: Story,
    pub utterance: Utterance,
}

/// Reads stories aloud, one at a time.
///
/// `start` always cancels the engine before speaking, so at most one
/// utterance is ever active. Pause and resume only take effect once the
/// engine reports them, through `process_events`.
pub struct SpeechController<E> {
    engine: E,
    notifier: Rc<dyn Notifier>,
    settings: SpeechSettings,
    session: Option<SpeechSession>,
    state: PlaybackState,
    next_id: u64,
}

impl<E: SpeechEngine> SpeechController<E> {
    pub fn new(engine: E, notifier: Rc<dyn Notifier>) -> SpeechController<E> {
        SpeechController {
            engine,
            notifier,
            settings: SpeechSettings::default(),
            session: None,
            state: PlaybackState::Idle,
            next_id: 0,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.settings
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn session(&self) -> Option<&SpeechSession> {
        self.session.as_ref()
    }

    pub fn active_story(&self) -> Option<StoryId> {
        self.session.as_ref().map(|s| s.story.id)
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Speaking
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.engine.voices()
    }

    fn resolve_voice(&self) -> Option<Voice> {
        let voices = self.engine.voices();
        match &self.settings.voice {
            None => Voice::preferred(&voices).cloned(),
            Some(name) => {
                let voice = voices.into_iter().find(|v| v.name == *name);
                if voice.is_none() {
                    tracing::warn!(voice = %name, "chosen voice is not available, using default");
                }
                voice
            }
        }
    }

    fn drop_session(&mut self) {
        self.session = None;
        self.state = PlaybackState::Idle;
    }

    /// Starts reading `story` from the beginning, replacing whatever was
    /// being read
    pub fn start(&mut self, story: &Story) -> Result<UtteranceId, Error> {
        if !self.engine.is_available() {
            self.notifier.alert(UNSUPPORTED);
            return Err(Error::Unsupported);
        }
        if story.transcript.trim().is_empty() {
            tracing::debug!(story=?story.id, "not reading story without transcript");
            return Err(Error::EmptyTranscript);
        }

        self.engine.cancel();
        self.drop_session();

        self.next_id += 1;
        let utterance = Utterance {
            id: UtteranceId(self.next_id),
            text: story.transcript.clone(),
            voice: self.resolve_voice(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
            volume: self.settings.volume(),
        };
        if let Err(err) = self.engine.speak(&utterance) {
            tracing::error!(story=?story.id, ?err, "speech engine refused utterance");
            self.notifier
                .alert("Sorry, the story could not be read aloud. Please try again.");
            return Err(Error::Engine(err));
        }
        tracing::debug!(story=?story.id, utterance=?utterance.id, "started reading story");
        let id = utterance.id;
        self.session = Some(SpeechSession {
            story: story.clone(),
            utterance,
        });
        self.state = PlaybackState::Speaking;
        Ok(id)
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Speaking {
            self.engine.pause();
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.engine.resume();
        }
    }

    pub fn stop(&mut self) {
        self.engine.cancel();
        self.drop_session();
    }

    /// Flips mute, applying it to the live utterance if there is one.
    /// Returns whether speech is now muted.
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        let volume = self.settings.volume();
        if let Some(session) = &mut self.session {
            session.utterance.volume = volume;
            self.engine.set_volume(session.utterance.id, volume);
        }
        self.settings.muted
    }

    /// Chooses the voice by name. If a story is being spoken, it restarts
    /// from its beginning with the new voice: engines cannot seek.
    pub fn set_voice(&mut self, name: &str) -> Result<(), Error> {
        self.settings.voice = Some(String::from(name));
        if self.state != PlaybackState::Speaking {
            return Ok(());
        }
        match self.session.as_ref().map(|s| s.story.clone()) {
            Some(story) => self.start(&story).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Applies from the next `start` on
    pub fn set_rate(&mut self, rate: f32) {
        if rate.is_finite() {
            self.settings.rate = rate.clamp(MIN_RATE, MAX_RATE);
        }
    }

    /// Applies from the next `start` on
    pub fn set_pitch(&mut self, pitch: f32) {
        if pitch.is_finite() {
            self.settings.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        }
    }

    /// Handles every event the engine reported since the last call
    pub fn process_events(&mut self) {
        while let Some((id, event)) = self.engine.next_event() {
            self.handle_event(id, event);
        }
    }

    pub fn handle_event(&mut self, id: UtteranceId, event: SpeechEvent) {
        let current = self.session.as_ref().map(|s| s.utterance.id);
        if current != Some(id) {
            tracing::trace!(?id, ?event, "ignoring event for stale utterance");
            return;
        }
        match event {
            SpeechEvent::Start | SpeechEvent::Resume => self.state = PlaybackState::Speaking,
            SpeechEvent::Pause => self.state = PlaybackState::Paused,
            SpeechEvent::End => {
                tracing::debug!(?id, "finished reading story");
                self.drop_session();
            }
            SpeechEvent::Error(msg) => {
                tracing::error!(?id, error = %msg, "speech playback failed");
                self.drop_session();
                self.notifier
                    .alert(&format!("Story playback stopped because of an error: {msg}"));
            }
        }
    }
}
