//! In-memory speech engine that behaves like a browser's, for tests and for
//! platforms without speech output.

use std::collections::VecDeque;

use anyhow::anyhow;

use super::{SpeechEngine, SpeechEvent, Utterance, UtteranceId, Voice};

#[derive(Debug)]
pub struct MockSpeechEngine {
    available: bool,
    voices: Vec<Voice>,
    spoken: Vec<Utterance>,
    active: Option<Utterance>,
    paused: bool,
    overlaps: usize,
    calls: usize,
    refuse_next: Option<String>,
    events: VecDeque<(UtteranceId, SpeechEvent)>,
}

fn voice(name: &str, lang: &str, default: bool) -> Voice {
    Voice {
        name: String::from(name),
        lang: String::from(lang),
        default,
    }
}

impl MockSpeechEngine {
    pub fn new() -> MockSpeechEngine {
        MockSpeechEngine::with_voices(vec![
            voice("Amélie", "fr-FR", true),
            voice("Daniel", "en-GB", false),
            voice("Zuri", "sw-KE", false),
        ])
    }

    pub fn with_voices(voices: Vec<Voice>) -> MockSpeechEngine {
        MockSpeechEngine {
            available: true,
            voices,
            spoken: Vec::new(),
            active: None,
            paused: false,
            overlaps: 0,
            calls: 0,
            refuse_next: None,
            events: VecDeque::new(),
        }
    }

    pub fn unavailable() -> MockSpeechEngine {
        MockSpeechEngine {
            available: false,
            ..MockSpeechEngine::with_voices(Vec::new())
        }
    }

    /// Every utterance ever handed to `speak`, in order
    pub fn spoken(&self) -> &[Utterance] {
        &self.spoken
    }

    /// The utterance currently speaking or paused
    pub fn active(&self) -> Option<&Utterance> {
        self.active.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of times an utterance was spoken while another was still active
    pub fn overlaps(&self) -> usize {
        self.overlaps
    }

    /// Number of calls that would have reached the platform engine
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Makes the next `speak` fail with `reason`
    pub fn refuse_next_speak(&mut self, reason: &str) {
        self.refuse_next = Some(String::from(reason));
    }

    /// Reaches the end of the active utterance
    pub fn finish(&mut self) {
        if let Some(u) = self.active.take() {
            self.paused = false;
            self.events.push_back((u.id, SpeechEvent::End));
        }
    }

    /// Fails the active utterance with `reason`
    pub fn fail(&mut self, reason: &str) {
        if let Some(u) = self.active.take() {
            self.paused = false;
            self.events
                .push_back((u.id, SpeechEvent::Error(String::from(reason))));
        }
    }
}

impl Default for MockSpeechEngine {
    fn default() -> MockSpeechEngine {
        MockSpeechEngine::new()
    }
}

impl SpeechEngine for MockSpeechEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: &Utterance) -> anyhow::Result<()> {
        self.calls += 1;
        if let Some(reason) = self.refuse_next.take() {
            return Err(anyhow!("speak refused: {reason}"));
        }
        if self.active.is_some() {
            // A real engine would queue it behind the active one
            self.overlaps += 1;
        }
        self.spoken.push(utterance.clone());
        self.active = Some(utterance.clone());
        self.paused = false;
        self.events.push_back((utterance.id, SpeechEvent::Start));
        Ok(())
    }

    fn pause(&mut self) {
        self.calls += 1;
        if let Some(u) = &self.active {
            if !self.paused {
                self.paused = true;
                self.events.push_back((u.id, SpeechEvent::Pause));
            }
        }
    }

    fn resume(&mut self) {
        self.calls += 1;
        if let Some(u) = &self.active {
            if self.paused {
                self.paused = false;
                self.events.push_back((u.id, SpeechEvent::Resume));
            }
        }
    }

    fn cancel(&mut self) {
        self.calls += 1;
        self.paused = false;
        if let Some(u) = self.active.take() {
            // Browsers report cancelled utterances as interrupted
            self.events
                .push_back((u.id, SpeechEvent::Error(String::from("interrupted"))));
        }
    }

    fn set_volume(&mut self, utterance: UtteranceId, volume: f32) {
        self.calls += 1;
        if let Some(u) = &mut self.active {
            if u.id == utterance {
                u.volume = volume;
            }
        }
    }

    fn next_event(&mut self) -> Option<(UtteranceId, SpeechEvent)> {
        self.events.pop_front()
    }
}
