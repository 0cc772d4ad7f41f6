//! Audio service
//!
//! The game never talks to an audio device directly. A platform provides an
//! [`AudioBackend`]; [`AudioManager`] owns volumes, the current music track and
//! a clip cache keyed by `"{bundle}/{name}"`.

use std::collections::HashMap;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Bundle holding the game's sounds
pub const AUDIO_BUNDLE: &str = "audio";

/// Handle to a playing sound, issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayId(pub u32);

/// Platform audio output
pub trait AudioBackend {
    /// Decoded clip
    type Clip: Clone;

    /// Load `name` from `bundle`, `None` if it doesn't exist
    fn load(&mut self, bundle: &str, name: &str) -> Option<Self::Clip>;
    /// Start playing a clip
    fn play(&mut self, clip: &Self::Clip, looped: bool, volume: f32) -> Option<PlayId>;
    fn stop(&mut self, id: PlayId);
    fn set_volume(&mut self, id: PlayId, volume: f32);
    fn stop_all(&mut self);
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Drop leaves the slingshot
    Shot,
    /// Drop caught by a platform
    Land,
    /// Drop lost, run over
    Drift,
}

impl SoundEffect {
    pub fn clip_name(&self) -> &'static str {
        match self {
            SoundEffect::Shot => "shot",
            SoundEffect::Land => "land",
            SoundEffect::Drift => "drift",
        }
    }

    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Launched { .. } => Some(SoundEffect::Shot),
            GameEvent::Landed { .. } => Some(SoundEffect::Land),
            GameEvent::GameOver { .. } => Some(SoundEffect::Drift),
            _ => None,
        }
    }
}

/// Background track played for the whole run
pub const BACKGROUND_MUSIC: &str = "background";

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    cache: HashMap<String, B::Clip>,
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    current_music: Option<PlayId>,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: HashMap::new(),
            master_volume: 1.0,
            music_volume: 0.5,
            sfx_volume: 0.8,
            muted: false,
            current_music: None,
        }
    }

    pub fn with_settings(backend: B, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.apply_settings(settings);
        audio
    }

    /// Take volumes and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        self.set_music_volume(settings.music_volume);
    }

    fn cache_key(bundle: &str, name: &str) -> String {
        format!("{}/{}", bundle, name)
    }

    /// Fetch a clip, loading it into the cache on first use
    fn clip(&mut self, bundle: &str, name: &str) -> Option<B::Clip> {
        let key = Self::cache_key(bundle, name);
        if let Some(clip) = self.cache.get(&key) {
            return Some(clip.clone());
        }
        match self.backend.load(bundle, name) {
            Some(clip) => {
                log::debug!("Loaded clip {}", key);
                self.cache.insert(key, clip.clone());
                Some(clip)
            }
            None => {
                log::warn!("Audio clip {} failed to load", key);
                None
            }
        }
    }

    pub fn is_cached(&self, bundle: &str, name: &str) -> bool {
        self.cache.contains_key(&Self::cache_key(bundle, name))
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    fn sfx_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Replace the current music track
    pub fn play_music(&mut self, bundle: &str, name: &str, looped: bool) {
        let Some(clip) = self.clip(bundle, name) else {
            return;
        };
        self.stop_music();
        let volume = self.music_level();
        self.current_music = self.backend.play(&clip, looped, volume);
        log::info!("Playing music {}/{}", bundle, name);
    }

    /// Fire-and-forget sound
    pub fn play_sound(&mut self, bundle: &str, name: &str) -> Option<PlayId> {
        let volume = self.sfx_level();
        if volume <= 0.0 {
            return None;
        }
        let clip = self.clip(bundle, name)?;
        self.backend.play(&clip, false, volume)
    }

    pub fn play(&mut self, effect: SoundEffect) -> Option<PlayId> {
        self.play_sound(AUDIO_BUNDLE, effect.clip_name())
    }

    /// React to the events of one tick
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::RunStarted { .. } = event {
                if self.current_music.is_none() {
                    self.play_music(AUDIO_BUNDLE, BACKGROUND_MUSIC, true);
                }
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(id) = self.current_music.take() {
            self.backend.stop(id);
        }
    }

    pub fn current_music(&self) -> Option<PlayId> {
        self.current_music
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        if let Some(id) = self.current_music {
            let level = self.music_level();
            self.backend.set_volume(id, level);
        }
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(id) = self.current_music {
            let level = self.music_level();
            self.backend.set_volume(id, level);
        }
    }

    pub fn stop_all(&mut self) {
        self.backend.stop_all();
        self.current_music = None;
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Backend with no output device: every clip loads, plays are only logged
#[derive(Debug, Default)]
pub struct LogBackend {
    next_id: u32,
}

impl AudioBackend for LogBackend {
    type Clip = String;

    fn load(&mut self, bundle: &str, name: &str) -> Option<String> {
        Some(format!("{}/{}", bundle, name))
    }

    fn play(&mut self, clip: &String, looped: bool, volume: f32) -> Option<PlayId> {
        self.next_id += 1;
        log::debug!("audio: {} (loop={}, vol={:.2})", clip, looped, volume);
        Some(PlayId(self.next_id))
    }

    fn stop(&mut self, id: PlayId) {
        log::debug!("audio: stop {:?}", id);
    }

    fn set_volume(&mut self, _id: PlayId, _volume: f32) {}

    fn stop_all(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Records every call; `missing` clips fail to load
    #[derive(Default)]
    struct Recorder {
        loads: Vec<String>,
        plays: Vec<(String, bool, f32)>,
        stops: Vec<PlayId>,
        missing: Vec<&'static str>,
    }

    impl AudioBackend for Recorder {
        type Clip = String;

        fn load(&mut self, bundle: &str, name: &str) -> Option<String> {
            let key = format!("{}/{}", bundle, name);
            self.loads.push(key.clone());
            (!self.missing.iter().any(|m| *m == name)).then_some(key)
        }

        fn play(&mut self, clip: &String, looped: bool, volume: f32) -> Option<PlayId> {
            self.plays.push((clip.clone(), looped, volume));
            Some(PlayId(self.plays.len() as u32))
        }

        fn stop(&mut self, id: PlayId) {
            self.stops.push(id);
        }

        fn set_volume(&mut self, _id: PlayId, _volume: f32) {}

        fn stop_all(&mut self) {}
    }

    #[test]
    fn test_clip_loaded_once() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.play(SoundEffect::Shot);
        audio.play(SoundEffect::Shot);
        assert_eq!(audio.backend().loads, vec!["audio/shot".to_string()]);
        assert_eq!(audio.backend().plays.len(), 2);
        assert!(audio.is_cached("audio", "shot"));
    }

    #[test]
    fn test_music_replaces_previous_track() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.play_music("resources", "sea", true);
        let first = audio.current_music();
        audio.play_music(AUDIO_BUNDLE, BACKGROUND_MUSIC, true);
        assert_eq!(audio.backend().stops, vec![first.unwrap()]);
        assert_ne!(audio.current_music(), first);
    }

    #[test]
    fn test_missing_clip_is_not_cached() {
        let backend = Recorder {
            missing: vec!["drift"],
            ..Default::default()
        };
        let mut audio = AudioManager::new(backend);
        assert!(audio.play(SoundEffect::Drift).is_none());
        assert!(!audio.is_cached("audio", "drift"));
        assert!(audio.backend().plays.is_empty());
    }

    #[test]
    fn test_muted_plays_nothing() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioManager::with_settings(Recorder::default(), &settings);
        assert!(audio.play(SoundEffect::Land).is_none());
        assert!(audio.backend().plays.is_empty());
    }

    #[test]
    fn test_events_map_to_sounds() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&[
            GameEvent::RunStarted { seed: 1 },
            GameEvent::Launched {
                drop_id: 1,
                velocity: Vec2::new(500.0, 400.0),
            },
            GameEvent::WorldShifted { distance: 300.0 },
            GameEvent::GameOver {
                score: 0,
                landings: 0,
                distance: 0.0,
            },
        ]);
        let names: Vec<&str> = audio.backend().plays.iter().map(|(c, _, _)| c.as_str()).collect();
        assert_eq!(names, vec!["audio/background", "audio/shot", "audio/drift"]);
        assert!(audio.backend().plays[0].1);
    }
}
