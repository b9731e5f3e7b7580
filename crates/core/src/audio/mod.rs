use crate::{PlaybackError, Result, ShelfError};

/// Minimal media element surface: one loaded source, a play head, and a
/// volume in `[0, 1]`.
pub trait AudioOutput {
    /// Replaces the current source and rewinds. Playback stops.
    fn load(&mut self, source: &str);
    fn source(&self) -> Option<&str>;
    /// Starts playback. Hosts may refuse, e.g. under an autoplay policy.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn rewind(&mut self);
    fn is_playing(&self) -> bool;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}

/// In-memory output used by headless hosts and tests.
#[derive(Debug, Clone)]
pub struct SimulatedOutput {
    source: Option<String>,
    playing: bool,
    volume: f32,
    position_ms: u64,
    allow_playback: bool,
    play_requests: u32,
}

impl SimulatedOutput {
    pub fn new() -> Self {
        Self {
            source: None,
            playing: false,
            volume: 1.0,
            position_ms: 0,
            allow_playback: true,
            play_requests: 0,
        }
    }

    /// Output whose every `play` is rejected.
    pub fn blocked() -> Self {
        Self {
            allow_playback: false,
            ..Self::new()
        }
    }

    pub fn set_allow_playback(&mut self, allow: bool) {
        self.allow_playback = allow;
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    /// Moves the play head forward while playing.
    pub fn elapse(&mut self, ms: u64) {
        if self.playing {
            self.position_ms += ms;
        }
    }

    pub fn play_requests(&self) -> u32 {
        self.play_requests
    }
}

impl Default for SimulatedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for SimulatedOutput {
    fn load(&mut self, source: &str) {
        self.source = Some(source.to_string());
        self.playing = false;
        self.position_ms = 0;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self) -> Result<()> {
        self.play_requests += 1;
        let Some(source) = &self.source else {
            return Err(PlaybackError::NoSource.into());
        };
        if !self.allow_playback {
            return Err(PlaybackError::Rejected {
                source_name: source.clone(),
            }
            .into());
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn rewind(&mut self) {
        self.position_ms = 0;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

/// Starts playback, logging a refusal instead of returning it.
pub fn play_or_warn(output: &mut dyn AudioOutput, what: &str) -> bool {
    match output.play() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, what, "playback did not start");
            false
        }
    }
}

/// Looping background playlist.
#[derive(Debug)]
pub struct BackgroundMusic<O> {
    output: O,
    playlist: Vec<String>,
    current: usize,
}

impl<O: AudioOutput> BackgroundMusic<O> {
    /// Loads the first track without starting it.
    pub fn new(mut output: O, playlist: Vec<String>) -> Result<Self> {
        let first = playlist
            .first()
            .ok_or_else(|| ShelfError::msg("background playlist is empty"))?;
        output.load(first);
        Ok(Self {
            output,
            playlist,
            current: 0,
        })
    }

    /// Index of the loaded playlist entry.
    pub fn current_track(&self) -> usize {
        self.current
    }

    pub fn current_source(&self) -> &str {
        &self.playlist[self.current]
    }

    pub fn is_playing(&self) -> bool {
        self.output.is_playing()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// The play/pause button. Returns whether music is playing afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.output.is_playing() {
            self.output.pause();
            false
        } else {
            play_or_warn(&mut self.output, "background music")
        }
    }

    /// Called when the current track finishes: loads the next one, wrapping
    /// around, and tries to autoplay it.
    pub fn track_ended(&mut self) {
        self.current = (self.current + 1) % self.playlist.len();
        let next = &self.playlist[self.current];
        tracing::info!(track = self.current, source = %next, "advancing playlist");
        self.output.load(next);
        play_or_warn(&mut self.output, "background music");
    }
}

/// One-shot celebration sound, always started from the beginning.
#[derive(Debug)]
pub struct CueSound<O> {
    output: O,
}

impl<O: AudioOutput> CueSound<O> {
    pub fn new(mut output: O, source: &str) -> Self {
        output.load(source);
        Self { output }
    }

    /// Rewinds and plays; a refusal is logged.
    pub fn restart(&mut self) {
        self.output.rewind();
        play_or_warn(&mut self.output, "celebration cue");
    }

    /// Pauses and rewinds to the start.
    pub fn stop(&mut self) {
        self.output.pause();
        self.output.rewind();
    }

    pub fn is_playing(&self) -> bool {
        self.output.is_playing()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist() -> Vec<String> {
        (1..=5).map(|n| format!("{n}.mp3")).collect()
    }

    #[test]
    fn playlist_wraps_and_autoplays() {
        let mut music = BackgroundMusic::new(SimulatedOutput::new(), playlist()).unwrap();
        assert_eq!(music.current_source(), "1.mp3");
        assert!(!music.is_playing());

        for _ in 0..5 {
            music.track_ended();
        }

        assert_eq!(music.current_track(), 0);
        assert_eq!(music.output().source(), Some("1.mp3"));
        assert!(music.is_playing());
    }

    #[test]
    fn rejected_autoplay_is_not_fatal() {
        let mut music = BackgroundMusic::new(SimulatedOutput::blocked(), playlist()).unwrap();
        music.track_ended();

        assert_eq!(music.current_track(), 1);
        assert!(!music.is_playing());
        assert!(!music.toggle());
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let mut music = BackgroundMusic::new(SimulatedOutput::new(), playlist()).unwrap();
        assert!(music.toggle());
        assert!(!music.toggle());
        assert!(!music.is_playing());
    }

    #[test]
    fn empty_playlist_is_rejected() {
        assert!(BackgroundMusic::new(SimulatedOutput::new(), Vec::new()).is_err());
    }

    #[test]
    fn cue_restarts_from_zero() {
        let mut cue = CueSound::new(SimulatedOutput::new(), "cue.mp3");
        cue.restart();
        cue.output_mut().elapse(1_500);
        assert_eq!(cue.output().position_ms(), 1_500);

        cue.restart();
        assert_eq!(cue.output().position_ms(), 0);
        assert!(cue.is_playing());

        cue.stop();
        assert!(!cue.is_playing());
        assert_eq!(cue.output().position_ms(), 0);
    }
}
