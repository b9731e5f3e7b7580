//! Burst, cue and music ducking fired by a successful library add.
//!
//! Only one celebration is active at a time. A trigger that lands while one
//! is running re-arms both deadlines but keeps the volume captured by the
//! first trigger, so the music always returns to its pre-celebration level.

use crate::{
    audio::{AudioOutput, CueSound},
    config::CelebrationConfig,
    particles::ParticleField,
    timeline::Scheduler,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CelebrationState {
    Idle,
    Celebrating {
        /// Background volume before ducking; `None` if music was silent.
        captured_volume: Option<f32>,
        started_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelebrationAction {
    StopCue,
    RestoreVolume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    generation: u64,
    action: CelebrationAction,
}

#[derive(Debug)]
pub struct CelebrationCoordinator {
    config: CelebrationConfig,
    state: CelebrationState,
    timers: Scheduler<Timer>,
    generation: u64,
}

impl CelebrationCoordinator {
    pub fn new(config: CelebrationConfig) -> Self {
        Self {
            config,
            state: CelebrationState::Idle,
            timers: Scheduler::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> CelebrationState {
        self.state
    }

    pub fn is_celebrating(&self) -> bool {
        matches!(self.state, CelebrationState::Celebrating { .. })
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_due()
    }

    pub fn trigger<M: AudioOutput, C: AudioOutput>(
        &mut self,
        now_ms: u64,
        music: &mut M,
        cue: &mut CueSound<C>,
        field: &mut ParticleField,
    ) {
        let overlapping = self.is_celebrating();
        let playing = music.is_playing();
        let previous = match self.state {
            CelebrationState::Celebrating {
                captured_volume, ..
            } => captured_volume,
            CelebrationState::Idle => None,
        };
        let captured_volume = previous.or_else(|| playing.then(|| music.volume()));

        if playing {
            music.set_volume(self.config.duck_volume);
        }

        field.spawn_default_burst(field.viewport().center());
        cue.restart();

        self.generation += 1;
        let generation = self.generation;
        self.timers.schedule(
            now_ms + self.config.cue_stop_ms,
            Timer {
                generation,
                action: CelebrationAction::StopCue,
            },
        );
        self.timers.schedule(
            now_ms + self.config.restore_ms,
            Timer {
                generation,
                action: CelebrationAction::RestoreVolume,
            },
        );

        tracing::info!(
            generation,
            overlapping,
            ?captured_volume,
            "celebration started"
        );
        self.state = CelebrationState::Celebrating {
            captured_volume,
            started_ms: now_ms,
        };
    }

    /// Runs every deferred action due at `now_ms` and returns the ones that
    /// took effect. Timers from a superseded trigger are dropped.
    pub fn tick<M: AudioOutput, C: AudioOutput>(
        &mut self,
        now_ms: u64,
        music: &mut M,
        cue: &mut CueSound<C>,
    ) -> Vec<CelebrationAction> {
        let mut fired = Vec::new();
        for event in self.timers.take_due(now_ms) {
            let timer = event.action;
            if timer.generation != self.generation {
                tracing::debug!(
                    generation = timer.generation,
                    action = ?timer.action,
                    "dropping stale timer"
                );
                continue;
            }
            match timer.action {
                CelebrationAction::StopCue => cue.stop(),
                CelebrationAction::RestoreVolume => {
                    if let CelebrationState::Celebrating {
                        captured_volume: Some(volume),
                        ..
                    } = self.state
                    {
                        music.set_volume(volume);
                    }
                    self.state = CelebrationState::Idle;
                    tracing::info!("celebration finished");
                }
            }
            fired.push(timer.action);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::SimulatedOutput, config::ParticleConfig, surface::Viewport};

    struct Rig {
        coordinator: CelebrationCoordinator,
        music: SimulatedOutput,
        cue: CueSound<SimulatedOutput>,
        field: ParticleField,
    }

    fn rig(playing: bool) -> Rig {
        let mut music = SimulatedOutput::new();
        music.load("1.mp3");
        music.set_volume(0.8);
        if playing {
            music.play().unwrap();
        }
        Rig {
            coordinator: CelebrationCoordinator::new(CelebrationConfig::default()),
            music,
            cue: CueSound::new(SimulatedOutput::new(), "cue.mp3"),
            field: ParticleField::with_seed(
                ParticleConfig::default(),
                Viewport::new(800.0, 600.0),
                1,
            ),
        }
    }

    impl Rig {
        fn trigger(&mut self, now: u64) {
            self.coordinator
                .trigger(now, &mut self.music, &mut self.cue, &mut self.field);
        }

        fn tick(&mut self, now: u64) -> Vec<CelebrationAction> {
            self.coordinator.tick(now, &mut self.music, &mut self.cue)
        }
    }

    #[test]
    fn ducks_and_restores_playing_music() {
        let mut rig = rig(true);
        rig.trigger(0);

        assert_eq!(rig.music.volume(), 0.01);
        assert_eq!(rig.field.len(), 250);
        assert!(rig.cue.is_playing());
        assert!(rig.coordinator.is_celebrating());

        assert_eq!(rig.tick(2_999), Vec::new());
        assert_eq!(rig.tick(3_000), vec![CelebrationAction::StopCue]);
        assert!(!rig.cue.is_playing());
        assert_eq!(rig.music.volume(), 0.01);

        assert_eq!(rig.tick(4_000), vec![CelebrationAction::RestoreVolume]);
        assert_eq!(rig.music.volume(), 0.8);
        assert_eq!(rig.coordinator.state(), CelebrationState::Idle);
    }

    #[test]
    fn silent_music_is_left_alone() {
        let mut rig = rig(false);
        rig.trigger(0);
        assert_eq!(rig.music.volume(), 0.8);

        rig.music.set_volume(0.5);
        rig.tick(4_000);
        assert_eq!(rig.music.volume(), 0.5);
        assert!(!rig.coordinator.is_celebrating());
    }

    #[test]
    fn overlapping_trigger_keeps_first_captured_volume() {
        let mut rig = rig(true);
        rig.trigger(0);
        rig.trigger(2_000);
        assert_eq!(rig.field.len(), 500);

        // The first trigger's timers are superseded.
        assert_eq!(rig.tick(4_000), Vec::new());
        assert_eq!(rig.music.volume(), 0.01);
        assert!(rig.cue.is_playing());

        assert_eq!(rig.tick(5_000), vec![CelebrationAction::StopCue]);
        assert_eq!(rig.tick(6_000), vec![CelebrationAction::RestoreVolume]);
        assert_eq!(rig.music.volume(), 0.8);
        assert!(rig.coordinator.next_deadline().is_none());
    }

    #[test]
    fn blocked_cue_does_not_stop_the_celebration() {
        let mut rig = rig(true);
        rig.cue = CueSound::new(SimulatedOutput::blocked(), "cue.mp3");
        rig.trigger(0);

        assert!(!rig.cue.is_playing());
        assert_eq!(rig.field.len(), 250);
        assert_eq!(rig.music.volume(), 0.01);
    }
}
