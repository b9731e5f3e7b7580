//! Host-facing wiring of the library page.
//!
//! [`LibraryPage`] owns every component and translates host events (form
//! submission, row deletion, animation frames, elapsed time, resize, media
//! end) into calls on them. Nothing is global; a host can run several pages.

use chrono::Timelike;

use crate::{
    audio::{play_or_warn, AudioOutput, BackgroundMusic, CueSound},
    celebration::{CelebrationAction, CelebrationCoordinator},
    clock::{ClockFace, ClockReading},
    config::AppConfig,
    particles::ParticleField,
    record::{BookCandidate, RecordId, RecordStore},
    render::{LibraryRenderer, LibraryView, Stats},
    storage::Storage,
    surface::{Surface, Viewport},
    timeline::PageClock,
    Result,
};

/// Audio outputs a page plays through.
#[derive(Debug)]
pub struct PageOutputs<M, C> {
    pub music: M,
    pub cue: C,
    pub tick: C,
}

#[derive(Debug)]
pub struct LibraryPage<S, M, C> {
    store: RecordStore<S>,
    renderer: LibraryRenderer,
    field: ParticleField,
    music: BackgroundMusic<M>,
    cue: CueSound<C>,
    tick: C,
    celebration: CelebrationCoordinator,
    clock: PageClock,
}

impl<S, M, C> LibraryPage<S, M, C>
where
    S: Storage,
    M: AudioOutput,
    C: AudioOutput,
{
    pub fn open(
        config: &AppConfig,
        storage: S,
        outputs: PageOutputs<M, C>,
        viewport: Viewport,
    ) -> Result<Self> {
        let field = ParticleField::new(config.particles.clone(), viewport);
        Self::with_field(config, storage, outputs, field)
    }

    /// Opens a page around an existing particle field, e.g. a seeded one.
    pub fn with_field(
        config: &AppConfig,
        storage: S,
        outputs: PageOutputs<M, C>,
        field: ParticleField,
    ) -> Result<Self> {
        let store = RecordStore::open(storage, config.library.storage_key.clone());
        let music = BackgroundMusic::new(outputs.music, config.audio.playlist.clone())?;
        let cue = CueSound::new(outputs.cue, &config.audio.cue_source);
        let mut tick = outputs.tick;
        tick.load(&config.audio.tick_source);
        tick.set_volume(config.audio.tick_volume);

        let mut renderer = LibraryRenderer::new();
        renderer.render(store.records());
        tracing::info!(records = store.len(), "library page opened");

        Ok(Self {
            store,
            renderer,
            field,
            music,
            cue,
            tick,
            celebration: CelebrationCoordinator::new(config.celebration.clone()),
            clock: PageClock::default(),
        })
    }

    /// Form submission. A validation error is the only failure returned;
    /// the host shows it and nothing changes.
    pub fn submit(&mut self, candidate: &BookCandidate) -> Result<RecordId> {
        let id = self.store.add(candidate)?;
        self.renderer.render(self.store.records());
        self.celebration.trigger(
            self.clock.now_ms,
            self.music.output_mut(),
            &mut self.cue,
            &mut self.field,
        );
        Ok(id)
    }

    /// The delete control of a row.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let removed = self.store.remove(id).is_some();
        if removed {
            self.renderer.render(self.store.records());
        }
        removed
    }

    /// Deletes by displayed position. Prefer [`delete`](Self::delete).
    pub fn delete_at(&mut self, index: usize) -> bool {
        let removed = self.store.remove_at(index).is_some();
        if removed {
            self.renderer.render(self.store.records());
        }
        removed
    }

    /// One animation frame: physics for `dt_seconds`, then paint.
    pub fn frame(&mut self, dt_seconds: f32, surface: &mut dyn Surface) {
        self.field.advance(dt_seconds);
        self.field.render(surface);
    }

    /// One nominal animation frame.
    pub fn step_frame(&mut self, surface: &mut dyn Surface) {
        self.field.step();
        self.field.render(surface);
    }

    /// Moves page time forward and fires any due celebration timers.
    pub fn elapse(&mut self, delta_ms: u64) -> Vec<CelebrationAction> {
        self.clock.advance(delta_ms);
        self.celebration
            .tick(self.clock.now_ms, self.music.output_mut(), &mut self.cue)
    }

    /// The 1 Hz clock update. Sounds the tick beep when due.
    pub fn clock_tick<T: Timelike>(&mut self, time: &T) -> ClockReading {
        let reading = ClockFace::reading(time);
        if reading.beep {
            play_or_warn(&mut self.tick, "clock tick");
        }
        reading
    }

    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.device_pixel_ratio,
            "viewport resized"
        );
        self.field.resize(viewport);
    }

    /// The play/pause button. Returns whether music is playing afterwards.
    pub fn toggle_music(&mut self) -> bool {
        self.music.toggle()
    }

    /// The background track finished; move on to the next one.
    pub fn track_ended(&mut self) {
        self.music.track_ended();
    }

    /// Most recently rendered table and statistics.
    pub fn view(&self) -> &LibraryView {
        self.renderer.view()
    }

    pub fn stats(&self) -> Stats {
        self.renderer.view().stats
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn music(&self) -> &BackgroundMusic<M> {
        &self.music
    }

    pub fn music_mut(&mut self) -> &mut BackgroundMusic<M> {
        &mut self.music
    }

    pub fn cue(&self) -> &CueSound<C> {
        &self.cue
    }

    pub fn tick_output(&self) -> &C {
        &self.tick
    }

    pub fn celebration(&self) -> &CelebrationCoordinator {
        &self.celebration
    }

    /// Page time in milliseconds since the page was opened.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms
    }

    pub fn renders(&self) -> u64 {
        self.renderer.renders()
    }
}
