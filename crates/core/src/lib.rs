//! Core library for the Shelfburst book library page.
//!
//! The crate models the stateful parts of the page without any window or
//! document: the persisted record list, its table projection and
//! statistics, the firework particle field, and the celebration that ties
//! a successful add to a burst, a sound cue and background music ducking.
//! Hosts feed it events and time; [`LibraryPage`] wires everything together.

pub mod audio;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod error;
pub mod page;
pub mod particles;
pub mod record;
pub mod render;
pub mod storage;
pub mod surface;
pub mod tilt;
pub mod timeline;

pub use audio::{AudioOutput, BackgroundMusic, CueSound, SimulatedOutput};
pub use celebration::{CelebrationAction, CelebrationCoordinator, CelebrationState};
pub use clock::{ClockFace, ClockReading};
pub use config::{AppConfig, AudioConfig, CelebrationConfig, LibraryConfig, ParticleConfig};
pub use error::{PlaybackError, Result, ShelfError, StorageError, ValidationError};
pub use page::{LibraryPage, PageOutputs};
pub use particles::{Particle, ParticleField, Shape};
pub use record::{BookCandidate, BookRecord, RecordId, RecordStore};
pub use render::{compute_stats, LibraryRenderer, LibraryRow, LibraryView, Stats};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use surface::{DrawCommand, DrawList, Point, Rgb, Surface, Viewport};
pub use tilt::{tilt_for, CardRect, TiltVars};
pub use timeline::{PageClock, ScheduledEvent, Scheduler};
