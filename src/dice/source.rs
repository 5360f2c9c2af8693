//! Injectable dice sources
//!
//! Every roll the engine makes goes through a [`DiceSource`]. The engine holds
//! one behind an `Arc<dyn DiceSource>` and shares it across threads, so every
//! implementation must be `Send + Sync`:
//! - [`ThreadRngDice`] draws from the thread-local generator (no shared state)
//! - [`SeededDice`] keeps one seeded generator behind a mutex
//! - [`ScriptedDice`] replays fixed faces, for tests and session replays

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed die faces
pub trait DiceSource: Send + Sync {
    /// Roll a single die, returning a face in `1..=sides`
    fn roll_die(&self, sides: u32) -> u32;
}

/// Dice backed by the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDice;

impl DiceSource for ThreadRngDice {
    fn roll_die(&self, sides: u32) -> u32 {
        rand::rng().random_range(1..=sides.max(1))
    }
}

/// Dice backed by a single seeded generator.
///
/// The generator is internally synchronized, so one instance can be shared by
/// every thread. The sequence is reproducible for a given seed as long as the
/// calls arrive in the same order.
#[derive(Debug)]
pub struct SeededDice {
    rng: Mutex<StdRng>,
}

impl SeededDice {
    /// Create a dice source from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DiceSource for SeededDice {
    fn roll_die(&self, sides: u32) -> u32 {
        self.rng.lock().random_range(1..=sides.max(1))
    }
}

/// Dice that replay a fixed script of faces.
///
/// Faces are consumed in order and the script wraps around when exhausted.
/// Each face is clamped into `1..=sides` for the die being rolled.
#[derive(Debug)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    cursor: AtomicUsize,
}

impl ScriptedDice {
    /// Create a scripted source from a list of faces
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of dice rolled so far
    pub fn rolled(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&self, sides: u32) -> u32 {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        if self.faces.is_empty() {
            return 1;
        }
        self.faces[index % self.faces.len()].clamp(1, sides.max(1))
    }
}
