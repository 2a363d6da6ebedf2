//! Placement jitter for newly opened windows.

/// Source of the small offset applied to windows opened at the default
/// anchor. Injected into the manager so tests can pin placement.
pub trait JitterSource {
    /// Offsets in `0..span` for each axis.
    fn offset(&mut self, span: i32) -> (i32, i32);
}

impl<J: JitterSource + ?Sized> JitterSource for Box<J> {
    fn offset(&mut self, span: i32) -> (i32, i32) {
        (**self).offset(span)
    }
}

/// Pseudo-random jitter from a seeded generator.
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: fastrand::Rng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Seeded from fastrand's global generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl JitterSource for SeededJitter {
    fn offset(&mut self, span: i32) -> (i32, i32) {
        if span <= 0 {
            return (0, 0);
        }
        (self.rng.i32(0..span), self.rng.i32(0..span))
    }
}

/// Always places windows exactly on the anchor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn offset(&mut self, _span: i32) -> (i32, i32) {
        (0, 0)
    }
}
