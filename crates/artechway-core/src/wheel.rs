//! Picker wheel: pick one option uniformly at random and work out where the
//! wheel has to stop so the pointer lands on it.
//!
//! The wheel is drawn with option 0 starting at the pointer and segments laid
//! out clockwise. Turning the wheel clockwise by `winner * segment +
//! segment / 2` brings the middle of the winner's segment under the pointer,
//! so the final angle is:
//!
//! ```text
//! final = current + 360 * SPIN_TURNS - winner * segment - segment / 2
//! ```
//!
//! The extra full turns are only for show.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Full turns added to every spin.
pub const SPIN_TURNS: u32 = 5;

/// Length of the spin animation.
pub const SPIN_DURATION_MS: f64 = 5000.0;

/// Fewest options the wheel can pick between.
pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("Please add at least {min} options to spin the wheel (got {0})", min = MIN_OPTIONS)]
    InsufficientOptions(usize),

    #[error("The wheel is already spinning")]
    AlreadySpinning,
}

/// Result of one spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub winner_index: usize,
    pub winner: String,
    /// Un-normalized rotation the wheel animates to.
    pub final_angle_degrees: f64,
    pub segment_angle: f64,
}

/// Split text into options, one per line. Whitespace-only lines are
/// dropped; other lines are kept verbatim.
pub fn parse_options(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

/// Rotation that puts the middle of `winner`'s segment under the pointer.
pub fn target_rotation(current_degrees: f64, winner_index: usize, option_count: usize) -> f64 {
    let segment = 360.0 / option_count as f64;
    current_degrees + 360.0 * SPIN_TURNS as f64 - winner_index as f64 * segment - segment / 2.0
}

/// Pick a winner with the given RNG.
///
/// # Errors
///
/// `WheelError::InsufficientOptions` for fewer than [`MIN_OPTIONS`] options.
pub fn spin_with_rng<S, R>(
    options: &[S],
    current_degrees: f64,
    rng: &mut R,
) -> Result<SpinOutcome, WheelError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if options.len() < MIN_OPTIONS {
        return Err(WheelError::InsufficientOptions(options.len()));
    }

    let winner_index = rng.gen_range(0..options.len());
    Ok(SpinOutcome {
        winner_index,
        winner: options[winner_index].as_ref().to_owned(),
        final_angle_degrees: target_rotation(current_degrees, winner_index, options.len()),
        segment_angle: 360.0 / options.len() as f64,
    })
}

/// Pick a winner using the thread-local RNG.
pub fn spin<S: AsRef<str>>(options: &[S], current_degrees: f64) -> Result<SpinOutcome, WheelError> {
    spin_with_rng(options, current_degrees, &mut rand::thread_rng())
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Spinning {
        outcome: SpinOutcome,
        started_at_ms: f64,
    },
}

/// Wheel state across spins.
///
/// A spin runs for [`SPIN_DURATION_MS`]; the caller drives time by passing
/// timestamps (e.g. `performance.now()`) to [`start_spin`](Self::start_spin)
/// and [`poll`](Self::poll).
#[derive(Debug, Clone, Default)]
pub struct PickerWheel {
    rotation_degrees: f64,
    phase: Phase,
}

impl PickerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settled rotation in `[0, 360)`. While spinning this is the rotation
    /// the spin started from.
    pub fn rotation(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, Phase::Spinning { .. })
    }

    /// Outcome of the spin in progress, if any.
    pub fn pending(&self) -> Option<&SpinOutcome> {
        match &self.phase {
            Phase::Spinning { outcome, .. } => Some(outcome),
            Phase::Idle => None,
        }
    }

    /// Start a spin at `now_ms`.
    ///
    /// # Errors
    ///
    /// `WheelError::AlreadySpinning` while a spin is in progress, and
    /// `WheelError::InsufficientOptions` for too few options. State is left
    /// untouched in both cases.
    pub fn start_spin_with_rng<S, R>(
        &mut self,
        options: &[S],
        now_ms: f64,
        rng: &mut R,
    ) -> Result<SpinOutcome, WheelError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if self.is_spinning() {
            log::debug!("spin requested while spinning, ignored");
            return Err(WheelError::AlreadySpinning);
        }

        let outcome = spin_with_rng(options, self.rotation_degrees, rng)?;
        self.phase = Phase::Spinning {
            outcome: outcome.clone(),
            started_at_ms: now_ms,
        };
        Ok(outcome)
    }

    pub fn start_spin<S: AsRef<str>>(
        &mut self,
        options: &[S],
        now_ms: f64,
    ) -> Result<SpinOutcome, WheelError> {
        self.start_spin_with_rng(options, now_ms, &mut rand::thread_rng())
    }

    /// Finish the spin once its animation window has elapsed.
    ///
    /// Returns the outcome exactly once, at which point the wheel is Idle and
    /// its rotation is the final angle normalized into `[0, 360)`.
    pub fn poll(&mut self, now_ms: f64) -> Option<SpinOutcome> {
        let Phase::Spinning { started_at_ms, .. } = self.phase else {
            return None;
        };
        if now_ms - started_at_ms < SPIN_DURATION_MS {
            return None;
        }

        let Phase::Spinning { outcome, .. } = std::mem::take(&mut self.phase) else {
            return None;
        };
        self.rotation_degrees = outcome.final_angle_degrees.rem_euclid(360.0);
        Some(outcome)
    }

    /// Back to rotation 0 and Idle, abandoning any spin in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    proptest! {
        /// Property: the settled angle puts the pointer inside the winner's segment.
        #[test]
        fn prop_pointer_lands_in_winner_segment(
            count in 2usize..50,
            seed in any::<u64>(),
            current in 0.0f64..360.0,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let options: Vec<String> = (0..count).map(|i| i.to_string()).collect();
            let outcome = spin_with_rng(&options, current, &mut rng).unwrap();

            // Clockwise turn since the wheel was drawn at 0; the pointer then
            // sits at (360 - turn) on the wheel.
            let turn = outcome.final_angle_degrees.rem_euclid(360.0);
            let under_pointer = (360.0 - turn).rem_euclid(360.0);
            let expected = (outcome.winner_index as f64 + 0.5) * outcome.segment_angle;
            let offset = (under_pointer - expected + current).rem_euclid(360.0);
            prop_assert!(offset < 1e-6 || 360.0 - offset < 1e-6, "offset {offset}");
        }

        /// Property: parsed options never contain blank entries.
        #[test]
        fn prop_parse_options_no_blanks(text in "[a-c \\n]{0,40}") {
            for option in parse_options(&text) {
                prop_assert!(!option.trim().is_empty());
            }
        }
    }
}
