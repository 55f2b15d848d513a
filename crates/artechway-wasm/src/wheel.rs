//! Picker wheel WASM bindings.
//!
//! The page owns the animation clock: it passes `performance.now()` into
//! `spin` and `poll`, animates the wheel's CSS rotation to `target_rotation`
//! over `SPIN_DURATION_MS`, and keeps polling until a winner is reported.
//!
//! ```typescript
//! const wheel = new JsPickerWheel();
//! wheel.set_options_text(textarea.value);
//! const outcome = wheel.spin(performance.now());
//! if (outcome) el.style.transform = `rotate(${outcome.finalAngleDegrees}deg)`;
//! ```

use artechway_core::wheel::{parse_options, PickerWheel, WheelError, SPIN_DURATION_MS};
use wasm_bindgen::prelude::*;

use crate::logging::js_error;

/// Split textarea content into wheel options, dropping blank lines.
#[wasm_bindgen]
pub fn parse_wheel_options(text: &str) -> Vec<String> {
    parse_options(text)
}

#[wasm_bindgen]
pub struct JsPickerWheel {
    inner: PickerWheel,
    options: Vec<String>,
}

impl Default for JsPickerWheel {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsPickerWheel {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsPickerWheel {
        Self {
            inner: PickerWheel::new(),
            options: Vec::new(),
        }
    }

    /// Replace the options from newline-separated text. Returns how many
    /// options remain.
    pub fn set_options_text(&mut self, text: &str) -> usize {
        self.options = parse_options(text);
        self.options.len()
    }

    pub fn options(&self) -> Vec<String> {
        self.options.clone()
    }

    pub fn spin_duration_ms() -> f64 {
        SPIN_DURATION_MS
    }

    /// Start a spin at `now_ms`.
    ///
    /// Returns `{ winnerIndex, winner, finalAngleDegrees, segmentAngle }`, or
    /// `null` if the wheel is already spinning (the click is ignored). Throws
    /// when there are fewer than two options.
    pub fn spin(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        match self.inner.start_spin(&self.options, now_ms) {
            Ok(outcome) => {
                serde_wasm_bindgen::to_value(&outcome).map_err(|e| js_error("wheel", e))
            }
            Err(WheelError::AlreadySpinning) => Ok(JsValue::NULL),
            Err(e) => Err(js_error("wheel", e)),
        }
    }

    /// Winner's label once the spin window has elapsed; `undefined` before
    /// that and on every later call.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        self.inner.poll(now_ms).map(|outcome| outcome.winner)
    }

    #[wasm_bindgen(getter)]
    pub fn is_spinning(&self) -> bool {
        self.inner.is_spinning()
    }

    /// Settled rotation in degrees, `[0, 360)`.
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    /// Angle the running spin animates to, if spinning.
    #[wasm_bindgen(getter)]
    pub fn target_rotation(&self) -> Option<f64> {
        self.inner.pending().map(|o| o.final_angle_degrees)
    }

    /// Back to 0 degrees and idle. Options are kept.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wheel_options() {
        assert_eq!(parse_wheel_options("a\n\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_wheel_idle_state() {
        let mut wheel = JsPickerWheel::new();
        assert_eq!(wheel.set_options_text("Apple\nBanana\nOrange"), 3);
        assert_eq!(wheel.options(), vec!["Apple", "Banana", "Orange"]);
        assert!(!wheel.is_spinning());
        assert_eq!(wheel.rotation(), 0.0);
        assert_eq!(wheel.target_rotation(), None);
        assert_eq!(wheel.poll(0.0), None);
        assert_eq!(JsPickerWheel::spin_duration_ms(), 5000.0);
    }
}
