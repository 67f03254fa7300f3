// ── Price input buffer ──
//
// Holds the price exactly as typed. Keystrokes that would leave the
// buffer outside "digits, optional point, up to two fraction digits" are
// refused; blur normalizes anything that parses to two fraction digits.

/// Returns `true` if `text` is an acceptable intermediate price entry.
///
/// Accepts `""`, `"3"`, `"3."`, `".5"`, `"3.45"`; refuses `"3.455"`,
/// `"1.2.3"`, `"-1"`, `"1e3"`.
pub fn is_price_input(text: &str) -> bool {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.is_none_or(|f| f.len() <= 2 && f.bytes().all(|b| b.is_ascii_digit()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBuffer(String);

impl PriceBuffer {
    /// Buffer pre-filled with `amount` at two fraction digits.
    pub fn from_amount(amount: f64) -> Self {
        Self(format!("{amount:.2}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace the buffer with `text` if it is acceptable price input.
    /// Returns whether the buffer changed.
    pub fn input(&mut self, text: &str) -> bool {
        if !is_price_input(text) || self.0 == text {
            return false;
        }
        text.clone_into(&mut self.0);
        true
    }

    /// Normalize to two fraction digits if the buffer parses as a finite
    /// number. Returns whether the buffer changed.
    pub fn blur(&mut self) -> bool {
        let Some(amount) = self.parse() else {
            return false;
        };
        let normalized = format!("{amount:.2}");
        if normalized == self.0 {
            return false;
        }
        self.0 = normalized;
        true
    }

    /// The buffer as a finite number, if it is one.
    pub fn parse(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}
