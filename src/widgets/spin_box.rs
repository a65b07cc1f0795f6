use crate::band::NumericDomain;
use crate::util::number::{parse_number, round_to};

/// Numeric input for one band's value.
///
/// Values are kept inside the configured range and rounded to the configured
/// number of decimals, like the host's double spin boxes do.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSpinBox {
    /// 1-based band this spin box edits
    band: usize,
    value: f64,
    min: f64,
    max: f64,
    decimals: usize,
    enabled: bool,
}

impl BandSpinBox {
    pub fn new(band: usize) -> Self {
        Self {
            band,
            value: 0.0,
            min: 0.0,
            max: 99.99,
            decimals: 2,
            enabled: false,
        }
    }

    pub fn band(&self) -> usize {
        self.band
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.value = round_to(value, self.decimals).clamp(self.min, self.max);
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Applies the range and precision of a band data type.
    pub fn configure(&mut self, domain: NumericDomain) {
        self.min = domain.min;
        self.max = domain.max;
        self.decimals = domain.decimals;
        self.set_value(self.value);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Handles Enter with `text` typed into the box.
    ///
    /// Returns the new value, or `None` when the text isn't a finite number and
    /// the value stays as it was.
    pub fn commit_text(&mut self, text: &str) -> Option<f64> {
        let value = parse_number(text).filter(|v| v.is_finite())?;
        self.set_value(value);
        Some(self.value)
    }
}
