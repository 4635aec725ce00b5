/// Visible price band, center plus or minus half a span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub center: f64,
    pub half_span: f64,
}

impl AxisRange {
    pub fn min(&self) -> f64 {
        self.center - self.half_span
    }

    pub fn max(&self) -> f64 {
        self.center + self.half_span
    }

    /// Map a value into the band as a fraction, 0 at the bottom edge and 1 at
    /// the top, clamped.
    pub fn value_to_frac(&self, value: f64) -> f64 {
        if self.half_span <= 0.0 {
            return 0.5;
        }
        let clamped = value.clamp(self.min(), self.max());
        (clamped - self.min()) / (2.0 * self.half_span)
    }
}

/// Snap to the nearest "nice" step: 1, 2 or 5 times a power of ten.
pub fn nice_number(x: f64) -> f64 {
    if !x.is_finite() || x <= 0.0 {
        return 1.0;
    }
    let exp = x.log10().floor();
    let base = 10f64.powf(exp);
    let mantissa = x / base;
    let snapped = if mantissa < 1.5 {
        1.0
    } else if mantissa < 3.5 {
        2.0
    } else if mantissa < 7.5 {
        5.0
    } else {
        10.0
    };
    snapped * base
}

/// Fraction of the viewport height the live price is steered toward.
const TARGET_FRAC: f64 = 0.7;
/// Initial half-span relative to the first price (the original ±0.075 % band).
const INITIAL_HALF_SPAN_FRAC: f64 = 0.00075;
/// Deadband tiers as fractions of the half-span, with their nudge strengths.
const TIERS: [(f64, f64); 3] = [(0.30, 0.20), (0.15, 0.08), (0.05, 0.02)];
/// Distance from either band edge, as a fraction, that triggers span growth.
const EDGE_MARGIN_FRAC: f64 = 0.10;
const SPAN_GROWTH: f64 = 1.05;
/// Floor keeping the span positive even for a zero-valued first sample.
const MIN_HALF_SPAN: f64 = 1e-9;

/// Damped recentring loop keeping a drifting price near `TARGET_FRAC` of the
/// viewport without jumping on every sample.
///
/// The controller keeps a continuous half-span internally and snaps it to a
/// nice step on the way out, so repeated small growth steps accumulate
/// instead of being swallowed by the snap.
#[derive(Debug, Clone, Default)]
pub struct AxisController {
    center: f64,
    raw_half_span: f64,
    initialized: bool,
}

impl AxisController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.initialized = false;
    }

    pub fn range(&self) -> Option<AxisRange> {
        self.initialized.then(|| AxisRange {
            center: self.center,
            half_span: nice_number(self.raw_half_span),
        })
    }

    /// Feed one price into the control loop.
    pub fn observe(&mut self, price: f64) {
        if !price.is_finite() {
            return;
        }
        if !self.initialized {
            self.raw_half_span = (price.abs() * INITIAL_HALF_SPAN_FRAC).max(MIN_HALF_SPAN);
            let half_span = nice_number(self.raw_half_span);
            self.center = price - (TARGET_FRAC - 0.5) * 2.0 * half_span;
            self.initialized = true;
            return;
        }

        let range = AxisRange {
            center: self.center,
            half_span: nice_number(self.raw_half_span),
        };

        // The value that currently sits at the target height.
        let anchor = range.center + (TARGET_FRAC - 0.5) * 2.0 * range.half_span;
        let drift_frac = (price - anchor).abs() / range.half_span;
        for (deadband, strength) in TIERS {
            if drift_frac > deadband {
                let ideal_center = price - (TARGET_FRAC - 0.5) * 2.0 * range.half_span;
                self.center += strength * (ideal_center - self.center);
                break;
            }
        }

        let frac = range.value_to_frac(price);
        if frac <= EDGE_MARGIN_FRAC || frac >= 1.0 - EDGE_MARGIN_FRAC {
            self.raw_half_span *= SPAN_GROWTH;
        }
    }
}
