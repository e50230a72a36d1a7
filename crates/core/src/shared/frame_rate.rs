use std::fmt;

use crate::shared::constants::MAX_RATE_TERM;
use crate::shared::frame_duration::FrameDuration;

/// A frame rate kept as a ratio so fractional rates (e.g. 10/3 fps for 0.3 s
/// frames) survive the trip into the encoder's time base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRate {
    num: u32,
    den: u32,
}

impl FrameRate {
    /// Builds a reduced ratio. A zero on either side yields
    /// [`FrameRate::UNKNOWN`].
    pub fn new(num: u32, den: u32) -> Self {
        if num == 0 || den == 0 {
            return Self::UNKNOWN;
        }
        let g = gcd(num, den);
        Self {
            num: num / g,
            den: den / g,
        }
    }

    /// Reported by containers that carry no usable rate.
    pub const UNKNOWN: FrameRate = FrameRate { num: 0, den: 1 };

    /// One frame per `duration`: the closest ratio to `1 / seconds` whose
    /// terms fit in [`MAX_RATE_TERM`].
    pub fn from_frame_duration(duration: FrameDuration) -> Self {
        Self::approximate(1.0 / duration.seconds(), MAX_RATE_TERM)
    }

    /// Best rational approximation of `fps` with numerator and denominator
    /// both at most `max`, taken from its continued-fraction expansion.
    pub fn approximate(fps: f64, max: u32) -> Self {
        if !fps.is_finite() || fps <= 0.0 || max == 0 {
            return Self::UNKNOWN;
        }
        let max = u64::from(max);
        let error = |h: u64, k: u64| {
            if k == 0 {
                f64::INFINITY
            } else {
                (h as f64 / k as f64 - fps).abs()
            }
        };

        // Convergents h/k, seeded with 0/1 and 1/0.
        let (mut h_prev, mut h) = (0u64, 1u64);
        let (mut k_prev, mut k) = (1u64, 0u64);
        let mut x = fps;

        for _ in 0..64 {
            let whole = x.floor();
            let a = whole.min((max + 1) as f64) as u64;
            let h_next = a * h + h_prev;
            let k_next = a * k + k_prev;

            if h_next > max || k_next > max {
                // Largest partial term that still fits, if it beats h/k.
                let t_h = if h == 0 { u64::MAX } else { (max - h_prev) / h };
                let t_k = if k == 0 { u64::MAX } else { (max - k_prev) / k };
                let t = t_h.min(t_k);
                if t > 0 {
                    let (h_semi, k_semi) = (t * h + h_prev, t * k + k_prev);
                    if error(h_semi, k_semi) < error(h, k) {
                        (h, k) = (h_semi, k_semi);
                    }
                }
                break;
            }

            (h_prev, h) = (h, h_next);
            (k_prev, k) = (k, k_next);

            let frac = x - whole;
            if frac < 1e-9 {
                break;
            }
            x = 1.0 / frac;
        }

        match (u32::try_from(h), u32::try_from(k)) {
            (Ok(num), Ok(den)) => Self::new(num, den),
            _ => Self::UNKNOWN,
        }
    }

    /// Converts an ffmpeg-style signed ratio, treating negatives as unknown.
    pub fn from_ratio(num: i32, den: i32) -> Self {
        match (u32::try_from(num), u32::try_from(den)) {
            (Ok(num), Ok(den)) => Self::new(num, den),
            _ => Self::UNKNOWN,
        }
    }

    pub fn numerator(&self) -> u32 {
        self.num
    }

    pub fn denominator(&self) -> u32 {
        self.den
    }

    pub fn is_known(&self) -> bool {
        self.num != 0
    }

    pub fn fps(&self) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        f64::from(self.num) / f64::from(self.den)
    }

    /// Seconds at which frame `index` starts.
    pub fn timestamp_of(&self, index: usize) -> f64 {
        if !self.is_known() {
            return 0.0;
        }
        index as f64 * f64::from(self.den) / f64::from(self.num)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{} fps", self.num)
        } else {
            write!(f, "{}/{} fps", self.num, self.den)
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
