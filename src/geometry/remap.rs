use nannou::math::map_range;

/// Linear mapping of a magnitude onto a radial displacement.
///
/// Values outside `[in_min, in_max]` extrapolate along the same line unless
/// `clamp` is set, in which case they stop at the output bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Remap {
    pub in_min: f32,
    pub in_max: f32,
    pub out_min: f32,
    pub out_max: f32,
    pub clamp: bool,
}

impl Default for Remap {
    fn default() -> Self {
        Self {
            in_min: 0.0,
            in_max: 0.8,
            out_min: 0.0,
            out_max: 500.0,
            clamp: false,
        }
    }
}

impl Remap {
    pub fn new(in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Self {
        Self {
            in_min,
            in_max,
            out_min,
            out_max,
            clamp: false,
        }
    }

    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn apply(&self, value: f32) -> f32 {
        if self.in_max == self.in_min {
            return self.out_min;
        }
        let mapped = map_range(value, self.in_min, self.in_max, self.out_min, self.out_max);
        if self.clamp {
            let (lo, hi) = if self.out_min <= self.out_max {
                (self.out_min, self.out_max)
            } else {
                (self.out_max, self.out_min)
            };
            mapped.clamp(lo, hi)
        } else {
            mapped
        }
    }
}
