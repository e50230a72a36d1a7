use std::fmt;

/// Width and height in pixels.
///
/// For assembly this is the target resolution fixed by the first image of
/// the sequence; every written frame must match it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Resolution::new(1920, 1080).to_string(), "1920x1080");
    }

    #[test]
    fn test_equality_is_per_axis() {
        assert_eq!(Resolution::new(100, 100), Resolution::new(100, 100));
        assert_ne!(Resolution::new(100, 80), Resolution::new(80, 100));
    }
}
