use std::f64::consts::PI;

/// Cosine ease-in-out: `ease(0) = 0`, `ease(0.5) = 0.5`, `ease(1) = 1`.
///
/// Input is clamped to `[0, 1]`.
#[must_use]
pub fn ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    ((1.0 - t) * PI).cos().mul_add(0.5, 0.5)
}

/// Linear interpolation from `a` to `b`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert!((ease(0.5) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut previous = ease(0.0);
        for i in 1..=1000 {
            let value = ease(f64::from(i) / 1000.0);
            assert!(value >= previous, "ease decreased at step {i}");
            previous = value;
        }
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-3.0), 0.0);
        assert_eq!(ease(7.0), 1.0);
    }

    #[test]
    fn test_ease_is_symmetric() {
        for t in [0.1, 0.25, 0.4] {
            assert!((ease(t) + ease(1.0 - t) - 1.0).abs() < 1e-12);
        }
    }
}
