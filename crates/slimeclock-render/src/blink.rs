//! Separator open/close blink, driven by the wall-clock second

use slimeclock_core::ease::ease_out_quint;

/// Thinnest separator stamp scale at the closed end of the blink
pub const SEPARATOR_THIN_SCALE: f32 = 0.28;
/// Blink cycles per wall-clock second
pub const SEPARATOR_BLINK_SPEED: f64 = 1.0;

/// Stamp-radius scale for the separator at this instant. Even seconds open
/// (thin → full), odd seconds close (full → thin); the whole effect fades
/// to a steady 1.0 as the seen factor drops.
pub fn separator_scale(clock_seconds: f64, seen_factor: f32) -> f32 {
    let sf = seen_factor.clamp(0.0, 1.0);
    if sf <= 1e-4 {
        return 1.0;
    }

    let tt = clock_seconds.max(0.0) * SEPARATOR_BLINK_SPEED;
    let sec = tt.floor();
    let u = (tt - sec) as f32;
    let e = ease_out_quint(u);

    let thin = SEPARATOR_THIN_SCALE;
    let scale = if (sec as i64) % 2 == 0 {
        thin + (1.0 - thin) * e
    } else {
        1.0 - (1.0 - thin) * e
    };

    scale * sf + (1.0 - sf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_blink_when_unseen() {
        assert_eq!(separator_scale(12.34, 0.0), 1.0);
        assert_eq!(separator_scale(0.5, 0.0), 1.0);
    }

    #[test]
    fn even_second_opens_odd_second_closes() {
        // start of an even second: nearly closed
        assert!((separator_scale(2.0, 1.0) - SEPARATOR_THIN_SCALE).abs() < 1e-4);
        // end of an even second: nearly open
        assert!(separator_scale(2.999, 1.0) > 0.95);
        // start of an odd second: open
        assert!((separator_scale(3.0, 1.0) - 1.0).abs() < 1e-4);
        // end of an odd second: nearly closed
        assert!(separator_scale(3.999, 1.0) < 0.35);
    }

    #[test]
    fn scale_stays_in_thin_to_full_range() {
        for i in 0..400 {
            let s = separator_scale(i as f64 * 0.017, 1.0);
            assert!(s >= SEPARATOR_THIN_SCALE - 1e-4 && s <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn fade_blends_toward_one() {
        let full = separator_scale(2.0, 1.0);
        let half = separator_scale(2.0, 0.5);
        assert!(half > full);
        assert!(half < 1.0);
    }
}
