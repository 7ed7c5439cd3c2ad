//! Blur and threshold passes over the density buffer

use crate::density::DensityBuffer;

/// Threshold level that carves the blob silhouette out of the blurred field
pub const THRESH_LEVEL: f32 = 0.558;

/// Separable box blur. `amount` is the blur radius in buffer pixels,
/// clamped to [0.5, 8]; edges clamp rather than wrap.
pub fn box_blur(buf: &mut DensityBuffer, amount: f32) {
    let radius = amount.clamp(0.5, 8.0).round().max(1.0) as usize;
    let (w, h) = (buf.width(), buf.height());
    if w == 0 || h == 0 {
        return;
    }

    let mut tmp = vec![0.0f32; w * h];
    let norm = 1.0 / (2 * radius + 1) as f32;

    // horizontal pass
    {
        let src = buf.data();
        for y in 0..h {
            let row = &src[y * w..(y + 1) * w];
            for x in 0..w {
                let mut sum = 0.0;
                for k in 0..=2 * radius {
                    let xi = (x + k).saturating_sub(radius).min(w - 1);
                    sum += row[xi];
                }
                tmp[y * w + x] = sum * norm;
            }
        }
    }

    // vertical pass
    {
        let dst = buf.data_mut();
        for y in 0..h {
            for x in 0..w {
                let mut sum = 0.0;
                for k in 0..=2 * radius {
                    let yi = (y + k).saturating_sub(radius).min(h - 1);
                    sum += tmp[yi * w + x];
                }
                dst[y * w + x] = sum * norm;
            }
        }
    }
}

/// Hard threshold: at or above `level` becomes 1, below becomes 0.
pub fn threshold(buf: &mut DensityBuffer, level: f32) {
    for v in buf.data_mut() {
        *v = if *v >= level { 1.0 } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slimeclock_core::Vec2;

    fn buffer() -> DensityBuffer {
        DensityBuffer::for_view(1000.0, 1000.0, 240_000)
    }

    #[test]
    fn blur_spreads_and_lowers_a_spike() {
        let mut b = buffer();
        let (cx, cy) = (b.width() / 2, b.height() / 2);
        let w = b.width();
        b.data_mut()[cy * w + cx] = 1.0;

        box_blur(&mut b, 3.0);
        let center = b.value(cx, cy);
        assert!(center < 1.0);
        assert!(center > 0.0);
        // mass leaked into the neighborhood
        assert!(b.value(cx + 2, cy) > 0.0);
        assert!(b.value(cx, cy + 2) > 0.0);
        // but not across the whole buffer
        assert_eq!(b.value(cx + 20, cy), 0.0);
    }

    #[test]
    fn blur_amount_is_clamped() {
        let mut a = buffer();
        let mut b = buffer();
        let (cx, cy) = (a.width() / 2, a.height() / 2);
        let aw = a.width();
        let bw = b.width();
        a.data_mut()[cy * aw + cx] = 1.0;
        b.data_mut()[cy * bw + cx] = 1.0;

        box_blur(&mut a, 100.0); // clamps to 8
        box_blur(&mut b, 8.0);
        assert_eq!(a.value(cx, cy), b.value(cx, cy));
    }

    #[test]
    fn threshold_binarizes() {
        let mut b = buffer();
        b.stamp_disc(Vec2::new(500.0, 500.0), 4.0, 0.7);
        b.stamp_disc(Vec2::new(100.0, 100.0), 4.0, 0.3);

        threshold(&mut b, THRESH_LEVEL);
        for v in b.data() {
            assert!(*v == 0.0 || *v == 1.0);
        }
        let s = b.scale();
        assert_eq!(b.value((500.0 / s) as usize, (500.0 / s) as usize), 1.0);
        assert_eq!(b.value((100.0 / s) as usize, (100.0 / s) as usize), 0.0);
    }

    #[test]
    fn dense_stamp_cluster_survives_blur_and_threshold() {
        let mut b = buffer();
        // many overlapping low-alpha stamps, the way real digit clusters
        // accumulate — a lone disc never crosses the threshold
        for i in 0..60 {
            let off = Vec2::new(500.0 + (i % 5) as f32, 500.0 + (i / 5) as f32);
            b.stamp_disc(off, 6.0, 22.0 / 255.0);
        }
        let mut lone = buffer();
        lone.stamp_disc(Vec2::new(500.0, 500.0), 6.0, 22.0 / 255.0);

        for buf in [&mut b, &mut lone] {
            box_blur(buf, 3.0);
            threshold(buf, THRESH_LEVEL);
        }
        let s = b.scale();
        let (cx, cy) = ((502.0 / s) as usize, (505.0 / s) as usize);
        assert_eq!(b.value(cx, cy), 1.0);
        assert!(lone.data().iter().all(|&v| v == 0.0));
    }
}
