//! Easing functions (input clamped to [0, 1])

fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

pub fn ease_out_circ(x: f32) -> f32 {
    let x = clamp01(x);
    (1.0 - (x - 1.0) * (x - 1.0)).sqrt()
}

pub fn ease_out_quad(x: f32) -> f32 {
    let x = clamp01(x);
    1.0 - (1.0 - x) * (1.0 - x)
}

pub fn ease_in_quad(x: f32) -> f32 {
    let x = clamp01(x);
    x * x
}

pub fn ease_in_out_quad(x: f32) -> f32 {
    let x = clamp01(x);
    if x < 0.5 {
        2.0 * x * x
    } else {
        1.0 - (-2.0 * x + 2.0) * (-2.0 * x + 2.0) / 2.0
    }
}

pub fn ease_out_quint(x: f32) -> f32 {
    let x = clamp01(x);
    1.0 - (1.0 - x).powi(5)
}

/// Parametrized exponential ease-out. Returns exactly 0 at t <= 0 and exactly
/// 1 at t >= 1, so the 2^-steep tail never leaks a discontinuity.
pub fn ease_out_expo(t: f32, steepness: f32, time_power: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let u = t.powf(time_power);
    1.0 - (2.0f32).powf(-steepness * u)
}

/// Parametrized exponential ease-in; same exact-endpoint contract as
/// [`ease_out_expo`].
pub fn ease_in_expo(t: f32, steepness: f32, time_power: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let u = t.powf(time_power);
    (2.0f32).powf(steepness * (u - 1.0))
}

/// Overshoot profile: rises with an expo ease-out to `1 + overshoot_amount`
/// over the first `peak_frac` of (power-warped) time, then settles back to
/// exactly 1 with an expo ease-in over the rest.
pub fn overshoot_blend(
    t: f32,
    overshoot_amount: f32,
    peak_frac: f32,
    time_power: f32,
    out_steepness: f32,
    in_steepness: f32,
) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let tt = t.powf(time_power);
    let peak = 1.0 + overshoot_amount;

    if tt <= peak_frac {
        // time_power already applied above, so the inner ease runs linear time
        let u = tt / peak_frac;
        peak * ease_out_expo(u, out_steepness, 1.0)
    } else {
        let u = (tt - peak_frac) / (1.0 - peak_frac);
        peak + (1.0 - peak) * ease_in_expo(u, in_steepness, 1.0)
    }
}
