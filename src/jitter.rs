//! Jitter formulas shared by the metric feeds.
//!
//! Every function takes the uniform draw `r` in `[0, 1)` explicitly so the
//! feeds stay deterministic under a scripted source.

/// Largest accepted `decimals`, as for `Number.prototype.toFixed`.
const MAX_DECIMALS: usize = 100;

/// Round to `decimals` places on the exact binary value, ties away from
/// zero (`Number.prototype.toFixed`).
pub fn to_fixed(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let decimals = decimals.min(MAX_DECIMALS);
    // 1100 places hold the full expansion of any finite f64
    let exact = format!("{:.1100}", value.abs());
    let bytes = exact.as_bytes();
    let point = match exact.find('.') {
        Some(p) => p,
        None => return value,
    };

    let mut digits: Vec<u8> = bytes[..point].to_vec();
    digits.extend_from_slice(&bytes[point + 1..point + 1 + decimals]);
    if bytes[point + 1 + decimals] >= b'5' {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let int_len = digits.len() - decimals;
    let mut text: String = digits[..int_len].iter().map(|&b| b as char).collect();
    if decimals > 0 {
        text.push('.');
        text.extend(digits[int_len..].iter().map(|&b| b as char));
    }
    match text.parse::<f64>() {
        Ok(rounded) if value.is_sign_negative() => -rounded,
        Ok(rounded) => rounded,
        Err(_) => value,
    }
}

/// `base ± base * pct / 200`, rounded to three places.
pub fn fluctuate(base: f64, pct: f64, r: f64) -> f64 {
    let variance = base * (pct / 100.0);
    to_fixed(base + (r - 0.5) * variance, 3)
}

/// `base ± range / 2`, clamped to `[0, 100]`.
pub fn clamped_fluctuation(base: f64, range: f64, r: f64) -> f64 {
    (base + (r - 0.5) * range).clamp(0.0, 100.0)
}

/// `prev ± span / 2`, rounded to `decimals`. No clamp.
pub fn drift(prev: f64, span: f64, decimals: usize, r: f64) -> f64 {
    to_fixed(prev + (r - 0.5) * span, decimals)
}

/// Uniform value in `[min, max)` rounded to `decimals`.
pub fn range_value(min: f64, max: f64, decimals: usize, r: f64) -> f64 {
    to_fixed(min + r * (max - min), decimals)
}

/// Integer in `[min, max)`.
pub fn floor_range(min: f64, max: f64, r: f64) -> f64 {
    (r * (max - min) + min).floor()
}

/// Numeric part of a display string: `"$12.4M"` -> `12.4`, `"1,247"` -> `1247`.
pub fn parse_baseline(display: &str) -> Option<f64> {
    let digits: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse().ok()
}
