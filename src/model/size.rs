/// Size of one scale step (bytes → KB → MB …).
const STEP: f64 = 1024.0;
/// Decimal places kept by [`format_scale`].
const DECIMALS: i32 = 2;

/// Expresses a byte count in the largest 1024-based unit whose mantissa is
/// below 1024, rounded to two decimals.
///
/// The unit itself is dropped: 3.5 MiB and 3.5 KiB both return `3.5`.
/// Returns `0.0` for zero bytes.
pub fn format_scale(bytes: u64) -> f64 {
    if bytes == 0 {
        return 0.0;
    }
    // floor(log1024(b)) == floor(log2(b) / 10), computed exactly on integers.
    let exponent = bytes.ilog2() / 10;
    let scaled = bytes as f64 / STEP.powi(exponent as i32);
    round_to(scaled, DECIMALS)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
