/// Number of low bits of the right operand used as a shift count.
pub const SHIFT_MASK: i64 = 63;

/// Promotes an integer operand to a real for mixed arithmetic.
///
/// Large magnitudes round to the nearest representable `f64`, which matches
/// how mixed arithmetic behaves in C-like languages.
///
/// ## Example
/// ```
/// use retread::util::num::int_to_real;
///
/// assert_eq!(int_to_real(5), 5.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn int_to_real(value: i64) -> f64 {
    value as f64
}

/// Reduces a shift operand to a shift count in `0..64`.
///
/// Only the low six bits of the right operand are used, so `1 << 65` is
/// `1 << 1`.
///
/// ## Example
/// ```
/// use retread::util::num::shift_count;
///
/// assert_eq!(shift_count(3), 3);
/// assert_eq!(shift_count(65), 1);
/// assert_eq!(shift_count(-1), 63);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub const fn shift_count(value: i64) -> u32 {
    (value & SHIFT_MASK) as u32
}

/// Shifts the bit pattern of `value` right, filling with zeros.
///
/// ## Example
/// ```
/// use retread::util::num::unsigned_shr;
///
/// assert_eq!(unsigned_shr(-1, 60), 0xF);
/// assert_eq!(unsigned_shr(16, 2), 4);
/// ```
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
#[must_use]
pub const fn unsigned_shr(value: i64, count: i64) -> i64 {
    ((value as u64) >> shift_count(count)) as i64
}
