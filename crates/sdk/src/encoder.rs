//! Streaming text encoder for diagnostics, chart labels, and log lines.
//!
//! [`TextStream`] is an append-only byte buffer with typed append operations.
//! Integer digits are emitted in batches of three and two through reverse
//! lookup tables instead of one division per digit, which keeps formatting
//! cheap enough for latency-sensitive call sites. Floating-point and
//! [`Decimal`] values are rendered at a configurable per-instance precision
//! (decimal digits after the point, default 6).
//!
//! The buffer holds exactly the concatenation of everything appended, with no
//! implicit separators. A single trailing null byte can be managed
//! idempotently for C-string interop; [`TextStream::view`] always excludes it.

use std::ffi::CStr;

use crate::types::decimal::{stored_pow10, Decimal, SCALE, SCALE_DIGITS};
use crate::types::time::{Microseconds, Milliseconds, Nanoseconds, Seconds};

/// Default number of fractional digits emitted after the decimal point.
pub const DEFAULT_PRECISION: u8 = 6;

/// Maximum supported precision (bounded by the `10^n` lookup table).
pub const MAX_PRECISION: u8 = 18;

/// Reverse lookup table mapping `0..1000` to its three ASCII digits.
static REV_3DIGIT_LUT: [u8; 3000] = build_3digit_lut();

/// Reverse lookup table mapping `0..100` to its two ASCII digits.
static REV_2DIGIT_LUT: [u8; 200] = build_2digit_lut();

const fn build_3digit_lut() -> [u8; 3000] {
    let mut table = [0u8; 3000];
    let mut i = 0;
    while i < 1000 {
        table[3 * i] = b'0' + (i / 100) as u8;
        table[3 * i + 1] = b'0' + (i / 10 % 10) as u8;
        table[3 * i + 2] = b'0' + (i % 10) as u8;
        i += 1;
    }
    table
}

const fn build_2digit_lut() -> [u8; 200] {
    let mut table = [0u8; 200];
    let mut i = 0;
    while i < 100 {
        table[2 * i] = b'0' + (i / 10) as u8;
        table[2 * i + 1] = b'0' + (i % 10) as u8;
        i += 1;
    }
    table
}

/// Values that know how to append themselves to a [`TextStream`].
///
/// This is a closed set of typed appends: integers of every width, floats,
/// [`Decimal`], text, characters, key/value pairs, sequences, and duration
/// quantities.
pub trait Encode {
    /// Append the text representation of `self` to `stream`.
    fn encode(&self, stream: &mut TextStream);
}

/// Append-only byte buffer with typed, chainable append operations.
///
/// # Examples
///
/// ```
/// use arena_sdk::encoder::TextStream;
/// use arena_sdk::types::Decimal;
///
/// let mut out = TextStream::new();
/// out.append("mid: ").append(&Decimal::from_f64(1.5));
/// assert_eq!(out.view(), b"mid: 1.5");
/// ```
pub struct TextStream {
    buf: Vec<u8>,
    precision: u8,
    precision_scale: i64,
}

impl Default for TextStream {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStream {
    /// Create an empty stream with the default precision of 6.
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }

    /// Create an empty stream emitting `precision` fractional digits.
    ///
    /// A precision of 0 renders no fractional part and no decimal point.
    /// Values above [`MAX_PRECISION`] are clamped.
    pub fn with_precision(precision: u8) -> Self {
        let precision = precision.min(MAX_PRECISION);
        Self {
            buf: Vec::new(),
            precision,
            precision_scale: stored_pow10(precision as usize),
        }
    }

    /// Change the fractional-digit precision for subsequent appends.
    pub fn set_precision(&mut self, precision: u8) {
        let precision = precision.min(MAX_PRECISION);
        self.precision = precision;
        self.precision_scale = stored_pow10(precision as usize);
    }

    /// Current fractional-digit precision.
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Append any [`Encode`] value, returning `self` for chaining.
    #[inline]
    pub fn append<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(self);
        self
    }

    /// Returns `true` if nothing has been appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes in the buffer, including any trailing null.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Discard all buffered bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Borrow the buffered text, excluding a trailing null byte if present.
    pub fn view(&self) -> &[u8] {
        match self.buf.last() {
            Some(&0) => &self.buf[..self.buf.len() - 1],
            _ => &self.buf,
        }
    }

    /// Null-terminated view for C interop; ensures the trailing null first.
    pub fn c_str(&mut self) -> &CStr {
        self.ensure_trailing_null();
        CStr::from_bytes_until_nul(&self.buf).expect("trailing null just ensured")
    }

    /// Append one zero byte unless the buffer already ends with one.
    /// Safe to call redundantly.
    pub fn ensure_trailing_null(&mut self) {
        if self.buf.last().map_or(true, |&b| b != 0) {
            self.buf.push(0);
        }
    }

    /// Remove one trailing zero byte if present. Safe to call redundantly.
    pub fn strip_trailing_null(&mut self) {
        if self.buf.last() == Some(&0) {
            self.buf.pop();
        }
    }

    /// Append raw bytes verbatim, with no escaping.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a signed integer; `fill_zeroes` left-pads the digits with `'0'`
    /// to a minimum count, with the sign emitted before the padding.
    pub fn put_integral(&mut self, value: i64, fill_zeroes: usize) {
        self.put_digits(value.unsigned_abs(), value < 0, fill_zeroes, false);
    }

    /// Append an unsigned integer with optional zero padding.
    pub fn put_unsigned(&mut self, value: u64, fill_zeroes: usize) {
        self.put_digits(value, false, fill_zeroes, false);
    }

    /// Append a floating-point number at the stream precision.
    ///
    /// `NaN` renders as `nan` and infinities as `inf`/`-inf`. Otherwise the
    /// magnitude is rounded half away from zero at `precision` digits and the
    /// sign reflects the *rounded* magnitude: a tiny negative value that
    /// rounds to zero prints `0`, never `-0`.
    pub fn put_float(&mut self, value: f64, fill_zeroes: usize) {
        if value.is_nan() {
            self.push_bytes(b"nan");
            return;
        }
        if value.is_infinite() {
            self.push_bytes(if value < 0.0 { b"-inf" } else { b"inf" });
            return;
        }
        let negative = value < 0.0;
        let scale = self.precision_scale as f64;
        let rounded = (value.abs() * scale).round() / scale;
        let integral = rounded.trunc() as i64;
        let fractional = ((rounded - rounded.trunc()) * scale).round() as i64;
        if negative && (integral != 0 || fractional != 0) {
            self.buf.push(b'-');
        }
        self.put_parts(integral, fractional, fill_zeroes);
    }

    /// Append a [`Decimal`] at the stream precision.
    ///
    /// The numerator is split at the `10^7` boundary. When `precision` is
    /// below 7 the fractional remainder is rounded half away from zero, with
    /// a carry into the integer part when it reaches a full unit. Trailing
    /// zeros in the fraction are stripped; an all-zero fraction omits the
    /// decimal point entirely.
    pub fn put_decimal(&mut self, value: Decimal, fill_zeroes: usize) {
        let magnitude = value.numerator().unsigned_abs();
        let mut integral = (magnitude / SCALE as u64) as i64;
        let mut fractional = (magnitude % SCALE as u64) as i64;
        let precision = self.precision as u32;
        if precision >= SCALE_DIGITS {
            fractional *= stored_pow10((precision - SCALE_DIGITS) as usize);
        } else {
            let divisor = stored_pow10((SCALE_DIGITS - precision) as usize);
            fractional = (fractional + divisor / 2) / divisor;
            if fractional >= self.precision_scale {
                fractional -= self.precision_scale;
                integral += 1;
            }
        }
        if value.numerator() < 0 {
            self.buf.push(b'-');
        }
        self.put_parts(integral, fractional, fill_zeroes);
    }

    /// Emit `integral[.fractional]`, skipping the point for a zero fraction.
    fn put_parts(&mut self, integral: i64, fractional: i64, fill_zeroes: usize) {
        self.put_integral(integral, fill_zeroes);
        if fractional != 0 {
            self.buf.push(b'.');
            self.put_digits(fractional as u64, false, self.precision as usize, true);
        }
    }

    /// Core digit emitter: renders `magnitude` via the 3- and 2-digit batch
    /// tables into a stack buffer, zero-pads to `fill_zeroes` digits, strips
    /// trailing zeros when asked, and prefixes `'-'` for negative values.
    fn put_digits(
        &mut self,
        magnitude: u64,
        negative: bool,
        fill_zeroes: usize,
        remove_trailing_zeroes: bool,
    ) {
        let mut tmp = [0u8; 40];
        let mut itr = tmp.len();

        if magnitude == 0 {
            itr -= 1;
            tmp[itr] = b'0';
        } else {
            let mut ux = magnitude;
            while ux >= 100 {
                let next = ux / 1000;
                let rem = (ux - next * 1000) as usize;
                itr -= 3;
                tmp[itr..itr + 3].copy_from_slice(&REV_3DIGIT_LUT[3 * rem..3 * rem + 3]);
                ux = next;
            }
            while ux >= 10 {
                let next = ux / 100;
                let rem = (ux - next * 100) as usize;
                itr -= 2;
                tmp[itr..itr + 2].copy_from_slice(&REV_2DIGIT_LUT[2 * rem..2 * rem + 2]);
                ux = next;
            }
            if ux > 0 {
                itr -= 1;
                tmp[itr] = b'0' + ux as u8;
            }
        }

        let digits = tmp.len() - itr;
        if fill_zeroes > digits {
            let pad = (fill_zeroes - digits).min(itr);
            tmp[itr - pad..itr].fill(b'0');
            itr -= pad;
        }

        let mut end = tmp.len();
        if remove_trailing_zeroes {
            while end > itr + 1 && tmp[end - 1] == b'0' {
                end -= 1;
            }
        }

        if negative {
            self.buf.push(b'-');
        }
        self.buf.extend_from_slice(&tmp[itr..end]);
    }
}

/// Render any encodable value into an owned `String`.
pub fn to_text<T: Encode + ?Sized>(value: &T) -> String {
    let mut stream = TextStream::new();
    stream.append(value);
    String::from_utf8_lossy(stream.view()).into_owned()
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, stream: &mut TextStream) {
        (**self).encode(stream);
    }
}

macro_rules! impl_encode_signed {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode(&self, stream: &mut TextStream) {
                    stream.put_integral(*self as i64, 0);
                }
            }
        )*
    };
}

macro_rules! impl_encode_unsigned {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode(&self, stream: &mut TextStream) {
                    stream.put_unsigned(*self as u64, 0);
                }
            }
        )*
    };
}

impl_encode_signed!(i8, i16, i32, i64, isize);
impl_encode_unsigned!(u8, u16, u32, u64, usize);

impl Encode for f64 {
    fn encode(&self, stream: &mut TextStream) {
        stream.put_float(*self, 0);
    }
}

impl Encode for f32 {
    fn encode(&self, stream: &mut TextStream) {
        stream.put_float(*self as f64, 0);
    }
}

impl Encode for Decimal {
    fn encode(&self, stream: &mut TextStream) {
        stream.put_decimal(*self, 0);
    }
}

impl Encode for str {
    fn encode(&self, stream: &mut TextStream) {
        stream.push_bytes(self.as_bytes());
    }
}

impl Encode for String {
    fn encode(&self, stream: &mut TextStream) {
        stream.push_bytes(self.as_bytes());
    }
}

impl Encode for char {
    fn encode(&self, stream: &mut TextStream) {
        let mut utf8 = [0u8; 4];
        stream.push_bytes(self.encode_utf8(&mut utf8).as_bytes());
    }
}

impl<K: Encode, V: Encode> Encode for (K, V) {
    /// Rendered as `key: value`.
    fn encode(&self, stream: &mut TextStream) {
        self.0.encode(stream);
        stream.push_bytes(b": ");
        self.1.encode(stream);
    }
}

impl<T: Encode> Encode for [T] {
    /// Rendered as `[ item, item ]`.
    fn encode(&self, stream: &mut TextStream) {
        stream.push_bytes(b"[ ");
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                stream.push_bytes(b", ");
            }
            item.encode(stream);
        }
        stream.push_bytes(b" ]");
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, stream: &mut TextStream) {
        self.as_slice().encode(stream);
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, stream: &mut TextStream) {
        self.as_slice().encode(stream);
    }
}

impl Encode for Seconds {
    fn encode(&self, stream: &mut TextStream) {
        stream.put_integral(self.count(), 0);
        stream.push_bytes(b"s");
    }
}

impl Encode for Milliseconds {
    fn encode(&self, stream: &mut TextStream) {
        stream.put_integral(self.count(), 0);
        stream.push_bytes(b"ms");
    }
}

impl Encode for Microseconds {
    /// Server time is the ambient unit, so bare counts are microseconds.
    fn encode(&self, stream: &mut TextStream) {
        stream.put_integral(self.count(), 0);
    }
}

impl Encode for Nanoseconds {
    /// Whole microseconds, a point, then the 3-digit nanosecond remainder.
    fn encode(&self, stream: &mut TextStream) {
        stream.put_integral(self.count() / 1000, 0);
        stream.push_bytes(b".");
        stream.put_integral((self.count() % 1000).abs(), 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of<T: Encode + ?Sized>(value: &T) -> String {
        to_text(value)
    }

    #[test]
    fn test_integer_basic() {
        assert_eq!(text_of(&0i64), "0");
        assert_eq!(text_of(&7i32), "7");
        assert_eq!(text_of(&-7i32), "-7");
        assert_eq!(text_of(&1_234_567_890i64), "1234567890");
        assert_eq!(text_of(&u64::MAX), "18446744073709551615");
    }

    #[test]
    fn test_integer_min_magnitude() {
        // Magnitude is computed via unsigned promotion, so iN::MIN is exact.
        assert_eq!(text_of(&i64::MIN), "-9223372036854775808");
        assert_eq!(text_of(&i8::MIN), "-128");
    }

    #[test]
    fn test_integer_fill_zeroes() {
        let mut s = TextStream::new();
        s.put_integral(7, 3);
        assert_eq!(s.view(), b"007");

        let mut s = TextStream::new();
        s.put_integral(-7, 3);
        assert_eq!(s.view(), b"-007");

        // Padding never truncates existing digits.
        let mut s = TextStream::new();
        s.put_integral(12345, 3);
        assert_eq!(s.view(), b"12345");
    }

    #[test]
    fn test_digit_batches_keep_interior_zeros() {
        assert_eq!(text_of(&1_002_003i64), "1002003");
        assert_eq!(text_of(&100i64), "100");
        assert_eq!(text_of(&10i64), "10");
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(text_of(&f64::NAN), "nan");
        assert_eq!(text_of(&f64::INFINITY), "inf");
        assert_eq!(text_of(&f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_float_basic() {
        assert_eq!(text_of(&1.5f64), "1.5");
        assert_eq!(text_of(&-1.5f64), "-1.5");
        assert_eq!(text_of(&2.0f64), "2");
        assert_eq!(text_of(&0.25f64), "0.25");
    }

    #[test]
    fn test_float_sign_reflects_rounded_magnitude() {
        // Easy to get backward: the sign must be decided after rounding.
        assert_eq!(text_of(&-0.0f64), "0");
        assert_eq!(text_of(&-0.000_000_4f64), "0");
        assert_eq!(text_of(&-0.000_001f64), "-0.000001");
    }

    #[test]
    fn test_float_precision_zero() {
        let mut s = TextStream::with_precision(0);
        s.append(&1.6f64).append(&' ').append(&1.4f64);
        assert_eq!(s.view(), b"2 1");
    }

    #[test]
    fn test_decimal_formatting_fidelity() {
        assert_eq!(text_of(&Decimal::from_numerator(15_000_000)), "1.5");
        assert_eq!(text_of(&Decimal::from_numerator(10_000_000)), "1");
        assert_eq!(text_of(&Decimal::from_numerator(-25_000_000)), "-2.5");
    }

    #[test]
    fn test_decimal_interior_zeros_kept() {
        assert_eq!(text_of(&Decimal::from_numerator(10_500_000)), "1.05");
        assert_eq!(text_of(&Decimal::from_numerator(12_030_000)), "1.203");
    }

    #[test]
    fn test_decimal_seventh_digit_rounds_at_default_precision() {
        // Default precision is 6; the 10^7-scaled remainder rounds half away.
        assert_eq!(text_of(&Decimal::from_numerator(10_000_001)), "1");
        assert_eq!(text_of(&Decimal::from_numerator(10_000_005)), "1.000001");
    }

    #[test]
    fn test_decimal_high_precision_upscales() {
        let mut s = TextStream::with_precision(8);
        s.append(&Decimal::from_numerator(15_000_000));
        assert_eq!(s.view(), b"1.5");

        let mut s = TextStream::with_precision(7);
        s.append(&Decimal::from_numerator(10_000_001));
        assert_eq!(s.view(), b"1.0000001");
    }

    #[test]
    fn test_decimal_low_precision_carry() {
        // 1.996 at precision 2 rounds the fraction to a full unit: "2".
        let mut s = TextStream::with_precision(2);
        s.append(&Decimal::from_f64(1.996));
        assert_eq!(s.view(), b"2");

        let mut s = TextStream::with_precision(2);
        s.append(&Decimal::from_f64(1.994));
        assert_eq!(s.view(), b"1.99");
    }

    #[test]
    fn test_text_and_char() {
        let mut s = TextStream::new();
        s.append("abc").append(&'x').append(&String::from("yz"));
        assert_eq!(s.view(), b"abcxyz");
    }

    #[test]
    fn test_pair() {
        assert_eq!(text_of(&("amount", 42i32)), "amount: 42");
    }

    #[test]
    fn test_sequence() {
        let items = vec![
            Decimal::from_f64(1.5),
            Decimal::from(2),
            Decimal::from_f64(-2.5),
        ];
        assert_eq!(text_of(&items), "[ 1.5, 2, -2.5 ]");
        assert_eq!(text_of(&[1i32, 2, 3]), "[ 1, 2, 3 ]");
    }

    #[test]
    fn test_durations() {
        assert_eq!(text_of(&Seconds::new(12)), "12s");
        assert_eq!(text_of(&Milliseconds::new(12)), "12ms");
        assert_eq!(text_of(&Microseconds::new(12)), "12");
        assert_eq!(text_of(&Nanoseconds::new(1_234_567)), "1234.567");
        assert_eq!(text_of(&Nanoseconds::new(1_000_002)), "1000.002");
        assert_eq!(text_of(&Nanoseconds::new(-1_500)), "-1.500");
    }

    #[test]
    fn test_trailing_null_idempotent() {
        let mut s = TextStream::new();
        s.append("abc");
        s.ensure_trailing_null();
        let once = s.len();
        s.ensure_trailing_null();
        assert_eq!(s.len(), once);
        assert_eq!(s.view(), b"abc");

        s.strip_trailing_null();
        s.strip_trailing_null();
        assert_eq!(s.len(), 3);
        assert_eq!(s.view(), b"abc");
    }

    #[test]
    fn test_c_str() {
        let mut s = TextStream::new();
        s.append("abc");
        assert_eq!(s.c_str().to_bytes(), b"abc");
        // view() excludes the null added by c_str().
        assert_eq!(s.view(), b"abc");
    }

    #[test]
    fn test_c_str_on_empty_stream() {
        let mut s = TextStream::new();
        assert_eq!(s.c_str().to_bytes(), b"");
    }

    #[test]
    fn test_clear() {
        let mut s = TextStream::new();
        s.append(&123i32);
        assert!(!s.is_empty());
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.view(), b"");
    }

    #[test]
    fn test_chaining_concatenates_without_separators() {
        let mut s = TextStream::new();
        s.append(&1i32).append("x").append(&2i32);
        assert_eq!(s.view(), b"1x2");
    }
}
