//! Scalar payloads and their best-effort typed views.

/// How a scalar's token was written in the source text.
///
/// The parser does not distinguish strings from numbers, booleans or `null`:
/// every leaf is text. The style only remembers whether any part of the token
/// was quoted, so that serialization writes `1` back as `1` and `"1"` back as
/// `"1"`. Typed accessors never look at it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    /// The token contained a double-quoted section.
    Quoted,
    /// The token was written without quotes (numbers, literals, bare words).
    #[default]
    Bare,
}

/// A leaf of the tree: raw text plus its [`ScalarStyle`].
///
/// # Examples
///
/// ```
/// use jsonnode::Scalar;
///
/// let n = Scalar::bare("42");
/// assert_eq!(n.as_i32(), 42);
/// assert_eq!(n.as_f64(), 42.0);
///
/// // Coercions never fail; they fall back to a default instead.
/// let s = Scalar::quoted("abc");
/// assert_eq!(s.as_i32(), 0);
/// assert!(s.as_bool());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scalar {
    text: String,
    style: ScalarStyle,
}

impl Scalar {
    #[must_use]
    pub fn new(text: impl Into<String>, style: ScalarStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// A scalar that serializes as a JSON string.
    #[must_use]
    pub fn quoted(text: impl Into<String>) -> Self {
        Self::new(text, ScalarStyle::Quoted)
    }

    /// A scalar that serializes verbatim, such as a number or `true`.
    #[must_use]
    pub fn bare(text: impl Into<String>) -> Self {
        Self::new(text, ScalarStyle::Bare)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Replaces the payload with string text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.style = ScalarStyle::Quoted;
    }

    fn set_bare(&mut self, text: String) {
        self.text = text;
        self.style = ScalarStyle::Bare;
    }

    /// The payload parsed as an `i32`, or `0`.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.text.trim().parse().unwrap_or(0)
    }

    /// The payload parsed as an `i64`, or `0`.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.text.trim().parse().unwrap_or(0)
    }

    /// The payload parsed as an `f32`, or `0.0`.
    #[must_use]
    pub fn as_f32(&self) -> f32 {
        self.text.trim().parse().unwrap_or(0.0)
    }

    /// The payload parsed as an `f64`, or `0.0`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.text.trim().parse().unwrap_or(0.0)
    }

    /// `true`/`false` (any ASCII case) parse as such; any other non-empty
    /// text is `true`, and only empty text is `false`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self.parse_bool() {
            Some(b) => b,
            None => !self.text.is_empty(),
        }
    }

    pub(crate) fn parse_bool(&self) -> Option<bool> {
        let t = self.text.trim();
        if t.eq_ignore_ascii_case("true") {
            Some(true)
        } else if t.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    pub fn set_i32(&mut self, v: i32) {
        self.set_bare(v.to_string());
    }

    pub fn set_i64(&mut self, v: i64) {
        self.set_bare(v.to_string());
    }

    pub fn set_f32(&mut self, v: f32) {
        self.set_bare(v.to_string());
    }

    pub fn set_f64(&mut self, v: f64) {
        self.set_bare(v.to_string());
    }

    pub fn set_bool(&mut self, v: bool) {
        self.set_bare(if v { "true" } else { "false" }.to_owned());
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::quoted(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::quoted(v)
    }
}

macro_rules! bare_from {
    ($($ty:ty => $setter:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    let mut s = Self::default();
                    s.$setter(v);
                    s
                }
            }
        )*
    };
}

bare_from!(i32 => set_i32, i64 => set_i64, f32 => set_f32, f64 => set_f64, bool => set_bool);

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", 1, 1.0, true)]
    #[case(" -17 ", -17, -17.0, true)]
    #[case("+3", 3, 3.0, true)]
    #[case("2.5", 0, 2.5, true)]
    #[case("1e3", 0, 1000.0, true)]
    #[case("abc", 0, 0.0, true)]
    #[case("", 0, 0.0, false)]
    #[case("false", 0, 0.0, false)]
    #[case(" TRUE ", 0, 0.0, true)]
    #[case("False", 0, 0.0, false)]
    #[case("0", 0, 0.0, true)]
    fn coercions(#[case] text: &str, #[case] int: i32, #[case] double: f64, #[case] boolean: bool) {
        let s = Scalar::quoted(text);
        assert_eq!(s.as_i32(), int);
        assert_eq!(s.as_i64(), i64::from(int));
        assert_eq!(s.as_f64(), double);
        #[allow(clippy::cast_possible_truncation)]
        let single = double as f32;
        assert_eq!(s.as_f32(), single);
        assert_eq!(s.as_bool(), boolean);
    }

    #[test]
    fn overflow_falls_back_to_zero() {
        let s = Scalar::bare("99999999999");
        assert_eq!(s.as_i32(), 0);
        assert_eq!(s.as_i64(), 99_999_999_999);
    }

    #[test]
    fn typed_setters_store_bare_text() {
        let mut s = Scalar::quoted("x");
        s.set_i32(7);
        assert_eq!(s, Scalar::bare("7"));
        s.set_bool(false);
        assert_eq!(s.text(), "false");
        assert!(!s.as_bool());
        s.set_f64(0.25);
        assert_eq!(s.text(), "0.25");
        s.set_text("y");
        assert_eq!(s.style(), ScalarStyle::Quoted);
    }

    #[test]
    fn conversions_pick_style() {
        assert_eq!(Scalar::from("1"), Scalar::quoted("1"));
        assert_eq!(Scalar::from(1), Scalar::bare("1"));
        assert_eq!(Scalar::from(true), Scalar::bare("true"));
        assert_eq!(Scalar::from(1.5f32), Scalar::bare("1.5"));
    }

    #[quickcheck]
    fn integer_setters_read_back(v: i64) -> bool {
        let mut s = Scalar::default();
        s.set_i64(v);
        s.as_i64() == v && s.style() == ScalarStyle::Bare
    }

    #[quickcheck]
    fn finite_floats_read_back(v: f64) -> bool {
        !v.is_finite() || Scalar::from(v).as_f64() == v
    }
}
