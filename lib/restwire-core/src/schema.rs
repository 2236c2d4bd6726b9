//! Field schemas for annotated structs.
//!
//! `#[derive(Params)]` builds one [`FieldSpec`] per location annotation of a
//! struct and stores them in [`Params::FIELDS`]. The table is computed at
//! compile time, so extracting parameters never inspects types at runtime.
//!
//! # Example
//!
//! ```ignore
//! use restwire::Params;
//!
//! #[derive(Params)]
//! struct ListRepos {
//!     #[param(path = "owner")]
//!     owner: String,
//!     #[param(query = "page")]
//!     page: u32,
//!     #[param(query("sort", required))]
//!     sort: String,
//! }
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::param::{CookieParam, HeaderParam, Param, PathSegmentParam, QueryParam};

/// Request location a struct field can be annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// URL query string (`query`).
    Query,
    /// URL placeholder (`path`).
    Path,
    /// Request header (`header`).
    Header,
    /// Request cookie (`cookie`).
    Cookie,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Path => write!(f, "path"),
            Self::Header => write!(f, "header"),
            Self::Cookie => write!(f, "cookie"),
        }
    }
}

/// One location annotation on a struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The struct field name.
    pub field: &'static str,
    /// Where the value goes.
    pub location: ParamLocation,
    /// Target name (query key, placeholder name, header or cookie name).
    pub name: &'static str,
    /// Emit the field even when it holds its zero value.
    pub required: bool,
}

impl FieldSpec {
    /// Append the parameters this annotation yields for `value`.
    ///
    /// Zero values are skipped unless the annotation is `required`; sequences
    /// yield one parameter per element.
    pub fn extract<V: ParamValue + ?Sized>(&self, value: &V, out: &mut Vec<Param>) {
        if !self.required && value.is_zero() {
            return;
        }
        let mut values = Vec::new();
        value.push_values(&mut values);
        out.extend(values.into_iter().map(|value| self.make_param(value)));
    }

    fn make_param(&self, value: String) -> Param {
        match self.location {
            ParamLocation::Query => QueryParam::new(self.name, value).into(),
            ParamLocation::Path => PathSegmentParam::new(self.name, value).into(),
            ParamLocation::Header => HeaderParam::new(self.name, value).into(),
            ParamLocation::Cookie => CookieParam::new(self.name, value).into(),
        }
    }
}

/// Types that describe request parameters through annotated fields.
///
/// Usually derived with `#[derive(Params)]`; implement it by hand for
/// records whose parameters cannot be expressed with annotations.
pub trait Params {
    /// Schema of the directly annotated fields, in declaration order.
    ///
    /// Flattened fields contribute through their own `FIELDS`.
    const FIELDS: &'static [FieldSpec];

    /// Produce the parameters described by this value.
    fn params(&self) -> Vec<Param>;
}

impl<T: Params + ?Sized> Params for &T {
    const FIELDS: &'static [FieldSpec] = T::FIELDS;

    fn params(&self) -> Vec<Param> {
        (**self).params()
    }
}

/// A value that can be placed in a query, path, header or cookie.
pub trait ParamValue {
    /// Returns `true` for the zero value of the type (`""`, `0`, `false`,
    /// `None`, empty sequences).
    fn is_zero(&self) -> bool;

    /// Append the string form of the value. Sequences push one entry per element.
    fn push_values(&self, out: &mut Vec<String>);
}

macro_rules! impl_param_value_display {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == $zero
                }

                fn push_values(&self, out: &mut Vec<String>) {
                    out.push(self.to_string());
                }
            }
        )*
    };
}

impl_param_value_display! {
    bool => false,
    char => '\0',
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
}

macro_rules! impl_param_value_float {
    ($($ty:ty),*) => {
        $(
            impl ParamValue for $ty {
                #[allow(clippy::float_cmp)]
                fn is_zero(&self) -> bool {
                    *self == 0.0
                }

                fn push_values(&self, out: &mut Vec<String>) {
                    out.push(self.to_string());
                }
            }
        )*
    };
}

impl_param_value_float!(f32, f64);

impl ParamValue for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        out.push(self.to_string());
    }
}

impl ParamValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        out.push(self.clone());
    }
}

impl ParamValue for Cow<'_, str> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        out.push(self.to_string());
    }
}

impl<T: ParamValue + ?Sized> ParamValue for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        (**self).push_values(out);
    }
}

impl<T: ParamValue + ?Sized> ParamValue for Box<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        (**self).push_values(out);
    }
}

/// `None` is zero. A required `None` yields a single empty value.
impl<T: ParamValue> ParamValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        match self {
            Some(value) => value.push_values(out),
            None => out.push(String::new()),
        }
    }
}

impl<T: ParamValue> ParamValue for [T] {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        for item in self {
            item.push_values(out);
        }
    }
}

impl<T: ParamValue, const N: usize> ParamValue for [T; N] {
    fn is_zero(&self) -> bool {
        N == 0
    }

    fn push_values(&self, out: &mut Vec<String>) {
        self.as_slice().push_values(out);
    }
}

impl<T: ParamValue> ParamValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn push_values(&self, out: &mut Vec<String>) {
        self.as_slice().push_values(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: FieldSpec = FieldSpec {
        field: "page",
        location: ParamLocation::Query,
        name: "page",
        required: false,
    };

    fn extract<V: ParamValue + ?Sized>(spec: FieldSpec, value: &V) -> Vec<Param> {
        let mut out = Vec::new();
        spec.extract(value, &mut out);
        out
    }

    #[test]
    fn param_location_display() {
        assert_eq!(ParamLocation::Query.to_string(), "query");
        assert_eq!(ParamLocation::Path.to_string(), "path");
        assert_eq!(ParamLocation::Header.to_string(), "header");
        assert_eq!(ParamLocation::Cookie.to_string(), "cookie");
    }

    #[test]
    fn omit_empty_skips_zero_values() {
        assert!(extract(PAGE, &0_u32).is_empty());
        assert!(extract(PAGE, "").is_empty());
        assert!(extract(PAGE, &false).is_empty());
        assert!(extract(PAGE, &None::<u32>).is_empty());
        assert!(extract(PAGE, &Vec::<String>::new()).is_empty());
    }

    #[test]
    fn required_emits_zero_values() {
        let spec = FieldSpec {
            required: true,
            ..PAGE
        };
        assert_eq!(
            extract(spec, &0_u32),
            vec![Param::from(QueryParam::new("page", "0"))]
        );
        assert_eq!(
            extract(spec, ""),
            vec![Param::from(QueryParam::new("page", ""))]
        );
        assert_eq!(
            extract(spec, &None::<u32>),
            vec![Param::from(QueryParam::new("page", ""))]
        );
    }

    #[test]
    fn sequence_yields_one_param_per_element() {
        let spec = FieldSpec {
            field: "list",
            name: "list",
            ..PAGE
        };
        let values = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            extract(spec, &values),
            vec![
                Param::from(QueryParam::new("list", "a")),
                Param::from(QueryParam::new("list", "b")),
            ]
        );
        assert_eq!(extract(spec, &[1, 2, 3]).len(), 3);
    }

    #[test]
    fn location_selects_variant() {
        let cases = [
            (ParamLocation::Path, Param::from(PathSegmentParam::new("v", "x"))),
            (ParamLocation::Header, Param::from(HeaderParam::new("v", "x"))),
            (ParamLocation::Cookie, Param::from(CookieParam::new("v", "x"))),
        ];
        for (location, expected) in cases {
            let spec = FieldSpec {
                field: "v",
                location,
                name: "v",
                required: false,
            };
            assert_eq!(extract(spec, "x"), vec![expected]);
        }
    }

    #[test]
    fn option_some_of_zero_is_not_zero() {
        assert_eq!(
            extract(PAGE, &Some(0_u32)),
            vec![Param::from(QueryParam::new("page", "0"))]
        );
    }

    struct Manual {
        token: String,
    }

    impl Params for Manual {
        const FIELDS: &'static [FieldSpec] = &[FieldSpec {
            field: "token",
            location: ParamLocation::Header,
            name: "X-Token",
            required: true,
        }];

        fn params(&self) -> Vec<Param> {
            let mut out = Vec::new();
            for spec in Self::FIELDS {
                spec.extract(&self.token, &mut out);
            }
            out
        }
    }

    #[test]
    fn manual_params_impl() {
        let manual = Manual {
            token: "secret".to_string(),
        };
        assert_eq!(
            (&manual).params(),
            vec![Param::from(HeaderParam::new("X-Token", "secret"))]
        );
        assert_eq!(<&Manual as Params>::FIELDS.len(), 1);
    }
}
