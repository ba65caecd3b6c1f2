//! Helpers shared by the configuration layer and the request builders.

use std::any::type_name;
use std::borrow::Cow;
use std::error::Error;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Total conversion of a value into a `String`.
///
/// Absent values (`None`, JSON `null`) become the empty string, strings are passed
/// through unchanged, errors are rendered by [`error_to_string`] and everything else
/// uses its display form. Implementations never panic.
pub trait ToStringSafe {
    fn to_string_safe(&self) -> String;
}

impl ToStringSafe for str {
    fn to_string_safe(&self) -> String {
        self.to_owned()
    }
}

impl ToStringSafe for String {
    fn to_string_safe(&self) -> String {
        self.clone()
    }
}

impl ToStringSafe for Cow<'_, str> {
    fn to_string_safe(&self) -> String {
        self.to_string()
    }
}

impl<T: ToStringSafe + ?Sized> ToStringSafe for &T {
    fn to_string_safe(&self) -> String {
        (**self).to_string_safe()
    }
}

impl<T: ToStringSafe + ?Sized> ToStringSafe for Box<T> {
    fn to_string_safe(&self) -> String {
        (**self).to_string_safe()
    }
}

impl<T: ToStringSafe> ToStringSafe for Option<T> {
    fn to_string_safe(&self) -> String {
        match self {
            Some(value) => value.to_string_safe(),
            None => String::new(),
        }
    }
}

impl ToStringSafe for serde_json::Value {
    fn to_string_safe(&self) -> String {
        match self {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl<'a> ToStringSafe for dyn Error + 'a {
    fn to_string_safe(&self) -> String {
        error_to_string(self)
    }
}

impl<'a> ToStringSafe for dyn Error + Send + Sync + 'a {
    fn to_string_safe(&self) -> String {
        error_to_string(self)
    }
}

macro_rules! display_to_string_safe {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToStringSafe for $t {
                fn to_string_safe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_to_string_safe!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Convenience wrapper around [`ToStringSafe::to_string_safe`].
pub fn to_string_safe<T: ToStringSafe + ?Sized>(value: &T) -> String {
    value.to_string_safe()
}

/// Renders an error as `[Name] 'message'`, followed by a blank line and one
/// `caused by: ...` line per source when the error has a cause chain.
pub fn error_to_string<E: Error + ?Sized>(err: &E) -> String {
    let mut out = format!("[{}] '{}'", short_type_name::<E>(), err);

    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    if !chain.is_empty() {
        out.push_str("\n\n");
        out.push_str(&chain.join("\n"));
    }
    out
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    // Trait objects render as `dyn path::Trait + path::Send + ...`.
    let principal = full.strip_prefix("dyn ").unwrap_or(full);
    let principal = principal.split(" + ").next().unwrap_or(principal);
    let without_generics = principal.split('<').next().unwrap_or(principal);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// Percent-encodes a value for use as a single URL path segment.
pub fn encode_path_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

pub fn bearer_auth_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// `Basic base64(id:secret)` as sent to the token endpoints.
pub fn basic_auth_value(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}
