use std::fmt;

/// A symbolic name describing why an `Outcome` came to be, like `ok` or `invalid_json`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Code(&'static str);

impl Code {
    pub const OK: Code = Code("ok");
    pub const KO: Code = Code("ko");

    pub const fn new(name: &'static str) -> Self {
        Code(name)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The immutable result of a fallible step: a code, a payload and whether it succeeded.
///
/// Failures carry a payload too, usually describing what went wrong.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Outcome<T> {
    code: Code,
    data: T,
    success: bool,
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self::success_with(Code::OK, data)
    }

    pub fn success_with(code: Code, data: T) -> Self {
        Outcome {
            code,
            data,
            success: true,
        }
    }

    pub fn error_with(code: Code, data: T) -> Self {
        Outcome {
            code,
            data,
            success: false,
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }
}

impl<T: Default> Outcome<T> {
    /// A failure without payload.
    pub fn error(code: Code) -> Self {
        Self::error_with(code, T::default())
    }
}

impl<T: Default> Default for Outcome<T> {
    fn default() -> Self {
        Self::error(Code::KO)
    }
}

/// Steps may return plain values, which are successes.
impl<T> From<T> for Outcome<T> {
    fn from(data: T) -> Self {
        Outcome::success(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn success_defaults_to_ok() {
        let outcome = Outcome::success(42);
        assert_eq!(outcome.code(), Code::OK);
        assert_eq!(*outcome.data(), 42);
        assert!(outcome.is_success());
        assert!(!outcome.is_error());
    }

    #[test]
    fn error_defaults_to_ko_and_null_payload() {
        let outcome: Outcome<Value> = Outcome::default();
        assert_eq!(outcome.code(), Code::KO);
        assert_eq!(outcome.into_data(), Value::Null);

        let outcome = Outcome::error_with(Code::new("boom"), json!({"at": 1}));
        assert!(outcome.is_error());
        assert_eq!(outcome.code().to_string(), "boom");
        assert_eq!(outcome.data(), &json!({"at": 1}));
    }

    #[test]
    fn raw_values_convert_into_success() {
        let outcome: Outcome<&str> = "value".into();
        assert_eq!(outcome, Outcome::success("value"));
    }
}
