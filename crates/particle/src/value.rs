// File: src/value.rs
// Purpose: Attribute value types for element props

/// A plain HTML attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Number(f64),
    Bool(bool),
    /// Present-but-empty; the attribute is omitted when rendering
    None,
}

impl AttrValue {
    /// Rendered text of the value, or `None` when the attribute must be omitted
    pub fn render(&self) -> Option<String> {
        match self {
            AttrValue::String(s) => Some(s.clone()),
            AttrValue::Number(n) => {
                // Integral values print without `.0`; out-of-range ones would saturate
                if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            AttrValue::Bool(true) => Some("true".to_string()),
            AttrValue::Bool(false) | AttrValue::None => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<u32> for AttrValue {
    fn from(n: u32) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        AttrValue::String(s.clone())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_numbers_drop_fraction() {
        assert_eq!(AttrValue::from(3).render(), Some("3".to_string()));
        assert_eq!(AttrValue::from(2.5).render(), Some("2.5".to_string()));
    }

    #[test]
    fn test_large_integral_numbers_do_not_saturate() {
        assert_eq!(AttrValue::from(1e20).render(), Some("100000000000000000000".to_string()));
        assert_eq!(AttrValue::from(-1e19).render(), Some("-10000000000000000000".to_string()));
        assert_eq!(AttrValue::from(4096).render(), Some("4096".to_string()));
    }

    #[test]
    fn test_none_and_false_are_omitted() {
        assert_eq!(AttrValue::None.render(), None);
        assert_eq!(AttrValue::from(false).render(), None);
        assert_eq!(AttrValue::from(None::<&str>).render(), None);
    }

    #[test]
    fn test_some_string() {
        assert_eq!(AttrValue::from(Some("required")).render(), Some("required".to_string()));
    }
}
