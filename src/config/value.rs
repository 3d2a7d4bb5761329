//! Typed scalar conversions shared by both on-disk formats.
//!
//! The legacy format only knows text; the modern format has native booleans,
//! integers and arrays. Both go through [`Scalar`] so a field type is
//! converted in exactly one place.

use chrono::{DateTime, Utc};

/// Format-neutral representation of a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
}

impl Scalar {
    /// Text rendering used by the legacy format.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::List(items) => items.join(","),
        }
    }
}

/// A value type usable as a schema field.
pub trait FieldValue: Clone + Default + PartialEq {
    fn to_scalar(&self) -> Scalar;

    fn from_scalar(scalar: &Scalar) -> Result<Self, String>;
}

impl FieldValue for String {
    fn to_scalar(&self) -> Scalar {
        Scalar::Text(self.clone())
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self, String> {
        match scalar {
            Scalar::List(_) => Err("expected a string, found an array".to_string()),
            other => Ok(other.to_text()),
        }
    }
}

impl FieldValue for bool {
    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self, String> {
        match scalar {
            Scalar::Bool(b) => Ok(*b),
            Scalar::Text(s) => parse_flag(s),
            other => Err(format!("expected a boolean, found `{}`", other.to_text())),
        }
    }
}

/// Accepts the spellings the legacy format has historically allowed.
fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
        other => Err(format!("`{}` is not a boolean", other)),
    }
}

macro_rules! impl_int_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn to_scalar(&self) -> Scalar {
                Scalar::Int(i64::from(*self))
            }

            fn from_scalar(scalar: &Scalar) -> Result<Self, String> {
                match scalar {
                    Scalar::Int(i) => <$ty>::try_from(*i)
                        .map_err(|_| format!("{} is out of range", i)),
                    Scalar::Text(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("`{}` is not a valid integer: {}", s, e)),
                    other => Err(format!("expected an integer, found `{}`", other.to_text())),
                }
            }
        }
    )*};
}

impl_int_value!(i64, u16, u32);

impl FieldValue for Vec<String> {
    fn to_scalar(&self) -> Scalar {
        Scalar::List(self.clone())
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self, String> {
        match scalar {
            Scalar::List(items) => Ok(items.clone()),
            Scalar::Text(s) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()),
            other => Err(format!("expected a list, found `{}`", other.to_text())),
        }
    }
}

/// Layout used when writing dates.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

impl FieldValue for Option<DateTime<Utc>> {
    fn to_scalar(&self) -> Scalar {
        Scalar::Text(
            self.map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        )
    }

    fn from_scalar(scalar: &Scalar) -> Result<Self, String> {
        match scalar {
            Scalar::Text(s) if s.trim().is_empty() => Ok(None),
            Scalar::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|date| Some(date.with_timezone(&Utc)))
                .map_err(|e| format!("`{}` is not an RFC 3339 date: {}", s, e)),
            other => Err(format!("expected a date, found `{}`", other.to_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_flag_spellings() {
        assert_eq!(bool::from_scalar(&Scalar::Text("true".into())), Ok(true));
        assert_eq!(bool::from_scalar(&Scalar::Text(" Off ".into())), Ok(false));
        assert!(bool::from_scalar(&Scalar::Text("maybe".into())).is_err());
        assert!(bool::from_scalar(&Scalar::Int(1)).is_err());
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(u16::from_scalar(&Scalar::Text("7000".into())), Ok(7000));
        assert!(u16::from_scalar(&Scalar::Int(70_000)).is_err());
        assert_eq!(i64::from_scalar(&Scalar::Text("-1".into())), Ok(-1));
        assert!(i64::from_scalar(&Scalar::Text("ten".into())).is_err());
    }

    #[test]
    fn test_list_from_text_skips_blanks() {
        let list = Vec::<String>::from_scalar(&Scalar::Text("ssh, web,,dns".into())).unwrap();
        assert_eq!(list, vec!["ssh", "web", "dns"]);
        assert_eq!(Scalar::List(list).to_text(), "ssh,web,dns");
    }

    #[test]
    fn test_date_text_form() {
        let date = Utc.with_ymd_and_hms(2023, 3, 23, 0, 0, 0).unwrap();
        let scalar = Some(date).to_scalar();
        assert_eq!(scalar, Scalar::Text("2023-03-23T00:00:00Z".into()));
        assert_eq!(Option::<DateTime<Utc>>::from_scalar(&scalar), Ok(Some(date)));
        assert_eq!(Option::<DateTime<Utc>>::from_scalar(&Scalar::Text(String::new())), Ok(None));
    }

    #[test]
    fn test_string_accepts_numbers() {
        assert_eq!(String::from_scalar(&Scalar::Int(22)), Ok("22".to_string()));
        assert!(String::from_scalar(&Scalar::List(vec![])).is_err());
    }
}
