//! Conversions between cell text and typed record fields.

use crate::cell::CellValue;
use crate::error::FieldError;

/// A record field that can hold a mapped column.
///
/// Decoding always hands the field the cell's text; encoding reads the
/// field back as a native [`CellValue`].
pub trait CellField {
    /// Store the text of a decoded cell. Empty text means the zero value.
    fn assign_text(&mut self, text: &str) -> Result<(), FieldError>;

    /// The value written to the cell on encode.
    fn to_cell(&self) -> CellValue;
}

impl CellField for String {
    fn assign_text(&mut self, text: &str) -> Result<(), FieldError> {
        text.clone_into(self);
        Ok(())
    }

    fn to_cell(&self) -> CellValue {
        CellValue::String(self.clone())
    }
}

impl CellField for bool {
    fn assign_text(&mut self, text: &str) -> Result<(), FieldError> {
        *self = match text.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" => false,
            "true" | "1" => true,
            _ => return Err(FieldError::new(text, "bool")),
        };
        Ok(())
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }
}

macro_rules! int_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellField for $ty {
                fn assign_text(&mut self, text: &str) -> Result<(), FieldError> {
                    let text_trimmed = text.trim();
                    *self = if text_trimmed.is_empty() {
                        0
                    } else {
                        text_trimmed
                            .parse()
                            .map_err(|_| FieldError::new(text, stringify!($ty)))?
                    };
                    Ok(())
                }

                // Values past `i64` are written as text so they read back exactly.
                fn to_cell(&self) -> CellValue {
                    i64::try_from(*self)
                        .map(CellValue::Int)
                        .unwrap_or_else(|_| CellValue::String(self.to_string()))
                }
            }
        )*
    };
}

int_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellField for $ty {
                fn assign_text(&mut self, text: &str) -> Result<(), FieldError> {
                    let text_trimmed = text.trim();
                    *self = if text_trimmed.is_empty() {
                        0.0
                    } else {
                        text_trimmed
                            .parse()
                            .map_err(|_| FieldError::new(text, stringify!($ty)))?
                    };
                    Ok(())
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Float(f64::from(*self))
                }
            }
        )*
    };
}

float_field!(f32, f64);

impl<F> CellField for Option<F>
where
    F: CellField + Default,
{
    /// Blank text (empty or only whitespace) is `None`.
    fn assign_text(&mut self, text: &str) -> Result<(), FieldError> {
        if text.trim().is_empty() {
            *self = None;
            return Ok(());
        }
        let mut value = F::default();
        value.assign_text(text)?;
        *self = Some(value);
        Ok(())
    }

    fn to_cell(&self) -> CellValue {
        self.as_ref().map_or(CellValue::Null, CellField::to_cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_verbatim() {
        let mut s = String::from("old");
        s.assign_text("  padded 值 ").unwrap();
        assert_eq!(s, "  padded 值 ");
        assert_eq!(s.to_cell(), CellValue::from("  padded 值 "));
    }

    #[test]
    fn test_integers() {
        let mut n = 5_i64;
        n.assign_text("42").unwrap();
        assert_eq!(n, 42);
        n.assign_text("").unwrap();
        assert_eq!(n, 0);
        assert_eq!(n.assign_text("4.2"), Err(FieldError::new("4.2", "i64")));

        let mut small = 0_u8;
        assert!(small.assign_text("300").is_err());
        assert_eq!(7_u32.to_cell(), CellValue::Int(7));
    }

    #[test]
    fn test_integers_past_i64_keep_every_digit() {
        assert_eq!(u64::MAX.to_cell(), CellValue::from("18446744073709551615"));

        let mut n = 0_u64;
        n.assign_text(&u64::MAX.to_cell().to_text()).unwrap();
        assert_eq!(n, u64::MAX);
        assert_eq!((i64::MAX as u64).to_cell(), CellValue::Int(i64::MAX));
    }

    #[test]
    fn test_floats_and_bools() {
        let mut f = 0.0_f64;
        f.assign_text("2.5").unwrap();
        assert_eq!(f, 2.5);
        assert_eq!(1.5_f32.to_cell(), CellValue::Float(1.5));

        let mut b = false;
        b.assign_text("TRUE").unwrap();
        assert!(b);
        b.assign_text("0").unwrap();
        assert!(!b);
        assert!(b.assign_text("maybe").is_err());
    }

    #[test]
    fn test_option() {
        let mut opt: Option<i32> = Some(1);
        opt.assign_text("").unwrap();
        assert_eq!(opt, None);
        assert_eq!(opt.to_cell(), CellValue::Null);

        opt = Some(3);
        opt.assign_text("  ").unwrap();
        assert_eq!(opt, None);

        opt.assign_text("12").unwrap();
        assert_eq!(opt, Some(12));
        assert_eq!(opt.to_cell(), CellValue::Int(12));

        let mut name: Option<String> = None;
        name.assign_text("Ada").unwrap();
        assert_eq!(name.as_deref(), Some("Ada"));
    }
}
