use serde_json::Value;

/// Anything that can be offered to a rolling series as a sample value.
///
/// Coercion is total: inputs that do not describe a finite number yield
/// `None` and are dropped by the caller, never defaulted to `0.0`.
///
/// | input                         | result                  |
/// |-------------------------------|-------------------------|
/// | finite float / any integer    | `Some(value)`           |
/// | NaN, ±infinity                | `None`                  |
/// | string                        | trimmed, parsed as f64  |
/// | `None`, JSON null/bool/array/object | `None`            |
pub trait SampleValue {
    fn to_sample(&self) -> Option<f64>;
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl SampleValue for f64 {
    fn to_sample(&self) -> Option<f64> {
        finite(*self)
    }
}

impl SampleValue for f32 {
    fn to_sample(&self) -> Option<f64> {
        finite(f64::from(*self))
    }
}

macro_rules! impl_integer_sample {
    ($($ty:ty),*) => {
        $(
            impl SampleValue for $ty {
                fn to_sample(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

impl_integer_sample!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl SampleValue for str {
    fn to_sample(&self) -> Option<f64> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().and_then(finite)
    }
}

impl SampleValue for String {
    fn to_sample(&self) -> Option<f64> {
        self.as_str().to_sample()
    }
}

impl SampleValue for Value {
    fn to_sample(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64().and_then(finite),
            Value::String(s) => s.to_sample(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl<T: SampleValue> SampleValue for Option<T> {
    fn to_sample(&self) -> Option<f64> {
        self.as_ref().and_then(SampleValue::to_sample)
    }
}

impl<T: SampleValue + ?Sized> SampleValue for &T {
    fn to_sample(&self) -> Option<f64> {
        (**self).to_sample()
    }
}
