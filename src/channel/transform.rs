use std::collections::HashMap;
use once_cell::sync::Lazy;
use thiserror::Error;
type UnaryFn = fn(f64) -> f64;
/// Closed set of element-wise transforms a channel may name.
static REGISTRY: Lazy<HashMap<&'static str, UnaryFn>> = Lazy::new(|| {
    let entries: [(&'static str, UnaryFn); 11] = [
        ("abs", f64::abs),
        ("neg", |v| -v),
        ("sqrt", f64::sqrt),
        ("square", |v| v * v),
        ("deci", |v| v / 10.0),
        ("centi", |v| v / 100.0),
        ("milli", |v| v / 1000.0),
        ("kilo", |v| v * 1000.0),
        ("deg2rad", f64::to_radians),
        ("rad2deg", f64::to_degrees),
        // Raw samples are signed; some sensors emit unsigned words.
        ("unsigned", |v| if v < 0.0 { v + 65536.0 } else { v }),
    ];
    entries.into_iter().collect()
});
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("unknown transform '{0}'")]
    Unknown(String),
    #[error("transform '{key}' needs a numeric argument, got '{arg}'")]
    BadArgument { key: String, arg: String },
}
#[derive(Clone, Copy, Debug)]
pub enum Transform {
    Registered { key: &'static str, func: UnaryFn },
    Scale(f64),
    Offset(f64),
}
impl Transform {
    /// Resolve a key such as `milli`, `scale(0.01)` or `offset(-273.15)`.
    pub fn parse(key: &str) -> Result<Self, TransformError> {
        let key = key.trim();
        if let Some((name, rest)) = key.split_once('(') {
            let arg = rest
                .strip_suffix(')')
                .ok_or_else(|| TransformError::Unknown(key.to_string()))?
                .trim();
            let value: f64 = arg.parse().map_err(|_| TransformError::BadArgument {
                key: name.trim().to_string(),
                arg: arg.to_string(),
            })?;
            return match name.trim() {
                "scale" => Ok(Transform::Scale(value)),
                "offset" => Ok(Transform::Offset(value)),
                _ => Err(TransformError::Unknown(key.to_string())),
            };
        }
        REGISTRY
            .get_key_value(key)
            .map(|(&key, &func)| Transform::Registered { key, func })
            .ok_or_else(|| TransformError::Unknown(key.to_string()))
    }
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Transform::Registered { func, .. } => func(value),
            Transform::Scale(k) => value * k,
            Transform::Offset(k) => value + k,
        }
    }
    pub fn apply_column(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.apply(v)).collect()
    }
    pub fn registered_keys() -> Vec<&'static str> {
        let mut keys: Vec<_> = REGISTRY.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn registered_functions_apply() {
        assert_eq!(Transform::parse("milli").unwrap().apply(1500.0), 1.5);
        assert_eq!(Transform::parse(" abs ").unwrap().apply(-3.0), 3.0);
        assert_eq!(Transform::parse("unsigned").unwrap().apply(-1.0), 65535.0);
        assert_eq!(Transform::parse("unsigned").unwrap().apply(7.0), 7.0);
        assert!((Transform::parse("deg2rad").unwrap().apply(180.0) - std::f64::consts::PI).abs() < 1e-12);
    }
    #[test]
    fn parameterised_transforms() {
        assert_eq!(Transform::parse("scale(0.5)").unwrap().apply(8.0), 4.0);
        assert_eq!(Transform::parse("offset( -2 )").unwrap().apply(8.0), 6.0);
        assert_eq!(
            Transform::parse("scale(x)").unwrap_err(),
            TransformError::BadArgument {
                key: "scale".into(),
                arg: "x".into()
            }
        );
    }
    #[test]
    fn arbitrary_text_is_rejected() {
        for key in ["lambda x: x * 2", "exec(1)", "scale(2", ""] {
            assert!(Transform::parse(key).is_err(), "{key} should be rejected");
        }
    }
    #[test]
    fn column_application() {
        let t = Transform::parse("kilo").unwrap();
        assert_eq!(t.apply_column(&[1.0, -2.0]), vec![1000.0, -2000.0]);
        assert!(Transform::registered_keys().contains(&"centi"));
    }
}
