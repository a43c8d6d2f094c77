//! Positional access to a node's `widgets_values`.
//!
//! Widget values arrive as an untyped JSON array whose slot meaning depends
//! on the node type. `WidgetValues` reads a slot as a specific kind and falls
//! back to a caller-supplied default on a kind mismatch or a missing index.
//! It never fails.

use serde_json::Value;

/// Borrowed view over a node's positional widget values.
#[derive(Debug, Clone, Copy)]
pub struct WidgetValues<'a> {
    values: &'a [Value],
}

impl<'a> WidgetValues<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    /// View a raw `widgets_values` field. Anything other than an array
    /// (object-shaped widgets, null, a scalar) reads as empty.
    pub fn from_value(value: &'a Value) -> Self {
        match value.as_array() {
            Some(values) => Self::new(values),
            None => Self::new(&[]),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The string at `index`, if that slot holds a string.
    pub fn str_at(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).and_then(Value::as_str)
    }

    pub fn string_or(&self, index: usize, default: &str) -> String {
        self.str_at(index).unwrap_or(default).to_string()
    }

    /// The integer at `index`. Fractional numbers truncate toward zero.
    pub fn int_or(&self, index: usize, default: i64) -> i64 {
        match self.values.get(index) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    pub fn float_or(&self, index: usize, default: f64) -> f64 {
        match self.values.get(index) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_each_kind() {
        let raw = json!(["model.safetensors", 640, 6.5, true]);
        let values = WidgetValues::from_value(&raw);
        assert_eq!(values.len(), 4);
        assert_eq!(values.str_at(0), Some("model.safetensors"));
        assert_eq!(values.int_or(1, 0), 640);
        assert!((values.float_or(2, 0.0) - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractional_int_truncates() {
        let raw = json!([383.9, -2.7]);
        let values = WidgetValues::from_value(&raw);
        assert_eq!(values.int_or(0, 512), 383);
        assert_eq!(values.int_or(1, 0), -2);
    }

    #[test]
    fn test_integer_reads_as_float() {
        let raw = json!([7]);
        let values = WidgetValues::from_value(&raw);
        assert!((values.float_or(0, 8.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_mismatch_returns_default() {
        let raw = json!([42, "twenty", null, {"nested": 1}]);
        let values = WidgetValues::from_value(&raw);
        assert_eq!(values.str_at(0), None);
        assert_eq!(values.string_or(0, "euler"), "euler");
        assert_eq!(values.int_or(1, 20), 20);
        assert!((values.float_or(2, 8.0) - 8.0).abs() < f64::EPSILON);
        assert_eq!(values.int_or(3, 512), 512);
    }

    #[test]
    fn test_out_of_range_returns_default() {
        let raw = json!([]);
        let values = WidgetValues::from_value(&raw);
        assert!(values.is_empty());
        assert_eq!(values.int_or(5, 512), 512);
        assert_eq!(values.string_or(0, "normal"), "normal");
    }

    #[test]
    fn test_non_array_reads_as_empty() {
        let raw = json!({"seed": 1});
        assert!(WidgetValues::from_value(&raw).is_empty());
        assert!(WidgetValues::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_large_seed_keeps_precision() {
        let raw = json!([9_007_199_254_740_993_i64]);
        let values = WidgetValues::from_value(&raw);
        assert_eq!(values.int_or(0, 0), 9_007_199_254_740_993);
    }
}
