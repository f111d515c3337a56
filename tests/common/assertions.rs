//! Assertion utilities for testing.
//!
//! Floating-point comparisons and checks on the JSON bodies the server returns.

use serde_json::Value;

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that an error body carries a message and a request id
pub fn assert_error_body(body: &Value, fragment: &str) {
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("Missing error message in {}", body));
    assert!(
        message.contains(fragment),
        "Error message '{}' does not mention '{}'",
        message,
        fragment
    );
    assert!(body.get("request_id").and_then(Value::as_str).is_some());
}

/// Mean of the named reading in an atmospheric record, if present
pub fn reading_mean(record: &Value, field: &str) -> Option<f64> {
    record.get(field)?.get("mean")?.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq(0.1 + 0.2, 0.3, None);
    }

    #[test]
    #[should_panic(expected = "Values not approximately equal")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, Some(0.01));
    }

    #[test]
    fn test_reading_mean() {
        let record = serde_json::json!({"wind": {"mean": 5.0}, "lastUpdateTime": 1});
        assert_eq!(reading_mean(&record, "wind"), Some(5.0));
        assert_eq!(reading_mean(&record, "humidity"), None);
    }
}
