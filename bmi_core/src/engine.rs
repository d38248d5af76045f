//! BMI engine: input validation, computation and classification.
//!
//! Everything in this module is pure. Persistence of results happens in
//! the orchestration layer (`crate::app`).
//!
//! ## Validation order
//!
//! 1. Weight must parse as a number
//! 2. Weight must be non-empty and non-zero
//! 3. Height must parse as a number
//! 4. Height must be non-empty and non-zero
//!
//! The first failing rule wins.

use crate::{BmiResult, InputError, Measurement, WeightStatus};

/// Conversion factor for pound/inch units
pub const IMPERIAL_FACTOR: f64 = 703.0;

/// Parse a freeform field the way the input form coerces numbers.
///
/// Surrounding whitespace is ignored and an empty field counts as zero.
/// Returns `None` for anything that is not a finite decimal number.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Validate the weight and height fields.
pub fn validate(weight_text: &str, height_text: &str) -> Result<Measurement, InputError> {
    let weight = parse_number(weight_text).ok_or(InputError::WeightNotNumber)?;
    if weight == 0.0 {
        return Err(InputError::WeightMissing);
    }

    let height = parse_number(height_text).ok_or(InputError::HeightNotNumber)?;
    // Negative heights are accepted; only empty/zero counts as missing.
    if height == 0.0 {
        return Err(InputError::HeightMissing);
    }

    Ok(Measurement {
        weight,
        height,
        weight_text: weight_text.to_string(),
        height_text: height_text.to_string(),
    })
}

/// Compute BMI, status and label for a validated measurement
pub fn compute(measurement: &Measurement) -> BmiResult {
    let raw = (measurement.weight / (measurement.height * measurement.height)) * IMPERIAL_FACTOR;
    let bmi = round_tenths(raw);
    let bmi_text = format!("{:.1}", bmi);
    let status = classify(bmi);

    tracing::debug!("Computed BMI {} ({:?})", bmi_text, status);

    BmiResult {
        bmi,
        status,
        label: format!(
            "{} (W:{}, H:{})",
            bmi_text, measurement.weight_text, measurement.height_text
        ),
    }
}

/// Round to one decimal, halves away from zero.
///
/// `format!` rounds exact ties to even, so ties are detected first: the
/// product `raw * 10` is a tie only if it was computed exactly.
pub fn round_tenths(raw: f64) -> f64 {
    let scaled = raw * 10.0;
    let exact = raw.mul_add(10.0, -scaled) == 0.0;
    if exact && (scaled - scaled.trunc()).abs() == 0.5 {
        return scaled.round() / 10.0;
    }
    format!("{:.1}", raw).parse::<f64>().unwrap_or(raw)
}

/// Validate and compute in one step
pub fn evaluate(weight_text: &str, height_text: &str) -> Result<BmiResult, InputError> {
    validate(weight_text, height_text).map(|m| compute(&m))
}

/// Map a (rounded) BMI value onto its weight-status band.
///
/// Values strictly between 24.9 and 25, or 29.9 and 30, match no band.
pub fn classify(bmi: f64) -> Option<WeightStatus> {
    if bmi < 18.5 {
        Some(WeightStatus::Underweight)
    } else if (18.5..=24.9).contains(&bmi) {
        Some(WeightStatus::Healthy)
    } else if (25.0..=29.9).contains(&bmi) {
        Some(WeightStatus::Overweight)
    } else if bmi >= 30.0 {
        Some(WeightStatus::Obese)
    } else {
        None
    }
}

/// Text shown in the result area after a successful computation
pub fn result_text(result: &BmiResult) -> String {
    let level = result
        .status
        .map(|s| format!("({})", s))
        .unwrap_or_default();
    format!("Body Mass Index is {:.1}\n{}", result.bmi, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bmi_of(weight: &str, height: &str) -> BmiResult {
        evaluate(weight, height).unwrap()
    }

    #[test]
    fn test_non_numeric_weight_wins_regardless_of_height() {
        for height in ["", "0", "abc", "70", "-3"] {
            assert_eq!(
                validate("heavy", height),
                Err(InputError::WeightNotNumber),
                "height {:?}",
                height
            );
        }
    }

    #[test]
    fn test_missing_weight() {
        assert_eq!(validate("", "70"), Err(InputError::WeightMissing));
        assert_eq!(validate("0", "70"), Err(InputError::WeightMissing));
        assert_eq!(validate("0.0", "abc"), Err(InputError::WeightMissing));
        assert_eq!(validate("   ", "70"), Err(InputError::WeightMissing));
    }

    #[test]
    fn test_height_errors() {
        assert_eq!(validate("150", "tall"), Err(InputError::HeightNotNumber));
        assert_eq!(validate("150", ""), Err(InputError::HeightMissing));
        assert_eq!(validate("150", "0"), Err(InputError::HeightMissing));
        assert_eq!(validate("150", "-0"), Err(InputError::HeightMissing));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(InputError::WeightNotNumber.to_string(), "Weight must be a number.");
        assert_eq!(InputError::WeightMissing.to_string(), "Please enter weight.");
        assert_eq!(InputError::HeightNotNumber.to_string(), "Height must be a number.");
        assert_eq!(InputError::HeightMissing.to_string(), "Please enter height.");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 154 "), Some(154.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
        assert_eq!(parse_number(""), Some(0.0));
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_healthy_example() {
        let result = bmi_of("154", "71");
        assert_eq!(result.bmi, 21.5);
        assert_eq!(result.status, Some(WeightStatus::Healthy));
        assert_eq!(result.label, "21.5 (W:154, H:71)");
    }

    #[test]
    fn test_obese_example() {
        let result = bmi_of("250", "65");
        assert_eq!(result.bmi, 41.6);
        assert_eq!(result.status, Some(WeightStatus::Obese));
    }

    #[test]
    fn test_underweight_example() {
        let result = bmi_of("100", "70");
        assert_eq!(result.bmi, 14.3);
        assert_eq!(result.status, Some(WeightStatus::Underweight));
    }

    #[test]
    fn test_exact_tie_rounds_up() {
        let result = bmi_of("111", "74");
        assert_eq!(result.bmi, 14.3);
        assert_eq!(result.label, "14.3 (W:111, H:74)");
        assert_eq!(result_text(&result), "Body Mass Index is 14.3\n(Underweight)");

        assert_eq!(bmi_of("185", "74").label, "23.8 (W:185, H:74)");
        assert_eq!(bmi_of("259", "74").label, "33.3 (W:259, H:74)");
    }

    #[test]
    fn test_round_tenths() {
        assert_eq!(round_tenths(14.25), 14.3);
        assert_eq!(round_tenths(23.75), 23.8);
        assert_eq!(round_tenths(0.25), 0.3);
        assert_eq!(round_tenths(-14.25), -14.3);
        assert_eq!(round_tenths(21.476), 21.5);
        assert_eq!(round_tenths(14.34), 14.3);
    }

    #[test]
    fn test_negative_height_accepted() {
        let result = bmi_of("154", "-71");
        assert_eq!(result.bmi, 21.5);
        assert_eq!(result.label, "21.5 (W:154, H:-71)");
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify(18.4), Some(WeightStatus::Underweight));
        assert_eq!(classify(18.5), Some(WeightStatus::Healthy));
        assert_eq!(classify(24.9), Some(WeightStatus::Healthy));
        assert_eq!(classify(25.0), Some(WeightStatus::Overweight));
        assert_eq!(classify(29.9), Some(WeightStatus::Overweight));
        assert_eq!(classify(30.0), Some(WeightStatus::Obese));
    }

    #[test]
    fn test_band_gaps() {
        assert_eq!(classify(24.95), None);
        assert_eq!(classify(29.95), None);
        assert_eq!(classify(f64::NAN), None);
    }

    #[test]
    fn test_result_text() {
        let result = bmi_of("250", "65");
        assert_eq!(result_text(&result), "Body Mass Index is 41.6\n(Obese)");
    }

    #[test]
    fn test_result_text_without_band() {
        let result = BmiResult {
            bmi: 24.95,
            status: None,
            label: String::new(),
        };
        assert!(result_text(&result).ends_with('\n'));
    }
}
