//! Gain transforms: annualization and percentage scale.

/// Compound annual growth over `years`: `gain^(1/years)`.
pub fn annualize(gain: f64, years: u32) -> f64 {
    gain.powf(1.0 / f64::from(years))
}

/// Inverse of [`annualize`].
pub fn deannualize(annual_gain: f64, years: u32) -> f64 {
    annual_gain.powi(years as i32)
}

/// Ratio to percent return: 1.05 becomes 5.0.
pub fn to_percentage(gain: f64) -> f64 {
    (gain - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage() {
        assert!((to_percentage(1.05) - 5.0).abs() < 1e-9);
        assert!((to_percentage(0.9) + 10.0).abs() < 1e-9);
        assert_eq!(to_percentage(1.0), 0.0);
    }

    #[test]
    fn annualize_roundtrip() {
        for &(gain, years) in &[(2.0, 10), (0.5, 3), (1.0, 5), (1.37, 1)] {
            let back = deannualize(annualize(gain, years), years);
            assert!((back - gain).abs() < 1e-12, "{gain} over {years}y -> {back}");
        }
    }

    #[test]
    fn one_year_is_identity() {
        assert_eq!(annualize(1.2345, 1), 1.2345);
    }
}
