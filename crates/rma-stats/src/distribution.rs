//! Reference-distribution tail probabilities.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use crate::error::{Result, StatsError};

/// Ratio of mean squares, with degenerate error terms mapped to ±∞ / NaN.
pub(crate) fn f_ratio(ms_effect: f64, ms_error: f64) -> f64 {
    if ms_error > 0.0 {
        ms_effect / ms_error
    } else if ms_effect > 0.0 {
        f64::INFINITY
    } else {
        f64::NAN
    }
}

/// Upper-tail probability of an F statistic.
pub(crate) fn f_sf(f: f64, df1: f64, df2: f64) -> Result<f64> {
    if f.is_nan() {
        return Ok(f64::NAN);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df1, df2).map_err(|err| StatsError::Distribution {
        message: format!("F({df1}, {df2}): {err}"),
    })?;
    Ok(dist.sf(f))
}

/// Two-sided p-value of a t statistic.
pub(crate) fn t_two_sided(t: f64, dof: f64) -> Result<f64> {
    if t.is_nan() {
        return Ok(f64::NAN);
    }
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, dof).map_err(|err| StatsError::Distribution {
        message: format!("t({dof}): {err}"),
    })?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_sf_matches_tabled_critical_value() {
        // F(2, 10) critical value at alpha = 0.05
        let p = f_sf(4.102_821, 2.0, 10.0).unwrap();
        assert!((p - 0.05).abs() < 1e-5, "p = {p}");
    }

    #[test]
    fn t_two_sided_matches_tabled_critical_value() {
        // t(4) two-sided critical value at alpha = 0.05
        let p = t_two_sided(2.776_445, 4.0).unwrap();
        assert!((p - 0.05).abs() < 1e-5, "p = {p}");
        assert_eq!(t_two_sided(0.0, 4.0).unwrap(), 1.0);
    }

    #[test]
    fn degenerate_statistics() {
        assert_eq!(f_ratio(1.0, 0.0), f64::INFINITY);
        assert!(f_ratio(0.0, 0.0).is_nan());
        assert_eq!(f_sf(f64::INFINITY, 1.0, 1.0).unwrap(), 0.0);
        assert!(t_two_sided(f64::NAN, 3.0).unwrap().is_nan());
    }

    #[test]
    fn invalid_degrees_of_freedom_are_reported() {
        assert!(matches!(
            f_sf(1.0, 0.0, 5.0),
            Err(StatsError::Distribution { .. })
        ));
    }
}
