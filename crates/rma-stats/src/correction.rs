//! Multiple-comparison p-value adjustment.

use rma_model::CorrectionMethod;

/// Adjusts a family of p-values.
///
/// NaN entries are left untouched and do not count towards the family size.
/// Adjusted values are capped at 1.
///
/// ```
/// use rma_model::CorrectionMethod;
/// use rma_stats::adjust_pvalues;
///
/// let adjusted = adjust_pvalues(&[0.01, 0.04], CorrectionMethod::Bonferroni);
/// assert_eq!(adjusted, vec![0.02, 0.08]);
/// ```
pub fn adjust_pvalues(pvalues: &[f64], method: CorrectionMethod) -> Vec<f64> {
    let mut adjusted = pvalues.to_vec();
    let mut order: Vec<usize> = (0..pvalues.len())
        .filter(|&idx| !pvalues[idx].is_nan())
        .collect();
    let m = order.len();
    if m == 0 {
        return adjusted;
    }
    let family = m as f64;

    match method {
        CorrectionMethod::None => {}
        CorrectionMethod::Bonferroni => {
            for &idx in &order {
                adjusted[idx] = (pvalues[idx] * family).min(1.0);
            }
        }
        CorrectionMethod::Sidak => {
            for &idx in &order {
                adjusted[idx] = (1.0 - (1.0 - pvalues[idx]).powf(family)).min(1.0);
            }
        }
        CorrectionMethod::Holm => {
            order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));
            let mut running = 0.0_f64;
            for (rank, &idx) in order.iter().enumerate() {
                let value = ((family - rank as f64) * pvalues[idx]).min(1.0);
                running = running.max(value);
                adjusted[idx] = running;
            }
        }
        CorrectionMethod::FdrBh | CorrectionMethod::FdrBy => {
            let scale = if method == CorrectionMethod::FdrBy {
                (1..=m).map(|i| 1.0 / i as f64).sum::<f64>()
            } else {
                1.0
            };
            order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));
            let mut running = 1.0_f64;
            for (rank, &idx) in order.iter().enumerate().rev() {
                let value = pvalues[idx] * family * scale / (rank as f64 + 1.0);
                running = running.min(value);
                adjusted[idx] = running.min(1.0);
            }
        }
    }
    adjusted
}
