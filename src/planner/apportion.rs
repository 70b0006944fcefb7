use crate::error::{PlanError, Result};

/// Split an integer `target` into parts proportional to `shares`.
///
/// Largest-remainder (Hamilton) apportionment: each part starts at the floor
/// of its exact quota, then the leftover units go to the parts with the
/// largest fractional remainders. Equal remainders resolve to the lower
/// index, so the output is fully determined by the input.
///
/// The parts always sum to `target`. When every share is zero the target is
/// spread evenly.
pub fn apportion(shares: &[f64], target: u32) -> Result<Vec<u32>> {
    if shares.is_empty() {
        return Err(PlanError::InvalidInput(
            "cannot apportion across zero parts".to_string(),
        ));
    }
    if let Some(bad) = shares.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(PlanError::InvalidInput(format!(
            "apportionment share must be a non-negative number, got {}",
            bad
        )));
    }

    let n = shares.len();
    let sum: f64 = shares.iter().sum();
    let quotas: Vec<f64> = if sum > 0.0 {
        shares
            .iter()
            .map(|s| s / sum * f64::from(target))
            .collect()
    } else {
        vec![f64::from(target) / n as f64; n]
    };

    let mut parts: Vec<u32> = quotas.iter().map(|q| q.floor() as u32).collect();
    let remainders: Vec<f64> = quotas
        .iter()
        .zip(&parts)
        .map(|(q, p)| q - f64::from(*p))
        .collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| remainders[b].total_cmp(&remainders[a]).then(a.cmp(&b)));

    let mut assigned: u32 = parts.iter().sum();

    // Residual is below n in exact arithmetic; the loops also absorb float drift.
    let mut i = 0;
    while assigned < target {
        parts[order[i % n]] += 1;
        assigned += 1;
        i += 1;
    }
    let mut i = 0;
    while assigned > target {
        let idx = order[n - 1 - (i % n)];
        if parts[idx] > 0 {
            parts[idx] -= 1;
            assigned -= 1;
        }
        i += 1;
    }

    tracing::trace!(?shares, target, ?parts, "apportioned");
    Ok(parts)
}
