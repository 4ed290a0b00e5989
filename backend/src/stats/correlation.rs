//! Spearman rank correlation with a two-sided p-value.
//!
//! Ranks use the average of tied positions. The p-value comes from the
//! t-statistic `r * sqrt((n - 2) / (1 - r²))` with `n - 2` degrees of
//! freedom.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
    /// Pairs used after dropping missing values.
    pub observations: usize,
}

/// Spearman correlation of two aligned series, omitting pairs where either
/// side is missing.
///
/// Returns `None` with fewer than three usable pairs or when either series
/// is constant.
pub fn spearman(x: &[Option<f64>], y: &[Option<f64>]) -> Option<Correlation> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((*a, *b)),
            _ => None,
        })
        .unzip();

    let n = xs.len();
    if n < 3 {
        return None;
    }

    let r = pearson(&rank(&xs), &rank(&ys))?;
    let dof = (n - 2) as f64;

    let p_value = if (1.0 - r.abs()) < f64::EPSILON {
        0.0
    } else {
        let t = r * (dof / ((1.0 + r) * (1.0 - r))).sqrt();
        student_t_two_sided(t, dof)?
    };

    Some(Correlation {
        coefficient: r,
        p_value,
        observations: n,
    })
}

/// 1-based ranks, ties get their average rank.
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &k in &order[i..=j] {
            ranks[k] = avg;
        }
        i = j + 1;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// P(|T| >= |t|) for Student's t with `dof` degrees of freedom.
fn student_t_two_sided(t: f64, dof: f64) -> Option<f64> {
    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    let p = 2.0 * (1.0 - dist.cdf(t.abs()));
    p.is_finite().then(|| p.clamp(0.0, 1.0))
}
