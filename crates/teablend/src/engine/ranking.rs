use super::scoring::TeaBreakdown;
use std::cmp::Ordering;

/// A tea with its integer share of the blend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankedTea {
    pub(crate) breakdown: TeaBreakdown,
    pub(crate) ratio: u32,
}

/// Converts adjusted scores into integer percentages that sum to exactly 100.
///
/// With no positive total every tea gets an even split. Rounding drift is
/// absorbed by the tea holding the highest ratio, ties going to the lowest id.
pub(crate) fn allocate_ratios(teas: &[TeaBreakdown]) -> Vec<u32> {
    if teas.is_empty() {
        return Vec::new();
    }

    let total: f64 = teas.iter().map(|tea| tea.adjusted).sum();
    let mut ratios: Vec<i64> = if total > 0.0 {
        teas.iter()
            .map(|tea| (100.0 * tea.adjusted / total).round() as i64)
            .collect()
    } else {
        vec![100 / teas.len() as i64; teas.len()]
    };

    let allocated = ratios
        .iter()
        .fold(0_i64, |total, ratio| total.saturating_add(*ratio));
    let drift = 100_i64.saturating_sub(allocated);
    if drift != 0 {
        let mut target = 0;
        for index in 1..teas.len() {
            let better = ratios[index] > ratios[target]
                || (ratios[index] == ratios[target] && teas[index].id < teas[target].id);
            if better {
                target = index;
            }
        }
        ratios[target] = ratios[target].saturating_add(drift);
    }

    ratios
        .into_iter()
        .map(|ratio| u32::try_from(ratio.max(0)).unwrap_or(0))
        .collect()
}

/// Ordering between two teas with the layered tie-break: ratio, then
/// affinity when adjusted scores are within `affinity_gap`, then adjusted
/// score, base score and id.
fn compare(a: &RankedTea, b: &RankedTea, affinity_gap: f64) -> Ordering {
    b.ratio
        .cmp(&a.ratio)
        .then_with(|| {
            if (a.breakdown.adjusted - b.breakdown.adjusted).abs() <= affinity_gap {
                b.breakdown.affinity.total_cmp(&a.breakdown.affinity)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| b.breakdown.adjusted.total_cmp(&a.breakdown.adjusted))
        .then_with(|| b.breakdown.base.total_cmp(&a.breakdown.base))
        .then_with(|| a.breakdown.id.cmp(&b.breakdown.id))
}

/// Ranks teas best first.
///
/// The affinity-gap rule is not transitive across three near-equal teas, so
/// this is a stable insertion sort rather than `sort_by`.
pub(crate) fn rank(teas: Vec<TeaBreakdown>, affinity_gap: f64) -> Vec<RankedTea> {
    let ratios = allocate_ratios(&teas);
    let mut ranked: Vec<RankedTea> = teas
        .into_iter()
        .zip(ratios)
        .map(|(breakdown, ratio)| RankedTea { breakdown, ratio })
        .collect();

    for index in 1..ranked.len() {
        let mut cursor = index;
        while cursor > 0 && compare(&ranked[cursor - 1], &ranked[cursor], affinity_gap) == Ordering::Greater {
            ranked.swap(cursor - 1, cursor);
            cursor -= 1;
        }
    }

    ranked
}
