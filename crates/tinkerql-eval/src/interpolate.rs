//! Quality-level interpolation between two known item variants
//!
//! All arithmetic is integer/rational so that interpolating exactly at a
//! source variant's quality level reproduces that variant bit for bit.

use indexmap::IndexMap;
use tinkerql_expr::{Decoded, decode};
use tinkerql_model::{Criterion, InterpolatedItem, ItemVariant, StatId};

use crate::error::InterpolationError;

/// Compute the stat block of `low`'s item family at `target_ql`, scaling
/// linearly between `low` and `high`.
///
/// Requires `low.quality_level < high.quality_level` and a target inside the
/// bracket; out-of-bracket requests fail rather than extrapolate. Stats
/// present in only one variant are carried through unscaled; descriptive
/// fields come from the nearer variant. Requirement thresholds scale too
/// when the two variants' criteria lists are structurally identical.
pub fn interpolate(
    low: &ItemVariant,
    high: &ItemVariant,
    target_ql: i32,
) -> Result<InterpolatedItem, InterpolationError> {
    if low.name != high.name {
        return Err(InterpolationError::NameMismatch {
            low: low.name.clone(),
            high: high.name.clone(),
        });
    }
    let (ql_low, ql_high) = (low.quality_level, high.quality_level);
    if ql_low >= ql_high {
        return Err(InterpolationError::InvertedBracket {
            low: ql_low,
            high: ql_high,
        });
    }
    if target_ql < ql_low || target_ql > ql_high {
        return Err(InterpolationError::QlOutOfRange {
            target: target_ql,
            low: ql_low,
            high: ql_high,
        });
    }

    // At a source QL the source variant is the answer, exactly.
    if target_ql == ql_low || target_ql == ql_high {
        let source = if target_ql == ql_low { low } else { high };
        return Ok(InterpolatedItem {
            variant: source.clone(),
            source_low_ql: ql_low,
            source_high_ql: ql_high,
            interpolated: false,
        });
    }

    let bracket = Bracket {
        ql_low,
        ql_high,
        target_ql,
    };

    let mut stat_block: IndexMap<StatId, i32> = IndexMap::with_capacity(low.stat_block.len());
    for (&stat, &low_value) in &low.stat_block {
        let value = match high.stat(stat) {
            Some(high_value) => bracket.scale(low_value, high_value),
            None => low_value,
        };
        stat_block.insert(stat, value);
    }
    for (&stat, &high_value) in &high.stat_block {
        stat_block.entry(stat).or_insert(high_value);
    }

    // Ties between the two sources go to the high variant.
    let nearer = if 2 * target_ql >= ql_low + ql_high {
        high
    } else {
        low
    };

    let criteria = interpolate_criteria(&low.criteria, &high.criteria, &nearer.criteria, bracket);

    Ok(InterpolatedItem {
        variant: ItemVariant {
            name: low.name.clone(),
            quality_level: target_ql,
            stat_block,
            criteria,
            description: nearer.description.clone(),
        },
        source_low_ql: ql_low,
        source_high_ql: ql_high,
        interpolated: true,
    })
}

#[derive(Clone, Copy)]
struct Bracket {
    ql_low: i32,
    ql_high: i32,
    target_ql: i32,
}

impl Bracket {
    /// `low + round_half_up((high - low) * (t - ql_low) / (ql_high - ql_low))`
    fn scale(self, low_value: i32, high_value: i32) -> i32 {
        let num = i64::from(high_value - low_value) * i64::from(self.target_ql - self.ql_low);
        let den = i64::from(self.ql_high - self.ql_low);
        let scaled = i64::from(low_value) + div_round_half_up(num, den);
        scaled as i32
    }
}

/// `floor(num/den + 1/2)` in integer arithmetic; `den` must be positive.
/// Half-up means ties round toward positive infinity, also for negative
/// deltas (shrinking stats).
fn div_round_half_up(num: i64, den: i64) -> i64 {
    (2 * num + den).div_euclid(2 * den)
}

/// Requirement thresholds scale with QL the same way stats do, but only when
/// the two variants agree on the expression's shape (same stat and operator
/// sequence). Otherwise the nearer variant's criteria are carried verbatim.
fn interpolate_criteria(
    low: &[Criterion],
    high: &[Criterion],
    nearer: &[Criterion],
    bracket: Bracket,
) -> Vec<Criterion> {
    if low.len() != high.len() {
        return nearer.to_vec();
    }
    let mut result = Vec::with_capacity(low.len());
    for (&l, &h) in low.iter().zip(high) {
        if l.operator != h.operator || l.value1 != h.value1 {
            return nearer.to_vec();
        }
        let scaled = match decode(l) {
            // Plain comparator leaves scale their threshold; function
            // leaves, scope markers, and structural operators carry over.
            Ok(Decoded::Leaf(req)) if req.function_ref.is_none() => Criterion {
                value2: bracket.scale(l.value2, h.value2),
                ..l
            },
            Ok(_) => l,
            // Undecodable criteria are someone else's parse error; shape
            // matching is not the place to report it.
            Err(_) => return nearer.to_vec(),
        };
        result.push(scaled);
    }
    result
}
