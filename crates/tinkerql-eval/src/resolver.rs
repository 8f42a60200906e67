//! Highest-usable-quality-level search over a variant family
//!
//! Orchestrates interpolation and evaluation across a set of same-named item
//! variants: partition by profession where the family calls for it, then
//! scan QL brackets from the top and binary-search inside the first bracket
//! the character can enter. "No usable variant" is an ordinary `None`
//! outcome, not an error.

use serde::Serialize;
use tinkerql_expr::{Comparator, Decoded, StructureError, build, decode};
use tinkerql_model::{InterpolatedItem, ItemVariant, PartitionRule, StatSnapshot};

use crate::context::ExternalResolver;
use crate::evaluator::evaluate;
use crate::interpolate::interpolate;

/// The best variant a character can use right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BestVariant {
    /// A database variant, returned unmodified
    Exact(ItemVariant),
    /// A computed variant between two database QLs; stats are estimates
    Interpolated(InterpolatedItem),
}

impl BestVariant {
    pub fn quality_level(&self) -> i32 {
        match self {
            Self::Exact(variant) => variant.quality_level,
            Self::Interpolated(item) => item.variant.quality_level,
        }
    }

    pub fn variant(&self) -> &ItemVariant {
        match self {
            Self::Exact(variant) => variant,
            Self::Interpolated(item) => &item.variant,
        }
    }
}

/// Find the highest quality level of `variants` (one item family, same
/// display name) the character can use.
///
/// `profession` and `partition_rule` select the sub-family for
/// profession-partitioned families; both may be absent. Returns
/// `Ok(None)` when no variant is usable. Malformed criteria surface as
/// [`StructureError`].
pub async fn find_best_variant(
    variants: &[ItemVariant],
    self_snapshot: &StatSnapshot,
    profession: Option<i32>,
    partition_rule: Option<&PartitionRule>,
    resolver: &dyn ExternalResolver,
) -> Result<Option<BestVariant>, StructureError> {
    let family: Vec<&ItemVariant> = match partition_rule {
        Some(rule) => partition(variants, rule, profession),
        None => variants.iter().collect(),
    };
    if family.is_empty() {
        return Ok(None);
    }

    if family.len() == 1 {
        let variant = family[0];
        return Ok(if usable(variant, self_snapshot, resolver).await? {
            Some(BestVariant::Exact(variant.clone()))
        } else {
            None
        });
    }

    let mut sorted = family;
    sorted.sort_by_key(|variant| variant.quality_level);

    // Scan brackets of adjacent variants from the top. Each bracket's low
    // end becomes the next bracket's high end, so `high_settled` carries
    // whether the current high end is already known unusable; a duplicate-QL
    // skip leaves it unevaluated.
    let mut high_settled = false;
    for i in (0..sorted.len() - 1).rev() {
        let (low, high) = (sorted[i], sorted[i + 1]);
        if !high_settled {
            if usable(high, self_snapshot, resolver).await? {
                return Ok(Some(BestVariant::Exact(high.clone())));
            }
            high_settled = true;
        }
        if low.quality_level >= high.quality_level {
            // Duplicate QLs cannot form a bracket.
            high_settled = false;
            continue;
        }
        if !usable(low, self_snapshot, resolver).await? {
            continue;
        }

        // Low end usable, high end not: binary-search the highest usable QL.
        // Requirements grow with QL, so usability is monotone in the bracket.
        let mut met_ql = low.quality_level;
        let mut unmet_ql = high.quality_level;
        let mut best = None;
        while unmet_ql - met_ql > 1 {
            let mid_ql = met_ql + (unmet_ql - met_ql) / 2;
            match interpolate(low, high, mid_ql) {
                Ok(item) => {
                    if usable(&item.variant, self_snapshot, resolver).await? {
                        met_ql = mid_ql;
                        best = Some(item);
                    } else {
                        unmet_ql = mid_ql;
                    }
                }
                // Midpoints stay in range by construction; only a mismatched
                // family name can fail here, and it fails at every midpoint.
                Err(_) => unmet_ql = mid_ql,
            }
        }

        return Ok(Some(match best {
            Some(item) => BestVariant::Interpolated(item),
            None => BestVariant::Exact(low.clone()),
        }));
    }

    // No bracket usable: the lowest variant, unmodified, is the last resort.
    let lowest = sorted[0];
    Ok(if usable(lowest, self_snapshot, resolver).await? {
        Some(BestVariant::Exact(lowest.clone()))
    } else {
        None
    })
}

/// Select the sub-family a character belongs to.
///
/// A variant's sub-family key is the value of its equality criterion on the
/// rule's stat; variants without one form the open sub-family. Falls back to
/// the rule's declared default key, then to the open sub-family.
fn partition<'a>(
    variants: &'a [ItemVariant],
    rule: &PartitionRule,
    profession: Option<i32>,
) -> Vec<&'a ItemVariant> {
    let keyed = |key: Option<i32>| -> Vec<&'a ItemVariant> {
        variants
            .iter()
            .filter(|variant| partition_key(variant, rule) == key)
            .collect()
    };

    if let Some(profession) = profession {
        let matching = keyed(Some(profession));
        if !matching.is_empty() {
            return matching;
        }
    }
    if let Some(fallback) = rule.fallback {
        let matching = keyed(Some(fallback));
        if !matching.is_empty() {
            return matching;
        }
    }
    keyed(None)
}

fn partition_key(variant: &ItemVariant, rule: &PartitionRule) -> Option<i32> {
    variant.criteria.iter().find_map(|&criterion| match decode(criterion) {
        Ok(Decoded::Leaf(req))
            if req.stat == rule.stat
                && req.comparator == Comparator::Equal
                && req.function_ref.is_none() =>
        {
            Some(req.value)
        }
        _ => None,
    })
}

async fn usable(
    variant: &ItemVariant,
    self_snapshot: &StatSnapshot,
    resolver: &dyn ExternalResolver,
) -> Result<bool, StructureError> {
    // An item with no requirements is usable by anyone.
    if variant.criteria.is_empty() {
        return Ok(true);
    }
    let tree = build(&variant.criteria)?;
    let evaluated = evaluate(&tree, self_snapshot, None, resolver).await;
    Ok(evaluated.is_usable())
}
