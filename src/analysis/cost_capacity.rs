//! Price, capacity and utilisation averages per capacity cohort

use super::capacity::CapacityIndex;
use crate::types::{AskQuote, CohortSide, CostCapacitySegment};
use crate::utils::currency::to_tokens;
use crate::utils::math::{mean, safe_ratio};
use bigdecimal::BigDecimal;
use std::collections::BTreeSet;

pub struct CostCapacitySegmenter;

impl CostCapacitySegmenter {
    /// Summarise the participants on `side` of `threshold_gb` pledged capacity.
    ///
    /// - price: mean ask price (whole tokens) over asks sent by cohort members
    /// - capacity: mean pledged GB of cohort members
    /// - utilization: mean committed/pledged ratio over members that committed
    pub fn segment(
        side: CohortSide,
        threshold_gb: &BigDecimal,
        capacities: &CapacityIndex,
        asks: &[AskQuote],
        token_decimals: u32,
    ) -> CostCapacitySegment {
        let members: Vec<(&String, &BigDecimal)> = capacities
            .pledged()
            .iter()
            .filter(|(_, gb)| side.contains(gb, threshold_gb))
            .collect();
        if members.is_empty() {
            return CostCapacitySegment::empty();
        }

        let addresses: BTreeSet<&str> = members.iter().map(|(a, _)| a.as_str()).collect();
        let prices: Vec<BigDecimal> = asks
            .iter()
            .filter(|ask| addresses.contains(ask.from_address.as_str()))
            .map(|ask| to_tokens(&ask.price, token_decimals))
            .collect();

        let ratios: Vec<BigDecimal> = members
            .iter()
            .filter_map(|(address, pledged)| {
                capacities
                    .committed()
                    .get(*address)
                    .map(|committed| safe_ratio(committed, pledged))
            })
            .collect();

        CostCapacitySegment {
            count: members.len() as u64,
            average_storage_price: mean(&prices),
            average_capacity_gb: mean(members.iter().map(|(_, gb)| *gb)),
            utilization: mean(&ratios),
        }
    }
}
