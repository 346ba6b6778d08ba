//! Block-production distribution snapshots and daily share evolution
//!
//! ## Distribution snapshot
//!
//! For each trailing interval (1, 7 and 30 days) the top 4 producers by
//! blocks in the window are reported with their exact share of the window's
//! blocks, plus an `Other` entry holding the remainder so shares sum to one.
//! A window without attributed blocks yields an empty category.
//!
//! ## Evolution
//!
//! The top 10 producers of the trailing 30 days each get one fixed label.
//! Every day on which any of them produced a block becomes one datapoint with
//! that producer's share of the day's blocks; all datapoints carry the same
//! label set (zero for an idle day). The series is left-padded with zero days
//! until it holds at least two points.

use crate::types::{CategoryDatapoint, DailyBlockCount, MinerBlockCount, OTHER_CATEGORY};
use crate::utils::math::share;
use crate::utils::time::SECONDS_PER_DAY;
use bigdecimal::{BigDecimal, One, Zero};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Trailing windows of the distribution snapshot, in days
pub const DISTRIBUTION_INTERVAL_DAYS: [i64; 3] = [1, 7, 30];

pub const DISTRIBUTION_TOP_N: usize = 4;

pub const EVOLUTION_TOP_N: usize = 10;

pub const EVOLUTION_WINDOW_DAYS: i64 = 30;

pub const MIN_EVOLUTION_POINTS: usize = 2;

/// A selected producer and the label it is reported under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledProducer {
    pub address: String,
    pub label: String,
    pub blocks: u64,
}

pub struct DistributionEvolutionComputer;

impl DistributionEvolutionComputer {
    /// Top `n` producers by blocks, ties broken by address
    pub fn top_producers(counts: &[MinerBlockCount], n: usize) -> Vec<MinerBlockCount> {
        let mut ranked: Vec<&MinerBlockCount> =
            counts.iter().filter(|c| !c.address.is_empty()).collect();
        ranked.sort_by(|a, b| {
            b.blocks_mined
                .cmp(&a.blocks_mined)
                .then_with(|| a.address.cmp(&b.address))
        });
        ranked.into_iter().take(n).cloned().collect()
    }

    /// Category name of a trailing interval: "1 day", "7 days", ...
    pub fn interval_label(days: i64) -> String {
        format!("{} day{}", days, if days > 1 { "s" } else { "" })
    }

    /// Assign display labels in rank order.
    ///
    /// A producer is labelled by its nickname, or its address when it has
    /// none. A nickname already taken (or equal to `Other`) gets the last four
    /// characters of the address appended; if that still collides the full
    /// address is used.
    pub fn assign_labels(
        producers: &[MinerBlockCount],
        nicknames: &[Option<String>],
    ) -> Vec<LabelledProducer> {
        let mut taken: HashSet<String> = HashSet::from([OTHER_CATEGORY.to_string()]);

        producers
            .iter()
            .zip(nicknames.iter().chain(std::iter::repeat(&None)))
            .map(|(producer, nickname)| {
                let label = match nickname.as_deref().filter(|n| !n.is_empty()) {
                    Some(nick) if !taken.contains(nick) => nick.to_string(),
                    Some(nick) => {
                        let suffixed = format!("{} ({})", nick, address_suffix(&producer.address));
                        if taken.contains(&suffixed) {
                            producer.address.clone()
                        } else {
                            suffixed
                        }
                    }
                    None => producer.address.clone(),
                };
                taken.insert(label.clone());
                LabelledProducer {
                    address: producer.address.clone(),
                    label,
                    blocks: producer.blocks_mined,
                }
            })
            .collect()
    }

    /// Share snapshot of one trailing window
    pub fn snapshot(
        category: String,
        producers: &[LabelledProducer],
        window_blocks: u64,
    ) -> CategoryDatapoint {
        if producers.is_empty() || window_blocks == 0 {
            return CategoryDatapoint {
                category,
                data: BTreeMap::new(),
            };
        }

        let mut data: BTreeMap<String, BigDecimal> = producers
            .iter()
            .map(|p| (p.label.clone(), share(p.blocks, window_blocks)))
            .collect();
        let top_total = data
            .values()
            .fold(BigDecimal::zero(), |acc, value| acc + value);
        data.insert(OTHER_CATEGORY.to_string(), BigDecimal::one() - top_total);

        CategoryDatapoint { category, data }
    }

    /// Daily share evolution of `producers`. `daily` must cover every block of
    /// the window (any address) so day totals are complete. `anchor_day` is
    /// the day a series without activity ends on.
    pub fn evolution(
        producers: &[LabelledProducer],
        daily: &[DailyBlockCount],
        anchor_day: i64,
    ) -> Vec<CategoryDatapoint> {
        let labels: HashMap<&str, &str> = producers
            .iter()
            .map(|p| (p.address.as_str(), p.label.as_str()))
            .collect();
        let zero_data = || -> BTreeMap<String, BigDecimal> {
            producers
                .iter()
                .map(|p| (p.label.clone(), BigDecimal::zero()))
                .collect()
        };

        let mut day_totals: BTreeMap<i64, u64> = BTreeMap::new();
        for row in daily {
            *day_totals.entry(row.day).or_default() += row.count;
        }

        let mut days: BTreeMap<i64, BTreeMap<String, BigDecimal>> = BTreeMap::new();
        for row in daily.iter().filter(|r| r.count > 0) {
            if let Some(label) = labels.get(row.address.as_str()) {
                let total = day_totals.get(&row.day).copied().unwrap_or(0);
                days.entry(row.day)
                    .or_insert_with(zero_data)
                    .insert(label.to_string(), share(row.count, total));
            }
        }

        let mut points: Vec<(i64, BTreeMap<String, BigDecimal>)> = days.into_iter().collect();
        if points.is_empty() {
            points.push((anchor_day, zero_data()));
        }
        while points.len() < MIN_EVOLUTION_POINTS {
            let first = points.first().map_or(anchor_day, |(day, _)| *day);
            points.insert(0, (first - SECONDS_PER_DAY, zero_data()));
        }

        points
            .into_iter()
            .map(|(day, data)| CategoryDatapoint {
                category: day.to_string(),
                data,
            })
            .collect()
    }
}

fn address_suffix(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    chars[chars.len().saturating_sub(4)..].iter().collect()
}
