//! Portfolio search: prefilter the catalog, then try every card subset up to
//! the configured size.
//!
//! Prefiltering keeps the top `max_cards_to_consider` cards by their solo
//! approximate score. A card that scores poorly alone but complements others
//! well can be dropped, so with a limit in place the result is the best
//! portfolio among the candidates, not necessarily among the whole catalog.

use crate::card::{Card, Rebate};
use crate::error::EngineError;
use crate::evaluator::{evaluate_portfolio, Evaluation};
use crate::scoring::approximate_card_value;
use crate::spending::SpendingProfile;
use crate::usage::RebateUsage;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_CARDS_TO_CONSIDER: usize = 16;
pub const DEFAULT_MAX_PORTFOLIO_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Prefilter limit. `None` searches the whole catalog.
    pub max_cards_to_consider: Option<usize>,
    /// Largest portfolio to enumerate. `None` allows every candidate at once.
    pub max_portfolio_size: Option<usize>,
    /// When false, flat rebates earn nothing. Category rebates still apply.
    pub include_rebates: bool,
    /// Reserved: cards carry no separate offer data yet.
    pub include_offers: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_cards_to_consider: Some(DEFAULT_MAX_CARDS_TO_CONSIDER),
            max_portfolio_size: Some(DEFAULT_MAX_PORTFOLIO_SIZE),
            include_rebates: true,
            include_offers: true,
        }
    }
}

impl SearchConfig {
    /// Reject limits that could only ever produce an empty result.
    pub fn validate(&self, catalog_len: usize) -> Result<(), EngineError> {
        if catalog_len == 0 {
            return Err(EngineError::EmptyCatalog);
        }
        if self.max_portfolio_size == Some(0) {
            return Err(EngineError::InvalidPortfolioSize);
        }
        if self.max_cards_to_consider == Some(0) {
            return Err(EngineError::InvalidCandidateLimit);
        }
        Ok(())
    }
}

/// Winning portfolio plus bookkeeping about the search itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Card names in candidate order.
    pub portfolio: Vec<String>,
    pub evaluation: Evaluation,
    pub candidates_considered: usize,
    pub portfolios_evaluated: usize,
    /// Wall-clock time, informational only.
    pub elapsed: Duration,
}

/// Lexicographic `r`-combinations of `0..n`, generated lazily.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            indices: (0..r).collect(),
            started: false,
            done: r > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let r = self.indices.len();
        // Rightmost position that can still move forward.
        let Some(i) = (0..r).rev().find(|&i| self.indices[i] < self.n - r + i) else {
            self.done = true;
            return None;
        };
        self.indices[i] += 1;
        for j in i + 1..r {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

/// Cards the search will enumerate over.
///
/// Below the limit (or with no limit) this is the catalog in its own order.
/// Above it, cards are ranked by approximate value, highest first, with ties
/// kept in catalog order, and truncated to the limit.
pub fn prefilter<'a>(
    catalog: &'a [Card],
    spending: &SpendingProfile,
    config: &SearchConfig,
) -> Vec<&'a Card> {
    let Some(limit) = config.max_cards_to_consider.filter(|&l| catalog.len() > l) else {
        return catalog.iter().collect();
    };

    let mut scored: Vec<(&Card, f64)> = catalog
        .iter()
        .map(|c| {
            let score = approximate_card_value(c, spending, config.include_rebates, config.include_offers);
            (c, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (card, score) in scored.iter().skip(limit) {
        tracing::debug!(card = %card.name, score, "prefilter dropped card");
    }

    scored.into_iter().take(limit).map(|(c, _)| c).collect()
}

/// Usage state that switches off every flat rebate on `cards`.
pub fn flat_rebates_disabled(cards: &[&Card]) -> RebateUsage {
    let mut usage = RebateUsage::new();
    for card in cards {
        for (index, rebate) in card.rebates.iter().enumerate() {
            if let Rebate::Flat { .. } = rebate {
                usage.set(card.name.clone(), index, false);
            }
        }
    }
    usage
}

/// Find the portfolio with the highest net value.
///
/// Subsets are visited by size, then lexicographically over the candidate
/// order; a later subset only replaces the current best on a strictly higher
/// net value.
pub fn find_best_portfolio(
    catalog: &[Card],
    spending: &SpendingProfile,
    usage: &RebateUsage,
    config: &SearchConfig,
) -> Result<SearchOutcome, EngineError> {
    config.validate(catalog.len())?;
    let start = Instant::now();

    let candidates = prefilter(catalog, spending, config);
    let disabled;
    let usage = if config.include_rebates {
        usage
    } else {
        disabled = flat_rebates_disabled(&candidates);
        &disabled
    };

    let max_r = config
        .max_portfolio_size
        .map_or(candidates.len(), |m| m.min(candidates.len()));

    let mut best: Option<(Vec<usize>, Evaluation)> = None;
    let mut evaluated = 0usize;
    let mut subset: Vec<&Card> = Vec::with_capacity(max_r);

    for r in 1..=max_r {
        for combo in Combinations::new(candidates.len(), r) {
            subset.clear();
            subset.extend(combo.iter().map(|&i| candidates[i]));
            let eval = evaluate_portfolio(&subset, spending, usage);
            evaluated += 1;

            let improves = best
                .as_ref()
                .is_none_or(|(_, current)| eval.net_value > current.net_value);
            if improves {
                tracing::debug!(size = r, net_value = eval.net_value, "new best portfolio");
                best = Some((combo, eval));
            }
        }
    }

    // validate() guarantees at least one candidate and max_r >= 1.
    let (indices, evaluation) = best.ok_or(EngineError::EmptyCatalog)?;
    let portfolio: Vec<String> = indices.iter().map(|&i| candidates[i].name.clone()).collect();
    let elapsed = start.elapsed();

    tracing::info!(
        candidates = candidates.len(),
        portfolios = evaluated,
        net_value = evaluation.net_value,
        elapsed_ms = elapsed.as_millis() as u64,
        "portfolio search finished"
    );

    Ok(SearchOutcome {
        portfolio,
        evaluation,
        candidates_considered: candidates.len(),
        portfolios_evaluated: evaluated,
        elapsed,
    })
}
