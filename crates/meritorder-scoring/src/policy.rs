//! Final-score normalization policies.
//!
//! A policy turns one [`TeamLedger`] into a [`FinalScore`]. Policies that
//! rank teams against each other read the cohort-wide extremes from
//! [`CohortBounds`], which the aggregator computes once every ledger is
//! complete.

use meritorder_core::fixed::{self, Fixed128};
use meritorder_core::PlantCatalog;

use crate::config::{PolicyKind, ScoringConfig};
use crate::ledger::TeamLedger;
use crate::round::MinMax;
use crate::score::{FinalScore, Metric};

/// Extremes across all teams of the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CohortBounds {
    pub co2: MinMax<Fixed128>,
    pub profit: MinMax<Fixed128>,
}

impl CohortBounds {
    pub fn from_ledgers(ledgers: &[TeamLedger]) -> Self {
        Self {
            co2: MinMax::over(ledgers.iter().map(|l| l.total_co2)).unwrap_or_default(),
            profit: MinMax::over(ledgers.iter().map(|l| l.total_profit)).unwrap_or_default(),
        }
    }
}

pub trait ScoringPolicy: Send + Sync {
    fn kind(&self) -> PolicyKind;

    fn score_team(&self, ledger: &TeamLedger, cohort: &CohortBounds) -> FinalScore;
}

/// Build the policy selected by `config`.
pub fn policy_for(config: &ScoringConfig, catalog: &PlantCatalog) -> Box<dyn ScoringPolicy> {
    match config.policy {
        PolicyKind::Relative => Box::new(RelativePolicy::from_config(config)),
        PolicyKind::Absolute => Box::new(AbsolutePolicy::from_config(config, catalog)),
    }
}

fn thousand() -> Fixed128 {
    Fixed128::from_num(1000)
}

fn hundred() -> Fixed128 {
    Fixed128::from_num(100)
}

// ---------------------------------------------------------------------------
// Relative
// ---------------------------------------------------------------------------

/// Ranks ecology and finance min-max against the other teams.
#[derive(Debug, Clone, Copy)]
pub struct RelativePolicy {
    score_offset: Fixed128,
    popularity_per_unit: Fixed128,
}

impl RelativePolicy {
    pub fn new(score_offset: Fixed128, popularity_per_unit: Fixed128) -> Self {
        Self {
            score_offset,
            popularity_per_unit,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let t = config.tunables();
        Self::new(
            fixed::widen(t.score_offset),
            fixed::widen(t.popularity_per_unit),
        )
    }

    /// `1000 * share`, clamped to [0, 1000], then offset.
    fn scaled(&self, share: Fixed128) -> Fixed128 {
        fixed::clamp(share * thousand(), Fixed128::ZERO, thousand()) + self.score_offset
    }
}

impl ScoringPolicy for RelativePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Relative
    }

    fn score_team(&self, ledger: &TeamLedger, cohort: &CohortBounds) -> FinalScore {
        // All teams tied means everyone is best.
        let ecology = fixed::ratio_or_wide(
            cohort.co2.max - ledger.total_co2,
            cohort.co2.spread(),
            Fixed128::ONE,
        );
        let finance = fixed::ratio_or_wide(
            ledger.total_profit - cohort.profit.min,
            cohort.profit.spread(),
            Fixed128::ONE,
        );
        let stability =
            fixed::widen(ledger.mean_stability()) * Fixed128::from_num(10) + self.score_offset;
        let popularity = fixed::widen(ledger.mean_popularity()) * thousand()
            + fixed::widen(ledger.building_consumption) * self.popularity_per_unit
            + self.score_offset;

        FinalScore::new()
            .with(Metric::Ecology, self.scaled(ecology))
            .with(Metric::Finance, self.scaled(finance))
            .with(Metric::Stability, stability)
            .with(Metric::Popularity, popularity)
    }
}

// ---------------------------------------------------------------------------
// Absolute
// ---------------------------------------------------------------------------

/// Scores each team on its own against catalog-derived worst cases.
#[derive(Debug, Clone, Copy)]
pub struct AbsolutePolicy {
    balance_cutoff_percent: Fixed128,
    max_popularity_bound: Fixed128,
    max_price: Fixed128,
    max_co2_intensity: Fixed128,
}

impl AbsolutePolicy {
    pub fn new(
        balance_cutoff_percent: Fixed128,
        max_popularity_bound: Fixed128,
        catalog: &PlantCatalog,
    ) -> Self {
        Self {
            balance_cutoff_percent,
            max_popularity_bound,
            max_price: fixed::widen(catalog.max_price()),
            max_co2_intensity: fixed::widen(catalog.max_co2_intensity()),
        }
    }

    pub fn from_config(config: &ScoringConfig, catalog: &PlantCatalog) -> Self {
        let t = config.tunables();
        Self::new(
            fixed::widen(t.balance_cutoff_percent),
            fixed::widen(t.max_popularity_bound),
            catalog,
        )
    }

    /// `100 * (1 - value / (intensity * consumption))`, clamped to [0, 100].
    /// A zero bound means nothing could have been worse: 100.
    ///
    /// The bound itself is never formed; `value / consumption` is at most
    /// `intensity`, so both divisions stay small.
    fn against_bound(&self, value: Fixed128, intensity: Fixed128, consumption: Fixed128) -> Fixed128 {
        if intensity == Fixed128::ZERO || consumption == Fixed128::ZERO {
            return hundred();
        }
        let used = value / consumption / intensity;
        fixed::clamp(Fixed128::ONE - used, Fixed128::ZERO, Fixed128::ONE) * hundred()
    }

    /// Share of rounds in balance, in [0, 1]. A round inside the tolerance
    /// band earns part of its share in proportion to how close it came.
    pub fn balance(&self, ledger: &TeamLedger) -> Fixed128 {
        let n = ledger.rounds_played();
        if n == 0 {
            return Fixed128::ZERO;
        }
        let share = Fixed128::ONE / Fixed128::from_num(n);
        let cutoff = self.balance_cutoff_percent / hundred();
        let total = ledger.rounds.iter().fold(Fixed128::ZERO, |acc, round| {
            let diff = fixed::widen((round.consumption - round.production).abs());
            let tolerance = fixed::widen(round.consumption) * cutoff;
            let earned = if diff == Fixed128::ZERO {
                share
            } else if tolerance <= Fixed128::ZERO || diff > tolerance {
                Fixed128::ZERO
            } else {
                share * (Fixed128::ONE - diff / tolerance)
            };
            acc + earned
        });
        fixed::clamp(total, Fixed128::ZERO, Fixed128::ONE)
    }
}

impl ScoringPolicy for AbsolutePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Absolute
    }

    fn score_team(&self, ledger: &TeamLedger, _cohort: &CohortBounds) -> FinalScore {
        let ecology = self.against_bound(
            ledger.total_co2,
            self.max_co2_intensity,
            ledger.total_consumption,
        );
        let finance = self.against_bound(
            ledger.total_expense,
            self.max_price,
            ledger.total_consumption,
        );
        let balance = self.balance(ledger) * hundred();
        let popularity = fixed::clamp(
            fixed::ratio_or_wide(
                fixed::widen(ledger.building_consumption),
                self.max_popularity_bound,
                Fixed128::ZERO,
            ),
            Fixed128::ZERO,
            Fixed128::ONE,
        ) * hundred();
        let combined = (balance + finance + ecology + popularity * Fixed128::from_num(2))
            / Fixed128::from_num(5);

        FinalScore::new()
            .with(Metric::Ecology, ecology)
            .with(Metric::Finance, finance)
            .with(Metric::Balance, balance)
            .with(Metric::Popularity, popularity)
            .with(Metric::Combined, combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meritorder_core::TeamId;
    use meritorder_core::test_utils::*;

    use crate::ledger::RoundRecord;

    fn ledger(team: &str, co2: f64, profit: f64, building: f64) -> TeamLedger {
        let mut l = TeamLedger::new(TeamId::from(team), fixed(building));
        l.total_co2 = wide(co2);
        l.total_profit = wide(profit);
        l
    }

    fn with_rounds(mut l: TeamLedger, rounds: &[(f64, f64, f64, f64)]) -> TeamLedger {
        for &(consumption, production, stability, popularity) in rounds {
            l.total_consumption += wide(consumption);
            l.rounds.push(RoundRecord {
                consumption: fixed(consumption),
                production: fixed(production),
                blackout: false,
                stability: fixed(stability),
                popularity: fixed(popularity),
            });
        }
        l
    }

    fn relative() -> RelativePolicy {
        RelativePolicy::from_config(&ScoringConfig::default())
    }

    fn absolute() -> AbsolutePolicy {
        AbsolutePolicy::from_config(&ScoringConfig::default(), &PlantCatalog::standard())
    }

    #[test]
    fn relative_extremes_span_offset_band() {
        let ledgers = [ledger("A", 0.0, 500.0, 0.0), ledger("B", 100.0, -500.0, 0.0)];
        let cohort = CohortBounds::from_ledgers(&ledgers);
        let policy = relative();

        let a = policy.score_team(&ledgers[0], &cohort);
        let b = policy.score_team(&ledgers[1], &cohort);
        assert_eq!(a.get(Metric::Ecology), Some(1248.2));
        assert_eq!(a.get(Metric::Finance), Some(1248.2));
        assert_eq!(b.get(Metric::Ecology), Some(248.2));
        assert_eq!(b.get(Metric::Finance), Some(248.2));
    }

    #[test]
    fn relative_tie_scores_full_marks() {
        let ledgers = [ledger("A", 7.0, 10.0, 0.0), ledger("B", 7.0, 10.0, 0.0)];
        let cohort = CohortBounds::from_ledgers(&ledgers);
        let score = relative().score_team(&ledgers[0], &cohort);
        assert_eq!(score.get(Metric::Ecology), Some(1248.2));
        assert_eq!(score.get(Metric::Finance), Some(1248.2));
    }

    #[test]
    fn relative_stability_and_popularity() {
        let l = with_rounds(
            ledger("A", 0.0, 0.0, 500.0),
            &[(1000.0, 1000.0, 90.0, 0.5), (1000.0, 1000.0, 50.0, 0.25)],
        );
        let cohort = CohortBounds::from_ledgers(std::slice::from_ref(&l));
        let score = relative().score_team(&l, &cohort);
        // mean 70 -> 700 + 248.2
        assert_eq!(score.get(Metric::Stability), Some(948.2));
        // mean 0.375 -> 375, plus 500 * 0.5, plus 248.2
        assert_eq!(score.get(Metric::Popularity), Some(873.2));
        assert_eq!(score.get(Metric::Balance), None);
    }

    #[test]
    fn absolute_balance_partial_credit() {
        let policy = absolute();
        // Exact, 5% off (half credit at a 10% cutoff), 20% off (none).
        let l = with_rounds(
            ledger("A", 0.0, 0.0, 0.0),
            &[
                (1000.0, 1000.0, 0.0, 0.0),
                (1000.0, 950.0, 0.0, 0.0),
                (1000.0, 1200.0, 0.0, 0.0),
            ],
        );
        assert!((policy.balance(&l).to_num::<f64>() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn absolute_balance_zero_consumption() {
        let policy = absolute();
        let l = with_rounds(
            ledger("A", 0.0, 0.0, 0.0),
            &[(0.0, 0.0, 0.0, 0.0), (0.0, 10.0, 0.0, 0.0)],
        );
        assert!((policy.balance(&l).to_num::<f64>() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn absolute_metrics() {
        let mut l = with_rounds(
            ledger("A", 0.0, 0.0, 1500.0),
            &[(1000.0, 1000.0, 0.0, 0.0)],
        );
        // Worst case co2 = 1 * 1000, worst case expense = 132 * 1000.
        l.total_co2 = wide(250.0);
        l.total_expense = wide(66_000.0);
        let score = absolute().score_team(&l, &CohortBounds::default());

        assert_eq!(score.get(Metric::Ecology), Some(75.0));
        assert_eq!(score.get(Metric::Finance), Some(50.0));
        assert_eq!(score.get(Metric::Balance), Some(100.0));
        assert_eq!(score.get(Metric::Popularity), Some(100.0));
        // (100 + 50 + 75 + 200) / 5
        assert_eq!(score.get(Metric::Combined), Some(85.0));
        assert_eq!(score.get(Metric::Stability), None);
    }

    #[test]
    fn absolute_zero_bound_is_full_marks() {
        let catalog = {
            let mut b = PlantCatalog::builder();
            b.register(
                meritorder_core::PlantKind::Wind,
                meritorder_core::PlantSpec::new(0.0, 0.0, 7.3),
            );
            b.build().unwrap()
        };
        let policy = AbsolutePolicy::from_config(&ScoringConfig::default(), &catalog);
        let l = with_rounds(ledger("A", 0.0, 0.0, 0.0), &[(1000.0, 1000.0, 0.0, 0.0)]);
        let score = policy.score_team(&l, &CohortBounds::default());
        assert_eq!(score.get(Metric::Ecology), Some(100.0));
        assert_eq!(score.get(Metric::Finance), Some(100.0));
        assert_eq!(score.get(Metric::Popularity), Some(0.0));
    }

    #[test]
    fn policy_for_follows_config() {
        let catalog = PlantCatalog::standard();
        let config = ScoringConfig::default();
        assert_eq!(policy_for(&config, &catalog).kind(), PolicyKind::Relative);
        let config = config.with_policy(PolicyKind::Absolute);
        assert_eq!(policy_for(&config, &catalog).kind(), PolicyKind::Absolute);
    }
}
