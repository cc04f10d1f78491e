use std::collections::HashMap;

use crate::entities::{
    CargoBalance, GodownStockRow, KajliEntry, StockAdjustment, StockGrandTotal, StockSummary,
};
use crate::value_objects::CargoType;

/// One normalized movement against a godown/cargo bucket. Truck entries feed
/// positive deltas, adjustments feed signed deltas; both run through the same
/// fold.
#[derive(Debug, Clone, Copy)]
pub struct StockDelta {
    pub godown_number: u32,
    pub cargo_type: CargoType,
    pub bags: i64,
}

/// Folds movement deltas into per-godown balances over a fixed godown set.
///
/// Godowns outside the injected set never appear in output, even when events
/// reference them. Addition is commutative, so input order is irrelevant, and
/// balances are signed: nothing stops an over-correction from going negative.
#[derive(Debug, Clone)]
pub struct StockLedger {
    godowns: Vec<u32>,
    mass_per_bag: f64,
}

impl StockLedger {
    pub fn new(mut godowns: Vec<u32>, mass_per_bag: f64) -> Self {
        godowns.sort_unstable();
        godowns.dedup();
        Self {
            godowns,
            mass_per_bag,
        }
    }

    pub fn summarize<I>(&self, deltas: I) -> StockSummary
    where
        I: IntoIterator<Item = StockDelta>,
    {
        let mut buckets: HashMap<(u32, CargoType), i64> = HashMap::new();
        for number in &self.godowns {
            for cargo in CargoType::ALL {
                buckets.insert((*number, cargo), 0);
            }
        }

        for delta in deltas {
            if let Some(bags) = buckets.get_mut(&(delta.godown_number, delta.cargo_type)) {
                *bags += delta.bags;
            }
        }

        let mut rows = Vec::with_capacity(self.godowns.len());
        let mut grand = StockGrandTotal::default();
        let mut grand_bags: i64 = 0;
        for number in &self.godowns {
            let lsa = buckets[&(*number, CargoType::LSA)];
            let dsa = buckets[&(*number, CargoType::DSA)];
            let rbc = buckets[&(*number, CargoType::RBC)];
            let row_bags = lsa + dsa + rbc;

            rows.push(GodownStockRow {
                godown_number: *number,
                lsa: self.balance(lsa),
                dsa: self.balance(dsa),
                rbc: self.balance(rbc),
                total: self.balance(row_bags),
            });

            grand.lsa.bags += lsa;
            grand.dsa.bags += dsa;
            grand.rbc.bags += rbc;
            grand_bags += row_bags;
        }

        grand.lsa = self.balance(grand.lsa.bags);
        grand.dsa = self.balance(grand.dsa.bags);
        grand.rbc = self.balance(grand.rbc.bags);
        grand.total = self.balance(grand_bags);

        StockSummary {
            rows,
            grand_total: grand,
        }
    }

    fn balance(&self, bags: i64) -> CargoBalance {
        CargoBalance {
            bags,
            mt: round3(bags as f64 * self.mass_per_bag),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn entry_delta(entry: &KajliEntry) -> StockDelta {
    StockDelta {
        godown_number: entry.godown_number,
        cargo_type: entry.cargo_type,
        bags: i64::from(entry.bag_count),
    }
}

pub fn adjustment_delta(adjustment: &StockAdjustment) -> StockDelta {
    StockDelta {
        godown_number: adjustment.godown_number,
        cargo_type: adjustment.cargo_type,
        bags: adjustment.bag_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> StockLedger {
        StockLedger::new(vec![1, 2, 3], 0.05)
    }

    fn delta(godown: u32, cargo: CargoType, bags: i64) -> StockDelta {
        StockDelta {
            godown_number: godown,
            cargo_type: cargo,
            bags,
        }
    }

    #[test]
    fn empty_logs_yield_zero_rows_for_every_godown() {
        let summary = ledger().summarize(Vec::new());
        assert_eq!(summary.rows.len(), 3);
        for row in &summary.rows {
            assert_eq!(row.lsa, CargoBalance { bags: 0, mt: 0.0 });
            assert_eq!(row.dsa, CargoBalance { bags: 0, mt: 0.0 });
            assert_eq!(row.rbc, CargoBalance { bags: 0, mt: 0.0 });
            assert_eq!(row.total, CargoBalance { bags: 0, mt: 0.0 });
        }
        assert_eq!(summary.grand_total.total.bags, 0);
    }

    #[test]
    fn rows_come_back_sorted_by_godown_number() {
        let ledger = StockLedger::new(vec![7, 2, 5, 2], 0.05);
        let summary = ledger.summarize(Vec::new());
        let numbers: Vec<u32> = summary.rows.iter().map(|r| r.godown_number).collect();
        assert_eq!(numbers, vec![2, 5, 7]);
    }

    #[test]
    fn unknown_godowns_never_appear_in_output() {
        let summary = ledger().summarize(vec![delta(99, CargoType::LSA, 500)]);
        assert!(summary.rows.iter().all(|r| r.godown_number != 99));
        assert_eq!(summary.grand_total.total.bags, 0);
    }

    #[test]
    fn aggregation_is_commutative() {
        let deltas = vec![
            delta(1, CargoType::LSA, 40),
            delta(2, CargoType::DSA, 15),
            delta(1, CargoType::LSA, -10),
            delta(3, CargoType::RBC, 7),
            delta(2, CargoType::DSA, 5),
        ];
        let forward = ledger().summarize(deltas.clone());
        let mut reversed = deltas;
        reversed.reverse();
        let backward = ledger().summarize(reversed);
        assert_eq!(forward.rows, backward.rows);
        assert_eq!(forward.grand_total, backward.grand_total);
    }

    #[test]
    fn opposite_adjustments_restore_the_prior_balance() {
        let base = vec![delta(2, CargoType::RBC, 120)];
        let before = ledger().summarize(base.clone());

        let mut churned = base;
        churned.push(delta(2, CargoType::RBC, 50));
        churned.push(delta(2, CargoType::RBC, -50));
        let after = ledger().summarize(churned);

        assert_eq!(before.rows, after.rows);
    }

    #[test]
    fn entry_minus_adjustment_scenario() {
        // 40 LSA bags delivered to godown 3, 10 corrected away.
        let summary = ledger().summarize(vec![
            delta(3, CargoType::LSA, 40),
            delta(3, CargoType::LSA, -10),
        ]);
        let row = summary
            .rows
            .iter()
            .find(|r| r.godown_number == 3)
            .expect("godown 3 row");
        assert_eq!(row.lsa.bags, 30);
        assert_eq!(row.lsa.mt, 1.5);
        assert_eq!(row.total.bags, 30);
        assert_eq!(summary.grand_total.lsa.bags, 30);
        assert_eq!(summary.grand_total.lsa.mt, 1.5);
    }

    #[test]
    fn mass_is_rounded_to_three_decimals() {
        let ledger = StockLedger::new(vec![1], 0.0333);
        let summary = ledger.summarize(vec![delta(1, CargoType::DSA, 7)]);
        // 7 * 0.0333 = 0.2331
        assert_eq!(summary.rows[0].dsa.mt, 0.233);
    }

    #[test]
    fn balances_may_go_negative() {
        let summary = ledger().summarize(vec![delta(1, CargoType::LSA, -25)]);
        let row = &summary.rows[0];
        assert_eq!(row.lsa.bags, -25);
        assert_eq!(row.lsa.mt, -1.25);
        assert_eq!(summary.grand_total.total.bags, -25);
    }
}
