use serde::Serialize;

use super::{Investment, InvestmentType};

/// One slice of the allocation breakdown: the summed amount of all holdings
/// of a single type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    #[serde(rename = "name")]
    pub investment_type: InvestmentType,
    pub value: f64,
}

/// Per-type totals in order of first appearance in the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Allocation {
    pub slices: Vec<AllocationSlice>,
}

impl Allocation {
    pub fn from_investments(investments: &[Investment]) -> Self {
        let mut slices: Vec<AllocationSlice> = Vec::new();
        for inv in investments {
            let investment_type = inv.investment_type();
            match slices.iter_mut().find(|s| s.investment_type == investment_type) {
                Some(slice) => slice.value += inv.amount,
                None => slices.push(AllocationSlice {
                    investment_type,
                    value: inv.amount,
                }),
            }
        }
        Self { slices }
    }

    pub fn get(&self, investment_type: InvestmentType) -> Option<f64> {
        self.slices
            .iter()
            .find(|s| s.investment_type == investment_type)
            .map(|s| s.value)
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of the total held in the given slice, in percent. Zero when the
    /// whole collection is worth nothing.
    pub fn percentage(&self, slice: &AllocationSlice) -> f64 {
        let total = self.total();
        if total == 0.0 {
            return 0.0;
        }
        slice.value / total * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

pub fn total_value(investments: &[Investment]) -> f64 {
    investments.iter().map(|inv| inv.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentKind;
    use chrono::NaiveDate;

    fn holding(kind: InvestmentKind, amount: f64) -> Investment {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Investment::new("h", amount, date, kind)
    }

    fn stock(amount: f64) -> Investment {
        holding(
            InvestmentKind::Stock {
                ticker: "ABC".into(),
                shares: 1.0,
            },
            amount,
        )
    }

    fn cash(amount: f64) -> Investment {
        holding(
            InvestmentKind::Cash {
                location: "Bank".into(),
                currency: "INR".into(),
            },
            amount,
        )
    }

    #[test]
    fn test_allocation_groups_by_type_in_first_seen_order() {
        let investments = vec![stock(100.0), cash(50.0), stock(25.0)];
        let allocation = Allocation::from_investments(&investments);

        assert_eq!(
            allocation.slices,
            vec![
                AllocationSlice { investment_type: InvestmentType::Stock, value: 125.0 },
                AllocationSlice { investment_type: InvestmentType::Cash, value: 50.0 },
            ]
        );
        assert_eq!(allocation.get(InvestmentType::Bond), None);
    }

    #[test]
    fn test_allocation_serializes_as_name_value_pairs() {
        let allocation = Allocation::from_investments(&[cash(10.0)]);
        let value = serde_json::to_value(&allocation).unwrap();
        assert_eq!(value, serde_json::json!([{ "name": "Cash", "value": 10.0 }]));
    }

    #[test]
    fn test_total_value_and_percentages() {
        let investments = vec![stock(300.0), cash(100.0)];
        assert_eq!(total_value(&investments), 400.0);

        let allocation = Allocation::from_investments(&investments);
        assert_eq!(allocation.total(), 400.0);
        assert!((allocation.percentage(&allocation.slices[0]) - 75.0).abs() < 1e-9);

        let empty = Allocation::from_investments(&[]);
        assert!(empty.is_empty());
        assert_eq!(total_value(&[]), 0.0);
    }
}
