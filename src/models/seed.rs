use chrono::NaiveDate;

use super::{Investment, InvestmentKind};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Example holdings written on first start, one of each type.
pub fn sample_investments() -> Vec<Investment> {
    vec![
        Investment::new(
            "Reliance Industries",
            150000.0,
            ymd(2023, 1, 15),
            InvestmentKind::Stock {
                ticker: "RELIANCE".into(),
                shares: 50.0,
            },
        )
        .with_id("1"),
        Investment::new(
            "SBI Bluechip Fund",
            250000.0,
            ymd(2022, 11, 20),
            InvestmentKind::MutualFund {
                fund_house: "SBI".into(),
                units: 1000.0,
            },
        )
        .with_id("2"),
        Investment::new(
            "HDFC FD",
            500000.0,
            ymd(2023, 3, 10),
            InvestmentKind::FixedDeposit {
                bank: "HDFC Bank".into(),
                interest_rate: 7.5,
                maturity_date: Some(ymd(2024, 3, 10)),
            },
        )
        .with_id("3"),
        Investment::new(
            "Government Bond 2030",
            100000.0,
            ymd(2023, 6, 1),
            InvestmentKind::Bond {
                issuer: "Government of India".into(),
                coupon_rate: 7.2,
                maturity_date: Some(ymd(2030, 6, 1)),
            },
        )
        .with_id("4"),
        Investment::new(
            "Emergency Fund",
            50000.0,
            ymd(2023, 1, 1),
            InvestmentKind::Cash {
                location: "Savings Account".into(),
                currency: "INR".into(),
            },
        )
        .with_id("5"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentType;

    #[test]
    fn test_sample_covers_every_type_once() {
        let samples = sample_investments();
        for investment_type in InvestmentType::ALL {
            assert_eq!(
                samples.iter().filter(|i| i.investment_type() == investment_type).count(),
                1
            );
        }
        assert!(samples.iter().all(|i| i.validate().is_ok()));
    }
}
