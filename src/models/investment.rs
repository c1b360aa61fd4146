use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The five kinds of holding the tracker knows about. Serialized with the
/// labels used in the `type` field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentType {
    Stock,
    #[serde(rename = "Mutual Fund")]
    MutualFund,
    #[serde(rename = "Fixed Deposit")]
    FixedDeposit,
    Bond,
    Cash,
}

impl InvestmentType {
    pub const ALL: [InvestmentType; 5] = [
        InvestmentType::Stock,
        InvestmentType::MutualFund,
        InvestmentType::FixedDeposit,
        InvestmentType::Bond,
        InvestmentType::Cash,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InvestmentType::Stock => "Stock",
            InvestmentType::MutualFund => "Mutual Fund",
            InvestmentType::FixedDeposit => "Fixed Deposit",
            InvestmentType::Bond => "Bond",
            InvestmentType::Cash => "Cash",
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for InvestmentType {
    type Err = String;

    // Accepts the wire label as well as the compact spelling used on the
    // command line ("MutualFund", "fixed-deposit", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "stock" => Ok(InvestmentType::Stock),
            "mutualfund" => Ok(InvestmentType::MutualFund),
            "fixeddeposit" | "fd" => Ok(InvestmentType::FixedDeposit),
            "bond" => Ok(InvestmentType::Bond),
            "cash" => Ok(InvestmentType::Cash),
            _ => Err(format!("Unknown investment type: {}", s)),
        }
    }
}

/// Variant-specific part of a record. Flattened into [`Investment`] so the
/// `type` tag sits next to the common fields on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InvestmentKind {
    #[serde(rename_all = "camelCase")]
    Stock { ticker: String, shares: f64 },
    #[serde(rename = "Mutual Fund", rename_all = "camelCase")]
    MutualFund { fund_house: String, units: f64 },
    #[serde(rename = "Fixed Deposit", rename_all = "camelCase")]
    FixedDeposit {
        bank: String,
        interest_rate: f64,
        #[serde(
            default,
            with = "optional_date",
            skip_serializing_if = "Option::is_none"
        )]
        maturity_date: Option<NaiveDate>,
    },
    #[serde(rename_all = "camelCase")]
    Bond {
        issuer: String,
        coupon_rate: f64,
        #[serde(
            default,
            with = "optional_date",
            skip_serializing_if = "Option::is_none"
        )]
        maturity_date: Option<NaiveDate>,
    },
    #[serde(rename_all = "camelCase")]
    Cash { location: String, currency: String },
}

impl InvestmentKind {
    pub fn investment_type(&self) -> InvestmentType {
        match self {
            InvestmentKind::Stock { .. } => InvestmentType::Stock,
            InvestmentKind::MutualFund { .. } => InvestmentType::MutualFund,
            InvestmentKind::FixedDeposit { .. } => InvestmentType::FixedDeposit,
            InvestmentKind::Bond { .. } => InvestmentType::Bond,
            InvestmentKind::Cash { .. } => InvestmentType::Cash,
        }
    }
}

// A single holding. `id` may be empty on records that have not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub purchase_date: NaiveDate,
    #[serde(flatten)]
    pub kind: InvestmentKind,
}

impl Investment {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        purchase_date: NaiveDate,
        kind: InvestmentKind,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            amount,
            purchase_date,
            kind,
        }
    }

    pub fn investment_type(&self) -> InvestmentType {
        self.kind.investment_type()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Trims free text and upper-cases symbol-like fields.
    pub fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        match &mut self.kind {
            InvestmentKind::Stock { ticker, .. } => {
                *ticker = ticker.trim().to_uppercase();
            }
            InvestmentKind::MutualFund { fund_house, .. } => {
                *fund_house = fund_house.trim().to_string();
            }
            InvestmentKind::FixedDeposit { bank, .. } => {
                *bank = bank.trim().to_string();
            }
            InvestmentKind::Bond { issuer, .. } => {
                *issuer = issuer.trim().to_string();
            }
            InvestmentKind::Cash { location, currency } => {
                *location = location.trim().to_string();
                *currency = currency.trim().to_uppercase();
            }
        }
    }

    /// Checks the value constraints of the record. Returns a message suitable
    /// for showing to the user on the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Investment name cannot be empty".into());
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err("Amount must be a non-negative number".into());
        }

        match &self.kind {
            InvestmentKind::Stock { ticker, shares } => {
                require_text("Ticker", ticker)?;
                require_positive("Shares", *shares)?;
            }
            InvestmentKind::MutualFund { fund_house, units } => {
                require_text("Fund house", fund_house)?;
                require_positive("Units", *units)?;
            }
            InvestmentKind::FixedDeposit {
                bank,
                interest_rate,
                maturity_date,
            } => {
                require_text("Bank", bank)?;
                require_finite("Interest rate", *interest_rate)?;
                if let Some(maturity) = maturity_date {
                    if *maturity < self.purchase_date {
                        return Err("Maturity date cannot be before the purchase date".into());
                    }
                }
            }
            InvestmentKind::Bond {
                issuer,
                coupon_rate,
                ..
            } => {
                require_text("Issuer", issuer)?;
                require_finite("Coupon rate", *coupon_rate)?;
            }
            InvestmentKind::Cash { location, currency } => {
                require_text("Location", location)?;
                require_text("Currency", currency)?;
            }
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a number", field));
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be a positive number", field));
    }
    Ok(())
}

/// Optional `YYYY-MM-DD` date where a missing value, `null` and `""` all mean
/// "not set".
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_stock_serializes_flat_with_type_tag() {
        let stock = Investment::new(
            "Reliance Industries",
            150000.0,
            date("2023-01-15"),
            InvestmentKind::Stock {
                ticker: "RELIANCE".into(),
                shares: 50.0,
            },
        )
        .with_id("1");

        let value = serde_json::to_value(&stock).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "1",
                "type": "Stock",
                "name": "Reliance Industries",
                "ticker": "RELIANCE",
                "amount": 150000.0,
                "purchaseDate": "2023-01-15",
                "shares": 50.0
            })
        );
    }

    #[test]
    fn test_multi_word_tags_use_wire_labels() {
        let fund: Investment = serde_json::from_value(json!({
            "id": "2",
            "type": "Mutual Fund",
            "name": "SBI Bluechip Fund",
            "fundHouse": "SBI",
            "amount": 250000,
            "purchaseDate": "2022-11-20",
            "units": 1000
        }))
        .unwrap();

        assert_eq!(fund.investment_type(), InvestmentType::MutualFund);
        assert_eq!(
            fund.kind,
            InvestmentKind::MutualFund {
                fund_house: "SBI".into(),
                units: 1000.0
            }
        );
    }

    #[test]
    fn test_empty_maturity_date_reads_as_none_and_is_omitted() {
        let fd: Investment = serde_json::from_value(json!({
            "id": "3",
            "type": "Fixed Deposit",
            "name": "HDFC FD",
            "bank": "HDFC Bank",
            "amount": 500000,
            "purchaseDate": "2023-03-10",
            "interestRate": 7.5,
            "maturityDate": ""
        }))
        .unwrap();

        match &fd.kind {
            InvestmentKind::FixedDeposit { maturity_date, .. } => assert!(maturity_date.is_none()),
            other => panic!("unexpected kind {:?}", other),
        }
        let value = serde_json::to_value(&fd).unwrap();
        assert!(value.get("maturityDate").is_none());
    }

    #[test]
    fn test_fields_of_other_variants_are_dropped() {
        let cash: Investment = serde_json::from_value(json!({
            "type": "Cash",
            "name": "Emergency Fund",
            "amount": 50000,
            "purchaseDate": "2023-01-01",
            "location": "Savings Account",
            "currency": "INR",
            "ticker": "SHOULD-NOT-STICK"
        }))
        .unwrap();

        assert_eq!(cash.id, "");
        let value = serde_json::to_value(&cash).unwrap();
        assert!(value.get("ticker").is_none());
    }

    #[test]
    fn test_missing_variant_field_is_rejected() {
        let result: Result<Investment, _> = serde_json::from_value(json!({
            "type": "Stock",
            "name": "No shares",
            "amount": 10,
            "purchaseDate": "2023-01-01",
            "ticker": "ABC"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_type_from_str_accepts_labels_and_compact_forms() {
        assert_eq!("Mutual Fund".parse::<InvestmentType>().unwrap(), InvestmentType::MutualFund);
        assert_eq!("fixed-deposit".parse::<InvestmentType>().unwrap(), InvestmentType::FixedDeposit);
        assert_eq!("FD".parse::<InvestmentType>().unwrap(), InvestmentType::FixedDeposit);
        assert!("crypto".parse::<InvestmentType>().is_err());
    }

    #[test]
    fn test_normalize_trims_and_uppercases() {
        let mut inv = Investment::new(
            "  Wallet ",
            10.0,
            date("2023-01-01"),
            InvestmentKind::Cash {
                location: " Drawer ".into(),
                currency: " usd".into(),
            },
        );
        inv.normalize();

        assert_eq!(inv.name, "Wallet");
        assert_eq!(
            inv.kind,
            InvestmentKind::Cash {
                location: "Drawer".into(),
                currency: "USD".into()
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = |kind| Investment::new("X", 100.0, date("2023-01-01"), kind);

        let negative_shares = base(InvestmentKind::Stock {
            ticker: "ABC".into(),
            shares: -1.0,
        });
        assert!(negative_shares.validate().is_err());

        let mut negative_amount = base(InvestmentKind::Cash {
            location: "Bank".into(),
            currency: "INR".into(),
        });
        negative_amount.amount = -5.0;
        assert!(negative_amount.validate().is_err());

        let early_maturity = base(InvestmentKind::FixedDeposit {
            bank: "HDFC".into(),
            interest_rate: 7.0,
            maturity_date: Some(date("2022-12-31")),
        });
        assert_eq!(
            early_maturity.validate().unwrap_err(),
            "Maturity date cannot be before the purchase date"
        );

        let ok_bond = base(InvestmentKind::Bond {
            issuer: "Govt".into(),
            coupon_rate: 7.5,
            maturity_date: None,
        });
        assert!(ok_bond.validate().is_ok());
    }
}
