use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Investment, InvestmentKind, InvestmentType};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be a date (YYYY-MM-DD), got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error("{0}")]
    Invalid(String),
}

/// Every editable input of the investment form, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
    PurchaseDate,
    Ticker,
    Shares,
    FundHouse,
    Units,
    Bank,
    InterestRate,
    MaturityDate,
    Issuer,
    CouponRate,
    Location,
    Currency,
}

impl FormField {
    pub fn from_name(name: &str) -> Result<Self, FormError> {
        let field = match name {
            "name" => FormField::Name,
            "amount" => FormField::Amount,
            "purchaseDate" => FormField::PurchaseDate,
            "ticker" => FormField::Ticker,
            "shares" => FormField::Shares,
            "fundHouse" => FormField::FundHouse,
            "units" => FormField::Units,
            "bank" => FormField::Bank,
            "interestRate" => FormField::InterestRate,
            "maturityDate" => FormField::MaturityDate,
            "issuer" => FormField::Issuer,
            "couponRate" => FormField::CouponRate,
            "location" => FormField::Location,
            "currency" => FormField::Currency,
            other => return Err(FormError::UnknownField(other.to_string())),
        };
        Ok(field)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Amount => "amount",
            FormField::PurchaseDate => "purchaseDate",
            FormField::Ticker => "ticker",
            FormField::Shares => "shares",
            FormField::FundHouse => "fundHouse",
            FormField::Units => "units",
            FormField::Bank => "bank",
            FormField::InterestRate => "interestRate",
            FormField::MaturityDate => "maturityDate",
            FormField::Issuer => "issuer",
            FormField::CouponRate => "couponRate",
            FormField::Location => "location",
            FormField::Currency => "currency",
        }
    }

    /// The variant-specific inputs shown for a given type, in display order.
    pub fn for_type(investment_type: InvestmentType) -> &'static [FormField] {
        match investment_type {
            InvestmentType::Stock => &[FormField::Ticker, FormField::Shares],
            InvestmentType::MutualFund => &[FormField::FundHouse, FormField::Units],
            InvestmentType::FixedDeposit => {
                &[FormField::Bank, FormField::InterestRate, FormField::MaturityDate]
            }
            InvestmentType::Bond => {
                &[FormField::Issuer, FormField::CouponRate, FormField::MaturityDate]
            }
            InvestmentType::Cash => &[FormField::Location, FormField::Currency],
        }
    }
}

// Raw text of every variant-specific input. A blank string means "not entered".
#[derive(Debug, Clone, Default, PartialEq)]
struct VariantFields {
    ticker: String,
    shares: String,
    fund_house: String,
    units: String,
    bank: String,
    interest_rate: String,
    maturity_date: String,
    issuer: String,
    coupon_rate: String,
    location: String,
    currency: String,
}

/// Editable state of the add/edit dialog. Holds the inputs of every variant as
/// text; it only becomes an [`Investment`] through [`InvestmentForm::submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentForm {
    editing_id: Option<String>,
    investment_type: InvestmentType,
    name: String,
    amount: String,
    purchase_date: String,
    fields: VariantFields,
}

impl InvestmentForm {
    /// Blank form for a new stock bought today.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing_id: None,
            investment_type: InvestmentType::Stock,
            name: String::new(),
            amount: String::new(),
            purchase_date: today.format(DATE_FORMAT).to_string(),
            fields: VariantFields::default(),
        }
    }

    /// Form pre-filled from an existing record.
    pub fn from_investment(investment: &Investment) -> Self {
        let mut fields = VariantFields::default();
        match &investment.kind {
            InvestmentKind::Stock { ticker, shares } => {
                fields.ticker = ticker.clone();
                fields.shares = shares.to_string();
            }
            InvestmentKind::MutualFund { fund_house, units } => {
                fields.fund_house = fund_house.clone();
                fields.units = units.to_string();
            }
            InvestmentKind::FixedDeposit {
                bank,
                interest_rate,
                maturity_date,
            } => {
                fields.bank = bank.clone();
                fields.interest_rate = interest_rate.to_string();
                fields.maturity_date = format_optional_date(maturity_date);
            }
            InvestmentKind::Bond {
                issuer,
                coupon_rate,
                maturity_date,
            } => {
                fields.issuer = issuer.clone();
                fields.coupon_rate = coupon_rate.to_string();
                fields.maturity_date = format_optional_date(maturity_date);
            }
            InvestmentKind::Cash { location, currency } => {
                fields.location = location.clone();
                fields.currency = currency.clone();
            }
        }

        Self {
            editing_id: Some(investment.id.clone()),
            investment_type: investment.investment_type(),
            name: investment.name.clone(),
            amount: investment.amount.to_string(),
            purchase_date: investment.purchase_date.format(DATE_FORMAT).to_string(),
            fields,
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn investment_type(&self) -> InvestmentType {
        self.investment_type
    }

    /// Switches the selected type. Inputs of the previous type are discarded;
    /// name, amount and purchase date stay.
    pub fn select_type(&mut self, investment_type: InvestmentType) {
        if investment_type == self.investment_type {
            return;
        }
        self.investment_type = investment_type;
        self.fields = VariantFields::default();
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Amount => &self.amount,
            FormField::PurchaseDate => &self.purchase_date,
            FormField::Ticker => &self.fields.ticker,
            FormField::Shares => &self.fields.shares,
            FormField::FundHouse => &self.fields.fund_house,
            FormField::Units => &self.fields.units,
            FormField::Bank => &self.fields.bank,
            FormField::InterestRate => &self.fields.interest_rate,
            FormField::MaturityDate => &self.fields.maturity_date,
            FormField::Issuer => &self.fields.issuer,
            FormField::CouponRate => &self.fields.coupon_rate,
            FormField::Location => &self.fields.location,
            FormField::Currency => &self.fields.currency,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Amount => &mut self.amount,
            FormField::PurchaseDate => &mut self.purchase_date,
            FormField::Ticker => &mut self.fields.ticker,
            FormField::Shares => &mut self.fields.shares,
            FormField::FundHouse => &mut self.fields.fund_house,
            FormField::Units => &mut self.fields.units,
            FormField::Bank => &mut self.fields.bank,
            FormField::InterestRate => &mut self.fields.interest_rate,
            FormField::MaturityDate => &mut self.fields.maturity_date,
            FormField::Issuer => &mut self.fields.issuer,
            FormField::CouponRate => &mut self.fields.coupon_rate,
            FormField::Location => &mut self.fields.location,
            FormField::Currency => &mut self.fields.currency,
        };
        *slot = value;
    }

    /// Checks the required inputs of the selected type and builds the record.
    /// The id is the edited record's id, or empty for a new one.
    pub fn submit(&self) -> Result<Investment, FormError> {
        let name = required_text(FormField::Name, &self.name)?;
        let amount = required_number(FormField::Amount, &self.amount)?;
        let purchase_date = required_date(FormField::PurchaseDate, &self.purchase_date)?;

        let f = &self.fields;
        let kind = match self.investment_type {
            InvestmentType::Stock => InvestmentKind::Stock {
                ticker: required_text(FormField::Ticker, &f.ticker)?,
                shares: required_number(FormField::Shares, &f.shares)?,
            },
            InvestmentType::MutualFund => InvestmentKind::MutualFund {
                fund_house: required_text(FormField::FundHouse, &f.fund_house)?,
                units: required_number(FormField::Units, &f.units)?,
            },
            InvestmentType::FixedDeposit => InvestmentKind::FixedDeposit {
                bank: required_text(FormField::Bank, &f.bank)?,
                interest_rate: required_number(FormField::InterestRate, &f.interest_rate)?,
                maturity_date: optional_date(FormField::MaturityDate, &f.maturity_date)?,
            },
            InvestmentType::Bond => InvestmentKind::Bond {
                issuer: required_text(FormField::Issuer, &f.issuer)?,
                coupon_rate: required_number(FormField::CouponRate, &f.coupon_rate)?,
                maturity_date: optional_date(FormField::MaturityDate, &f.maturity_date)?,
            },
            InvestmentType::Cash => InvestmentKind::Cash {
                location: required_text(FormField::Location, &f.location)?,
                currency: required_text(FormField::Currency, &f.currency)?,
            },
        };

        let mut investment = Investment::new(name, amount, purchase_date, kind)
            .with_id(self.editing_id.clone().unwrap_or_default());
        investment.normalize();
        investment.validate().map_err(FormError::Invalid)?;
        Ok(investment)
    }
}

fn format_optional_date(date: &Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn required_text(field: FormField, raw: &str) -> Result<String, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field.name()));
    }
    Ok(value.to_string())
}

fn required_number(field: FormField, raw: &str) -> Result<f64, FormError> {
    let value = required_text(field, raw)?;
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(FormError::NotANumber {
            field: field.name(),
            value,
        }),
    }
}

fn required_date(field: FormField, raw: &str) -> Result<NaiveDate, FormError> {
    let value = required_text(field, raw)?;
    NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| FormError::InvalidDate {
        field: field.name(),
        value,
    })
}

fn optional_date(field: FormField, raw: &str) -> Result<Option<NaiveDate>, FormError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    required_date(field, raw).map(Some)
}
