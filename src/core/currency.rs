//! Currencies offered by the conversion form

use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayCurrency {
    Usd,
    Eur,
    Inr,
    Pkr,
    Gbp,
    Aud,
    Cad,
    Jpy,
    Cny,
    Aed,
}

impl DisplayCurrency {
    pub const ALL: [DisplayCurrency; 10] = [
        DisplayCurrency::Usd,
        DisplayCurrency::Eur,
        DisplayCurrency::Inr,
        DisplayCurrency::Pkr,
        DisplayCurrency::Gbp,
        DisplayCurrency::Aud,
        DisplayCurrency::Cad,
        DisplayCurrency::Jpy,
        DisplayCurrency::Cny,
        DisplayCurrency::Aed,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DisplayCurrency::Usd => "USD",
            DisplayCurrency::Eur => "EUR",
            DisplayCurrency::Inr => "INR",
            DisplayCurrency::Pkr => "PKR",
            DisplayCurrency::Gbp => "GBP",
            DisplayCurrency::Aud => "AUD",
            DisplayCurrency::Cad => "CAD",
            DisplayCurrency::Jpy => "JPY",
            DisplayCurrency::Cny => "CNY",
            DisplayCurrency::Aed => "AED",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DisplayCurrency::Usd => "United States Dollar",
            DisplayCurrency::Eur => "Euro",
            DisplayCurrency::Inr => "Indian Rupee",
            DisplayCurrency::Pkr => "Pakistani Rupee",
            DisplayCurrency::Gbp => "British Pound",
            DisplayCurrency::Aud => "Australian Dollar",
            DisplayCurrency::Cad => "Canadian Dollar",
            DisplayCurrency::Jpy => "Japanese Yen",
            DisplayCurrency::Cny => "Chinese Yuan",
            DisplayCurrency::Aed => "United Arab Emirates Dirham",
        }
    }
}

impl Display for DisplayCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl FromStr for DisplayCurrency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        DisplayCurrency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| anyhow!("Unsupported display currency: {}", s))
    }
}
