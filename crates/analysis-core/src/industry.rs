use crate::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Industry a business reports under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Manufacturing,
    Retail,
    #[default]
    Services,
    Agriculture,
    Logistics,
    Ecommerce,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Manufacturing,
        Industry::Retail,
        Industry::Services,
        Industry::Agriculture,
        Industry::Logistics,
        Industry::Ecommerce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Manufacturing => "manufacturing",
            Industry::Retail => "retail",
            Industry::Services => "services",
            Industry::Agriculture => "agriculture",
            Industry::Logistics => "logistics",
            Industry::Ecommerce => "ecommerce",
        }
    }

    /// Lenient lookup: unknown or missing tags fall back to services.
    pub fn resolve(tag: Option<&str>) -> Self {
        match tag.map(str::parse::<Industry>) {
            Some(Ok(industry)) => industry,
            Some(Err(e)) => {
                warn!("{}, falling back to {}", e, Industry::default());
                Industry::default()
            }
            None => Industry::default(),
        }
    }

    pub fn profile(&self) -> &'static IndustryProfile {
        match self {
            Industry::Manufacturing => &MANUFACTURING,
            Industry::Retail => &RETAIL,
            Industry::Services => &SERVICES,
            Industry::Agriculture => &AGRICULTURE,
            Industry::Logistics => &LOGISTICS,
            Industry::Ecommerce => &ECOMMERCE,
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str() == tag)
            .ok_or_else(|| AnalysisError::UnsupportedIndustry(s.to_string()))
    }
}

/// Named industry-specific risk factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Inventory,
    SupplyChain,
    Market,
    Seasonal,
    Competition,
    ClientConcentration,
    Talent,
    Weather,
    Commodity,
    Fuel,
    Regulatory,
    Technology,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::Inventory => "inventory_risk",
            RiskFactor::SupplyChain => "supply_chain_risk",
            RiskFactor::Market => "market_risk",
            RiskFactor::Seasonal => "seasonal_risk",
            RiskFactor::Competition => "competition_risk",
            RiskFactor::ClientConcentration => "client_concentration_risk",
            RiskFactor::Talent => "talent_risk",
            RiskFactor::Weather => "weather_risk",
            RiskFactor::Commodity => "commodity_risk",
            RiskFactor::Fuel => "fuel_risk",
            RiskFactor::Regulatory => "regulatory_risk",
            RiskFactor::Technology => "technology_risk",
        }
    }
}

/// Industry-average reference values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Benchmarks {
    pub current_ratio: f64,
    pub debt_to_equity: f64,
    pub profit_margin: f64,
    pub revenue_per_employee: f64,
}

/// Benchmarks plus weighted risk factors (weights sum to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryProfile {
    pub industry: Industry,
    pub benchmarks: Benchmarks,
    pub risk_factors: &'static [(RiskFactor, f64)],
}

static MANUFACTURING: IndustryProfile = IndustryProfile {
    industry: Industry::Manufacturing,
    benchmarks: Benchmarks {
        current_ratio: 1.5,
        debt_to_equity: 0.6,
        profit_margin: 0.08,
        revenue_per_employee: 200_000.0,
    },
    risk_factors: &[
        (RiskFactor::Inventory, 0.3),
        (RiskFactor::SupplyChain, 0.4),
        (RiskFactor::Market, 0.3),
    ],
};

static RETAIL: IndustryProfile = IndustryProfile {
    industry: Industry::Retail,
    benchmarks: Benchmarks {
        current_ratio: 1.2,
        debt_to_equity: 0.8,
        profit_margin: 0.05,
        revenue_per_employee: 150_000.0,
    },
    risk_factors: &[
        (RiskFactor::Inventory, 0.4),
        (RiskFactor::Seasonal, 0.3),
        (RiskFactor::Competition, 0.3),
    ],
};

static SERVICES: IndustryProfile = IndustryProfile {
    industry: Industry::Services,
    benchmarks: Benchmarks {
        current_ratio: 1.3,
        debt_to_equity: 0.5,
        profit_margin: 0.12,
        revenue_per_employee: 180_000.0,
    },
    risk_factors: &[
        (RiskFactor::ClientConcentration, 0.4),
        (RiskFactor::Talent, 0.3),
        (RiskFactor::Market, 0.3),
    ],
};

static AGRICULTURE: IndustryProfile = IndustryProfile {
    industry: Industry::Agriculture,
    benchmarks: Benchmarks {
        current_ratio: 1.4,
        debt_to_equity: 0.7,
        profit_margin: 0.06,
        revenue_per_employee: 120_000.0,
    },
    risk_factors: &[
        (RiskFactor::Weather, 0.4),
        (RiskFactor::Commodity, 0.3),
        (RiskFactor::Seasonal, 0.3),
    ],
};

static LOGISTICS: IndustryProfile = IndustryProfile {
    industry: Industry::Logistics,
    benchmarks: Benchmarks {
        current_ratio: 1.1,
        debt_to_equity: 0.9,
        profit_margin: 0.04,
        revenue_per_employee: 160_000.0,
    },
    risk_factors: &[
        (RiskFactor::Fuel, 0.3),
        (RiskFactor::Regulatory, 0.3),
        (RiskFactor::Competition, 0.4),
    ],
};

static ECOMMERCE: IndustryProfile = IndustryProfile {
    industry: Industry::Ecommerce,
    benchmarks: Benchmarks {
        current_ratio: 1.6,
        debt_to_equity: 0.4,
        profit_margin: 0.10,
        revenue_per_employee: 250_000.0,
    },
    risk_factors: &[
        (RiskFactor::Technology, 0.3),
        (RiskFactor::Competition, 0.4),
        (RiskFactor::Regulatory, 0.3),
    ],
};
