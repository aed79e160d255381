use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::error::ProjectionResult;
use super::time_value::{ensure_finite, round_to_cents};

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SipInput {
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LumpsumInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepUpSipInput {
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub step_up_percent: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LimitedSipInput {
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub contribution_years: u32,
    pub horizon_years: u32,
}

/// SIP started at a child's birth and held until a milestone birthday.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BirthdaySipInput {
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

impl Default for BirthdaySipInput {
    fn default() -> Self {
        Self {
            monthly_contribution: 0.0,
            annual_rate_percent: 0.0,
            years: 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostOfDelayInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub delay_years: u32,
    pub horizon_years: u32,
}

impl Default for CostOfDelayInput {
    fn default() -> Self {
        Self {
            principal: 0.0,
            annual_rate_percent: 0.0,
            delay_years: 0,
            horizon_years: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmiInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeLoanVsSipInput {
    pub loan_amount: f64,
    pub loan_rate_percent: f64,
    pub years: u32,
    pub monthly_sip: f64,
    pub sip_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwpInput {
    pub lumpsum: f64,
    pub monthly_withdrawal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
    pub deferred_years: u32,
}

/// Goal priced today that falls due after a fixed number of years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalInput {
    pub years: u32,
    pub current_cost: f64,
    pub current_investment: f64,
    pub inflation_percent: f64,
    pub return_on_existing_percent: f64,
    pub return_on_new_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistingGrowth {
    #[default]
    Compound,
    /// `currentInvestment * (1 + returnOnNew/100) * years`: simple growth at
    /// the new-money rate, kept for callers that still quote that figure.
    #[serde(alias = "legacySimple", alias = "legacy_simple")]
    LegacySimple,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VacationInput {
    pub years: u32,
    pub current_cost: f64,
    pub current_investment: f64,
    pub inflation_percent: f64,
    pub return_on_existing_percent: f64,
    pub return_on_new_percent: f64,
    pub existing_growth: ExistingGrowth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChildEducationInput {
    pub child_age: u32,
    pub education_age: u32,
    pub current_cost: f64,
    pub current_investment: f64,
    pub inflation_percent: f64,
    pub return_on_existing_percent: f64,
    pub return_on_new_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeddingInput {
    pub child_age: u32,
    pub marriage_age: u32,
    pub current_cost: f64,
    pub current_investment: f64,
    pub inflation_percent: f64,
    pub return_on_existing_percent: f64,
    pub return_on_new_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub current_monthly_expenses: f64,
    pub existing_investment: f64,
    pub inflation_percent: f64,
    pub return_on_existing_percent: f64,
    pub return_on_new_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifeInsuranceInput {
    pub current_age: u32,
    pub spouse_life_expectancy: u32,
    pub current_monthly_expenses: f64,
    pub inflation_percent: f64,
    /// Annual growth applied to the children's education and wedding costs.
    pub child_goal_inflation_percent: f64,
    pub education_child_age: u32,
    pub higher_education_age: u32,
    pub education_cost: f64,
    pub wedding_child_age: u32,
    pub marriage_age: u32,
    pub wedding_cost: f64,
    pub outstanding_loans: f64,
    pub current_life_cover: f64,
    pub current_investments: f64,
}

/// Every calculator the engine offers, tagged by `scenario` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "scenario", rename_all = "kebab-case")]
pub enum Scenario {
    Sip(SipInput),
    Lumpsum(LumpsumInput),
    SimpleInterest(LumpsumInput),
    StepUpSip(StepUpSipInput),
    LimitedSip(LimitedSipInput),
    BirthdaySip(BirthdaySipInput),
    CostOfDelay(CostOfDelayInput),
    Emi(EmiInput),
    HomeLoanVsSip(HomeLoanVsSipInput),
    Swp(SwpInput),
    ChildEducation(ChildEducationInput),
    Retirement(RetirementInput),
    LifeInsurance(LifeInsuranceInput),
    Wedding(WeddingInput),
    Vacation(VacationInput),
    Car(GoalInput),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    Sip,
    Lumpsum,
    SimpleInterest,
    StepUpSip,
    LimitedSip,
    BirthdaySip,
    CostOfDelay,
    Emi,
    HomeLoanVsSip,
    Swp,
    ChildEducation,
    Retirement,
    LifeInsurance,
    Wedding,
    Vacation,
    Car,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 16] = [
        ScenarioKind::Sip,
        ScenarioKind::Lumpsum,
        ScenarioKind::SimpleInterest,
        ScenarioKind::StepUpSip,
        ScenarioKind::LimitedSip,
        ScenarioKind::BirthdaySip,
        ScenarioKind::CostOfDelay,
        ScenarioKind::Emi,
        ScenarioKind::HomeLoanVsSip,
        ScenarioKind::Swp,
        ScenarioKind::ChildEducation,
        ScenarioKind::Retirement,
        ScenarioKind::LifeInsurance,
        ScenarioKind::Wedding,
        ScenarioKind::Vacation,
        ScenarioKind::Car,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::Sip => "sip",
            ScenarioKind::Lumpsum => "lumpsum",
            ScenarioKind::SimpleInterest => "simple-interest",
            ScenarioKind::StepUpSip => "step-up-sip",
            ScenarioKind::LimitedSip => "limited-sip",
            ScenarioKind::BirthdaySip => "birthday-sip",
            ScenarioKind::CostOfDelay => "cost-of-delay",
            ScenarioKind::Emi => "emi",
            ScenarioKind::HomeLoanVsSip => "home-loan-vs-sip",
            ScenarioKind::Swp => "swp",
            ScenarioKind::ChildEducation => "child-education",
            ScenarioKind::Retirement => "retirement",
            ScenarioKind::LifeInsurance => "life-insurance",
            ScenarioKind::Wedding => "wedding",
            ScenarioKind::Vacation => "vacation",
            ScenarioKind::Car => "car",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Scenario {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            Scenario::Sip(_) => ScenarioKind::Sip,
            Scenario::Lumpsum(_) => ScenarioKind::Lumpsum,
            Scenario::SimpleInterest(_) => ScenarioKind::SimpleInterest,
            Scenario::StepUpSip(_) => ScenarioKind::StepUpSip,
            Scenario::LimitedSip(_) => ScenarioKind::LimitedSip,
            Scenario::BirthdaySip(_) => ScenarioKind::BirthdaySip,
            Scenario::CostOfDelay(_) => ScenarioKind::CostOfDelay,
            Scenario::Emi(_) => ScenarioKind::Emi,
            Scenario::HomeLoanVsSip(_) => ScenarioKind::HomeLoanVsSip,
            Scenario::Swp(_) => ScenarioKind::Swp,
            Scenario::ChildEducation(_) => ScenarioKind::ChildEducation,
            Scenario::Retirement(_) => ScenarioKind::Retirement,
            Scenario::LifeInsurance(_) => ScenarioKind::LifeInsurance,
            Scenario::Wedding(_) => ScenarioKind::Wedding,
            Scenario::Vacation(_) => ScenarioKind::Vacation,
            Scenario::Car(_) => ScenarioKind::Car,
        }
    }
}

/// Flat, ordered record of named figures produced by one scenario.
///
/// Values keep full precision in memory and are rounded to cents only when
/// serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    kind: ScenarioKind,
    values: Vec<(&'static str, f64)>,
}

impl ScenarioResult {
    pub fn new(kind: ScenarioKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
        }
    }

    pub(crate) fn with(mut self, name: &'static str, value: f64) -> ProjectionResult<Self> {
        self.values.push((name, ensure_finite(value, name)?));
        Ok(self)
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn rounded(&self, name: &str) -> Option<f64> {
        self.get(name).map(round_to_cents)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }
}

impl Serialize for ScenarioResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("scenario", &self.kind)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, &round_to_cents(*value))?;
        }
        map.end()
    }
}
