use serde::{Deserialize, Serialize};

#[cfg(feature = "demand")]
use crate::demand::RestockPolicy;
use crate::policy::{PolicyTable, SeasonalCalendar};
use crate::MarkdownResult;

/// Everything the engine is parameterised by. Every section is optional in
/// a config file; missing sections keep the built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub policies: PolicyTable,
    pub seasonal: SeasonalCalendar,
    /// Layer the seasonal calendar over calculated discounts
    pub apply_seasonal: bool,
    #[cfg(feature = "demand")]
    pub restock: RestockPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            policies: PolicyTable::default(),
            seasonal: SeasonalCalendar::default(),
            apply_seasonal: true,
            #[cfg(feature = "demand")]
            restock: RestockPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> MarkdownResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MarkdownResult<()> {
        self.policies.validate()?;
        self.seasonal.validate()?;
        #[cfg(feature = "demand")]
        self.restock.validate()?;
        Ok(())
    }
}
