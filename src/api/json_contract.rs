use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::{CanonicalChartConfig, ChartSpecification};

pub const CHART_SPECIFICATION_JSON_SCHEMA_V1: u32 = 1;
pub const CANONICAL_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpecificationJsonContractV1 {
    pub schema_version: u32,
    pub spec: ChartSpecification,
}

/// Versioned envelope around a resolved configuration (serialize-only; the
/// tooltip render function never crosses this boundary).
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalConfigJsonContractV1<'a> {
    pub schema_version: u32,
    pub config: &'a CanonicalChartConfig,
}

impl ChartSpecification {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart specification json: {e}"))
        })
    }

    /// Accepts a bare specification or a v1 contract envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart specification json: {e}"))
        })?;
        if value.get("schema_version").is_none() {
            return serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidData(format!("invalid chart specification: {e}"))
            });
        }
        let payload: ChartSpecificationJsonContractV1 =
            serde_json::from_value(value).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse specification contract: {e}"))
            })?;
        if payload.schema_version != CHART_SPECIFICATION_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart specification schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.spec)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart specification: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSpecificationJsonContractV1 {
            schema_version: CHART_SPECIFICATION_JSON_SCHEMA_V1,
            spec: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!(
                "failed to serialize chart specification contract v1: {e}"
            ))
        })
    }
}

impl CanonicalChartConfig {
    pub fn to_json_value(&self) -> ChartResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize canonical config: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize canonical config: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = CanonicalConfigJsonContractV1 {
            schema_version: CANONICAL_CONFIG_JSON_SCHEMA_V1,
            config: self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!(
                "failed to serialize canonical config contract v1: {e}"
            ))
        })
    }
}
