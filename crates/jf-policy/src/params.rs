//! Lenient parameter-blob parsing
//!
//! Formula parameters arrive as free-form JSON text seeded by operators.
//! Parsing never fails: a blank or unparseable blob is an empty map, and
//! every accessor falls back to its documented default. Numeric fields
//! accept both JSON numbers and strings; blank strings count as absent.

use jf_core::money::MONEY_SCALE;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Maximum result scale a blob may request. Requests beyond the interim
/// precision are capped, with a warning.
const MAX_SCALE: u32 = 8;

/// Parsed parameter map for one formula invocation.
#[derive(Debug, Clone, Default)]
pub struct PolicyParams {
    values: Map<String, Value>,
}

impl PolicyParams {
    /// Parse a config blob. Blank or malformed input yields an empty map.
    pub fn parse(blob: &str) -> Self {
        let trimmed = blob.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(values)) => Self { values },
            Ok(other) => {
                log::warn!("config blob is not a JSON object, ignoring: {other}");
                Self::default()
            }
            Err(err) => {
                log::warn!("unparseable config blob, ignoring: {err}");
                Self::default()
            }
        }
    }

    /// Read a numeric field. JSON numbers and numeric strings are accepted;
    /// anything else (including a blank string) is absent.
    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        match self.values.get(key)? {
            Value::Number(n) => n.to_string().parse().ok(),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    s.parse().ok()
                }
            }
            _ => None,
        }
    }

    /// Read a percent field, clamped into `[0, 100]`. Absent fields are 0.
    pub fn percent(&self, key: &str) -> Decimal {
        self.decimal(key)
            .unwrap_or(Decimal::ZERO)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Read a pool-threshold field, clamped to be non-negative. Absent
    /// fields are 0.
    pub fn pool_threshold(&self, key: &str) -> Decimal {
        self.decimal(key).unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
    }

    /// Result scale for contribution formulas, default 2, capped at the
    /// interim precision of 8.
    pub fn scale(&self) -> u32 {
        let scale = self
            .decimal("scale")
            .and_then(|d| d.to_u32())
            .unwrap_or(MONEY_SCALE);
        if scale > MAX_SCALE {
            log::warn!("requested scale {scale} exceeds the supported maximum, capping at {MAX_SCALE}");
            return MAX_SCALE;
        }
        scale
    }
}
