use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::db_types::ConversionError;

/// How a failed customer notification affects the write that triggered it.
///
/// Menu publication and order placement both notify customers. Under [`GatingPolicy::Strict`], the write is abandoned
/// when notification fails, so the client can retry the whole request. Under [`GatingPolicy::Lenient`], the write
/// goes ahead and the failure is only logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatingPolicy {
    #[default]
    Strict,
    Lenient,
}

impl GatingPolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, GatingPolicy::Strict)
    }
}

impl Display for GatingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatingPolicy::Strict => write!(f, "strict"),
            GatingPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for GatingPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ConversionError::new("gating policy", s)),
        }
    }
}
