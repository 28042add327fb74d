//! Price classification against a tier's expected band.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Band, ClassifierOffsets};

/// Where a price sits relative to a tier's band. Ordered: derive(`Ord`)
/// follows declaration order, which the monotonicity tests rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostClass {
    UnrealisticallyLow,
    BelowRange,
    InRange,
    LikelyOverpriced,
    Overpriced,
}

impl CostClass {
    pub fn label(&self) -> &'static str {
        match self {
            CostClass::UnrealisticallyLow => "unrealistically low",
            CostClass::BelowRange => "below the typical range",
            CostClass::InRange => "within the typical range",
            CostClass::LikelyOverpriced => "likely overpriced",
            CostClass::Overpriced => "overpriced",
        }
    }
}

impl fmt::Display for CostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a price against a tier band widened by the configured offsets.
///
/// First match wins, in exactly this order. The order is load-bearing: a
/// degenerate configuration (tiny band, large offsets) can make the bands
/// overlap, and the fixed order resolves the ambiguity deterministically.
pub fn classify_price(price: f64, band: &Band, offsets: &ClassifierOffsets) -> CostClass {
    let unrealistic_below = band.min + offsets.unreal_low_from_min;
    let overpriced_above = band.max + offsets.overpriced_from_max;

    if price < unrealistic_below {
        CostClass::UnrealisticallyLow
    } else if price < band.min {
        CostClass::BelowRange
    } else if price > overpriced_above {
        CostClass::Overpriced
    } else if price > band.max {
        CostClass::LikelyOverpriced
    } else {
        CostClass::InRange
    }
}
