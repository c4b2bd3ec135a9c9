use super::domain::{PlasticType, RankTier};

/// Per-kilogram point multiplier for each accepted plastic category.
pub const fn multiplier_for(plastic: PlasticType) -> u32 {
    match plastic {
        PlasticType::Pet => 10,
        PlasticType::Hdpe => 15,
        PlasticType::Pvc => 8,
        PlasticType::Ldpe => 12,
        PlasticType::Pp => 14,
        PlasticType::Ps => 9,
        PlasticType::Other => 5,
    }
}

/// Points earned for a batch: floor(weight * quantity * multiplier / 10).
/// Weight and quantity must already be validated as positive by the caller.
pub fn points_for(plastic: PlasticType, weight_kg: f64, quantity: u32) -> u64 {
    let raw = weight_kg * quantity as f64 * multiplier_for(plastic) as f64 / 10.0;
    raw.floor() as u64
}

/// Rank tier for a cumulative point total, highest threshold first.
pub const fn rank_for(total_points: u64) -> RankTier {
    if total_points >= 5000 {
        RankTier::Platinum
    } else if total_points >= 3000 {
        RankTier::Gold
    } else if total_points >= 1000 {
        RankTier::Silver
    } else {
        RankTier::Bronze
    }
}

/// Tunable ledger behavior that must not leak into handler code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardPolicy {
    /// When true, rejecting a submission debits the points it granted.
    /// Off by default: granted points survive rejection.
    pub reclaim_rejected: bool,
}
