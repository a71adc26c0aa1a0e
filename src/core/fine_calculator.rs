use crate::domain::model::Fine;

/// Added to every automated fine.
pub const ADMINISTRATIVE_COSTS: u32 = 9;

/// `(lower bound inclusive, upper bound exclusive, base fine in euros)`.
///
/// Anything at or above the last upper bound goes to the prosecutor.
pub const FINE_TIERS: [(u32, u32, u32); 8] = [
    (0, 5, 18),
    (5, 10, 31),
    (10, 15, 64),
    (15, 20, 121),
    (20, 25, 174),
    (25, 30, 232),
    (30, 35, 297),
    (35, 36, 372),
];

pub fn calculate_fine(excess_speed: u32) -> Fine {
    FINE_TIERS
        .iter()
        .find(|(lower, upper, _)| (*lower..*upper).contains(&excess_speed))
        .map_or(Fine::Undetermined, |(_, _, base)| {
            Fine::Amount(base + ADMINISTRATIVE_COSTS)
        })
}
