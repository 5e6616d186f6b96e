//! Shot scoring

/// Points per matched bubble
pub const POINTS_PER_POP: u32 = 10;
/// Points per bubble that fell after losing support
pub const POINTS_PER_DROP: u32 = 5;
/// Extra points per matched bubble beyond three
pub const COMBO_STEP: u32 = 5;
/// Match size from which the combo bonus applies
pub const COMBO_MIN: u32 = 4;

/// Points for one shot
///
/// `10 * popped`, plus `5 * (popped - 3)` for a 4+ match, plus `5 * floating`.
pub fn calculate_score(popped: u32, floating: u32) -> u32 {
    let base = popped * POINTS_PER_POP;
    let combo = if popped >= COMBO_MIN {
        COMBO_STEP * (popped - (COMBO_MIN - 1))
    } else {
        0
    };
    base + combo + floating * POINTS_PER_DROP
}

/// A connected group large enough to remove
#[inline]
pub fn is_match(size: usize, threshold: usize) -> bool {
    size >= threshold
}
