//! Text rendering helpers for health and AP bars.
//!
//! Every bar in the game goes through [`progress_bar`], so one rounding rule
//! applies everywhere: the filled cell count is `current / max * width`
//! rounded half up, computed in integers.

/// Width used by [`progress_bar`].
pub const DEFAULT_BAR_WIDTH: usize = 10;

/// Character for a filled cell.
pub const FILL_CHAR: char = '█';

/// Character for an empty cell.
pub const EMPTY_CHAR: char = '░';

/// Renders `"<label>: [<fill><empty>]"` at [`DEFAULT_BAR_WIDTH`].
///
/// `current` is clamped into `[0, max]`. A non-positive `max` renders
/// `"<label>: ERROR"`.
///
/// ```
/// use raid_core::presentation::progress_bar;
///
/// assert_eq!(progress_bar("HP", 25, 50), "HP: [█████░░░░░]");
/// assert_eq!(progress_bar("AP", 3, 0), "AP: ERROR");
/// ```
#[must_use]
pub fn progress_bar(label: &str, current: i32, max: i32) -> String {
    progress_bar_with_width(label, current, max, DEFAULT_BAR_WIDTH)
}

/// [`progress_bar`] with an explicit width.
#[must_use]
pub fn progress_bar_with_width(label: &str, current: i32, max: i32, width: usize) -> String {
    if max <= 0 {
        return format!("{label}: ERROR");
    }
    let filled = filled_cells(current.clamp(0, max), max, width);
    let mut bar = String::with_capacity(label.len() + 4 + width * FILL_CHAR.len_utf8());
    bar.push_str(label);
    bar.push_str(": [");
    bar.extend(std::iter::repeat(FILL_CHAR).take(filled));
    bar.extend(std::iter::repeat(EMPTY_CHAR).take(width - filled));
    bar.push(']');
    bar
}

/// `round_half_up(current * width / max)` for `0 <= current <= max`, `max > 0`.
fn filled_cells(current: i32, max: i32, width: usize) -> usize {
    let current = u64::from(current.unsigned_abs());
    let max = u64::from(max.unsigned_abs());
    let width_u64 = width as u64;
    let cells = (2 * current * width_u64 + max) / (2 * max);
    usize::try_from(cells).map_or(width, |cells| cells.min(width))
}
