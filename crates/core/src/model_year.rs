//! Model-year codes (VIN position 10).
//!
//! The code table assigns one character per year and wraps every 30 years:
//! `A` is 1980, 2010 and 2040; `1` is 2001 and 2031. A VIN alone cannot tell
//! which cycle it belongs to. [`resolve`] picks the most recent candidate
//! year that does not lie after the reference year, which is correct for
//! any vehicle built within the last 30 years and wrong for anything older.

/// Length of one full cycle of the code table.
pub const CYCLE_YEARS: i32 = 30;

/// Year codes in order, starting at [`FIRST_CYCLE_START`].
const CODES: [char; 30] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'R', 'S', 'T', 'V',
    'W', 'X', 'Y', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Year represented by `CODES[0]` in the earliest cycle.
pub const FIRST_CYCLE_START: i32 = 1980;

/// Earliest year a code can denote, or `None` for characters that are not
/// year codes (`0`, `U`, `Z`, and anything outside the VIN alphabet).
pub fn base_year(code: char) -> Option<i32> {
    CODES
        .iter()
        .position(|c| *c == code)
        .map(|offset| FIRST_CYCLE_START + offset as i32)
}

/// Resolve a year code against `reference_year` (normally the current year).
///
/// Returns the latest year `base + 30k` (k >= 0) that is `<= reference_year`.
/// When even the base year lies in the future the base year is returned,
/// since no earlier cycle exists.
pub fn resolve(code: char, reference_year: i32) -> Option<i32> {
    let base = base_year(code)?;
    if reference_year <= base {
        return Some(base);
    }
    let cycles = (reference_year - base) / CYCLE_YEARS;
    Some(base + cycles * CYCLE_YEARS)
}
