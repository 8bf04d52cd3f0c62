/// Half of the u16 space. A version more than this far "ahead" is treated as
/// having wrapped around, and is therefore older.
const HALF_RANGE: u16 = 32768;

/// Returns whether or not a wrapping number is greater than another
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
/// sequence_greater_than(0,65535) will return true
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    ((s1 > s2) && (s1 - s2 <= HALF_RANGE)) || ((s1 < s2) && (s2 - s1 > HALF_RANGE))
}

/// Returns whether or not a wrapping number is less than another
pub fn sequence_less_than(s1: u16, s2: u16) -> bool {
    sequence_greater_than(s2, s1)
}
