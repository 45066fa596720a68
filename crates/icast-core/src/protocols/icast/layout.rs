/// Bytes occupied by one logical character on the wire.
pub const CHAR_STRIDE: usize = 4;
/// Position of the character code inside each group.
pub const CHAR_OFFSET: usize = 3;

pub const FIELD_DELIMITER: char = ';';
pub const MIN_FIELDS: usize = 13;
// The protocol defines up to 21 positional slots; 13 and above are reserved.

pub const TIME_INDEX: usize = 0;
pub const SCORE_HOME_INDEX: usize = 1;
pub const SCORE_GUEST_INDEX: usize = 2;
pub const PERIOD_INDEX: usize = 3;
pub const HOME_PENALTY_1_INDEX: usize = 4;
pub const HOME_PENALTY_2_INDEX: usize = 5;
pub const GUEST_PENALTY_1_INDEX: usize = 6;
pub const GUEST_PENALTY_2_INDEX: usize = 7;
// 8 and 9 are reserved.
pub const HOME_TEAM_NAME_INDEX: usize = 10;
pub const GUEST_TEAM_NAME_INDEX: usize = 11;
pub const TIME_TYPE_INDEX: usize = 12;

pub const SCORE_SEPARATOR: &str = "\u{a0}:\u{a0}";
pub const PERIOD_LABEL_GAP: &str = "\u{a0}\u{a0}\u{a0}";
pub const INTERMISSION_SUFFIX: &str = " Pause";
pub const TIME_OUT_LABEL: &str = "Time Out";

pub const TIME_TYPE_GAME_TIME: &str = "GAME TIME";
pub const TIME_TYPE_INTERMISSION: &str = "INTERMISSION";
pub const TIME_TYPE_TIME_OUT: &str = "TIME-OUT";
