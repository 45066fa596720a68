use super::layout;
use super::parser::FieldList;
use crate::ScoreboardFacts;

/// Match state reported in the time-type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeType {
    GameTime,
    Intermission,
    TimeOut,
    Other,
}

impl TimeType {
    pub fn from_token(token: &str) -> Self {
        match token {
            layout::TIME_TYPE_GAME_TIME => TimeType::GameTime,
            layout::TIME_TYPE_INTERMISSION => TimeType::Intermission,
            layout::TIME_TYPE_TIME_OUT => TimeType::TimeOut,
            _ => TimeType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    First,
    Second,
    Third,
    Overtime,
}

impl Period {
    /// Case-insensitive lookup of the period token; `None` when unrecognized.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "1" | "p1" | "period1" | "first" => Some(Period::First),
            "2" | "p2" | "period2" | "second" => Some(Period::Second),
            "3" | "p3" | "period3" | "third" => Some(Period::Third),
            "4" | "ot" | "overtime" | "extra" | "sudden death" | "suddendeath" => {
                Some(Period::Overtime)
            }
            _ => None,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Period::First => "1/3",
            Period::Second => "2/3",
            Period::Third => "3/3",
            Period::Overtime => "OT",
        }
    }
}

/// Map a validated field list onto the published scoreboard record.
pub fn normalize(fields: &FieldList<'_>) -> ScoreboardFacts {
    let time = fields.field(layout::TIME_INDEX);
    let score_home = fields.field(layout::SCORE_HOME_INDEX);
    let score_guest = fields.field(layout::SCORE_GUEST_INDEX);
    let period = fields.field(layout::PERIOD_INDEX);
    let time_type = fields.field(layout::TIME_TYPE_INDEX);

    ScoreboardFacts {
        time: time.to_string(),
        score_home: score_home.to_string(),
        score_guest: score_guest.to_string(),
        score: format_score(score_home, score_guest),
        period: period.to_string(),
        time_period: time_period_label(time_type, time, period),
        home_penalty_1: extract_penalty(fields.field(layout::HOME_PENALTY_1_INDEX)),
        home_penalty_2: extract_penalty(fields.field(layout::HOME_PENALTY_2_INDEX)),
        guest_penalty_1: extract_penalty(fields.field(layout::GUEST_PENALTY_1_INDEX)),
        guest_penalty_2: extract_penalty(fields.field(layout::GUEST_PENALTY_2_INDEX)),
        home_team_name: fields.field(layout::HOME_TEAM_NAME_INDEX).to_string(),
        guest_team_name: fields.field(layout::GUEST_TEAM_NAME_INDEX).to_string(),
        time_type: time_type.to_string(),
    }
}

pub fn format_score(home: &str, guest: &str) -> String {
    format!("{home}{}{guest}", layout::SCORE_SEPARATOR)
}

/// Remaining time of a penalty field shaped like `"23 01:45"`.
///
/// Returns `None` unless the field holds a player number and a time token.
pub fn extract_penalty(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [_, .., last] => Some((*last).to_string()),
        _ => None,
    }
}

/// Human-readable clock label; `None` when the match state has no label.
pub fn time_period_label(time_type: &str, time: &str, period: &str) -> Option<String> {
    match TimeType::from_token(time_type) {
        TimeType::GameTime => Period::from_token(period)
            .map(|period| format!("{time}{}{}", layout::PERIOD_LABEL_GAP, period.suffix())),
        TimeType::Intermission => Some(format!("{time}{}", layout::INTERMISSION_SUFFIX)),
        TimeType::TimeOut => Some(layout::TIME_OUT_LABEL.to_string()),
        TimeType::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::icast::parser::parse_fields;

    #[test]
    fn penalty_with_player_and_time() {
        assert_eq!(extract_penalty("23 01:45").as_deref(), Some("01:45"));
        assert_eq!(extract_penalty("  7\t02:00 ").as_deref(), Some("02:00"));
    }

    #[test]
    fn penalty_keeps_last_token() {
        assert_eq!(extract_penalty("23 x 00:30").as_deref(), Some("00:30"));
    }

    #[test]
    fn penalty_absent_without_time() {
        assert_eq!(extract_penalty(""), None);
        assert_eq!(extract_penalty("   "), None);
        assert_eq!(extract_penalty("23"), None);
    }

    #[test]
    fn game_time_label() {
        let label = time_period_label("GAME TIME", "12:34", "2");
        assert_eq!(label.as_deref(), Some("12:34\u{a0}\u{a0}\u{a0}2/3"));
    }

    #[test]
    fn game_time_period_tokens() {
        let cases = [
            ("P1", "1/3"),
            (" first ", "1/3"),
            ("Period2", "2/3"),
            ("third", "3/3"),
            ("3", "3/3"),
            ("OT", "OT"),
            ("4", "OT"),
            ("Sudden Death", "OT"),
            ("suddendeath", "OT"),
            ("extra", "OT"),
        ];
        for (token, suffix) in cases {
            let label = time_period_label("GAME TIME", "05:00", token).unwrap();
            assert_eq!(label, format!("05:00\u{a0}\u{a0}\u{a0}{suffix}"), "token {token:?}");
        }
    }

    #[test]
    fn game_time_unknown_period_has_no_label() {
        assert_eq!(time_period_label("GAME TIME", "05:00", "5"), None);
        assert_eq!(time_period_label("GAME TIME", "05:00", ""), None);
    }

    #[test]
    fn intermission_label() {
        let label = time_period_label("INTERMISSION", "15:00", "1");
        assert_eq!(label.as_deref(), Some("15:00 Pause"));
    }

    #[test]
    fn time_out_label_ignores_clock() {
        assert_eq!(
            time_period_label("TIME-OUT", "00:30", "garbage").as_deref(),
            Some("Time Out")
        );
    }

    #[test]
    fn unknown_time_type_has_no_label() {
        assert_eq!(time_period_label("UNKNOWN", "12:34", "2"), None);
        assert_eq!(time_period_label("game time", "12:34", "2"), None);
    }

    #[test]
    fn normalize_full_record() {
        let fields = parse_fields(
            "08:12;3;4;p3;12 01:45;;9 00:20;4;x;y;Lions;Tigers;GAME TIME;reserved",
        )
        .unwrap();
        let facts = normalize(&fields);
        assert_eq!(facts.time, "08:12");
        assert_eq!(facts.score_home, "3");
        assert_eq!(facts.score_guest, "4");
        assert_eq!(facts.score, "3\u{a0}:\u{a0}4");
        assert_eq!(facts.period, "p3");
        assert_eq!(facts.time_period.as_deref(), Some("08:12\u{a0}\u{a0}\u{a0}3/3"));
        assert_eq!(facts.home_penalty_1.as_deref(), Some("01:45"));
        assert_eq!(facts.home_penalty_2, None);
        assert_eq!(facts.guest_penalty_1.as_deref(), Some("00:20"));
        assert_eq!(facts.guest_penalty_2, None);
        assert_eq!(facts.home_team_name, "Lions");
        assert_eq!(facts.guest_team_name, "Tigers");
        assert_eq!(facts.time_type, "GAME TIME");
    }
}
