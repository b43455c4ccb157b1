/// Row and keyword constants shared by the extractor, classifier and matcher.
/// Everything here is compared against lower-cased text.

// Row-type labels (column B of the plan sheet)
pub const WEEK_LABEL: &str = "week";
pub const ACTIVITY_LABEL: &str = "activity";
pub const PURPOSE_LABEL: &str = "purpose";
pub const SESSION_NOTES_LABEL: &str = "session notes";

/// Index of the row-type label cell
pub const LABEL_COLUMN: usize = 1;
/// Monday..Sunday live in columns C..I
pub const FIRST_DAY_COLUMN: usize = 2;
pub const DAYS_PER_WEEK: usize = 7;

pub const REST_CELLS: [&str; 2] = ["rest", "rest day"];

// Workout-type keywords
pub const RECOVERY_KEYWORD: &str = "recovery";
pub const HILL_KEYWORD: &str = "hill";
pub const INTERVAL_KEYWORD: &str = "interval";
pub const LONG_RUN_KEYWORD: &str = "long run";
pub const LONG_KEYWORD: &str = "long";
pub const INCLUDING_KEYWORD: &str = "inc.";
pub const PROGRESSION_KEYWORD: &str = "progression";
pub const VO2MAX_KEYWORD: &str = "vo2max";
pub const STRIDES_KEYWORD: &str = "stride";
pub const RACE_KEYWORD: &str = "race";
pub const STRENGTH_KEYWORD: &str = "strength";

/// Name given to the companion weight-training event
pub const STRENGTH_EVENT_NAME: &str = "Leg Strength";

// Defaults used when the text leaves a value implicit
pub const DETAIL_MINUTES: u32 = 10;
pub const DEFAULT_STRIDE_REPS: u32 = 4;
pub const DEFAULT_STRIDE_SECS: u32 = 10;
pub const DEFAULT_STRIDE_RECOVERY_SECS: u32 = 50;
pub const IMPLICIT_JOG_RECOVERY_MINS: u32 = 2;
pub const LONG_RUN_SET_RECOVERY_MINS: u32 = 2;

// Month lookup for week headers ("22 Dec - 28 Dec")
pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// Remote endpoints
pub const INTERVALS_ICU_BASE_URL: &str = "https://intervals.icu";
pub const SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// Environment overrides for secrets kept out of config.toml
pub const ENV_INTERVALS_API_KEY: &str = "INTERVALS_ICU_API_KEY";
pub const ENV_INTERVALS_ATHLETE_ID: &str = "INTERVALS_ICU_ATHLETE_ID";
pub const ENV_SHEETS_API_KEY: &str = "GOOGLE_SHEETS_API_KEY";
pub const ENV_SHEETS_ACCESS_TOKEN: &str = "GOOGLE_SHEETS_ACCESS_TOKEN";
