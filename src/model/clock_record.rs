use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Work mode recorded at clock-in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkMode {
    Office,
    Remote,
    Hybrid,
}

impl Default for WorkMode {
    fn default() -> Self {
        WorkMode::Office
    }
}

/// One clock-in/clock-out pair. `clock_out` is NULL while the session is
/// open; the store admits at most one open row per employee
/// (`uq_open_session` in schema.sql). All datetimes are UTC.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ClockRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = "2026-03-02T09:00:00", value_type = String, format = "date-time")]
    pub clock_in: NaiveDateTime,

    #[schema(example = "2026-03-02T17:30:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<NaiveDateTime>,

    #[schema(example = "HQ", nullable = true)]
    pub location: Option<String>,

    #[schema(example = "office")]
    pub work_from_type: String,
}

/// Calendar projection of a clock record: the raw record plus the day it
/// falls on, derived from `clock_in` in UTC so output does not depend on the
/// server's timezone configuration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    #[schema(example = "2026-03-02")]
    pub date: String,

    #[schema(example = "Monday")]
    pub day_name: String,

    #[schema(example = "2026-03-02T09:00:00", value_type = String, format = "date-time")]
    pub clock_in: NaiveDateTime,

    #[schema(example = "2026-03-02T17:30:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<NaiveDateTime>,

    #[schema(example = "HQ", nullable = true)]
    pub location: Option<String>,

    #[schema(example = "office")]
    pub work_from_type: String,
}

/// Project records into calendar entries, newest clock-in first.
pub fn build_calendar(mut records: Vec<ClockRecord>) -> Vec<CalendarEntry> {
    records.sort_by(|a, b| b.clock_in.cmp(&a.clock_in));

    records
        .into_iter()
        .map(|record| CalendarEntry {
            date: record.clock_in.format("%Y-%m-%d").to_string(),
            day_name: record.clock_in.format("%A").to_string(),
            clock_in: record.clock_in,
            clock_out: record.clock_out,
            location: record.location,
            work_from_type: record.work_from_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(id: u64, clock_in: NaiveDateTime, clock_out: Option<NaiveDateTime>) -> ClockRecord {
        ClockRecord {
            id,
            employee_id: 1,
            clock_in,
            clock_out,
            location: Some("HQ".into()),
            work_from_type: WorkMode::Office.to_string(),
        }
    }

    #[test]
    fn work_mode_round_trip() {
        assert_eq!(WorkMode::Office.to_string(), "office");
        assert_eq!(WorkMode::Hybrid.to_string(), "hybrid");
        assert_eq!("remote".parse::<WorkMode>().unwrap(), WorkMode::Remote);
        assert!("onsite".parse::<WorkMode>().is_err());
        assert_eq!(WorkMode::default(), WorkMode::Office);
    }

    #[test]
    fn calendar_orders_newest_first() {
        let records = vec![
            record(1, dt(2024, 1, 1, 9), Some(dt(2024, 1, 1, 17))),
            record(3, dt(2024, 1, 3, 9), None),
            record(2, dt(2024, 1, 2, 9), Some(dt(2024, 1, 2, 17))),
        ];

        let calendar = build_calendar(records);
        let dates: Vec<_> = calendar.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-03", "2024-01-02", "2024-01-01"]);

        for pair in calendar.windows(2) {
            assert!(pair[0].clock_in >= pair[1].clock_in);
        }
    }

    #[test]
    fn calendar_derives_date_and_weekday_from_clock_in() {
        // 2024-01-01 was a Monday, 2024-01-06 a Saturday.
        let calendar = build_calendar(vec![
            record(1, dt(2024, 1, 1, 9), Some(dt(2024, 1, 1, 17))),
            record(2, dt(2024, 1, 6, 23), None),
        ]);

        assert_eq!(calendar[0].date, "2024-01-06");
        assert_eq!(calendar[0].day_name, "Saturday");
        assert_eq!(calendar[1].date, "2024-01-01");
        assert_eq!(calendar[1].day_name, "Monday");
    }

    #[test]
    fn calendar_preserves_record_fields() {
        let t0 = dt(2024, 2, 5, 8);
        let t1 = dt(2024, 2, 5, 16);
        let calendar = build_calendar(vec![record(1, t0, Some(t1))]);

        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].clock_in, t0);
        assert_eq!(calendar[0].clock_out, Some(t1));
        assert_eq!(calendar[0].location.as_deref(), Some("HQ"));
        assert_eq!(calendar[0].work_from_type, "office");
    }
}
