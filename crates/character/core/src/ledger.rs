//! Points ledger.
//!
//! A character's total points are the sum of its records. Records are kept
//! newest first.

use chrono::{DateTime, Utc};

use crate::fxp::Fxp;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointsRecord {
    pub when: DateTime<Utc>,
    pub points: Fxp,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    pub reason: String,
}

impl PointsRecord {
    pub const INITIAL_POINTS: &'static str = "Initial points";
    pub const RECONCILIATION: &'static str = "Reconciliation";
    pub const UNSPENT_ADJUSTED: &'static str = "Unspent points adjusted";

    pub fn new(when: DateTime<Utc>, points: Fxp, reason: impl Into<String>) -> Self {
        Self {
            when,
            points,
            reason: reason.into(),
        }
    }
}

pub fn total(records: &[PointsRecord]) -> Fxp {
    records.iter().map(|r| r.points).sum()
}

/// Stable sort, newest first.
pub fn sort_newest_first(records: &mut [PointsRecord]) {
    records.sort_by(|a, b| b.when.cmp(&a.when));
}

/// Adds a reconciliation record when `records` do not sum to `total_points`.
/// Returns whether a record was added.
pub fn reconcile(records: &mut Vec<PointsRecord>, total_points: Fxp, now: DateTime<Utc>) -> bool {
    let sum = total(records);
    let added = sum != total_points;
    if added {
        tracing::debug!(%sum, %total_points, "points ledger out of balance");
        records.push(PointsRecord::new(now, total_points - sum, PointsRecord::RECONCILIATION));
    }
    sort_newest_first(records);
    added
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn reconciliation_balances_and_sorts() {
        let mut records = vec![
            PointsRecord::new(at(1), Fxp::from_int(150), PointsRecord::INITIAL_POINTS),
            PointsRecord::new(at(5), Fxp::TEN, "Session 1"),
        ];
        assert!(reconcile(&mut records, Fxp::from_int(175), at(9)));
        assert_eq!(total(&records), Fxp::from_int(175));
        assert_eq!(records[0].reason, PointsRecord::RECONCILIATION);
        assert_eq!(records[0].points, Fxp::from_int(15));
        assert_eq!(records[2].reason, PointsRecord::INITIAL_POINTS);

        assert!(!reconcile(&mut records, Fxp::from_int(175), at(10)));
        assert_eq!(records.len(), 3);
    }
}
