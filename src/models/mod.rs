use serde::{Deserialize, Serialize};

/// A single harvested broadcast slot, the unit of output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub date: String,
    pub time: String,
    pub code: String,
    pub name: String,
}

impl ScheduleItem {
    /// Composite identity used for deduplication
    pub fn key(&self) -> RecordKey {
        RecordKey {
            date: self.date.clone(),
            time: self.time.clone(),
            code: self.code.clone(),
        }
    }
}

/// Identity triple: two extractions agreeing on (date, time, code) refer to
/// the same real-world broadcast slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub date: String,
    pub time: String,
    pub code: String,
}

/// One raw extraction hit, before date normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub time_label: String,
    pub date_label: String,
    pub code: String,
    pub name: String,
}
