/// All timestamps exchanged with the job-manager service are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
