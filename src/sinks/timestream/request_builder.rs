use serde::Serialize;

use super::{DataPoint, RecordMapper};
use crate::{event::Event, internal_events::TimestreamRecordSkipped};

/// One `WriteRecords` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimestreamRequest {
    pub database_name: String,
    pub table_name: String,
    pub records: Vec<DataPoint>,
}

impl TimestreamRequest {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TimestreamRequestBuilder {
    database: String,
    table: String,
    mapper: RecordMapper,
}

impl TimestreamRequestBuilder {
    pub const fn new(database: String, table: String, mapper: RecordMapper) -> Self {
        Self {
            database,
            table,
            mapper,
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub const fn mapper(&self) -> &RecordMapper {
        &self.mapper
    }

    /// Maps every event that can be mapped, keeping input order. The rest are reported and
    /// left out.
    pub fn map_events(&self, events: &[Event]) -> Vec<DataPoint> {
        events
            .iter()
            .filter_map(
                |event| match self.mapper.map(&event.record, event.timestamp) {
                    Ok(point) => Some(point),
                    Err(error) => {
                        emit!(TimestreamRecordSkipped {
                            error: &error,
                            record: &event.record,
                        });
                        None
                    }
                },
            )
            .collect()
    }

    /// Returns `None` when no event in the chunk could be mapped, in which case nothing is sent.
    pub fn build_request(&self, events: &[Event]) -> Option<TimestreamRequest> {
        let records = self.map_events(events);
        if records.is_empty() {
            return None;
        }

        Some(TimestreamRequest {
            database_name: self.database.clone(),
            table_name: self.table.clone(),
            records,
        })
    }
}
