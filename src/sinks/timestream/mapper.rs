use serde::Serialize;
use snafu::Snafu;

use super::config::MeasureConfig;
use crate::event::Record;

/// The value type of every dimension; Timestream only accepts strings there.
pub const DIMENSION_VALUE_TYPE: &str = "VARCHAR";

/// Record timestamps are always whole seconds.
pub const TIME_UNIT: &str = "SECONDS";

/// Name, value and type of the placeholder measure used when a record carries none.
///
/// Every data point needs a measure, so records without one still share a uniform schema.
pub const SENTINEL_MEASURE_NAME: &str = "-";
pub const SENTINEL_MEASURE_VALUE: &str = "-";
pub const SENTINEL_MEASURE_VALUE_TYPE: &str = "VARCHAR";

/// Reasons a single record cannot become a data point.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum MappingError {
    #[snafu(display("Measure field {:?} has an empty value.", field))]
    EmptyMeasureValue { field: String },
    #[snafu(display("Record has no dimensions with a non-empty value."))]
    NoDimensions,
}

impl MappingError {
    pub const fn code(&self) -> &'static str {
        match self {
            MappingError::EmptyMeasureValue { .. } => "empty_measure_value",
            MappingError::NoDimensions => "no_dimensions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub dimension_value_type: &'static str,
    pub name: String,
    pub value: String,
}

impl Dimension {
    fn new(name: &str, value: String) -> Self {
        Self {
            dimension_value_type: DIMENSION_VALUE_TYPE,
            name: name.to_owned(),
            value,
        }
    }
}

/// One point of the destination table, in the shape of a `WriteRecords` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataPoint {
    pub dimensions: Vec<Dimension>,
    pub time: String,
    pub time_unit: &'static str,
    pub measure_name: String,
    pub measure_value: String,
    pub measure_value_type: String,
}

#[derive(Debug)]
struct Measure {
    name: String,
    value: String,
    value_type: String,
}

impl Measure {
    fn sentinel() -> Self {
        Self {
            name: SENTINEL_MEASURE_NAME.to_owned(),
            value: SENTINEL_MEASURE_VALUE.to_owned(),
            value_type: SENTINEL_MEASURE_VALUE_TYPE.to_owned(),
        }
    }
}

/// Turns records into data points: every non-empty field becomes a dimension, except the
/// configured measure field.
#[derive(Debug, Clone, Default)]
pub struct RecordMapper {
    measure: Option<MeasureConfig>,
}

impl RecordMapper {
    pub const fn new(measure: Option<MeasureConfig>) -> Self {
        Self { measure }
    }

    pub const fn measure(&self) -> Option<&MeasureConfig> {
        self.measure.as_ref()
    }

    pub fn map(&self, record: &Record, timestamp: i64) -> Result<DataPoint, MappingError> {
        let mut dimensions = Vec::with_capacity(record.len());
        let mut measure = None;

        for (key, value) in record.iter() {
            let value = value.to_string_lossy();

            match &self.measure {
                Some(config) if config.name == key => {
                    if value.is_empty() {
                        return Err(MappingError::EmptyMeasureValue {
                            field: key.to_owned(),
                        });
                    }
                    measure = Some(Measure {
                        name: key.to_owned(),
                        value,
                        value_type: config.value_type.clone(),
                    });
                }
                // Timestream refuses empty dimension values, so such fields are left out.
                _ if value.is_empty() => {}
                _ => dimensions.push(Dimension::new(key, value)),
            }
        }

        if dimensions.is_empty() {
            return Err(MappingError::NoDimensions);
        }

        let measure = measure.unwrap_or_else(Measure::sentinel);
        Ok(DataPoint {
            dimensions,
            time: timestamp.to_string(),
            time_unit: TIME_UNIT,
            measure_name: measure.name,
            measure_value: measure.value,
            measure_value_type: measure.value_type,
        })
    }
}
