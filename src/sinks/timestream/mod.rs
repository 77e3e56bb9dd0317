//! The Amazon Timestream sink.
//!
//! Records become data points through [`RecordMapper`], a chunk of data points becomes a single
//! `WriteRecords` call through [`TimestreamService`].

mod config;
mod mapper;
mod request_builder;
mod service;
mod sink;


pub use self::config::{
    BatchConfig, BuildError, HealthcheckConfig, MeasureConfig, TimestreamClientBuilder,
    TimestreamSinkConfig,
};
pub use self::mapper::{DataPoint, Dimension, MappingError, RecordMapper};
pub use self::request_builder::{TimestreamRequest, TimestreamRequestBuilder};
pub use self::service::{TimestreamError, TimestreamResponse, TimestreamService};
pub use self::sink::{EventStatus, TimestreamSink};
