pub mod error_stage {
    pub const RECEIVING: &str = "receiving";
    pub const PROCESSING: &str = "processing";
    pub const SENDING: &str = "sending";
}

pub mod error_type {
    /// The error was caused when trying to parse the incoming data.
    pub const PARSER_FAILED: &str = "parser_failed";
    /// The error was caused when reading from the input.
    pub const READER_FAILED: &str = "reader_failed";
    /// The error was caused when trying to turn a record into the destination's representation.
    pub const ENCODER_FAILED: &str = "encoder_failed";
    /// The destination refused part of a request.
    pub const REQUEST_REJECTED: &str = "request_rejected";
    /// The error was caused when sending a request.
    pub const REQUEST_FAILED: &str = "request_failed";
    /// A healthcheck against the destination did not pass.
    pub const HEALTHCHECK_FAILED: &str = "healthcheck_failed";
}
