use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Invalid timeout '{value}'. Expected a number with an optional ms/s/m/h suffix.")]
    TimeoutMalformed { value: String },
    #[error("Invalid timeout '{value}': {source}")]
    TimeoutNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Unknown timeout unit '{unit}'. Use ms, s, m, or h.")]
    TimeoutUnit { unit: String },
    #[error("Timeout '{value}' is too large.")]
    TimeoutTooLarge { value: String },
    #[error("Timeout must be greater than zero.")]
    TimeoutZero,
    #[error("Target host must not be empty.")]
    EmptyHost,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
