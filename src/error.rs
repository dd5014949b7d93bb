use std::fmt::Display;

#[derive(Debug)]
pub enum SpandrelError {
    /// A required part of the source model is absent (no alignment, no superstructure).
    InputMissing(String),
    /// A distance-along query exceeded a segment or chain length beyond tolerance.
    Range(String),
    /// An entity exists but does not carry the expected properties or values.
    DataShape(String),
    /// The source model uses a construct the translator does not handle.
    Unsupported(String),
    /// A filesystem failure while reading input or writing the output model.
    Output(String),
}

impl Display for SpandrelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (err_name, value) = match self {
            SpandrelError::InputMissing(v) => ("Input Missing", v),
            SpandrelError::Range(v) => ("Range", v),
            SpandrelError::DataShape(v) => ("Data Shape", v),
            SpandrelError::Unsupported(v) => ("Unsupported", v),
            SpandrelError::Output(v) => ("Output", v),
        };

        write!(f, "{} error: {}", err_name, value)
    }
}

impl std::error::Error for SpandrelError {}
