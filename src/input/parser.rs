// Parses "<roll>,<pitch>,<height>" frames into pose commands

use crate::messages::PoseCommand;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Frame is not valid UTF-8")]
    Encoding,

    #[error("Expected 3 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("Non-finite value: {0:?}")]
    NonFinite(String),
}

/// Parse one frame. Exactly three floats, surrounding whitespace allowed
/// per field; anything else is an error.
pub fn parse_pose(frame: &[u8]) -> Result<PoseCommand, ParseError> {
    let text = std::str::from_utf8(frame).map_err(|_| ParseError::Encoding)?;

    let mut fields = [0.0f32; 3];
    let mut count = 0;
    for token in text.split(',') {
        if count < fields.len() {
            fields[count] = parse_field(token)?;
        }
        count += 1;
    }

    if count != fields.len() {
        return Err(ParseError::FieldCount(count));
    }

    let [roll, pitch, height] = fields;
    Ok(PoseCommand::new(roll, pitch, height))
}

fn parse_field(token: &str) -> Result<f32, ParseError> {
    let token = token.trim();
    let value: f32 = token
        .parse()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))?;
    if !value.is_finite() {
        return Err(ParseError::NonFinite(token.to_string()));
    }
    Ok(value)
}
