use thiserror::Error;

#[derive(Debug, Error)]
pub enum OscError {
    #[error("Datagram ends mid-field")]
    Truncated,
    #[error("String is not nul-terminated within the datagram")]
    UnterminatedString,
    #[error("Invalid UTF-8 in string field")]
    InvalidString,
    #[error("Type tag string missing ',' prefix")]
    MissingTypeTags,
    #[error("Unsupported type tag '{0}'")]
    UnsupportedTag(char),
    #[error("OSC bundles are not supported")]
    Bundle,
}

/// One decoded OSC argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Float(f32),
    Int(i32),
    Str(String),
    Blob(Vec<u8>),
}

/// A decoded OSC message: address pattern plus arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

impl OscMessage {
    /// The numeric fields of the message, in order. Ints are coerced to
    /// f32; other argument types are skipped.
    pub fn numeric_args(&self) -> Vec<f32> {
        self.args
            .iter()
            .filter_map(|arg| match arg {
                OscArg::Float(v) => Some(*v),
                OscArg::Int(v) => Some(*v as f32),
                _ => None,
            })
            .collect()
    }
}

/// Decode one datagram as an OSC 1.0 message.
///
/// Layout: nul-padded address pattern, nul-padded `,`-prefixed type tag
/// string, then big-endian arguments. Bundles (`#bundle`) are rejected; the
/// Buds bridge sends plain messages.
pub fn parse_message(data: &[u8]) -> Result<OscMessage, OscError> {
    let mut cursor = 0usize;

    let address = read_string(data, &mut cursor)?;
    if address.starts_with('#') {
        return Err(OscError::Bundle);
    }

    // Some senders omit the type tag string entirely; treat as zero args.
    if cursor >= data.len() {
        return Ok(OscMessage {
            address,
            args: Vec::new(),
        });
    }

    let tags = read_string(data, &mut cursor)?;
    let tags = tags.strip_prefix(',').ok_or(OscError::MissingTypeTags)?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        let arg = match tag {
            'f' => OscArg::Float(f32::from_be_bytes(read_fixed(data, &mut cursor)?)),
            'i' => OscArg::Int(i32::from_be_bytes(read_fixed(data, &mut cursor)?)),
            's' => OscArg::Str(read_string(data, &mut cursor)?),
            'b' => OscArg::Blob(read_blob(data, &mut cursor)?),
            other => return Err(OscError::UnsupportedTag(other)),
        };
        args.push(arg);
    }

    Ok(OscMessage { address, args })
}

/// Read a nul-terminated string padded with nuls to the next 4-byte boundary.
fn read_string(data: &[u8], cursor: &mut usize) -> Result<String, OscError> {
    let rest = data.get(*cursor..).ok_or(OscError::Truncated)?;
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(OscError::UnterminatedString)?;
    let s = std::str::from_utf8(&rest[..nul]).map_err(|_| OscError::InvalidString)?;
    *cursor += (nul / 4 + 1) * 4;
    Ok(s.to_string())
}

fn read_fixed<const N: usize>(data: &[u8], cursor: &mut usize) -> Result<[u8; N], OscError> {
    let end = *cursor + N;
    let bytes = data.get(*cursor..end).ok_or(OscError::Truncated)?;
    *cursor = end;
    Ok(bytes.try_into().unwrap())
}

/// Read a length-prefixed blob padded to the next 4-byte boundary.
fn read_blob(data: &[u8], cursor: &mut usize) -> Result<Vec<u8>, OscError> {
    let len = i32::from_be_bytes(read_fixed(data, cursor)?);
    let len = usize::try_from(len).map_err(|_| OscError::Truncated)?;
    let end = *cursor + len;
    let bytes = data.get(*cursor..end).ok_or(OscError::Truncated)?.to_vec();
    *cursor = end + (4 - len % 4) % 4;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a wire-format OSC message for testing.
    fn build_message(address: &str, tags: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        push_padded_string(&mut buf, address);
        push_padded_string(&mut buf, &format!(",{tags}"));
        buf.extend_from_slice(payload);
        buf
    }

    fn push_padded_string(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(s.as_bytes());
        let pad = 4 - s.len() % 4;
        buf.extend(std::iter::repeat(0u8).take(pad));
    }

    fn float_payload(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn parses_quaternion_message() {
        let data = build_message(
            "/buds/orientation",
            "ffff",
            &float_payload(&[0.1, 0.2, 0.3, 0.9]),
        );
        let message = parse_message(&data).unwrap();
        assert_eq!(message.address, "/buds/orientation");
        assert_eq!(message.numeric_args(), vec![0.1, 0.2, 0.3, 0.9]);
    }

    #[test]
    fn ints_count_as_numeric_fields() {
        let mut payload = float_payload(&[0.5]);
        payload.extend_from_slice(&7i32.to_be_bytes());
        let data = build_message("/a", "fi", &payload);
        assert_eq!(parse_message(&data).unwrap().numeric_args(), vec![0.5, 7.0]);
    }

    #[test]
    fn strings_are_skipped_by_numeric_args() {
        let mut payload = Vec::new();
        push_padded_string(&mut payload, "hello");
        payload.extend_from_slice(&1.0f32.to_be_bytes());
        let data = build_message("/a", "sf", &payload);
        assert_eq!(parse_message(&data).unwrap().numeric_args(), vec![1.0]);
    }

    #[test]
    fn message_without_type_tags_has_no_args() {
        let mut data = Vec::new();
        push_padded_string(&mut data, "/ping");
        let message = parse_message(&data).unwrap();
        assert_eq!(message.address, "/ping");
        assert!(message.args.is_empty());
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut data = build_message(
            "/buds/orientation",
            "ffff",
            &float_payload(&[0.1, 0.2, 0.3, 0.9]),
        );
        data.truncate(data.len() - 2);
        assert!(matches!(parse_message(&data), Err(OscError::Truncated)));
    }

    #[test]
    fn bundles_are_rejected() {
        let data = build_message("#bundle", "", &[]);
        assert!(matches!(parse_message(&data), Err(OscError::Bundle)));
    }

    #[test]
    fn address_padding_is_respected() {
        // A 4-character address gets a full extra pad block before the tags.
        let data = build_message("/osc", "f", &float_payload(&[2.5]));
        let message = parse_message(&data).unwrap();
        assert_eq!(message.address, "/osc");
        assert_eq!(message.args, vec![OscArg::Float(2.5)]);
    }
}
