use crate::point::Point;

/// Selects the scanning strategy a drain runs over the buffered bytes.
///
/// Both modes produce identical batches on well-formed input; they differ
/// in how tolerant tokenization is and in how a record group ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Whitespace-tokenized parsing. Accepts arbitrary whitespace runs
    /// between tokens and treats a non-whitespace control byte after a
    /// complete record as an end-of-record-group marker.
    Strict,
    /// Zero-copy numeric extent scanning: three consecutive numbers per
    /// record, stopping at the first byte no number can start from.
    #[default]
    Fast,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Decoded {
    pub(crate) points: Vec<Point>,
    /// Offset of the first unconsumed byte. Everything past it belongs to
    /// the next accumulation cycle.
    pub(crate) consumed: usize,
}

/// Decodes as many complete 3-coordinate records as `input` allows.
///
/// Consumption is per record: the coordinates of a record that does not
/// complete within the span are rewound, so `consumed` always sits on a
/// record boundary. A numeric token that runs into the end of the span is
/// treated as possibly truncated and is never consumed; re-running the
/// decoder on `retained ++ appended` yields exactly the records a single
/// contiguous decode would have produced.
pub(crate) fn decode_records(input: &[u8], mode: DecodeMode) -> Decoded {
    match mode {
        DecodeMode::Strict => decode_strict(input),
        DecodeMode::Fast => decode_fast(input),
    }
}

fn decode_fast(input: &[u8]) -> Decoded {
    let mut points = Vec::new();
    let mut pos = 0;
    loop {
        let record_start = pos;
        let mut cursor = pos;
        let mut coords = [0.0f64; 3];
        let mut complete = true;
        for slot in &mut coords {
            cursor = skip_whitespace(input, cursor);
            match scan_number(input, cursor) {
                Some((value, next)) => {
                    *slot = value;
                    cursor = next;
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            return Decoded {
                points,
                consumed: record_start,
            };
        }
        points.push(Point::new(coords[0], coords[1], coords[2]));
        pos = cursor;
    }
}

fn decode_strict(input: &[u8]) -> Decoded {
    let mut points = Vec::new();
    let mut pos = 0;
    loop {
        let record_start = pos;
        let mut cursor = pos;
        let mut coords = [0.0f64; 3];
        let mut complete = true;
        for slot in &mut coords {
            match scan_token(input, cursor) {
                Some((value, next)) => {
                    *slot = value;
                    cursor = next;
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            return Decoded {
                points,
                consumed: record_start,
            };
        }
        points.push(Point::new(coords[0], coords[1], coords[2]));
        pos = cursor;

        // A non-whitespace control byte after a complete record closes the
        // group: consume surrounding whitespace plus the marker and stop.
        let after_ws = skip_whitespace(input, pos);
        if let Some(&byte) = input.get(after_ws) {
            if byte.is_ascii_control() {
                pos = skip_whitespace(input, after_ws + 1);
                return Decoded {
                    points,
                    consumed: pos,
                };
            }
        }
    }
}

fn skip_whitespace(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && input[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Scans one number starting exactly at `pos` by taking the longest run of
/// bytes a float literal can be made of and parsing that subslice in place.
/// Returns `None` when the run is empty, malformed, or reaches the end of
/// the span (possibly truncated, so it must be retained).
fn scan_number(input: &[u8], pos: usize) -> Option<(f64, usize)> {
    let mut end = pos;
    while end < input.len() && is_numeric_byte(input[end]) {
        end += 1;
    }
    if end == pos || end == input.len() {
        return None;
    }
    let token = std::str::from_utf8(&input[pos..end]).ok()?;
    let value = token.parse::<f64>().ok()?;
    Some((value, end))
}

fn is_numeric_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E')
}

/// Reads one whitespace-delimited token, skipping leading whitespace.
/// Returns `None` when the span is exhausted, the token is not terminated
/// within it, or it does not parse as a float.
fn scan_token(input: &[u8], pos: usize) -> Option<(f64, usize)> {
    let start = skip_whitespace(input, pos);
    let mut end = start;
    while end < input.len() && !input[end].is_ascii_whitespace() {
        end += 1;
    }
    if end == start || end == input.len() {
        return None;
    }
    let token = std::str::from_utf8(&input[start..end]).ok()?;
    let value = token.parse::<f64>().ok()?;
    Some((value, end))
}
