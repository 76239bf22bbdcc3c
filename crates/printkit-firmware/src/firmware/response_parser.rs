//! Firmware status-line tokenizer
//!
//! Firmware answers with loosely delimited lines such as
//! `ok T:201.3 /210.0 B:59.8 /60.0 T0:201.3 /210.0 @:64 B@:127`.
//! A token is an identifier immediately followed by `:` and a value that
//! runs to the next space or the end of the line. A token only counts when
//! it starts the line or follows a space, so the bare `T:` key can never
//! match inside `T0:` and `X:` never matches inside `MX:`.

/// Tokens of one firmware line, in line order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseTokens<'a> {
    tokens: Vec<(&'a str, &'a str)>,
}

impl<'a> ResponseTokens<'a> {
    /// Scan a line in a single pass over its space-delimited fields
    pub fn scan(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let tokens = line
            .split(' ')
            .filter_map(|field| {
                let (key, value) = field.split_once(':')?;
                if key.is_empty() {
                    None
                } else {
                    Some((key, value))
                }
            })
            .collect();
        Self { tokens }
    }

    /// Raw value of the first token with this key
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.tokens
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }

    /// Whether a token with this key is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Leading numeric value of a token
    pub fn number(&self, key: &str) -> Option<f64> {
        let raw = self.get(key)?;
        let value = leading_number(raw);
        if value.is_none() {
            tracing::trace!("Ignoring non-numeric value '{}' for {}", raw, key);
        }
        value
    }

    /// Leading numeric value of a token, truncated to an integer
    pub fn integer(&self, key: &str) -> Option<i32> {
        self.number(key).map(|v| v as i32)
    }

    /// Number of tokens found
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the line carried no tokens at all
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parse the longest numeric prefix of `text`
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent. Trailing garbage such as `/210.0` is ignored. Returns
/// `None` when no digit is found.
pub fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}
