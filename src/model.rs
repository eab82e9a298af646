use serde::Serialize;

/// One candidate implementation registered under a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternative {
    pub target: String,
    pub priority: i32,
}

/// Parsed contents of a registry record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Public link path, line 1 of the file.
    pub link: String,
    /// Entries in the order they appear in the file (append order).
    pub alternatives: Vec<Alternative>,
}

/// What currently sits at the public link path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum LinkState {
    Absent,
    Symlink(String),
    /// Exists but is not a symlink; never overwritten.
    Foreign,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Symlink(target) => write!(f, "symlink to {target}"),
            Self::Foreign => write!(f, "not a symlink"),
        }
    }
}

/// Parse a priority the way `atoi` does: optional leading whitespace and
/// sign, then the longest run of digits. Anything unparsable yields 0 and
/// out-of-range values saturate.
pub fn parse_priority(text: &str) -> i32 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value * 10 + i64::from(b - b'0');
        if value > i64::from(i32::MAX) + 1 {
            break;
        }
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Drop one trailing `\n` or `\r\n`, the same terminators `str::lines` strips.
pub fn strip_line_ending(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// First whitespace-separated field of an entry line.
pub fn entry_target(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Parse an entry line (`<target> <priority>`). Lines without both fields
/// are not entries.
pub fn parse_entry(line: &str) -> Option<Alternative> {
    let mut fields = line.split_whitespace();
    let target = fields.next()?;
    let priority = fields.next()?;
    Some(Alternative {
        target: target.to_string(),
        priority: parse_priority(priority),
    })
}

impl Record {
    /// Parse the full text of a record file.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines();
        let link = lines.next().unwrap_or_default().to_string();
        let alternatives = lines.filter_map(parse_entry).collect();
        Self { link, alternatives }
    }
}

impl Alternative {
    /// Serialized form, without the line terminator.
    pub fn to_line(&self) -> String {
        format!("{} {}", self.target, self.priority)
    }
}
