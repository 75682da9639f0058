//! Line-grammar parser for permission maps.
//!
//! Each line maps a method signature to the permissions it requires and,
//! optionally, a taint role:
//!
//! ```text
//! <android.telephony.SmsManager: void sendTextMessage(java.lang.String,java.lang.String)> android.permission.SEND_SMS
//! <android.location.Location: double getLatitude()> -> _SOURCE_
//! <java.net.URL: <init>(java.lang.String)>
//! <java.net.URLConnection: java.io.OutputStream getOutputStream()> android.permission.INTERNET -> _SINK_
//! ```
//!
//! Lines that fit neither form are skipped and reported. A matched line with
//! an unknown role marker aborts the whole parse.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::{DuplicatePolicy, ParserConfig};
use crate::error::{PermapError, Result};
use crate::method::{AndroidMethod, MethodSignature, Role};

const ARROW: &str = "->";

static WITH_RETURN_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<(?P<class>.+):\s*(?P<ret>.+)\s+(?P<name>.+)\s*\((?P<params>.*)\)>\s*(?P<trailing>.*?)(?P<arrow>\s+->\s+(?P<roles>.*))?$",
    )
    .expect("with-return-type pattern is valid")
});

static NO_RETURN_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<(?P<class>.+):\s*(?P<name>.+)\s*\((?P<params>.*)\)>\s*(?P<trailing>.*?)?(?P<arrow>\s+->\s+(?P<roles>.*))?$",
    )
    .expect("no-return-type pattern is valid")
});

/// One alternative shape of a permission-map line and how to read its return type.
pub struct LineForm {
    pub name: &'static str,
    pattern: &'static Lazy<Regex>,
    return_type: fn(&Captures<'_>) -> String,
}

/// Forms in matching order. The no-return-type pattern also accepts lines
/// that do have a return type (folding it into the method name), so the
/// stricter form must come first.
pub static LINE_FORMS: &[LineForm] = &[
    LineForm {
        name: "with-return-type",
        pattern: &WITH_RETURN_TYPE,
        return_type: captured_return_type,
    },
    LineForm {
        name: "no-return-type",
        pattern: &NO_RETURN_TYPE,
        return_type: no_return_type,
    },
];

fn captured_return_type(caps: &Captures<'_>) -> String {
    group(caps, "ret").trim().to_string()
}

fn no_return_type(_: &Captures<'_>) -> String {
    String::new()
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

impl LineForm {
    /// Matches `line` against this form.
    ///
    /// `None` when the line does not have this shape; `Some(Err(..))` when it
    /// does but carries an invalid role marker.
    pub fn parse(&self, line: &str, line_number: usize) -> Option<Result<AndroidMethod>> {
        let caps = self.pattern.captures(line)?;
        Some(self.extract(&caps, line, line_number))
    }

    fn extract(&self, caps: &Captures<'_>, line: &str, line_number: usize) -> Result<AndroidMethod> {
        let signature = MethodSignature {
            class_name: group(caps, "class").trim().to_string(),
            return_type: (self.return_type)(caps),
            method_name: group(caps, "name").trim().to_string(),
            parameters: split_parameters(group(caps, "params")),
        };

        let (permissions, role_text) = split_trailing(
            caps.name("trailing").map(|m| m.as_str()),
            caps.name("arrow").map(|m| m.as_str()),
        );
        let role = parse_roles(&role_text, line_number, line)?;

        Ok(AndroidMethod::new(signature, permissions, role))
    }
}

fn split_parameters(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return vec![];
    }
    raw.split(',').map(|p| p.trim().to_string()).collect()
}

/// Separates the text after `>` into permission tokens and role text.
///
/// If the first trailing capture contains an arrow, all of it is role data
/// and the line has no permissions. Otherwise it is the permission list, and
/// the explicit ` -> ...` suffix (if any) supplies the role.
fn split_trailing(trailing: Option<&str>, arrow: Option<&str>) -> (BTreeSet<String>, String) {
    let mut permission_text = trailing.unwrap_or("");
    let mut role_text = String::new();

    if permission_text.contains(ARROW) {
        role_text = permission_text.replace(ARROW, "").trim().to_string();
        permission_text = "";
    }

    let permissions = permission_text
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if role_text.is_empty() {
        if let Some(suffix) = arrow {
            role_text = suffix.replace(ARROW, "").trim().to_string();
        }
    }

    (permissions, role_text)
}

fn parse_roles(text: &str, line_number: usize, line: &str) -> Result<Role> {
    let mut role = Role::Unspecified;
    for token in text.split_whitespace() {
        let parsed = Role::from_marker(token).ok_or_else(|| PermapError::InvalidRole {
            line_number,
            token: token.to_string(),
            line: line.to_string(),
        })?;
        if role.is_specified() && role != parsed {
            return Err(PermapError::ConflictingRoles {
                line_number,
                first: role.marker().unwrap_or_default(),
                second: parsed.marker().unwrap_or_default(),
                line: line.to_string(),
            });
        }
        role = parsed;
    }
    Ok(role)
}

/// Parses one line against the forms in order.
///
/// `Ok(None)` means the line matched no form.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<AndroidMethod>> {
    for form in LINE_FORMS {
        if let Some(result) = form.parse(line, line_number) {
            tracing::trace!(form = form.name, line_number, "Line matched");
            return result.map(Some);
        }
    }
    Ok(None)
}

/// A line that matched neither form and was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based position in the input.
    pub line_number: usize,
    pub text: String,
}

/// Outcome of a parse: the method registry plus what was left out of it.
#[derive(Debug, Clone, Default)]
pub struct ParsedMap {
    pub methods: HashSet<AndroidMethod>,
    pub skipped: Vec<SkippedLine>,
    /// Lines whose signature was already present.
    pub duplicates: usize,
}

impl ParsedMap {
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn get(&self, signature: &MethodSignature) -> Option<&AndroidMethod> {
        self.methods.get(signature)
    }

    pub fn into_methods(self) -> HashSet<AndroidMethod> {
        self.methods
    }

    /// Methods ordered by signature, for stable output.
    pub fn sorted(&self) -> Vec<AndroidMethod> {
        let mut methods: Vec<AndroidMethod> = self.methods.iter().cloned().collect();
        methods.sort_by(|a, b| a.signature().cmp(b.signature()));
        methods
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.methods.iter().filter(|m| m.role() == role).count()
    }
}

/// Parser for permission-to-method maps.
///
/// Holds the input lines and a [`ParserConfig`]; parsing borrows `self`
/// immutably, so one parser can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PermissionMethodParser {
    lines: Vec<String>,
    config: ParserConfig,
}

impl PermissionMethodParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            config: ParserConfig::default(),
        }
    }

    /// Reads all lines from `reader`. `origin` names the source in I/O errors.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| PermissionMethodParser::io_error(origin, e))?;
        Ok(Self::from_lines(lines))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PermissionMethodParser::io_error(path, e))?;
        let parser = Self::from_reader(BufReader::new(file), path)?;
        tracing::debug!(path = %path.display(), lines = parser.lines.len(), "Read permission map");
        Ok(parser)
    }

    fn io_error(path: &Path, source: std::io::Error) -> PermapError {
        PermapError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Parses the lines this parser was built with.
    pub fn parse(&self) -> Result<ParsedMap> {
        self.parse_lines(&self.lines)
    }

    /// Parses `lines` with this parser's configuration.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<ParsedMap> {
        let mut map = ParsedMap {
            methods: HashSet::with_capacity(self.config.initial_capacity),
            ..Default::default()
        };

        for (idx, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let line_number = idx + 1;

            if self.config.skip_blank_lines && line.trim().is_empty() {
                continue;
            }

            match parse_line(line, line_number)? {
                Some(method) => self.insert(&mut map, method, line_number),
                None => {
                    tracing::warn!(line_number, line = %line, "Line does not match: {}", line);
                    map.skipped.push(SkippedLine {
                        line_number,
                        text: line.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            methods = map.methods.len(),
            skipped = map.skipped.len(),
            duplicates = map.duplicates,
            "Parsed permission map"
        );
        Ok(map)
    }

    fn insert(&self, map: &mut ParsedMap, method: AndroidMethod, line_number: usize) {
        match self.config.duplicates {
            DuplicatePolicy::KeepFirst => {
                if let Some(existing) = map.methods.get(method.signature()) {
                    map.duplicates += 1;
                    if !existing.same_payload(&method) {
                        tracing::debug!(
                            line_number,
                            signature = %method.signature(),
                            "Duplicate signature with different payload, keeping first"
                        );
                    }
                } else {
                    map.methods.insert(method);
                }
            }
            DuplicatePolicy::MergePermissions => match map.methods.take(method.signature()) {
                Some(existing) => {
                    map.duplicates += 1;
                    if existing.role().is_specified()
                        && method.role().is_specified()
                        && existing.role() != method.role()
                    {
                        tracing::warn!(
                            line_number,
                            signature = %method.signature(),
                            kept = ?existing.role(),
                            dropped = ?method.role(),
                            "Conflicting role for duplicate signature, keeping first"
                        );
                    }
                    map.methods.insert(existing.merged_with(method));
                }
                None => {
                    map.methods.insert(method);
                }
            },
        }
    }
}
