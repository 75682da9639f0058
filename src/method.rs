use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

/// Taint role of an API method. At most one role applies to a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Source,
    Sink,
    /// Explicitly neither a source nor a sink (`_NONE_`).
    Neither,
    #[default]
    Unspecified,
}

impl Role {
    /// Maps a trailing role marker (`_SOURCE_`, `_SINK_`, `_NONE_`) to a role.
    pub fn from_marker(token: &str) -> Option<Self> {
        match token {
            "_SOURCE_" => Some(Self::Source),
            "_SINK_" => Some(Self::Sink),
            "_NONE_" => Some(Self::Neither),
            _ => None,
        }
    }

    /// The marker written after `->` for this role; `None` for `Unspecified`.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Self::Source => Some("_SOURCE_"),
            Self::Sink => Some("_SINK_"),
            Self::Neither => Some("_NONE_"),
            Self::Unspecified => None,
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != Self::Unspecified
    }
}

/// The identity of a method: declaring class, return type, name and parameter types.
///
/// `return_type` is empty for lines written without one (constructor-like signatures).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub class_name: String,
    #[serde(default)]
    pub return_type: String,
    pub method_name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl MethodSignature {
    pub fn new(
        class_name: impl Into<String>,
        return_type: impl Into<String>,
        method_name: impl Into<String>,
        parameters: Vec<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            return_type: return_type.into(),
            method_name: method_name.into(),
            parameters,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: ", self.class_name)?;
        if !self.return_type.is_empty() {
            write!(f, "{} ", self.return_type)?;
        }
        write!(f, "{}({})>", self.method_name, self.parameters.join(","))
    }
}

/// A method entry of a permission map.
///
/// Equality and hashing only look at the [`MethodSignature`]; permissions and
/// role are payload. Two entries for the same signature are the same method.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidMethod {
    #[serde(flatten)]
    signature: MethodSignature,
    #[serde(default)]
    permissions: BTreeSet<String>,
    #[serde(default)]
    role: Role,
}

impl AndroidMethod {
    pub fn new(signature: MethodSignature, permissions: BTreeSet<String>, role: Role) -> Self {
        Self { signature, permissions, role }
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn class_name(&self) -> &str {
        &self.signature.class_name
    }

    pub fn return_type(&self) -> &str {
        &self.signature.return_type
    }

    pub fn method_name(&self) -> &str {
        &self.signature.method_name
    }

    pub fn parameters(&self) -> &[String] {
        &self.signature.parameters
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_source(&self) -> bool {
        self.role == Role::Source
    }

    pub fn is_sink(&self) -> bool {
        self.role == Role::Sink
    }

    pub fn is_neither(&self) -> bool {
        self.role == Role::Neither
    }

    /// Combines two entries for the same signature into a new one.
    ///
    /// Permissions are unioned; the role of `self` wins unless it is unspecified.
    pub fn merged_with(self, other: AndroidMethod) -> Self {
        debug_assert_eq!(self.signature, other.signature);
        let role = if self.role.is_specified() { self.role } else { other.role };
        let mut permissions = self.permissions;
        permissions.extend(other.permissions);
        Self { signature: self.signature, permissions, role }
    }

    /// True when both entries carry the same permissions and role.
    pub fn same_payload(&self, other: &AndroidMethod) -> bool {
        self.permissions == other.permissions && self.role == other.role
    }
}

impl PartialEq for AndroidMethod {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for AndroidMethod {}

impl Hash for AndroidMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

// Lets a `HashSet<AndroidMethod>` be queried by signature alone.
impl Borrow<MethodSignature> for AndroidMethod {
    fn borrow(&self) -> &MethodSignature {
        &self.signature
    }
}

/// Renders the entry as a permission-map line.
impl fmt::Display for AndroidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)?;
        for permission in &self.permissions {
            write!(f, " {}", permission)?;
        }
        if let Some(marker) = self.role.marker() {
            write!(f, " -> {}", marker)?;
        }
        Ok(())
    }
}
