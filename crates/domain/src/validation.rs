//! Validation results for act preconditions
//!
//! Precondition failures are expected authoring-flow outcomes, so they travel
//! as values, never as `Err`. A check enumerates *every* violated rule in a
//! stable order; callers rely on the complete list for diagnostics.

use serde::{Deserialize, Serialize};

use crate::ids::EntityRef;

/// Machine-readable reason an act precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    ActorNotFound,
    ActorNotAtSource,
    NoConnection,
    SpeakerNotFound,
    RecipientNotFound,
    SpeakerLacksKnowledge,
    RecipientNotPresent,
    SelfSpeak,
    ItemNotFound,
    ItemNotHeld,
    ItemNotAtLocation,
    ItemNotPortable,
    ItemConsumed,
    GiverNotWithRecipient,
    SameItemCombine,
}

impl ViolationCode {
    /// Stable wire/display name for the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActorNotFound => "ACTOR_NOT_FOUND",
            Self::ActorNotAtSource => "ACTOR_NOT_AT_SOURCE",
            Self::NoConnection => "NO_CONNECTION",
            Self::SpeakerNotFound => "SPEAKER_NOT_FOUND",
            Self::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            Self::SpeakerLacksKnowledge => "SPEAKER_LACKS_KNOWLEDGE",
            Self::RecipientNotPresent => "RECIPIENT_NOT_PRESENT",
            Self::SelfSpeak => "SELF_SPEAK",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::ItemNotHeld => "ITEM_NOT_HELD",
            Self::ItemNotAtLocation => "ITEM_NOT_AT_LOCATION",
            Self::ItemNotPortable => "ITEM_NOT_PORTABLE",
            Self::ItemConsumed => "ITEM_CONSUMED",
            Self::GiverNotWithRecipient => "GIVER_NOT_WITH_RECIPIENT",
            Self::SameItemCombine => "SAME_ITEM_COMBINE",
        }
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single violated precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub code: ViolationCode,
    pub message: String,
    /// Entities a UI should highlight for this violation.
    pub involved: Vec<EntityRef>,
    /// Optional remediation hint for the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Violation {
    pub fn new(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            involved: Vec::new(),
            suggestion: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<EntityRef>) -> Self {
        self.involved.push(entity.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of a precondition check.
///
/// # Invariants
///
/// - `valid` is true exactly when `errors` is empty (maintained by every
///   constructor and mutator; the field is stored so serialized results carry
///   it explicitly for consumers that only look at the flag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<Violation>,
}

impl ValidationResult {
    /// A passing result with no violations.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_violations(errors: Vec<Violation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn push(&mut self, violation: Violation) {
        self.errors.push(violation);
        self.valid = false;
    }

    /// Append all violations from `other`, preserving order.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.valid = self.errors.is_empty();
    }

    /// True when `code` appears among the violations.
    pub fn has_code(&self, code: ViolationCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}
