//! Information entity - Facts that spread between people via Speak acts

use serde::{Deserialize, Serialize};

use crate::ids::InformationId;

/// How freely a piece of information may circulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Secrecy {
    /// Common knowledge; renderers may always display it.
    #[default]
    Public,
    /// Known only to holders; renderers hide it from other viewpoints.
    Private,
    /// Plot-critical secret; renderers flag any leak.
    Secret,
}

impl Secrecy {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Secret => "Secret",
        }
    }
}

/// A piece of information in the cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Information {
    id: InformationId,
    summary: String,
    secrecy: Secrecy,
}

impl Information {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            id: InformationId::new(),
            summary: summary.into(),
            secrecy: Secrecy::default(),
        }
    }

    pub fn with_secrecy(mut self, secrecy: Secrecy) -> Self {
        self.secrecy = secrecy;
        self
    }

    #[inline]
    pub fn id(&self) -> InformationId {
        self.id
    }

    #[inline]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[inline]
    pub fn secrecy(&self) -> Secrecy {
        self.secrecy
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
    }

    pub fn set_secrecy(&mut self, secrecy: Secrecy) {
        self.secrecy = secrecy;
    }
}
