//! Shared types for the event pipeline.

/// Milestones an event passes through, in order.
///
/// Bracketed stages in the flow below are conditional:
/// `Received → ScopeChecked → [NotifiedDiscovery] → [Copied → NotifiedCopy]
/// → [Deleted → NotifiedDelete] → [RelayedToChat] → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStage {
    Received,
    ScopeChecked,
    NotifiedDiscovery,
    Copied,
    NotifiedCopy,
    Deleted,
    NotifiedDelete,
    RelayedToChat,
    Done,
}

impl std::fmt::Display for EventStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::ScopeChecked => "scope_checked",
            Self::NotifiedDiscovery => "notified_discovery",
            Self::Copied => "copied",
            Self::NotifiedCopy => "notified_copy",
            Self::Deleted => "deleted",
            Self::NotifiedDelete => "notified_delete",
            Self::RelayedToChat => "relayed_to_chat",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Result of processing one event successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Bucket or prefix did not match. Nothing was done.
    OutOfScope,
    /// Every enabled step ran.
    Completed {
        destination_key: String,
        stages: Vec<EventStage>,
    },
}

impl EventOutcome {
    pub fn stages(&self) -> &[EventStage] {
        match self {
            Self::OutOfScope => &[],
            Self::Completed { stages, .. } => stages,
        }
    }

    pub fn is_in_scope(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}
