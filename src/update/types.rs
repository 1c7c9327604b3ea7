use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::errors::DocError;

/// Update modifiers understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    #[serde(rename = "$set")]
    Set,
    #[serde(rename = "$unset")]
    Unset,
    #[serde(rename = "$rename")]
    Rename,
    #[serde(rename = "$inc")]
    Inc,
    #[serde(rename = "$pop")]
    Pop,
    #[serde(rename = "$push")]
    Push,
    #[serde(rename = "$pushAll")]
    PushAll,
    #[serde(rename = "$pull")]
    Pull,
    #[serde(rename = "$pullAll")]
    PullAll,
    #[serde(rename = "$addToSet")]
    AddToSet,
}

impl Modifier {
    pub const ALL: [Self; 10] = [
        Self::Set,
        Self::Unset,
        Self::Rename,
        Self::Inc,
        Self::Pop,
        Self::Push,
        Self::PushAll,
        Self::Pull,
        Self::PullAll,
        Self::AddToSet,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Set => "$set",
            Self::Unset => "$unset",
            Self::Rename => "$rename",
            Self::Inc => "$inc",
            Self::Pop => "$pop",
            Self::Push => "$push",
            Self::PushAll => "$pushAll",
            Self::Pull => "$pull",
            Self::PullAll => "$pullAll",
            Self::AddToSet => "$addToSet",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed update document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    pub groups: Vec<ModifierGroup>,
}

/// One modifier with its `path: operand` pairs, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierGroup {
    pub modifier: Modifier,
    pub fields: Vec<(String, Bson)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayEnd {
    Front,
    Back,
}

/// A planned mutation. Paths are absolute once the orchestrator has rebased them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write `value`, creating intermediate objects.
    SetAt { path: String, value: Bson },
    /// Remove the field (array slots become holes).
    DeleteAt { path: String },
    /// Move a field to another path. The change log records `to` as the
    /// full target path, so a positional rename logs `users.1.uid` rather
    /// than the bare `uid` operand.
    MoveAt { from: String, to: String },
    /// Add `delta` to the number at `path`, or initialise it to `delta`.
    IncAt { path: String, delta: Bson },
    /// Remove one element from an end of the array at `path`.
    PopAt { path: String, end: ArrayEnd },
    /// Remove the elements at `indices` (ascending) from the array at `path`.
    SpliceOut { path: String, indices: Vec<usize> },
    /// Append `values`, creating the array when absent. `many` selects whether
    /// the logged value is the whole list or its single element.
    AppendAt { path: String, values: Vec<Bson>, many: bool },
}

impl Effect {
    /// Prefix every path with `base.`.
    #[must_use]
    pub fn rebase(self, base: &str) -> Self {
        let join = |p: String| format!("{base}.{p}");
        match self {
            Self::SetAt { path, value } => Self::SetAt { path: join(path), value },
            Self::DeleteAt { path } => Self::DeleteAt { path: join(path) },
            Self::MoveAt { from, to } => Self::MoveAt { from: join(from), to: join(to) },
            Self::IncAt { path, delta } => Self::IncAt { path: join(path), delta },
            Self::PopAt { path, end } => Self::PopAt { path: join(path), end },
            Self::SpliceOut { path, indices } => Self::SpliceOut { path: join(path), indices },
            Self::AppendAt { path, values, many } => {
                Self::AppendAt { path: join(path), values, many }
            }
        }
    }
}

/// An effect annotated with the modifier that planned it and the literal key it touches.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub op: Modifier,
    pub key: String,
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeLogEntry {
    pub op: Modifier,
    pub key: String,
    pub value: Option<Bson>,
}

pub type ChangeLog = Vec<ChangeLogEntry>;

/// Options for `apply_update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateOptions {
    /// Only modify the document when the query matches.
    pub strict: bool,
}

impl UpdateOptions {
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    /// # Errors
    /// Returns an error if the JSON cannot be parsed into options.
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        Ok(serde_json::from_str(json)?)
    }
}
