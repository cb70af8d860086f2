//! Object, export, and warning kind tags.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Type tag of one object inside an asset container.
///
/// These mirror the type names the container format itself uses; the reader
/// collaborator reports them verbatim, so the wire spelling is the variant
/// name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    MonoBehaviour,
    MonoScript,
    GameObject,
    Transform,
    AnimatorController,
    AnimatorOverrideController,
    AnimationClip,
    Texture2D,
    Sprite,
    Material,
    TextAsset,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Export flavor a sub-task runs.
///
/// Each kind selects one export function and the set of [`ObjectKind`]s the
/// function consumes. Image flavors are intentionally absent: codec work is
/// an external collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    /// Dump each `MonoBehaviour` object's field tree as JSON.
    MonoBehaviour,
    /// Assemble each `GameObject` with its resolved components into one
    /// prefab-like JSON document.
    GameObject,
    /// Dump each `AnimatorController` with its resolved animation clips.
    AnimatorController,
    /// Dump each `AnimatorOverrideController` with its overridden clips.
    AnimatorOverrideController,
}

impl ExportKind {
    /// The container object kinds this export flavor consumes.
    ///
    /// The working set handed to an export function is pre-filtered to these
    /// kinds; anything an exporter reaches beyond them goes through the
    /// cross-reference resolver instead.
    pub fn object_kinds(self) -> &'static [ObjectKind] {
        match self {
            ExportKind::MonoBehaviour => &[ObjectKind::MonoBehaviour],
            ExportKind::GameObject => &[
                ObjectKind::GameObject,
                ObjectKind::MonoBehaviour,
                ObjectKind::MonoScript,
            ],
            ExportKind::AnimatorController => &[ObjectKind::AnimatorController],
            ExportKind::AnimatorOverrideController => &[ObjectKind::AnimatorOverrideController],
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::str::FromStr for ExportKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MonoBehaviour" => Ok(ExportKind::MonoBehaviour),
            "GameObject" => Ok(ExportKind::GameObject),
            "AnimatorController" => Ok(ExportKind::AnimatorController),
            "AnimatorOverrideController" => Ok(ExportKind::AnimatorOverrideController),
            other => Err(TypeError::UnknownExportKind(other.to_string())),
        }
    }
}

/// Warnings a task configuration may suppress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// A task or sub-task matched zero exportable objects.
    NothingToExport,
    /// A material had no main texture to export.
    NoMainTexture,
}
