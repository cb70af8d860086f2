//! Export functions, one per [`ExportKind`].

use serde_json::{json, Map, Value};
use tracing::info;

use axp_bundle::ObjectInfo;
use axp_types::{ExportKind, ObjectKind};

use crate::error::ExportError;
use crate::info::ExportInfo;
use crate::json::write_json;
use crate::result::ExportResult;

/// The shape of every export function.
pub type ExportFn = fn(&ExportInfo<'_>) -> Result<ExportResult, ExportError>;

/// The static export table: which function an [`ExportKind`] runs.
pub fn export_function(kind: ExportKind) -> ExportFn {
    match kind {
        ExportKind::MonoBehaviour => export_mono_behaviour,
        ExportKind::GameObject => export_game_object,
        ExportKind::AnimatorController => export_animator_controller,
        ExportKind::AnimatorOverrideController => export_animator_override,
    }
}

fn field<'v>(tree: &'v Value, object: &str, name: &str) -> Result<&'v Value, ExportError> {
    tree.get(name).ok_or_else(|| ExportError::MissingField {
        object: object.to_string(),
        field: name.to_string(),
    })
}

fn path_id_of(value: &Value, object: &str, reference: &str) -> Result<i64, ExportError> {
    value
        .get("m_PathID")
        .and_then(Value::as_i64)
        .ok_or_else(|| ExportError::MissingField {
            object: object.to_string(),
            field: format!("{reference}.m_PathID"),
        })
}

/// Dump each `MonoBehaviour` object's field tree as JSON.
///
/// The trees are also returned as payloads for callers that post-process
/// them (the manifest export itself goes through here).
pub fn export_mono_behaviour(info: &ExportInfo<'_>) -> Result<ExportResult, ExportError> {
    let mut result = ExportResult::default();

    for obj_info in info.objects() {
        if obj_info.object.kind() != ObjectKind::MonoBehaviour {
            continue;
        }
        info!(
            "Exporting MonoBehaviour: {} ({})",
            obj_info.object.name(),
            obj_info.container
        );

        let tree = obj_info.object.read_type_tree()?;
        let path = info
            .export_dir_of(obj_info)?
            .join(format!("{}.json", obj_info.object.name()));
        write_json(&path, tree.clone())?;

        result.push_path(&path);
        result.payloads.push(tree);
    }

    Ok(result)
}

/// Assemble each `GameObject` with its resolved components into one
/// prefab-like JSON document.
pub fn export_game_object(info: &ExportInfo<'_>) -> Result<ExportResult, ExportError> {
    let mut result = ExportResult::default();

    for obj_info in info.objects() {
        if obj_info.object.kind() != ObjectKind::GameObject {
            continue;
        }
        let path = export_single_game_object(info, obj_info)?;
        result.push_path(&path);
    }

    Ok(result)
}

fn export_single_game_object(
    info: &ExportInfo<'_>,
    game_obj: &ObjectInfo,
) -> Result<std::path::PathBuf, ExportError> {
    let object_name = game_obj.object.name();
    let tree = game_obj.object.read_type_tree()?;

    let components = field(&tree, object_name, "m_Component")?
        .as_array()
        .cloned()
        .unwrap_or_default();

    let mut rendered = Vec::new();
    // The first component is always a Transform, which is omitted.
    for component in components.iter().skip(1) {
        let reference = field(component, object_name, "component")?;
        let path_id = path_id_of(reference, object_name, "component")?;

        let component_info = info.object_at(path_id, game_obj)?;
        let component_tree = component_info.object.read_type_tree()?;

        let script_path_id = component_tree
            .pointer("/m_Script/m_PathID")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let mut merged = Map::new();
        if script_path_id != 0 {
            // Attach the resolved script type name if available.
            let script = info.object_at(script_path_id, game_obj)?;
            merged.insert(
                "$Script".to_string(),
                Value::String(script.object.name().to_string()),
            );
        } else {
            let component_name = component_tree
                .get("m_Name")
                .cloned()
                .unwrap_or_else(|| Value::String(component_info.object.name().to_string()));
            merged.insert("$Name".to_string(), component_name);
        }
        if let Value::Object(component_map) = component_tree {
            merged.extend(component_map);
        }
        rendered.push(Value::Object(merged));
    }

    let tree_name = field(&tree, object_name, "m_Name")?
        .as_str()
        .unwrap_or(object_name)
        .to_string();
    let export = json!({"Name": tree_name, "Components": rendered});

    let path = info
        .export_dir_of(game_obj)?
        .join(format!("{tree_name}.prefab.json"));
    write_json(&path, export)?;
    Ok(path)
}

/// Dump each `AnimatorController` with its resolved animation clips.
pub fn export_animator_controller(info: &ExportInfo<'_>) -> Result<ExportResult, ExportError> {
    let mut result = ExportResult::default();

    for obj_info in info.objects() {
        if obj_info.object.kind() != ObjectKind::AnimatorController {
            continue;
        }
        let object_name = obj_info.object.name();
        info!(
            "Exporting AnimatorController: {object_name} ({})",
            obj_info.container
        );

        let tree = obj_info.object.read_type_tree()?;
        let clip_refs = field(&tree, object_name, "m_AnimationClips")?
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut clips = Vec::new();
        for clip_ref in &clip_refs {
            let clip_path_id = path_id_of(clip_ref, object_name, "m_AnimationClips")?;
            let clip = info.object_at(clip_path_id, obj_info)?;
            let clip_tree = clip.object.read_type_tree()?;
            let stop_time = clip_tree
                .pointer("/m_MuscleClip/m_StopTime")
                .cloned()
                .unwrap_or(Value::Null);

            clips.push(json!({
                "$PathID": clip_path_id,
                "$Name": clip.object.name(),
                "$StopTime": stop_time,
            }));
        }

        let export = json!({"$Controller": tree, "$Clips": clips});
        let path = info
            .export_dir_of(obj_info)?
            .join(format!("{object_name}.json"));
        write_json(&path, export)?;
        result.push_path(&path);
    }

    Ok(result)
}

/// Dump each `AnimatorOverrideController` with its overridden clips.
pub fn export_animator_override(info: &ExportInfo<'_>) -> Result<ExportResult, ExportError> {
    let mut result = ExportResult::default();

    for obj_info in info.objects() {
        if obj_info.object.kind() != ObjectKind::AnimatorOverrideController {
            continue;
        }
        let object_name = obj_info.object.name();
        info!(
            "Exporting AnimatorOverrideController: {object_name} ({})",
            obj_info.container
        );

        let tree = obj_info.object.read_type_tree()?;
        let clip_pairs = field(&tree, object_name, "m_Clips")?
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut clips = Vec::new();
        for pair in &clip_pairs {
            let override_ref = field(pair, object_name, "m_OverrideClip")?;
            let override_path_id = override_ref
                .get("m_PathID")
                .and_then(Value::as_i64)
                .unwrap_or(0);
            // No override recorded, nothing worth writing.
            if override_path_id == 0 {
                continue;
            }

            let clip = info.object_at(override_path_id, obj_info)?;
            let clip_tree = clip.object.read_type_tree()?;
            let stop_time = clip_tree
                .pointer("/m_MuscleClip/m_StopTime")
                .cloned()
                .unwrap_or(Value::Null);

            clips.push(json!({
                "$Name": clip.object.name(),
                "$OriginalClip": pair.get("m_OriginalClip").cloned().unwrap_or(Value::Null),
                "$OverrideClip": override_ref.clone(),
                "$StopTime": stop_time,
            }));
        }

        let export = json!({"$Name": object_name, "$Clips": clips});
        let path = info
            .export_dir_of(obj_info)?
            .join(format!("{object_name}.json"));
        write_json(&path, export)?;
        result.push_path(&path);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axp_bundle::{BundleObject, BundleSet, LoadedBundle};
    use std::fs;

    fn obj(
        path_id: i64,
        kind: ObjectKind,
        name: &str,
        container: Option<&str>,
        tree: Value,
    ) -> BundleObject {
        BundleObject::from_tree(path_id, kind, name, container.map(String::from), &tree)
    }

    fn run_export(
        set: &BundleSet,
        kind: ExportKind,
        export_dir: &std::path::Path,
    ) -> Result<ExportResult, ExportError> {
        let objects = set.objects_matching(kind.object_kinds(), None);
        let info = ExportInfo::new(export_dir, objects, set, &[]);
        export_function(kind)(&info)
    }

    #[test]
    fn mono_behaviour_export_writes_tree_per_object() {
        let dir = tempfile::tempdir().unwrap();
        let set = BundleSet::new(vec![LoadedBundle::new(
            "aa01",
            vec![obj(
                1,
                ObjectKind::MonoBehaviour,
                "master",
                Some("assets/master/data"),
                json!({"m_Name": "master", "entries": [1, 2]}),
            )],
        )]);

        let result = run_export(&set, ExportKind::MonoBehaviour, dir.path()).unwrap();
        assert_eq!(result.exported_paths.len(), 1);
        assert!(result.exported_paths[0].ends_with("assets/master/master.json"));
        assert_eq!(result.payloads.len(), 1);

        let written: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("assets/master/master.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written["m_Name"], "master");
    }

    #[test]
    fn game_object_export_resolves_components_and_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let main = LoadedBundle::new(
            "aa01",
            vec![
                obj(
                    1,
                    ObjectKind::GameObject,
                    "hero",
                    Some("assets/prefabs/hero"),
                    json!({
                        "m_Name": "hero",
                        "m_Component": [
                            {"component": {"m_PathID": 2}},
                            {"component": {"m_PathID": 3}},
                            {"component": {"m_PathID": 4}}
                        ]
                    }),
                ),
                obj(2, ObjectKind::Transform, "t", None, json!({})),
                obj(
                    3,
                    ObjectKind::MonoBehaviour,
                    "behaviour",
                    None,
                    json!({"m_Script": {"m_PathID": 10}, "speed": 2.5}),
                ),
                obj(
                    4,
                    ObjectKind::MonoBehaviour,
                    "plain",
                    None,
                    json!({"m_Name": "PlainComponent", "m_Script": {"m_PathID": 0}}),
                ),
            ],
        );
        let dependency = LoadedBundle::new(
            "bb02",
            vec![obj(10, ObjectKind::MonoScript, "HeroController", None, json!({}))],
        );
        let set = BundleSet::new(vec![main, dependency]);

        let result = run_export(&set, ExportKind::GameObject, dir.path()).unwrap();
        assert_eq!(result.exported_paths.len(), 1);

        let written: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("assets/prefabs/hero.prefab.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written["Name"], "hero");
        // Leading Transform omitted.
        let components = written["Components"].as_array().unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0]["$Script"], "HeroController");
        assert_eq!(components[0]["speed"], json!(2.5));
        assert_eq!(components[1]["$Name"], "PlainComponent");
    }

    #[test]
    fn game_object_export_fails_on_dangling_component() {
        let dir = tempfile::tempdir().unwrap();
        let set = BundleSet::new(vec![LoadedBundle::new(
            "aa01",
            vec![obj(
                1,
                ObjectKind::GameObject,
                "broken",
                Some("assets/broken"),
                json!({
                    "m_Name": "broken",
                    "m_Component": [
                        {"component": {"m_PathID": 2}},
                        {"component": {"m_PathID": 99}}
                    ]
                }),
            )],
        )]);

        let result = run_export(&set, ExportKind::GameObject, dir.path());
        assert!(matches!(
            result,
            Err(ExportError::ReferenceNotFound { path_id: 99, .. })
        ));
    }

    #[test]
    fn animator_controller_export_resolves_clips() {
        let dir = tempfile::tempdir().unwrap();
        let main = LoadedBundle::new(
            "aa01",
            vec![obj(
                1,
                ObjectKind::AnimatorController,
                "hero_anim",
                Some("assets/anim/hero"),
                json!({"m_AnimationClips": [{"m_PathID": 5}]}),
            )],
        );
        let dependency = LoadedBundle::new(
            "bb02",
            vec![obj(
                5,
                ObjectKind::AnimationClip,
                "walk",
                None,
                json!({"m_MuscleClip": {"m_StopTime": 1.25}}),
            )],
        );
        let set = BundleSet::new(vec![main, dependency]);

        let result = run_export(&set, ExportKind::AnimatorController, dir.path()).unwrap();
        assert_eq!(result.exported_paths.len(), 1);

        let written: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("assets/anim/hero_anim.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written["$Clips"][0]["$Name"], "walk");
        assert_eq!(written["$Clips"][0]["$PathID"], 5);
        assert_eq!(written["$Clips"][0]["$StopTime"], json!(1.25));
    }

    #[test]
    fn animator_override_export_skips_empty_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let main = LoadedBundle::new(
            "aa01",
            vec![obj(
                1,
                ObjectKind::AnimatorOverrideController,
                "hero_skin",
                Some("assets/anim/hero_skin"),
                json!({"m_Clips": [
                    {"m_OriginalClip": {"m_PathID": 7}, "m_OverrideClip": {"m_PathID": 8}},
                    {"m_OriginalClip": {"m_PathID": 9}, "m_OverrideClip": {"m_PathID": 0}}
                ]}),
            )],
        );
        let dependency = LoadedBundle::new(
            "bb02",
            vec![obj(
                8,
                ObjectKind::AnimationClip,
                "skin_walk",
                None,
                json!({"m_MuscleClip": {"m_StopTime": 0.5}}),
            )],
        );
        let set = BundleSet::new(vec![main, dependency]);

        let result = run_export(&set, ExportKind::AnimatorOverrideController, dir.path()).unwrap();
        let written: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("assets/anim/hero_skin.json")).unwrap(),
        )
        .unwrap();
        let clips = written["$Clips"].as_array().unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0]["$Name"], "skin_walk");
    }
}
