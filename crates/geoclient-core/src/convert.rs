// ── Wire → domain conversion ──
//
// Validates the loosely-typed context document into the domain model.
// Every rejection names the offending field by its document path.

use geoclient_api::{MapViewConfig, Projection, RawTreeNode};

use crate::error::CoreError;
use crate::model::{FolderNode, LeafNode, MapView, TreeNode};

const MAP_VIEW: &str = "clientConfig.mapView";

// ── Map view ─────────────────────────────────────────────────────

/// Validate `clientConfig.mapView`.
pub fn map_view(raw: Option<&MapViewConfig>) -> Result<MapView, CoreError> {
    let raw = raw.ok_or_else(|| CoreError::shape(MAP_VIEW, "missing"))?;

    let center = fixed::<2>(raw.center.as_deref(), "center")?;
    let extent = fixed::<4>(raw.extent.as_deref(), "extent")?;
    let projection = raw
        .projection
        .as_ref()
        .ok_or_else(|| CoreError::shape(format!("{MAP_VIEW}.projection"), "missing"))
        .and_then(normalize_projection)?;
    let zoom = raw
        .zoom
        .ok_or_else(|| CoreError::shape(format!("{MAP_VIEW}.zoom"), "missing"))?;

    Ok(MapView {
        center,
        extent,
        projection,
        resolutions: raw.resolutions.clone().unwrap_or_default(),
        zoom,
    })
}

fn fixed<const N: usize>(values: Option<&[f64]>, field: &str) -> Result<[f64; N], CoreError> {
    let values =
        values.ok_or_else(|| CoreError::shape(format!("{MAP_VIEW}.{field}"), "missing"))?;
    <[f64; N]>::try_from(values).map_err(|_| {
        CoreError::shape(
            format!("{MAP_VIEW}.{field}"),
            format!("expected {N} numbers, got {}", values.len()),
        )
    })
}

/// Prefix `EPSG:` unless the code already carries it.
pub fn normalize_projection(projection: &Projection) -> Result<String, CoreError> {
    let code = projection.to_string();
    let code = code.trim();
    if code.is_empty() {
        return Err(CoreError::shape(
            format!("{MAP_VIEW}.projection"),
            "empty projection code",
        ));
    }
    if code.contains("EPSG:") {
        Ok(code.to_owned())
    } else {
        Ok(format!("EPSG:{code}"))
    }
}

// ── Layer tree ───────────────────────────────────────────────────

/// Validate the root of `layerTree`. The root must be a folder.
pub fn layer_tree(raw: Option<&RawTreeNode>) -> Result<FolderNode, CoreError> {
    let raw = raw.ok_or_else(|| CoreError::shape("layerTree", "missing"))?;
    match tree_node(raw, "layerTree")? {
        TreeNode::Folder(folder) => Ok(folder),
        TreeNode::Leaf(_) => Err(CoreError::shape(
            "layerTree",
            "root node must declare children",
        )),
    }
}

fn tree_node(raw: &RawTreeNode, path: &str) -> Result<TreeNode, CoreError> {
    if let Some(children) = &raw.children {
        let children = children
            .iter()
            .enumerate()
            .map(|(i, child)| tree_node(child, &format!("{path}.children[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(TreeNode::Folder(FolderNode {
            title: raw.title.clone(),
            checked: raw.checked,
            children,
        }));
    }

    let layer_id = raw
        .layer_id
        .clone()
        .ok_or_else(|| CoreError::shape(format!("{path}.layerId"), "leaf node without layerId"))?;

    Ok(TreeNode::Leaf(LeafNode {
        layer_id,
        checked: raw.checked,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use geoclient_api::LayerId;
    use serde_json::json;

    fn view(value: serde_json::Value) -> MapViewConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn projection_prefix_added_once() {
        assert_eq!(
            normalize_projection(&Projection::Code(3857)).unwrap(),
            "EPSG:3857"
        );
        assert_eq!(
            normalize_projection(&Projection::Name("25832".into())).unwrap(),
            "EPSG:25832"
        );
        assert_eq!(
            normalize_projection(&Projection::Name("EPSG:4326".into())).unwrap(),
            "EPSG:4326"
        );
    }

    #[test]
    fn map_view_copies_values() {
        let v = map_view(Some(&view(json!({
            "center": [1.0, 2.0],
            "extent": [0.0, 0.0, 10.0, 10.0],
            "projection": "3857",
            "resolutions": [4.0, 2.0],
            "zoom": 1
        }))))
        .unwrap();

        assert_eq!(v.center, [1.0, 2.0]);
        assert_eq!(v.extent, [0.0, 0.0, 10.0, 10.0]);
        assert_eq!(v.projection, "EPSG:3857");
        assert_eq!(v.resolutions, vec![4.0, 2.0]);
    }

    #[test]
    fn map_view_missing_fields_are_shape_errors() {
        let err = map_view(None).unwrap_err();
        assert!(matches!(err, CoreError::ConfigShape { ref field, .. } if field == MAP_VIEW));

        let err = map_view(Some(&view(json!({
            "center": [1.0],
            "extent": [0.0, 0.0, 10.0, 10.0],
            "projection": "3857",
            "zoom": 1
        }))))
        .unwrap_err();
        assert!(
            matches!(err, CoreError::ConfigShape { ref field, .. } if field.ends_with("center"))
        );

        let err = map_view(Some(&view(json!({
            "center": [1.0, 2.0],
            "extent": [0.0, 0.0, 10.0, 10.0],
            "zoom": 1
        }))))
        .unwrap_err();
        assert!(
            matches!(err, CoreError::ConfigShape { ref field, .. } if field.ends_with("projection"))
        );
    }

    #[test]
    fn folder_iff_children_declared() {
        let raw: RawTreeNode = serde_json::from_value(json!({
            "title": "root",
            "checked": true,
            "children": [
                { "title": "empty", "checked": false, "children": [] },
                { "layerId": 5, "checked": true }
            ]
        }))
        .unwrap();

        let root = layer_tree(Some(&raw)).unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(matches!(&root.children[0], TreeNode::Folder(f) if f.children.is_empty()));
        assert!(
            matches!(&root.children[1], TreeNode::Leaf(l) if l.layer_id == LayerId::Numeric(5))
        );
        assert_eq!(root.leaf_count(), 1);
    }

    #[test]
    fn leaf_without_layer_id_reports_path() {
        let raw: RawTreeNode = serde_json::from_value(json!({
            "checked": true,
            "children": [ { "checked": true, "children": [ { "checked": true } ] } ]
        }))
        .unwrap();

        let err = layer_tree(Some(&raw)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ConfigShape { ref field, .. }
                if field == "layerTree.children[0].children[0].layerId"
        ));
    }

    #[test]
    fn leaf_root_rejected() {
        let raw: RawTreeNode = serde_json::from_value(json!({ "layerId": 1 })).unwrap();
        assert!(layer_tree(Some(&raw)).is_err());
    }
}
