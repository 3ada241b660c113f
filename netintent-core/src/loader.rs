use std::collections::BTreeMap;
use std::path::Path as FsPath;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LoadError;
use crate::intent::{Intent, IntentKind, IntentSet, Path as NodePath};
use crate::topology::{Link, NodeId, Topology};

#[derive(Debug, Deserialize)]
struct RawNodeRef {
    name: NodeId,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    node1: RawNodeRef,
    node2: RawNodeRef,
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(default)]
    routers: Vec<Value>,
    links: Vec<RawLink>,
}

pub fn load_topology(path: &FsPath) -> Result<Topology, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Malformed(format!("reading {}: {e}", path.display())))?;
    let raw: RawTopology = serde_json::from_str(&text).map_err(|e| LoadError::Malformed(format!("parsing topology json: {e}")))?;

    let links: Vec<Link> = raw
        .links
        .into_iter()
        .map(|l| Link {
            node1: l.node1.name,
            node2: l.node2.name,
        })
        .collect();

    let mut routers: Vec<NodeId> = raw
        .routers
        .into_iter()
        .filter_map(|v| v.get("name").and_then(|n| n.as_str()).map(str::to_string))
        .collect();
    for link in &links {
        if !routers.contains(&link.node1) {
            routers.push(link.node1.clone());
        }
        if !routers.contains(&link.node2) {
            routers.push(link.node2.clone());
        }
    }

    Ok(Topology { routers, links })
}

/// One intent record in its wire shape: a positional array
/// `[protocol, kind, src, dst, path_or_paths, secondary_path?]`.
fn parse_intent(id: &str, raw: &Value) -> Result<Intent, LoadError> {
    let arr = raw
        .as_array()
        .ok_or_else(|| LoadError::Malformed(format!("intent {id:?} is not an array")))?;
    let field = |i: usize| -> Result<&Value, LoadError> {
        arr.get(i)
            .ok_or_else(|| LoadError::Malformed(format!("intent {id:?} is missing field {i}")))
    };
    let kind_str = field(1)?
        .as_str()
        .ok_or_else(|| LoadError::Malformed(format!("intent {id:?} field 1 (kind) is not a string")))?;

    let parse_path = |v: &Value| -> Result<NodePath, LoadError> {
        v.as_array()
            .ok_or_else(|| LoadError::Malformed(format!("intent {id:?} has a non-array path")))?
            .iter()
            .map(|n| {
                n.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| LoadError::Malformed(format!("intent {id:?} has a non-string node name")))
            })
            .collect()
    };

    let kind = match kind_str {
        "path_preference" => {
            let primary = parse_path(field(4)?)?;
            let secondary = parse_path(field(5)?)?;
            IntentKind::PathPreference { primary, secondary }
        }
        "ECMP" => {
            let raw_paths = field(4)?;
            let paths: Vec<NodePath> = raw_paths
                .as_array()
                .ok_or_else(|| LoadError::Malformed(format!("intent {id:?} ECMP field 4 is not an array of paths")))?
                .iter()
                .map(parse_path)
                .collect::<Result<_, _>>()?;
            if paths.len() < 2 {
                return Err(LoadError::TooFewPaths {
                    intent_id: id.to_string(),
                    kind: "ECMP",
                    count: paths.len(),
                    min: 2,
                });
            }
            IntentKind::Ecmp { paths }
        }
        "simple" | "any_path" | "Any_path" => {
            let raw_path = field(4)?;
            // A lone path or a single-element list of one path are both accepted.
            let path = if raw_path.as_array().map(|a| a.first().map(|f| f.is_array()).unwrap_or(false)).unwrap_or(false) {
                parse_path(&raw_path[0])?
            } else {
                parse_path(raw_path)?
            };
            IntentKind::Simple { path }
        }
        other => {
            return Err(LoadError::Malformed(format!("intent {id:?} has unknown kind {other:?}")));
        }
    };

    Ok(Intent { id: id.to_string(), kind })
}

pub fn load_intents(path: &FsPath) -> Result<IntentSet, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Malformed(format!("reading {}: {e}", path.display())))?;
    let raw: BTreeMap<String, Value> = serde_json::from_str(&text).map_err(|e| LoadError::Malformed(format!("parsing intents json: {e}")))?;

    let mut intents = Vec::with_capacity(raw.len());
    for (id, value) in raw {
        intents.push(parse_intent(&id, &value)?);
    }
    Ok(IntentSet::new(intents))
}

/// Fails fast if any intent names a node the topology does not contain.
pub fn validate_references(topology: &Topology, intents: &IntentSet) -> Result<(), LoadError> {
    let known = topology.node_set();
    for (_, intent) in intents.iter_indexed() {
        for node in intent.kind.nodes() {
            if !known.contains(node) {
                return Err(LoadError::UnknownNode {
                    intent_id: intent.id.clone(),
                    node: node.clone(),
                });
            }
        }
    }
    Ok(())
}
