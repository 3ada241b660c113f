use serde::Serialize;

use crate::topology::NodeId;

pub type Path = Vec<NodeId>;

/// A routing requirement declared by an operator.
///
/// `Simple` and `PathPreference` both name a single "primary" path that must
/// strictly dominate every other candidate path; `ECMP` instead names a set of
/// paths that must tie for shortest and exclude every other candidate.
///
/// Loaded from the positional `(protocol, kind, src, dst, path_or_paths, [secondary])`
/// array shape via `loader::load_intents`, not `#[derive(Deserialize)]` directly —
/// the wire format is a tuple, not a tagged object.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum IntentKind {
    #[serde(rename = "simple")]
    Simple { path: Path },
    #[serde(rename = "path_preference")]
    PathPreference { primary: Path, secondary: Path },
    #[serde(rename = "ECMP")]
    Ecmp { paths: Vec<Path> },
}

impl IntentKind {
    pub fn label(&self) -> &'static str {
        match self {
            IntentKind::Simple { .. } => "simple",
            IntentKind::PathPreference { .. } => "path_preference",
            IntentKind::Ecmp { .. } => "ECMP",
        }
    }

    pub fn min_paths(&self) -> usize {
        match self {
            IntentKind::Simple { .. } => 1,
            IntentKind::PathPreference { .. } => 2,
            IntentKind::Ecmp { .. } => 2,
        }
    }

    pub fn declared_paths(&self) -> Vec<&Path> {
        match self {
            IntentKind::Simple { path } => vec![path],
            IntentKind::PathPreference { primary, secondary } => vec![primary, secondary],
            IntentKind::Ecmp { paths } => paths.iter().collect(),
        }
    }

    pub fn primary_path(&self) -> &Path {
        match self {
            IntentKind::Simple { path } => path,
            IntentKind::PathPreference { primary, .. } => primary,
            IntentKind::Ecmp { paths } => &paths[0],
        }
    }

    pub fn src_dst(&self) -> (NodeId, NodeId) {
        let p = self.primary_path();
        (p[0].clone(), p[p.len() - 1].clone())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.declared_paths().into_iter().flatten()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Intent {
    pub id: String,
    #[serde(flatten)]
    pub kind: IntentKind,
}

/// Dense 1-based index assigned to each intent for the duration of a run, matching
/// the literal numbering used by the seed generator and the SMT/SAT backends.
pub type IntentIndex = usize;

#[derive(Debug, Clone)]
pub struct IntentSet {
    intents: Vec<Intent>,
}

impl IntentSet {
    pub fn new(intents: Vec<Intent>) -> Self {
        Self { intents }
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// 1-based index lookup.
    pub fn get(&self, index: IntentIndex) -> &Intent {
        &self.intents[index - 1]
    }

    pub fn iter_indexed(&self) -> impl Iterator<Item = (IntentIndex, &Intent)> {
        self.intents.iter().enumerate().map(|(i, it)| (i + 1, it))
    }

    pub fn id_of(&self, index: IntentIndex) -> &str {
        &self.get(index).id
    }

    pub fn ids_of(&self, subset: &[IntentIndex]) -> Vec<String> {
        subset.iter().map(|&i| self.id_of(i).to_string()).collect()
    }
}
