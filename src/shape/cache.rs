//! Memoized name → [`FieldPath`] resolution.
//!
//! Two levels per (shape, naming): the breadth-first name index of the shape, and the
//! descriptors resolved for each distinct ordered name list seen so far. Both are computed
//! outside the lock and inserted only if nobody beat us to it, so a racing builder simply
//! drops its copy. Entries are never evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use super::{FieldKind, FieldPath, Naming, Shape};

type NameIndex = HashMap<String, FieldPath>;
type ShapeKey = (usize, (u8, usize));

#[derive(Default)]
struct ShapeEntry {
    index: Option<Arc<NameIndex>>,
    descriptors: HashMap<Vec<String>, Arc<ShapeDescriptor>>,
}

static CACHE: LazyLock<RwLock<HashMap<ShapeKey, ShapeEntry>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));
static HITS: AtomicUsize = AtomicUsize::new(0);
static MISSES: AtomicUsize = AtomicUsize::new(0);

/// Field paths for one ordered list of names against one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDescriptor {
    shape: &'static str,
    names: Vec<String>,
    paths: Vec<FieldPath>,
}

impl ShapeDescriptor {
    /// Name of the record type this was resolved against.
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        self.shape
    }

    /// One path per requested name, same order; unresolvable names get an empty path.
    #[must_use]
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// The first name that resolved to nothing.
    #[must_use]
    pub fn first_missing(&self) -> Option<&str> {
        self.paths
            .iter()
            .position(FieldPath::is_empty)
            .map(|i| self.names[i].as_str())
    }
}

/// Snapshot of cache activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Descriptors currently held, across all shapes.
    pub size: usize,
}

#[must_use]
pub fn cache_stats() -> CacheStats {
    let cache = match CACHE.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    CacheStats {
        hits: HITS.load(Ordering::Relaxed),
        misses: MISSES.load(Ordering::Relaxed),
        size: cache.values().map(|entry| entry.descriptors.len()).sum(),
    }
}

/// Breadth-first walk of `shape`; the first (shallowest) field to claim a name keeps it.
fn build_index(shape: &'static Shape, naming: Naming) -> NameIndex {
    let mut index = NameIndex::new();
    let mut queue: VecDeque<(&'static Shape, Vec<usize>, String)> =
        VecDeque::from([(shape, Vec::new(), String::new())]);

    while let Some((shape, parent, prefix)) = queue.pop_front() {
        for (i, field) in shape.fields.iter().enumerate() {
            if field.is_excluded() {
                continue;
            }
            let mut path = parent.clone();
            path.push(i);
            match field.kind {
                FieldKind::Value => {
                    let name = format!("{prefix}{}", field.external_name(naming));
                    index.entry(name).or_insert_with(|| FieldPath::new(path));
                }
                FieldKind::Embedded(sub) => queue.push_back((sub(), path, prefix.clone())),
                FieldKind::Nested(sub) => {
                    let nested = format!("{prefix}{}.", field.external_name(naming));
                    queue.push_back((sub(), path, nested));
                }
            }
        }
    }

    index
}

fn lookup(key: ShapeKey, names: &[String]) -> (Option<Arc<ShapeDescriptor>>, Option<Arc<NameIndex>>) {
    let cache = match CACHE.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    match cache.get(&key) {
        Some(entry) => (entry.descriptors.get(names).cloned(), entry.index.clone()),
        None => (None, None),
    }
}

/// Resolve `names` against `shape` under `naming`, memoized for the life of the process.
///
/// Names that match no field get an empty [`FieldPath`]; callers decide whether that is an
/// error. Concurrent callers may each build the same descriptor; all of them get the one that
/// was stored first.
#[must_use]
pub fn resolve_paths(shape: &'static Shape, naming: Naming, names: &[String]) -> Arc<ShapeDescriptor> {
    let key = (shape.key(), naming.cache_key());

    let (found, index) = lookup(key, names);
    if let Some(descriptor) = found {
        HITS.fetch_add(1, Ordering::Relaxed);
        return descriptor;
    }
    MISSES.fetch_add(1, Ordering::Relaxed);

    let index = index.unwrap_or_else(|| Arc::new(build_index(shape, naming)));
    let descriptor = Arc::new(ShapeDescriptor {
        shape: shape.name,
        names: names.to_vec(),
        paths: names
            .iter()
            .map(|name| index.get(name).cloned().unwrap_or_default())
            .collect(),
    });
    tracing::debug!(
        shape = shape.name,
        names = names.len(),
        indexed = index.len(),
        "built shape descriptor"
    );

    let mut cache = match CACHE.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let entry = cache.entry(key).or_default();
    entry.index.get_or_insert(index);
    Arc::clone(
        entry
            .descriptors
            .entry(names.to_vec())
            .or_insert(descriptor),
    )
}
