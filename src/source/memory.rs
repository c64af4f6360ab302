use crate::foundation::error::CopGifResult;
use crate::raster::raster::Raster;
use crate::source::provider::ImageSource;
use std::collections::BTreeMap;

const TIME_EPSILON: f64 = 1e-6;

#[derive(Debug, Default)]
struct MemoryNode {
    image_bearing: bool,
    planes: BTreeMap<String, Vec<(f64, Raster)>>,
}

/// In-memory image source for tests, previews and embedding.
///
/// Nodes are addressed by absolute paths (`/img/comp1`). Relative paths are resolved against the
/// root, and trailing slashes are ignored. A raster is found when its registered time is within
/// a microsecond of the requested time.
#[derive(Debug, Default)]
pub struct InMemorySource {
    nodes: BTreeMap<String, MemoryNode>,
    resolved: usize,
    released: usize,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `raster` as plane `plane` of node `path` at `time`.
    pub fn add_raster(&mut self, path: &str, plane: &str, time: f64, raster: Raster) -> &mut Self {
        let node = self.nodes.entry(normalize_path(path)).or_default();
        node.image_bearing = true;
        node.planes
            .entry(plane.to_string())
            .or_default()
            .push((time, raster));
        self
    }

    /// Builder-style [`InMemorySource::add_raster`].
    pub fn with_raster(mut self, path: &str, plane: &str, time: f64, raster: Raster) -> Self {
        self.add_raster(path, plane, time, raster);
        self
    }

    /// Register a node that exists but cannot produce rasters.
    pub fn add_plain_node(&mut self, path: &str) -> &mut Self {
        self.nodes.entry(normalize_path(path)).or_default();
        self
    }

    /// Number of rasters handed out so far.
    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    /// Number of rasters returned so far.
    pub fn released_count(&self) -> usize {
        self.released
    }

    /// Rasters currently lent out.
    pub fn outstanding(&self) -> usize {
        self.resolved.saturating_sub(self.released)
    }
}

impl ImageSource for InMemorySource {
    fn full_path(&self, path: &str) -> Option<String> {
        let full = normalize_path(path);
        self.nodes
            .get(&full)
            .filter(|node| node.image_bearing)
            .map(|_| full)
    }

    fn resolve_raster(
        &mut self,
        full_path: &str,
        plane: &str,
        time: f64,
    ) -> CopGifResult<Option<Raster>> {
        let found = self
            .nodes
            .get(full_path)
            .and_then(|node| node.planes.get(plane))
            .and_then(|rasters| {
                rasters
                    .iter()
                    .find(|(t, _)| (t - time).abs() <= TIME_EPSILON)
                    .map(|(_, r)| r.clone())
            });
        if found.is_some() {
            self.resolved += 1;
        }
        Ok(found)
    }

    fn release(&mut self, _raster: Raster) {
        self.released += 1;
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/memory.rs"]
mod tests;
