//! Collecting the bracket body and rib solids into one compound.

use holder_kernel_sweep::TriangleMesh;

use crate::generate::{Generation, Rib, RibId};

/// The body plus every built rib, kept as separate solids.
///
/// No booleans are applied: the compound is the union only in the sense
/// of a multi-body part.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    body: Option<TriangleMesh>,
    ribs: Vec<Rib>,
}

impl Assembly {
    /// Assemble `body` with the ribs of a generation run.
    pub fn new(body: Option<TriangleMesh>, generation: &Generation) -> Self {
        Self {
            body,
            ribs: generation.ribs.clone(),
        }
    }

    /// Externally supplied bracket body.
    pub fn body(&self) -> Option<&TriangleMesh> {
        self.body.as_ref()
    }

    /// Rib solids in plan order.
    pub fn ribs(&self) -> &[Rib] {
        &self.ribs
    }

    /// Whether rib `id` made it into the compound.
    pub fn contains(&self, id: RibId) -> bool {
        self.ribs.iter().any(|r| r.id == id)
    }

    /// Number of solids, body included.
    pub fn solid_count(&self) -> usize {
        self.ribs.len() + usize::from(self.body.is_some())
    }

    /// True when no rib was built.
    pub fn is_body_only(&self) -> bool {
        self.ribs.is_empty()
    }

    /// Concatenate all solids into one mesh.
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = self.body.clone().unwrap_or_default();
        for rib in &self.ribs {
            mesh.merge(&rib.mesh);
        }
        mesh
    }
}
