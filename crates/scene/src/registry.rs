use foundation::handles::Handle;

use crate::mesh::{MeshId, TriangleMesh};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    mesh: Option<TriangleMesh>,
}

/// Owner of the loaded meshes.
///
/// Slots are reused after removal, but every reuse (and every `replace`) bumps
/// the slot generation so previously issued ids stop resolving.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mesh: TriangleMesh) -> MeshId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.mesh = Some(mesh);
            return MeshId(Handle::new(index, slot.generation));
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            mesh: Some(mesh),
        });
        MeshId(Handle::new(index, 0))
    }

    pub fn get(&self, id: MeshId) -> Option<&TriangleMesh> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.mesh.as_ref()
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.get(id).is_some()
    }

    /// Swaps in a new mesh instance; the returned id supersedes `id`.
    ///
    /// Returns `None` (and drops `mesh`) when `id` is stale.
    pub fn replace(&mut self, id: MeshId, mesh: TriangleMesh) -> Option<MeshId> {
        if !self.contains(id) {
            return None;
        }
        let slot = &mut self.slots[id.index() as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.mesh = Some(mesh);
        Some(MeshId(Handle::new(id.index(), slot.generation)))
    }

    pub fn remove(&mut self, id: MeshId) -> Option<TriangleMesh> {
        if !self.contains(id) {
            return None;
        }
        let mesh = self.slots[id.index() as usize].mesh.take();
        self.free.push(id.index());
        mesh
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.mesh.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live ids in ascending slot order.
    pub fn ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.mesh
                .as_ref()
                .map(|_| MeshId(Handle::new(i as u32, s.generation)))
        })
    }
}
