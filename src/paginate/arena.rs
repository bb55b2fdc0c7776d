//! Block storage with stable ids

use crate::markup::Node;
use crate::model::BlockKind;

/// Stable identifier of a top-level block.
///
/// Ids are never reused, so a selection that names a block stays valid while
/// the block moves between pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owner of every top-level block of the document
#[derive(Clone, Debug, Default)]
pub struct BlockArena {
    slots: Vec<Option<Node>>,
    live: usize,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a block and return its id
    pub fn insert(&mut self, node: Node) -> BlockId {
        self.slots.push(Some(node));
        self.live += 1;
        BlockId(self.slots.len() - 1)
    }

    pub fn get(&self, id: BlockId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn kind(&self, id: BlockId) -> Option<BlockKind> {
        self.get(id).map(BlockKind::of)
    }

    /// Drop a block; its id is not handed out again
    pub fn remove(&mut self, id: BlockId) -> Option<Node> {
        let node = self.slots.get_mut(id.0).and_then(Option::take);
        if node.is_some() {
            self.live -= 1;
        }
        node
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live blocks
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every block. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.live = 0;
    }
}
