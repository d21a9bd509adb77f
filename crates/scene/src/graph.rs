//! Scene graph: a tree of nodes with composed transforms.
//!
//! Nodes live in a generational arena, so an id held after its node was
//! removed fails fast instead of addressing reused storage. Each node owns
//! a local [`Transform`], an opaque payload (whatever the renderer needs
//! to identify the drawable, light, or camera the node stands for), and
//! its children; a node has exactly one parent at a time.
//!
//! # Example
//!
//! ```
//! use orrery_scene::{SceneGraph, Transform};
//! use glam::DVec3;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.insert("root", Transform::from_translation(DVec3::new(10.0, 0.0, 0.0)));
//! let child = graph.insert("child", Transform::from_translation(DVec3::new(0.0, 5.0, 0.0)));
//! graph.add(root, child).unwrap();
//!
//! let world = graph.world_transform(child).unwrap();
//! assert_eq!(world.translation, DVec3::new(10.0, 5.0, 0.0));
//! ```

use slotmap::{SlotMap, new_key_type};

use crate::error::{SceneError, SceneResult};
use crate::transform::Transform;

new_key_type! {
    /// Identifies a node in a scene graph. Cheap to copy and compare.
    pub struct NodeId;
}

/// A single node: payload, local transform, and tree links.
#[derive(Clone, Debug)]
struct Node<P> {
    payload: P,
    local: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of nodes with local-to-world transform composition.
///
/// The graph exclusively owns its nodes: removing a node drops its entire
/// subtree. Nodes without a parent are roots; a scene usually has a single
/// explicit root node, but the graph itself permits a forest.
///
/// World transforms are computed on demand by composing local transforms
/// from the root-most ancestor down to the queried node, so a read is
/// always consistent with the current local transforms.
#[derive(Clone, Debug)]
pub struct SceneGraph<P> {
    nodes: SlotMap<NodeId, Node<P>>,
}

impl<P> Default for SceneGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SceneGraph<P> {
    /// Create an empty scene graph.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the node is currently in the graph.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Insert a new root-level node and return its id.
    pub fn insert(&mut self, payload: P, local: Transform) -> NodeId {
        self.nodes.insert(Node {
            payload,
            local,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Insert a new node directly under `parent` and return its id.
    pub fn insert_child(&mut self, parent: NodeId, payload: P, local: Transform) -> SceneResult<NodeId> {
        if !self.contains(parent) {
            return Err(SceneError::Dangling(parent));
        }
        let child = self.insert(payload, local);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(child)
    }

    /// Make `child` a child of `parent`, keeping the child's *local*
    /// transform.
    ///
    /// The child's world transform generally jumps: its local transform is
    /// re-interpreted in the new parent's space. Fails with
    /// [`SceneError::Cycle`] if `child` is `parent` or one of its
    /// ancestors; the hierarchy is left unmodified on error.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_link(parent, child)?;
        self.link(parent, child);
        Ok(())
    }

    /// Make `child` a child of `parent`, keeping the child's *world*
    /// transform.
    ///
    /// The child's local transform is recomputed as
    /// `inverse(world(parent)) ∘ world(child)`, so the node does not move
    /// when re-parented. Fails with [`SceneError::NonInvertible`] if the
    /// new parent's world transform has a zero scale component, and with
    /// [`SceneError::Cycle`] under the same conditions as [`Self::add`];
    /// the hierarchy is left unmodified on error.
    pub fn attach_preserving_world(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_link(parent, child)?;
        let child_world = self.world_transform(child)?;
        let parent_world = self.world_transform(parent)?;
        let inverse = parent_world
            .try_inverse()
            .ok_or(SceneError::NonInvertible(parent))?;
        self.link(parent, child);
        self.nodes[child].local = inverse.compose(&child_world);
        Ok(())
    }

    /// Detach `node` from its parent, making it a root-level node.
    ///
    /// The node keeps its subtree and its local transform, so its world
    /// transform generally jumps. No-op for a node that is already a
    /// root.
    pub fn detach(&mut self, node: NodeId) -> SceneResult<()> {
        if !self.contains(node) {
            return Err(SceneError::Dangling(node));
        }
        self.unlink(node);
        Ok(())
    }

    /// Remove a node and its entire subtree from the graph.
    ///
    /// Ids into the removed subtree become stale; later operations on
    /// them fail with [`SceneError::Dangling`]. Returns the number of
    /// nodes removed.
    pub fn remove(&mut self, node: NodeId) -> SceneResult<usize> {
        if !self.contains(node) {
            return Err(SceneError::Dangling(node));
        }
        self.unlink(node);
        let mut removed = 0;
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(data) = self.nodes.remove(id) {
                pending.extend(data.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// The node's parent, or `None` for a root-level node.
    pub fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.get(node)?.parent)
    }

    /// The node's children, in insertion order.
    pub fn children(&self, node: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.get(node)?.children)
    }

    /// Shared access to the node's payload.
    pub fn payload(&self, node: NodeId) -> SceneResult<&P> {
        Ok(&self.get(node)?.payload)
    }

    /// Exclusive access to the node's payload.
    pub fn payload_mut(&mut self, node: NodeId) -> SceneResult<&mut P> {
        Ok(&mut self.get_mut(node)?.payload)
    }

    /// The node's local transform.
    pub fn local_transform(&self, node: NodeId) -> SceneResult<Transform> {
        Ok(self.get(node)?.local)
    }

    /// Exclusive access to the node's local transform.
    pub fn local_transform_mut(&mut self, node: NodeId) -> SceneResult<&mut Transform> {
        Ok(&mut self.get_mut(node)?.local)
    }

    /// Replace the node's local transform.
    pub fn set_local_transform(&mut self, node: NodeId, local: Transform) -> SceneResult<()> {
        self.get_mut(node)?.local = local;
        Ok(())
    }

    /// The node's world transform: the composition of local transforms
    /// from its root-most ancestor down to the node itself.
    pub fn world_transform(&self, node: NodeId) -> SceneResult<Transform> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let data = self.get(id)?;
            chain.push(data.local);
            current = data.parent;
        }
        // Left-to-right from the root: parent space first, child applied
        // in the parent's resulting space.
        let mut world = Transform::IDENTITY;
        for local in chain.iter().rev() {
            world = world.compose(local);
        }
        Ok(world)
    }

    /// Iterate over all nodes and their payloads, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &P)> {
        self.nodes.iter().map(|(id, node)| (id, &node.payload))
    }

    fn get(&self, node: NodeId) -> SceneResult<&Node<P>> {
        self.nodes.get(node).ok_or(SceneError::Dangling(node))
    }

    fn get_mut(&mut self, node: NodeId) -> SceneResult<&mut Node<P>> {
        self.nodes.get_mut(node).ok_or(SceneError::Dangling(node))
    }

    /// Validate a prospective parent/child link without mutating anything.
    fn check_link(&self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        if !self.contains(child) {
            return Err(SceneError::Dangling(child));
        }
        if !self.contains(parent) {
            return Err(SceneError::Dangling(parent));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { child, parent });
        }
        Ok(())
    }

    /// Whether `candidate` is `node` itself or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes[id].parent;
        }
        false
    }

    /// Detach `child` from its current parent, if any.
    fn unlink(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child].parent.take() {
            self.nodes[parent].children.retain(|&id| id != child);
        }
    }

    /// Re-home `child` under `parent`. Preconditions checked by callers.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.unlink(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DQuat, DVec3};
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    fn approx_eq_vec3(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < EPSILON
    }

    fn approx_eq_transform(a: &Transform, b: &Transform) -> bool {
        approx_eq_vec3(a.translation, b.translation)
            && approx_eq_vec3(a.scale, b.scale)
            // q and -q encode the same rotation
            && (a.rotation.dot(b.rotation).abs() - 1.0).abs() < EPSILON
    }

    #[test]
    fn test_insert_and_query() {
        let mut graph = SceneGraph::new();
        let node = graph.insert("sun", Transform::IDENTITY);

        assert_eq!(graph.len(), 1);
        assert!(graph.contains(node));
        assert_eq!(*graph.payload(node).unwrap(), "sun");
        assert_eq!(graph.parent(node).unwrap(), None);
    }

    #[test]
    fn test_world_transform_composes_ancestor_chain() {
        let mut graph = SceneGraph::new();
        let a = graph.insert("a", Transform::from_translation(DVec3::new(100.0, 0.0, 0.0)));
        let b = graph
            .insert_child(a, "b", Transform::from_translation(DVec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let c = graph
            .insert_child(b, "c", Transform::from_translation(DVec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        let world = graph.world_transform(c).unwrap();
        assert!(approx_eq_vec3(world.translation, DVec3::new(111.0, 0.0, 0.0)));
    }

    #[test]
    fn test_world_transform_matches_explicit_compose() {
        let mut graph = SceneGraph::new();
        let locals = [
            Transform::new()
                .with_translation(DVec3::new(3.0, 1.0, -2.0))
                .with_rotation(DQuat::from_rotation_y(0.4))
                .with_uniform_scale(2.0),
            Transform::new()
                .with_translation(DVec3::new(-1.0, 0.5, 4.0))
                .with_rotation(DQuat::from_rotation_z(1.2)),
            Transform::new()
                .with_translation(DVec3::new(0.0, 2.0, 0.0))
                .with_rotation(DQuat::from_rotation_x(-0.8))
                .with_uniform_scale(0.5),
        ];

        let a = graph.insert((), locals[0]);
        let b = graph.insert_child(a, (), locals[1]).unwrap();
        let c = graph.insert_child(b, (), locals[2]).unwrap();

        let expected = locals[0].compose(&locals[1]).compose(&locals[2]);
        let world = graph.world_transform(c).unwrap();
        assert!(
            approx_eq_transform(&world, &expected),
            "world {world:?} != expected {expected:?}"
        );
    }

    #[test]
    fn test_add_keeps_local_transform() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert((), Transform::from_translation(DVec3::new(5.0, 0.0, 0.0)));
        let local = Transform::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let child = graph.insert((), local);

        graph.add(parent, child).unwrap();

        assert_eq!(graph.local_transform(child).unwrap(), local);
        // World transform jumps into the new parent's space.
        let world = graph.world_transform(child).unwrap();
        assert!(approx_eq_vec3(world.translation, DVec3::new(6.0, 2.0, 3.0)));
        assert_eq!(graph.parent(child).unwrap(), Some(parent));
    }

    #[test]
    fn test_attach_preserving_world_keeps_world_transform() {
        let mut graph = SceneGraph::new();
        let old_parent = graph.insert(
            (),
            Transform::new()
                .with_translation(DVec3::new(10.0, 0.0, 0.0))
                .with_rotation(DQuat::from_rotation_z(-0.41))
                .with_uniform_scale(2.0),
        );
        let child = graph
            .insert_child(
                old_parent,
                (),
                Transform::new()
                    .with_translation(DVec3::new(0.0, 1.0, 0.0))
                    .with_rotation(DQuat::from_rotation_x(0.3)),
            )
            .unwrap();
        let new_parent = graph.insert(
            (),
            Transform::new()
                .with_translation(DVec3::new(-4.0, 7.0, 1.0))
                .with_rotation(DQuat::from_rotation_y(FRAC_PI_2))
                .with_uniform_scale(0.5),
        );

        let before = graph.world_transform(child).unwrap();
        graph.attach_preserving_world(new_parent, child).unwrap();
        let after = graph.world_transform(child).unwrap();

        assert_eq!(graph.parent(child).unwrap(), Some(new_parent));
        assert!(
            approx_eq_transform(&before, &after),
            "world transform moved: {before:?} -> {after:?}"
        );
    }

    #[test]
    fn test_attach_preserving_world_non_invertible_parent() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert((), Transform::new().with_scale(DVec3::new(0.0, 1.0, 1.0)));
        let child = graph.insert((), Transform::IDENTITY);

        let err = graph.attach_preserving_world(parent, child).unwrap_err();
        assert_eq!(err, SceneError::NonInvertible(parent));
        // Nothing was mutated.
        assert_eq!(graph.parent(child).unwrap(), None);
    }

    #[test]
    fn test_cycle_rejected_and_graph_unmodified() {
        let mut graph = SceneGraph::new();
        let a = graph.insert("a", Transform::IDENTITY);
        let b = graph.insert_child(a, "b", Transform::IDENTITY).unwrap();
        let c = graph.insert_child(b, "c", Transform::IDENTITY).unwrap();

        // Attaching an ancestor under its own descendant must fail.
        let err = graph.add(c, a).unwrap_err();
        assert_eq!(err, SceneError::Cycle { child: a, parent: c });

        // Self-attachment is the degenerate cycle.
        let err = graph.add(b, b).unwrap_err();
        assert_eq!(err, SceneError::Cycle { child: b, parent: b });

        assert_eq!(graph.parent(a).unwrap(), None);
        assert_eq!(graph.parent(b).unwrap(), Some(a));
        assert_eq!(graph.parent(c).unwrap(), Some(b));
    }

    #[test]
    fn test_reparent_between_groups() {
        let mut graph = SceneGraph::new();
        let left = graph.insert((), Transform::from_translation(DVec3::new(-5.0, 0.0, 0.0)));
        let right = graph.insert((), Transform::from_translation(DVec3::new(5.0, 0.0, 0.0)));
        let child = graph
            .insert_child(left, (), Transform::from_translation(DVec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        graph.add(right, child).unwrap();

        assert_eq!(graph.parent(child).unwrap(), Some(right));
        assert!(graph.children(left).unwrap().is_empty());
        assert_eq!(graph.children(right).unwrap(), &[child]);
        let world = graph.world_transform(child).unwrap();
        assert!(approx_eq_vec3(world.translation, DVec3::new(6.0, 0.0, 0.0)));
    }

    #[test]
    fn test_detach_keeps_subtree_and_local() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert((), Transform::from_translation(DVec3::new(5.0, 0.0, 0.0)));
        let local = Transform::from_translation(DVec3::new(1.0, 0.0, 0.0));
        let child = graph.insert_child(parent, (), local).unwrap();
        let leaf = graph.insert_child(child, (), Transform::IDENTITY).unwrap();

        graph.detach(child).unwrap();

        assert_eq!(graph.parent(child).unwrap(), None);
        assert!(graph.children(parent).unwrap().is_empty());
        assert!(graph.contains(leaf));
        assert_eq!(graph.local_transform(child).unwrap(), local);
        // Now a root: the world transform is just the kept local.
        let world = graph.world_transform(leaf).unwrap();
        assert!(approx_eq_vec3(world.translation, DVec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.insert("root", Transform::IDENTITY);
        let group = graph.insert_child(root, "group", Transform::IDENTITY).unwrap();
        let leaf = graph.insert_child(group, "leaf", Transform::IDENTITY).unwrap();

        let removed = graph.remove(group).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(graph.len(), 1);
        assert!(!graph.contains(group));
        assert!(!graph.contains(leaf));
        assert!(graph.children(root).unwrap().is_empty());

        // Stale ids fail fast.
        assert_eq!(
            graph.world_transform(leaf).unwrap_err(),
            SceneError::Dangling(leaf)
        );
        assert_eq!(graph.remove(group).unwrap_err(), SceneError::Dangling(group));
    }

    #[test]
    fn test_group_of_thirds_children() {
        // Three children fanned around Z in 120-degree steps, the nested
        // group posing exercised by articulated-figure scenes.
        let mut graph = SceneGraph::new();
        let body = graph.insert("body", Transform::IDENTITY);
        let head = graph
            .insert_child(body, "head", Transform::from_translation(DVec3::new(0.0, 0.0, 1.0)))
            .unwrap();

        let arm_local = Transform::from_translation(DVec3::new(1.0, 0.0, 0.0));
        for i in 0..3 {
            let angle = std::f64::consts::TAU / 3.0 * i as f64;
            let pivot = graph
                .insert_child(head, "pivot", Transform::from_rotation(DQuat::from_rotation_z(angle)))
                .unwrap();
            graph.insert_child(pivot, "arm", arm_local).unwrap();
        }

        assert_eq!(graph.children(head).unwrap().len(), 3);
        let pivots: Vec<_> = graph.children(head).unwrap().to_vec();
        let arm = graph.children(pivots[1]).unwrap()[0];
        let world = graph.world_transform(arm).unwrap();
        // 120 degrees around Z from (1, 0, 0), pushed out to z = 1.
        let expected = DVec3::new(-0.5, (3.0_f64).sqrt() / 2.0, 1.0);
        assert!(
            approx_eq_vec3(world.translation, expected),
            "got {:?}",
            world.translation
        );
    }
}
