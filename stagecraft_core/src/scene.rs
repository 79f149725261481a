// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage, hierarchy and the three scene passes.
//!
//! A [`Scene`] owns every node and addresses them by generational
//! [`NodeId`] handles. Destroyed slots are recycled through a free list and
//! their generation is bumped so old handles fail with
//! [`StagecraftError::StaleNode`].
//!
//! The host drives three independent schedules:
//!
//! - [`update`](Scene::update): the simulation tick. Every node runs its
//!   collision check, then receives [`NodeEvent::Update`].
//! - [`advance_animations`](Scene::advance_animations): polls each sprite
//!   sheet's own frame timer and advances frames that are due.
//! - [`render`](Scene::render): depth-first from the roots. Each visible node
//!   is bracketed by `save`/`restore` on its context, pushes its transform and
//!   visual state, draws, then renders its children. Invisible nodes skip
//!   their whole subtree.

use alloc::collections::BTreeSet;
use alloc::string::ToString;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::collision::{
    Bounds, Collider, ColliderKey, ColliderShape, boxes_overlap, validate_box,
};
use crate::config::SceneConfig;
use crate::context::SharedContext;
use crate::error::{Result, StagecraftError};
use crate::event::NodeEvent;
use crate::id::{NodeId, ShapeId};
use crate::node::{DisplayNode, NodeOptions};
use crate::sprite_sheet::{SpriteSheet, SpriteSheetOptions};
use crate::time::HostTime;
use crate::trace::{
    AnimationFrameEvent, NodeRenderEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
};

/// A node stored in a [`Scene`].
#[derive(Debug)]
pub enum SceneNode {
    /// A plain display node.
    Display(DisplayNode),
    /// A sprite sheet, which is a display node plus animation state.
    SpriteSheet(SpriteSheet),
}

impl SceneNode {
    /// The display node, for either variant.
    #[must_use]
    pub fn display(&self) -> &DisplayNode {
        match self {
            Self::Display(node) => node,
            Self::SpriteSheet(sheet) => sheet.node(),
        }
    }

    /// The display node, mutably.
    pub fn display_mut(&mut self) -> &mut DisplayNode {
        match self {
            Self::Display(node) => node,
            Self::SpriteSheet(sheet) => sheet.node_mut(),
        }
    }

    /// The sprite sheet, if this is one.
    #[must_use]
    pub fn as_sprite_sheet(&self) -> Option<&SpriteSheet> {
        match self {
            Self::SpriteSheet(sheet) => Some(sheet),
            Self::Display(_) => None,
        }
    }

    /// The sprite sheet, mutably, if this is one.
    pub fn as_sprite_sheet_mut(&mut self) -> Option<&mut SpriteSheet> {
        match self {
            Self::SpriteSheet(sheet) => Some(sheet),
            Self::Display(_) => None,
        }
    }
}

/// Owner of every node, collider shape and pass counter.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,

    // -- Slots --
    nodes: Vec<Option<SceneNode>>,
    children: Vec<Vec<NodeId>>,

    // -- Allocation --
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,

    shapes: Vec<ColliderShape>,

    // -- Pass counters --
    update_passes: u64,
    animate_passes: u64,
    render_passes: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            children: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            shapes: Vec::new(),
            update_passes: 0,
            animate_passes: 0,
            render_passes: 0,
        }
    }

    /// The scene configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The scene configuration, mutably.
    pub fn config_mut(&mut self) -> &mut SceneConfig {
        &mut self.config
    }

    // -- Allocation API --

    /// Creates a detached display node.
    pub fn create_node(&mut self, options: NodeOptions) -> NodeId {
        self.insert(SceneNode::Display(DisplayNode::new(options)))
    }

    /// Creates a detached sprite sheet whose frame timer starts at `now`.
    pub fn create_sprite_sheet(&mut self, options: SpriteSheetOptions, now: HostTime) -> Result<NodeId> {
        let sheet = SpriteSheet::new(options, self.config.timebase, now)?;
        Ok(self.insert(SceneNode::SpriteSheet(sheet)))
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = Some(node);
            self.children[idx as usize].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.nodes.push(Some(node));
            self.children.push(Vec::new());
            self.generation.push(0);
            idx
        };
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, cancelling its frame timer and freeing its slot.
    ///
    /// The node is detached from its parent and dropped from every other
    /// node's collision targets. Colliders that delegated to it fall back to
    /// their owner's bounds. Nodes with children cannot be destroyed.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let idx = self.validate(id)?;
        if !self.children[idx].is_empty() {
            return Err(StagecraftError::NodeHasChildren(id));
        }
        self.remove_from_parent(id)?;

        if let Some(mut node) = self.nodes[idx].take()
            && let Some(sheet) = node.as_sprite_sheet_mut()
        {
            sheet.stop();
        }
        for node in self.nodes.iter_mut().flatten() {
            let node = node.display_mut();
            node.forget_target(id);
            if node.collider() == Collider::Node(id) {
                node.set_collider(Collider::Own);
            }
        }
        self.prune_collision_memory();

        // Bump generation so old handles immediately fail validation.
        self.generation[idx] += 1;
        self.free_list.push(id.idx);
        Ok(())
    }

    /// Drops edge memory for colliders that no remaining target resolves to.
    fn prune_collision_memory(&mut self) {
        for idx in 0..self.nodes.len() {
            let Some(node) = self.nodes[idx].as_ref() else {
                continue;
            };
            let live: BTreeSet<ColliderKey> = node
                .display()
                .collision_targets()
                .iter()
                .filter_map(|&t| self.node(t).ok().map(|n| n.collider().key(t)))
                .collect();
            if let Some(node) = self.nodes[idx].as_mut() {
                node.display_mut().retain_collisions(&live);
            }
        }
    }

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.validate(id).is_ok()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Whether the scene has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, id: NodeId) -> Result<usize> {
        let idx = id.idx as usize;
        match (self.generation.get(idx), self.nodes.get(idx)) {
            (Some(&generation), Some(Some(_))) if generation == id.generation => Ok(idx),
            _ => Err(StagecraftError::StaleNode(id)),
        }
    }

    fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    // -- Node access --

    /// The stored node.
    pub fn get(&self, id: NodeId) -> Result<&SceneNode> {
        let idx = self.validate(id)?;
        self.nodes[idx].as_ref().ok_or(StagecraftError::StaleNode(id))
    }

    /// The stored node, mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        let idx = self.validate(id)?;
        self.nodes[idx].as_mut().ok_or(StagecraftError::StaleNode(id))
    }

    /// The display node behind `id`.
    pub fn node(&self, id: NodeId) -> Result<&DisplayNode> {
        self.get(id).map(SceneNode::display)
    }

    /// The display node behind `id`, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut DisplayNode> {
        self.get_mut(id).map(SceneNode::display_mut)
    }

    /// The sprite sheet behind `id`.
    pub fn sprite_sheet(&self, id: NodeId) -> Result<&SpriteSheet> {
        self.get(id)?
            .as_sprite_sheet()
            .ok_or(StagecraftError::NotASpriteSheet(id))
    }

    /// The sprite sheet behind `id`, mutably.
    pub fn sprite_sheet_mut(&mut self, id: NodeId) -> Result<&mut SpriteSheet> {
        self.get_mut(id)?
            .as_sprite_sheet_mut()
            .ok_or(StagecraftError::NotASpriteSheet(id))
    }

    // -- Topology API --

    /// Appends `child` to `parent`'s children.
    ///
    /// A child that already has a parent is moved. When `child` has no
    /// context, it and any context-less descendants inherit `parent`'s.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.validate(parent)?;
        self.validate(child)?;

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(StagecraftError::HierarchyCycle(child));
            }
            cursor = self.node(ancestor)?.parent();
        }

        self.remove_from_parent(child)?;

        let siblings = &mut self.children[parent.idx as usize];
        let index = siblings.len();
        siblings.push(child);

        let inherited = self.node(parent)?.context().cloned();
        let node = self.node_mut(child)?;
        node.parent = Some(parent);
        node.index = Some(index);

        if let Some(ctx) = inherited {
            for id in self.subtree(child) {
                let node = self.node_mut(id)?;
                if node.context().is_none() {
                    node.set_context(ctx.clone());
                }
            }
        }
        Ok(())
    }

    /// Detaches `child` from its parent. Does nothing for a root.
    pub fn remove_from_parent(&mut self, child: NodeId) -> Result<()> {
        let Some(parent) = self.node(child)?.parent() else {
            return Ok(());
        };
        let siblings = &mut self.children[parent.idx as usize];
        if let Some(pos) = siblings.iter().position(|&c| c == child) {
            siblings.remove(pos);
            for (index, sibling) in siblings.iter().enumerate().skip(pos) {
                if let Some(node) = self.nodes[sibling.idx as usize].as_mut() {
                    node.display_mut().index = Some(index);
                }
            }
        }
        let node = self.node_mut(child)?;
        node.parent = None;
        node.index = None;
        Ok(())
    }

    /// The parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.node(id).map(DisplayNode::parent)
    }

    /// The children of `id`, in order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        let idx = self.validate(id)?;
        Ok(&self.children[idx])
    }

    /// Live nodes without a parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| {
                self.nodes[idx as usize]
                    .as_ref()
                    .is_some_and(|n| n.display().parent().is_none())
            })
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Every live node in depth-first pre-order, roots in slot order.
    #[must_use]
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut stack = self.roots();
        stack.reverse();
        self.collect_preorder(stack)
    }

    /// `root` and its descendants in depth-first pre-order.
    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        self.collect_preorder(Vec::from([root]))
    }

    fn collect_preorder(&self, mut stack: Vec<NodeId>) -> Vec<NodeId> {
        let mut order = Vec::new();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children[id.idx as usize].iter().rev().copied());
        }
        order
    }

    /// Assigns `ctx` to `id` and every descendant.
    pub fn set_context(&mut self, id: NodeId, ctx: SharedContext) -> Result<()> {
        self.validate(id)?;
        for node in self.subtree(id) {
            self.node_mut(node)?.set_context(ctx.clone());
        }
        Ok(())
    }

    // -- Collision API --

    /// Registers a free-standing collider shape.
    pub fn add_collider_shape(&mut self, shape: impl Into<ColliderShape>) -> Result<ShapeId> {
        let shape = shape.into();
        validate_box(shape.bounds())?;
        let id = ShapeId(u32::try_from(self.shapes.len()).map_err(|_| {
            StagecraftError::InvalidGeometry("too many collider shapes")
        })?);
        self.shapes.push(shape);
        Ok(id)
    }

    /// Replaces a registered shape, keeping its identity.
    pub fn set_collider_shape(&mut self, id: ShapeId, shape: impl Into<ColliderShape>) -> Result<()> {
        let shape = shape.into();
        validate_box(shape.bounds())?;
        let slot = self
            .shapes
            .get_mut(id.0 as usize)
            .ok_or(StagecraftError::UnknownShape(id))?;
        *slot = shape;
        Ok(())
    }

    /// A registered shape.
    #[must_use]
    pub fn collider_shape(&self, id: ShapeId) -> Option<ColliderShape> {
        self.shapes.get(id.0 as usize).copied()
    }

    /// Adds `other` to the targets `id` tests each tick.
    pub fn allow_collision_from(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        self.validate(other)?;
        self.node_mut(id)?.allow_collision_from(other);
        Ok(())
    }

    /// Box of `collider` when owned by `owner`.
    pub fn collider_bounds(&self, owner: NodeId, collider: Collider) -> Result<Rect> {
        match collider {
            Collider::Own => self.node(owner).map(DisplayNode::bounds),
            Collider::Node(id) => self.node(id).map(DisplayNode::bounds),
            Collider::Shape(id) => self
                .collider_shape(id)
                .map(|s| s.bounds())
                .ok_or(StagecraftError::UnknownShape(id)),
        }
    }

    /// Tests `id`'s collider against each of its targets' colliders and
    /// fires enter, continue and exit events on `id`.
    pub fn check_collisions(&mut self, id: NodeId, tracer: &mut Tracer<'_>) -> Result<()> {
        let node = self.node(id)?;
        let own = self.collider_bounds(id, node.collider())?;
        let targets = node.collision_targets().to_vec();
        for target in targets {
            let collider = self.node(target)?.collider();
            let other = self.collider_bounds(target, collider)?;
            let overlapping = boxes_overlap(own, other)?;
            self.node_mut(id)?
                .observe_overlap(id, target, collider.key(target), overlapping, tracer);
        }
        Ok(())
    }

    // -- Passes --

    /// Runs the update tick over every node in depth-first order.
    pub fn update(&mut self, tracer: &mut Tracer<'_>) -> Result<()> {
        let pass_index = self.update_passes;
        self.update_passes += 1;
        tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase: PhaseKind::Update,
        });

        let order = self.depth_first();
        for &id in &order {
            self.check_collisions(id, tracer)?;
            self.node_mut(id)?.trigger(&NodeEvent::Update);
        }

        tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase: PhaseKind::Update,
            nodes_visited: saturating_u32(order.len()),
        });
        Ok(())
    }

    /// Advances every sprite sheet whose frame timer is due at `now`.
    ///
    /// A timer that fell several intervals behind advances several frames.
    /// Whole animation cycles beyond the first are skipped, so a very late
    /// poll lands on the right frame but fires at most two `AnimationEnd`s.
    /// Returns the total number of frames stepped.
    pub fn advance_animations(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> u64 {
        let pass_index = self.animate_passes;
        self.animate_passes += 1;
        tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase: PhaseKind::Animate,
        });

        let mut visited = 0_u32;
        let mut advanced = 0_u64;
        for idx in 0..self.len {
            let Some(SceneNode::SpriteSheet(sheet)) = self.nodes[idx as usize].as_mut() else {
                continue;
            };
            visited += 1;
            let node = NodeId {
                idx,
                generation: self.generation[idx as usize],
            };
            let fired = sheet.poll_timer(now);
            for _ in 0..sheet.frames_to_step(fired) {
                let Some(wrapped) = sheet.advance_frame() else {
                    break;
                };
                advanced += 1;
                tracer.animation_frame(&AnimationFrameEvent {
                    node,
                    now,
                    frame: sheet.current_frame(),
                    wrapped,
                });
            }
        }

        tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase: PhaseKind::Animate,
            nodes_visited: visited,
        });
        advanced
    }

    /// Draws every visible node, depth-first from the roots.
    pub fn render(&mut self, tracer: &mut Tracer<'_>) -> Result<()> {
        let pass_index = self.render_passes;
        self.render_passes += 1;
        tracer.phase_begin(&PhaseBeginEvent {
            pass_index,
            phase: PhaseKind::Render,
        });

        let mut visited = 0;
        for root in self.roots() {
            self.render_subtree(root, 0, tracer, &mut visited)?;
        }

        tracer.phase_end(&PhaseEndEvent {
            pass_index,
            phase: PhaseKind::Render,
            nodes_visited: visited,
        });
        Ok(())
    }

    fn render_subtree(
        &mut self,
        id: NodeId,
        depth: u32,
        tracer: &mut Tracer<'_>,
        visited: &mut u32,
    ) -> Result<()> {
        let node = self.node(id)?;
        if !node.visible() {
            return Ok(());
        }
        let ctx = node
            .context()
            .cloned()
            .ok_or_else(|| StagecraftError::MissingContext(node.id().to_string()))?;

        ctx.borrow_mut().save();
        let drawn = self.draw_node(id, depth, &ctx, tracer, visited);
        ctx.borrow_mut().restore();
        drawn
    }

    fn draw_node(
        &mut self,
        id: NodeId,
        depth: u32,
        ctx: &SharedContext,
        tracer: &mut Tracer<'_>,
        visited: &mut u32,
    ) -> Result<()> {
        self.node_mut(id)?.update_context()?;
        *visited += 1;
        tracer.node_render(&NodeRenderEvent {
            node: id,
            depth,
            alpha: ctx.borrow().global_alpha(),
        });

        if self.get(id)?.as_sprite_sheet().is_some() {
            self.check_collisions(id, tracer)?;
        }
        let debug = &self.config.debug;
        match self.nodes[id.idx as usize].as_mut() {
            Some(SceneNode::Display(node)) => node.render()?,
            Some(SceneNode::SpriteSheet(sheet)) => sheet.render(debug)?,
            None => return Err(StagecraftError::StaleNode(id)),
        }

        let children = self.children[id.idx as usize].clone();
        for child in children {
            self.render_subtree(child, depth + 1, tracer, visited)?;
        }
        Ok(())
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
