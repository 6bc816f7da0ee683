//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives, stored as a flat arena of nodes
//! addressed by index. Each leaf refers to exactly one primitive; every branch
//! owns two children and caches the union of their boxes.

use std::cmp::Ordering;
use std::sync::Arc;

use lumen_math::{Aabb, Axis, Interval, Ray};
use rand::RngCore;

use crate::{HitRecord, Hittable};

/// BVH node - either a branch with two children or a leaf with one primitive.
#[derive(Debug, Clone, Copy)]
enum BvhNode {
    /// Internal node; children are indices into the node arena.
    Branch { left: usize, right: usize, bbox: Aabb },
    /// Leaf node; `primitive` indexes the primitive list.
    Leaf { primitive: usize, bbox: Aabb },
}

impl BvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => bbox,
        }
    }
}

/// A BVH built once over a set of shared primitives.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<Arc<dyn Hittable>>,
    root: Option<usize>,
}

impl Bvh {
    /// Create a BVH from a list of hittable objects.
    pub fn new(primitives: Vec<Arc<dyn Hittable>>) -> Self {
        let boxes: Vec<Aabb> = primitives.iter().map(|p| p.bounding_box()).collect();
        let mut indices: Vec<usize> = (0..primitives.len()).collect();
        let mut nodes = Vec::with_capacity(primitives.len().saturating_mul(2));

        let root = if indices.is_empty() {
            None
        } else {
            Some(Self::build(&mut nodes, &boxes, &mut indices))
        };

        let bvh = Self {
            nodes,
            primitives,
            root,
        };

        log::info!(
            "Built BVH: {} primitives, {} nodes, depth {}",
            bvh.primitives.len(),
            bvh.node_count(),
            bvh.depth()
        );

        bvh
    }

    /// Recursive construction; returns the index of the subtree root.
    ///
    /// Median split: sort the primitives by box minimum on the longest axis of
    /// their combined bounds, split in half, recurse.
    fn build(nodes: &mut Vec<BvhNode>, boxes: &[Aabb], indices: &mut [usize]) -> usize {
        if let [primitive] = *indices {
            nodes.push(BvhNode::Leaf {
                primitive,
                bbox: boxes[primitive],
            });
            return nodes.len() - 1;
        }

        let bounds = indices
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| Aabb::surrounding(&acc, &boxes[i]));
        let axis = bounds.longest_axis();

        indices.sort_by(|&a, &b| box_compare(&boxes[a], &boxes[b], axis));

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = Self::build(nodes, boxes, left_indices);
        let right = Self::build(nodes, boxes, right_indices);

        let bbox = Aabb::surrounding(nodes[left].bbox(), nodes[right].bbox());
        nodes.push(BvhNode::Branch { left, right, bbox });
        nodes.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.node_depth(root))
    }

    fn node_depth(&self, index: usize) -> usize {
        match self.nodes[index] {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => {
                1 + self.node_depth(left).max(self.node_depth(right))
            }
        }
    }

    fn hit_node<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let node = &self.nodes[index];
        if !node.bbox().hit(ray, ray_t) {
            return None;
        }

        match *node {
            BvhNode::Leaf { primitive, .. } => self.primitives[primitive].hit(ray, ray_t, rng),
            BvhNode::Branch { left, right, .. } => {
                let hit_left = self.hit_node(left, ray, ray_t, rng);

                // Only look for closer hits in the right subtree
                let closest = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = self.hit_node(right, ray, Interval::new(ray_t.min, closest), rng);

                hit_right.or(hit_left)
            }
        }
    }
}

fn box_compare(a: &Aabb, b: &Aabb, axis: Axis) -> Ordering {
    a.axis_interval(axis)
        .min
        .partial_cmp(&b.axis_interval(axis).min)
        .unwrap_or(Ordering::Equal)
}

impl Hittable for Bvh {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let root = self.root?;
        self.hit_node(root, ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.root
            .map_or(Aabb::EMPTY, |root| *self.nodes[root].bbox())
    }
}
