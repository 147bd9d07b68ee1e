//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The hierarchy owns its primitives in a flat arena and stores the tree as a
//! vector of nodes that refer to each other by index. Once built it is never
//! mutated, so render workers share it freely.

use crate::sampling::gen_int;
use crate::{HitRecord, Hittable, HittableList, Ray};
use lumen_math::{Aabb, Interval};
use rand::RngCore;
use std::cmp::Ordering;

/// A node of the hierarchy.
#[derive(Debug, Clone, Copy)]
enum BvhNode {
    /// Refers to a single primitive in the arena.
    Leaf { object: usize, bbox: Aabb },
    /// Internal node with two children (which may be the same leaf).
    Branch { left: usize, right: usize, bbox: Aabb },
}

impl BvhNode {
    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// Binary BVH over a set of hittables.
///
/// Each branch splits its primitives at the median along a randomly chosen
/// axis, ordered by the minimum of their bounding boxes on that axis.
pub struct Bvh {
    objects: Vec<Box<dyn Hittable>>,
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl Bvh {
    /// Build a BVH from the contents of a hittable list.
    pub fn new(list: HittableList, rng: &mut dyn RngCore) -> Self {
        Self::from_objects(list.into_objects(), rng)
    }

    /// Build a BVH from a list of hittable objects.
    pub fn from_objects(objects: Vec<Box<dyn Hittable>>, rng: &mut dyn RngCore) -> Self {
        let bboxes: Vec<Aabb> = objects.iter().map(|o| o.bounding_box()).collect();
        let mut indices: Vec<usize> = (0..objects.len()).collect();

        let mut bvh = Self {
            objects,
            nodes: Vec::with_capacity(2 * bboxes.len()),
            root: None,
        };

        if !indices.is_empty() {
            let root = bvh.build(&mut indices, &bboxes, rng);
            bvh.root = Some(root);
        }

        log::debug!(
            "Built BVH: {} primitives, {} nodes, depth {}",
            bvh.objects.len(),
            bvh.nodes.len(),
            bvh.depth()
        );

        bvh
    }

    /// Recursive construction over a non-empty slice of primitive indices.
    ///
    /// Returns the index of the created node.
    fn build(&mut self, indices: &mut [usize], bboxes: &[Aabb], rng: &mut dyn RngCore) -> usize {
        let axis = gen_int(rng, 0, 2);
        let compare = |a: &usize, b: &usize| {
            let a_min = bboxes[*a].axis_interval(axis).min;
            let b_min = bboxes[*b].axis_interval(axis).min;
            a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
        };

        let (left, right) = match indices.len() {
            1 => {
                let leaf = self.push_leaf(indices[0], bboxes);
                (leaf, leaf)
            }
            2 => {
                let (first, second) = if compare(&indices[0], &indices[1]) == Ordering::Less {
                    (indices[0], indices[1])
                } else {
                    (indices[1], indices[0])
                };
                (self.push_leaf(first, bboxes), self.push_leaf(second, bboxes))
            }
            n => {
                indices.sort_by(compare);

                let (lower, upper) = indices.split_at_mut(n / 2);
                let left = self.build(lower, bboxes, rng);
                let right = self.build(upper, bboxes, rng);
                (left, right)
            }
        };

        let bbox = Aabb::surrounding(&self.nodes[left].bbox(), &self.nodes[right].bbox());
        self.nodes.push(BvhNode::Branch { left, right, bbox });
        self.nodes.len() - 1
    }

    fn push_leaf(&mut self, object: usize, bboxes: &[Aabb]) -> usize {
        self.nodes.push(BvhNode::Leaf {
            object,
            bbox: bboxes[object],
        });
        self.nodes.len() - 1
    }

    /// Number of primitives in the hierarchy.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of node levels on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.node_depth(root))
    }

    fn node_depth(&self, node: usize) -> usize {
        match self.nodes[node] {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => {
                1 + self.node_depth(left).max(self.node_depth(right))
            }
        }
    }

    fn hit_node<'a>(
        &'a self,
        node: usize,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self.nodes[node] {
            BvhNode::Leaf { object, .. } => self.objects[object].hit(ray, ray_t, rec, rng),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = self.hit_node(left, ray, ray_t, rec, rng);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = self.hit_node(right, ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }
}

impl Hittable for Bvh {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self.root {
            Some(root) => self.hit_node(root, ray, ray_t, rec, rng),
            None => false,
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.root.map_or(Aabb::EMPTY, |root| self.nodes[root].bbox())
    }
}
