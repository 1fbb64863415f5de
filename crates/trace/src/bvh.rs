//! Bounding volume hierarchy: recursive median splits over the primitive
//! list, traversed with the slab predicate.

use crate::aabb::Aabb;
use crate::intersect::{ray_aabb_hit, Ray};
use crate::primitive::{HitInfo, Primitive};

/// How `Bvh::ray_intersect` answers queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BvhMode {
    /// No acceleration: linear scan over the primitive list.
    None,
    /// Median-split tree (the default).
    Middle,
    /// Surface-area heuristic; declared but not implemented, traversal
    /// reports no hit.
    Sah,
}

#[derive(Copy, Clone, Debug)]
enum BvhNodeKind {
    /// Index into the primitive list.
    Leaf(u32),
    Interior { left: u32, right: u32 },
}

#[derive(Copy, Clone, Debug)]
struct BvhNode {
    aabb: Aabb,
    kind: BvhNodeKind,
}

/// A binary AABB tree over an owned, flat primitive list.
///
/// Nodes live in one `Vec` and reference children and primitives by index,
/// so the tree is a couple of allocations regardless of scene size. `build`
/// reorders the primitive list; leaves index into the reordered list. The
/// tree is immutable after `build`, and traversal is read-only, so a built
/// `Bvh` can be shared freely across threads.
pub struct Bvh {
    pub mode: BvhMode,
    primitives: Vec<Primitive>,
    nodes: Vec<BvhNode>,
    root: Option<u32>,
}

impl Bvh {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Bvh {
            mode: BvhMode::Middle,
            primitives,
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Build the tree. Fewer than three primitives leave it empty, in which
    /// case `Middle` traversal reports no hit (`None` still scans the list).
    pub fn build(&mut self) {
        if self.primitives.len() < 3 {
            return;
        }

        self.nodes.clear();
        self.nodes.reserve(2 * self.primitives.len());

        let end = self.primitives.len();
        let root = build_range(&mut self.nodes, &mut self.primitives, 0, end);
        self.root = Some(root);

        log::debug!(
            "bvh: {} nodes over {} primitives",
            self.nodes.len(),
            self.primitives.len()
        );
    }

    /// Find the closest hit along `ray`, if any.
    pub fn ray_intersect(&self, ray: &Ray, hit: &mut HitInfo) -> bool {
        match self.mode {
            BvhMode::None => {
                for primitive in &self.primitives {
                    let mut candidate = HitInfo::default();
                    primitive.ray_intersect(ray, &mut candidate);
                    if candidate.t < hit.t {
                        *hit = candidate;
                    }
                }
                hit.t < f32::INFINITY
            }
            BvhMode::Middle => match self.root {
                Some(root) => self.node_intersect(root, ray, hit),
                None => false,
            },
            BvhMode::Sah => false,
        }
    }

    fn node_intersect(&self, index: u32, ray: &Ray, hit: &mut HitInfo) -> bool {
        let node = &self.nodes[index as usize];
        if !ray_aabb_hit(node.aabb.min, node.aabb.max, ray) {
            return false;
        }

        match node.kind {
            BvhNodeKind::Leaf(primitive) => {
                self.primitives[primitive as usize].ray_intersect(ray, hit)
            }
            BvhNodeKind::Interior { left, right } => {
                let mut left_hit = HitInfo::default();
                let mut right_hit = HitInfo::default();
                let left_inter = self.node_intersect(left, ray, &mut left_hit);
                let right_inter = self.node_intersect(right, ray, &mut right_hit);

                match (left_inter, right_inter) {
                    (true, true) => {
                        *hit = if left_hit.t < right_hit.t {
                            left_hit
                        } else {
                            right_hit
                        };
                        true
                    }
                    (true, false) => {
                        *hit = left_hit;
                        true
                    }
                    (false, true) => {
                        *hit = right_hit;
                        true
                    }
                    (false, false) => false,
                }
            }
        }
    }
}

/// Recursively build the half-open range `[start, end)`, returning the index
/// of the subtree root.
fn build_range(
    nodes: &mut Vec<BvhNode>,
    primitives: &mut [Primitive],
    start: usize,
    end: usize,
) -> u32 {
    let count = end - start;
    if count == 1 {
        return push_leaf(nodes, primitives, start);
    }

    // Split along the axis where the range's centroids spread the most.
    let mut centroid_bounds = Aabb::EMPTY;
    for primitive in &primitives[start..end] {
        let c = primitive.aabb().center();
        centroid_bounds.min = centroid_bounds.min.min(c);
        centroid_bounds.max = centroid_bounds.max.max(c);
    }
    let axis = centroid_bounds.longest_axis();

    if count == 2 {
        let (mut a, mut b) = (start, start + 1);
        if min_on_axis(&primitives[b], axis) < min_on_axis(&primitives[a], axis) {
            std::mem::swap(&mut a, &mut b);
        }
        let left = push_leaf(nodes, primitives, a);
        let right = push_leaf(nodes, primitives, b);
        return push_interior(nodes, left, right);
    }

    primitives[start..end].sort_by(|a, b| {
        min_on_axis(a, axis)
            .partial_cmp(&min_on_axis(b, axis))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = start + count / 2;
    let left = build_range(nodes, primitives, start, mid);
    let right = build_range(nodes, primitives, mid, end);

    push_interior(nodes, left, right)
}

fn min_on_axis(primitive: &Primitive, axis: usize) -> f32 {
    primitive.aabb().min[axis]
}

fn push_leaf(nodes: &mut Vec<BvhNode>, primitives: &[Primitive], index: usize) -> u32 {
    nodes.push(BvhNode {
        aabb: *primitives[index].aabb(),
        kind: BvhNodeKind::Leaf(index as u32),
    });
    (nodes.len() - 1) as u32
}

fn push_interior(nodes: &mut Vec<BvhNode>, left: u32, right: u32) -> u32 {
    let aabb = nodes[left as usize].aabb.union(&nodes[right as usize].aabb);
    nodes.push(BvhNode {
        aabb,
        kind: BvhNodeKind::Interior { left, right },
    });
    (nodes.len() - 1) as u32
}
