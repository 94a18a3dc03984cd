// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

const SAH_BUCKETS: usize = 12;
const MAX_LEAF_SIZE: usize = 4;
const INVALID_NODE: u32 = std::u32::MAX;

#[derive(Clone)]
struct BVHNode {
    bounds: AABB,
    children: [u32; 2],
    start: u32,
    count: u32,
}

impl BVHNode {
    fn leaf(bounds: AABB, start: usize, count: usize) -> Self {
        Self { bounds,
               children: [INVALID_NODE, INVALID_NODE],
               start: start as u32,
               count: count as u32 }
    }

    fn interior(bounds: AABB, left: u32, right: u32) -> Self {
        Self { bounds, children: [left, right], start: 0, count: 0 }
    }

    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// Bounding-volume hierarchy over opaque primitives. The tree knows only
/// primitive bounds; actual primitive intersection is delegated to a
/// callback, so the same structure serves triangles and whole instances.
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<u32>,
}

impl BVH {
    pub fn build(prim_bounds: &[AABB]) -> Self {
        let centroids: Vec<Vector3f> = prim_bounds.iter()
            .map(|b| b.center())
            .collect();
        let mut nodes = Vec::new();
        let mut indices: Vec<u32> = (0..prim_bounds.len() as u32).collect();

        if !indices.is_empty() {
            build_range(&mut nodes, &mut indices, prim_bounds, &centroids,
                        0, prim_bounds.len());
        }

        Self { nodes, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self) -> AABB {
        self.nodes.first().map(|n| n.bounds).unwrap_or_default()
    }

    /// Closest hit along the ray. `hit_fn` intersects one primitive and
    /// reports a payload plus its distance; the reach of the traversal
    /// ray shrinks as hits are confirmed, pruning farther subtrees.
    pub fn ray_intersection<F, T>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<(T, Float)>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let mut clipped = Ray3f::new(ray.origin(), ray.dir(),
                                     Some(ray.min_t), Some(ray.max_t));
        let mut closest: Option<(usize, T)> = None;
        let mut stack: Vec<u32> = vec![0];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            if !node.bounds.ray_intersect(&clipped) {
                continue;
            }

            if node.is_leaf() {
                for i in node.start..(node.start + node.count) {
                    let prim_idx = self.indices[i as usize] as usize;
                    if let Some((payload, t)) = hit_fn(prim_idx, &clipped) {
                        if clipped.update(t) {
                            closest = Some((prim_idx, payload));
                        }
                    }
                }
            } else {
                stack.push(node.children[0]);
                stack.push(node.children[1]);
            }
        }

        closest
    }
}

fn bucket_of(c: Float, axis_min: Float, axis_max: Float) -> usize {
    let b = ((c - axis_min) / (axis_max - axis_min) * SAH_BUCKETS as Float) as usize;
    b.min(SAH_BUCKETS - 1)
}

fn range_bounds(indices: &[u32], prim_bounds: &[AABB], centroids: &[Vector3f],
                start: usize, end: usize) -> (AABB, AABB) {
    let mut bounds = AABB::default();
    let mut centroid_bounds = AABB::default();
    for i in start..end {
        let idx = indices[i] as usize;
        bounds.expand_by_aabb(&prim_bounds[idx]);
        centroid_bounds.expand_by_point(&centroids[idx]);
    }
    (bounds, centroid_bounds)
}

fn build_range(nodes: &mut Vec<BVHNode>, indices: &mut Vec<u32>,
               prim_bounds: &[AABB], centroids: &[Vector3f],
               start: usize, end: usize) -> u32 {
    let count = end - start;
    let (bounds, centroid_bounds) =
        range_bounds(indices, prim_bounds, centroids, start, end);

    if count <= MAX_LEAF_SIZE {
        let node_idx = nodes.len() as u32;
        nodes.push(BVHNode::leaf(bounds, start, count));
        return node_idx;
    }

    let axis = centroid_bounds.max_extent() as usize;
    let axis_min = centroid_bounds.p_min[axis];
    let axis_max = centroid_bounds.p_max[axis];
    if (axis_max - axis_min).abs() < 1e-6 {
        // All centroids coincide along the widest axis; nothing to split.
        let node_idx = nodes.len() as u32;
        nodes.push(BVHNode::leaf(bounds, start, count));
        return node_idx;
    }

    // Surface-area heuristic over fixed buckets along the split axis.
    let mut bucket_counts = [0usize; SAH_BUCKETS];
    let mut bucket_bounds = [AABB::default(); SAH_BUCKETS];
    for i in start..end {
        let idx = indices[i] as usize;
        let b = bucket_of(centroids[idx][axis], axis_min, axis_max);
        bucket_counts[b] += 1;
        bucket_bounds[b].expand_by_aabb(&prim_bounds[idx]);
    }

    let area = bounds.surface_area().max(1e-6);
    let mut min_cost = Float::MAX;
    let mut min_split = 0usize;
    for split in 0..(SAH_BUCKETS - 1) {
        let mut b0 = AABB::default();
        let mut b1 = AABB::default();
        let mut count0 = 0usize;
        let mut count1 = 0usize;
        for b in 0..=split {
            count0 += bucket_counts[b];
            b0.expand_by_aabb(&bucket_bounds[b]);
        }
        for b in (split + 1)..SAH_BUCKETS {
            count1 += bucket_counts[b];
            b1.expand_by_aabb(&bucket_bounds[b]);
        }
        let cost0 = if count0 > 0 { (count0 as Float) * b0.surface_area() } else { 0.0 };
        let cost1 = if count1 > 0 { (count1 as Float) * b1.surface_area() } else { 0.0 };
        let cost = 1.0 + (cost0 + cost1) / area;
        if cost < min_cost {
            min_cost = cost;
            min_split = split;
        }
    }

    // When splitting costs more than testing every primitive, stop here.
    if min_cost >= count as Float {
        let node_idx = nodes.len() as u32;
        nodes.push(BVHNode::leaf(bounds, start, count));
        return node_idx;
    }

    let mut mid = start;
    for i in start..end {
        let idx = indices[i] as usize;
        if bucket_of(centroids[idx][axis], axis_min, axis_max) <= min_split {
            indices.swap(i, mid);
            mid += 1;
        }
    }

    if mid == start || mid == end {
        let node_idx = nodes.len() as u32;
        nodes.push(BVHNode::leaf(bounds, start, count));
        return node_idx;
    }

    let node_idx = nodes.len() as u32;
    nodes.push(BVHNode::leaf(bounds, 0, 0));
    let left = build_range(nodes, indices, prim_bounds, centroids, start, mid);
    let right = build_range(nodes, indices, prim_bounds, centroids, mid, end);
    nodes[node_idx as usize] = BVHNode::interior(bounds, left, right);
    node_idx
}
