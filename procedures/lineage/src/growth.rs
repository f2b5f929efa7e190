use crate::family::FamilyMap;
use crate::rng::BranchRng;
use crate::tree::BranchNode;
use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrowthError {
	#[error("origin or direction is not finite (origin {origin:?}, direction {direction:?})")]
	InvalidGeometryInput { origin: Vec3, direction: Vec3 },
	#[error("family map cycles back through {name:?}")]
	CyclicFamilyMap { name: String },
	#[error("no person named {name:?} in the family map")]
	UnknownRoot { name: String },
	#[error("{name:?} is already part of the family")]
	DuplicateChild { name: String },
}

/// Geometry knobs for one tree build.
///
/// Lengths and radii shrink multiplicatively per generation; the wobble is
/// a fraction of the branch length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GrowthParams {
	/// Curve sample segments per branch; the path has `steps + 1` points.
	pub steps: usize,
	/// Perpendicular curvature magnitude, as a fraction of branch length.
	pub wobble: f32,
	/// Trunk length at generation 0.
	pub base_length: f32,
	/// Per-generation length multiplier.
	pub length_decay: f32,
	/// Trunk radius at generation 0.
	pub base_radius: f32,
	/// Per-generation radius multiplier.
	pub radius_decay: f32,
	/// Tip radius as a fraction of the branch's base radius.
	pub taper: f32,
	/// Radius floor, keeps geometry from degenerating to zero width.
	pub min_radius: f32,
	/// Total angular range the children fan across, centered on the
	/// parent direction.
	pub fan_spread: f32,
	/// How far each child direction is blended toward straight up, so
	/// outer branches do not droop.
	pub upward_bias: f32,
}

impl Default for GrowthParams {
	fn default() -> Self {
		Self {
			steps: 8,
			wobble: 0.12,
			// trunk reaches 2.2 units, children 70% of their parent
			base_length: 2.2,
			length_decay: 0.7,
			base_radius: 0.14,
			radius_decay: 0.62,
			taper: 0.6,
			min_radius: 0.008,
			fan_spread: PI / 2.6,
			upward_bias: 0.25,
		}
	}
}

/// Evenly spaced fan angles across `spread`, centered on zero. A single
/// child sits at the midpoint instead of dividing by zero.
pub fn fan_angles(count: usize, spread: f32) -> Vec<f32> {
	(0..count)
		.map(|i| {
			let t = if count == 1 { 0.5 } else { i as f32 / (count - 1) as f32 };
			(t - 0.5) * spread
		})
		.collect()
}

/// Two unit vectors perpendicular to `direction` and to each other.
fn perpendicular_frame(direction: Vec3) -> (Vec3, Vec3) {
	// Pick a reference axis that is NOT parallel
	let reference = if direction.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
	let perp1 = direction.cross(reference).normalize();
	let perp2 = direction.cross(perp1).normalize();
	(perp1, perp2)
}

/// Converts a `FamilyMap` into a `BranchNode` tree.
///
/// Deterministic for a given seed: every node's geometry rng is derived
/// from the person's name, so rebuilding reproduces the same tree
/// bit-for-bit.
#[derive(Debug, Clone)]
pub struct BranchGrower {
	pub params: GrowthParams,
	seed: u64,
}

impl BranchGrower {
	pub fn new(params: GrowthParams) -> Self {
		Self { params, seed: 0 }
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	/// Grow the subtree rooted at `name`, truncated at `max_depth`
	/// generations below it.
	pub fn grow(
		&self,
		family: &FamilyMap,
		name: &str,
		origin: Vec3,
		direction: Vec3,
		max_depth: usize,
	) -> Result<BranchNode, GrowthError> {
		if !origin.is_finite() || !direction.is_finite() || direction.length_squared() < 1e-12 {
			return Err(GrowthError::InvalidGeometryInput { origin, direction });
		}
		let mut ancestors = Vec::new();
		self.grow_branch(family, name, origin, direction.normalize(), 0, max_depth, &mut ancestors)
	}

	#[allow(clippy::too_many_arguments)]
	fn grow_branch(
		&self,
		family: &FamilyMap,
		name: &str,
		origin: Vec3,
		direction: Vec3,
		generation: usize,
		max_depth: usize,
		ancestors: &mut Vec<String>,
	) -> Result<BranchNode, GrowthError> {
		// unguarded recursion on a cyclic map would never terminate
		if ancestors.iter().any(|ancestor| ancestor == name) {
			return Err(GrowthError::CyclicFamilyMap { name: name.to_string() });
		}

		let params = &self.params;
		let mut rng = BranchRng::for_person(self.seed, name);

		let length = params.base_length * params.length_decay.powi(generation as i32);
		let base_radius =
			(params.base_radius * params.radius_decay.powi(generation as i32)).max(params.min_radius);
		let tip_radius = (base_radius * params.taper).max(params.min_radius);

		let (perp1, perp2) = perpendicular_frame(direction);

		// Sampled curve: on-axis at both ends, sin-weighted wobble between.
		let steps = params.steps.max(1);
		let mut path = Vec::with_capacity(steps + 1);
		for i in 0..=steps {
			let t = i as f32 / steps as f32;
			let mut point = origin + direction * (length * t);
			if i != 0 && i != steps {
				let swing = (t * PI).sin() * params.wobble * length;
				point += (perp1 * rng.next_symmetric() + perp2 * rng.next_symmetric()) * swing;
			}
			path.push(point);
		}
		let tip = path[steps];

		let mut children = Vec::new();
		let child_names = family.children_of(name);
		if generation < max_depth && !child_names.is_empty() {
			let angles = fan_angles(child_names.len(), params.fan_spread);
			ancestors.push(name.to_string());
			for (child, angle) in child_names.iter().zip(angles) {
				let rotated = Quat::from_axis_angle(perp1, angle) * direction;
				let child_direction = rotated.lerp(Vec3::Y, params.upward_bias).normalize();
				children.push(self.grow_branch(
					family,
					child,
					tip,
					child_direction,
					generation + 1,
					max_depth,
					ancestors,
				)?);
			}
			ancestors.pop();
		}

		Ok(BranchNode {
			person_name: name.to_string(),
			path,
			base_radius,
			tip_radius,
			generation,
			children,
		})
	}
}

/// Build a tree with default geometry, growing up from the world origin.
///
/// A root name missing from the map degrades to a single childless node so
/// a data typo does not blank the whole visualization.
pub fn build_tree(
	family: &FamilyMap,
	root: &str,
	max_depth: usize,
	seed: u64,
) -> Result<BranchNode, GrowthError> {
	if !family.contains(root) {
		log::warn!("root {:?} is not in the family map, rendering it as a single node", root);
	}
	BranchGrower::new(GrowthParams::default()).with_seed(seed).grow(
		family,
		root,
		Vec3::ZERO,
		Vec3::Y,
		max_depth,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_child_family() -> FamilyMap {
		FamilyMap::from_pairs([("Root", vec!["C1", "C2"])])
	}

	#[test]
	fn test_deterministic_per_seed() {
		let family = FamilyMap::demo();
		let a = build_tree(&family, "Zahra Rajab", 2, 7).unwrap();
		let b = build_tree(&family, "Zahra Rajab", 2, 7).unwrap();

		for (na, nb) in a.iter_preorder().zip(b.iter_preorder()) {
			assert_eq!(na.person_name, nb.person_name);
			assert_eq!(na.path, nb.path);
		}
	}

	#[test]
	fn test_seed_changes_geometry() {
		let family = FamilyMap::demo();
		let a = build_tree(&family, "Zahra Rajab", 2, 7).unwrap();
		let b = build_tree(&family, "Zahra Rajab", 2, 8).unwrap();
		// same structure, different curves
		assert_eq!(a.count(), b.count());
		assert_ne!(a.path, b.path);
	}

	#[test]
	fn test_structure_matches_family_map() {
		let family = FamilyMap::demo();
		let tree = build_tree(&family, "Zahra Rajab", 4, 1).unwrap();

		for node in tree.iter_preorder() {
			let expected: Vec<_> = family.children_of(&node.person_name).to_vec();
			let actual: Vec<_> =
				node.children.iter().map(|c| c.person_name.clone()).collect();
			assert_eq!(actual, expected, "children of {}", node.person_name);
		}
		assert_eq!(tree.count(), 7);
	}

	#[test]
	fn test_depth_bound() {
		let family = FamilyMap::demo();
		let tree = build_tree(&family, "Zahra Rajab", 1, 0).unwrap();
		assert!(tree.iter_preorder().all(|n| n.generation <= 1));
		assert_eq!(tree.count(), 4);
	}

	#[test]
	fn test_taper_monotonicity() {
		let family = FamilyMap::demo();
		let tree = build_tree(&family, "Zahra Rajab", 2, 0).unwrap();
		for node in tree.iter_preorder() {
			assert!(node.tip_radius <= node.base_radius);
			for child in &node.children {
				assert!(
					child.base_radius < node.base_radius,
					"{} not thinner than {}",
					child.person_name,
					node.person_name
				);
			}
		}
	}

	#[test]
	fn test_path_anchored_at_both_ends() {
		let family = two_child_family();
		let tree = build_tree(&family, "Root", 2, 3).unwrap();
		// wobble is exactly zero at t=0 and t=1, so the trunk starts at the
		// origin and its tip lies exactly on the growth axis
		assert_eq!(tree.origin(), Vec3::ZERO);
		assert_eq!(tree.tip().x, 0.0);
		assert_eq!(tree.tip().z, 0.0);
		assert!(tree.tip().y > 0.0);
		assert!(tree.path.len() >= 2);
	}

	#[test]
	fn test_children_start_at_parent_tip() {
		let family = FamilyMap::demo();
		let tree = build_tree(&family, "Zahra Rajab", 2, 11).unwrap();
		for node in tree.iter_preorder() {
			for child in &node.children {
				assert_eq!(child.origin(), node.tip());
			}
		}
	}

	#[test]
	fn test_fan_angles_even_symmetric() {
		let angles = fan_angles(4, 1.0);
		assert_eq!(angles.len(), 4);
		for (i, angle) in angles.iter().enumerate() {
			let mirror = angles[angles.len() - 1 - i];
			assert!((angle + mirror).abs() < 1e-6, "{} vs {}", angle, mirror);
		}
		assert!(!angles.contains(&0.0));
	}

	#[test]
	fn test_fan_angles_odd_contains_zero() {
		assert!(fan_angles(3, 1.0).contains(&0.0));
		assert_eq!(fan_angles(1, 1.0), [0.0]);
	}

	#[test]
	fn test_cycle_rejected() {
		let family = FamilyMap::from_pairs([("A", vec!["B"]), ("B", vec!["A"])]);
		let err = build_tree(&family, "A", 3, 0).unwrap_err();
		assert_eq!(err, GrowthError::CyclicFamilyMap { name: "A".to_string() });
	}

	#[test]
	fn test_two_children_scenario() {
		let family = two_child_family();
		let tree = build_tree(&family, "Root", 2, 0).unwrap();

		assert_eq!(tree.person_name, "Root");
		assert_eq!(tree.children.len(), 2);
		for (child, name) in tree.children.iter().zip(["C1", "C2"]) {
			assert_eq!(child.person_name, name);
			assert_eq!(child.generation, 1);
			assert!(child.children.is_empty());
			assert!(child.base_radius < tree.base_radius);
		}
	}

	#[test]
	fn test_depth_zero_truncates() {
		let family = two_child_family();
		let tree = build_tree(&family, "Root", 0, 0).unwrap();
		assert_eq!(tree.count(), 1);
		assert!(tree.children.is_empty());
	}

	#[test]
	fn test_unknown_root_is_single_node() {
		let family = FamilyMap::demo();
		let tree = build_tree(&family, "Nobody", 2, 0).unwrap();
		assert_eq!(tree.count(), 1);
	}

	#[test]
	fn test_invalid_geometry_rejected() {
		let family = two_child_family();
		let grower = BranchGrower::new(GrowthParams::default());
		let err = grower
			.grow(&family, "Root", Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Y, 1)
			.unwrap_err();
		assert!(matches!(err, GrowthError::InvalidGeometryInput { .. }));

		let err = grower.grow(&family, "Root", Vec3::ZERO, Vec3::ZERO, 1).unwrap_err();
		assert!(matches!(err, GrowthError::InvalidGeometryInput { .. }));
	}
}
