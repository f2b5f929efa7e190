use crate::scene::{NodeMarker, RebuildTree};
use crate::{SelectedPerson, TreeState};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use lineage::BranchNode;

/// Nearest positive hit distance of a ray against a sphere, if any.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
	let to_center = origin - center;
	let b = to_center.dot(direction);
	let c = to_center.length_squared() - radius * radius;
	let discriminant = b * b - c;
	if discriminant < 0.0 {
		return None;
	}
	let sqrt_d = discriminant.sqrt();
	let near = -b - sqrt_d;
	let far = -b + sqrt_d;
	if near > 0.0 {
		Some(near)
	} else if far > 0.0 {
		Some(far)
	} else {
		None
	}
}

/// Left click picks the closest node marker under the cursor, or clears
/// the selection when the click hits nothing.
pub fn select_node(
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	windows: Query<&Window, With<PrimaryWindow>>,
	camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
	markers: Query<(&NodeMarker, &GlobalTransform)>,
	mut selected: ResMut<SelectedPerson>,
) {
	if !mouse_buttons.just_pressed(MouseButton::Left) {
		return;
	}
	let Ok(window) = windows.single() else {
		return;
	};
	let Some(cursor) = window.cursor_position() else {
		return;
	};
	let Ok((camera, camera_transform)) = camera_query.single() else {
		return;
	};
	let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
		return;
	};

	let mut best: Option<(f32, &str)> = None;
	for (marker, transform) in &markers {
		// slightly generous pick radius
		let radius = marker.radius * 1.6;
		if let Some(distance) =
			ray_sphere(ray.origin, *ray.direction, transform.translation(), radius)
		{
			if best.is_none_or(|(nearest, _)| distance < nearest) {
				best = Some((distance, marker.person_name.as_str()));
			}
		}
	}

	let picked = best.map(|(_, name)| name.to_string());
	if let Some(name) = &picked {
		log::info!("Selected {:?}", name);
	}
	selected.0 = picked;
}

/// Swap marker materials whenever the selection changes, and after a
/// rebuild respawns the markers.
pub fn highlight_selection(
	selected: Res<SelectedPerson>,
	assets: Res<crate::scene::TreeAssets>,
	respawned: Query<(), Added<NodeMarker>>,
	mut markers: Query<(&NodeMarker, &mut MeshMaterial3d<StandardMaterial>)>,
) {
	if !selected.is_changed() && respawned.is_empty() {
		return;
	}
	for (marker, mut material) in &mut markers {
		let is_selected = selected.0.as_deref() == Some(marker.person_name.as_str());
		material.0 = if is_selected {
			assets.marker_selected_material.clone()
		} else {
			assets.marker_material.clone()
		};
	}
}

/// Depth limit to use after appending a child under `parent`: one deeper
/// than before when the parent already sits at the limit, so the new
/// generation is not truncated out of view.
fn deepened_max_depth(tree: Option<&BranchNode>, parent: &str, max_depth: usize) -> usize {
	match tree.and_then(|tree| tree.find(parent)) {
		Some(node) if node.generation == max_depth => max_depth + 1,
		_ => max_depth,
	}
}

/// N appends a new child under the selected person and rebuilds. Failures
/// (no selection, unknown parent, duplicate name) only log; the scene
/// stays as it was.
pub fn add_child_to_selection(
	keyboard_input: Res<ButtonInput<KeyCode>>,
	selected: Res<SelectedPerson>,
	mut state: ResMut<TreeState>,
	mut rebuilds: MessageWriter<RebuildTree>,
) {
	if !keyboard_input.just_pressed(KeyCode::KeyN) {
		return;
	}
	let Some(parent) = selected.0.clone() else {
		log::info!("No node selected, click a marker first");
		return;
	};

	let child = format!("New Member {}", state.added + 1);
	match state.family.add_child(&parent, child.clone()) {
		Ok(()) => {
			state.added += 1;
			let deepened = deepened_max_depth(state.tree.as_ref(), &parent, state.max_depth);
			if deepened != state.max_depth {
				log::info!("Deepening tree to {} generations", deepened);
				state.max_depth = deepened;
			}
			log::info!("Added {:?} under {:?}", child, parent);
			rebuilds.write(RebuildTree);
		}
		Err(err) => {
			log::warn!("Could not add child: {}", err);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ray_hits_sphere_ahead() {
		let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 1.0);
		assert!((t.unwrap() - 4.0).abs() < 1e-5);
	}

	#[test]
	fn test_ray_misses_offset_sphere() {
		assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(3.0, 0.0, 5.0), 1.0).is_none());
	}

	#[test]
	fn test_sphere_behind_ray_is_ignored() {
		assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
	}

	#[test]
	fn test_ray_starting_inside_hits_exit() {
		let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::ZERO, 1.0);
		assert!((t.unwrap() - 1.0).abs() < 1e-5);
	}

	#[test]
	fn test_depth_only_deepens_at_the_frontier() {
		let family = lineage::FamilyMap::demo();
		let tree = lineage::build_tree(&family, "Zahra Rajab", 2, 0).unwrap();

		// Humail sits at the depth limit, Yunus does not
		assert_eq!(deepened_max_depth(Some(&tree), "Humail Mustafa", 2), 3);
		assert_eq!(deepened_max_depth(Some(&tree), "Yunus Habib", 2), 2);
		assert_eq!(deepened_max_depth(Some(&tree), "Nobody", 2), 2);
		assert_eq!(deepened_max_depth(None, "Humail Mustafa", 2), 2);
	}

	#[test]
	fn test_child_added_at_depth_limit_stays_visible() {
		let mut family = lineage::FamilyMap::demo();
		family.add_child("Humail Mustafa", "New Member 1").unwrap();

		// at the old limit the new member is truncated away
		let tree = lineage::build_tree(&family, "Zahra Rajab", 2, 0).unwrap();
		assert!(tree.find("New Member 1").is_none());

		let deepened = deepened_max_depth(Some(&tree), "Humail Mustafa", 2);
		let tree = lineage::build_tree(&family, "Zahra Rajab", deepened, 0).unwrap();
		assert!(tree.find("New Member 1").is_some());
	}
}
