use crate::branch_mesh::{tapered_tube, RADIAL_SEGMENTS};
use crate::labels::{self, NameLabel};
use crate::leaf_material::LeafMaterial;
use crate::{LeavesEnabled, TreeState};
use bevy::prelude::*;
use lineage::{BranchGrower, BranchNode, BranchRng};
use noise::{NoiseFn, Perlin};

/// Marker on every entity spawned for the current tree, so a rebuild can
/// clear the whole scene in one pass.
#[derive(Component)]
pub struct TreeScene;

/// Clickable sphere at a branch tip.
#[derive(Component)]
pub struct NodeMarker {
	pub person_name: String,
	pub radius: f32,
}

#[derive(Component)]
pub struct Leaf {
	pub phase: f32,
	pub base_rotation: Quat,
}

/// Request a full regeneration; the previous tree stays up if the build
/// fails.
#[derive(Message)]
pub struct RebuildTree;

pub const MARKER_RADIUS: f32 = 0.12;
const LEAVES_PER_TIP: usize = 16;
const LEAF_SCATTER_RADIUS: f32 = 0.55;

#[derive(Resource)]
pub struct TreeAssets {
	pub branch_material: Handle<StandardMaterial>,
	pub marker_material: Handle<StandardMaterial>,
	pub marker_selected_material: Handle<StandardMaterial>,
	pub leaf_material: Handle<LeafMaterial>,
	pub marker_mesh: Handle<Mesh>,
	pub leaf_mesh: Handle<Mesh>,
}

pub fn setup_tree_assets(
	mut commands: Commands,
	mut meshes: ResMut<Assets<Mesh>>,
	mut materials: ResMut<Assets<StandardMaterial>>,
	mut leaf_materials: ResMut<Assets<LeafMaterial>>,
) {
	let branch_material = materials.add(StandardMaterial {
		base_color: Color::srgb(0.545, 0.271, 0.075),
		perceptual_roughness: 0.9,
		..default()
	});

	let marker_material = materials.add(StandardMaterial {
		base_color: Color::srgb(1.0, 0.42, 0.42),
		emissive: LinearRgba::rgb(0.13, 0.0, 0.0),
		perceptual_roughness: 0.7,
		..default()
	});

	let marker_selected_material = materials.add(StandardMaterial {
		base_color: Color::srgb(1.0, 0.85, 0.2),
		emissive: LinearRgba::rgb(0.3, 0.22, 0.0),
		perceptual_roughness: 0.5,
		..default()
	});

	let leaf_material = leaf_materials.add(LeafMaterial {
		base_color: Vec4::new(0.2, 0.8, 0.3, 1.0),
	});

	let marker_mesh = meshes.add(Sphere::new(MARKER_RADIUS));
	let leaf_mesh = meshes.add(Circle::new(0.09));

	commands.insert_resource(TreeAssets {
		branch_material,
		marker_material,
		marker_selected_material,
		leaf_material,
		marker_mesh,
		leaf_mesh,
	});
}

pub fn request_initial_build(mut rebuilds: MessageWriter<RebuildTree>) {
	rebuilds.write(RebuildTree);
}

pub fn regenerate_on_key(
	keyboard_input: Res<ButtonInput<KeyCode>>,
	mut rebuilds: MessageWriter<RebuildTree>,
) {
	if keyboard_input.just_pressed(KeyCode::KeyG) {
		log::info!("Regenerating tree");
		rebuilds.write(RebuildTree);
	}
}

#[allow(clippy::too_many_arguments)]
pub fn rebuild_tree(
	mut commands: Commands,
	mut rebuilds: MessageReader<RebuildTree>,
	mut state: ResMut<TreeState>,
	assets: Res<TreeAssets>,
	mut meshes: ResMut<Assets<Mesh>>,
	leaves_enabled: Res<LeavesEnabled>,
	scene_entities: Query<Entity, With<TreeScene>>,
	label_entities: Query<Entity, With<NameLabel>>,
) {
	// drain the queue; one pass rebuilds everything
	if rebuilds.read().last().is_none() {
		return;
	}

	let grower = BranchGrower::new(state.params).with_seed(state.seed);
	let tree = match grower.grow(&state.family, &state.root_name, Vec3::ZERO, Vec3::Y, state.max_depth)
	{
		Ok(tree) => tree,
		Err(err) => {
			// leave the previous scene untouched
			log::warn!("tree rebuild failed: {}", err);
			return;
		}
	};

	for entity in &scene_entities {
		commands.entity(entity).despawn();
	}
	for entity in &label_entities {
		commands.entity(entity).despawn();
	}

	log::info!("Spawning {} branches for root {:?}", tree.count(), state.root_name);
	spawn_branches(&mut commands, &assets, &mut meshes, &tree);
	spawn_leaves(&mut commands, &assets, &tree, state.seed, leaves_enabled.0);

	state.tree = Some(tree);
}

fn spawn_branches(
	commands: &mut Commands,
	assets: &TreeAssets,
	meshes: &mut Assets<Mesh>,
	tree: &BranchNode,
) {
	for node in tree.iter_preorder() {
		let tube = tapered_tube(&node.path, node.base_radius, node.tip_radius, RADIAL_SEGMENTS);
		commands.spawn((
			Mesh3d(meshes.add(tube)),
			MeshMaterial3d(assets.branch_material.clone()),
			Transform::IDENTITY,
			TreeScene,
		));

		commands.spawn((
			Mesh3d(assets.marker_mesh.clone()),
			MeshMaterial3d(assets.marker_material.clone()),
			Transform::from_translation(node.tip()),
			NodeMarker { person_name: node.person_name.clone(), radius: MARKER_RADIUS },
			TreeScene,
		));

		labels::spawn_label(commands, &node.person_name, node.tip());
	}
}

/// Scatter leaf discs around the childless tips. Placement mixes the
/// per-person rng (stable orientation per rebuild) with Perlin jitter so
/// clusters look organic rather than spherical.
fn spawn_leaves(
	commands: &mut Commands,
	assets: &TreeAssets,
	tree: &BranchNode,
	seed: u64,
	visible: bool,
) {
	let noise = Perlin::new(seed as u32);
	let visibility = if visible { Visibility::Inherited } else { Visibility::Hidden };

	for node in tree.iter_preorder().filter(|node| node.children.is_empty()) {
		let mut rng = BranchRng::for_person(seed.wrapping_add(0x1eaf), &node.person_name);
		let tip = node.tip();

		for i in 0..LEAVES_PER_TIP {
			let direction = Vec3::new(
				rng.next_symmetric(),
				rng.next_symmetric() * 0.6 + 0.2,
				rng.next_symmetric(),
			)
			.try_normalize()
			.unwrap_or(Vec3::Y);

			let jitter = noise.get([
				tip.x as f64 + i as f64 * 0.37,
				tip.y as f64,
				tip.z as f64 - i as f64 * 0.11,
			]) as f32;
			let distance = LEAF_SCATTER_RADIUS * (0.35 + 0.65 * rng.next_f32()) * (1.0 + 0.3 * jitter);

			let position = tip + direction * distance;
			let base_rotation = if direction.abs_diff_eq(Vec3::Z, 1e-4) {
				Quat::IDENTITY
			} else {
				Quat::from_rotation_arc(Vec3::Z, direction)
			};

			commands.spawn((
				Mesh3d(assets.leaf_mesh.clone()),
				MeshMaterial3d(assets.leaf_material.clone()),
				Transform::from_translation(position).with_rotation(base_rotation),
				visibility,
				Leaf { phase: rng.next_f32() * std::f32::consts::TAU, base_rotation },
				TreeScene,
			));
		}
	}
}

pub fn toggle_leaves(
	keyboard_input: Res<ButtonInput<KeyCode>>,
	mut enabled: ResMut<LeavesEnabled>,
	mut leaves: Query<&mut Visibility, With<Leaf>>,
) {
	if !keyboard_input.just_pressed(KeyCode::KeyL) {
		return;
	}

	enabled.0 = !enabled.0;
	log::info!("Leaves {}", if enabled.0 { "on" } else { "off" });

	for mut visibility in &mut leaves {
		*visibility = if enabled.0 { Visibility::Inherited } else { Visibility::Hidden };
	}
}

/// Gentle wind sway.
pub fn animate_leaves(time: Res<Time>, mut leaves: Query<(&Leaf, &mut Transform)>) {
	let t = time.elapsed_secs();
	for (leaf, mut transform) in &mut leaves {
		let sway = (t * 1.7 + leaf.phase).sin() * 0.12;
		transform.rotation = Quat::from_rotation_y(sway) * leaf.base_rotation;
	}
}
