use bevy::prelude::*;
use std::f32::consts::PI;

mod branch_mesh;
mod camera;
mod checkerboard_material;
mod ground;
mod labels;
mod leaf_material;
mod picking;
mod scene;
mod ui;

use checkerboard_material::CheckerboardMaterial;
use leaf_material::LeafMaterial;
use lineage::{BranchNode, FamilyMap, GrowthParams};

pub use camera::CameraController;
pub use scene::RebuildTree;

/// Everything a rebuild needs, plus the last successfully built tree.
///
/// All mutable application state lives here (and in the small resources
/// below) rather than in globals; the generator itself stays pure.
#[derive(Resource)]
pub struct TreeState {
	pub family: FamilyMap,
	pub root_name: String,
	pub seed: u64,
	pub max_depth: usize,
	pub params: GrowthParams,
	/// Last tree that built cleanly; kept on screen if a rebuild fails.
	pub tree: Option<BranchNode>,
	/// Counter for naming interactively added members.
	pub added: usize,
}

/// Person picked by clicking their node marker, if any.
#[derive(Resource, Default)]
pub struct SelectedPerson(pub Option<String>);

/// Whether the decorative leaves are shown.
#[derive(Resource)]
pub struct LeavesEnabled(pub bool);

pub struct FamilyTreePlugin {
	pub seed: u64,
}

impl Plugin for FamilyTreePlugin {
	fn build(&self, app: &mut App) {
		app.add_plugins(bevy::pbr::MaterialPlugin::<LeafMaterial>::default());
		app.add_plugins(bevy::pbr::MaterialPlugin::<CheckerboardMaterial>::default());

		let family = match FamilyMap::demo().validate() {
			Ok(()) => FamilyMap::demo(),
			Err(err) => {
				log::error!("family map is invalid, starting empty: {}", err);
				FamilyMap::new()
			}
		};

		app.insert_resource(ClearColor(Color::srgb(0.94, 0.96, 0.97)))
			.insert_resource(TreeState {
				family,
				root_name: "Zahra Rajab".to_string(),
				seed: self.seed,
				max_depth: 2,
				params: GrowthParams::default(),
				tree: None,
				added: 0,
			})
			.insert_resource(SelectedPerson::default())
			.insert_resource(LeavesEnabled(true))
			.add_message::<RebuildTree>()
			.add_systems(
				Startup,
				(
					camera::setup_camera,
					setup_lighting,
					ground::setup_ground,
					ui::setup_overlay,
					scene::setup_tree_assets,
					scene::request_initial_build,
				),
			)
			.add_systems(
				Update,
				(
					camera::camera_controller,
					scene::rebuild_tree,
					scene::regenerate_on_key,
					scene::toggle_leaves,
					scene::animate_leaves,
					labels::update_labels,
					picking::select_node,
					picking::highlight_selection,
					picking::add_child_to_selection,
					ui::update_overlay,
				),
			);
	}
}

fn setup_lighting(mut commands: Commands) {
	// Base lighting for all surfaces, simulates bounced light
	commands.insert_resource(AmbientLight {
		color: Color::WHITE,
		brightness: 150.0,
		affects_lightmapped_meshes: true,
	});

	// Main directional light (sun)
	commands.spawn((
		DirectionalLight { illuminance: 10000.0, shadows_enabled: true, ..default() },
		Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -PI / 4.0, PI / 4.0, 0.0)),
	));

	// Fill light from the opposite side, no shadows
	commands.spawn((
		DirectionalLight { illuminance: 1500.0, shadows_enabled: false, ..default() },
		Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, PI / 4.0, -PI / 4.0, 0.0)),
	));
}
