use bevy::prelude::*;

/// Screen-space name tag anchored to a branch tip, the overlay-label
/// analog of the original's DOM labels.
#[derive(Component)]
pub struct NameLabel {
	pub anchor: Vec3,
}

pub fn spawn_label(commands: &mut Commands, name: &str, anchor: Vec3) {
	commands.spawn((
		Text::new(name),
		TextFont { font_size: 14.0, ..default() },
		TextColor(Color::srgb(0.15, 0.2, 0.25)),
		Node {
			position_type: PositionType::Absolute,
			// parked offscreen until the first projection pass
			left: Val::Px(-1000.0),
			top: Val::Px(-1000.0),
			..default()
		},
		NameLabel { anchor },
	));
}

/// Reproject every label to its anchor's viewport position each frame,
/// hiding labels that fall behind the camera.
pub fn update_labels(
	camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
	mut labels: Query<(&NameLabel, &mut Node, &mut Visibility)>,
) {
	let Ok((camera, camera_transform)) = camera_query.single() else {
		return;
	};

	for (label, mut node, mut visibility) in &mut labels {
		match camera.world_to_viewport(camera_transform, label.anchor + Vec3::Y * 0.18) {
			Ok(position) => {
				node.left = Val::Px(position.x + 10.0);
				node.top = Val::Px(position.y - 10.0);
				*visibility = Visibility::Inherited;
			}
			Err(_) => {
				*visibility = Visibility::Hidden;
			}
		}
	}
}
