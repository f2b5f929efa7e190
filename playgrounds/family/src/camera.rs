use bevy::prelude::*;
use std::f32::consts::PI;

// Initial framing: a few meters up and back, looking at the lower trunk.
const HOME_POSITION: Vec3 = Vec3::new(0.0, 6.0, 12.0);
const HOME_TARGET: Vec3 = Vec3::new(0.0, 2.0, 0.0);

#[derive(Component)]
pub struct CameraController {
	pub speed: f32,
	pub sensitivity: f32,
	pub yaw: f32,
	pub pitch: f32,
}

/// Transform looking from the home position at the trunk, with the yaw and
/// pitch the controller needs extracted from its rotation quaternion.
fn home_pose() -> (Transform, f32, f32) {
	let transform = Transform::from_translation(HOME_POSITION).looking_at(HOME_TARGET, Vec3::Y);

	// Extract Euler angles (yaw around Y, pitch around X)
	let (x, y, z, w) =
		(transform.rotation.x, transform.rotation.y, transform.rotation.z, transform.rotation.w);

	let sin_yaw = 2.0 * (w * y + x * z);
	let cos_yaw = 1.0 - 2.0 * (y * y + z * z);
	let yaw = sin_yaw.atan2(cos_yaw);

	let sin_pitch = 2.0 * (w * x - y * z);
	let pitch = sin_pitch.asin();

	(transform, yaw, pitch)
}

pub fn setup_camera(mut commands: Commands) {
	let (transform, yaw, pitch) = home_pose();

	log::info!("Setting up camera at {:?}, looking at {:?}", HOME_POSITION, HOME_TARGET);

	commands.spawn((
		Camera3d::default(),
		transform,
		Projection::Perspective(PerspectiveProjection {
			near: 0.1,
			far: 1000.0,
			..default()
		}),
		CameraController { speed: 8.0, sensitivity: 0.005, yaw, pitch },
	));
}

pub fn camera_controller(
	keyboard_input: Res<ButtonInput<KeyCode>>,
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	mut mouse_motion: MessageReader<bevy::input::mouse::MouseMotion>,
	time: Res<Time>,
	mut query: Query<(&mut Transform, &mut CameraController), With<Camera3d>>,
) {
	let Ok((mut transform, mut controller)) = query.single_mut() else {
		return;
	};

	// R snaps back to the initial framing
	if keyboard_input.just_pressed(KeyCode::KeyR) {
		let (home, yaw, pitch) = home_pose();
		*transform = home;
		controller.yaw = yaw;
		controller.pitch = pitch;
		mouse_motion.clear();
		return;
	}

	// Mouse look while the right button is held, so left clicks stay free
	// for node selection
	let mut mouse_delta = Vec2::ZERO;
	for event in mouse_motion.read() {
		mouse_delta += event.delta;
	}

	if mouse_buttons.pressed(MouseButton::Right) {
		controller.yaw -= mouse_delta.x * controller.sensitivity;
		controller.pitch -= mouse_delta.y * controller.sensitivity;
		controller.pitch = controller.pitch.clamp(-PI / 2.0 + 0.1, PI / 2.0 - 0.1);
	}

	let yaw_quat = Quat::from_axis_angle(Vec3::Y, controller.yaw);
	let pitch_quat = Quat::from_axis_angle(Vec3::X, controller.pitch);
	transform.rotation = yaw_quat * pitch_quat;

	// Free-fly movement
	let mut movement = Vec3::ZERO;
	let forward = transform.forward();
	let right = transform.right();

	if keyboard_input.pressed(KeyCode::KeyW) {
		movement += *forward;
	}
	if keyboard_input.pressed(KeyCode::KeyS) {
		movement -= *forward;
	}
	if keyboard_input.pressed(KeyCode::KeyA) {
		movement -= *right;
	}
	if keyboard_input.pressed(KeyCode::KeyD) {
		movement += *right;
	}
	if keyboard_input.pressed(KeyCode::Space) {
		movement += Vec3::Y;
	}
	if keyboard_input.pressed(KeyCode::ShiftLeft) {
		movement -= Vec3::Y;
	}

	if movement.length() > 0.0 {
		movement = movement.normalize() * controller.speed * time.delta_secs();
		transform.translation += movement;
	}
}
