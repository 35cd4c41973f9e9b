// view.rs      View module
//
// Copyright (c) 2022-2024  Douglas Lau
//
use crate::canvas::Canvas;
use crate::mesh::build_mesh;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    log::LogPlugin,
    pbr::wireframe::{Wireframe, WireframeConfig, WireframePlugin},
    prelude::*,
    window::{CursorMoved, PrimaryWindow, Window, WindowResized},
};
use protagonist::{Drawing, NodeId, Palette, Primitive, Scene, Viewport};
use std::f32::consts::PI;

/// Drawing with its host canvas
#[derive(Resource)]
struct ViewState {
    drawing: Drawing,
    canvas: Canvas,
}

/// Object root (rotated by the frame updater)
#[derive(Component)]
struct ObjectRoot;

/// Camera controller component
#[derive(Component)]
struct CameraController {
    focus: Vec3,
    distance: f32,
}

/// Spawner for scene graph entities
struct Spawner<'a> {
    meshes: &'a mut Assets<Mesh>,
    /// Palette materials, with wireframe flag
    materials: Vec<(Handle<StandardMaterial>, bool)>,
    /// Meshes already built
    cache: Vec<(Primitive, Handle<Mesh>)>,
}

impl CameraController {
    /// Create a new camera controller
    fn new(pos: Vec3, focus: Vec3) -> Self {
        CameraController {
            focus,
            distance: pos.distance(focus),
        }
    }

    /// Update camera transform
    fn update_transform(&self, xform: &mut Transform) {
        let rot = Mat3::from_quat(xform.rotation);
        xform.translation =
            self.focus + rot.mul_vec3(Vec3::new(0.0, 0.0, self.distance));
    }

    /// Pan camera
    fn pan(&mut self, xform: &mut Transform, motion: Vec2, win_sz: Vec2) {
        let proj = PerspectiveProjection::default();
        let pan =
            motion * Vec2::new(proj.fov * proj.aspect_ratio, proj.fov) / win_sz;
        let right = xform.rotation * Vec3::X * -pan.x;
        let up = xform.rotation * Vec3::Y * pan.y;
        self.focus += (right + up) * self.distance;
        self.update_transform(xform);
    }

    /// Rotate camera
    fn rotate(&mut self, xform: &mut Transform, motion: Vec2, win_sz: Vec2) {
        let delta_x = motion.x / win_sz.x * PI;
        let delta_y = motion.y / win_sz.y * PI;
        xform.rotation = Quat::from_rotation_y(-delta_x * 2.0)
            * xform.rotation
            * Quat::from_rotation_x(-delta_y);
        self.update_transform(xform);
    }

    /// Zoom camera in or out
    fn zoom(&mut self, xform: &mut Transform, motion: f32) {
        if motion < 0.0 {
            self.distance -= motion * self.distance.max(1.0) * 0.1;
        } else {
            self.distance -= motion * self.distance * 0.1;
        }
        self.update_transform(xform);
    }
}

/// Convert a protagonist transform to a bevy transform
fn bevy_transform(xform: &protagonist::Transform) -> Transform {
    Transform {
        translation: Vec3::from_array(xform.translation.to_array()),
        rotation: Quat::from_array(xform.rotation.to_array()),
        scale: Vec3::from_array(xform.scale.to_array()),
    }
}

/// Build a bevy material from a palette material
fn standard_material(mat: &protagonist::Material) -> StandardMaterial {
    let [r, g, b] = mat.linear_rgb();
    if let Some(map) = mat.normal_map {
        debug!("normal map `{map}` not loaded");
    }
    StandardMaterial {
        base_color: Color::rgb_linear(r, g, b),
        metallic: mat.metalness,
        perceptual_roughness: mat.pbr_roughness(),
        double_sided: mat.wireframe,
        cull_mode: None,
        ..default()
    }
}

impl<'a> Spawner<'a> {
    /// Create a new spawner
    fn new(
        meshes: &'a mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        let materials = Palette::global()
            .iter()
            .map(|m| (materials.add(standard_material(m)), m.wireframe))
            .collect();
        Spawner {
            meshes,
            materials,
            cache: Vec::new(),
        }
    }

    /// Get mesh handle for a primitive
    fn mesh(&mut self, prim: &Primitive) -> Handle<Mesh> {
        if let Some((_, handle)) = self.cache.iter().find(|(p, _)| p == prim) {
            return handle.clone();
        }
        let handle = self.meshes.add(build_mesh(&prim.shape.mesh()));
        self.cache.push((*prim, handle.clone()));
        handle
    }

    /// Spawn a node with all its descendants
    fn spawn_node(
        &mut self,
        commands: &mut Commands,
        scene: &Scene,
        id: NodeId,
    ) -> Entity {
        let node = scene.node(id);
        let transform = bevy_transform(&node.xform);
        let entity = match node.primitive() {
            Some(prim) => {
                let (material, wireframe) = self
                    .materials
                    .get(prim.material.0)
                    .cloned()
                    .unwrap_or_default();
                let mut ec = commands.spawn(PbrBundle {
                    mesh: self.mesh(prim),
                    material,
                    transform,
                    ..default()
                });
                if wireframe {
                    ec.insert(Wireframe);
                }
                ec.id()
            }
            None => commands.spawn(SpatialBundle::from_transform(transform)).id(),
        };
        if let Some(name) = node.name() {
            commands.entity(entity).insert(Name::new(name.to_string()));
        }
        for child in scene.children(id) {
            let c = self.spawn_node(commands, scene, *child);
            commands.entity(entity).add_child(c);
        }
        entity
    }
}

/// View a drawing in an app window
pub fn view_drawing(drawing: Drawing, canvas: Canvas) {
    let mut app = App::new();
    app.insert_resource(ViewState { drawing, canvas })
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 500.0,
        })
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,protagonist=debug".into(),
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "protagonist".to_string(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(WireframePlugin)
        .add_systems(
            Startup,
            (init_wireframe, spawn_light, spawn_camera, spawn_drawing),
        )
        .add_systems(
            Update,
            (
                track_pointer,
                track_resize,
                update_frame,
                pan_rotate_camera,
                zoom_camera,
                update_light_direction,
                toggle_wireframe,
                toggle_help,
            ),
        )
        .run();
}

/// System to initialize wireframe config
fn init_wireframe(mut wireframe_config: ResMut<WireframeConfig>) {
    wireframe_config.global = false;
}

/// System to spawn light
fn spawn_light(mut commands: Commands) {
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            ..Default::default()
        },
        transform: Transform::from_xyz(4.0, 8.0, 4.0)
            .looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });
}

/// System to spawn camera
fn spawn_camera(mut commands: Commands) {
    let look = Vec3::new(0.0, -1.0, 0.0);
    let pos = Vec3::new(0.0, 2.0, 10.0);
    let id = commands
        .spawn((
            Camera3dBundle {
                transform: Transform::from_translation(pos)
                    .looking_at(look, Vec3::Y),
                ..Default::default()
            },
            CameraController::new(pos, look),
        ))
        .id();
    spawn_help(&mut commands, id);
}

/// Spawn help text
fn spawn_help(commands: &mut Commands, camera_id: Entity) {
    commands.spawn((
        TargetCamera(camera_id),
        TextBundle::from_section(
            "_____ Mouse _____\n\
             move: turn figure\n\
             right: pan camera\n\
             middle: rotate camera\n\
             wheel: zoom camera\n\
             \n\
             _____ Keys _____\n\
             'Q': toggle help text\n\
             'W': toggle wireframe\n\
             'D': light direction",
            TextStyle {
                font_size: 18.0,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        }),
    ));
}

/// System to spawn the drawing scene graph
fn spawn_drawing(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<ViewState>,
) {
    let drawing = &state.drawing;
    let scene = drawing.scene();
    let mut spawner = Spawner::new(&mut *meshes, &mut *materials);
    for root in scene.roots() {
        let entity = spawner.spawn_node(&mut commands, scene, *root);
        if *root == drawing.object_root() {
            commands.entity(entity).insert(ObjectRoot);
        }
    }
    info!("spawned {} meshes", spawner.cache.len());
}

/// System to pass pointer movement to the drawing
fn track_pointer(
    mut ev_cursor: EventReader<CursorMoved>,
    mut state: ResMut<ViewState>,
) {
    for ev in ev_cursor.read() {
        state.drawing.pointer_moved(ev.position.x, ev.position.y);
    }
}

/// System to track window size
fn track_resize(
    mut ev_resize: EventReader<WindowResized>,
    mut state: ResMut<ViewState>,
) {
    for ev in ev_resize.read() {
        state
            .drawing
            .set_viewport(Viewport::new(ev.width, ev.height));
    }
}

/// System to run a requested animation frame
fn update_frame(
    time: Res<Time>,
    mut state: ResMut<ViewState>,
    mut query: Query<&mut Transform, With<ObjectRoot>>,
) {
    let ViewState { drawing, canvas } = &mut *state;
    if !canvas.take_frame() {
        return;
    }
    drawing.tick(time.elapsed_seconds(), canvas);
    let root = drawing.scene().node(drawing.object_root());
    let rotation = Quat::from_array(root.xform.rotation.to_array());
    for mut xform in &mut query {
        xform.rotation = rotation;
    }
}

/// System to pan/rotate the camera
fn pan_rotate_camera(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut ev_motion: EventReader<MouseMotion>,
    mut query: Query<(&mut CameraController, &mut Transform)>,
) {
    if !mouse.pressed(MouseButton::Right) && !mouse.pressed(MouseButton::Middle)
    {
        ev_motion.clear();
        return;
    }
    let mut motion = Vec2::ZERO;
    for ev in ev_motion.read() {
        motion += ev.delta;
    }
    if motion.length_squared() > 0.0 {
        let Ok(window) = windows.get_single() else {
            return;
        };
        let win_sz = Vec2::new(window.width(), window.height());
        if let Ok((mut cam, mut xform)) = query.get_single_mut() {
            if mouse.pressed(MouseButton::Right) {
                cam.pan(&mut xform, motion, win_sz);
            } else {
                cam.rotate(&mut xform, motion, win_sz);
            }
        }
    }
}

/// System to zoom the camera
fn zoom_camera(
    mut ev_scroll: EventReader<MouseWheel>,
    mut query: Query<(&mut CameraController, &mut Transform)>,
) {
    let mut motion = 0.0;
    for ev in ev_scroll.read() {
        motion += ev.y;
    }
    if motion.abs() > 0.0 {
        if let Ok((mut cam, mut xform)) = query.get_single_mut() {
            cam.zoom(&mut xform, motion);
        }
    }
}

/// System to update the directional light
#[allow(clippy::type_complexity)]
fn update_light_direction(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut queries: ParamSet<(
        Query<&Transform, With<CameraController>>,
        Query<&mut Transform, With<DirectionalLight>>,
    )>,
) {
    if keyboard.just_pressed(KeyCode::KeyD) {
        let Ok(cam_rot) = queries.p0().get_single().map(|x| x.rotation) else {
            return;
        };
        for mut xform in &mut queries.p1() {
            xform.rotation = cam_rot;
        }
    }
}

/// System to toggle wireframe
fn toggle_wireframe(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut wireframe_config: ResMut<WireframeConfig>,
) {
    if keyboard.just_pressed(KeyCode::KeyW) {
        wireframe_config.global = !wireframe_config.global;
    }
}

/// System to toggle help text
fn toggle_help(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut Visibility, With<Text>>,
) {
    if keyboard.just_pressed(KeyCode::KeyQ) {
        for mut vis in &mut query {
            *vis = if *vis == Visibility::Hidden {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
        }
    }
}
