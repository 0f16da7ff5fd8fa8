//! WGSL sources and the uniform layouts that feed them.
//!
//! The foliage shader is generated from the constants in [`crate::easing`]
//! and [`crate::foliage`] so the CPU and GPU versions cannot drift apart.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::dataset::Role;
use crate::easing::STAGGER_SPREAD;
use crate::foliage::{
    ACCENT_INFLUENCE, SPARKLE_COLOR, SPARKLE_THRESHOLD, WANDER_CHAOS, WANDER_FORMED,
};
use crate::palette::Palette;

/// Per-frame uniforms of the foliage point pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FoliageUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub color_base: [f32; 4],
    pub color_accent: [f32; 4],
    /// Framebuffer size in pixels.
    pub viewport: [f32; 2],
    pub time: f32,
    pub progress: f32,
}

impl FoliageUniforms {
    pub fn new(view_proj: Mat4, palette: &Palette, viewport: [f32; 2], time: f32, progress: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            color_base: palette.emerald_deep.to_linear().extend(1.0).to_array(),
            color_accent: palette.gold_high_gloss.to_linear().extend(1.0).to_array(),
            viewport,
            time,
            progress,
        }
    }
}

/// Camera and light rig shared by the ornament passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    pub key_light_pos: [f32; 4],
    pub key_light_color: [f32; 4],
    pub fill_light_pos: [f32; 4],
    pub fill_light_color: [f32; 4],
    pub top_light_pos: [f32; 4],
    pub top_light_color: [f32; 4],
}

impl SceneUniforms {
    /// Warm gold key from above right, red fill from below left, soft white
    /// from straight above. World positions are shifted by `-origin` into
    /// the space of the ornament transforms.
    pub fn new(view_proj: Mat4, camera_pos: Vec3, origin: Vec3, palette: &Palette) -> Self {
        let point = |p: Vec3| (p - origin).extend(1.0).to_array();
        let light = |c: Vec3, intensity: f32| (c * intensity).extend(1.0).to_array();

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: point(camera_pos),
            ambient: light(Vec3::ONE, 0.5),
            key_light_pos: point(Vec3::new(10.0, 20.0, 10.0)),
            key_light_color: light(palette.gold_high_gloss.to_linear(), 1.6),
            fill_light_pos: point(Vec3::new(-10.0, -5.0, -10.0)),
            fill_light_color: light(palette.red_velvet.to_linear(), 1.2),
            top_light_pos: point(Vec3::new(0.0, 10.0, 0.0)),
            top_light_color: light(Vec3::ONE, 0.4),
        }
    }
}

/// Surface response of one ornament group.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub metalness: f32,
    pub roughness: f32,
    /// Strength of the reflected sky gradient.
    pub env_intensity: f32,
    pub _pad: f32,
}

impl MaterialUniforms {
    pub fn for_role(role: Role) -> Self {
        match role {
            // Polished metal
            Role::Bauble => Self {
                metalness: 1.0,
                roughness: 0.15,
                env_intensity: 2.0,
                _pad: 0.0,
            },
            // Satin wrapping paper
            Role::Gift => Self {
                metalness: 0.3,
                roughness: 0.4,
                env_intensity: 1.0,
                _pad: 0.0,
            },
        }
    }
}

/// Mesh vertex for instanced ornaments.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Point-sprite shader for the foliage.
///
/// Vertex inputs, all stepped per instance: placeholder position (unused),
/// chaos position, target position, random scalar.
pub fn foliage_wgsl() -> String {
    let stagger = STAGGER_SPREAD;
    let sparkle = SPARKLE_THRESHOLD;
    let accent = ACCENT_INFLUENCE;
    let wander_chaos = WANDER_CHAOS;
    let wander_formed = WANDER_FORMED;
    let (sr, sg, sb) = (SPARKLE_COLOR.x, SPARKLE_COLOR.y, SPARKLE_COLOR.z);

    format!(
        r#"struct Uniforms {{
    view_proj: mat4x4<f32>,
    color_base: vec4<f32>,
    color_accent: vec4<f32>,
    viewport: vec2<f32>,
    time: f32,
    progress: f32,
}};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) alpha: f32,
    @location(2) random: f32,
}};

fn cubic_in_out(t: f32) -> f32 {{
    if t < 0.5 {{
        return 4.0 * t * t * t;
    }}
    let f = -2.0 * t + 2.0;
    return 1.0 - f * f * f / 2.0;
}}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) placeholder: vec3<f32>,
    @location(1) chaos_pos: vec3<f32>,
    @location(2) target_pos: vec3<f32>,
    @location(3) random: f32,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let quad_pos = quad_vertices[vertex_index];

    // Staggered start, then cubic easing
    let stagger = random * {stagger:?};
    let effective = smoothstep(stagger, 1.0, uniforms.progress * (1.0 + stagger));
    let t = cubic_in_out(effective);

    var pos = mix(chaos_pos, target_pos, t);
    let wander = mix({wander_chaos:?}, {wander_formed:?}, t);
    pos.x += sin(uniforms.time * 2.0 + random * 100.0) * wander;
    pos.y += cos(uniforms.time * 1.5 + random * 50.0) * wander;
    pos.z += sin(uniforms.time * 1.0 + random * 25.0) * wander;

    let clip = uniforms.view_proj * vec4<f32>(pos, 1.0);

    // Pixel diameter shrinks with distance; w is the view depth.
    let base_size = mix(6.0, 4.0, t);
    let size_px = (base_size * random + 2.0) * (20.0 / max(clip.w, 0.001));
    let offset = quad_pos * size_px / uniforms.viewport;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.z, clip.w);
    out.uv = quad_pos;
    out.alpha = 0.6 + 0.4 * t;
    out.random = random;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let r = length(in.uv) * 0.5;
    if r > 0.5 {{
        discard;
    }}

    let falloff = 1.0 - r * 2.0;
    let glow = falloff * sqrt(falloff);

    var color = mix(uniforms.color_base.rgb, uniforms.color_accent.rgb, in.random * {accent:?});
    if in.random > {sparkle:?} {{
        color = mix(color, vec3<f32>({sr:?}, {sg:?}, {sb:?}), 0.5);
    }}

    return vec4<f32>(color, in.alpha * glow);
}}
"#
    )
}

/// Instanced mesh shader for baubles and gifts.
pub const ORNAMENT_WGSL: &str = r#"struct Scene {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    key_light_pos: vec4<f32>,
    key_light_color: vec4<f32>,
    fill_light_pos: vec4<f32>,
    fill_light_color: vec4<f32>,
    top_light_pos: vec4<f32>,
    top_light_color: vec4<f32>,
};

struct Material {
    metalness: f32,
    roughness: f32,
    env_intensity: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> scene: Scene;

@group(1) @binding(0)
var<uniform> material: Material;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = scene.view_proj * world;
    out.world_pos = world.xyz;
    // Uniform scale only, so the model matrix is fine for normals.
    out.normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color;
    return out;
}

fn shade(n: vec3<f32>, v: vec3<f32>, world_pos: vec3<f32>, albedo: vec3<f32>, light_pos: vec3<f32>, light_color: vec3<f32>) -> vec3<f32> {
    let l = normalize(light_pos - world_pos);
    let h = normalize(l + v);
    let diffuse = max(dot(n, l), 0.0);
    let shininess = mix(256.0, 8.0, material.roughness);
    let specular = pow(max(dot(n, h), 0.0), shininess) * step(0.0, dot(n, l));
    let diffuse_color = albedo * (1.0 - material.metalness);
    let specular_color = mix(vec3<f32>(0.04), albedo, material.metalness);
    return (diffuse_color * diffuse + specular_color * specular) * light_color;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let v = normalize(scene.camera_pos.xyz - in.world_pos);

    var color = scene.ambient.rgb * in.color * (1.0 - 0.5 * material.metalness);
    color += shade(n, v, in.world_pos, in.color, scene.key_light_pos.xyz, scene.key_light_color.rgb);
    color += shade(n, v, in.world_pos, in.color, scene.fill_light_pos.xyz, scene.fill_light_color.rgb);
    color += shade(n, v, in.world_pos, in.color, scene.top_light_pos.xyz, scene.top_light_color.rgb);

    // Stand-in for the city environment map: a warm sky over a dark floor.
    let r = reflect(-v, n);
    let sky = mix(vec3<f32>(0.02, 0.02, 0.03), vec3<f32>(0.8, 0.75, 0.6), clamp(r.y * 0.5 + 0.5, 0.0, 1.0));
    let reflectance = mix(vec3<f32>(0.04), in.color, material.metalness);
    color += sky * reflectance * material.env_intensity * (1.0 - material.roughness) * 0.25;

    return vec4<f32>(color, 1.0);
}
"#;
