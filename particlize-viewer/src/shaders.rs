//! WGSL shaders for particle and overlay rendering

/// Billboarded particle sprites, instanced one quad per particle.
///
/// `params` packs (size, alpha test threshold, size attenuation flag,
/// fog flag); `fog_color_density` packs the fog color and its density.
pub const PARTICLE_SHADER: &str = r#"
struct Globals {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    fog_color_density: vec4<f32>,
    params: vec4<f32>,
}

@group(0) @binding(0) var<uniform> globals: Globals;
@group(1) @binding(0) var sprite_texture: texture_2d<f32>;
@group(1) @binding(1) var sprite_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) view_depth: f32,
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) particle_pos: vec3<f32>,
) -> VertexOutput {
    let corner = vec2<f32>(
        f32(vertex_index & 1u) - 0.5,
        f32((vertex_index >> 1u) & 1u) - 0.5,
    );

    var view_pos = globals.view * vec4<f32>(particle_pos, 1.0);

    var extent = globals.params.x;
    if (globals.params.z == 0.0) {
        // No size attenuation: keep a constant on-screen size by growing
        // the quad with view depth
        extent = globals.params.x * max(-view_pos.z, 0.001) * 0.01;
    }
    view_pos = vec4<f32>(view_pos.xy + corner * extent, view_pos.z, view_pos.w);

    var out: VertexOutput;
    out.clip_position = globals.proj * view_pos;
    out.uv = corner + vec2<f32>(0.5, 0.5);
    out.view_depth = -view_pos.z;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var color = textureSample(sprite_texture, sprite_sampler, in.uv);
    if (color.a < globals.params.y) {
        discard;
    }
    if (globals.params.w != 0.0) {
        let density = globals.fog_color_density.a;
        let factor = clamp(
            1.0 - exp(-density * density * in.view_depth * in.view_depth),
            0.0,
            1.0,
        );
        color = vec4<f32>(mix(color.rgb, globals.fog_color_density.rgb, factor), color.a);
    }
    return color;
}
"#;

/// World-axes overlay lines
pub const AXES_SHADER: &str = r#"
struct Globals {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    fog_color_density: vec4<f32>,
    params: vec4<f32>,
}

@group(0) @binding(0) var<uniform> globals: Globals;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = globals.proj * globals.view * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;
