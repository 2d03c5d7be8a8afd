use glam::{Mat3, Mat4, Vec3};
use glow::HasContext;
use shared::FACE_COUNT;

use super::mesh::{LineMeshData, MeshData, LINE_STRIDE, MESH_STRIDE};
use crate::build::AssembledSolid;
use crate::textures::DecodedTexture;

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    pub view_projection: Mat4,
    /// Solid transform, shared by the outline
    pub model: Mat4,
    pub camera_position: Vec3,
    /// Background color RGB
    pub bg_color: [u8; 3],
    /// Color of untextured faces RGB
    pub base_color: [u8; 3],
}

/// Scene lights, fixed in world space
pub struct Lighting {
    pub ambient: Vec3,
    pub directional_dir: Vec3,
    pub directional_color: Vec3,
    pub point_position: Vec3,
    pub point_color: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: rgb_hex(0x404040) * 0.6,
            directional_dir: Vec3::new(5.0, 5.0, 5.0).normalize(),
            directional_color: Vec3::ONE * 0.8,
            point_position: Vec3::new(-5.0, 3.0, 2.0),
            point_color: rgb_hex(0xff6600) * 0.5,
            specular: rgb_hex(0x222222),
            shininess: 100.0,
        }
    }
}

fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    /// One mesh per face slot
    faces: Vec<GpuMesh>,
    outline: GpuLines,
    textures: [Option<glow::Texture>; FACE_COUNT],
    /// Decoded images waiting for the next paint
    pending_textures: Vec<DecodedTexture>,
    lighting: Lighting,
}

impl GlRenderer {
    /// Compile shaders and upload the solid. The solid never changes afterwards.
    pub fn new(gl: &glow::Context, solid: &AssembledSolid) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;

        let faces = solid
            .faces
            .iter()
            .map(|face| upload_mesh(gl, &face.mesh()))
            .collect::<Result<Vec<_>, _>>()?;
        let outline = upload_lines(gl, &solid.outline)?;

        tracing::info!(
            "GL renderer ready: {} face meshes, {} outline segments",
            faces.len(),
            solid.outline.segment_count()
        );

        Ok(Self {
            mesh_program,
            line_program,
            faces,
            outline,
            textures: Default::default(),
            pending_textures: Vec::new(),
            lighting: Lighting::default(),
        })
    }

    /// Queue a texture for upload on the next paint
    pub fn queue_texture(&mut self, texture: DecodedTexture) {
        self.pending_textures.push(texture);
    }

    /// Upload queued textures, replacing earlier ones in the same slot
    pub fn flush_textures(&mut self, gl: &glow::Context) {
        for texture in std::mem::take(&mut self.pending_textures) {
            let slot = texture.slot.index();
            match upload_texture(gl, &texture) {
                Ok(handle) => {
                    if let Some(old) = self.textures[slot].replace(handle) {
                        unsafe { gl.delete_texture(old) };
                    }
                }
                Err(e) => {
                    tracing::warn!("Texture upload for {} face failed: {e}", texture.slot.label());
                }
            }
        }
    }

    /// Render the solid and its outline
    pub fn paint(&self, gl: &glow::Context, params: &RenderParams) {
        let mvp = params.view_projection * params.model;
        let normal_matrix = Mat3::from_mat4(params.model).inverse().transpose();
        let light = &self.lighting;

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
            gl.front_face(glow::CCW);

            // Faces
            let p = self.mesh_program;
            gl.use_program(Some(p));
            set_uniform_mat4(gl, p, "u_mvp", &mvp);
            set_uniform_mat4(gl, p, "u_model", &params.model);
            set_uniform_mat3(gl, p, "u_normal_matrix", &normal_matrix);
            set_uniform_vec3(gl, p, "u_camera_pos", &params.camera_position);
            set_uniform_vec3(gl, p, "u_ambient", &light.ambient);
            set_uniform_vec3(gl, p, "u_dir_light_dir", &light.directional_dir);
            set_uniform_vec3(gl, p, "u_dir_light_color", &light.directional_color);
            set_uniform_vec3(gl, p, "u_point_light_pos", &light.point_position);
            set_uniform_vec3(gl, p, "u_point_light_color", &light.point_color);
            set_uniform_vec3(gl, p, "u_specular", &light.specular);
            set_uniform_f32(gl, p, "u_shininess", light.shininess);
            let base = Vec3::new(
                params.base_color[0] as f32 / 255.0,
                params.base_color[1] as f32 / 255.0,
                params.base_color[2] as f32 / 255.0,
            );
            set_uniform_vec3(gl, p, "u_base_color", &base);
            set_uniform_i32(gl, p, "u_texture", 0);
            gl.active_texture(glow::TEXTURE0);

            for (mesh, texture) in self.faces.iter().zip(self.textures.iter()) {
                gl.bind_texture(glow::TEXTURE_2D, *texture);
                set_uniform_i32(gl, p, "u_has_texture", i32::from(texture.is_some()));
                draw_mesh(gl, mesh);
            }
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.disable(glow::CULL_FACE);

            // Outline, same transform as the faces
            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &mvp);
            draw_lines(gl, &self.outline);

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
            for mesh in self.faces.drain(..) {
                gl.delete_vertex_array(mesh.vao);
                gl.delete_buffer(mesh.vbo);
                gl.delete_buffer(mesh.ibo);
            }
            gl.delete_vertex_array(self.outline.vao);
            gl.delete_buffer(self.outline.vbo);
            for texture in self.textures.iter_mut().filter_map(Option::take) {
                gl.delete_texture(texture);
            }
        }
        self.pending_textures.clear();
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (MESH_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // uv: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (LINE_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn upload_texture(gl: &glow::Context, texture: &DecodedTexture) -> Result<glow::Texture, String> {
    unsafe {
        let handle = gl.create_texture()?;
        gl.bind_texture(glow::TEXTURE_2D, Some(handle));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            texture.width as i32,
            texture.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(&texture.rgba)),
        );
        gl.generate_mipmap(glow::TEXTURE_2D);
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR_MIPMAP_LINEAR as i32,
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(handle)
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let mut shaders = Vec::with_capacity(2);
        for (kind, src, label) in [
            (glow::VERTEX_SHADER, vert_src, "Vertex"),
            (glow::FRAGMENT_SHADER, frag_src, "Fragment"),
        ] {
            let shader = gl.create_shader(kind)?;
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                tracing::error!("{label} shader error: {log}");
                return Err(format!("{label} shader failed to compile: {log}"));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
        if !linked {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
            gl.delete_program(program);
            return Err(format!("shader program failed to link: {log}"));
        }

        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_mat3(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_3_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

fn set_uniform_i32(gl: &glow::Context, program: glow::Program, name: &str, v: i32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_i32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform mat4 u_model;
uniform mat3 u_normal_matrix;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

out vec3 v_world_pos;
out vec3 v_normal;
out vec2 v_uv;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_world_pos = (u_model * vec4(a_position, 1.0)).xyz;
    v_normal = u_normal_matrix * a_normal;
    v_uv = a_uv;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_camera_pos;
uniform vec3 u_ambient;
uniform vec3 u_dir_light_dir;
uniform vec3 u_dir_light_color;
uniform vec3 u_point_light_pos;
uniform vec3 u_point_light_color;
uniform vec3 u_specular;
uniform float u_shininess;
uniform vec3 u_base_color;
uniform int u_has_texture;
uniform sampler2D u_texture;

in vec3 v_world_pos;
in vec3 v_normal;
in vec2 v_uv;

out vec4 frag_color;

vec3 phong(vec3 n, vec3 l, vec3 view_dir, vec3 color, inout vec3 spec) {
    float diffuse = max(dot(n, l), 0.0);
    if (diffuse > 0.0) {
        vec3 h = normalize(l + view_dir);
        spec += color * pow(max(dot(n, h), 0.0), u_shininess);
    }
    return color * diffuse;
}

void main() {
    vec3 n = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_pos);
    vec3 albedo = u_has_texture == 1 ? texture(u_texture, v_uv).rgb : u_base_color;

    vec3 spec = vec3(0.0);
    vec3 light = u_ambient;
    light += phong(n, normalize(u_dir_light_dir), view_dir, u_dir_light_color, spec);
    light += phong(n, normalize(u_point_light_pos - v_world_pos), view_dir, u_point_light_color, spec);

    frag_color = vec4(albedo * light + u_specular * spec, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
