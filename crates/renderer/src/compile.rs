use std::borrow::Cow;

use wgpu::naga::ShaderStage;

use crate::uniforms::UniformLayout;

/// Name of the uniform block every effect shader receives.
const UNIFORM_BLOCK_NAME: &str = "EffectParams";

/// A fixed procedural effect: its uniform layout plus the GLSL body that
/// consumes it.
///
/// The body is written against bare uniform names, `v_uv` (bottom-left
/// origin, `[0, 1]` on both axes), `gl_FragCoord` (top-left origin, device
/// pixels) and must assign `outColor`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    label: &'static str,
    layout: UniformLayout,
    fragment_body: Cow<'static, str>,
}

impl ShaderProgram {
    pub fn new(
        label: &'static str,
        layout: UniformLayout,
        fragment_body: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label,
            layout,
            fragment_body: fragment_body.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn vertex_source(&self) -> &'static str {
        VERTEX_SHADER_GLSL
    }

    /// Produces the self-contained fragment shader handed to the GLSL
    /// frontend.
    pub fn fragment_source(&self) -> String {
        wrap_fragment(&self.layout, &self.fragment_body)
    }
}

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the wrapped fragment shader of `program`.
///
/// Validation failures surface through the device error scope opened by the
/// caller rather than as a return value.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    program: &ShaderProgram,
) -> wgpu::ShaderModule {
    let wrapped = program.fragment_source();
    tracing::trace!(label = program.label(), source = %wrapped, "compiling fragment shader");
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(program.label()),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Prepends [`HEADER`] and the generated uniform block to an effect body.
fn wrap_fragment(layout: &UniformLayout, body: &str) -> String {
    let block = layout.glsl_block(UNIFORM_BLOCK_NAME);
    format!("{HEADER}\n{block}\n#line 1\n{body}")
}

/// GLSL prologue injected ahead of every effect fragment shader.
const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;
";

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::UniformTable;

    #[test]
    fn wrap_places_block_before_body() {
        let layout = UniformTable::new()
            .float("iTime", 0.0)
            .vec2("iResolution", [1.0, 1.0])
            .layout();
        let program = ShaderProgram::new(
            "test",
            layout,
            "void main() { outColor = vec4(iTime); }\n",
        );

        let wrapped = program.fragment_source();
        assert!(wrapped.starts_with("#version 450"));
        let block = wrapped.find("uniform EffectParams").expect("uniform block");
        let alias = wrapped.find("#define iTime params._iTime").expect("alias");
        let body = wrapped.find("void main()").expect("body");
        assert!(block < alias && alias < body);
        assert!(wrapped.contains("vec2 _iResolution;"));
    }

    #[test]
    fn vertex_shader_emits_uv() {
        let program = ShaderProgram::new("test", UniformLayout::default(), "");
        assert!(program.vertex_source().contains("v_uv"));
    }
}
