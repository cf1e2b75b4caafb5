//! Runs both effect programs through the GLSL frontend and validator that
//! `create_shader_module` uses, without needing a GPU adapter.

use ambient::{Effect, RayField, RayFieldConfig, WarpField, WarpFieldConfig};
use renderer::ShaderProgram;
use wgpu::naga;
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

fn validate(label: &str, stage: naga::ShaderStage, source: &str) {
    let module = Frontend::default()
        .parse(&Options::from(stage), source)
        .unwrap_or_else(|err| panic!("{label} {stage:?} shader failed to parse: {err:?}\n{source}"));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|err| panic!("{label} {stage:?} shader failed validation: {err:?}"));
}

fn validate_program(program: &ShaderProgram) {
    validate(program.label(), naga::ShaderStage::Vertex, program.vertex_source());
    validate(
        program.label(),
        naga::ShaderStage::Fragment,
        &program.fragment_source(),
    );
}

#[test]
fn rayfield_program_compiles() {
    validate_program(&RayField::new(RayFieldConfig::default()).program());
}

#[test]
fn warpfield_program_compiles() {
    validate_program(&WarpField::new(WarpFieldConfig::default()).program());
}

#[test]
fn warpfield_program_compiles_with_a_full_palette() {
    let config = WarpFieldConfig {
        colors: vec![
            "#ff0000".into(),
            "#00ff00".into(),
            "#0000ff".into(),
            "#ffff00".into(),
            "#00ffff".into(),
            "#ff00ff".into(),
            "#ffffff".into(),
            "#808080".into(),
        ],
        ..WarpFieldConfig::default()
    };
    validate_program(&WarpField::new(config).program());
}
