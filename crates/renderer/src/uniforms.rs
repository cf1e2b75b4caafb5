//! Named uniform tables and their std140 representation.
//!
//! Effects describe their shader inputs as an ordered [`UniformTable`]. The
//! same table drives three things that must agree byte-for-byte:
//! - the GLSL uniform block prepended to the fragment shader
//!   ([`UniformLayout::glsl_block`]),
//! - the size of the GPU uniform buffer ([`UniformLayout::std140_size`]),
//! - the bytes uploaded every frame ([`UniformTable::to_std140`]).

use std::fmt::Write as _;

/// Binding name of the uniform block instance inside generated GLSL.
pub const UNIFORM_BLOCK_INSTANCE: &str = "params";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UniformError {
    #[error("uniform layout changed since the pipeline was built")]
    LayoutMismatch,
}

/// A single uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    /// Fixed-length `vec3` array; the length is part of the layout.
    Vec3Array(Vec<[f32; 3]>),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec3Array(values) => UniformKind::Vec3Array(values.len()),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            UniformValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            UniformValue::Vec2(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            UniformValue::Vec3(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vec3_array(&self) -> Option<&[[f32; 3]]> {
        match self {
            UniformValue::Vec3Array(values) => Some(values),
            _ => None,
        }
    }
}

/// GLSL type of a uniform, including array length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Int,
    Vec2,
    Vec3,
    Vec3Array(usize),
}

impl UniformKind {
    fn std140_align(self) -> usize {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Vec3Array(_) => 16,
        }
    }

    fn std140_size(self) -> usize {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            // Array elements are padded to a 16-byte stride.
            UniformKind::Vec3Array(len) => 16 * len,
        }
    }

    fn glsl_declaration(self, member: &str) -> String {
        match self {
            UniformKind::Float => format!("float {member};"),
            UniformKind::Int => format!("int {member};"),
            UniformKind::Vec2 => format!("vec2 {member};"),
            UniformKind::Vec3 => format!("vec3 {member};"),
            UniformKind::Vec3Array(len) => format!("vec3 {member}[{len}];"),
        }
    }
}

fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

/// Ordered names and kinds of a uniform table, without values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniformLayout {
    entries: Vec<(&'static str, UniformKind)>,
}

impl UniformLayout {
    pub fn entries(&self) -> &[(&'static str, UniformKind)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Byte offset of every member under std140 rules, in declaration order.
    pub fn std140_offsets(&self) -> Vec<usize> {
        let mut cursor = 0;
        self.entries
            .iter()
            .map(|(_, kind)| {
                let offset = align_up(cursor, kind.std140_align());
                cursor = offset + kind.std140_size();
                offset
            })
            .collect()
    }

    /// Total block size, rounded up to the 16-byte block alignment.
    pub fn std140_size(&self) -> usize {
        let end = self
            .entries
            .iter()
            .zip(self.std140_offsets())
            .map(|((_, kind), offset)| offset + kind.std140_size())
            .max()
            .unwrap_or(0);
        align_up(end.max(16), 16)
    }

    /// Renders the GLSL uniform block plus `#define` aliases so shader bodies
    /// can refer to uniforms by their bare names.
    ///
    /// Members are prefixed with `_` to keep the aliases from expanding
    /// inside their own definitions.
    pub fn glsl_block(&self, block_name: &str) -> String {
        let mut glsl = String::new();
        let _ = writeln!(
            glsl,
            "layout(std140, set = 0, binding = 0) uniform {block_name} {{"
        );
        for (name, kind) in &self.entries {
            let _ = writeln!(glsl, "    {}", kind.glsl_declaration(&format!("_{name}")));
        }
        let _ = writeln!(glsl, "}} {UNIFORM_BLOCK_INSTANCE};");
        glsl.push('\n');
        for (name, _) in &self.entries {
            let _ = writeln!(glsl, "#define {name} {UNIFORM_BLOCK_INSTANCE}._{name}");
        }
        glsl
    }
}

/// Ordered mapping from uniform name to its current value.
///
/// Tables are rebuilt by their effect every frame; the set of names and their
/// kinds stays fixed, which [`UniformTable::layout`] lets GPU surfaces verify.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UniformTable {
    entries: Vec<(&'static str, UniformValue)>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated name replaces the earlier entry in
    /// place, keeping its position.
    pub fn with(mut self, name: &'static str, value: UniformValue) -> Self {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn float(self, name: &'static str, value: f32) -> Self {
        self.with(name, UniformValue::Float(value))
    }

    pub fn int(self, name: &'static str, value: i32) -> Self {
        self.with(name, UniformValue::Int(value))
    }

    pub fn vec2(self, name: &'static str, value: [f32; 2]) -> Self {
        self.with(name, UniformValue::Vec2(value))
    }

    pub fn vec3(self, name: &'static str, value: [f32; 3]) -> Self {
        self.with(name, UniformValue::Vec3(value))
    }

    pub fn vec3_array(self, name: &'static str, values: Vec<[f32; 3]>) -> Self {
        self.with(name, UniformValue::Vec3Array(values))
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn layout(&self) -> UniformLayout {
        UniformLayout {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| (*name, value.kind()))
                .collect(),
        }
    }

    /// Packs the table into a std140 byte image matching
    /// [`UniformLayout::glsl_block`].
    pub fn to_std140(&self) -> Vec<u8> {
        let layout = self.layout();
        let mut bytes = vec![0u8; layout.std140_size()];
        for ((_, value), offset) in self.entries.iter().zip(layout.std140_offsets()) {
            match value {
                UniformValue::Float(v) => write_bytes(&mut bytes, offset, bytemuck::bytes_of(v)),
                UniformValue::Int(v) => write_bytes(&mut bytes, offset, bytemuck::bytes_of(v)),
                UniformValue::Vec2(v) => write_bytes(&mut bytes, offset, bytemuck::bytes_of(v)),
                UniformValue::Vec3(v) => write_bytes(&mut bytes, offset, bytemuck::bytes_of(v)),
                UniformValue::Vec3Array(values) => {
                    for (index, v) in values.iter().enumerate() {
                        write_bytes(&mut bytes, offset + index * 16, bytemuck::bytes_of(v));
                    }
                }
            }
        }
        bytes
    }
}

fn write_bytes(target: &mut [u8], offset: usize, source: &[u8]) {
    target[offset..offset + source.len()].copy_from_slice(source);
}
