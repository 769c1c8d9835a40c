use std::fmt;

/// Scalar component kind of an interface value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    Float,
    Sint,
    Uint,
    Bool,
}

/// Value type carried across a stage boundary.
///
/// Only the shapes that can appear at `@location` bindings are distinguished;
/// everything else collapses to `Other`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValueType {
    Scalar(ScalarKind),
    Vector { size: u8, kind: ScalarKind },
    Other,
}

impl ValueType {
    pub(crate) fn of(inner: &naga::TypeInner) -> Self {
        match *inner {
            naga::TypeInner::Scalar(scalar) => match scalar_kind(scalar.kind) {
                Some(kind) => ValueType::Scalar(kind),
                None => ValueType::Other,
            },
            naga::TypeInner::Vector { size, scalar } => match scalar_kind(scalar.kind) {
                Some(kind) => ValueType::Vector { size: size as u8, kind },
                None => ValueType::Other,
            },
            _ => ValueType::Other,
        }
    }

    /// Number of scalar components, `None` for non-numeric shapes.
    pub fn components(self) -> Option<u32> {
        match self {
            ValueType::Scalar(_) => Some(1),
            ValueType::Vector { size, .. } => Some(u32::from(size)),
            ValueType::Other => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = |k: &ScalarKind| match k {
            ScalarKind::Float => "f32",
            ScalarKind::Sint => "i32",
            ScalarKind::Uint => "u32",
            ScalarKind::Bool => "bool",
        };
        match self {
            ValueType::Scalar(k) => f.write_str(kind(k)),
            ValueType::Vector { size, kind: k } => write!(f, "vec{size}<{}>", kind(k)),
            ValueType::Other => f.write_str("<opaque>"),
        }
    }
}

fn scalar_kind(kind: naga::ScalarKind) -> Option<ScalarKind> {
    match kind {
        naga::ScalarKind::Float | naga::ScalarKind::AbstractFloat => Some(ScalarKind::Float),
        naga::ScalarKind::Sint | naga::ScalarKind::AbstractInt => Some(ScalarKind::Sint),
        naga::ScalarKind::Uint => Some(ScalarKind::Uint),
        naga::ScalarKind::Bool => Some(ScalarKind::Bool),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// A user-defined `@location` input or output of an entry point.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InterfaceVar {
    pub name: Option<String>,
    pub location: u32,
    pub ty: ValueType,
}

impl InterfaceVar {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// `@group(g) @binding(b)` slot of a resource global.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResourceBinding {
    pub group: u32,
    pub binding: u32,
}

/// A named resource global (uniform/storage buffer, texture, sampler).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformVar {
    pub name: String,
    pub binding: ResourceBinding,
}

/// Reflected user-defined inputs and outputs of one entry point.
///
/// Built-ins (`@builtin(position)` etc.) are not part of the interface.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StageInterface {
    pub inputs: Vec<InterfaceVar>,
    pub outputs: Vec<InterfaceVar>,
}

impl StageInterface {
    pub(crate) fn reflect(module: &naga::Module, entry: &naga::EntryPoint) -> Self {
        let mut inputs = Vec::new();
        for arg in &entry.function.arguments {
            collect(module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut inputs);
        }

        let mut outputs = Vec::new();
        if let Some(result) = &entry.function.result {
            collect(module, None, result.ty, result.binding.as_ref(), &mut outputs);
        }

        inputs.sort_by_key(|v| v.location);
        outputs.sort_by_key(|v| v.location);

        Self { inputs, outputs }
    }

    pub fn input(&self, name: &str) -> Option<&InterfaceVar> {
        self.inputs.iter().find(|v| v.name.as_deref() == Some(name))
    }

    pub fn output_at(&self, location: u32) -> Option<&InterfaceVar> {
        self.outputs.iter().find(|v| v.location == location)
    }
}

/// Walks an argument/result, descending into struct members that carry bindings.
fn collect(
    module: &naga::Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<InterfaceVar>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(InterfaceVar {
            name: name.map(str::to_owned),
            location: *location,
            ty: ValueType::of(inner),
        }),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect(module, member.name.as_deref(), member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

pub(crate) fn reflect_uniforms(module: &naga::Module) -> Vec<UniformVar> {
    module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let name = var.name.clone()?;
            let binding = var.binding.as_ref()?;
            Some(UniformVar {
                name,
                binding: ResourceBinding { group: binding.group, binding: binding.binding },
            })
        })
        .collect()
}
