//! Visualization hints for the GEXF `viz` extension

use appgraph_core::{BindingKind, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

pub const COMPONENT_COLOR: Color = Color::new(66, 133, 244);
pub const MODULE_COLOR: Color = Color::new(251, 188, 4);
pub const MISSING_COLOR: Color = Color::new(234, 67, 53);
pub const BINDING_COLOR: Color = Color::new(52, 168, 83);
pub const INJECTION_COLOR: Color = Color::new(52, 168, 83);
pub const PROVISION_COLOR: Color = Color::new(66, 133, 244);
pub const DELEGATE_COLOR: Color = Color::new(171, 71, 188);
pub const MULTIBINDING_COLOR: Color = Color::new(255, 152, 0);

pub const COMPONENT_SIZE: f64 = 30.0;
pub const MODULE_SIZE: f64 = 25.0;
pub const BINDING_SIZE: f64 = 15.0;
pub const ENTRY_POINT_SIZE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VizHints {
    pub color: Color,
    pub size: f64,
    pub shape: &'static str,
}

/// Color, size and shape for a node, by role.
pub fn hints_for(node: &Node) -> VizHints {
    match node {
        Node::Component(_) => VizHints {
            color: COMPONENT_COLOR,
            size: COMPONENT_SIZE,
            shape: "square",
        },
        Node::Module(_) => VizHints {
            color: MODULE_COLOR,
            size: MODULE_SIZE,
            shape: "diamond",
        },
        Node::MissingBinding(_) => VizHints {
            color: MISSING_COLOR,
            size: BINDING_SIZE,
            shape: "triangle",
        },
        Node::Binding(binding) => {
            // Multibinding contributions share one color whatever their kind.
            let color = if binding.is_multibinding {
                MULTIBINDING_COLOR
            } else {
                match binding.binding_kind {
                    BindingKind::Injection => INJECTION_COLOR,
                    BindingKind::Provision => PROVISION_COLOR,
                    BindingKind::Delegate => DELEGATE_COLOR,
                    _ => BINDING_COLOR,
                }
            };
            let (size, shape) = if binding.is_entry_point {
                (ENTRY_POINT_SIZE, "star")
            } else {
                (BINDING_SIZE, "disc")
            };
            VizHints { color, size, shape }
        }
    }
}
