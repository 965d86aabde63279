// ABOUTME: Pure configuration-preview generation for wizard forms
// Forms describe themselves as a tree of keyed values; rendering is deterministic text

pub mod container;
pub mod server;

pub use container::{
    ContainerForm, ContainerStep, ContainerType, ExposeType, PipelineMode, PipelineRef,
    PipelineTemplate, ProjectRef, builtin_templates, format_memory,
};
pub use server::{ServerForm, SummaryRow};

use std::fmt::Display;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq)]
enum PreviewNode {
    Scalar(String),
    Section(PreviewSection),
}

/// Ordered set of `key: value` entries, possibly nested
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewSection {
    entries: Vec<(String, PreviewNode)>,
}

impl PreviewSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.entries
            .push((key.into(), PreviewNode::Scalar(value.to_string())));
        self
    }

    /// Add the field only when a value is present
    pub fn field_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    pub fn section(mut self, key: impl Into<String>, section: PreviewSection) -> Self {
        self.entries.push((key.into(), PreviewNode::Section(section)));
        self
    }

    /// Add a nested section only when `include` holds
    pub fn section_when(
        self,
        key: impl Into<String>,
        include: bool,
        build: impl FnOnce() -> PreviewSection,
    ) -> Self {
        if include {
            self.section(key, build())
        } else {
            self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-space indented text with no trailing newline
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.write_lines(0, &mut lines);
        lines.join("\n")
    }

    fn write_lines(&self, depth: usize, lines: &mut Vec<String>) {
        let pad = INDENT.repeat(depth);
        for (key, node) in &self.entries {
            match node {
                PreviewNode::Scalar(value) => lines.push(format!("{pad}{key}: {value}")),
                PreviewNode::Section(section) => {
                    lines.push(format!("{pad}{key}:"));
                    section.write_lines(depth + 1, lines);
                }
            }
        }
    }
}

/// A form that can describe its pending configuration
pub trait Preview {
    fn document(&self) -> PreviewSection;
}

/// Render any previewable form. Same input, same output.
pub fn render<P: Preview + ?Sized>(form: &P) -> String {
    form.document().render()
}
