// ABOUTME: Container deployment form - step gating, derived names and the manifest preview
// Projects and pipelines come from the caller; pipeline templates are built in

use serde::{Deserialize, Serialize};

use super::{Preview, PreviewSection};

/// Image registry every container image is pushed to
pub const CONTAINER_REGISTRY: &str = "registry.skydeck.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    #[default]
    Runtime,
    Worker,
    Cron,
    OneOff,
}

impl ContainerType {
    pub fn all() -> &'static [ContainerType] {
        &[Self::Runtime, Self::Worker, Self::Cron, Self::OneOff]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Worker => "worker",
            Self::Cron => "cron",
            Self::OneOff => "oneoff",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Runtime => "Runtime Service",
            Self::Worker => "Background Worker",
            Self::Cron => "Cron Job",
            Self::OneOff => "One-off Task",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Runtime => "Long-running HTTP service exposed via a port",
            Self::Worker => "Processes queued jobs, no incoming traffic",
            Self::Cron => "Runs on a schedule (hourly, daily, etc.)",
            Self::OneOff => "Single execution for migrations or scripts",
        }
    }

    /// Only runtime services listen on a port
    pub fn serves_traffic(&self) -> bool {
        matches!(self, Self::Runtime)
    }
}

impl std::fmt::Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposeType {
    #[default]
    Public,
    Private,
    Internal,
}

impl ExposeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Internal => "internal",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "internal" => Some(Self::Internal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    New,
    #[default]
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
    pub env: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRef {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTemplate {
    pub id: String,
    pub label: String,
    pub image: String,
}

pub fn builtin_templates() -> Vec<PipelineTemplate> {
    [
        ("node", "Node.js", "node:20-alpine"),
        ("python", "Python", "python:3.12-slim"),
        ("go", "Go", "golang:1.22-alpine"),
        ("docker", "Custom Docker", "your-image:tag"),
    ]
    .into_iter()
    .map(|(id, label, image)| PipelineTemplate {
        id: id.to_string(),
        label: label.to_string(),
        image: image.to_string(),
    })
    .collect()
}

/// Kubernetes-style quantity: "512Mi", "1Gi", "1.5Gi"
pub fn format_memory(memory_mb: u32) -> String {
    if memory_mb >= 1024 {
        format!("{}Gi", f64::from(memory_mb) / 1024.0)
    } else {
        format!("{memory_mb}Mi")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStep {
    Type,
    Project,
    Pipeline,
    Runtime,
}

impl ContainerStep {
    pub fn all() -> &'static [ContainerStep] {
        &[Self::Type, Self::Project, Self::Pipeline, Self::Runtime]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Project => "Project",
            Self::Pipeline => "Pipeline",
            Self::Runtime => "Runtime",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerForm {
    pub container_type: ContainerType,
    pub project: Option<ProjectRef>,
    pub pipeline_mode: PipelineMode,
    pub pipeline: Option<PipelineRef>,
    pub template: Option<PipelineTemplate>,
    pub cpu: f64,
    pub memory_mb: u32,
    pub replicas: u32,
    pub autoscaling: bool,
    pub autoscale_min: u32,
    pub autoscale_max: u32,
    pub autoscale_target_cpu: u32,
    pub expose: ExposeType,
    pub port: u16,
    pub domain: String,
}

impl Default for ContainerForm {
    fn default() -> Self {
        Self {
            container_type: ContainerType::default(),
            project: None,
            pipeline_mode: PipelineMode::default(),
            pipeline: None,
            template: builtin_templates().into_iter().next(),
            cpu: 0.5,
            memory_mb: 1024,
            replicas: 2,
            autoscaling: false,
            autoscale_min: 2,
            autoscale_max: 10,
            autoscale_target_cpu: 70,
            expose: ExposeType::default(),
            port: 3000,
            domain: String::new(),
        }
    }
}

impl ContainerForm {
    pub fn can_advance(&self, step: ContainerStep) -> bool {
        match step {
            ContainerStep::Type | ContainerStep::Runtime => true,
            ContainerStep::Project => self.project.is_some(),
            ContainerStep::Pipeline => match self.pipeline_mode {
                PipelineMode::Existing => self.pipeline.is_some(),
                PipelineMode::New => self.template.is_some(),
            },
        }
    }

    /// Choosing another project clears a pipeline that belonged to the previous one
    pub fn select_project(&mut self, project: ProjectRef) {
        if self
            .pipeline
            .as_ref()
            .is_some_and(|p| p.project_id != project.id)
        {
            self.pipeline = None;
        }
        self.project = Some(project);
    }

    /// `<project>-<env>-<type>`, or `my-service-<type>` without a project
    pub fn generated_name(&self) -> String {
        match &self.project {
            Some(project) => format!("{}-{}-{}", project.name, project.env, self.container_type),
            None => format!("my-service-{}", self.container_type),
        }
    }

    pub fn repository(&self) -> String {
        let owner = self.project.as_ref().map_or("org", |p| p.name.as_str());
        format!("{owner}/{}", self.generated_name())
    }

    pub fn image_ref(&self) -> String {
        format!("{CONTAINER_REGISTRY}/{}", self.repository())
    }

    pub fn pipeline_label(&self) -> String {
        match self.pipeline_mode {
            PipelineMode::Existing => self
                .pipeline
                .as_ref()
                .map_or_else(|| "none".to_string(), |p| p.name.clone()),
            PipelineMode::New => format!(
                "{}-pipeline",
                self.template.as_ref().map_or("custom", |t| t.label.as_str())
            ),
        }
    }

    /// Pipelines offered for the selected project, or all of them without one
    pub fn available_pipelines<'a>(&self, pipelines: &'a [PipelineRef]) -> Vec<&'a PipelineRef> {
        pipelines
            .iter()
            .filter(|p| {
                self.project
                    .as_ref()
                    .map_or(true, |project| project.id == p.project_id)
            })
            .collect()
    }

    fn port_label(&self) -> String {
        if self.container_type.serves_traffic() {
            self.port.to_string()
        } else {
            "N/A".to_string()
        }
    }

    fn public_domain(&self) -> Option<&str> {
        let domain = self.domain.trim();
        (!domain.is_empty()
            && self.container_type == ContainerType::Runtime
            && self.expose == ExposeType::Public)
            .then_some(domain)
    }
}

impl Preview for ContainerForm {
    fn document(&self) -> PreviewSection {
        let name = self.generated_name();

        let runtime = PreviewSection::new()
            .field("cpu", self.cpu)
            .field("memory", format_memory(self.memory_mb))
            .field("replicas", self.replicas)
            .section_when("autoscaling", self.autoscaling, || {
                PreviewSection::new()
                    .field("enabled", true)
                    .field("min", self.autoscale_min)
                    .field("max", self.autoscale_max)
                    .field("target_cpu", format!("{}%", self.autoscale_target_cpu))
            });

        PreviewSection::new().section(
            "container",
            PreviewSection::new()
                .field("name", &name)
                .field("type", self.container_type)
                .section(
                    "image",
                    PreviewSection::new()
                        .field("registry", CONTAINER_REGISTRY)
                        .field("repository", self.repository())
                        .field("tag", "latest"),
                )
                .section("runtime", runtime)
                .section(
                    "network",
                    PreviewSection::new()
                        .field("expose", self.expose.as_str())
                        .field("port", self.port_label())
                        .field_opt("domain", self.public_domain()),
                ),
        )
    }
}
