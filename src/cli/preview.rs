// ABOUTME: CLI preview command - render server or container manifests without side effects

use anyhow::{Result, anyhow};
use std::sync::Arc;

use super::deploy::fill_wizard;
use super::util::Backend;
use super::{ContainerPreviewArgs, PreviewTarget};
use crate::config::AppConfig;
use crate::lifecycle::WizardController;
use crate::models::OptionCatalogs;
use crate::preview::{
    self, ContainerForm, ContainerType, ExposeType, PipelineMode, PipelineRef, ProjectRef,
    ServerForm, builtin_templates,
};

/// Execute the preview command
pub async fn execute(target: PreviewTarget, config: &AppConfig) -> Result<()> {
    let text = match target {
        PreviewTarget::Server { selection, offline } => {
            if offline {
                let catalogs = OptionCatalogs::builtin();
                let form = ServerForm {
                    name: &selection.name,
                    image: catalogs.image(&selection.image),
                    flavor: catalogs.flavor(&selection.flavor),
                    network: selection.network.as_deref().and_then(|id| catalogs.network(id)),
                    key_name: selection.key_name.as_deref(),
                };
                preview::render(&form)
            } else {
                let backend = Backend::connect(config)?;
                let wizard = WizardController::new(Arc::clone(&backend.provisioning));
                fill_wizard(&wizard, &selection).await?;
                wizard.preview()
            }
        }
        PreviewTarget::Container(args) => preview::render(&container_form(&args)?),
    };

    println!("{text}");
    Ok(())
}

/// Build a container form from command-line arguments
pub fn container_form(args: &ContainerPreviewArgs) -> Result<ContainerForm> {
    let container_type = ContainerType::from_key(&args.container_type)
        .ok_or_else(|| anyhow!("Unknown container type '{}'", args.container_type))?;
    let expose = ExposeType::from_key(&args.expose)
        .ok_or_else(|| anyhow!("Unknown exposure '{}'", args.expose))?;

    let mut form = ContainerForm {
        container_type,
        cpu: args.cpu,
        memory_mb: args.memory,
        replicas: args.replicas,
        autoscaling: args.autoscale,
        autoscale_min: args.min_replicas,
        autoscale_max: args.max_replicas,
        autoscale_target_cpu: args.target_cpu,
        expose,
        port: args.port,
        domain: args.domain.clone().unwrap_or_default(),
        ..Default::default()
    };

    if let Some(name) = &args.project {
        form.select_project(ProjectRef {
            id: name.clone(),
            name: name.clone(),
            env: args.env.clone(),
        });
    }

    if let Some(template) = &args.template {
        let template = builtin_templates()
            .into_iter()
            .find(|t| t.id == *template)
            .ok_or_else(|| anyhow!("Unknown pipeline template '{template}'"))?;
        form.pipeline_mode = PipelineMode::New;
        form.template = Some(template);
    } else if let Some(pipeline) = &args.pipeline {
        form.pipeline = Some(PipelineRef {
            id: pipeline.clone(),
            name: pipeline.clone(),
            project_id: args.project.clone().unwrap_or_default(),
        });
    }

    Ok(form)
}
