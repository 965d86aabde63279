// ABOUTME: Behavioral tests for configuration previews
// Rendering is pure: the same form always yields the same text

use pretty_assertions::assert_eq;

use skydeck::models::OptionCatalogs;
use skydeck::preview::{
    self, ContainerForm, ContainerType, ExposeType, ProjectRef, ServerForm,
};

#[test]
fn test_render_is_repeatable() {
    let form = ContainerForm {
        container_type: ContainerType::Cron,
        autoscaling: true,
        ..Default::default()
    };
    let first = preview::render(&form);
    let second = preview::render(&form.clone());
    assert_eq!(first, second);
}

#[test]
fn test_every_container_type_renders() {
    for container_type in ContainerType::all() {
        let form = ContainerForm {
            container_type: *container_type,
            ..Default::default()
        };
        let text = preview::render(&form);
        assert!(text.starts_with("container:\n"));
        assert!(text.contains(&format!("  type: {container_type}")));
        let port_line = if container_type.serves_traffic() { "port: 3000" } else { "port: N/A" };
        assert!(text.contains(port_line), "{text}");
    }
}

#[test]
fn test_internal_runtime_hides_domain() {
    let mut form = ContainerForm {
        expose: ExposeType::Internal,
        domain: "api.example.com".to_string(),
        ..Default::default()
    };
    form.select_project(ProjectRef {
        id: "p".to_string(),
        name: "shop".to_string(),
        env: "staging".to_string(),
    });

    let text = preview::render(&form);
    assert!(text.contains("name: shop-staging-runtime"));
    assert!(text.contains("repository: shop/shop-staging-runtime"));
    assert!(!text.contains("domain"));
    assert_eq!(form.image_ref(), "registry.skydeck.io/shop/shop-staging-runtime");
}

#[test]
fn test_server_preview_without_selections() {
    let form = ServerForm::default();
    assert_eq!(
        preview::render(&form),
        "server:\n  name: —\n  image:\n    id: —\n  flavor:\n    id: —\n  network: default\n  wait: false"
    );
}

#[test]
fn test_server_summary_with_gpu_flavor() {
    let catalogs = OptionCatalogs::builtin();
    let form = ServerForm {
        name: "trainer",
        image: catalogs.image("win-2022"),
        flavor: catalogs.flavor("gpu-v1"),
        ..Default::default()
    };
    let values: Vec<String> = form.summary().into_iter().map(|r| r.value).collect();
    assert_eq!(values, vec!["Windows", "GPU Compute", "Default", "$0.4900/hr"]);
}
