use serde_json::json;

use super::common::*;
use crate::rewards::access::AccessError;
use crate::rewards::settings::{SettingsError, SettingsPatch};

#[test]
fn first_read_seeds_the_default_record() {
    let (stack, _) = default_stack();

    let settings = stack
        .settings
        .fetch(Some(ADMIN_TOKEN))
        .expect("settings fetch");
    assert_eq!(settings.company_name, "PlastiSide");
    assert_eq!(settings.primary_color, "#2ECC71");
    assert_eq!(settings.secondary_color, "#1A73E8");
    assert!(settings.logo_url.is_none());
}

#[test]
fn update_merges_only_provided_fields() {
    let (stack, _) = default_stack();

    let updated = stack
        .settings
        .update(
            Some(ADMIN_TOKEN),
            SettingsPatch {
                company_name: Some("GreenLoop".to_string()),
                footer_team: Some(json!([{ "name": "Ops", "size": 3 }])),
                ..SettingsPatch::default()
            },
        )
        .expect("settings update");

    assert_eq!(updated.company_name, "GreenLoop");
    assert_eq!(updated.primary_color, "#2ECC71", "untouched field kept");
    assert!(updated.footer_team.is_some());

    let fetched = stack
        .settings
        .fetch(Some(ADMIN_TOKEN))
        .expect("settings fetch");
    assert_eq!(fetched, updated);
}

#[test]
fn settings_are_admin_only() {
    let (stack, _) = default_stack();
    match stack.settings.fetch(Some(CITIZEN_TOKEN)) {
        Err(SettingsError::Access(AccessError::Forbidden)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }
    match stack
        .settings
        .update(Some(COLLECTOR_TOKEN), SettingsPatch::default())
    {
        Err(SettingsError::Access(AccessError::Forbidden)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn public_view_exposes_branding_without_credentials() {
    let (stack, _) = default_stack();

    stack
        .settings
        .update(
            Some(ADMIN_TOKEN),
            SettingsPatch {
                logo_url: Some("/logos/logo-1.png".to_string()),
                ..SettingsPatch::default()
            },
        )
        .expect("settings update");

    let view = stack.settings.public_view().expect("public view");
    assert_eq!(view.company_name, "PlastiSide");
    assert_eq!(view.logo_url.as_deref(), Some("/logos/logo-1.png"));
}
