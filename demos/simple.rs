use log::info;
use permit_acl::*;
use serde_json::json;

const PERMISSIONS: &str = r#"{
    "permissions": {
        "news:view":       {"title": "Read news"},
        "news:edit":       {"title": "Edit news"},
        "newsletter:":     {"title": "Manage newsletters"},
        "archive latest":  {"resource": "latest", "privilege": "archive"}
    }
}"#;

fn main() -> Result<()> {
    env_logger::init();

    // the catalogue of permissions also declares the resources they refer to
    let mut permissions = PermissionsProvider::new();
    let mut resources = ResourcesProvider::new();

    resources.add_resource("news", None)?;
    resources.add_resource("latest", Some("news"))?;
    resources.add_resource("anouncement", Some("news"))?;
    PermissionsConfig::from_json(PERMISSIONS)?.register(&mut permissions, &mut resources)?;

    let granted = |resource: Option<&str>, privilege: Option<&str>| {
        permissions.find(resource, privilege).cloned().unwrap_or_else(|| Permission::new(resource, privilege))
    };
    let author = assertion::predicate(|q: &AssertionQuery<'_>| q.context["author"] == q.role);

    let mut roles = RolesProvider::new();

    // guest may only view news
    roles.add_role(Role::new("guest").grant(granted(Some("news"), Some("view"))))?;
    // staff inherits view privilege from guest and edits their own news
    roles.add_role(Role::new("staff").with_parent("guest")
        .grant(granted(Some("news"), Some("edit")).with_assertion(author)))?;
    // marketing inherits from staff, manages newsletters and archives the latest news
    roles.add_role(Role::new("marketing").with_parent("staff")
        .grant(granted(Some("newsletter"), None))
        .grant(granted(Some("latest"), Some("archive"))))?;
    // admin inherits nothing, but is allowed all privileges
    roles.add_role(Role::new("admin").administrator())?;

    let acl = Authorizer::new(&roles, &resources)?;
    let own = json!({"author": "staff"});

    info!("guest views latest: {}", acl.is_allowed("guest", "latest", "view")?);
    info!("staff edits own news: {}", acl.is_allowed_with("staff", "latest", "edit", &own)?);
    info!("staff edits foreign news: {}", acl.is_allowed("staff", "latest", "edit")?);
    info!("marketing sends newsletter: {}", acl.is_allowed("marketing", "newsletter", "send")?);
    info!("marketing archives announcement: {}", acl.is_allowed("marketing", "anouncement", "archive")?);
    info!("admin archives announcement: {}", acl.is_allowed("admin", "anouncement", "archive")?);

    Ok(())
} // main
